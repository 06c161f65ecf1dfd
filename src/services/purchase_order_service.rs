// src/services/purchase_order_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{PurchaseOrderRepository, SequenceRepository, SettingsRepository, StockRepository},
    models::{
        documents::DocumentKind,
        procurement::{
            CreatePurchaseOrderRequest, NewPurchaseOrder, NewPurchaseOrderLine, PurchaseOrder,
            PurchaseOrderCreated, PurchaseOrderDetail, PurchaseOrderStatus,
        },
        tenancy::RequestContext,
    },
    services::{
        notification_service::NotificationService,
        pricing::{line_amounts, order_totals},
    },
};

// Linha ainda sem valores calculados
#[derive(Debug, Clone)]
pub struct DraftLine {
    pub product_id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

#[derive(Debug, Clone)]
pub struct DraftOrder {
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    pub expected_delivery_date: Option<NaiveDate>,
    pub currency_code: String,
    pub notes: Option<String>,
    pub lines: Vec<DraftLine>,
}

#[derive(Clone)]
pub struct PurchaseOrderService {
    pool: PgPool,
    po_repo: PurchaseOrderRepository,
    sequence_repo: SequenceRepository,
    settings_repo: SettingsRepository,
    stock_repo: StockRepository,
    notifications: NotificationService,
}

impl PurchaseOrderService {
    pub fn new(
        pool: PgPool,
        po_repo: PurchaseOrderRepository,
        sequence_repo: SequenceRepository,
        settings_repo: SettingsRepository,
        stock_repo: StockRepository,
        notifications: NotificationService,
    ) -> Self {
        Self {
            pool,
            po_repo,
            sequence_repo,
            settings_repo,
            stock_repo,
            notifications,
        }
    }

    /// Numera, precifica e grava cabeçalho + linhas na conexão recebida.
    /// Não abre nem fecha transação: quem chama decide o commit.
    pub async fn materialize(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        draft: DraftOrder,
    ) -> Result<PurchaseOrderDetail, AppError> {
        if draft.lines.is_empty() {
            return Err(AppError::MissingField("lines"));
        }

        let amounts = draft
            .lines
            .iter()
            .map(|l| line_amounts(l.quantity, l.unit_price, l.tax_rate))
            .collect::<Result<Vec<_>, _>>()?;
        let totals = order_totals(&amounts)?;

        let po_number = self
            .sequence_repo
            .next_number(&mut *conn, ctx.organization_id, DocumentKind::PurchaseOrder)
            .await?;

        let header = self
            .po_repo
            .insert_header(
                &mut *conn,
                ctx.organization_id,
                ctx.user_id,
                &NewPurchaseOrder {
                    po_number,
                    supplier_id: draft.supplier_id,
                    warehouse_id: draft.warehouse_id,
                    po_date: Utc::now().date_naive(),
                    expected_delivery_date: draft.expected_delivery_date,
                    subtotal: totals.subtotal,
                    tax_amount: totals.tax_amount,
                    total_amount: totals.total_amount,
                    currency_code: draft.currency_code,
                    notes: draft.notes,
                },
            )
            .await?;

        let mut lines = Vec::with_capacity(draft.lines.len());
        for (line, amount) in draft.lines.into_iter().zip(amounts) {
            let saved = self
                .po_repo
                .insert_line(
                    &mut *conn,
                    ctx.organization_id,
                    header.id,
                    &NewPurchaseOrderLine {
                        product_id: line.product_id,
                        description: line.description,
                        quantity_ordered: line.quantity,
                        unit_price: line.unit_price,
                        tax_rate: line.tax_rate,
                        line_total: amount.total,
                    },
                )
                .await?;
            lines.push(saved);
        }

        Ok(PurchaseOrderDetail { header, lines })
    }

    /// Avisa o fornecedor depois do commit. Devolve o aviso, se houver.
    pub async fn notify_supplier(
        &self,
        supplier_email: Option<&str>,
        order: &PurchaseOrderDetail,
    ) -> Option<String> {
        let header = &order.header;
        let subject = format!("Purchase order {}", header.po_number);
        let body = format!(
            "Purchase order {} dated {} with {} line(s), total {} {}.",
            header.po_number,
            header.po_date,
            order.lines.len(),
            header.total_amount,
            header.currency_code
        );

        self.notifications.dispatch(supplier_email, subject, body).await
    }

    /// Pedido manual: mesma numeração e aritmética, tudo numa transação.
    pub async fn create_manual(
        &self,
        ctx: &RequestContext,
        input: CreatePurchaseOrderRequest,
    ) -> Result<PurchaseOrderCreated, AppError> {
        input.validate()?;

        let org = ctx.organization_id;
        let supplier_email = self.po_repo.supplier_email(org, input.supplier_id).await?;
        if !self.stock_repo.warehouse_exists(org, input.warehouse_id).await? {
            return Err(AppError::WarehouseNotFound);
        }

        let settings = self.settings_repo.get_settings_standalone(org).await?;

        let mut tx = self.pool.begin().await?;

        let mut lines = Vec::with_capacity(input.lines.len());
        for line in input.lines {
            // Também garante que o produto é da organização
            let product_name = self.po_repo.product_name(&mut *tx, org, line.product_id).await?;
            let description = line
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or(product_name);
            lines.push(DraftLine {
                product_id: line.product_id,
                description,
                quantity: line.quantity,
                unit_price: line.unit_price,
                tax_rate: line.tax_rate.unwrap_or(settings.default_tax_rate),
            });
        }

        let draft = DraftOrder {
            supplier_id: input.supplier_id,
            warehouse_id: input.warehouse_id,
            expected_delivery_date: input.expected_delivery_date,
            currency_code: input
                .currency_code
                .map(|c| c.to_uppercase())
                .unwrap_or(settings.default_currency),
            notes: input.notes,
            lines,
        };

        let order = self.materialize(&mut tx, ctx, draft).await?;
        tx.commit().await?;

        tracing::info!(
            po_number = %order.header.po_number,
            total = %order.header.total_amount,
            "📦 pedido de compra manual criado"
        );

        let warning = self.notify_supplier(supplier_email.as_deref(), &order).await;

        Ok(PurchaseOrderCreated {
            purchase_order: order,
            warning,
        })
    }

    pub async fn get(&self, ctx: &RequestContext, purchase_order_id: Uuid) -> Result<PurchaseOrderDetail, AppError> {
        self.po_repo.get_detail(ctx.organization_id, purchase_order_id).await
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        self.po_repo.list(ctx.organization_id, status).await
    }
}
