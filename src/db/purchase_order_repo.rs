// src/db/purchase_order_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::procurement::{
        NewPurchaseOrder, NewPurchaseOrderLine, PurchaseOrder, PurchaseOrderDetail,
        PurchaseOrderLine, PurchaseOrderStatus, SupplierOffer,
    },
};

const ORDER_COLUMNS: &str = r#"
    id, organization_id, po_number, supplier_id, warehouse_id, po_date,
    expected_delivery_date, status, subtotal, tax_amount, total_amount,
    currency_code, notes, created_by, created_at, updated_at
"#;

const LINE_COLUMNS: &str = r#"
    id, purchase_order_id, product_id, description, quantity_ordered,
    quantity_received, unit_price, tax_rate, line_total
"#;

#[derive(Clone)]
pub struct PurchaseOrderRepository {
    pool: PgPool,
}

impl PurchaseOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  FORNECEDOR
    // =========================================================================

    /// Fornecedor ativo do produto: o primário vence; entre iguais, o vínculo mais recente.
    /// Preço: o do fornecedor, senão o custo do produto, senão zero.
    pub async fn find_supplier_offer<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<SupplierOffer>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let offer = sqlx::query_as::<_, SupplierOffer>(
            r#"
            SELECT sup.id AS supplier_id,
                   sup.name AS supplier_name,
                   sup.email AS supplier_email,
                   COALESCE(sp.unit_price, p.cost_price, 0) AS unit_price
            FROM supplier_products sp
            JOIN suppliers sup ON sup.id = sp.supplier_id
            JOIN products p ON p.id = sp.product_id
            WHERE sp.organization_id = $1
              AND sp.product_id = $2
              AND sp.is_active = true
              AND sup.is_active = true
            ORDER BY sp.is_primary DESC, sp.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(organization_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;

        Ok(offer)
    }

    pub async fn supplier_email(
        &self,
        organization_id: Uuid,
        supplier_id: Uuid,
    ) -> Result<Option<String>, AppError> {
        let email = sqlx::query_scalar::<_, Option<String>>(
            "SELECT email FROM suppliers WHERE id = $1 AND organization_id = $2 AND is_active = true",
        )
        .bind(supplier_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::SupplierNotFound)?;

        Ok(email)
    }

    /// Nome do produto, usado como descrição da linha.
    pub async fn product_name<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        product_id: Uuid,
    ) -> Result<String, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM products WHERE id = $1 AND organization_id = $2",
        )
        .bind(product_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ProductNotFound)
    }

    // =========================================================================
    //  ESCRITA
    // =========================================================================

    pub async fn insert_header<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        user_id: Uuid,
        order: &NewPurchaseOrder,
    ) -> Result<PurchaseOrder, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            INSERT INTO purchase_orders (
                organization_id, po_number, supplier_id, warehouse_id, po_date,
                expected_delivery_date, status, subtotal, tax_amount, total_amount,
                currency_code, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            ORDER_COLUMNS
        ))
        .bind(organization_id)
        .bind(&order.po_number)
        .bind(order.supplier_id)
        .bind(order.warehouse_id)
        .bind(order.po_date)
        .bind(order.expected_delivery_date)
        .bind(PurchaseOrderStatus::Draft)
        .bind(order.subtotal)
        .bind(order.tax_amount)
        .bind(order.total_amount)
        .bind(&order.currency_code)
        .bind(&order.notes)
        .bind(user_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, "purchase order number"))
    }

    pub async fn insert_line<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        purchase_order_id: Uuid,
        line: &NewPurchaseOrderLine,
    ) -> Result<PurchaseOrderLine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let line = sqlx::query_as::<_, PurchaseOrderLine>(&format!(
            r#"
            INSERT INTO purchase_order_lines (
                organization_id, purchase_order_id, product_id, description,
                quantity_ordered, unit_price, tax_rate, line_total
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            LINE_COLUMNS
        ))
        .bind(organization_id)
        .bind(purchase_order_id)
        .bind(line.product_id)
        .bind(&line.description)
        .bind(line.quantity_ordered)
        .bind(line.unit_price)
        .bind(line.tax_rate)
        .bind(line.line_total)
        .fetch_one(executor)
        .await?;

        Ok(line)
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<PurchaseOrderStatus>,
    ) -> Result<Vec<PurchaseOrder>, AppError> {
        let orders = sqlx::query_as::<_, PurchaseOrder>(&format!(
            r#"
            SELECT {} FROM purchase_orders
            WHERE organization_id = $1
              AND ($2::purchase_order_status IS NULL OR status = $2)
            ORDER BY po_date DESC, created_at DESC
            "#,
            ORDER_COLUMNS
        ))
        .bind(organization_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    pub async fn get_detail(
        &self,
        organization_id: Uuid,
        purchase_order_id: Uuid,
    ) -> Result<PurchaseOrderDetail, AppError> {
        let header = sqlx::query_as::<_, PurchaseOrder>(&format!(
            "SELECT {} FROM purchase_orders WHERE id = $1 AND organization_id = $2",
            ORDER_COLUMNS
        ))
        .bind(purchase_order_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::PurchaseOrderNotFound)?;

        let lines = sqlx::query_as::<_, PurchaseOrderLine>(&format!(
            r#"
            SELECT {} FROM purchase_order_lines
            WHERE purchase_order_id = $1
            ORDER BY created_at ASC
            "#,
            LINE_COLUMNS
        ))
        .bind(purchase_order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PurchaseOrderDetail { header, lines })
    }
}
