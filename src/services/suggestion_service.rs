// src/services/suggestion_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{db_utils::is_rejected_by_database, error::AppError},
    db::{PurchaseOrderRepository, SettingsRepository, SuggestionRepository},
    models::{
        procurement::{
            GenerationResult, SuggestionDecision, SuggestionStatus, SuggestionView,
        },
        tenancy::RequestContext,
    },
    services::{
        purchase_order_service::{DraftLine, DraftOrder, PurchaseOrderService},
        reorder_service::ReorderService,
    },
};

#[derive(Clone)]
pub struct SuggestionService {
    pool: PgPool,
    suggestion_repo: SuggestionRepository,
    po_repo: PurchaseOrderRepository,
    settings_repo: SettingsRepository,
    reorder_service: ReorderService,
    po_service: PurchaseOrderService,
}

impl SuggestionService {
    pub fn new(
        pool: PgPool,
        suggestion_repo: SuggestionRepository,
        po_repo: PurchaseOrderRepository,
        settings_repo: SettingsRepository,
        reorder_service: ReorderService,
        po_service: PurchaseOrderService,
    ) -> Self {
        Self {
            pool,
            suggestion_repo,
            po_repo,
            settings_repo,
            reorder_service,
            po_service,
        }
    }

    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<SuggestionStatus>,
    ) -> Result<Vec<SuggestionView>, AppError> {
        self.suggestion_repo.list(ctx.organization_id, status).await
    }

    // =========================================================================
    //  GERAÇÃO
    // =========================================================================

    /// Cria uma sugestão `pending` para cada falta sem sugestão aberta.
    /// Rodar de novo sem mudança de estoque não cria nada.
    pub async fn generate(&self, ctx: &RequestContext) -> Result<GenerationResult, AppError> {
        let outcome = self.reorder_service.find_shortages(ctx).await?;

        let mut created = 0u64;
        let mut skipped = outcome.skipped;

        for candidate in &outcome.candidates {
            // Cada item é independente: uma recusa do banco (FK, CHECK) não derruba o lote
            match self
                .suggestion_repo
                .insert_if_absent(&self.pool, ctx.organization_id, candidate)
                .await
            {
                Ok(true) => created += 1,
                Ok(false) => {}
                Err(e) if is_rejected_by_database(&e) => {
                    tracing::warn!(
                        product_id = %candidate.product_id,
                        warehouse_id = %candidate.warehouse_id,
                        error = %e,
                        "sugestão ignorada"
                    );
                    skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            organization_id = %ctx.organization_id,
            shortages = outcome.candidates.len(),
            created,
            skipped,
            "🛒 geração de sugestões concluída"
        );

        Ok(GenerationResult {
            message: format!("{} purchase order suggestions created", created),
            count: created,
        })
    }

    // =========================================================================
    //  DECISÃO
    // =========================================================================

    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
        target: SuggestionStatus,
        notes: Option<String>,
    ) -> Result<SuggestionDecision, AppError> {
        match target {
            SuggestionStatus::Rejected => self.reject(ctx, suggestion_id, notes).await,
            SuggestionStatus::Approved => self.approve(ctx, suggestion_id, notes).await,
            other => Err(AppError::InvalidStatusTransition {
                entity: "suggestion",
                from: "request".to_string(),
                to: other.to_string(),
            }),
        }
    }

    async fn reject(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
        notes: Option<String>,
    ) -> Result<SuggestionDecision, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = self
            .suggestion_repo
            .find_for_update(&mut *tx, ctx.organization_id, suggestion_id)
            .await?;
        ensure_transition(locked.suggestion.status, SuggestionStatus::Rejected)?;

        let suggestion = self
            .suggestion_repo
            .mark_rejected(&mut *tx, suggestion_id, notes.as_deref())
            .await?;

        tx.commit().await?;

        tracing::info!(suggestion_id = %suggestion_id, "sugestão rejeitada");

        Ok(SuggestionDecision {
            suggestion,
            purchase_order: None,
            message: "Suggestion rejected".to_string(),
            warning: None,
        })
    }

    /// Aprova e materializa o pedido numa única transação.
    /// Sem fornecedor: a aprovação fica gravada (`approved`) e o chamador recebe 400.
    async fn approve(
        &self,
        ctx: &RequestContext,
        suggestion_id: Uuid,
        notes: Option<String>,
    ) -> Result<SuggestionDecision, AppError> {
        let org = ctx.organization_id;
        let mut tx = self.pool.begin().await?;

        // A trava impede duas aprovações simultâneas de criarem dois pedidos
        let locked = self
            .suggestion_repo
            .find_for_update(&mut *tx, org, suggestion_id)
            .await?;
        let suggestion = locked.suggestion;
        ensure_transition(suggestion.status, SuggestionStatus::Approved)?;

        let Some(offer) = self
            .po_repo
            .find_supplier_offer(&mut *tx, org, suggestion.product_id)
            .await?
        else {
            self.suggestion_repo
                .mark_approved(&mut *tx, suggestion_id, ctx.user_id, notes.as_deref())
                .await?;
            tx.commit().await?;

            tracing::warn!(
                suggestion_id = %suggestion_id,
                product = %locked.product_name,
                "sugestão aprovada sem fornecedor; pedido não criado"
            );
            return Err(AppError::NoSupplierForProduct(locked.product_name));
        };

        let settings = self.settings_repo.get_settings(&mut *tx, org).await?;

        let draft = DraftOrder {
            supplier_id: offer.supplier_id,
            warehouse_id: suggestion.warehouse_id,
            expected_delivery_date: None,
            currency_code: settings.default_currency.clone(),
            notes: Some(format!("Generated from purchase order suggestion {}", suggestion.id)),
            lines: vec![DraftLine {
                product_id: suggestion.product_id,
                description: locked.product_name.clone(),
                quantity: suggestion.suggested_quantity,
                unit_price: offer.unit_price,
                tax_rate: settings.default_tax_rate,
            }],
        };

        let order = self.po_service.materialize(&mut tx, ctx, draft).await?;

        let suggestion = self
            .suggestion_repo
            .mark_ordered(
                &mut *tx,
                suggestion_id,
                order.header.id,
                &order.header.po_number,
                ctx.user_id,
                notes.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(
            suggestion_id = %suggestion_id,
            po_number = %order.header.po_number,
            supplier = %offer.supplier_name,
            total = %order.header.total_amount,
            "📦 pedido de compra criado a partir de sugestão"
        );

        // Depois do commit: falha aqui vira aviso, nunca desfaz o pedido
        let warning = self
            .po_service
            .notify_supplier(offer.supplier_email.as_deref(), &order)
            .await;

        Ok(SuggestionDecision {
            message: format!("Purchase order {} created", order.header.po_number),
            suggestion,
            purchase_order: Some(order),
            warning,
        })
    }
}

fn ensure_transition(from: SuggestionStatus, to: SuggestionStatus) -> Result<(), AppError> {
    if from.can_transition_to(to) {
        return Ok(());
    }
    Err(AppError::InvalidStatusTransition {
        entity: "suggestion",
        from: from.to_string(),
        to: to.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_suggestions_cannot_be_approved_again() {
        let err = ensure_transition(SuggestionStatus::Ordered, SuggestionStatus::Approved).unwrap_err();
        assert!(matches!(
            err,
            AppError::InvalidStatusTransition { ref from, ref to, .. } if from == "ordered" && to == "approved"
        ));
    }

    #[test]
    fn pending_suggestions_can_be_decided() {
        assert!(ensure_transition(SuggestionStatus::Pending, SuggestionStatus::Approved).is_ok());
        assert!(ensure_transition(SuggestionStatus::Pending, SuggestionStatus::Rejected).is_ok());
    }
}
