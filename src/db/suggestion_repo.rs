// src/db/suggestion_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::procurement::{
        CandidateShortage, PurchaseOrderSuggestion, SuggestionStatus, SuggestionView,
    },
};

const SUGGESTION_COLUMNS: &str = r#"
    s.id, s.organization_id, s.product_id, s.warehouse_id, s.reorder_rule_id,
    s.current_stock, s.suggested_quantity, s.days_of_stock_remaining, s.priority,
    s.status, s.po_number, s.purchase_order_id, s.notes, s.approved_at, s.approved_by,
    s.created_at, s.updated_at
"#;

// Sugestão travada para decisão, com o nome do produto para mensagens
#[derive(Debug, sqlx::FromRow)]
pub struct LockedSuggestion {
    #[sqlx(flatten)]
    pub suggestion: PurchaseOrderSuggestion,
    pub product_name: String,
}

#[derive(Clone)]
pub struct SuggestionRepository {
    pool: PgPool,
}

impl SuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Mais urgentes primeiro; sem histórico de consumo vai para o fim do grupo
    pub async fn list(
        &self,
        organization_id: Uuid,
        status: Option<SuggestionStatus>,
    ) -> Result<Vec<SuggestionView>, AppError> {
        let rows = sqlx::query_as::<_, SuggestionView>(&format!(
            r#"
            SELECT {},
                   p.name AS product_name,
                   p.sku AS product_sku,
                   w.name AS warehouse_name
            FROM purchase_order_suggestions s
            JOIN products p ON p.id = s.product_id
            JOIN warehouses w ON w.id = s.warehouse_id
            WHERE s.organization_id = $1
              AND ($2::suggestion_status IS NULL OR s.status = $2)
            ORDER BY
                CASE s.priority
                    WHEN 'critical' THEN 0
                    WHEN 'high' THEN 1
                    WHEN 'normal' THEN 2
                    ELSE 3
                END,
                s.days_of_stock_remaining ASC NULLS LAST,
                s.created_at DESC
            "#,
            SUGGESTION_COLUMNS
        ))
        .bind(organization_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Insere a sugestão se não houver outra aberta (pending/approved) para o
    /// mesmo produto e depósito. Retorna `false` quando já existia.
    pub async fn insert_if_absent<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        candidate: &CandidateShortage,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_order_suggestions (
                organization_id, product_id, warehouse_id, reorder_rule_id,
                current_stock, suggested_quantity, days_of_stock_remaining, priority
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (organization_id, product_id, warehouse_id)
                WHERE status IN ('pending', 'approved')
            DO NOTHING
            RETURNING id
            "#,
        )
        .bind(organization_id)
        .bind(candidate.product_id)
        .bind(candidate.warehouse_id)
        .bind(candidate.reorder_rule_id)
        .bind(candidate.current_stock)
        .bind(candidate.reorder_quantity)
        .bind(candidate.days_of_stock_remaining)
        .bind(candidate.priority)
        .fetch_optional(executor)
        .await?;

        Ok(inserted.is_some())
    }

    /// SELECT ... FOR UPDATE: serializa decisões concorrentes sobre a mesma sugestão.
    pub async fn find_for_update<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        suggestion_id: Uuid,
    ) -> Result<LockedSuggestion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, LockedSuggestion>(&format!(
            r#"
            SELECT {}, p.name AS product_name
            FROM purchase_order_suggestions s
            JOIN products p ON p.id = s.product_id
            WHERE s.id = $1 AND s.organization_id = $2
            FOR UPDATE OF s
            "#,
            SUGGESTION_COLUMNS
        ))
        .bind(suggestion_id)
        .bind(organization_id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::SuggestionNotFound)
    }

    pub async fn mark_approved<'e, E>(
        &self,
        executor: E,
        suggestion_id: Uuid,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> Result<PurchaseOrderSuggestion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let suggestion = sqlx::query_as::<_, PurchaseOrderSuggestion>(&format!(
            r#"
            UPDATE purchase_order_suggestions s SET
                status = 'approved',
                approved_at = NOW(),
                approved_by = $2,
                notes = COALESCE($3, s.notes),
                updated_at = NOW()
            WHERE s.id = $1
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        ))
        .bind(suggestion_id)
        .bind(user_id)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(suggestion)
    }

    pub async fn mark_rejected<'e, E>(
        &self,
        executor: E,
        suggestion_id: Uuid,
        notes: Option<&str>,
    ) -> Result<PurchaseOrderSuggestion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let suggestion = sqlx::query_as::<_, PurchaseOrderSuggestion>(&format!(
            r#"
            UPDATE purchase_order_suggestions s SET
                status = 'rejected',
                notes = COALESCE($2, s.notes),
                updated_at = NOW()
            WHERE s.id = $1
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        ))
        .bind(suggestion_id)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(suggestion)
    }

    /// Fecha a sugestão apontando para o pedido que a materializou.
    pub async fn mark_ordered<'e, E>(
        &self,
        executor: E,
        suggestion_id: Uuid,
        purchase_order_id: Uuid,
        po_number: &str,
        user_id: Uuid,
        notes: Option<&str>,
    ) -> Result<PurchaseOrderSuggestion, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let suggestion = sqlx::query_as::<_, PurchaseOrderSuggestion>(&format!(
            r#"
            UPDATE purchase_order_suggestions s SET
                status = 'ordered',
                po_number = $2,
                purchase_order_id = $3,
                approved_at = COALESCE(s.approved_at, NOW()),
                approved_by = COALESCE(s.approved_by, $4),
                notes = COALESCE($5, s.notes),
                updated_at = NOW()
            WHERE s.id = $1
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        ))
        .bind(suggestion_id)
        .bind(po_number)
        .bind(purchase_order_id)
        .bind(user_id)
        .bind(notes)
        .fetch_one(executor)
        .await?;

        Ok(suggestion)
    }
}
