// src/db/stock_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::procurement::{ConsumptionRate, ReorderPriority, ReorderRule, StockPosition},
};

const RULE_COLUMNS: &str = r#"
    id, organization_id, product_id, warehouse_id, reorder_point, reorder_quantity,
    lead_time_days, priority, is_active, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct StockRepository {
    pool: PgPool,
}

impl StockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  REGRAS DE REPOSIÇÃO
    // =========================================================================

    pub async fn list_rules(
        &self,
        organization_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Vec<ReorderRule>, AppError> {
        let rules = sqlx::query_as::<_, ReorderRule>(&format!(
            r#"
            SELECT {} FROM reorder_rules
            WHERE organization_id = $1
              AND ($2::uuid IS NULL OR product_id = $2)
            ORDER BY created_at DESC
            "#,
            RULE_COLUMNS
        ))
        .bind(organization_id)
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rules)
    }

    pub async fn list_active_rules<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<ReorderRule>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rules = sqlx::query_as::<_, ReorderRule>(&format!(
            "SELECT {} FROM reorder_rules WHERE organization_id = $1 AND is_active = true",
            RULE_COLUMNS
        ))
        .bind(organization_id)
        .fetch_all(executor)
        .await?;

        Ok(rules)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_rule(
        &self,
        organization_id: Uuid,
        product_id: Uuid,
        warehouse_id: Option<Uuid>,
        reorder_point: Decimal,
        reorder_quantity: Decimal,
        lead_time_days: i32,
        priority: ReorderPriority,
        created_by: Uuid,
    ) -> Result<ReorderRule, AppError> {
        sqlx::query_as::<_, ReorderRule>(&format!(
            r#"
            INSERT INTO reorder_rules (
                organization_id, product_id, warehouse_id, reorder_point,
                reorder_quantity, lead_time_days, priority, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(organization_id)
        .bind(product_id)
        .bind(warehouse_id)
        .bind(reorder_point)
        .bind(reorder_quantity)
        .bind(lead_time_days)
        .bind(priority)
        .bind(created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "reorder rule for this product and warehouse"))
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_rule(
        &self,
        organization_id: Uuid,
        rule_id: Uuid,
        reorder_point: Decimal,
        reorder_quantity: Decimal,
        lead_time_days: i32,
        priority: ReorderPriority,
        is_active: bool,
    ) -> Result<ReorderRule, AppError> {
        sqlx::query_as::<_, ReorderRule>(&format!(
            r#"
            UPDATE reorder_rules SET
                reorder_point = $3,
                reorder_quantity = $4,
                lead_time_days = $5,
                priority = $6,
                is_active = $7,
                updated_at = NOW()
            WHERE organization_id = $1 AND id = $2
            RETURNING {}
            "#,
            RULE_COLUMNS
        ))
        .bind(organization_id)
        .bind(rule_id)
        .bind(reorder_point)
        .bind(reorder_quantity)
        .bind(lead_time_days)
        .bind(priority)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ReorderRuleNotFound)
    }

    // =========================================================================
    //  CATÁLOGO
    // =========================================================================

    pub async fn product_exists(&self, organization_id: Uuid, product_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1 AND organization_id = $2)",
        )
        .bind(product_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn warehouse_exists(&self, organization_id: Uuid, warehouse_id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1 AND organization_id = $2 AND is_active = true)",
        )
        .bind(warehouse_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    // =========================================================================
    //  SALDOS E CONSUMO
    // =========================================================================

    pub async fn stock_positions<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<StockPosition>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let positions = sqlx::query_as::<_, StockPosition>(
            r#"
            SELECT sl.product_id, sl.warehouse_id,
                   SUM(sl.quantity_on_hand) AS quantity_on_hand,
                   SUM(sl.quantity_reserved) AS quantity_reserved
            FROM stock_levels sl
            JOIN warehouses w ON w.id = sl.warehouse_id
            WHERE sl.organization_id = $1 AND w.is_active = true
            GROUP BY sl.product_id, sl.warehouse_id
            "#,
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await?;

        Ok(positions)
    }

    /// Média diária de saídas (movimentos negativos) na janela informada.
    pub async fn consumption_rates<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        window_days: i32,
    ) -> Result<Vec<ConsumptionRate>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rates = sqlx::query_as::<_, ConsumptionRate>(
            r#"
            SELECT product_id, warehouse_id,
                   SUM(-quantity_changed) / $2::numeric AS average_daily
            FROM stock_movements
            WHERE organization_id = $1
              AND quantity_changed < 0
              AND created_at >= NOW() - make_interval(days => $2)
            GROUP BY product_id, warehouse_id
            "#,
        )
        .bind(organization_id)
        .bind(window_days)
        .fetch_all(executor)
        .await?;

        Ok(rates)
    }

    /// Depósito ativo mais antigo: destino de regras globais de produtos sem saldo.
    pub async fn default_warehouse<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let warehouse_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM warehouses
            WHERE organization_id = $1 AND is_active = true
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#,
        )
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(warehouse_id)
    }
}
