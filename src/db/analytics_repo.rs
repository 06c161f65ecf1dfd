// src/db/analytics_repo.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::analytics::{
        CustomerRevenue, DailyMovement, LowStockItem, MonthlyAmount, ProductStockValue,
        StatusCount, SupplierSpend,
    },
};

// Consultas somente leitura dos painéis. Cada método é independente para que o
// serviço possa rodá-los em paralelo e isolar falhas.
#[derive(Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  COMPRAS
    // =========================================================================

    pub async fn purchase_orders_by_status(&self, organization_id: Uuid) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status::text AS status, COUNT(*) AS count
            FROM purchase_orders
            WHERE organization_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn open_order_value(&self, organization_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM purchase_orders
            WHERE organization_id = $1
              AND status IN ('draft', 'confirmed', 'partially_received')
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn top_suppliers_by_spend(&self, organization_id: Uuid) -> Result<Vec<SupplierSpend>, AppError> {
        let rows = sqlx::query_as::<_, SupplierSpend>(
            r#"
            SELECT po.supplier_id, s.name AS supplier_name,
                   COUNT(*) AS order_count,
                   COALESCE(SUM(po.total_amount), 0) AS total
            FROM purchase_orders po
            JOIN suppliers s ON s.id = po.supplier_id
            WHERE po.organization_id = $1 AND po.status <> 'cancelled'
            GROUP BY po.supplier_id, s.name
            ORDER BY total DESC
            LIMIT 5
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn monthly_spend(&self, organization_id: Uuid) -> Result<Vec<MonthlyAmount>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyAmount>(
            r#"
            SELECT to_char(date_trunc('month', po_date), 'YYYY-MM') AS month,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM purchase_orders
            WHERE organization_id = $1
              AND status <> 'cancelled'
              AND po_date >= date_trunc('month', CURRENT_DATE) - INTERVAL '11 months'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn pending_suggestions(&self, organization_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchase_order_suggestions WHERE organization_id = $1 AND status = 'pending'",
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    // =========================================================================
    //  VENDAS
    // =========================================================================

    pub async fn total_revenue(&self, organization_id: Uuid) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(total_amount), 0)
            FROM sales_orders
            WHERE organization_id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    pub async fn sales_orders_by_status(&self, organization_id: Uuid) -> Result<Vec<StatusCount>, AppError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM sales_orders
            WHERE organization_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn monthly_revenue(&self, organization_id: Uuid) -> Result<Vec<MonthlyAmount>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyAmount>(
            r#"
            SELECT to_char(date_trunc('month', order_date), 'YYYY-MM') AS month,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM sales_orders
            WHERE organization_id = $1
              AND status <> 'cancelled'
              AND order_date >= date_trunc('month', CURRENT_DATE) - INTERVAL '11 months'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn top_customers(&self, organization_id: Uuid) -> Result<Vec<CustomerRevenue>, AppError> {
        let rows = sqlx::query_as::<_, CustomerRevenue>(
            r#"
            SELECT customer_name, COUNT(*) AS order_count,
                   COALESCE(SUM(total_amount), 0) AS total
            FROM sales_orders
            WHERE organization_id = $1 AND status <> 'cancelled'
            GROUP BY customer_name
            ORDER BY total DESC
            LIMIT 5
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // =========================================================================
    //  ESTOQUE
    // =========================================================================

    pub async fn product_stock_values(&self, organization_id: Uuid) -> Result<Vec<ProductStockValue>, AppError> {
        let rows = sqlx::query_as::<_, ProductStockValue>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name,
                   COALESCE(SUM(sl.quantity_on_hand * COALESCE(p.cost_price, 0)), 0) AS stock_value
            FROM products p
            JOIN stock_levels sl ON sl.product_id = p.id
            WHERE p.organization_id = $1
            GROUP BY p.id, p.name
            ORDER BY stock_value DESC, p.name
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Regra específica do depósito vence a regra global do produto
    pub async fn low_stock_items(&self, organization_id: Uuid) -> Result<Vec<LowStockItem>, AppError> {
        let rows = sqlx::query_as::<_, LowStockItem>(
            r#"
            SELECT p.id AS product_id, p.name AS product_name, w.name AS warehouse_name,
                   sl.quantity_on_hand - sl.quantity_reserved AS available,
                   COALESCE(specific.reorder_point, global.reorder_point) AS reorder_point
            FROM stock_levels sl
            JOIN products p ON p.id = sl.product_id
            JOIN warehouses w ON w.id = sl.warehouse_id
            LEFT JOIN reorder_rules specific
                   ON specific.product_id = sl.product_id
                  AND specific.warehouse_id = sl.warehouse_id
                  AND specific.is_active = true
            LEFT JOIN reorder_rules global
                   ON global.product_id = sl.product_id
                  AND global.warehouse_id IS NULL
                  AND global.is_active = true
            WHERE sl.organization_id = $1
              AND COALESCE(specific.reorder_point, global.reorder_point) IS NOT NULL
              AND sl.quantity_on_hand - sl.quantity_reserved
                  <= COALESCE(specific.reorder_point, global.reorder_point)
            ORDER BY available ASC
            LIMIT 20
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn daily_movements(&self, organization_id: Uuid) -> Result<Vec<DailyMovement>, AppError> {
        let rows = sqlx::query_as::<_, DailyMovement>(
            r#"
            SELECT to_char(created_at::date, 'YYYY-MM-DD') AS day,
                   COALESCE(SUM(quantity_changed) FILTER (WHERE quantity_changed > 0), 0) AS inbound,
                   COALESCE(SUM(-quantity_changed) FILTER (WHERE quantity_changed < 0), 0) AS outbound
            FROM stock_movements
            WHERE organization_id = $1
              AND created_at >= CURRENT_DATE - INTERVAL '29 days'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
