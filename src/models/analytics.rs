// src/models/analytics.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    #[schema(example = "draft")]
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAmount {
    #[schema(example = "2024-01")]
    pub month: String,
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierSpend {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub order_count: i64,
    pub total: Decimal,
}

// --- Compras ---
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchasingAnalytics {
    pub orders_by_status: Vec<StatusCount>,
    /// Valor em pedidos ainda não recebidos (draft, confirmed, partially_received)
    pub open_order_value: Decimal,
    pub spend_by_supplier: Vec<SupplierSpend>,
    pub monthly_spend: Vec<MonthlyAmount>,
    pub pending_suggestions: i64,
}

// --- Vendas ---
#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRevenue {
    pub customer_name: String,
    pub order_count: i64,
    pub total: Decimal,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesAnalytics {
    pub total_revenue: Decimal,
    pub orders_by_status: Vec<StatusCount>,
    pub monthly_revenue: Vec<MonthlyAmount>,
    pub top_customers: Vec<CustomerRevenue>,
}

// --- Estoque ---
#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LowStockItem {
    pub product_id: Uuid,
    pub product_name: String,
    pub warehouse_name: String,
    pub available: Decimal,
    pub reorder_point: Decimal,
}

// Valor em estoque por produto, insumo da curva ABC
#[derive(Debug, Clone, FromRow)]
pub struct ProductStockValue {
    pub product_id: Uuid,
    pub product_name: String,
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AbcClass {
    A,
    B,
    C,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AbcEntry {
    pub product_id: Uuid,
    pub product_name: String,
    pub stock_value: Decimal,
    /// Percentual acumulado do valor total, 0-100
    pub cumulative_share: Decimal,
    pub class: AbcClass,
}

#[derive(Debug, Clone, Default, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyMovement {
    #[schema(example = "2024-01-15")]
    pub day: String,
    pub inbound: Decimal,
    pub outbound: Decimal,
}

#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAnalytics {
    pub stock_value: Decimal,
    pub low_stock_items: Vec<LowStockItem>,
    pub abc_classification: Vec<AbcEntry>,
    pub daily_movements: Vec<DailyMovement>,
}
