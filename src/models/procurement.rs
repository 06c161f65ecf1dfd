// src/models/procurement.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reorder_priority", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReorderPriority {
    Low,
    Normal,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "suggestion_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatus {
    Pending,
    Approved,
    Rejected,
    Ordered,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Approved => "approved",
            SuggestionStatus::Rejected => "rejected",
            SuggestionStatus::Ordered => "ordered",
        }
    }

    /// Transições que um usuário pode pedir. `ordered` só é alcançado pela própria aprovação.
    /// `approved -> approved` repete a materialização depois que um fornecedor foi vinculado.
    pub fn can_transition_to(&self, target: SuggestionStatus) -> bool {
        match (self, target) {
            (SuggestionStatus::Pending, SuggestionStatus::Approved)
            | (SuggestionStatus::Pending, SuggestionStatus::Rejected)
            | (SuggestionStatus::Approved, SuggestionStatus::Approved)
            | (SuggestionStatus::Approved, SuggestionStatus::Rejected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "purchase_order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    Draft,
    Confirmed,
    PartiallyReceived,
    Received,
    Cancelled,
}

// --- Regras de reposição ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRule {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub product_id: Uuid,
    /// `null` = vale para todos os depósitos
    pub warehouse_id: Option<Uuid>,
    #[schema(example = "10")]
    pub reorder_point: Decimal,
    #[schema(example = "50")]
    pub reorder_quantity: Decimal,
    #[schema(example = 7)]
    pub lead_time_days: i32,
    pub priority: ReorderPriority,
    pub is_active: bool,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Limites das colunas: NUMERIC(14,4) para quantidades, NUMERIC(14,2) para preços
pub const QUANTITY_LIMIT: Decimal = dec!(10000000000);
pub const PRICE_LIMIT: Decimal = dec!(1000000000000);
pub const MAX_TAX_RATE: Decimal = dec!(100);

fn range_error(message: &'static str) -> ValidationError {
    let mut err = ValidationError::new("range");
    err.message = Some(message.into());
    err
}

fn validate_stock_level(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val >= QUANTITY_LIMIT {
        return Err(range_error("The value must be between 0 and 9999999999.9999."));
    }
    Ok(())
}

fn validate_quantity(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO || *val >= QUANTITY_LIMIT {
        return Err(range_error(
            "The quantity must be greater than zero and below 10000000000.",
        ));
    }
    Ok(())
}

fn validate_unit_price(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val >= PRICE_LIMIT {
        return Err(range_error("The unit price must be between 0 and 999999999999.99."));
    }
    Ok(())
}

fn validate_line_tax_rate(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() || *val > MAX_TAX_RATE {
        return Err(range_error("The tax rate must be between 0 and 100."));
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReorderRuleRequest {
    pub product_id: Uuid,
    /// Omitido = todos os depósitos
    pub warehouse_id: Option<Uuid>,
    #[validate(custom(function = "validate_stock_level"))]
    #[schema(example = "10")]
    pub reorder_point: Decimal,
    #[validate(custom(function = "validate_quantity"))]
    #[schema(example = "50")]
    pub reorder_quantity: Decimal,
    #[validate(range(min = 0, message = "Must not be negative."))]
    #[serde(default)]
    pub lead_time_days: i32,
    #[serde(default = "default_priority")]
    pub priority: ReorderPriority,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReorderRuleRequest {
    #[validate(custom(function = "validate_stock_level"))]
    pub reorder_point: Decimal,
    #[validate(custom(function = "validate_quantity"))]
    pub reorder_quantity: Decimal,
    #[validate(range(min = 0, message = "Must not be negative."))]
    pub lead_time_days: i32,
    pub priority: ReorderPriority,
    pub is_active: bool,
}

fn default_priority() -> ReorderPriority {
    ReorderPriority::Normal
}

// Saldo agregado de um produto num depósito (lido de stock_levels)
#[derive(Debug, Clone, FromRow)]
pub struct StockPosition {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub quantity_on_hand: Decimal,
    pub quantity_reserved: Decimal,
}

impl StockPosition {
    pub fn available(&self) -> Decimal {
        self.quantity_on_hand - self.quantity_reserved
    }
}

// Consumo médio diário (saídas) por produto/depósito
#[derive(Debug, Clone, FromRow)]
pub struct ConsumptionRate {
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub average_daily: Decimal,
}

/// Par produto/depósito no ponto de pedido ou abaixo dele.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateShortage {
    pub reorder_rule_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub current_stock: Decimal,
    pub reorder_quantity: Decimal,
    pub days_of_stock_remaining: Option<i32>,
    pub priority: ReorderPriority,
}

// --- Sugestões de compra ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderSuggestion {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    pub product_id: Uuid,
    pub warehouse_id: Uuid,
    pub reorder_rule_id: Option<Uuid>,
    #[schema(example = "5")]
    pub current_stock: Decimal,
    #[schema(example = "50")]
    pub suggested_quantity: Decimal,
    #[schema(example = 2)]
    pub days_of_stock_remaining: Option<i32>,
    pub priority: ReorderPriority,
    pub status: SuggestionStatus,
    #[schema(example = "PO000001")]
    pub po_number: Option<String>,
    pub purchase_order_id: Option<Uuid>,
    pub notes: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem, com os campos de exibição do produto e do depósito
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub suggestion: PurchaseOrderSuggestion,
    #[schema(example = "Parafuso M6")]
    pub product_name: String,
    #[schema(example = "PAR-M6")]
    pub product_sku: String,
    #[schema(example = "Depósito Central")]
    pub warehouse_name: String,
}

// Filtro de status da listagem: um status ou "all"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionStatusFilter {
    #[default]
    Pending,
    Approved,
    Rejected,
    Ordered,
    All,
}

impl SuggestionStatusFilter {
    pub fn status(&self) -> Option<SuggestionStatus> {
        match self {
            SuggestionStatusFilter::Pending => Some(SuggestionStatus::Pending),
            SuggestionStatusFilter::Approved => Some(SuggestionStatus::Approved),
            SuggestionStatusFilter::Rejected => Some(SuggestionStatus::Rejected),
            SuggestionStatusFilter::Ordered => Some(SuggestionStatus::Ordered),
            SuggestionStatusFilter::All => None,
        }
    }
}

// --- Fornecedor escolhido para o produto ---

#[derive(Debug, Clone, FromRow)]
pub struct SupplierOffer {
    pub supplier_id: Uuid,
    pub supplier_name: String,
    pub supplier_email: Option<String>,
    pub unit_price: Decimal,
}

// --- Pedidos de compra ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrder {
    pub id: Uuid,
    #[schema(ignore)]
    pub organization_id: Uuid,
    #[schema(example = "PO000001")]
    pub po_number: String,
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    #[schema(value_type = String, format = Date, example = "2024-01-01")]
    pub po_date: NaiveDate,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery_date: Option<NaiveDate>,
    pub status: PurchaseOrderStatus,
    #[schema(example = "1000.00")]
    pub subtotal: Decimal,
    #[schema(example = "180.00")]
    pub tax_amount: Decimal,
    #[schema(example = "1180.00")]
    pub total_amount: Decimal,
    #[schema(example = "USD")]
    pub currency_code: String,
    pub notes: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderLine {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub product_id: Uuid,
    pub description: String,
    #[schema(example = "50")]
    pub quantity_ordered: Decimal,
    pub quantity_received: Decimal,
    #[schema(example = "20.00")]
    pub unit_price: Decimal,
    #[schema(example = "18")]
    pub tax_rate: Decimal,
    #[schema(example = "1180.00")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderDetail {
    #[serde(flatten)]
    pub header: PurchaseOrder,
    pub lines: Vec<PurchaseOrderLine>,
}

// Linha já precificada, pronta para INSERT
#[derive(Debug, Clone)]
pub struct NewPurchaseOrderLine {
    pub product_id: Uuid,
    pub description: String,
    pub quantity_ordered: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub line_total: Decimal,
}

// Cabeçalho já totalizado, pronto para INSERT
#[derive(Debug, Clone)]
pub struct NewPurchaseOrder {
    pub po_number: String,
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    pub po_date: NaiveDate,
    pub expected_delivery_date: Option<NaiveDate>,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency_code: String,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderLineRequest {
    pub product_id: Uuid,
    /// Omitido = nome do produto
    pub description: Option<String>,
    #[validate(custom(function = "validate_quantity"))]
    #[schema(example = "10")]
    pub quantity: Decimal,
    #[validate(custom(function = "validate_unit_price"))]
    #[schema(example = "100.00")]
    pub unit_price: Decimal,
    /// Omitido = taxa padrão da organização
    #[validate(custom(function = "validate_line_tax_rate"))]
    pub tax_rate: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePurchaseOrderRequest {
    pub supplier_id: Uuid,
    pub warehouse_id: Uuid,
    #[schema(value_type = Option<String>, format = Date)]
    pub expected_delivery_date: Option<NaiveDate>,
    #[validate(length(equal = 3, message = "Use an ISO 4217 currency code."))]
    pub currency_code: Option<String>,
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "A purchase order needs at least one line."), nested)]
    pub lines: Vec<CreatePurchaseOrderLineRequest>,
}

// Resposta da aprovação/rejeição de uma sugestão
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionDecision {
    pub suggestion: PurchaseOrderSuggestion,
    pub purchase_order: Option<PurchaseOrderDetail>,
    #[schema(example = "Purchase order PO000001 created")]
    pub message: String,
    /// Aviso brando, por exemplo quando o e-mail ao fornecedor falhou
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    #[schema(example = "3 purchase order suggestions created")]
    pub message: String,
    #[schema(example = 3)]
    pub count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderCreated {
    #[serde(flatten)]
    pub purchase_order: PurchaseOrderDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use SuggestionStatus::*;

    #[test]
    fn pending_can_be_approved_or_rejected() {
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(!Pending.can_transition_to(Ordered));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for target in [Pending, Approved, Rejected, Ordered] {
            assert!(!Ordered.can_transition_to(target), "ordered -> {target}");
            assert!(!Rejected.can_transition_to(target), "rejected -> {target}");
        }
    }

    #[test]
    fn approved_may_retry_or_be_rejected() {
        assert!(Approved.can_transition_to(Approved));
        assert!(Approved.can_transition_to(Rejected));
        assert!(!Approved.can_transition_to(Pending));
    }

    #[test]
    fn priorities_order_from_low_to_critical() {
        assert!(ReorderPriority::Critical > ReorderPriority::High);
        assert!(ReorderPriority::High > ReorderPriority::Normal);
        assert!(ReorderPriority::Normal > ReorderPriority::Low);
    }

    #[test]
    fn reorder_rule_rejects_non_positive_quantity() {
        let request = CreateReorderRuleRequest {
            product_id: Uuid::new_v4(),
            warehouse_id: None,
            reorder_point: Decimal::ZERO,
            reorder_quantity: Decimal::ZERO,
            lead_time_days: 0,
            priority: ReorderPriority::Normal,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("reorder_quantity"));
        assert!(!errors.field_errors().contains_key("reorder_point"));
    }

    #[test]
    fn manual_order_requires_lines() {
        let request = CreatePurchaseOrderRequest {
            supplier_id: Uuid::new_v4(),
            warehouse_id: Uuid::new_v4(),
            expected_delivery_date: None,
            currency_code: None,
            notes: None,
            lines: vec![],
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("lines"));
    }

    fn order_line(quantity: Decimal, unit_price: Decimal, tax_rate: Option<Decimal>) -> CreatePurchaseOrderLineRequest {
        CreatePurchaseOrderLineRequest {
            product_id: Uuid::new_v4(),
            description: None,
            quantity,
            unit_price,
            tax_rate,
        }
    }

    #[test]
    fn order_line_rejects_amounts_beyond_column_precision() {
        let errors = order_line(dec!(1e15), dec!(1e15), Some(dec!(18)))
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("quantity"));
        assert!(errors.field_errors().contains_key("unit_price"));

        let errors = order_line(dec!(1), dec!(1), Some(dec!(250))).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tax_rate"));
    }

    #[test]
    fn order_line_accepts_largest_storable_values() {
        let line = order_line(dec!(9999999999.9999), dec!(999999999999.99), Some(dec!(100)));
        assert!(line.validate().is_ok());
    }

    #[test]
    fn reorder_rule_rejects_oversized_point() {
        let request = UpdateReorderRuleRequest {
            reorder_point: dec!(1e12),
            reorder_quantity: dec!(5),
            lead_time_days: 0,
            priority: ReorderPriority::Low,
            is_active: true,
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("reorder_point"));
    }

    #[test]
    fn status_filter_defaults_to_pending() {
        assert_eq!(SuggestionStatusFilter::default().status(), Some(Pending));
        assert_eq!(SuggestionStatusFilter::All.status(), None);
    }
}
