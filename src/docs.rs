// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Purchasing ---
        handlers::po_suggestions::list_suggestions,
        handlers::po_suggestions::generate_suggestions,
        handlers::po_suggestions::update_suggestion,
        handlers::purchase_orders::list_purchase_orders,
        handlers::purchase_orders::get_purchase_order,
        handlers::purchase_orders::create_purchase_order,

        // --- Inventory ---
        handlers::reorder_rules::list_reorder_rules,
        handlers::reorder_rules::create_reorder_rule,
        handlers::reorder_rules::update_reorder_rule,

        // --- Supplier Portal ---
        handlers::supplier_quotations::list_quotations,
        handlers::supplier_quotations::review_quotation,

        // --- Analytics ---
        handlers::analytics::purchasing_analytics,
        handlers::analytics::sales_analytics,
        handlers::analytics::inventory_analytics,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,

        // --- RBAC ---
        handlers::rbac::list_permissions,
    ),
    components(
        schemas(
            // --- Purchasing ---
            models::procurement::ReorderPriority,
            models::procurement::SuggestionStatus,
            models::procurement::SuggestionStatusFilter,
            models::procurement::PurchaseOrderStatus,
            models::procurement::PurchaseOrderSuggestion,
            models::procurement::SuggestionView,
            models::procurement::SuggestionDecision,
            models::procurement::GenerationResult,
            models::procurement::PurchaseOrder,
            models::procurement::PurchaseOrderLine,
            models::procurement::PurchaseOrderDetail,
            models::procurement::PurchaseOrderCreated,
            models::procurement::CreatePurchaseOrderRequest,
            models::procurement::CreatePurchaseOrderLineRequest,

            // --- Inventory ---
            models::procurement::ReorderRule,
            models::procurement::CreateReorderRuleRequest,
            models::procurement::UpdateReorderRuleRequest,

            // --- Supplier Portal ---
            models::supplier_portal::QuotationStatus,
            models::supplier_portal::PaymentStatus,
            models::supplier_portal::SupplierQuotationSubmission,
            models::supplier_portal::SupplierInvoice,
            models::supplier_portal::QuotationReviewResult,

            // --- Analytics ---
            models::analytics::StatusCount,
            models::analytics::MonthlyAmount,
            models::analytics::SupplierSpend,
            models::analytics::PurchasingAnalytics,
            models::analytics::CustomerRevenue,
            models::analytics::SalesAnalytics,
            models::analytics::LowStockItem,
            models::analytics::AbcClass,
            models::analytics::AbcEntry,
            models::analytics::DailyMovement,
            models::analytics::InventoryAnalytics,

            // --- Settings ---
            models::settings::ProcurementSettings,
            models::settings::UpdateSettingsRequest,

            // --- RBAC ---
            models::rbac::Permission,

            // --- Payloads ---
            handlers::po_suggestions::UpdateSuggestionPayload,
            handlers::supplier_quotations::ReviewQuotationPayload,
        )
    ),
    tags(
        (name = "Purchasing", description = "Sugestões de compra e pedidos"),
        (name = "Inventory", description = "Regras de reposição"),
        (name = "Supplier Portal", description = "Revisão de cotações e faturas de fornecedores"),
        (name = "Analytics", description = "Indicadores e Gráficos Gerenciais"),
        (name = "Settings", description = "Política de compras da organização"),
        (name = "RBAC", description = "Controle de Acesso (Permissões)")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_workflow_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/po-suggestions",
            "/api/purchase-orders/{id}",
            "/api/supplier-quotations",
            "/api/inventory/analytics",
            "/api/settings/procurement",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
