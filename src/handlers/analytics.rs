// src/handlers/analytics.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

use crate::{
    config::AppState,
    middleware::rbac::{PermInventoryRead, PermPurchasingRead, PermSalesRead, RequirePermission},
    models::{
        analytics::{InventoryAnalytics, PurchasingAnalytics, SalesAnalytics},
        tenancy::RequestContext,
    },
};

// Relatórios nunca falham por uma seção: o serviço troca a seção com erro pelo padrão

#[utoipa::path(
    get,
    path = "/api/purchasing/analytics",
    tag = "Analytics",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Indicadores de compras", body = PurchasingAnalytics)
    ),
    security(("api_jwt" = []))
)]
pub async fn purchasing_analytics(
    State(app_state): State<AppState>,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingRead>,
) -> impl IntoResponse {
    let report = app_state.analytics_service.purchasing(ctx.organization_id).await;
    (StatusCode::OK, Json(report))
}

#[utoipa::path(
    get,
    path = "/api/sales/analytics",
    tag = "Analytics",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Indicadores de vendas", body = SalesAnalytics)
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_analytics(
    State(app_state): State<AppState>,
    ctx: RequestContext,
    _guard: RequirePermission<PermSalesRead>,
) -> impl IntoResponse {
    let report = app_state.analytics_service.sales(ctx.organization_id).await;
    (StatusCode::OK, Json(report))
}

#[utoipa::path(
    get,
    path = "/api/inventory/analytics",
    tag = "Analytics",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Indicadores de estoque e curva ABC", body = InventoryAnalytics)
    ),
    security(("api_jwt" = []))
)]
pub async fn inventory_analytics(
    State(app_state): State<AppState>,
    ctx: RequestContext,
    _guard: RequirePermission<PermInventoryRead>,
) -> impl IntoResponse {
    let report = app_state.analytics_service.inventory(ctx.organization_id).await;
    (StatusCode::OK, Json(report))
}
