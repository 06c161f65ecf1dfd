// src/handlers/purchase_orders.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermPurchasingRead, PermPurchasingWrite, RequirePermission},
    },
    models::{
        procurement::{
            CreatePurchaseOrderRequest, PurchaseOrder, PurchaseOrderCreated, PurchaseOrderDetail,
            PurchaseOrderStatus,
        },
        tenancy::RequestContext,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PurchaseOrderListQuery {
    pub status: Option<PurchaseOrderStatus>,
}

#[utoipa::path(
    get,
    path = "/api/purchase-orders",
    tag = "Purchasing",
    params(
        PurchaseOrderListQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Pedidos de compra", body = Vec<PurchaseOrder>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_purchase_orders(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingRead>,
    Query(query): Query<PurchaseOrderListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let orders = app_state
        .purchase_order_service
        .list(&ctx, query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(orders)))
}

#[utoipa::path(
    get,
    path = "/api/purchase-orders/{id}",
    tag = "Purchasing",
    params(
        ("id" = Uuid, Path, description = "ID do pedido"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Pedido com linhas", body = PurchaseOrderDetail),
        (status = 404, description = "Pedido não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_purchase_order(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .purchase_order_service
        .get(&ctx, id)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(order)))
}

#[utoipa::path(
    post,
    path = "/api/purchase-orders",
    tag = "Purchasing",
    request_body = CreatePurchaseOrderRequest,
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 201, description = "Pedido criado", body = PurchaseOrderCreated),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Fornecedor, depósito ou produto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_purchase_order(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingWrite>,
    Json(payload): Json<CreatePurchaseOrderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let created = app_state
        .purchase_order_service
        .create_manual(&ctx, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::CREATED, Json(created)))
}
