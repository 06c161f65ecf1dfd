// src/handlers/reorder_rules.rs

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
        rbac::{PermInventoryRead, PermInventoryWrite, RequirePermission},
    },
    models::{
        procurement::{CreateReorderRuleRequest, ReorderRule, UpdateReorderRuleRequest},
        tenancy::RequestContext,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRuleListQuery {
    pub product_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/reorder-rules",
    tag = "Inventory",
    params(
        ReorderRuleListQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Regras de reposição", body = Vec<ReorderRule>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_reorder_rules(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermInventoryRead>,
    Query(query): Query<ReorderRuleListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let rules = app_state
        .reorder_service
        .list_rules(&ctx, query.product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(rules)))
}

#[utoipa::path(
    post,
    path = "/api/reorder-rules",
    tag = "Inventory",
    request_body = CreateReorderRuleRequest,
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 201, description = "Regra criada", body = ReorderRule),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Já existe regra para o produto/depósito")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_reorder_rule(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermInventoryWrite>,
    Json(payload): Json<CreateReorderRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rule = app_state
        .reorder_service
        .create_rule(&ctx, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::CREATED, Json(rule)))
}

#[utoipa::path(
    put,
    path = "/api/reorder-rules/{id}",
    tag = "Inventory",
    request_body = UpdateReorderRuleRequest,
    params(
        ("id" = Uuid, Path, description = "ID da regra"),
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Regra atualizada", body = ReorderRule),
        (status = 404, description = "Regra não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_reorder_rule(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermInventoryWrite>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateReorderRuleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let rule = app_state
        .reorder_service
        .update_rule(&ctx, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(rule)))
}
