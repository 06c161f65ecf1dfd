// src/handlers/po_suggestions.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermPurchasingApprove, PermPurchasingRead, PermPurchasingWrite, RequirePermission},
    },
    models::{
        procurement::{
            GenerationResult, SuggestionDecision, SuggestionStatus, SuggestionStatusFilter,
            SuggestionView,
        },
        tenancy::RequestContext,
    },
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionListQuery {
    /// pending (padrão), approved, rejected, ordered ou all
    pub status: Option<SuggestionStatusFilter>,
}

// Campos opcionais para devolver 400 nomeando o campo que faltou
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSuggestionPayload {
    pub id: Option<Uuid>,
    /// approved ou rejected
    pub status: Option<SuggestionStatus>,
    pub notes: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/po-suggestions",
    tag = "Purchasing",
    params(
        SuggestionListQuery,
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Sugestões por prioridade e urgência", body = Vec<SuggestionView>),
        (status = 403, description = "Sem permissão purchasing:read")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_suggestions(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingRead>,
    Query(query): Query<SuggestionListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query.status.unwrap_or_default().status();

    let suggestions = app_state
        .suggestion_service
        .list(&ctx, status)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(suggestions)))
}

#[utoipa::path(
    post,
    path = "/api/po-suggestions",
    tag = "Purchasing",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Geração concluída", body = GenerationResult),
        (status = 403, description = "Sem permissão purchasing:write")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_suggestions(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingWrite>,
) -> Result<impl IntoResponse, ApiError> {
    let result = app_state
        .suggestion_service
        .generate(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(result)))
}

#[utoipa::path(
    put,
    path = "/api/po-suggestions",
    tag = "Purchasing",
    request_body = UpdateSuggestionPayload,
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Sugestão decidida; pedido criado quando aprovada", body = SuggestionDecision),
        (status = 400, description = "Transição inválida ou produto sem fornecedor"),
        (status = 404, description = "Sugestão não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_suggestion(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    _guard: RequirePermission<PermPurchasingApprove>,
    Json(payload): Json<UpdateSuggestionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let expose = app_state.config.expose_error_details;

    let id = payload
        .id
        .ok_or_else(|| AppError::MissingField("id").to_api_error(&locale, expose))?;
    let status = payload
        .status
        .ok_or_else(|| AppError::MissingField("status").to_api_error(&locale, expose))?;

    let decision = app_state
        .suggestion_service
        .set_status(&ctx, id, status, payload.notes)
        .await
        .map_err(|e| e.to_api_error(&locale, expose))?;

    Ok((StatusCode::OK, Json(decision)))
}
