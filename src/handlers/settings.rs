// src/handlers/settings.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermSettingsWrite, RequirePermission},
        tenancy::OrganizationContext,
    },
    models::settings::{ProcurementSettings, UpdateSettingsRequest},
};

// GET /api/settings/procurement
#[utoipa::path(
    get,
    path = "/api/settings/procurement",
    tag = "Settings",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Política de compras (padrões quando nunca configurada)", body = ProcurementSettings)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    organization: OrganizationContext,
) -> Result<impl IntoResponse, ApiError> {
    let settings = app_state
        .settings_repo
        .get_settings_standalone(organization.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings/procurement
#[utoipa::path(
    put,
    path = "/api/settings/procurement",
    tag = "Settings",
    request_body = UpdateSettingsRequest,
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Política atualizada", body = ProcurementSettings),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    organization: OrganizationContext,
    _guard: RequirePermission<PermSettingsWrite>,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let expose = app_state.config.expose_error_details;

    // Validação padrão do Validator
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, expose))?;

    let updated = app_state
        .settings_repo
        .update_settings(organization.0, &payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, expose))?;

    tracing::info!(organization_id = %organization.0, "política de compras atualizada");

    Ok((StatusCode::OK, Json(updated)))
}
