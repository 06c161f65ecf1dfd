// src/handlers/rbac.rs

use axum::{extract::State, Json, response::IntoResponse};
use uuid::Uuid;
use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::i18n::Locale,
    models::rbac::Permission,
};

// GET /api/permissions (Para o frontend saber o que mostrar na tela de papéis)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    params(
        ("x-organization-id" = Uuid, Header, description = "ID da organização")
    ),
    responses(
        (status = 200, description = "Capacidades do sistema", body = Vec<Permission>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .rbac_service
        .list_system_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, app_state.config.expose_error_details))?;

    Ok(Json(permissions))
}
