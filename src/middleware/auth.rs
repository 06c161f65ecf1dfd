// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::{organization_from_headers, OrganizationContext},
    models::auth::User,
};

// Guarda das rotas de negócio: token -> organização -> vínculo ativo.
// Deixa AuthenticatedUser e OrganizationContext nas extensions da requisição.
pub async fn organization_guard(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::InvalidToken)?;

    // Checagens sem banco primeiro
    let claims = app_state.auth_service.decode_claims(bearer.token())?;
    let organization_id = organization_from_headers(request.headers())?;

    let user = app_state.auth_service.load_user(&claims).await?;

    app_state
        .rbac_service
        .ensure_member(user.id, organization_id)
        .await?;

    // Insere o usuário e a organização nos "extensions" da requisição
    request.extensions_mut().insert(AuthenticatedUser(user));
    request
        .extensions_mut()
        .insert(OrganizationContext(organization_id));

    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::InvalidToken)
    }
}
