// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::tenancy::RequestContext,
};

// O nome do nosso cabeçalho HTTP customizado
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

// Organização já validada pelo guard
#[derive(Debug, Clone, Copy)]
pub struct OrganizationContext(pub Uuid);

/// Lê e valida o cabeçalho x-organization-id.
pub fn organization_from_headers(headers: &HeaderMap) -> Result<Uuid, AppError> {
    let value = headers
        .get(ORGANIZATION_ID_HEADER)
        .ok_or(AppError::MissingOrganization)?;

    let value_str = value
        .to_str()
        .map_err(|_| AppError::InvalidOrganizationHeader)?;

    Uuid::parse_str(value_str.trim()).map_err(|_| AppError::InvalidOrganizationHeader)
}

impl<S> FromRequestParts<S> for OrganizationContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<OrganizationContext>()
            .copied()
            .ok_or(AppError::MissingOrganization)
    }
}

// Handlers recebem o contexto explícito (organização + usuário)
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;
        let organization = OrganizationContext::from_request_parts(parts, state).await?;
        Ok(RequestContext::new(organization.0, user.0.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_organization_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(ORGANIZATION_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(organization_from_headers(&headers).unwrap(), id);
    }

    #[test]
    fn missing_or_malformed_header_is_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            organization_from_headers(&headers),
            Err(AppError::MissingOrganization)
        ));

        let mut headers = HeaderMap::new();
        headers.insert(ORGANIZATION_ID_HEADER, HeaderValue::from_static("loja-1"));
        assert!(matches!(
            organization_from_headers(&headers),
            Err(AppError::InvalidOrganizationHeader)
        ));
    }
}
