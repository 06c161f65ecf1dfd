// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, tenancy::OrganizationContext},
};

/// 1. O Trait que define o que é uma Permissão (módulo + ação)
pub trait PermissionDef: Send + Sync + 'static {
    fn module() -> &'static str;
    fn action() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Extrai Usuário
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        // B. Extrai Organização
        let organization = parts
            .extensions
            .get::<OrganizationContext>()
            .ok_or(AppError::MissingOrganization)?;

        // C. Verifica no Banco
        app_state
            .rbac_service
            .ensure_permission(user.0.id, organization.0, T::module(), T::action())
            .await?;

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

macro_rules! permission {
    ($name:ident, $module:literal, $action:literal) => {
        pub struct $name;
        impl PermissionDef for $name {
            fn module() -> &'static str { $module }
            fn action() -> &'static str { $action }
        }
    };
}

permission!(PermPurchasingRead, "purchasing", "read");
permission!(PermPurchasingWrite, "purchasing", "write");
permission!(PermPurchasingApprove, "purchasing", "approve");
permission!(PermSupplierPortalReview, "supplier_portal", "review");
permission!(PermInventoryRead, "inventory", "read");
permission!(PermInventoryWrite, "inventory", "write");
permission!(PermSalesRead, "sales", "read");
permission!(PermSettingsWrite, "settings", "write");
