// src/services/rbac_service.rs

use uuid::Uuid;
use crate::common::error::AppError;
use crate::db::RbacRepository;
use crate::models::rbac::Permission;

#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
}

impl RbacService {
    pub fn new(repo: RbacRepository) -> Self {
        Self { repo }
    }

    pub async fn list_system_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.repo.list_all_permissions().await
    }

    pub async fn ensure_member(&self, user_id: Uuid, organization_id: Uuid) -> Result<(), AppError> {
        if !self.repo.is_active_member(user_id, organization_id).await? {
            tracing::warn!(user_id = %user_id, organization_id = %organization_id, "acesso a organização negado");
            return Err(AppError::NotOrganizationMember);
        }
        Ok(())
    }

    /// hasPermission(user, module, action); nega com 403 quando ausente.
    pub async fn ensure_permission(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        module: &str,
        action: &str,
    ) -> Result<(), AppError> {
        let allowed = self
            .repo
            .user_has_permission(user_id, organization_id, module, action)
            .await?;

        if !allowed {
            return Err(AppError::PermissionDenied(format!("{}:{}", module, action)));
        }
        Ok(())
    }
}
