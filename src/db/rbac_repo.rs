// src/db/rbac_repo.rs

use sqlx::PgPool;
use uuid::Uuid;
use crate::common::error::AppError;
use crate::models::rbac::Permission;

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listar todas as permissões disponíveis (para o Frontend montar a tela)
    pub async fn list_all_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>(
            "SELECT id, module, action, description FROM permissions ORDER BY module, action",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(permissions)
    }

    pub async fn is_active_member(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organization_members
                WHERE user_id = $1 AND organization_id = $2 AND is_active = true
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// hasPermission(user, module, action) dentro da organização
    pub async fn user_has_permission(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
        module: &str,
        action: &str,
    ) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM organization_members om
                JOIN roles r ON om.role_id = r.id
                JOIN role_permissions rp ON r.id = rp.role_id
                JOIN permissions p ON rp.permission_id = p.id
                WHERE om.user_id = $1
                  AND om.organization_id = $2
                  AND om.is_active = true
                  AND p.module = $3
                  AND p.action = $4
            )
            "#,
        )
        .bind(user_id)
        .bind(organization_id)
        .bind(module)
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
