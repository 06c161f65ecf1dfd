// src/models/rbac.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Capacidade do sistema, no formato módulo + ação ("purchasing" + "approve")
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: Uuid,
    #[schema(example = "purchasing")]
    pub module: String,
    #[schema(example = "approve")]
    pub action: String,
    #[schema(example = "Approve or reject purchase order suggestions")]
    pub description: String,
}
