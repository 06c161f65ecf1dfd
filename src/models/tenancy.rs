// src/models/tenancy.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---
// Contexto explícito da requisição
// ---
// Organização + usuário que executam a operação. Os serviços recebem este
// objeto em vez de ler estado global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub organization_id: Uuid,
    pub user_id: Uuid,
}

impl RequestContext {
    pub fn new(organization_id: Uuid, user_id: Uuid) -> Self {
        Self {
            organization_id,
            user_id,
        }
    }
}
