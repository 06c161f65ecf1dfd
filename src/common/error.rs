// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro interno. Os handlers convertem para ApiError na borda.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Campo obrigatório ausente: {0}")]
    MissingField(&'static str),

    #[error("Transição inválida de {entity}: {from} -> {to}")]
    InvalidStatusTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Nenhum fornecedor ativo para o produto {0}")]
    NoSupplierForProduct(String),

    #[error("Valor fora do intervalo suportado")]
    AmountOutOfRange,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cabeçalho de organização ausente")]
    MissingOrganization,

    #[error("Cabeçalho de organização inválido")]
    InvalidOrganizationHeader,

    #[error("Usuário não pertence à organização")]
    NotOrganizationMember,

    #[error("Permissão ausente: {0}")]
    PermissionDenied(String),

    #[error("Sugestão não encontrada")]
    SuggestionNotFound,

    #[error("Cotação não encontrada")]
    QuotationNotFound,

    #[error("Pedido de compra não encontrado")]
    PurchaseOrderNotFound,

    #[error("Regra de reposição não encontrada")]
    ReorderRuleNotFound,

    #[error("Fornecedor não encontrado")]
    SupplierNotFound,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Depósito não encontrado")]
    WarehouseNotFound,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Formato de erro que sai na resposta HTTP: `{error, details?}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MissingField(_)
            | AppError::InvalidStatusTransition { .. }
            | AppError::NoSupplierForProduct(_)
            | AppError::AmountOutOfRange
            | AppError::MissingOrganization
            | AppError::InvalidOrganizationHeader => StatusCode::BAD_REQUEST,
            AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotOrganizationMember | AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::SuggestionNotFound
            | AppError::QuotationNotFound
            | AppError::PurchaseOrderNotFound
            | AppError::ReorderRuleNotFound
            | AppError::SupplierNotFound
            | AppError::ProductNotFound
            | AppError::WarehouseNotFound => StatusCode::NOT_FOUND,
            AppError::UniqueConstraintViolation(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self, locale: &Locale) -> String {
        let pt = locale.is_portuguese();
        let text = |en: &str, pt_text: &str| if pt { pt_text.to_string() } else { en.to_string() };

        match self {
            AppError::ValidationError(_) => text(
                "One or more fields are invalid.",
                "Um ou mais campos são inválidos.",
            ),
            AppError::MissingField(field) => {
                if pt {
                    format!("O campo '{}' é obrigatório.", field)
                } else {
                    format!("The field '{}' is required.", field)
                }
            }
            AppError::InvalidStatusTransition { entity, from, to } => {
                if pt {
                    format!("Não é possível mudar {} de '{}' para '{}'.", entity, from, to)
                } else {
                    format!("Cannot change {} from '{}' to '{}'.", entity, from, to)
                }
            }
            AppError::NoSupplierForProduct(product) => {
                if pt {
                    format!(
                        "Nenhum fornecedor ativo para '{}'. Vincule um fornecedor ao produto primeiro.",
                        product
                    )
                } else {
                    format!(
                        "No active supplier found for '{}'. Please assign a supplier to this product first.",
                        product
                    )
                }
            }
            AppError::AmountOutOfRange => text(
                "The order amounts exceed the supported range.",
                "Os valores do pedido excedem o intervalo suportado.",
            ),
            AppError::InvalidToken => text(
                "Invalid or missing authentication token.",
                "Token de autenticação inválido ou ausente.",
            ),
            AppError::MissingOrganization => text(
                "The x-organization-id header is required.",
                "O cabeçalho x-organization-id é obrigatório.",
            ),
            AppError::InvalidOrganizationHeader => text(
                "The x-organization-id header is not a valid UUID.",
                "O cabeçalho x-organization-id não é um UUID válido.",
            ),
            AppError::NotOrganizationMember | AppError::PermissionDenied(_) => {
                text("Access denied.", "Acesso negado.")
            }
            AppError::SuggestionNotFound => text(
                "Purchase order suggestion not found.",
                "Sugestão de compra não encontrada.",
            ),
            AppError::QuotationNotFound => text("Quotation not found.", "Cotação não encontrada."),
            AppError::PurchaseOrderNotFound => text(
                "Purchase order not found.",
                "Pedido de compra não encontrado.",
            ),
            AppError::ReorderRuleNotFound => text(
                "Reorder rule not found.",
                "Regra de reposição não encontrada.",
            ),
            AppError::SupplierNotFound => text("Supplier not found.", "Fornecedor não encontrado."),
            AppError::ProductNotFound => text("Product not found.", "Produto não encontrado."),
            AppError::WarehouseNotFound => text("Warehouse not found.", "Depósito não encontrado."),
            AppError::UniqueConstraintViolation(what) => {
                if pt {
                    format!("Registro duplicado: {}.", what)
                } else {
                    format!("Duplicate record: {}.", what)
                }
            }
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => text(
                "An unexpected error occurred.",
                "Ocorreu um erro inesperado.",
            ),
        }
    }

    /// Converte para o formato da API. `expose_details` só deve ser `true` fora de produção.
    pub fn to_api_error(&self, locale: &Locale, expose_details: bool) -> ApiError {
        let status = self.status();

        let details = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {}", self);
                expose_details.then(|| Value::String(self.to_string()))
            }
            AppError::PermissionDenied(slug) => {
                tracing::warn!(permission = %slug, "acesso negado");
                None
            }
            _ => None,
        };

        ApiError {
            status,
            error: self.message(locale),
            details,
        }
    }
}

// Usado pelos middlewares, que não têm acesso ao idioma nem à configuração.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), false).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_http_status() {
        assert_eq!(AppError::MissingField("id").status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::NoSupplierForProduct("Widget".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::AmountOutOfRange.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::PermissionDenied("purchasing:approve".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::SuggestionNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::DatabaseError(sqlx::Error::RowNotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn hides_internal_details_unless_exposed() {
        let err = AppError::InternalServerError(anyhow::anyhow!("pool exhausted"));

        let hidden = err.to_api_error(&Locale::default(), false);
        assert!(hidden.details.is_none());
        assert_eq!(hidden.error, "An unexpected error occurred.");

        let exposed = err.to_api_error(&Locale::default(), true);
        let details = exposed.details.expect("details in development");
        assert!(details.as_str().unwrap_or_default().contains("pool exhausted"));
    }

    #[test]
    fn permission_denial_does_not_leak_the_capability() {
        let api = AppError::PermissionDenied("purchasing:approve".into())
            .to_api_error(&Locale::default(), true);
        assert_eq!(api.error, "Access denied.");
        assert!(api.details.is_none());
    }

    #[test]
    fn no_supplier_message_is_actionable_and_localized() {
        let err = AppError::NoSupplierForProduct("Widget".into());
        let en = err.to_api_error(&Locale::default(), false);
        assert!(en.error.contains("assign a supplier"));

        let pt = err.to_api_error(&Locale("pt".into()), false);
        assert!(pt.error.contains("Vincule um fornecedor"));
    }
}
