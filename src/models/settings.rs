// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_TAX_RATE: Decimal = dec!(18);
pub const DEFAULT_CRITICAL_DAYS: i32 = 3;
pub const DEFAULT_PAYMENT_TERMS_DAYS: i32 = 30;
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_CONSUMPTION_WINDOW_DAYS: i32 = 30;

// Política de compras da organização
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementSettings {
    #[schema(ignore)] // O contexto (Header) já define a organização
    pub organization_id: Uuid,

    #[schema(example = "18")]
    pub default_tax_rate: Decimal,

    /// Dias de estoque restantes a partir dos quais a sugestão vira `critical`
    #[schema(example = 3)]
    pub critical_days_threshold: i32,

    #[schema(example = 30)]
    pub default_payment_terms_days: i32,

    #[schema(example = "USD")]
    pub default_currency: String,

    #[schema(example = 30)]
    pub consumption_window_days: i32,

    pub updated_at: Option<DateTime<Utc>>,
}

impl ProcurementSettings {
    pub fn defaults_for(organization_id: Uuid) -> Self {
        Self {
            organization_id,
            default_tax_rate: DEFAULT_TAX_RATE,
            critical_days_threshold: DEFAULT_CRITICAL_DAYS,
            default_payment_terms_days: DEFAULT_PAYMENT_TERMS_DAYS,
            default_currency: DEFAULT_CURRENCY.to_string(),
            consumption_window_days: DEFAULT_CONSUMPTION_WINDOW_DAYS,
            updated_at: None,
        }
    }
}

fn validate_tax_rate(rate: &Decimal) -> Result<(), validator::ValidationError> {
    if rate.is_sign_negative() || *rate > dec!(100) {
        let mut err = validator::ValidationError::new("range");
        err.message = Some("The tax rate must be between 0 and 100.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_tax_rate"))]
    #[schema(example = "18")]
    pub default_tax_rate: Decimal,

    #[validate(range(min = 0, max = 365, message = "Must be between 0 and 365 days."))]
    pub critical_days_threshold: i32,

    #[validate(range(min = 0, max = 365, message = "Must be between 0 and 365 days."))]
    pub default_payment_terms_days: i32,

    #[validate(length(equal = 3, message = "Use an ISO 4217 currency code."))]
    #[schema(example = "USD")]
    pub default_currency: String,

    #[validate(range(min = 1, max = 365, message = "Must be between 1 and 365 days."))]
    pub consumption_window_days: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_policy() {
        let settings = ProcurementSettings::defaults_for(Uuid::nil());
        assert_eq!(settings.default_tax_rate, dec!(18));
        assert_eq!(settings.critical_days_threshold, 3);
        assert_eq!(settings.default_payment_terms_days, 30);
    }

    #[test]
    fn rejects_out_of_range_tax_rate() {
        let request = UpdateSettingsRequest {
            default_tax_rate: dec!(-1),
            critical_days_threshold: 3,
            default_payment_terms_days: 30,
            default_currency: "USD".into(),
            consumption_window_days: 30,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("default_tax_rate"));
    }
}
