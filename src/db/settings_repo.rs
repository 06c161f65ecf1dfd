// src/db/settings_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::settings::{ProcurementSettings, UpdateSettingsRequest},
};

const SETTINGS_COLUMNS: &str = r#"
    organization_id, default_tax_rate, critical_days_threshold,
    default_payment_terms_days, default_currency, consumption_window_days, updated_at
"#;

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_settings<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<ProcurementSettings, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Organização sem linha própria usa a política padrão
        let settings = sqlx::query_as::<_, ProcurementSettings>(&format!(
            "SELECT {} FROM organization_settings WHERE organization_id = $1",
            SETTINGS_COLUMNS
        ))
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        Ok(settings.unwrap_or_else(|| ProcurementSettings::defaults_for(organization_id)))
    }

    /// Leitura fora de transação (relatórios, tela de configurações).
    pub async fn get_settings_standalone(
        &self,
        organization_id: Uuid,
    ) -> Result<ProcurementSettings, AppError> {
        self.get_settings(&self.pool, organization_id).await
    }

    pub async fn update_settings(
        &self,
        organization_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<ProcurementSettings, AppError> {
        // UPSERT (Insert or Update)
        let settings = sqlx::query_as::<_, ProcurementSettings>(&format!(
            r#"
            INSERT INTO organization_settings (
                organization_id, default_tax_rate, critical_days_threshold,
                default_payment_terms_days, default_currency, consumption_window_days
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (organization_id)
            DO UPDATE SET
                default_tax_rate = EXCLUDED.default_tax_rate,
                critical_days_threshold = EXCLUDED.critical_days_threshold,
                default_payment_terms_days = EXCLUDED.default_payment_terms_days,
                default_currency = EXCLUDED.default_currency,
                consumption_window_days = EXCLUDED.consumption_window_days,
                updated_at = NOW()
            RETURNING {}
            "#,
            SETTINGS_COLUMNS
        ))
        .bind(organization_id)
        .bind(input.default_tax_rate)
        .bind(input.critical_days_threshold)
        .bind(input.default_payment_terms_days)
        .bind(input.default_currency.to_uppercase())
        .bind(input.consumption_window_days)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
