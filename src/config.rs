// src/config.rs

use crate::{
    db::{
        AnalyticsRepository, PurchaseOrderRepository, QuotationRepository, RbacRepository,
        SequenceRepository, SettingsRepository, StockRepository, SuggestionRepository,
        UserRepository,
    },
    services::{
        analytics_service::AnalyticsService,
        auth::AuthService,
        notification_service::{LogNotifier, NotificationService, Notifier},
        purchase_order_service::PurchaseOrderService,
        quotation_service::QuotationService,
        rbac_service::RbacService,
        reorder_service::ReorderService,
        suggestion_service::SuggestionService,
    },
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

// Configuração lida do ambiente (.env em desenvolvimento)
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub database_max_connections: u32,
    /// `false` em produção: erros 500 saem sem detalhes
    pub expose_error_details: bool,
    pub notification_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .context("DATABASE_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };

        let notification_timeout_secs: u64 = match env::var("NOTIFICATION_TIMEOUT_SECS") {
            Ok(value) => value
                .parse()
                .context("NOTIFICATION_TIMEOUT_SECS deve ser um número")?,
            Err(_) => 5,
        };

        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            database_max_connections,
            expose_error_details: !app_env.eq_ignore_ascii_case("production"),
            notification_timeout: Duration::from_secs(notification_timeout_secs),
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub settings_repo: SettingsRepository,
    pub reorder_service: ReorderService,
    pub suggestion_service: SuggestionService,
    pub purchase_order_service: PurchaseOrderService,
    pub quotation_service: QuotationService,
    pub analytics_service: AnalyticsService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(db_pool, config, Arc::new(LogNotifier)))
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_parts(db_pool: PgPool, config: AppConfig, notifier: Arc<dyn Notifier>) -> Self {
        let user_repo = UserRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());
        let stock_repo = StockRepository::new(db_pool.clone());
        let suggestion_repo = SuggestionRepository::new(db_pool.clone());
        let po_repo = PurchaseOrderRepository::new(db_pool.clone());
        let quotation_repo = QuotationRepository::new(db_pool.clone());
        let analytics_repo = AnalyticsRepository::new(db_pool.clone());
        let sequence_repo = SequenceRepository::new();

        let notifications = NotificationService::new(notifier, config.notification_timeout);

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone());
        let rbac_service = RbacService::new(rbac_repo);
        let reorder_service =
            ReorderService::new(db_pool.clone(), stock_repo.clone(), settings_repo.clone());
        let purchase_order_service = PurchaseOrderService::new(
            db_pool.clone(),
            po_repo.clone(),
            sequence_repo.clone(),
            settings_repo.clone(),
            stock_repo,
            notifications.clone(),
        );
        let suggestion_service = SuggestionService::new(
            db_pool.clone(),
            suggestion_repo,
            po_repo,
            settings_repo.clone(),
            reorder_service.clone(),
            purchase_order_service.clone(),
        );
        let quotation_service = QuotationService::new(
            db_pool.clone(),
            quotation_repo,
            sequence_repo,
            settings_repo.clone(),
            notifications,
        );
        let analytics_service = AnalyticsService::new(analytics_repo);

        Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            rbac_service,
            settings_repo,
            reorder_service,
            suggestion_service,
            purchase_order_service,
            quotation_service,
            analytics_service,
        }
    }
}
