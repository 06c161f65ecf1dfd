// src/db.rs

pub mod analytics_repo;
pub mod purchase_order_repo;
pub mod quotation_repo;
pub mod rbac_repo;
pub mod sequence_repo;
pub mod settings_repo;
pub mod stock_repo;
pub mod suggestion_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepository;
pub use purchase_order_repo::PurchaseOrderRepository;
pub use quotation_repo::QuotationRepository;
pub use rbac_repo::RbacRepository;
pub use sequence_repo::SequenceRepository;
pub use settings_repo::SettingsRepository;
pub use stock_repo::StockRepository;
pub use suggestion_repo::SuggestionRepository;
pub use user_repo::UserRepository;
