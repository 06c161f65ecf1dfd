// src/services.rs

pub mod analytics_service;
pub mod auth;
pub mod notification_service;
pub mod pricing;
pub mod purchase_order_service;
pub mod quotation_service;
pub mod rbac_service;
pub mod reorder_service;
pub mod suggestion_service;
