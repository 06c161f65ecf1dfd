// src/handlers.rs

pub mod analytics;
pub mod po_suggestions;
pub mod purchase_orders;
pub mod rbac;
pub mod reorder_rules;
pub mod settings;
pub mod supplier_quotations;
