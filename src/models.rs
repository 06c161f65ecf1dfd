// src/models.rs

pub mod analytics;
pub mod auth;
pub mod documents;
pub mod procurement;
pub mod rbac;
pub mod settings;
pub mod supplier_portal;
pub mod tenancy;
