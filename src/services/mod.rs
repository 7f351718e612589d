pub mod aggregate;
pub mod agronomy;
pub mod auth_service;
pub mod export_service;
