//! Database service layer: free async functions over the SeaORM entities.
//! Route handlers call these and map `DbErr` into HTTP errors.

pub mod activity_service;
pub mod forecast_service;
pub mod reading_service;
pub mod sim_service;
pub mod station_service;
pub mod user_service;
