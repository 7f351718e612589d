pub mod activity_routes;
pub mod export_routes;
pub mod reading_routes;
pub mod sim_routes;
pub mod station_routes;
pub mod user_routes;
