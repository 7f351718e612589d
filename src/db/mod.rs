use uuid::Uuid;

pub mod entities;
pub mod enums;
pub mod models;
pub mod schema;
pub mod seed;
pub mod services;

/// Generates a `{prefix}-{12 hex}` identifier, the id shape used throughout
/// the schema (`reading-3f9a…`). Fixture ids like `weather-1` are assigned
/// explicitly by callers.
pub fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..12])
}
