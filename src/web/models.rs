use serde::{Deserialize, Serialize};

use crate::db::enums::UserRole;
use crate::db::models::UserDto;

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserDto,
}

// JWT claims. Role rides along so route guards can authorize without a user
// lookup; station scoping still re-reads the user row (see web::permissions).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: String,
    pub role: UserRole,
    pub exp: usize,
}

/// Authenticated caller details, inserted as a request extension by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub username: String,
    pub role: UserRole,
}
