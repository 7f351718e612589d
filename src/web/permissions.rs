//! Server-side role and station authorization.
//!
//! Admins see and manage everything. Users and Guests are confined to the
//! station ids on their user record, and Guests can never mutate. Handlers
//! authorize here after the auth middleware has established identity.

use sea_orm::DatabaseConnection;

use crate::db::enums::UserRole;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::AuthenticatedUser;

/// A caller's effective station visibility, resolved from the user row so a
/// permission edit applies to in-flight tokens.
#[derive(Debug, Clone)]
pub struct PermissionScope {
    pub role: UserRole,
    permitted: Vec<String>,
}

impl PermissionScope {
    pub fn new(role: UserRole, permitted: Vec<String>) -> Self {
        PermissionScope { role, permitted }
    }

    pub fn can_access_station(&self, station_id: &str) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::User | UserRole::Guest => {
                self.permitted.iter().any(|id| id == station_id)
            }
        }
    }

    /// `None` means unrestricted (admin); otherwise the permitted id set for
    /// narrowing queries.
    pub fn station_filter(&self) -> Option<&[String]> {
        match self.role {
            UserRole::Admin => None,
            UserRole::User | UserRole::Guest => Some(&self.permitted),
        }
    }
}

pub fn can_edit_data(role: UserRole) -> bool {
    role != UserRole::Guest
}

pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.role == UserRole::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("administrator access required".to_string()))
    }
}

/// Guests are read-only everywhere.
pub fn require_editor(user: &AuthenticatedUser) -> Result<(), AppError> {
    if can_edit_data(user.role) {
        Ok(())
    } else {
        Err(AppError::Forbidden("read-only account".to_string()))
    }
}

/// Resolves the caller's scope. Admins skip the user lookup; non-admins read
/// their current permitted list from the database.
pub async fn load_scope(
    db: &DatabaseConnection,
    user: &AuthenticatedUser,
) -> Result<PermissionScope, AppError> {
    if user.role == UserRole::Admin {
        return Ok(PermissionScope::new(UserRole::Admin, Vec::new()));
    }

    let model = user_service::get_user_by_id(db, &user.id)
        .await?
        .ok_or(AppError::InvalidCredentials)?;
    Ok(PermissionScope::new(user.role, model.permitted_ids()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(role: UserRole, ids: &[&str]) -> PermissionScope {
        PermissionScope::new(role, ids.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn admin_accesses_every_station() {
        let s = scope(UserRole::Admin, &[]);
        assert!(s.can_access_station("weather-1"));
        assert!(s.can_access_station("soil-9"));
        assert!(s.station_filter().is_none());
    }

    #[test]
    fn user_is_confined_to_permitted_ids() {
        let s = scope(UserRole::User, &["weather-1", "soil-1"]);
        assert!(s.can_access_station("weather-1"));
        assert!(!s.can_access_station("weather-2"));
        assert_eq!(s.station_filter().unwrap().len(), 2);
    }

    #[test]
    fn guest_with_empty_list_sees_nothing() {
        let s = scope(UserRole::Guest, &[]);
        assert!(!s.can_access_station("weather-1"));
        assert_eq!(s.station_filter().unwrap().len(), 0);
    }

    #[test]
    fn only_guests_are_read_only() {
        assert!(can_edit_data(UserRole::Admin));
        assert!(can_edit_data(UserRole::User));
        assert!(!can_edit_data(UserRole::Guest));
    }
}
