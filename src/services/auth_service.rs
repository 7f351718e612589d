use bcrypt::verify;
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use sea_orm::DatabaseConnection;

use crate::db::entities::user;
use crate::db::models::UserDto;
use crate::db::services::user_service;
use crate::web::error::AppError;
use crate::web::models::{Claims, LoginRequest, LoginResponse};

/// Token lifetime; a disabled account keeps an already-issued token until it
/// expires, so this bounds the revocation lag.
const TOKEN_TTL_HOURS: i64 = 24;

pub async fn login_user(
    db: &DatabaseConnection,
    req: LoginRequest,
    jwt_secret: &str,
) -> Result<LoginResponse, AppError> {
    if req.username.is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput(
            "username and password are required".to_string(),
        ));
    }

    let user = user_service::get_user_by_username(db, &req.username)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !user.is_enabled {
        return Err(AppError::InvalidCredentials);
    }

    let valid_password = verify(&req.password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("password verification failed: {e}")))?;
    if !valid_password {
        return Err(AppError::InvalidCredentials);
    }

    create_jwt_for_user(&user, jwt_secret)
}

pub fn create_jwt_for_user(user: &user::Model, jwt_secret: &str) -> Result<LoginResponse, AppError> {
    let expiration = (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize;

    let claims = Claims {
        sub: user.username.clone(),
        user_id: user.id.clone(),
        role: user.role,
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::TokenCreationError(format!("failed to sign token: {e}")))?;

    Ok(LoginResponse {
        token,
        user: UserDto::from(user.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::enums::UserRole;
    use jsonwebtoken::{DecodingKey, Validation, decode};
    use serde_json::json;

    fn sample_user(role: UserRole) -> user::Model {
        user::Model {
            id: "user-abc123".to_string(),
            username: "user1".to_string(),
            password_hash: "unused".to_string(),
            role,
            full_name: "John Farmer".to_string(),
            email: "user1@example.com".to_string(),
            is_enabled: true,
            permitted_station_ids: json!(["weather-1"]),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn issued_token_decodes_back_to_claims() {
        let response = create_jwt_for_user(&sample_user(UserRole::User), "secret").unwrap();
        let data = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret(b"secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, "user1");
        assert_eq!(data.claims.user_id, "user-abc123");
        assert_eq!(data.claims.role, UserRole::User);
        assert_eq!(response.user.permitted_station_ids, vec!["weather-1"]);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let response = create_jwt_for_user(&sample_user(UserRole::Admin), "secret").unwrap();
        let result = decode::<Claims>(
            &response.token,
            &DecodingKey::from_secret(b"different"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
