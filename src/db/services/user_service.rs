use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, Order, QueryFilter,
    QueryOrder, Set,
};
use serde_json::json;

use crate::db::entities::prelude::*;
use crate::db::entities::user;
use crate::db::enums::UserRole;
use crate::db::new_id;

pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>, DbErr> {
    User::find()
        .order_by(UserColumn::Username, Order::Asc)
        .all(db)
        .await
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find_by_id(user_id).one(db).await
}

pub async fn get_user_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> Result<Option<user::Model>, DbErr> {
    User::find()
        .filter(UserColumn::Username.eq(username))
        .one(db)
        .await
}

#[allow(clippy::too_many_arguments)]
pub async fn create_user(
    db: &DatabaseConnection,
    username: &str,
    password_hash: &str,
    role: UserRole,
    full_name: &str,
    email: &str,
    is_enabled: bool,
    permitted_station_ids: &[String],
) -> Result<user::Model, DbErr> {
    user::ActiveModel {
        id: Set(new_id("user")),
        username: Set(username.to_string()),
        password_hash: Set(password_hash.to_string()),
        role: Set(role),
        full_name: Set(full_name.to_string()),
        email: Set(email.to_string()),
        is_enabled: Set(is_enabled),
        permitted_station_ids: Set(json!(permitted_station_ids)),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
}

/// Returns the number of rows removed (0 when the user does not exist).
pub async fn delete_user(db: &DatabaseConnection, user_id: &str) -> Result<u64, DbErr> {
    let res = User::delete_by_id(user_id).exec(db).await?;
    Ok(res.rows_affected)
}
