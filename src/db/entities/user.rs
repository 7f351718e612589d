use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::UserRole;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: UserRole,
    pub full_name: String,
    pub email: String,
    pub is_enabled: bool,
    /// JSON array of station ids a non-admin user may read.
    pub permitted_station_ids: Json,
    pub created_at: ChronoDateTimeUtc,
}

impl Model {
    pub fn permitted_ids(&self) -> Vec<String> {
        self.permitted_station_ids
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plot_activity::Entity")]
    PlotActivities,
}

impl Related<super::plot_activity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlotActivities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
