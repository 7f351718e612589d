use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::SimStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sim_cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub sim_number: String,
    pub provider: String,
    pub associated_station: Option<String>,
    pub status: SimStatus,
    pub last_communication: Option<ChronoDateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::station::Entity",
        from = "Column::AssociatedStation",
        to = "super::station::Column::Id",
        on_delete = "SetNull"
    )]
    Station,
}

impl Related<super::station::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Station.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
