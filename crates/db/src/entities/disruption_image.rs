//! Disruption image entity.
//!
//! Evidence images owned by a disruption; removed with it (cascade).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disruption_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub disruption_id: String,

    pub url: String,

    #[sea_orm(nullable)]
    pub filename: Option<String>,

    #[sea_orm(nullable)]
    pub filesize: Option<String>,

    pub uploaded_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::disruption::Entity",
        from = "Column::DisruptionId",
        to = "super::disruption::Column::Id"
    )]
    Disruption,
}

impl Related<super::disruption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disruption.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
