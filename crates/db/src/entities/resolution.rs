//! Resolution entity.
//!
//! Append-only record of resolve actions. Only the latest is reflected in
//! the disruption's status.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resolution")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Resolved disruption's storage id
    #[sea_orm(indexed)]
    pub disruption_id: String,

    /// Resolving admin's local user id
    pub resolved_by: String,

    #[sea_orm(column_type = "Text")]
    pub resolution_description: String,

    #[sea_orm(nullable)]
    pub resolution_image_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,
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
