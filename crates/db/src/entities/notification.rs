//! Notification entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Recipient user ID
    #[sea_orm(indexed)]
    pub user_id: String,

    #[sea_orm(nullable)]
    pub disruption_id: Option<String>,

    /// Delivery channel (currently only `in_app`)
    pub channel: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub payload: Option<String>,

    #[sea_orm(nullable)]
    pub sent_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = false)]
    pub is_read: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
