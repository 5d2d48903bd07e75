//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User roles.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Subject id issued by the identity provider.
    /// NULL until the record is linked on first login.
    #[sea_orm(unique, nullable)]
    pub auth_uid: Option<String>,

    #[sea_orm(unique)]
    pub email: String,

    pub role: Role,

    /// Department scope for admins (references department)
    #[sea_orm(nullable)]
    pub admin_department: Option<String>,

    /// Display name
    #[sea_orm(nullable)]
    pub name: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::disruption::Entity")]
    Disruptions,
}

impl Related<super::disruption::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Disruptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
