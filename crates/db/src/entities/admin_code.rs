//! Admin code entity.
//!
//! Recognition codes handed out per department; redeeming one promotes a
//! user to admin scoped to that department.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "admin_code")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Department the code grants admin scope over
    pub department_id: String,

    #[sea_orm(indexed)]
    pub code: String,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub expires_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
