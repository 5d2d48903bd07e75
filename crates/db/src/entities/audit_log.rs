//! Audit log entity.
//!
//! Best-effort trail of state-changing actions; never read on a hot path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Acting user's local id
    #[sea_orm(nullable)]
    pub actor_id: Option<String>,

    pub action: String,

    #[sea_orm(nullable)]
    pub target_table: Option<String>,

    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub meta: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
