//! Disruption entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Disruption lifecycle states.
///
/// Transitions are forward-only: `pending` (optionally via `in_progress`)
/// to `resolved`. Nothing moves out of `resolved`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

/// Report priority levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[sea_orm(string_value = "low")]
    Low,
    #[sea_orm(string_value = "medium")]
    Medium,
    #[sea_orm(string_value = "high")]
    High,
}

impl Status {
    /// Wire representation of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

impl Priority {
    /// Parse a caller-supplied priority string.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Wire representation of the priority.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "disruption")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-facing business id, caller-supplied and immutable.
    #[sea_orm(unique)]
    pub disruption_id: String,

    /// Owning student user ID
    #[sea_orm(indexed)]
    pub student_id: String,

    /// Reporter name (denormalized from the submission)
    #[sea_orm(nullable)]
    pub student_name: Option<String>,

    /// Reporter email (denormalized from the submission)
    #[sea_orm(nullable)]
    pub student_email: Option<String>,

    /// Department category (references department)
    #[sea_orm(indexed)]
    pub category: String,

    pub priority: Priority,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub status: Status,

    /// Advisory tone label from the annotator
    #[sea_orm(nullable)]
    pub ai_tone: Option<String>,

    #[sea_orm(nullable)]
    pub ai_confidence: Option<f64>,

    #[sea_orm(column_type = "Text", nullable)]
    pub ai_recommendation: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    /// Set together with `resolved_by` when status flips to resolved
    #[sea_orm(nullable)]
    pub resolved_at: Option<DateTimeWithTimeZone>,

    /// Resolving admin's local user id
    #[sea_orm(nullable)]
    pub resolved_by: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(has_many = "super::resolution::Entity")]
    Resolutions,

    #[sea_orm(has_many = "super::disruption_image::Entity")]
    Images,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::resolution::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resolutions.def()
    }
}

impl Related<super::disruption_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Images.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
