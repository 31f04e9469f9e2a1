//! Card application entity - A member's self-service request for a card.
//!
//! Applications start as NEW and either get approved (consuming a card and
//! linking the created assignment) or rejected. Once approved, the
//! authoritative pledge values live on the assignment and the application's
//! own pledge fields are zeroed.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a card application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum ApplicationStatus {
    /// Awaiting manual or automatic approval
    #[sea_orm(string_value = "NEW")]
    #[default]
    New,
    /// Approved; `assignment_id` is set and the status is terminal
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    /// Rejected; the member may submit a fresh application
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// Card application database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_applications")]
pub struct Model {
    /// Unique identifier for the application
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Member account the application was resolved to, if any
    pub member_id: Option<i64>,
    /// Applicant's full name
    pub full_name: String,
    /// Applicant's phone number
    pub phone_number: String,
    /// Street the applicant wants a card on
    pub street_id: i64,
    /// Preferred card number, if the applicant stated one
    pub preferred_number: Option<i32>,
    /// Free-text note; rejection reasons are appended here
    #[sea_orm(column_type = "Text")]
    pub note: String,
    /// Requested ahadi pledge; zeroed once approved
    pub pledged_ahadi: Decimal,
    /// Requested shukrani pledge; zeroed once approved
    pub pledged_shukrani: Decimal,
    /// Requested majengo pledge; zeroed once approved
    pub pledged_majengo: Decimal,
    /// Assignment created at approval; set exactly once
    pub assignment_id: Option<i64>,
    /// Current lifecycle status
    pub status: ApplicationStatus,
    /// When the application was submitted
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Application and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each application targets one street
    #[sea_orm(
        belongs_to = "super::street::Entity",
        from = "Column::StreetId",
        to = "super::street::Column::Id"
    )]
    Street,
    /// Optional link to the applicant's member account
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
    /// Assignment created when the application was approved
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,
}

impl Related<super::street::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Street.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
