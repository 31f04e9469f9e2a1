//! Member entity - A registered congregation member.
//!
//! Authentication, roles, and credentials live in the external auth
//! collaborator; the ledger receives pre-authenticated member ids and only
//! needs identity fields for attribution and the phone-number fallback used
//! by self-service applications.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Member database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    /// Unique identifier for the member
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login email, unique church-wide
    #[sea_orm(unique)]
    pub email: String,
    /// Member's full name
    pub full_name: String,
    /// Phone number, if recorded; used to match unauthenticated applicants
    pub phone_number: Option<String>,
    /// Street the member lives on, if recorded
    pub street_id: Option<i64>,
    /// Whether the account is active
    pub is_active: bool,
    /// When the member was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Member and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Optional home street
    #[sea_orm(
        belongs_to = "super::street::Entity",
        from = "Column::StreetId",
        to = "super::street::Column::Id"
    )]
    Street,
    /// One member has many card assignments over the years
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
}

impl Related<super::street::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Street.def()
    }
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
