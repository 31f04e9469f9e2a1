//! Offering card entity - A numbered card bound to one street.
//!
//! Cards are reusable across years. `is_taken`, `assigned_member_id`, and
//! `assigned_at` mirror the current-year assignment only; assignments for
//! other years never touch them. The `(street_id, number)` pair is unique
//! (enforced by a composite index created alongside the schema) and `code`
//! never changes once set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Offering card database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offering_cards")]
pub struct Model {
    /// Unique identifier for the card
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Street this card belongs to
    pub street_id: i64,
    /// Card number, unique within the street
    pub number: i32,
    /// Derived card code like `PE-007`, unique church-wide
    #[sea_orm(unique)]
    pub code: String,
    /// Whether the card is occupied for the current calendar year
    pub is_taken: bool,
    /// Member holding the card this year, if linked to an account
    pub assigned_member_id: Option<i64>,
    /// When the current-year assignment was made
    pub assigned_at: Option<DateTimeUtc>,
    /// When the card was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Card and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each card belongs to one street
    #[sea_orm(
        belongs_to = "super::street::Entity",
        from = "Column::StreetId",
        to = "super::street::Column::Id"
    )]
    Street,
    /// One card has many year-scoped assignments
    #[sea_orm(has_many = "super::assignment::Entity")]
    Assignments,
    /// One card has many offering entries
    #[sea_orm(has_many = "super::entry::Entity")]
    Entries,
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

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
