//! Card assignment entity - Binds a card to a payer for one fiscal year.
//!
//! Each assignment carries the year's three pledge targets as fixed-point
//! decimals. At most one assignment exists per `(card_id, year)` pair,
//! enforced by a composite unique index. A name/phone may be recorded
//! without a linked member account.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Card assignment database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "card_assignments")]
pub struct Model {
    /// Unique identifier for the assignment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Card being assigned
    pub card_id: i64,
    /// Member account, if the payer has one
    pub member_id: Option<i64>,
    /// Payer's full name as recorded on the card
    pub full_name: String,
    /// Payer's phone number
    pub phone_number: String,
    /// Fiscal year this assignment covers
    pub year: i32,
    /// Pledged ahadi amount for the year
    pub pledged_ahadi: Decimal,
    /// Pledged shukrani amount for the year
    pub pledged_shukrani: Decimal,
    /// Pledged majengo amount for the year
    pub pledged_majengo: Decimal,
    /// Whether the assignment is active; inactive rows are kept for history
    pub active: bool,
    /// When the assignment was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Assignment and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each assignment belongs to one card
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id"
    )]
    Card,
    /// Optional link to the member account
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::MemberId",
        to = "super::member::Column::Id"
    )]
    Member,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::member::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Member.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
