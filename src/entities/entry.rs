//! Offering entry entity - One dated monetary entry against a card.
//!
//! Entries are immutable once created. They attach to the card directly;
//! the payer is attributed at read/sync time via the assignment active for
//! the entry's year, so retroactive assignment changes never rewrite stored
//! history.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Offering category an entry is counted under.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum EntryType {
    /// Yearly pledge offering
    #[sea_orm(string_value = "AHADI")]
    Ahadi,
    /// Thanksgiving offering
    #[sea_orm(string_value = "SHUKRANI")]
    Shukrani,
    /// Building fund offering
    #[sea_orm(string_value = "MAJENGO")]
    Majengo,
}

impl EntryType {
    /// Stable string form, matching the stored database value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ahadi => "AHADI",
            Self::Shukrani => "SHUKRANI",
            Self::Majengo => "MAJENGO",
        }
    }
}

/// Offering entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offering_entries")]
pub struct Model {
    /// Unique identifier for the entry
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Card the entry was recorded against
    pub card_id: i64,
    /// Offering category
    pub entry_type: EntryType,
    /// Amount offered, always positive
    pub amount: Decimal,
    /// Date the offering was made
    pub date: Date,
    /// Batch this entry was recorded in, if any
    pub batch_id: Option<i64>,
    /// When the entry row was created
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Entry and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each entry belongs to one card
    #[sea_orm(
        belongs_to = "super::card::Entity",
        from = "Column::CardId",
        to = "super::card::Column::Id"
    )]
    Card,
    /// Optional owning batch
    #[sea_orm(
        belongs_to = "super::batch::Entity",
        from = "Column::BatchId",
        to = "super::batch::Column::Id"
    )]
    Batch,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Card.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batch.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
