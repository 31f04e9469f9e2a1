//! Ledger outbox entity - Durable queue of entries awaiting the legacy
//! ledger mirror.
//!
//! A PENDING row is written in the same transaction as its offering entry,
//! so a crash between the primary commit and the mirror attempt can never
//! silently lose the mirror. A separate worker drains PENDING rows with a
//! bounded retry budget.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::batch::MassType;

/// Mirror progress of an outbox row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum SyncStatus {
    /// Not yet mirrored
    #[sea_orm(string_value = "PENDING")]
    #[default]
    Pending,
    /// Mirrored into the legacy ledger
    #[sea_orm(string_value = "DONE")]
    Done,
    /// Retry budget exhausted; requires operator attention
    #[sea_orm(string_value = "FAILED")]
    Failed,
}

/// Ledger outbox database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ledger_outbox")]
pub struct Model {
    /// Unique identifier for the outbox row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Offering entry to mirror
    pub entry_id: i64,
    /// Service context carried from the batch, absent for single entries
    pub mass_type: Option<MassType>,
    /// Mirror progress
    pub status: SyncStatus,
    /// Number of mirror attempts made so far
    pub attempts: i32,
    /// Message from the most recent failed attempt
    pub last_error: Option<String>,
    /// When the row was enqueued
    pub created_at: DateTimeUtc,
    /// When the row was successfully mirrored
    pub processed_at: Option<DateTimeUtc>,
}

/// Defines relationships between Outbox and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each outbox row points at one offering entry
    #[sea_orm(
        belongs_to = "super::entry::Entity",
        from = "Column::EntryId",
        to = "super::entry::Column::Id"
    )]
    Entry,
}

impl Related<super::entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
