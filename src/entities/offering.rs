//! Legacy offering entity - The external reporting ledger this core mirrors
//! into.
//!
//! Pastor-facing dashboards read this table; nothing in this crate does.
//! The schema follows the legacy store: amounts are attributed to a member
//! when one can be resolved, and the mass context is absent for entries
//! recorded outside a batch.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Legacy offering database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "offerings")]
pub struct Model {
    /// Unique identifier for the legacy record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Attributed member, or None when the payer has no linked account
    pub member_id: Option<i64>,
    /// Amount offered
    pub amount: Decimal,
    /// Category string in the legacy vocabulary (AHADI, SHUKRANI, MAJENGO, ...)
    pub offering_type: String,
    /// Service context string, if known
    pub mass_type: Option<String>,
    /// Street the offering came from, if known
    pub street_id: Option<i64>,
    /// Date the offering was made
    pub date: Date,
    /// When the mirror record was written
    pub created_at: DateTimeUtc,
}

/// `Offering` has no relationships the core navigates
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
