//! Street entity - The geographic unit the congregation is organized by.
//!
//! Streets are owned by the membership/authentication side of the system;
//! the ledger only references them and seeds them from configuration on
//! first run.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Street database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "streets")]
pub struct Model {
    /// Unique identifier for the street
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Street name (e.g., "Peace Avenue"), unique church-wide
    #[sea_orm(unique)]
    pub name: String,
    /// When the street was registered
    pub created_at: DateTimeUtc,
}

/// Defines relationships between Street and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One street has many offering cards
    #[sea_orm(has_many = "super::card::Entity")]
    Cards,
    /// One street has many card applications
    #[sea_orm(has_many = "super::application::Entity")]
    Applications,
    /// One street has many offering batches
    #[sea_orm(has_many = "super::batch::Entity")]
    Batches,
}

impl Related<super::card::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl Related<super::application::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Applications.def()
    }
}

impl Related<super::batch::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Batches.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
