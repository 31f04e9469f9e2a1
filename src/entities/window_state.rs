//! Window state entity - Singleton pointer to the registration window
//! currently in force.
//!
//! A single row (id 1) is updated transactionally whenever a window is
//! opened or closed, so "current" never has to be recomputed by sorting the
//! history table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Primary key of the single pointer row.
pub const SINGLETON_ID: i32 = 1;

/// Window state database model - the single current-window pointer row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "window_state")]
pub struct Model {
    /// Always [`SINGLETON_ID`]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    /// Window currently in force, or None when everything is closed
    pub current_window_id: Option<i64>,
    /// When the pointer was last moved
    pub updated_at: DateTimeUtc,
}

/// `WindowState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
