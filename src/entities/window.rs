//! Registration window entity - A time range during which members may
//! self-register for cards.
//!
//! Rows are append-only history; the row currently in force is tracked by
//! the singleton [`super::window_state`] pointer rather than recomputed from
//! creation timestamps on every read.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Registration window database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "registration_windows")]
pub struct Model {
    /// Unique identifier for the window
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the window starts accepting auto-assignments
    pub start_at: DateTimeUtc,
    /// When the window stops accepting auto-assignments
    pub end_at: DateTimeUtc,
    /// Whether the window is administratively open; opening a new window
    /// closes all previously open rows
    pub is_open: bool,
    /// When the window row was created
    pub created_at: DateTimeUtc,
}

/// `RegistrationWindow` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
