//! Activity log entity - Append-only audit trail of secretariat actions.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Severity class of an audit row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[derive(Default)]
pub enum ActivityKind {
    /// An action completed normally
    #[sea_orm(string_value = "SUCCESS")]
    Success,
    /// Something completed but deserves attention
    #[sea_orm(string_value = "WARNING")]
    Warning,
    /// Informational record
    #[sea_orm(string_value = "INFO")]
    #[default]
    Info,
}

/// Activity log database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    /// Unique identifier for the audit row
    #[sea_orm(primary_key)]
    pub id: i64,
    /// What happened, in one line
    pub action: String,
    /// Severity class
    pub kind: ActivityKind,
    /// When the action happened
    pub created_at: DateTimeUtc,
}

/// `ActivityLog` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
