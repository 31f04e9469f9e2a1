//! Core business logic - framework-agnostic ledger operations.
//!
//! Each submodule owns one component of the engine: the card registry,
//! the year-scoped assignment ledger, the registration window gate, the
//! self-service application workflow, offering entry recording, the legacy
//! ledger outbox, reporting projections, and the audit trail.

/// Append-only audit trail
pub mod activity;
/// Self-service card application workflow
pub mod application;
/// Year-scoped card assignment ledger
pub mod assignment;
/// Card registry - identity, codes, per-street numbering
pub mod card;
/// Offering entry recording, single and batched
pub mod entry;
/// Read-only reporting projections
pub mod report;
/// Legacy ledger mirroring via the outbox
pub mod sync;
/// Registration window gate
pub mod window;

use chrono::{Datelike, Utc};
use sea_orm::{DbErr, SqlErr};

/// Current calendar year - the fiscal year card occupancy is scoped to.
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Whether a database error is a unique-index violation.
///
/// The composite unique indexes on `(street, number)` and `(card, year)` are
/// the ultimate guard against check-then-act races; callers translate this
/// into the matching conflict error.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
