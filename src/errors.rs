//! Unified error types for the offering ledger.
//!
//! Every fallible operation returns [`Result`]. Each variant carries enough
//! context to format a human-readable message, and [`Error::kind`] maps it to
//! a stable machine-readable [`ErrorKind`] for callers that dispatch on error
//! class rather than message text.

use rust_decimal::Decimal;
use thiserror::Error;

/// Stable machine-readable error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced street, card, member, assignment, or application is absent
    NotFound,
    /// The operation collides with existing state (duplicate card, assignment, ...)
    Conflict,
    /// The input itself is malformed (bad date, bad range, bad mass config)
    Validation,
    /// Configuration or storage failure
    Internal,
}

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("street not found: {id}")]
    StreetNotFound { id: i64 },

    #[error("card not found: {id}")]
    CardNotFound { id: i64 },

    #[error("member not found: {id}")]
    MemberNotFound { id: i64 },

    #[error("assignment not found: {id}")]
    AssignmentNotFound { id: i64 },

    #[error("application not found: {id}")]
    ApplicationNotFound { id: i64 },

    #[error("card number {number} already exists for street {street_id}")]
    DuplicateCard { street_id: i64, number: i32 },

    #[error("card {card_id} is already assigned for year {year}")]
    DuplicateAssignment { card_id: i64, year: i32 },

    #[error("member {member_id} already has a pending application")]
    DuplicatePending { member_id: i64 },

    #[error("member {member_id} already holds an assignment for year {year}")]
    AlreadyAssigned { member_id: i64, year: i32 },

    #[error("application {application_id} is already approved")]
    AlreadyApproved { application_id: i64 },

    #[error("invalid date {input:?}, expected YYYY-MM-DD")]
    InvalidDate { input: String },

    #[error("invalid range: {message}")]
    InvalidRange { message: String },

    #[error("invalid mass configuration: {message}")]
    InvalidMassConfig { message: String },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: Decimal },

    #[error("card {card_id} does not belong to street {street_id}")]
    StreetMismatch { card_id: i64, street_id: i64 },

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl Error {
    /// Classifies this error into a stable machine-readable kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StreetNotFound { .. }
            | Self::CardNotFound { .. }
            | Self::MemberNotFound { .. }
            | Self::AssignmentNotFound { .. }
            | Self::ApplicationNotFound { .. } => ErrorKind::NotFound,
            Self::DuplicateCard { .. }
            | Self::DuplicateAssignment { .. }
            | Self::DuplicatePending { .. }
            | Self::AlreadyAssigned { .. }
            | Self::AlreadyApproved { .. } => ErrorKind::Conflict,
            Self::InvalidDate { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidMassConfig { .. }
            | Self::InvalidAmount { .. }
            | Self::StreetMismatch { .. } => ErrorKind::Validation,
            Self::Config { .. } | Self::Database(_) => ErrorKind::Internal,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
