//! Offering entry recording - single entries and service batches.
//!
//! Entries are immutable once written. Every write also enqueues a legacy
//! ledger mirror record in the same transaction and drains the outbox on a
//! best-effort basis after commit: mirror trouble is logged, never surfaced.
//! Batches are all-or-nothing; a bad card in the middle of a batch leaves
//! nothing behind, so the totals reported to the caller are always exact.

use crate::{
    core::{activity, sync},
    entities::{
        Card, Street, activity_log::ActivityKind, batch, batch::MassType, entry, entry::EntryType,
    },
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Parses a `YYYY-MM-DD` date string, defaulting to today when absent.
pub(crate) fn parse_entry_date(input: Option<&str>) -> Result<NaiveDate> {
    match input {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
            input: raw.to_string(),
        }),
    }
}

/// Records a single offering entry against a card.
///
/// Fails with `CardNotFound`, `InvalidDate`, or `InvalidAmount`; the date
/// defaults to today. The legacy mirror is enqueued atomically with the
/// entry and drained after commit without affecting the result.
pub async fn record_entry(
    db: &DatabaseConnection,
    card_id: i64,
    entry_type: EntryType,
    amount: Decimal,
    date: Option<&str>,
) -> Result<entry::Model> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount { amount });
    }
    let date = parse_entry_date(date)?;

    let txn = db.begin().await?;

    Card::find_by_id(card_id)
        .one(&txn)
        .await?
        .ok_or(Error::CardNotFound { id: card_id })?;

    let created = insert_entry(&txn, card_id, entry_type, amount, date, None).await?;
    sync::enqueue(&txn, created.id, None).await?;

    txn.commit().await?;

    sync::drain_best_effort(db).await;
    Ok(created)
}

async fn insert_entry<C>(
    conn: &C,
    card_id: i64,
    entry_type: EntryType,
    amount: Decimal,
    date: NaiveDate,
    batch_id: Option<i64>,
) -> Result<entry::Model>
where
    C: ConnectionTrait,
{
    entry::ActiveModel {
        card_id: Set(card_id),
        entry_type: Set(entry_type),
        amount: Set(amount),
        date: Set(date),
        batch_id: Set(batch_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Shared metadata for a batch of entries recorded at one service.
#[derive(Debug, Clone)]
pub struct BatchMeta {
    /// Street the batch was collected for
    pub street_id: i64,
    /// Who recorded the batch
    pub recorder_name: String,
    /// Service date as `YYYY-MM-DD`; defaults to today
    pub date: Option<String>,
    /// Service the batch was collected at
    pub mass_type: MassType,
    /// 1 or 2, required exactly when `mass_type` is MAJOR
    pub major_mass_number: Option<i16>,
}

/// One entry inside a batch.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    /// Card the amount was offered against
    pub card_id: i64,
    /// Offering category
    pub entry_type: EntryType,
    /// Amount offered
    pub amount: Decimal,
    /// Per-entry date override as `YYYY-MM-DD`; defaults to the batch date
    pub date: Option<String>,
}

/// Per-category running totals for a recorded batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchTotals {
    /// Total ahadi recorded
    pub ahadi: Decimal,
    /// Total shukrani recorded
    pub shukrani: Decimal,
    /// Total majengo recorded
    pub majengo: Decimal,
}

/// Outcome of [`record_batch`].
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// The created batch row
    pub batch: batch::Model,
    /// Number of entries recorded
    pub count: usize,
    /// Per-category totals
    pub totals: BatchTotals,
}

/// Records a batch of offering entries sharing service metadata.
///
/// The whole batch is one transaction: an unknown card, a card from another
/// street, a bad date, or a non-positive amount anywhere in the list aborts
/// everything, leaving no batch row and no entries. Each entry's mirror is
/// enqueued with the batch's mass type as context, and one audit-log row
/// summarizing counts and totals is written on completion.
pub async fn record_batch(
    db: &DatabaseConnection,
    meta: BatchMeta,
    entries: Vec<BatchEntry>,
) -> Result<BatchResult> {
    match (meta.mass_type, meta.major_mass_number) {
        (MassType::Major, Some(1 | 2)) => {}
        (MassType::Major, other) => {
            return Err(Error::InvalidMassConfig {
                message: format!("major mass requires mass number 1 or 2, got {other:?}"),
            });
        }
        (_, None) => {}
        (mass_type, Some(n)) => {
            return Err(Error::InvalidMassConfig {
                message: format!("mass number {n} is only valid for MAJOR, not {mass_type:?}"),
            });
        }
    }
    let batch_date = parse_entry_date(meta.date.as_deref())?;

    let txn = db.begin().await?;

    let street = Street::find_by_id(meta.street_id)
        .one(&txn)
        .await?
        .ok_or(Error::StreetNotFound { id: meta.street_id })?;

    let created_batch = batch::ActiveModel {
        street_id: Set(meta.street_id),
        recorder_name: Set(meta.recorder_name.clone()),
        date: Set(batch_date),
        mass_type: Set(meta.mass_type),
        major_mass_number: Set(meta.major_mass_number),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let mut totals = BatchTotals::default();
    let count = entries.len();

    for item in entries {
        if item.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount {
                amount: item.amount,
            });
        }

        let found = Card::find_by_id(item.card_id)
            .one(&txn)
            .await?
            .ok_or(Error::CardNotFound { id: item.card_id })?;
        if found.street_id != meta.street_id {
            return Err(Error::StreetMismatch {
                card_id: item.card_id,
                street_id: meta.street_id,
            });
        }

        let date = match item.date.as_deref() {
            Some(raw) => parse_entry_date(Some(raw))?,
            None => batch_date,
        };

        let entry = insert_entry(
            &txn,
            item.card_id,
            item.entry_type,
            item.amount,
            date,
            Some(created_batch.id),
        )
        .await?;
        sync::enqueue(&txn, entry.id, Some(meta.mass_type)).await?;

        match item.entry_type {
            EntryType::Ahadi => totals.ahadi += item.amount,
            EntryType::Shukrani => totals.shukrani += item.amount,
            EntryType::Majengo => totals.majengo += item.amount,
        }
    }

    activity::log_action(
        &txn,
        &format!(
            "Recorded offering batch for {} on {}: {} entries (ahadi {}, shukrani {}, majengo {})",
            street.name, batch_date, count, totals.ahadi, totals.shukrani, totals.majengo
        ),
        ActivityKind::Success,
    )
    .await?;

    txn.commit().await?;

    info!(
        batch_id = created_batch.id,
        street = %street.name,
        count,
        "offering batch recorded"
    );

    sync::drain_best_effort(db).await;

    Ok(BatchResult {
        batch: created_batch,
        count,
        totals,
    })
}
