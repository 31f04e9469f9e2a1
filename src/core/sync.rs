//! Legacy ledger mirroring via a durable outbox.
//!
//! Every offering entry gets a PENDING outbox row written in the same
//! transaction, so the mirror can never be lost to a crash between the
//! primary commit and the mirror attempt. Draining happens after commit and
//! from the service's worker loop; it attributes each entry to the payer
//! resolved for the entry's year at sync time, writes the legacy `offerings`
//! row, and retires the outbox row. Failures are retried up to a budget and
//! never surface to the caller that recorded the entry.

use crate::{
    core::assignment,
    entities::{
        Card, Entry, Outbox, batch::MassType, offering, outbox, outbox::SyncStatus,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, Utc};
use sea_orm::{ConnectionTrait, QueryOrder, QuerySelect, Set, prelude::*};
use tracing::{debug, warn};

/// Attempts per outbox row before it is parked as FAILED.
const MAX_ATTEMPTS: i32 = 5;
/// Rows processed per drain pass.
const DRAIN_LIMIT: u64 = 100;

/// Outcome of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Rows mirrored into the legacy ledger
    pub mirrored: u32,
    /// Rows that failed this pass
    pub failed: u32,
}

/// Enqueues a mirror record for an entry inside the caller's transaction.
pub(crate) async fn enqueue<C>(
    conn: &C,
    entry_id: i64,
    mass_type: Option<MassType>,
) -> Result<outbox::Model>
where
    C: ConnectionTrait,
{
    outbox::ActiveModel {
        entry_id: Set(entry_id),
        mass_type: Set(mass_type),
        status: Set(SyncStatus::Pending),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(Utc::now()),
        processed_at: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(Into::into)
}

/// Drains pending outbox rows into the legacy ledger.
///
/// Each row is attempted independently; one bad row never blocks the rest.
/// Rows that keep failing are parked as FAILED once the retry budget runs
/// out.
pub async fn drain_pending(db: &DatabaseConnection) -> Result<DrainReport> {
    let pending = Outbox::find()
        .filter(outbox::Column::Status.eq(SyncStatus::Pending))
        .order_by_asc(outbox::Column::Id)
        .limit(DRAIN_LIMIT)
        .all(db)
        .await?;

    let mut report = DrainReport::default();

    for row in pending {
        let attempts = row.attempts + 1;
        match mirror_entry(db, &row).await {
            Ok(()) => {
                let mut active: outbox::ActiveModel = row.into();
                active.status = Set(SyncStatus::Done);
                active.attempts = Set(attempts);
                active.last_error = Set(None);
                active.processed_at = Set(Some(Utc::now()));
                active.update(db).await?;
                report.mirrored += 1;
            }
            Err(e) => {
                let status = if attempts >= MAX_ATTEMPTS {
                    SyncStatus::Failed
                } else {
                    SyncStatus::Pending
                };
                warn!(
                    outbox_id = row.id,
                    entry_id = row.entry_id,
                    attempts,
                    error = %e,
                    "legacy ledger mirror attempt failed"
                );
                let mut active: outbox::ActiveModel = row.into();
                active.status = Set(status);
                active.attempts = Set(attempts);
                active.last_error = Set(Some(e.to_string()));
                active.update(db).await?;
                report.failed += 1;
            }
        }
    }

    if report.mirrored > 0 {
        debug!(mirrored = report.mirrored, "legacy ledger drain complete");
    }
    Ok(report)
}

/// Drains the outbox, logging instead of surfacing any failure.
///
/// Entry recording calls this after its transaction commits; the mirror must
/// never fail or delay the primary write's caller.
pub async fn drain_best_effort(db: &DatabaseConnection) {
    if let Err(e) = drain_pending(db).await {
        warn!(error = %e, "legacy ledger drain failed");
    }
}

/// Mirrors one outbox row into the legacy `offerings` table.
///
/// Attribution happens here, at sync time: the payer is whatever assignment
/// resolves for the entry's year right now, so retroactive assignment
/// changes re-attribute reported identity without rewriting stored entries.
async fn mirror_entry(db: &DatabaseConnection, row: &outbox::Model) -> Result<()> {
    let entry = Entry::find_by_id(row.entry_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("outbox row {} references missing entry {}", row.id, row.entry_id),
        })?;
    let card = Card::find_by_id(entry.card_id)
        .one(db)
        .await?
        .ok_or(Error::CardNotFound { id: entry.card_id })?;

    let payer = assignment::resolve_payer_for_year(db, entry.card_id, entry.date.year()).await?;

    offering::ActiveModel {
        member_id: Set(payer.and_then(|a| a.member_id)),
        amount: Set(entry.amount),
        offering_type: Set(entry.entry_type.as_str().to_string()),
        mass_type: Set(row.mass_type.map(|m| m.as_str().to_string())),
        street_id: Set(Some(card.street_id)),
        date: Set(entry.date),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{current_year, entry as entry_core};
    use crate::entities::{Offering, entry::EntryType};
    use crate::test_utils::{
        assign_input, create_test_card, create_test_member, setup_with_street,
    };
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_mirror_attributes_member_from_assignment() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;
        let member = create_test_member(&db, "Asha Mrema", None).await?;

        crate::core::assignment::assign_card(
            &db,
            crate::core::assignment::AssignCard {
                member_id: Some(member.id),
                ..assign_input(card.id, current_year())
            },
        )
        .await?;

        entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(20.00), None).await?;

        let mirrored = Offering::find().all(&db).await?;
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].member_id, Some(member.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_mirror_anonymous_when_no_assignment() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;

        entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(20.00), None).await?;

        let mirrored = Offering::find().all(&db).await?;
        assert_eq!(mirrored.len(), 1);
        assert!(mirrored[0].member_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_drain_marks_rows_done() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;

        entry_core::record_entry(&db, card.id, EntryType::Shukrani, dec!(5.00), None).await?;

        // The post-commit drain already ran; everything is retired
        let rows = Outbox::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, SyncStatus::Done);
        assert!(rows[0].processed_at.is_some());

        // A second pass finds nothing to do
        let report = drain_pending(&db).await?;
        assert_eq!(report, DrainReport::default());

        Ok(())
    }

    #[tokio::test]
    async fn test_drain_parks_poison_rows_as_failed() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;

        // Break the mirror target so every attempt fails
        db.execute_unprepared("DROP TABLE offerings").await?;

        // The primary write still succeeds; mirror trouble never surfaces
        let entry =
            entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(5.00), None).await?;
        assert!(Entry::find_by_id(entry.id).one(&db).await?.is_some());

        for _ in 0..MAX_ATTEMPTS {
            drain_pending(&db).await?;
        }

        let poisoned = Outbox::find()
            .filter(outbox::Column::Status.eq(SyncStatus::Failed))
            .all(&db)
            .await?;
        assert_eq!(poisoned.len(), 1);
        assert_eq!(poisoned[0].attempts, MAX_ATTEMPTS);
        assert!(poisoned[0].last_error.is_some());

        Ok(())
    }
}
