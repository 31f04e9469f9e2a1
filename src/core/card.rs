//! Card registry business logic - card identity, codes, and per-street numbering.
//!
//! Provides functions for creating cards singly or in bulk and for the
//! nearest-available-number search. Card codes are derived from the street
//! name and number at creation time and never change afterwards.

use crate::{
    entities::{Card, Street, card},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};

/// Highest card number `bulk_generate` will create per street.
pub const MAX_CARD_NUMBER: i32 = 300;

/// Derives a card code like `PE-007` from the street name and card number.
///
/// The prefix is the first two alphabetic characters of the street name,
/// uppercased; the number is zero-padded to three digits.
#[must_use]
pub fn derive_code(street_name: &str, number: i32) -> String {
    let prefix: String = street_name
        .chars()
        .filter(|c| c.is_alphabetic())
        .take(2)
        .collect::<String>()
        .to_uppercase();
    format!("{prefix}-{number:03}")
}

/// Creates a single card on a street.
///
/// Fails with `StreetNotFound` for an unknown street and `DuplicateCard` when
/// the `(street, number)` pair or the derived code already exists. The
/// composite unique index backs the pre-check, so a concurrent creator loses
/// with the same error rather than a raw database failure.
pub async fn create_card(
    db: &DatabaseConnection,
    street_id: i64,
    number: i32,
) -> Result<card::Model> {
    if number < 1 {
        return Err(Error::InvalidRange {
            message: format!("card number must be positive, got {number}"),
        });
    }

    let txn = db.begin().await?;

    let street = Street::find_by_id(street_id)
        .one(&txn)
        .await?
        .ok_or(Error::StreetNotFound { id: street_id })?;

    if Card::find()
        .filter(card::Column::StreetId.eq(street_id))
        .filter(card::Column::Number.eq(number))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateCard { street_id, number });
    }

    // Code uniqueness is checked independently of (street, number); two
    // streets sharing a prefix can only collide if the numbers also collide.
    let code = derive_code(&street.name, number);
    if Card::find()
        .filter(card::Column::Code.eq(&code))
        .one(&txn)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateCard { street_id, number });
    }

    let model = card::ActiveModel {
        street_id: Set(street_id),
        number: Set(number),
        code: Set(code),
        is_taken: Set(false),
        assigned_member_id: Set(None),
        assigned_at: Set(None),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    let created = model.insert(&txn).await.map_err(|e| {
        if super::is_unique_violation(&e) {
            Error::DuplicateCard { street_id, number }
        } else {
            e.into()
        }
    })?;

    txn.commit().await?;
    Ok(created)
}

/// Outcome of a bulk generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkGenerateResult {
    /// Cards actually created
    pub created: u32,
    /// Numbers skipped because a card already existed
    pub skipped: u32,
}

/// Generates cards for one street (or every street) across a number range.
///
/// The range is clamped to `1..=300`. Numbers that already have a card are
/// counted as skipped. Generation is not atomic across the whole range; a
/// late failure leaves earlier cards in place, and the returned counts
/// reflect only the work actually committed.
pub async fn bulk_generate(
    db: &DatabaseConnection,
    street_id: Option<i64>,
    start_number: i32,
    end_number: i32,
) -> Result<BulkGenerateResult> {
    let start = start_number.max(1);
    let end = end_number.min(MAX_CARD_NUMBER);
    if start > end {
        return Err(Error::InvalidRange {
            message: format!("start number {start} cannot be greater than end number {end}"),
        });
    }

    let streets = match street_id {
        Some(id) => {
            let street = Street::find_by_id(id)
                .one(db)
                .await?
                .ok_or(Error::StreetNotFound { id })?;
            vec![street]
        }
        None => Street::find().all(db).await?,
    };

    let mut created = 0u32;
    let mut skipped = 0u32;

    for street in streets {
        let existing: Vec<i32> = Card::find()
            .filter(card::Column::StreetId.eq(street.id))
            .filter(card::Column::Number.between(start, end))
            .all(db)
            .await?
            .into_iter()
            .map(|c| c.number)
            .collect();

        for number in start..=end {
            if existing.contains(&number) {
                skipped += 1;
                continue;
            }
            let model = card::ActiveModel {
                street_id: Set(street.id),
                number: Set(number),
                code: Set(derive_code(&street.name, number)),
                is_taken: Set(false),
                assigned_member_id: Set(None),
                assigned_at: Set(None),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            match model.insert(db).await {
                Ok(_) => created += 1,
                // A concurrent generator got there first
                Err(e) if super::is_unique_violation(&e) => skipped += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(BulkGenerateResult { created, skipped })
}

/// Result of a nearest-available-number search.
#[derive(Debug, Clone)]
pub struct CardAvailability {
    /// Whether the queried number itself is free
    pub exact_available: bool,
    /// Code of the queried number's card, when it is free
    pub exact_code: Option<String>,
    /// Free cards near the queried number, closest first
    pub nearby: Vec<card::Model>,
}

/// Finds free cards near a number on a street.
///
/// Returns free cards in `[near - radius, near + radius]` excluding `near`
/// itself, ordered by numeric distance ascending with ties broken by the
/// lower number, capped at `limit`. Also reports whether `near` itself is
/// exactly available. The scan is a bounded indexed range query, not a
/// table walk.
pub async fn find_available(
    db: &DatabaseConnection,
    street_id: i64,
    near_number: i32,
    radius: i32,
    limit: usize,
) -> Result<CardAvailability> {
    let lo = (near_number - radius).max(1);
    let hi = near_number + radius;

    let in_range = Card::find()
        .filter(card::Column::StreetId.eq(street_id))
        .filter(card::Column::IsTaken.eq(false))
        .filter(card::Column::Number.between(lo, hi))
        .order_by_asc(card::Column::Number)
        .all(db)
        .await?;

    let exact = Card::find()
        .filter(card::Column::StreetId.eq(street_id))
        .filter(card::Column::Number.eq(near_number))
        .one(db)
        .await?;
    let exact_available = exact.as_ref().is_some_and(|c| !c.is_taken);
    let exact_code = exact.filter(|c| !c.is_taken).map(|c| c.code);

    let mut nearby: Vec<card::Model> = in_range
        .into_iter()
        .filter(|c| c.number != near_number)
        .collect();
    nearby.sort_by_key(|c| ((c.number - near_number).abs(), c.number));
    nearby.truncate(limit);

    Ok(CardAvailability {
        exact_available,
        exact_code,
        nearby,
    })
}

/// Finds a card by its unique ID.
pub async fn get_card_by_id(db: &DatabaseConnection, card_id: i64) -> Result<Option<card::Model>> {
    Card::find_by_id(card_id).one(db).await.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::ErrorKind;
    use crate::test_utils::{create_test_street, setup_test_db, setup_with_street};

    #[test]
    fn test_derive_code_two_letter_prefix() {
        assert_eq!(derive_code("Peace Avenue", 7), "PE-007");
        assert_eq!(derive_code("Unity Road", 42), "UN-042");
        assert_eq!(derive_code("peace avenue", 300), "PE-300");
    }

    #[test]
    fn test_derive_code_skips_non_alphabetic() {
        // Leading digits and punctuation are ignored for the prefix
        assert_eq!(derive_code("7th Street", 1), "TH-001");
        assert_eq!(derive_code("St. Mark", 15), "ST-015");
    }

    #[tokio::test]
    async fn test_create_card_generates_code() -> Result<()> {
        let db = setup_test_db().await?;
        let street = create_test_street(&db, "Peace Avenue").await?;

        let created = create_card(&db, street.id, 7).await?;

        assert_eq!(created.code, "PE-007");
        assert_eq!(created.number, 7);
        assert_eq!(created.street_id, street.id);
        assert!(!created.is_taken);
        assert!(created.assigned_member_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_card_street_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_card(&db, 999, 7).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StreetNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_card_rejects_non_positive_number() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        let result = create_card(&db, street.id, 0).await;
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_card_duplicate_number_conflicts() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        create_card(&db, street.id, 12).await?;
        let result = create_card(&db, street.id, 12).await;

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(matches!(err, Error::DuplicateCard { number: 12, .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_card_same_number_different_street() -> Result<()> {
        let db = setup_test_db().await?;
        let peace = create_test_street(&db, "Peace Avenue").await?;
        let unity = create_test_street(&db, "Unity Road").await?;

        let a = create_card(&db, peace.id, 5).await?;
        let b = create_card(&db, unity.id, 5).await?;

        assert_eq!(a.code, "PE-005");
        assert_eq!(b.code, "UN-005");

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_generate_creates_and_skips() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        // Pre-create one card inside the range
        create_card(&db, street.id, 3).await?;

        let result = bulk_generate(&db, Some(street.id), 1, 5).await?;
        assert_eq!(result.created, 4);
        assert_eq!(result.skipped, 1);

        let count = Card::find()
            .filter(card::Column::StreetId.eq(street.id))
            .all(&db)
            .await?
            .len();
        assert_eq!(count, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_generate_all_streets() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_street(&db, "Peace Avenue").await?;
        create_test_street(&db, "Unity Road").await?;

        let result = bulk_generate(&db, None, 1, 10).await?;
        assert_eq!(result.created, 20);
        assert_eq!(result.skipped, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_generate_invalid_range() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        let result = bulk_generate(&db, Some(street.id), 10, 5).await;
        assert!(matches!(result.unwrap_err(), Error::InvalidRange { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_bulk_generate_clamps_range() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        // -5..=1000 clamps to 1..=300
        let result = bulk_generate(&db, Some(street.id), -5, 1000).await?;
        assert_eq!(result.created, 300);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_orders_by_distance() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        // Free cards at 48 and 53, taken card at 50
        for n in [48, 50, 53] {
            create_card(&db, street.id, n).await?;
        }
        let taken = Card::find()
            .filter(card::Column::Number.eq(50))
            .one(&db)
            .await?
            .unwrap();
        let mut active: card::ActiveModel = taken.into();
        active.is_taken = Set(true);
        active.update(&db).await?;

        let availability = find_available(&db, street.id, 50, 10, 5).await?;

        assert!(!availability.exact_available);
        assert!(availability.exact_code.is_none());
        let numbers: Vec<i32> = availability.nearby.iter().map(|c| c.number).collect();
        // 48 is distance 2, 53 is distance 3
        assert_eq!(numbers, vec![48, 53]);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_distance_tie_prefers_lower_number() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        for n in [47, 53] {
            create_card(&db, street.id, n).await?;
        }

        let availability = find_available(&db, street.id, 50, 10, 5).await?;
        let numbers: Vec<i32> = availability.nearby.iter().map(|c| c.number).collect();
        // Both at distance 3; lower number first
        assert_eq!(numbers, vec![47, 53]);

        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_exact_hit() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        create_card(&db, street.id, 50).await?;

        let availability = find_available(&db, street.id, 50, 10, 5).await?;
        assert!(availability.exact_available);
        assert_eq!(availability.exact_code.as_deref(), Some("TE-050"));
        assert!(availability.nearby.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_find_available_respects_limit() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        bulk_generate(&db, Some(street.id), 40, 60).await?;

        let availability = find_available(&db, street.id, 50, 10, 3).await?;
        assert_eq!(availability.nearby.len(), 3);
        // Closest three: 49, 51, 48
        let numbers: Vec<i32> = availability.nearby.iter().map(|c| c.number).collect();
        assert_eq!(numbers, vec![49, 51, 48]);

        Ok(())
    }
}
