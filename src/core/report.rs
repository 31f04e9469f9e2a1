//! Reporting projections - read-only views over cards, assignments, and
//! entries.
//!
//! Nothing in this module mutates state. Views return structured data the
//! serving layer can format: card inventories with progress-against-pledge
//! percentages, availability listings, nearest-number suggestions, street
//! overviews, and per-member offering history.

use crate::{
    core::card as card_core,
    entities::{
        Assignment, Card, Entry, Member, Street, assignment, card, entry, entry::EntryType,
    },
    errors::{Error, Result},
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sea_orm::{QueryOrder, prelude::*};
use std::collections::{HashMap, HashSet};

/// Radius of the nearest-available-number search.
const SUGGESTION_RADIUS: i32 = 10;
/// Suggestions returned when the caller does not cap the list.
const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Calculates progress of collected against pledged as a percentage.
///
/// Defined as 0 whenever nothing (or a non-positive amount) was pledged, so
/// the result is never a division by zero, NaN, or negative.
#[must_use]
pub fn progress_percent(collected: Decimal, pledged: Decimal) -> f64 {
    if pledged <= Decimal::ZERO {
        return 0.0;
    }
    (collected / pledged * Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
}

/// Filters for [`offering_cards`].
#[derive(Debug, Clone, Default)]
pub struct CardFilter {
    /// Restrict to one street
    pub street_id: Option<i64>,
    /// Restrict by occupancy
    pub is_taken: Option<bool>,
    /// Case-insensitive substring match on the card code
    pub search: Option<String>,
}

/// One card as presented to the secretary, with this year's pledge state.
#[derive(Debug, Clone)]
pub struct CardView {
    /// Card id
    pub id: i64,
    /// Card code
    pub code: String,
    /// Street name
    pub street: String,
    /// Card number within the street
    pub number: i32,
    /// Current-year occupancy
    pub is_taken: bool,
    /// Name of this year's payer, when assigned
    pub assigned_to: Option<String>,
    /// This year's assignment id, when assigned
    pub assignment_id: Option<i64>,
    /// This year's ahadi pledge
    pub pledged_ahadi: Decimal,
    /// This year's shukrani pledge
    pub pledged_shukrani: Decimal,
    /// This year's majengo pledge
    pub pledged_majengo: Decimal,
    /// Lifetime ahadi collected against the ahadi pledge, as a percentage
    pub progress_ahadi: f64,
    /// Lifetime shukrani collected against the shukrani pledge, as a percentage
    pub progress_shukrani: f64,
    /// Lifetime majengo collected against the majengo pledge, as a percentage
    pub progress_majengo: f64,
}

/// Lists cards with their current-year assignment and progress percentages.
pub async fn offering_cards(
    db: &DatabaseConnection,
    filter: CardFilter,
) -> Result<Vec<CardView>> {
    let street_names = street_name_map(db).await?;

    let mut query = Card::find();
    if let Some(street_id) = filter.street_id {
        query = query.filter(card::Column::StreetId.eq(street_id));
    }
    if let Some(is_taken) = filter.is_taken {
        query = query.filter(card::Column::IsTaken.eq(is_taken));
    }
    if let Some(search) = &filter.search {
        query = query.filter(card::Column::Code.contains(search));
    }
    let mut cards = query.all(db).await?;
    cards.sort_by(|a, b| {
        let a_street = street_names.get(&a.street_id).map(String::as_str).unwrap_or("");
        let b_street = street_names.get(&b.street_id).map(String::as_str).unwrap_or("");
        a_street.cmp(b_street).then(a.number.cmp(&b.number))
    });

    let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();

    // This year's assignments, keyed by card; inactive rows are skipped so a
    // deactivated payer stops being reported without rewriting history.
    let year = super::current_year();
    let assignments: HashMap<i64, assignment::Model> = Assignment::find()
        .filter(assignment::Column::CardId.is_in(card_ids.clone()))
        .filter(assignment::Column::Year.eq(year))
        .filter(assignment::Column::Active.eq(true))
        .all(db)
        .await?
        .into_iter()
        .map(|a| (a.card_id, a))
        .collect();

    let collected = collected_by_card(db, card_ids).await?;

    let views = cards
        .into_iter()
        .map(|c| {
            let assignment = assignments.get(&c.id);
            let sums = collected.get(&c.id);
            let collected_for =
                |t: EntryType| sums.and_then(|m| m.get(&t)).copied().unwrap_or(Decimal::ZERO);
            let pledged_ahadi = assignment.map_or(Decimal::ZERO, |a| a.pledged_ahadi);
            let pledged_shukrani = assignment.map_or(Decimal::ZERO, |a| a.pledged_shukrani);
            let pledged_majengo = assignment.map_or(Decimal::ZERO, |a| a.pledged_majengo);
            CardView {
                id: c.id,
                code: c.code,
                street: street_names.get(&c.street_id).cloned().unwrap_or_default(),
                number: c.number,
                is_taken: c.is_taken,
                assigned_to: assignment.map(|a| a.full_name.clone()),
                assignment_id: assignment.map(|a| a.id),
                pledged_ahadi,
                pledged_shukrani,
                pledged_majengo,
                progress_ahadi: progress_percent(collected_for(EntryType::Ahadi), pledged_ahadi),
                progress_shukrani: progress_percent(
                    collected_for(EntryType::Shukrani),
                    pledged_shukrani,
                ),
                progress_majengo: progress_percent(
                    collected_for(EntryType::Majengo),
                    pledged_majengo,
                ),
            }
        })
        .collect();

    Ok(views)
}

/// A free card as listed to applicants and administrators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailableCardNumber {
    /// Street name
    pub street: String,
    /// Card number
    pub number: i32,
    /// Card code
    pub code: String,
}

/// Lists free cards, ordered by street name then number.
pub async fn available_card_numbers(
    db: &DatabaseConnection,
    street_id: Option<i64>,
) -> Result<Vec<AvailableCardNumber>> {
    let street_names = street_name_map(db).await?;

    let mut query = Card::find().filter(card::Column::IsTaken.eq(false));
    if let Some(street_id) = street_id {
        query = query.filter(card::Column::StreetId.eq(street_id));
    }
    let cards = query.order_by_asc(card::Column::Number).all(db).await?;

    let mut available: Vec<AvailableCardNumber> = cards
        .into_iter()
        .map(|c| AvailableCardNumber {
            street: street_names.get(&c.street_id).cloned().unwrap_or_default(),
            number: c.number,
            code: c.code,
        })
        .collect();
    available.sort_by(|a, b| a.street.cmp(&b.street).then(a.number.cmp(&b.number)));

    Ok(available)
}

/// Result of a number suggestion query.
#[derive(Debug, Clone)]
pub struct NumberSuggestions {
    /// Street searched
    pub street: String,
    /// Number the applicant asked about
    pub query_number: i32,
    /// Whether that exact number is free
    pub exact_available: bool,
    /// Code of the exact card, when free
    pub exact_code: Option<String>,
    /// Free numbers nearby, closest first
    pub suggestions: Vec<AvailableCardNumber>,
}

/// Suggests free card numbers near the one an applicant asked about.
pub async fn number_suggestions(
    db: &DatabaseConnection,
    street_id: i64,
    query_number: i32,
    limit: Option<usize>,
) -> Result<NumberSuggestions> {
    let street = Street::find_by_id(street_id)
        .one(db)
        .await?
        .ok_or(Error::StreetNotFound { id: street_id })?;

    let availability = card_core::find_available(
        db,
        street_id,
        query_number,
        SUGGESTION_RADIUS,
        limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT),
    )
    .await?;

    Ok(NumberSuggestions {
        street: street.name.clone(),
        query_number,
        exact_available: availability.exact_available,
        exact_code: availability.exact_code,
        suggestions: availability
            .nearby
            .into_iter()
            .map(|c| AvailableCardNumber {
                street: street.name.clone(),
                number: c.number,
                code: c.code,
            })
            .collect(),
    })
}

/// Inventory counts and aggregate pledge state, church-wide or per street.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardsOverview {
    /// Cards in scope
    pub total_cards: u64,
    /// Cards occupied this year
    pub taken_cards: u64,
    /// Cards free this year
    pub free_cards: u64,
    /// Distinct cards with at least one entry dated this calendar year
    pub actively_used_cards: u64,
    /// Code of the card with the smallest lifetime entry sum, among cards
    /// that have entries at all; ties go to the lowest card id
    pub least_active_card: Option<String>,
    /// Sum of ahadi pledges across assignments in scope
    pub total_pledged_ahadi: Decimal,
    /// Sum of shukrani pledges across assignments in scope
    pub total_pledged_shukrani: Decimal,
    /// Sum of majengo pledges across assignments in scope
    pub total_pledged_majengo: Decimal,
    /// Ahadi collected across entries in scope
    pub total_collected_ahadi: Decimal,
    /// Shukrani collected across entries in scope
    pub total_collected_shukrani: Decimal,
    /// Majengo collected across entries in scope
    pub total_collected_majengo: Decimal,
}

/// Computes the cards overview, optionally scoped to one street.
pub async fn cards_overview(
    db: &DatabaseConnection,
    street_id: Option<i64>,
) -> Result<CardsOverview> {
    let mut query = Card::find();
    if let Some(street_id) = street_id {
        query = query.filter(card::Column::StreetId.eq(street_id));
    }
    let cards = query.all(db).await?;

    let total_cards = cards.len() as u64;
    let taken_cards = cards.iter().filter(|c| c.is_taken).count() as u64;
    let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
    let codes: HashMap<i64, String> = cards.into_iter().map(|c| (c.id, c.code)).collect();

    let entries = Entry::find()
        .filter(entry::Column::CardId.is_in(card_ids.clone()))
        .all(db)
        .await?;

    let year = super::current_year();
    let active_ids: HashSet<i64> = entries
        .iter()
        .filter(|e| e.date.year() == year)
        .map(|e| e.card_id)
        .collect();

    let mut lifetime: HashMap<i64, Decimal> = HashMap::new();
    let mut collected: HashMap<EntryType, Decimal> = HashMap::new();
    for e in &entries {
        *lifetime.entry(e.card_id).or_default() += e.amount;
        *collected.entry(e.entry_type).or_default() += e.amount;
    }
    let least_active_card = lifetime
        .iter()
        .min_by_key(|(card_id, total)| (**total, **card_id))
        .and_then(|(card_id, _)| codes.get(card_id).cloned());

    let assignments = Assignment::find()
        .filter(assignment::Column::CardId.is_in(card_ids))
        .all(db)
        .await?;
    let mut pledged = (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
    for a in &assignments {
        pledged.0 += a.pledged_ahadi;
        pledged.1 += a.pledged_shukrani;
        pledged.2 += a.pledged_majengo;
    }

    let collected_for = |t: EntryType| collected.get(&t).copied().unwrap_or(Decimal::ZERO);

    Ok(CardsOverview {
        total_cards,
        taken_cards,
        free_cards: total_cards - taken_cards,
        actively_used_cards: active_ids.len() as u64,
        least_active_card,
        total_pledged_ahadi: pledged.0,
        total_pledged_shukrani: pledged.1,
        total_pledged_majengo: pledged.2,
        total_collected_ahadi: collected_for(EntryType::Ahadi),
        total_collected_shukrani: collected_for(EntryType::Shukrani),
        total_collected_majengo: collected_for(EntryType::Majengo),
    })
}

/// One entry in a member's offering history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Code of the card the entry was recorded against
    pub code: String,
    /// Entry date
    pub date: NaiveDate,
    /// Offering category
    pub entry_type: EntryType,
    /// Amount offered
    pub amount: Decimal,
}

/// A member's offering history for one year.
#[derive(Debug, Clone)]
pub struct MemberHistory {
    /// Member the history belongs to
    pub member_id: i64,
    /// Year covered
    pub year: i32,
    /// Entries on the member's cards within the year, oldest first
    pub entries: Vec<HistoryEntry>,
    /// Total ahadi offered
    pub total_ahadi: Decimal,
    /// Total shukrani offered
    pub total_shukrani: Decimal,
    /// Total majengo offered
    pub total_majengo: Decimal,
}

/// Builds a member's offering history for a year (default: current year).
///
/// Entries are attributed through the member's assignments: for each card
/// the member held that year, the entries on that card dated within the
/// year are reported.
pub async fn member_offering_history(
    db: &DatabaseConnection,
    member_id: i64,
    year: Option<i32>,
) -> Result<MemberHistory> {
    Member::find_by_id(member_id)
        .one(db)
        .await?
        .ok_or(Error::MemberNotFound { id: member_id })?;

    let year = year.unwrap_or_else(super::current_year);
    let year_start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(|| Error::InvalidRange {
        message: format!("year {year} is out of range"),
    })?;
    let year_end = NaiveDate::from_ymd_opt(year, 12, 31).ok_or_else(|| Error::InvalidRange {
        message: format!("year {year} is out of range"),
    })?;

    let held = Assignment::find()
        .filter(assignment::Column::MemberId.eq(member_id))
        .filter(assignment::Column::Year.eq(year))
        .all(db)
        .await?;
    let card_ids: Vec<i64> = held.iter().map(|a| a.card_id).collect();

    let mut history = MemberHistory {
        member_id,
        year,
        entries: Vec::new(),
        total_ahadi: Decimal::ZERO,
        total_shukrani: Decimal::ZERO,
        total_majengo: Decimal::ZERO,
    };
    if card_ids.is_empty() {
        return Ok(history);
    }

    let codes: HashMap<i64, String> = Card::find()
        .filter(card::Column::Id.is_in(card_ids.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|c| (c.id, c.code))
        .collect();

    let entries = Entry::find()
        .filter(entry::Column::CardId.is_in(card_ids))
        .filter(entry::Column::Date.between(year_start, year_end))
        .order_by_asc(entry::Column::Date)
        .all(db)
        .await?;

    for e in entries {
        match e.entry_type {
            EntryType::Ahadi => history.total_ahadi += e.amount,
            EntryType::Shukrani => history.total_shukrani += e.amount,
            EntryType::Majengo => history.total_majengo += e.amount,
        }
        history.entries.push(HistoryEntry {
            code: codes.get(&e.card_id).cloned().unwrap_or_default(),
            date: e.date,
            entry_type: e.entry_type,
            amount: e.amount,
        });
    }

    Ok(history)
}

async fn street_name_map(db: &DatabaseConnection) -> Result<HashMap<i64, String>> {
    Ok(Street::find()
        .all(db)
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect())
}

/// Lifetime collected sums per card and category.
async fn collected_by_card(
    db: &DatabaseConnection,
    card_ids: Vec<i64>,
) -> Result<HashMap<i64, HashMap<EntryType, Decimal>>> {
    let entries = Entry::find()
        .filter(entry::Column::CardId.is_in(card_ids))
        .all(db)
        .await?;

    let mut sums: HashMap<i64, HashMap<EntryType, Decimal>> = HashMap::new();
    for e in entries {
        *sums.entry(e.card_id).or_default().entry(e.entry_type).or_default() += e.amount;
    }
    Ok(sums)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        assignment as assignment_core, card as card_core, current_year, entry as entry_core,
    };
    use crate::test_utils::{
        assign_input, create_test_card, create_test_member, create_test_street, setup_test_db,
        setup_with_street,
    };
    use rust_decimal_macros::dec;
    use sea_orm::Set;

    #[test]
    fn test_progress_percent_basics() {
        assert_eq!(progress_percent(dec!(50.00), dec!(100.00)), 50.0);
        assert_eq!(progress_percent(dec!(150.00), dec!(100.00)), 150.0);
        assert_eq!(progress_percent(Decimal::ZERO, dec!(100.00)), 0.0);
    }

    #[test]
    fn test_progress_percent_zero_pledge_never_divides() {
        // pledged <= 0 is always 0%, whatever was collected
        assert_eq!(progress_percent(Decimal::ZERO, Decimal::ZERO), 0.0);
        assert_eq!(progress_percent(dec!(75.00), Decimal::ZERO), 0.0);
        assert_eq!(progress_percent(dec!(75.00), dec!(-1.00)), 0.0);
    }

    #[tokio::test]
    async fn test_offering_cards_progress_and_assignment() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;

        assignment_core::assign_card(
            &db,
            assignment_core::AssignCard {
                pledged_ahadi: dec!(200.00),
                pledged_shukrani: Decimal::ZERO,
                ..assign_input(card.id, current_year())
            },
        )
        .await?;
        entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(50.00), None).await?;
        entry_core::record_entry(&db, card.id, EntryType::Shukrani, dec!(10.00), None).await?;

        let views = offering_cards(&db, CardFilter::default()).await?;
        assert_eq!(views.len(), 1);
        let view = &views[0];
        assert_eq!(view.code, "TE-007");
        assert!(view.is_taken);
        assert_eq!(view.assigned_to.as_deref(), Some("Asha Mrema"));
        assert_eq!(view.pledged_ahadi, dec!(200.00));
        assert_eq!(view.progress_ahadi, 25.0);
        // Shukrani was collected but nothing was pledged; progress stays 0
        assert_eq!(view.progress_shukrani, 0.0);

        Ok(())
    }

    #[tokio::test]
    async fn test_offering_cards_filters() -> Result<()> {
        let db = setup_test_db().await?;
        let peace = create_test_street(&db, "Peace Avenue").await?;
        let unity = create_test_street(&db, "Unity Road").await?;
        let card = create_test_card(&db, peace.id, 1).await?;
        create_test_card(&db, unity.id, 1).await?;

        assignment_core::assign_card(&db, assign_input(card.id, current_year())).await?;

        let by_street = offering_cards(
            &db,
            CardFilter {
                street_id: Some(peace.id),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(by_street.len(), 1);
        assert_eq!(by_street[0].street, "Peace Avenue");

        let taken = offering_cards(
            &db,
            CardFilter {
                is_taken: Some(true),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(taken.len(), 1);
        assert_eq!(taken[0].code, "PE-001");

        let searched = offering_cards(
            &db,
            CardFilter {
                search: Some("UN-".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(searched.len(), 1);
        assert_eq!(searched[0].code, "UN-001");

        Ok(())
    }

    #[tokio::test]
    async fn test_available_card_numbers_ordering() -> Result<()> {
        let db = setup_test_db().await?;
        let unity = create_test_street(&db, "Unity Road").await?;
        let peace = create_test_street(&db, "Peace Avenue").await?;
        create_test_card(&db, unity.id, 2).await?;
        create_test_card(&db, peace.id, 9).await?;
        create_test_card(&db, peace.id, 3).await?;

        let available = available_card_numbers(&db, None).await?;
        let listed: Vec<(&str, i32)> = available
            .iter()
            .map(|a| (a.street.as_str(), a.number))
            .collect();
        assert_eq!(
            listed,
            vec![("Peace Avenue", 3), ("Peace Avenue", 9), ("Unity Road", 2)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_number_suggestions_scenario() -> Result<()> {
        let (db, street) = setup_with_street().await?;

        // 48 and 53 free, 50 taken
        for n in [48, 50, 53] {
            create_test_card(&db, street.id, n).await?;
        }
        let taken = Card::find()
            .filter(card::Column::Number.eq(50))
            .one(&db)
            .await?
            .unwrap();
        let mut active: card::ActiveModel = taken.into();
        active.is_taken = Set(true);
        active.update(&db).await?;

        let result = number_suggestions(&db, street.id, 50, None).await?;
        assert!(!result.exact_available);
        assert!(result.exact_code.is_none());
        let numbers: Vec<i32> = result.suggestions.iter().map(|s| s.number).collect();
        assert_eq!(numbers, vec![48, 53]);

        Ok(())
    }

    #[tokio::test]
    async fn test_number_suggestions_unknown_street() -> Result<()> {
        let db = setup_test_db().await?;

        let result = number_suggestions(&db, 999, 50, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::StreetNotFound { id: 999 }
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_cards_overview_counts_and_totals() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let a = create_test_card(&db, street.id, 1).await?;
        let b = create_test_card(&db, street.id, 2).await?;
        create_test_card(&db, street.id, 3).await?;

        assignment_core::assign_card(
            &db,
            assignment_core::AssignCard {
                pledged_ahadi: dec!(300.00),
                pledged_shukrani: dec!(30.00),
                pledged_majengo: Decimal::ZERO,
                ..assign_input(a.id, current_year())
            },
        )
        .await?;
        entry_core::record_entry(&db, a.id, EntryType::Ahadi, dec!(100.00), None).await?;
        entry_core::record_entry(&db, a.id, EntryType::Shukrani, dec!(10.00), None).await?;
        entry_core::record_entry(&db, b.id, EntryType::Ahadi, dec!(5.00), None).await?;

        let overview = cards_overview(&db, Some(street.id)).await?;
        assert_eq!(overview.total_cards, 3);
        assert_eq!(overview.taken_cards, 1);
        assert_eq!(overview.free_cards, 2);
        assert_eq!(overview.actively_used_cards, 2);
        // Card b's lifetime sum (5.00) is the smallest among cards with entries
        assert_eq!(overview.least_active_card.as_deref(), Some("TE-002"));
        assert_eq!(overview.total_pledged_ahadi, dec!(300.00));
        assert_eq!(overview.total_pledged_shukrani, dec!(30.00));
        assert_eq!(overview.total_pledged_majengo, Decimal::ZERO);
        assert_eq!(overview.total_collected_ahadi, dec!(105.00));
        assert_eq!(overview.total_collected_shukrani, dec!(10.00));

        Ok(())
    }

    #[tokio::test]
    async fn test_cards_overview_empty() -> Result<()> {
        let db = setup_test_db().await?;

        let overview = cards_overview(&db, None).await?;
        assert_eq!(overview.total_cards, 0);
        assert!(overview.least_active_card.is_none());
        assert_eq!(overview.total_collected_ahadi, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_cards_overview_street_scope() -> Result<()> {
        let db = setup_test_db().await?;
        let peace = create_test_street(&db, "Peace Avenue").await?;
        let unity = create_test_street(&db, "Unity Road").await?;
        create_test_card(&db, peace.id, 1).await?;
        let other = create_test_card(&db, unity.id, 1).await?;
        entry_core::record_entry(&db, other.id, EntryType::Ahadi, dec!(10.00), None).await?;

        let overview = cards_overview(&db, Some(peace.id)).await?;
        assert_eq!(overview.total_cards, 1);
        assert_eq!(overview.actively_used_cards, 0);
        assert_eq!(overview.total_collected_ahadi, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_member_offering_history() -> Result<()> {
        let (db, street) = setup_with_street().await?;
        let card = create_test_card(&db, street.id, 7).await?;
        let member = create_test_member(&db, "Asha Mrema", None).await?;
        let year = current_year();

        assignment_core::assign_card(
            &db,
            assignment_core::AssignCard {
                member_id: Some(member.id),
                ..assign_input(card.id, year)
            },
        )
        .await?;

        let jan = format!("{year}-01-15");
        let feb = format!("{year}-02-20");
        entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(30.00), Some(&jan)).await?;
        entry_core::record_entry(&db, card.id, EntryType::Majengo, dec!(20.00), Some(&feb))
            .await?;
        // An entry from another year must not show up
        let prior = format!("{}-12-25", year - 1);
        entry_core::record_entry(&db, card.id, EntryType::Ahadi, dec!(99.00), Some(&prior))
            .await?;

        let history = member_offering_history(&db, member.id, Some(year)).await?;
        assert_eq!(history.year, year);
        assert_eq!(history.entries.len(), 2);
        assert_eq!(history.entries[0].code, "TE-007");
        assert_eq!(history.total_ahadi, dec!(30.00));
        assert_eq!(history.total_majengo, dec!(20.00));
        assert_eq!(history.total_shukrani, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_member_offering_history_no_assignments() -> Result<()> {
        let db = setup_test_db().await?;
        let member = create_test_member(&db, "Asha Mrema", None).await?;

        let history = member_offering_history(&db, member.id, None).await?;
        assert!(history.entries.is_empty());
        assert_eq!(history.total_ahadi, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_member_offering_history_unknown_member() -> Result<()> {
        let db = setup_test_db().await?;

        let result = member_offering_history(&db, 999, None).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::MemberNotFound { id: 999 }
        ));

        Ok(())
    }
}
