//! Assignment ledger business logic - year-scoped bindings of cards to payers.
//!
//! An assignment binds a card to a payer identity for exactly one fiscal
//! year and carries that year's pledge targets. Card occupancy state
//! (`is_taken`, `assigned_member_id`, `assigned_at`) reflects the current
//! calendar year only: assigning a card for a past or future year never
//! touches it.

use crate::{
    entities::{Assignment, Card, Member, assignment, card},
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};

/// Input for [`assign_card`].
#[derive(Debug, Clone)]
pub struct AssignCard {
    /// Card to assign
    pub card_id: i64,
    /// Member account, if the payer has one
    pub member_id: Option<i64>,
    /// Payer's full name
    pub full_name: String,
    /// Payer's phone number
    pub phone_number: String,
    /// Fiscal year being assigned
    pub year: i32,
    /// Pledged ahadi amount
    pub pledged_ahadi: Decimal,
    /// Pledged shukrani amount
    pub pledged_shukrani: Decimal,
    /// Pledged majengo amount
    pub pledged_majengo: Decimal,
}

/// Assigns a card to a payer for a fiscal year.
///
/// Fails with `CardNotFound` for an unknown card and `DuplicateAssignment`
/// when the `(card, year)` pair is already bound. The card's `is_taken` flag
/// is deliberately not consulted: it only mirrors the current year, and a
/// card taken this year may still be assigned for next year. When the year
/// is the current calendar year the card's occupancy fields are updated in
/// the same transaction.
pub async fn assign_card(db: &DatabaseConnection, input: AssignCard) -> Result<assignment::Model> {
    for amount in [
        input.pledged_ahadi,
        input.pledged_shukrani,
        input.pledged_majengo,
    ] {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let txn = db.begin().await?;
    let created = assign_card_in(&txn, &input).await?;

    if input.year == super::current_year() {
        mark_card_taken(&txn, input.card_id, input.member_id).await?;
    }

    txn.commit().await?;
    Ok(created)
}

/// Creates the assignment row inside an open transaction.
///
/// Shared by [`assign_card`] and the application workflow, which performs its
/// own card selection and occupancy handling. The unique index on
/// `(card_id, year)` turns a lost race into `DuplicateAssignment`.
pub(crate) async fn assign_card_in<C>(conn: &C, input: &AssignCard) -> Result<assignment::Model>
where
    C: ConnectionTrait,
{
    Card::find_by_id(input.card_id)
        .one(conn)
        .await?
        .ok_or(Error::CardNotFound { id: input.card_id })?;

    if let Some(member_id) = input.member_id {
        Member::find_by_id(member_id)
            .one(conn)
            .await?
            .ok_or(Error::MemberNotFound { id: member_id })?;
    }

    if Assignment::find()
        .filter(assignment::Column::CardId.eq(input.card_id))
        .filter(assignment::Column::Year.eq(input.year))
        .one(conn)
        .await?
        .is_some()
    {
        return Err(Error::DuplicateAssignment {
            card_id: input.card_id,
            year: input.year,
        });
    }

    let model = assignment::ActiveModel {
        card_id: Set(input.card_id),
        member_id: Set(input.member_id),
        full_name: Set(input.full_name.clone()),
        phone_number: Set(input.phone_number.clone()),
        year: Set(input.year),
        pledged_ahadi: Set(input.pledged_ahadi),
        pledged_shukrani: Set(input.pledged_shukrani),
        pledged_majengo: Set(input.pledged_majengo),
        active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    model.insert(conn).await.map_err(|e| {
        if super::is_unique_violation(&e) {
            Error::DuplicateAssignment {
                card_id: input.card_id,
                year: input.year,
            }
        } else {
            e.into()
        }
    })
}

/// Marks a card occupied for the current year.
pub(crate) async fn mark_card_taken<C>(conn: &C, card_id: i64, member_id: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let found = Card::find_by_id(card_id)
        .one(conn)
        .await?
        .ok_or(Error::CardNotFound { id: card_id })?;

    let mut active: card::ActiveModel = found.into();
    active.is_taken = Set(true);
    active.assigned_member_id = Set(member_id);
    active.assigned_at = Set(Some(Utc::now()));
    active.update(conn).await?;
    Ok(())
}

/// Partial update for [`update_assignment`]; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAssignment {
    /// New full name
    pub full_name: Option<String>,
    /// New phone number
    pub phone_number: Option<String>,
    /// New ahadi pledge
    pub pledged_ahadi: Option<Decimal>,
    /// New shukrani pledge
    pub pledged_shukrani: Option<Decimal>,
    /// New majengo pledge
    pub pledged_majengo: Option<Decimal>,
    /// New active flag
    pub active: Option<bool>,
}

/// Applies a partial update to an assignment.
///
/// Card occupancy is not recomputed here, even when `active` is toggled:
/// occupancy is driven solely by the existence of a current-year assignment
/// row, not by its `active` flag.
pub async fn update_assignment(
    db: &DatabaseConnection,
    assignment_id: i64,
    changes: UpdateAssignment,
) -> Result<assignment::Model> {
    for amount in [
        changes.pledged_ahadi,
        changes.pledged_shukrani,
        changes.pledged_majengo,
    ]
    .into_iter()
    .flatten()
    {
        if amount < Decimal::ZERO {
            return Err(Error::InvalidAmount { amount });
        }
    }

    let found = Assignment::find_by_id(assignment_id)
        .one(db)
        .await?
        .ok_or(Error::AssignmentNotFound { id: assignment_id })?;

    let mut active_model: assignment::ActiveModel = found.into();
    if let Some(full_name) = changes.full_name {
        active_model.full_name = Set(full_name);
    }
    if let Some(phone_number) = changes.phone_number {
        active_model.phone_number = Set(phone_number);
    }
    if let Some(amount) = changes.pledged_ahadi {
        active_model.pledged_ahadi = Set(amount);
    }
    if let Some(amount) = changes.pledged_shukrani {
        active_model.pledged_shukrani = Set(amount);
    }
    if let Some(amount) = changes.pledged_majengo {
        active_model.pledged_majengo = Set(amount);
    }
    if let Some(active) = changes.active {
        active_model.active = Set(active);
    }

    active_model.update(db).await.map_err(Into::into)
}

/// Resolves the payer identity a card's entries should be attributed to for
/// a year.
///
/// Prefers the active assignment for `(card, year)`; when none exists, falls
/// back to the card's most recent assignment by year. Used for legacy-ledger
/// attribution, not for eligibility checks.
pub async fn resolve_payer_for_year<C>(
    conn: &C,
    card_id: i64,
    year: i32,
) -> Result<Option<assignment::Model>>
where
    C: ConnectionTrait,
{
    let exact = Assignment::find()
        .filter(assignment::Column::CardId.eq(card_id))
        .filter(assignment::Column::Year.eq(year))
        .filter(assignment::Column::Active.eq(true))
        .one(conn)
        .await?;
    if exact.is_some() {
        return Ok(exact);
    }

    Assignment::find()
        .filter(assignment::Column::CardId.eq(card_id))
        .order_by_desc(assignment::Column::Year)
        .one(conn)
        .await
        .map_err(Into::into)
}

/// Finds an assignment by its unique ID.
pub async fn get_assignment_by_id(
    db: &DatabaseConnection,
    assignment_id: i64,
) -> Result<Option<assignment::Model>> {
    Assignment::find_by_id(assignment_id)
        .one(db)
        .await
        .map_err(Into::into)
}
