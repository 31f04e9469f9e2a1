//! Application workflow business logic - member self-service card requests.
//!
//! Applications move NEW -> APPROVED (consuming a card) or NEW -> REJECTED.
//! While a registration window is in force, submission attempts immediate
//! auto-assignment: the preferred number when free for the current year,
//! otherwise the lowest free number on the street. Approval hands the
//! application's requested pledges to the created assignment and zeroes
//! them on the application, so the authoritative values live in one place.

use crate::{
    core::{assignment as assignment_core, window},
    entities::{
        Application, Assignment, Card, Member, application,
        application::ApplicationStatus, assignment, card, member,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, QueryOrder, Set, TransactionTrait, prelude::*};
use std::collections::HashSet;
use tracing::info;

/// Input for [`submit_application`].
#[derive(Debug, Clone)]
pub struct SubmitApplication {
    /// Pre-authenticated requester, when the submission came from a session
    pub requester_member_id: Option<i64>,
    /// Applicant's full name
    pub full_name: String,
    /// Applicant's phone number; also the identity fallback when no
    /// requester context is available
    pub phone_number: String,
    /// Street the applicant wants a card on
    pub street_id: i64,
    /// Preferred card number, if any
    pub preferred_number: Option<i32>,
    /// Free-text note
    pub note: Option<String>,
    /// Requested ahadi pledge
    pub pledged_ahadi: Decimal,
    /// Requested shukrani pledge
    pub pledged_shukrani: Decimal,
    /// Requested majengo pledge
    pub pledged_majengo: Decimal,
}

/// Requested pledge amounts, used for approval overrides.
#[derive(Debug, Clone, Copy)]
pub struct Pledges {
    /// Ahadi pledge
    pub ahadi: Decimal,
    /// Shukrani pledge
    pub shukrani: Decimal,
    /// Majengo pledge
    pub majengo: Decimal,
}

/// Submits a self-service card application.
///
/// The member identity comes from the requester context when present, else
/// from a phone-number match. A resolved member may hold at most one NEW
/// application (`DuplicatePending`) and must not already hold an active
/// current-year assignment (`AlreadyAssigned`).
///
/// When the registration window is open, auto-assignment runs inside the
/// same transaction; if no card on the street is free for the current year
/// the application simply stays NEW. Card selection is re-validated at
/// write time, so concurrent submitters for the same street end up on
/// different cards.
pub async fn submit_application(
    db: &DatabaseConnection,
    input: SubmitApplication,
) -> Result<application::Model> {
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

    let street_id = input.street_id;
    crate::entities::Street::find_by_id(street_id)
        .one(&txn)
        .await?
        .ok_or(Error::StreetNotFound { id: street_id })?;

    let member_id = resolve_member(&txn, &input).await?;

    if let Some(member_id) = member_id {
        let pending = Application::find()
            .filter(application::Column::MemberId.eq(member_id))
            .filter(application::Column::Status.eq(ApplicationStatus::New))
            .one(&txn)
            .await?;
        if pending.is_some() {
            return Err(Error::DuplicatePending { member_id });
        }

        let year = super::current_year();
        let held = Assignment::find()
            .filter(assignment::Column::MemberId.eq(member_id))
            .filter(assignment::Column::Year.eq(year))
            .filter(assignment::Column::Active.eq(true))
            .one(&txn)
            .await?;
        if held.is_some() {
            return Err(Error::AlreadyAssigned { member_id, year });
        }
    }

    let created = application::ActiveModel {
        member_id: Set(member_id),
        full_name: Set(input.full_name.clone()),
        phone_number: Set(input.phone_number.clone()),
        street_id: Set(street_id),
        preferred_number: Set(input.preferred_number),
        note: Set(input.note.clone().unwrap_or_default()),
        pledged_ahadi: Set(input.pledged_ahadi),
        pledged_shukrani: Set(input.pledged_shukrani),
        pledged_majengo: Set(input.pledged_majengo),
        assignment_id: Set(None),
        status: Set(ApplicationStatus::New),
        created_at: Set(Utc::now()),
        ..Default::default()
    };
    let mut created = created.insert(&txn).await?;

    if window::is_window_open(&txn).await? {
        if let Some(approved) = try_auto_assign(&txn, &created).await? {
            created = approved;
        }
    }

    txn.commit().await?;
    Ok(created)
}

/// Resolves the member an application belongs to.
async fn resolve_member<C>(conn: &C, input: &SubmitApplication) -> Result<Option<i64>>
where
    C: ConnectionTrait,
{
    if let Some(id) = input.requester_member_id {
        Member::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(Error::MemberNotFound { id })?;
        return Ok(Some(id));
    }

    let matched = Member::find()
        .filter(member::Column::PhoneNumber.eq(&input.phone_number))
        .one(conn)
        .await?;
    Ok(matched.map(|m| m.id))
}

/// Attempts auto-assignment for a freshly created application.
///
/// Returns the approved application, or `None` when no card on the street
/// is free for the current year. A candidate lost to a concurrent writer
/// (unique-index violation or pre-check hit) is skipped and the next one is
/// tried.
async fn try_auto_assign<C>(
    conn: &C,
    app: &application::Model,
) -> Result<Option<application::Model>>
where
    C: ConnectionTrait,
{
    let year = super::current_year();
    let candidates = free_cards_for_year(conn, app.street_id, app.preferred_number, year).await?;

    for candidate in candidates {
        let attempt = assignment_core::assign_card_in(
            conn,
            &assignment_core::AssignCard {
                card_id: candidate.id,
                member_id: app.member_id,
                full_name: app.full_name.clone(),
                phone_number: app.phone_number.clone(),
                year,
                pledged_ahadi: app.pledged_ahadi,
                pledged_shukrani: app.pledged_shukrani,
                pledged_majengo: app.pledged_majengo,
            },
        )
        .await;

        let assigned = match attempt {
            Ok(assigned) => assigned,
            Err(Error::DuplicateAssignment { .. }) => continue,
            Err(e) => return Err(e),
        };

        assignment_core::mark_card_taken(conn, candidate.id, app.member_id).await?;
        let approved = link_assignment(conn, app.clone(), assigned.id).await?;
        info!(
            application_id = approved.id,
            card_code = %candidate.code,
            "application auto-approved"
        );
        return Ok(Some(approved));
    }

    Ok(None)
}

/// Cards on a street with no assignment for the year, preferred number
/// first, then ascending by number.
async fn free_cards_for_year<C>(
    conn: &C,
    street_id: i64,
    preferred_number: Option<i32>,
    year: i32,
) -> Result<Vec<card::Model>>
where
    C: ConnectionTrait,
{
    let cards = Card::find()
        .filter(card::Column::StreetId.eq(street_id))
        .order_by_asc(card::Column::Number)
        .all(conn)
        .await?;

    let card_ids: Vec<i64> = cards.iter().map(|c| c.id).collect();
    let assigned: HashSet<i64> = Assignment::find()
        .filter(assignment::Column::CardId.is_in(card_ids))
        .filter(assignment::Column::Year.eq(year))
        .all(conn)
        .await?
        .into_iter()
        .map(|a| a.card_id)
        .collect();

    let mut free: Vec<card::Model> = cards
        .into_iter()
        .filter(|c| !assigned.contains(&c.id))
        .collect();

    if let Some(preferred) = preferred_number {
        if let Some(pos) = free.iter().position(|c| c.number == preferred) {
            let card = free.remove(pos);
            free.insert(0, card);
        }
    }

    Ok(free)
}

/// Links the created assignment, marks the application APPROVED, and zeroes
/// its pledge fields; the authoritative pledge values now live on the
/// assignment.
async fn link_assignment<C>(
    conn: &C,
    app: application::Model,
    assignment_id: i64,
) -> Result<application::Model>
where
    C: ConnectionTrait,
{
    let mut active: application::ActiveModel = app.into();
    active.assignment_id = Set(Some(assignment_id));
    active.status = Set(ApplicationStatus::Approved);
    active.pledged_ahadi = Set(Decimal::ZERO);
    active.pledged_shukrani = Set(Decimal::ZERO);
    active.pledged_majengo = Set(Decimal::ZERO);
    active.update(conn).await.map_err(Into::into)
}

/// Manually approves an application onto a specific card and year.
///
/// Pledges come from the overrides when supplied, else from the
/// application's requested values. Fails with `AlreadyApproved` on a second
/// approval and `DuplicateAssignment` when the `(card, year)` pair is taken.
pub async fn approve_application(
    db: &DatabaseConnection,
    application_id: i64,
    card_id: i64,
    year: i32,
    pledge_overrides: Option<Pledges>,
) -> Result<assignment::Model> {
    let txn = db.begin().await?;

    let app = Application::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    if app.status == ApplicationStatus::Approved || app.assignment_id.is_some() {
        return Err(Error::AlreadyApproved { application_id });
    }

    let pledges = pledge_overrides.unwrap_or(Pledges {
        ahadi: app.pledged_ahadi,
        shukrani: app.pledged_shukrani,
        majengo: app.pledged_majengo,
    });

    let assigned = assignment_core::assign_card_in(
        &txn,
        &assignment_core::AssignCard {
            card_id,
            member_id: app.member_id,
            full_name: app.full_name.clone(),
            phone_number: app.phone_number.clone(),
            year,
            pledged_ahadi: pledges.ahadi,
            pledged_shukrani: pledges.shukrani,
            pledged_majengo: pledges.majengo,
        },
    )
    .await?;

    if year == super::current_year() {
        assignment_core::mark_card_taken(&txn, card_id, app.member_id).await?;
    }

    link_assignment(&txn, app, assigned.id).await?;

    txn.commit().await?;
    Ok(assigned)
}

/// Rejects an application, appending the reason to its note.
///
/// Approved applications cannot be rejected. Rejecting an already-rejected
/// application appends the new reason and leaves the status REJECTED.
pub async fn reject_application(
    db: &DatabaseConnection,
    application_id: i64,
    reason: Option<&str>,
) -> Result<application::Model> {
    let txn = db.begin().await?;

    let app = Application::find_by_id(application_id)
        .one(&txn)
        .await?
        .ok_or(Error::ApplicationNotFound { id: application_id })?;

    if app.status == ApplicationStatus::Approved {
        return Err(Error::AlreadyApproved { application_id });
    }

    let note = match reason {
        Some(reason) if !reason.is_empty() => {
            if app.note.is_empty() {
                reason.to_string()
            } else {
                format!("{}\n{}", app.note, reason)
            }
        }
        _ => app.note.clone(),
    };

    let mut active: application::ActiveModel = app.into();
    active.note = Set(note);
    active.status = Set(ApplicationStatus::Rejected);
    let rejected = active.update(&txn).await?;

    txn.commit().await?;
    Ok(rejected)
}

/// What a member sees about their own card situation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MyCardState {
    /// The member has a NEW application waiting
    pub has_pending_application: bool,
    /// The member holds an active assignment for the current year
    pub has_current_assignment: bool,
}

/// Reports whether a member has a pending application or a current-year
/// assignment - the two conditions that block submitting another request.
pub async fn my_card_state(db: &DatabaseConnection, member_id: i64) -> Result<MyCardState> {
    let has_pending_application = Application::find()
        .filter(application::Column::MemberId.eq(member_id))
        .filter(application::Column::Status.eq(ApplicationStatus::New))
        .one(db)
        .await?
        .is_some();

    let has_current_assignment = Assignment::find()
        .filter(assignment::Column::MemberId.eq(member_id))
        .filter(assignment::Column::Year.eq(super::current_year()))
        .filter(assignment::Column::Active.eq(true))
        .one(db)
        .await?
        .is_some();

    Ok(MyCardState {
        has_pending_application,
        has_current_assignment,
    })
}

/// Lists applications, newest first, optionally filtered by status.
pub async fn applications(
    db: &DatabaseConnection,
    status: Option<ApplicationStatus>,
) -> Result<Vec<application::Model>> {
    let mut query = Application::find().order_by_desc(application::Column::CreatedAt);
    if let Some(status) = status {
        query = query.filter(application::Column::Status.eq(status));
    }
    query.all(db).await.map_err(Into::into)
}
