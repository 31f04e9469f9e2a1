//! Shared test utilities for the offering ledger.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{assignment, card, window},
    entities::{member, street},
    errors::Result,
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables and indexes.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    // An in-memory SQLite database exists per connection; the pool must stay
    // on a single connection so every query sees the same tables.
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = sea_orm::Database::connect(options).await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test street with the given name.
pub async fn create_test_street(db: &DatabaseConnection, name: &str) -> Result<street::Model> {
    street::ActiveModel {
        name: Set(name.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test member with an email derived from the name.
pub async fn create_test_member(
    db: &DatabaseConnection,
    full_name: &str,
    phone_number: Option<&str>,
) -> Result<member::Model> {
    let email = format!(
        "{}@example.com",
        full_name.to_lowercase().replace(' ', ".")
    );
    member::ActiveModel {
        email: Set(email),
        full_name: Set(full_name.to_string()),
        phone_number: Set(phone_number.map(ToString::to_string)),
        street_id: Set(None),
        is_active: Set(true),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test card through the registry, so codes and uniqueness checks
/// behave exactly as in production.
pub async fn create_test_card(
    db: &DatabaseConnection,
    street_id: i64,
    number: i32,
) -> Result<crate::entities::card::Model> {
    card::create_card(db, street_id, number).await
}

/// A card assignment input with sensible defaults.
///
/// # Defaults
/// * `member_id`: None
/// * `full_name`: `"Asha Mrema"`
/// * `phone_number`: `"0712345678"`
/// * all three pledges: 100.00
#[must_use]
pub fn assign_input(card_id: i64, year: i32) -> assignment::AssignCard {
    assignment::AssignCard {
        card_id,
        member_id: None,
        full_name: "Asha Mrema".to_string(),
        phone_number: "0712345678".to_string(),
        year,
        pledged_ahadi: Decimal::new(10000, 2),
        pledged_shukrani: Decimal::new(10000, 2),
        pledged_majengo: Decimal::new(10000, 2),
    }
}

/// A card application input with sensible defaults.
///
/// # Defaults
/// * no requester context, phone `"0712345678"`
/// * no preferred number, no note
/// * all three pledges: 100.00
#[must_use]
pub fn submit_input(street_id: i64) -> crate::core::application::SubmitApplication {
    crate::core::application::SubmitApplication {
        requester_member_id: None,
        full_name: "Asha Mrema".to_string(),
        phone_number: "0712345678".to_string(),
        street_id,
        preferred_number: None,
        note: None,
        pledged_ahadi: Decimal::new(10000, 2),
        pledged_shukrani: Decimal::new(10000, 2),
        pledged_majengo: Decimal::new(10000, 2),
    }
}

/// Opens a registration window spanning an hour either side of now.
pub async fn open_test_window(db: &DatabaseConnection) -> Result<crate::entities::window::Model> {
    let now = Utc::now();
    window::open_window(db, now - Duration::hours(1), now + Duration::hours(1)).await
}

/// Sets up a complete test environment with one street named "Test Street".
/// Returns (db, street) for common test scenarios.
pub async fn setup_with_street() -> Result<(DatabaseConnection, street::Model)> {
    let db = setup_test_db().await?;
    let street = create_test_street(&db, "Test Street").await?;
    Ok((db, street))
}
