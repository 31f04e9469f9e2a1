//! Database configuration module for the offering ledger.
//!
//! This module handles `SQLite` database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions via `Schema::create_table_from_entity`,
//! so the database schema always matches the Rust struct definitions. On top of the
//! generated tables it creates the composite unique indexes that back the ledger's
//! conflict guarantees: one card per `(street, number)` and one assignment per
//! `(card, year)`. Those indexes are the ultimate guard against check-then-act races;
//! application-level pre-checks only exist to produce friendly errors.

use crate::entities::{
    ActivityLog, Application, Assignment, Batch, Card, Entry, Member, Offering, Outbox, Street,
    Window, WindowState, assignment, card,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};

/// Gets the database URL from environment variable or returns default `SQLite` path.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://data/offering_ledger.sqlite".to_string())
}

/// Establishes a connection to the `SQLite` database using the `DATABASE_URL`
/// environment variable, falling back to a default local file.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

/// Creates all database tables and the composite unique indexes.
///
/// Uses `SeaORM`'s schema generation so the tables always match the entity
/// definitions. Safe to call on an existing database; everything is created
/// with `IF NOT EXISTS`.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let tables = [
        schema.create_table_from_entity(Street),
        schema.create_table_from_entity(Member),
        schema.create_table_from_entity(Card),
        schema.create_table_from_entity(Assignment),
        schema.create_table_from_entity(Application),
        schema.create_table_from_entity(Window),
        schema.create_table_from_entity(WindowState),
        schema.create_table_from_entity(Batch),
        schema.create_table_from_entity(Entry),
        schema.create_table_from_entity(Outbox),
        schema.create_table_from_entity(Offering),
        schema.create_table_from_entity(ActivityLog),
    ];
    for mut table in tables {
        table.if_not_exists();
        db.execute(builder.build(&table)).await?;
    }

    // One card per (street, number); one assignment per (card, year).
    let card_index = Index::create()
        .name("ux_offering_cards_street_number")
        .table(Card)
        .col(card::Column::StreetId)
        .col(card::Column::Number)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&card_index)).await?;

    let assignment_index = Index::create()
        .name("ux_card_assignments_card_year")
        .table(Assignment)
        .col(assignment::Column::CardId)
        .col(assignment::Column::Year)
        .unique()
        .if_not_exists()
        .to_owned();
    db.execute(builder.build(&assignment_index)).await?;

    Ok(())
}
