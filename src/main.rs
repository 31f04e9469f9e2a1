//! Service entry point: initializes the database, seeds streets from
//! configuration, and runs the legacy-ledger outbox worker.

use offering_ledger::config;
use offering_ledger::core::sync;
use offering_ledger::errors::Result;

use chrono::Utc;
use dotenvy::dotenv;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// How often the outbox worker mirrors pending entries.
const DRAIN_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    // 3. Initialize database
    let db = config::database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    config::database::create_tables(&db)
        .await
        .inspect(|()| info!("Database schema ready."))
        .inspect_err(|e| error!("Failed to create database schema: {e}"))?;

    // 4. Seed streets from config.toml, if one is present
    match config::streets::load_default_config() {
        Ok(cfg) => {
            let seeded = seed_streets(&db, &cfg).await?;
            if seeded > 0 {
                info!(seeded, "Seeded streets from config.toml.");
            }
        }
        Err(e) => info!("No street seed configuration loaded ({e}); continuing."),
    }

    // 5. Run the outbox worker: mirror recorded entries into the legacy
    //    ledger until shut down
    info!("Starting legacy-ledger outbox worker.");
    let mut ticker = tokio::time::interval(DRAIN_INTERVAL);
    loop {
        ticker.tick().await;
        sync::drain_best_effort(&db).await;
    }
}

/// Inserts any configured streets that do not exist yet; returns how many
/// were created.
async fn seed_streets(
    db: &DatabaseConnection,
    cfg: &config::streets::Config,
) -> Result<u32> {
    use offering_ledger::entities::{Street, street};

    let mut seeded = 0;
    for entry in &cfg.streets {
        let exists = Street::find()
            .filter(street::Column::Name.eq(&entry.name))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }
        street::ActiveModel {
            name: Set(entry.name.clone()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        seeded += 1;
    }
    Ok(seeded)
}
