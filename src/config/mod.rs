/// Database configuration and connection management
pub mod database;

/// Street seeding configuration from config.toml
pub mod streets;
