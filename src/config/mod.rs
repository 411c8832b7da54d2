/// Bootstrap admin ids from environment variables
pub mod admins;

/// Database configuration and connection management
pub mod database;

/// Server, storage and admin settings from config.toml
pub mod settings;
