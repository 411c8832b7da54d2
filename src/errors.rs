//! Unified error type for the quoting, ordering and admin layers.
//!
//! Every fallible operation in the crate returns [`Result`]. The HTTP layer maps
//! variants onto status codes (see `api::error`), the bot layer turns them into
//! inline replies.

use crate::core::status::OrderStatus;
use thiserror::Error;

/// Errors produced by the BoxPrint service
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description of the problem
        message: String,
    },

    /// A request field is missing or out of range
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// A monetary amount is negative or not a finite number
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A status string is not part of the closed enumeration
    #[error("Unknown status '{value}'")]
    InvalidStatus {
        /// The rejected value
        value: String,
    },

    /// The status registry does not allow this move
    #[error("Cannot move order from '{from}' to '{to}'")]
    InvalidTransition {
        /// Current status of the order
        from: OrderStatus,
        /// Requested status
        to: OrderStatus,
    },

    /// No order matches the given id or order number
    #[error("Order '{id}' not found")]
    OrderNotFound {
        /// Id or order number that was looked up
        id: String,
    },

    /// The uploaded model could not be parsed
    #[error("Could not read model: {reason}")]
    Mesh {
        /// What went wrong while parsing
        reason: String,
    },

    /// The caller did not identify itself
    #[error("Authentication required")]
    Unauthorized,

    /// The caller is authenticated but lacks the admin role
    #[error("Admin access required")]
    Forbidden,

    /// Database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Integer conversion failure
    #[error("Numeric conversion error: {0}")]
    Conversion(#[from] std::num::TryFromIntError),

    /// String formatting failure
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Environment variable failure
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Serenity/Poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

impl Error {
    /// Shorthand for building a [`Error::Validation`]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
