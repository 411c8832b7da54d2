//! Bot layer - Discord admin back office
//!
//! This module provides the Discord interface for BoxPrint staff: order
//! listings, status changes, tracking numbers and the dashboard. Every order
//! command is gated on the `admin_roles` table.

/// Discord command implementations (orders, dashboard, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    core::auth,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};

/// Shared data available to all bot commands.
/// This structure holds the database connection and any other global state
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection.
    #[must_use]
    pub const fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

/// Poise context used by every command
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Command check: only users in `admin_roles` may run order commands.
///
/// Non-admins get an ephemeral refusal instead of the generic check failure.
pub async fn admin_check(ctx: Context<'_>) -> Result<bool> {
    let user_id = ctx.author().id.to_string();
    if auth::is_admin(&ctx.data().database, &user_id).await? {
        return Ok(true);
    }

    warn!(user_id = %user_id, command = %ctx.command().name, "Non-admin used an admin command");
    ctx.send(
        poise::CreateReply::default()
            .content("❌ This command is for BoxPrint admins only.")
            .ephemeral(true),
    )
    .await?;
    Ok(false)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx
                .say("❌ Something went wrong while running that command.")
                .await
            {
                error!("Failed to send error message: {e}");
            }
        }
        // The check already replied to the user
        poise::FrameworkError::CommandCheckFailed { .. } => {}
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Runs the Discord bot until the gateway connection ends.
///
/// # Errors
/// Returns a framework error if the client cannot be built or the connection fails.
#[instrument(skip(token, database))]
pub async fn run_bot(token: &str, database: DatabaseConnection) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::orders(),
                commands::order(),
                commands::order_status(),
                commands::order_tracking(),
                commands::dashboard(),
                commands::ping(),
                commands::help(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData::new(database))
            })
        })
        .build();

    // Slash commands only, no message content needed
    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {e:?}"))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {e:?}"))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
