//! General Discord commands - ping and help.
//! These commands need no database access and are open to everyone.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**BoxPrint Help**\n\
        Back-office commands for custom 3D print orders. Order commands are admin only.\n\n\
        **Orders**\n\
        • `/orders [status] [page]` - Lists orders, newest first.\n\
        • `/order <order_number>` - Shows an order with its status history.\n\
        • `/order_status <order_number> <status> [note]` - Moves an order to its next status.\n\
        • `/order_tracking <order_number> <tracking>` - Sets the shipment tracking number.\n\
        • `/dashboard` - Shows order counts and paid revenue.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Statuses flow pending → confirmed → printing → quality_check → shipped → delivered → completed. \
        Failed prints can be re-confirmed; cancelled and completed orders are final.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
