//! Order Discord commands - listing, details, status changes and tracking.
//!
//! All commands here are admin only. They call into `core::order` and turn
//! client-side failures (unknown order, illegal status move) into inline ❌
//! replies; anything else goes to the framework error handler.

use crate::{
    core::{catalog::format_currency, status::OrderStatus},
    entities::{print_order, status_history},
};
use std::fmt::Write;

/// Orders shown per `/orders` page
pub const ORDERS_PER_PAGE: u64 = 10;
/// History entries shown by `/order`
const HISTORY_LINES: usize = 10;
/// Discord rejects embed field values longer than this
pub(crate) const EMBED_FIELD_LIMIT: usize = 1024;
/// Share of Discord's 6000 character embed limit left for fields after the
/// title, description and footer
const EMBED_FIELDS_BUDGET: usize = 5500;

/// Display label for a stored status, falling back to the raw value.
pub(crate) fn status_label(raw: &str) -> String {
    raw.parse::<OrderStatus>()
        .map_or_else(|_| raw.to_string(), |status| status.info().label.to_string())
}

/// Two-line summary of an order for list embeds.
pub(crate) fn order_line(order: &print_order::Model) -> String {
    format!(
        "{} · {} · {}\n{} · {} × {} · {}",
        status_label(&order.status),
        format_currency(order.total_price),
        order.payment_status,
        order.customer_email,
        order.material.to_uppercase(),
        order.quantity,
        order.created_at.format("%Y-%m-%d"),
    )
}

/// Bounding box of an order, if the model was measured.
pub(crate) fn dimensions_text(order: &print_order::Model) -> Option<String> {
    match (order.dimension_x, order.dimension_y, order.dimension_z) {
        (Some(x), Some(y), Some(z)) => Some(format!("{x:.1} × {y:.1} × {z:.1} mm")),
        _ => None,
    }
}

/// Most recent history entries, oldest first.
pub(crate) fn history_text(history: &[status_history::Model]) -> Result<String, std::fmt::Error> {
    let mut text = String::new();
    let skip = history.len().saturating_sub(HISTORY_LINES);
    for entry in &history[skip..] {
        let from = entry
            .previous_status
            .as_deref()
            .map_or_else(|| "created".to_string(), status_label);
        write!(
            &mut text,
            "`{}` {} → **{}** by {}",
            entry.created_at.format("%m-%d %H:%M"),
            from,
            status_label(&entry.new_status),
            entry.changed_by,
        )?;
        if let Some(note) = &entry.note {
            write!(&mut text, " ({note})")?;
        }
        text.push('\n');
    }
    Ok(text)
}

/// Cuts `value` to at most `limit` characters, ending in `…` when shortened.
pub(crate) fn truncate_field(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let mut cut: String = value.chars().take(limit.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Truncates embed fields so each fits Discord's field limit and together
/// they stay inside the embed limit. Earlier fields get room first.
pub(crate) fn fit_fields(fields: Vec<(String, String, bool)>) -> Vec<(String, String, bool)> {
    let mut remaining = EMBED_FIELDS_BUDGET;
    fields
        .into_iter()
        .map(|(name, value, inline)| {
            let name_len = name.chars().count();
            let room = remaining
                .saturating_sub(name_len)
                .clamp(1, EMBED_FIELD_LIMIT);
            let value = truncate_field(&value, room);
            remaining = remaining.saturating_sub(name_len + value.chars().count());
            (name, value, inline)
        })
        .collect()
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{
        ORDERS_PER_PAGE, dimensions_text, fit_fields, history_text, order_line, status_label,
    };
    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            catalog::format_currency,
            order::{self as order_core, OrderFilter, OrderUpdate},
            status::OrderStatus,
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Replies inline for client-side errors, propagates the rest.
    async fn reply_or_raise(ctx: poise::Context<'_, BotData, Error>, error: Error) -> Result<()> {
        if error.status_code().is_client_error() {
            ctx.say(format!("❌ {error}")).await?;
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Lists orders, newest first, optionally filtered by status.
    #[poise::command(slash_command, check = "crate::bot::admin_check")]
    pub async fn orders(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only show orders in this status"]
        #[autocomplete = "autocomplete::autocomplete_status"]
        status: Option<String>,
        #[description = "Page number (starts at 1)"]
        #[min = 1]
        page: Option<u64>,
    ) -> Result<()> {
        let status = match status.as_deref().map(str::parse::<OrderStatus>).transpose() {
            Ok(status) => status,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        let db = &ctx.data().database;
        let filter = OrderFilter {
            status,
            page,
            per_page: Some(ORDERS_PER_PAGE),
            ..Default::default()
        };
        let listing = match order_core::list_orders(db, &filter).await {
            Ok(listing) => listing,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        if listing.orders.is_empty() {
            ctx.say("📦 No orders found.").await?;
            return Ok(());
        }

        let filter_text = status.map_or_else(String::new, |s| format!(" · {}", s.info().label));
        let fields: Vec<(String, String, bool)> = listing
            .orders
            .iter()
            .map(|o| (o.order_number.clone(), order_line(o), false))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("📦 Orders")
            .description(format!(
                "Page {}/{} · {} total{filter_text}",
                listing.page,
                listing.total_pages.max(1),
                listing.total
            ))
            .color(0x0034_98db_u32)
            .fields(fit_fields(fields));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Shows one order with its status history.
    #[poise::command(slash_command, check = "crate::bot::admin_check")]
    pub async fn order(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number, e.g. BP-20260314-4F9A2C"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(order) = order_core::get_order_by_number(db, &order_number).await? else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };
        let status = order_core::order_status(&order)?;
        let info = status.info();
        let history = order_core::get_status_history(db, order.id).await?;

        let customer = [
            order.customer_name.clone(),
            Some(order.customer_email.clone()),
            order.customer_phone.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join("\n");

        let print = format!(
            "{} · {} · {} quality\n{}% infill · {}× scale · qty {}",
            order.material.to_uppercase(),
            order.color.as_deref().unwrap_or("any color"),
            order.quality,
            order.infill,
            order.scale,
            order.quantity,
        );

        let next = if status.is_terminal() {
            "None (final)".to_string()
        } else {
            status
                .next_statuses()
                .iter()
                .map(|s| format!("`{s}`"))
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut fields = vec![
            ("Customer".to_string(), customer, true),
            ("File".to_string(), order.file_name.clone(), true),
            ("Print".to_string(), print, false),
            (
                "Total".to_string(),
                format_currency(order.total_price),
                true,
            ),
            ("Payment".to_string(), order.payment_status.clone(), true),
        ];
        if let Some(dimensions) = dimensions_text(&order) {
            fields.push(("Size".to_string(), dimensions, true));
        }
        if let Some(tracking) = &order.tracking_number {
            fields.push(("Tracking".to_string(), tracking.clone(), true));
        }
        if let Some(notes) = &order.notes {
            fields.push(("Customer notes".to_string(), notes.clone(), false));
        }
        if let Some(notes) = &order.admin_notes {
            fields.push(("Admin notes".to_string(), notes.clone(), false));
        }
        fields.push(("Next status".to_string(), next, false));
        let history = history_text(&history)?;
        if !history.is_empty() {
            fields.push(("History".to_string(), history, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("🧾 {}", order.order_number))
            .description(format!("**{}** - {}", info.label, info.description))
            .color(info.color)
            .fields(fit_fields(fields))
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Placed {}",
                order.created_at.format("%Y-%m-%d %H:%M UTC")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Moves an order to its next status.
    #[poise::command(slash_command, check = "crate::bot::admin_check")]
    pub async fn order_status(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
        #[description = "New status"]
        #[autocomplete = "autocomplete::autocomplete_next_status"]
        status: String,
        #[description = "Optional note for the history log"] note: Option<String>,
    ) -> Result<()> {
        let next = match status.parse::<OrderStatus>() {
            Ok(next) => next,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        let db = &ctx.data().database;
        let Some(order) = order_core::get_order_by_number(db, &order_number).await? else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };
        let previous = status_label(&order.status);
        let actor = ctx.author().id.to_string();

        match order_core::transition_status(db, order.id, next, &actor, note).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✅ Order **{}** moved from {previous} to **{}**",
                    updated.order_number,
                    next.info().label
                ))
                .await?;
            }
            Err(Error::InvalidTransition { from, to }) => {
                let allowed = from
                    .next_statuses()
                    .iter()
                    .map(|s| format!("`{s}`"))
                    .collect::<Vec<_>>();
                let allowed = if allowed.is_empty() {
                    "none, the order is final".to_string()
                } else {
                    allowed.join(", ")
                };
                ctx.say(format!(
                    "❌ Cannot move **{}** from `{from}` to `{to}`. Allowed next: {allowed}",
                    order.order_number
                ))
                .await?;
            }
            Err(e) => return reply_or_raise(ctx, e).await,
        }
        Ok(())
    }

    /// Sets the shipment tracking number of an order.
    #[poise::command(slash_command, check = "crate::bot::admin_check")]
    pub async fn order_tracking(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Order number"]
        #[autocomplete = "autocomplete::autocomplete_order_number"]
        order_number: String,
        #[description = "Courier tracking number"] tracking: String,
    ) -> Result<()> {
        let tracking = tracking.trim().to_string();
        if tracking.is_empty() {
            ctx.say("❌ Tracking number cannot be empty").await?;
            return Ok(());
        }

        let db = &ctx.data().database;
        let Some(order) = order_core::get_order_by_number(db, &order_number).await? else {
            ctx.say(format!("❌ Order '{order_number}' not found."))
                .await?;
            return Ok(());
        };

        let update = OrderUpdate {
            tracking_number: Some(tracking.clone()),
            ..Default::default()
        };
        let actor = ctx.author().id.to_string();
        let updated = match order_core::update_order(db, order.id, update, &actor).await {
            Ok(updated) => updated,
            Err(e) => return reply_or_raise(ctx, e).await,
        };

        ctx.say(format!(
            "✅ Tracking for **{}** set to `{tracking}` (status: {})",
            updated.order_number,
            status_label(&updated.status)
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
