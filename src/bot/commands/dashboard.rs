//! Dashboard Discord command - order counts and paid revenue at a glance.

use crate::core::{catalog::format_currency, report::OrderSummary};
use std::fmt::Write;

/// Non-zero status counts, one per line, in lifecycle order.
pub(crate) fn status_breakdown(summary: &OrderSummary) -> Result<String, std::fmt::Error> {
    let mut text = String::new();
    for entry in summary.status_counts.iter().filter(|c| c.count > 0) {
        writeln!(&mut text, "**{}:** {}", entry.label, entry.count)?;
    }
    if text.is_empty() {
        text.push_str("No orders yet");
    }
    Ok(text)
}

/// Recent orders as `number · status · total` lines.
pub(crate) fn recent_orders(summary: &OrderSummary) -> Result<String, std::fmt::Error> {
    let mut text = String::new();
    for order in &summary.recent_orders {
        writeln!(
            &mut text,
            "`{}` · {} · {}",
            order.order_number,
            super::orders::status_label(&order.status),
            format_currency(order.total_price)
        )?;
    }
    Ok(text)
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{recent_orders, status_breakdown};
    use crate::{
        bot::BotData,
        core::{catalog::format_currency, report},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    /// Shows order counts per status, pending work and paid revenue.
    #[poise::command(slash_command, check = "crate::bot::admin_check")]
    pub async fn dashboard(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let summary = report::generate_order_summary(db).await?;

        let mut fields = vec![
            (
                "Total orders".to_string(),
                summary.total_orders.to_string(),
                true,
            ),
            (
                "Awaiting review".to_string(),
                summary.pending_orders.to_string(),
                true,
            ),
            (
                "In progress".to_string(),
                summary.in_progress_orders.to_string(),
                true,
            ),
            (
                "Paid revenue".to_string(),
                format_currency(summary.paid_revenue),
                true,
            ),
            ("By status".to_string(), status_breakdown(&summary)?, false),
        ];
        let recent = recent_orders(&summary)?;
        if !recent.is_empty() {
            fields.push(("Latest orders".to_string(), recent, false));
        }

        let embed = serenity::CreateEmbed::default()
            .title("📊 BoxPrint Dashboard")
            .color(0x002e_cc71_u32)
            .fields(fields)
            .timestamp(serenity::Timestamp::now());

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::{order, report, status::OrderStatus},
        errors::Result,
        test_utils::*,
    };

    #[tokio::test]
    async fn test_dashboard_text() -> Result<()> {
        let db = setup_test_db().await?;
        let empty = report::generate_order_summary(&db).await?;
        assert_eq!(status_breakdown(&empty)?, "No orders yet");
        assert!(recent_orders(&empty)?.is_empty());

        let first = create_test_order(&db).await?;
        create_test_order(&db).await?;
        order::transition_status(&db, first.id, OrderStatus::Confirmed, "42", None).await?;

        let summary = report::generate_order_summary(&db).await?;
        assert_eq!(
            status_breakdown(&summary)?,
            "**Pending:** 1\n**Confirmed:** 1\n"
        );
        let recent = recent_orders(&summary)?;
        assert_eq!(recent.lines().count(), 2);
        assert!(recent.contains(&format!("`{}` · Confirmed · ₹199.00", first.order_number)));
        Ok(())
    }
}
