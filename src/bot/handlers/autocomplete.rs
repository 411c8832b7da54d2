//! Autocomplete handlers for Discord slash command parameters.
//!
//! Order numbers come from the most recent orders; status suggestions follow
//! the status registry so admins are only offered moves that will succeed.
//!
//! Poise does not run a command's `check` before its autocomplete callbacks,
//! so anything that reads orders gates on the caller itself.

use crate::{
    bot::BotData,
    core::{
        auth,
        order::{self, OrderFilter},
        status::OrderStatus,
    },
    errors::Error,
};
use poise::serenity_prelude as serenity;
use sea_orm::ConnectionTrait;
use tracing::warn;

/// Discord shows at most 25 suggestions
const AUTOCOMPLETE_LIMIT: usize = 25;

/// Whether `user_id` may see order data in suggestions.
///
/// Lookup failures count as "no".
pub async fn may_suggest_orders<C>(db: &C, user_id: &str) -> bool
where
    C: ConnectionTrait,
{
    auth::is_admin(db, user_id)
        .await
        .inspect_err(|e| warn!("Admin lookup for autocomplete failed: {e}"))
        .unwrap_or(false)
}

/// Suggests recent order numbers matching the partial input.
///
/// # Arguments
/// * `ctx` - The poise context containing the database connection
/// * `partial` - The partial string the user has typed so far
pub async fn autocomplete_order_number(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    if !may_suggest_orders(db, &ctx.author().id.to_string()).await {
        return Vec::new();
    }
    let filter = OrderFilter {
        search: Some(partial.trim().to_string()).filter(|s| !s.is_empty()),
        per_page: Some(AUTOCOMPLETE_LIMIT as u64),
        ..Default::default()
    };

    let Ok(page) = order::list_orders(db, &filter).await else {
        return Vec::new();
    };

    page.orders
        .into_iter()
        .map(|o| o.order_number)
        .take(AUTOCOMPLETE_LIMIT)
        .collect()
}

/// Statuses whose name or label contains `partial`, case-insensitive.
#[must_use]
pub fn matching_statuses(candidates: &[OrderStatus], partial: &str) -> Vec<String> {
    let partial_lower = partial.trim().to_lowercase();
    candidates
        .iter()
        .filter(|status| {
            status.as_str().contains(&partial_lower)
                || status.info().label.to_lowercase().contains(&partial_lower)
        })
        .map(|status| status.as_str().to_string())
        .take(AUTOCOMPLETE_LIMIT)
        .collect()
}

/// Suggests any status, for filters.
pub async fn autocomplete_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching_statuses(&OrderStatus::ALL, partial)
}

/// Value of a string option the user has already filled in.
fn string_arg(ctx: poise::Context<'_, BotData, Error>, name: &str) -> Option<String> {
    let poise::Context::Application(app_ctx) = ctx else {
        return None;
    };
    app_ctx
        .args
        .iter()
        .find(|option| option.name == name)
        .and_then(|option| match option.value {
            serenity::ResolvedValue::String(value) => Some(value.to_string()),
            _ => None,
        })
}

/// Suggests the statuses the chosen order may move to next.
///
/// Falls back to every status while the order number is still missing or unknown.
pub async fn autocomplete_next_status(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    if !may_suggest_orders(db, &ctx.author().id.to_string()).await {
        return Vec::new();
    }

    let Some(order_number) = string_arg(ctx, "order_number") else {
        return matching_statuses(&OrderStatus::ALL, partial);
    };

    let current = order::get_order_by_number(db, &order_number)
        .await
        .ok()
        .flatten()
        .and_then(|o| order::order_status(&o).ok());

    match current {
        Some(status) => matching_statuses(status.next_statuses(), partial),
        None => matching_statuses(&OrderStatus::ALL, partial),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::Result, test_utils::*};

    #[tokio::test]
    async fn test_only_admins_get_order_suggestions() -> Result<()> {
        let (db, _order) = setup_with_admin("111").await?;
        assert!(may_suggest_orders(&db, "111").await);
        assert!(!may_suggest_orders(&db, "222").await);

        auth::revoke_admin(&db, "111").await?;
        assert!(!may_suggest_orders(&db, "111").await);
        Ok(())
    }

    #[test]
    fn test_matching_statuses_by_name_and_label() {
        assert_eq!(
            matching_statuses(&OrderStatus::ALL, "quality"),
            vec!["quality_check"]
        );
        assert_eq!(matching_statuses(&OrderStatus::ALL, "").len(), 9);
        assert_eq!(
            matching_statuses(OrderStatus::Pending.next_statuses(), "c"),
            vec!["confirmed", "cancelled"]
        );
        assert!(matching_statuses(OrderStatus::Completed.next_statuses(), "").is_empty());
    }
}
