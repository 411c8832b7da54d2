//! Dashboard reporting over print orders.
//!
//! Aggregates are computed in the database and returned as plain data so the
//! HTTP API and the Discord bot can format them however they like.

use crate::{
    core::status::{OrderStatus, PaymentStatus},
    entities::{PrintOrder, print_order},
    errors::Result,
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*, sea_query::Expr};
use serde::Serialize;

/// Number of recent orders included in a summary
pub const RECENT_ORDER_LIMIT: u64 = 5;

/// Order count for one fulfillment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: OrderStatus,
    pub label: &'static str,
    pub count: u64,
}

/// Back-office overview of all orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    /// One entry per status, in lifecycle order, zeros included
    pub status_counts: Vec<StatusCount>,
    pub total_orders: u64,
    /// Sum of `total_price` over orders whose payment is `paid`
    pub paid_revenue: f64,
    /// Orders still waiting for review
    pub pending_orders: u64,
    /// Orders that are neither terminal nor pending
    pub in_progress_orders: u64,
    pub recent_orders: Vec<print_order::Model>,
}

impl OrderSummary {
    /// Count for a single status.
    #[must_use]
    pub fn count_for(&self, status: OrderStatus) -> u64 {
        self.status_counts
            .iter()
            .find(|c| c.status == status)
            .map_or(0, |c| c.count)
    }
}

/// Builds the dashboard summary.
pub async fn generate_order_summary<C>(db: &C) -> Result<OrderSummary>
where
    C: ConnectionTrait,
{
    let grouped: Vec<(String, i64)> = PrintOrder::find()
        .select_only()
        .column(print_order::Column::Status)
        .column_as(Expr::col(print_order::Column::Id).count(), "count")
        .group_by(print_order::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut status_counts: Vec<StatusCount> = OrderStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            label: status.info().label,
            count: 0,
        })
        .collect();
    let mut total_orders = 0;
    for (raw, count) in grouped {
        let count = u64::try_from(count)?;
        total_orders += count;
        match raw.parse::<OrderStatus>() {
            Ok(status) => {
                if let Some(entry) = status_counts.iter_mut().find(|c| c.status == status) {
                    entry.count = count;
                }
            }
            Err(_) => tracing::warn!(status = %raw, count, "Orders with unknown status"),
        }
    }

    let paid_revenue: Option<Option<f64>> = PrintOrder::find()
        .select_only()
        .column_as(Expr::col(print_order::Column::TotalPrice).sum(), "revenue")
        .filter(print_order::Column::PaymentStatus.eq(PaymentStatus::Paid.as_str()))
        .into_tuple()
        .one(db)
        .await?;

    let recent_orders = PrintOrder::find()
        .order_by_desc(print_order::Column::CreatedAt)
        .order_by_desc(print_order::Column::Id)
        .limit(RECENT_ORDER_LIMIT)
        .all(db)
        .await?;

    let pending_orders = status_counts
        .iter()
        .find(|c| c.status == OrderStatus::Pending)
        .map_or(0, |c| c.count);
    let in_progress_orders = status_counts
        .iter()
        .filter(|c| c.status != OrderStatus::Pending && !c.status.is_terminal())
        .map(|c| c.count)
        .sum();

    Ok(OrderSummary {
        status_counts,
        total_orders,
        paid_revenue: paid_revenue.flatten().unwrap_or(0.0),
        pending_orders,
        in_progress_orders,
        recent_orders,
    })
}
