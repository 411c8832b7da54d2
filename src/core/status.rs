//! Order status registry.
//!
//! Fixed adjacency list of the nine fulfillment statuses, per-status display
//! metadata and the separate payment status enumeration. Status columns are
//! stored as the snake_case names produced by [`OrderStatus::as_str`].

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Fulfillment status of a print order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Printing,
    QualityCheck,
    Shipped,
    Delivered,
    Completed,
    Cancelled,
    Failed,
}

/// Display metadata for a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusInfo {
    pub label: &'static str,
    pub description: &'static str,
    /// Embed / badge color as 0xRRGGBB
    pub color: u32,
}

impl OrderStatus {
    /// Every status, in workflow order
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Confirmed,
        Self::Printing,
        Self::QualityCheck,
        Self::Shipped,
        Self::Delivered,
        Self::Completed,
        Self::Cancelled,
        Self::Failed,
    ];

    /// Statuses an order may move to from this one.
    #[must_use]
    pub const fn next_statuses(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Cancelled],
            Self::Confirmed => &[Self::Printing, Self::Cancelled],
            Self::Printing => &[Self::QualityCheck, Self::Failed],
            Self::QualityCheck => &[Self::Shipped, Self::Failed],
            Self::Shipped => &[Self::Delivered],
            Self::Delivered => &[Self::Completed],
            Self::Completed | Self::Cancelled => &[],
            Self::Failed => &[Self::Confirmed],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next_statuses().contains(&next)
    }

    /// True when no further transition is possible
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        self.next_statuses().is_empty()
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Printing => "printing",
            Self::QualityCheck => "quality_check",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }

    #[must_use]
    pub const fn info(self) -> StatusInfo {
        match self {
            Self::Pending => StatusInfo {
                label: "Pending",
                description: "Order received, awaiting review",
                color: 0x00F5_9E0B,
            },
            Self::Confirmed => StatusInfo {
                label: "Confirmed",
                description: "Model checked and queued for printing",
                color: 0x003B_82F6,
            },
            Self::Printing => StatusInfo {
                label: "Printing",
                description: "On the printer",
                color: 0x008B_5CF6,
            },
            Self::QualityCheck => StatusInfo {
                label: "Quality Check",
                description: "Print finished, being inspected",
                color: 0x0006_B6D4,
            },
            Self::Shipped => StatusInfo {
                label: "Shipped",
                description: "Handed to the courier",
                color: 0x0063_66F1,
            },
            Self::Delivered => StatusInfo {
                label: "Delivered",
                description: "Received by the customer",
                color: 0x0010_B981,
            },
            Self::Completed => StatusInfo {
                label: "Completed",
                description: "Order closed",
                color: 0x0022_C55E,
            },
            Self::Cancelled => StatusInfo {
                label: "Cancelled",
                description: "Order cancelled",
                color: 0x006B_7280,
            },
            Self::Failed => StatusInfo {
                label: "Failed",
                description: "Print failed, can be re-queued",
                color: 0x00EF_4444,
            },
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// Payment state of an order, tracked separately from fulfillment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const ALL: [Self; 4] = [Self::Pending, Self::Paid, Self::Failed, Self::Refunded];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| Error::InvalidStatus {
                value: s.to_string(),
            })
    }
}

/// One row of the registry as exposed to clients
#[derive(Debug, Clone, Serialize)]
pub struct StatusDescriptor {
    pub status: OrderStatus,
    pub info: StatusInfo,
    pub next: &'static [OrderStatus],
    pub terminal: bool,
}

/// The whole registry, in workflow order.
#[must_use]
pub fn registry() -> Vec<StatusDescriptor> {
    OrderStatus::ALL
        .into_iter()
        .map(|status| StatusDescriptor {
            status,
            info: status.info(),
            next: status.next_statuses(),
            terminal: status.is_terminal(),
        })
        .collect()
}
