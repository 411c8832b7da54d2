//! Print order business logic - creation, lookup, listing and status changes.
//!
//! Status changes go through the registry in [`crate::core::status`]: a move
//! the registry does not allow is rejected, and the order update plus its
//! history row are written in one database transaction so the audit log can
//! never disagree with the order.

use crate::{
    core::{
        catalog::{self, MAX_QUANTITY, MIN_ORDER_VALUE},
        mesh::Dimensions,
        status::{OrderStatus, PaymentStatus},
    },
    entities::{PrintOrder, StatusHistory, print_order, status_history},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Condition, QueryOrder, Set, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Actor recorded for changes made through the public checkout
pub const CUSTOMER_ACTOR: &str = "customer";
/// Default page size for order listings
pub const DEFAULT_PAGE_SIZE: u64 = 20;
/// Largest page size a caller may ask for
pub const MAX_PAGE_SIZE: u64 = 100;

/// Postal address an order ships to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub name: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    pub phone: Option<String>,
}

fn default_country() -> String {
    "IN".to_string()
}

/// Checkout payload.
///
/// Required fields are optional here so that a missing field is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewOrder {
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
    pub file_size: Option<i64>,
    pub file_path: Option<String>,
    pub file_checksum: Option<String>,
    pub material: Option<String>,
    pub color: Option<String>,
    pub quality: Option<String>,
    pub infill: Option<f64>,
    pub scale: Option<f64>,
    pub quantity: Option<i32>,
    pub dimensions: Option<Dimensions>,
    pub volume: Option<f64>,
    pub material_cost: Option<f64>,
    pub labor_cost: Option<f64>,
    pub setup_fee: Option<f64>,
    pub unit_price: Option<f64>,
    pub total_price: Option<f64>,
    pub shipping_address: Option<ShippingAddress>,
    pub notes: Option<String>,
}

/// Admin edit of an order. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    /// Note stored on the history entry when the status changes
    pub status_note: Option<String>,
}

/// Listing filter, 1-based pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// One page of orders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderPage {
    pub orders: Vec<print_order::Model>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::validation(format!("Missing required field: {field}")))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Generates a fresh order number, e.g. `BP-20260314-4F9A2C`.
#[must_use]
pub fn generate_order_number() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string()[..6].to_ascii_uppercase();
    format!("BP-{}-{suffix}", Utc::now().format("%Y%m%d"))
}

/// Parses the stored fulfillment status of an order.
///
/// # Errors
/// Returns [`Error::InvalidStatus`] if the row holds an unknown value.
pub fn order_status(order: &print_order::Model) -> Result<OrderStatus> {
    order.status.parse()
}

/// Decodes the stored shipping address, if any.
#[must_use]
pub fn shipping_address(order: &print_order::Model) -> Option<ShippingAddress> {
    order
        .shipping_address
        .as_ref()
        .and_then(|json| serde_json::from_value(json.clone()).ok())
}

/// Creates an order from a checkout payload.
///
/// The order starts `pending` / `pending` and gets a creation history entry in
/// the same transaction.
///
/// # Errors
/// Returns [`Error::Validation`] or [`Error::InvalidAmount`] for a bad payload,
/// [`Error::Database`] when the insert fails.
#[instrument(skip(db, new_order), fields(email = ?new_order.customer_email))]
pub async fn create_order(
    db: &DatabaseConnection,
    new_order: NewOrder,
) -> Result<print_order::Model> {
    let customer_email = required(new_order.customer_email, "customer_email")?;
    if !customer_email.contains('@') {
        return Err(Error::validation(format!(
            "Invalid customer email '{customer_email}'"
        )));
    }
    let file_name = required(new_order.file_name, "file_name")?;
    let material = required(new_order.material, "material")?.to_ascii_lowercase();
    let total_price = new_order
        .total_price
        .ok_or_else(|| Error::validation("Missing required field: total_price"))?;

    if catalog::find_material(&material).is_none() {
        return Err(Error::validation(format!("Unknown material '{material}'")));
    }
    let quality = blank_to_none(new_order.quality)
        .unwrap_or_else(|| "standard".to_string())
        .to_ascii_lowercase();
    if catalog::find_quality(&quality).is_none() {
        return Err(Error::validation(format!("Unknown quality '{quality}'")));
    }
    if !total_price.is_finite() || total_price < 0.0 {
        return Err(Error::InvalidAmount {
            amount: total_price,
        });
    }
    let quantity = new_order.quantity.unwrap_or(1);
    if !(1..=MAX_QUANTITY).contains(&quantity) {
        return Err(Error::validation(format!(
            "Quantity must be between 1 and {MAX_QUANTITY}"
        )));
    }
    let infill = new_order.infill.unwrap_or(20.0);
    if !infill.is_finite() || !(0.0..=100.0).contains(&infill) {
        return Err(Error::validation("Infill must be between 0 and 100"));
    }
    let scale = new_order.scale.unwrap_or(1.0);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(Error::validation("Scale must be a positive number"));
    }

    let total_price = if total_price < MIN_ORDER_VALUE {
        warn!(total_price, "Order total below minimum, raising to {MIN_ORDER_VALUE}");
        MIN_ORDER_VALUE
    } else {
        total_price
    };

    let shipping_address = new_order
        .shipping_address
        .map(serde_json::to_value)
        .transpose()?;
    let dimensions = new_order.dimensions;
    let now = Utc::now();

    let txn = db.begin().await?;

    let order = print_order::ActiveModel {
        order_number: Set(generate_order_number()),
        customer_name: Set(blank_to_none(new_order.customer_name)),
        customer_email: Set(customer_email),
        customer_phone: Set(blank_to_none(new_order.customer_phone)),
        file_name: Set(file_name),
        file_type: Set(blank_to_none(new_order.file_type)),
        file_size: Set(new_order.file_size),
        file_path: Set(blank_to_none(new_order.file_path)),
        file_checksum: Set(blank_to_none(new_order.file_checksum)),
        material: Set(material),
        color: Set(blank_to_none(new_order.color)),
        quality: Set(quality),
        infill: Set(infill),
        scale: Set(scale),
        quantity: Set(quantity),
        dimension_x: Set(dimensions.map(|d| d.x)),
        dimension_y: Set(dimensions.map(|d| d.y)),
        dimension_z: Set(dimensions.map(|d| d.z)),
        volume: Set(new_order.volume),
        material_cost: Set(new_order.material_cost),
        labor_cost: Set(new_order.labor_cost),
        setup_fee: Set(new_order.setup_fee),
        unit_price: Set(new_order.unit_price),
        total_price: Set(total_price),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
        shipping_address: Set(shipping_address),
        tracking_number: Set(None),
        notes: Set(blank_to_none(new_order.notes)),
        admin_notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        shipped_at: Set(None),
        delivered_at: Set(None),
        completed_at: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    append_history(
        &txn,
        order.id,
        None,
        OrderStatus::Pending,
        CUSTOMER_ACTOR,
        Some("Order placed".to_string()),
    )
    .await?;

    txn.commit().await?;

    info!(order_number = %order.order_number, total_price, "Created print order");
    Ok(order)
}

/// Retrieves an order by its primary key.
pub async fn get_order_by_id<C>(db: &C, order_id: i64) -> Result<Option<print_order::Model>>
where
    C: ConnectionTrait,
{
    PrintOrder::find_by_id(order_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves an order by its human-readable number (case-insensitive).
pub async fn get_order_by_number<C>(
    db: &C,
    order_number: &str,
) -> Result<Option<print_order::Model>>
where
    C: ConnectionTrait,
{
    PrintOrder::find()
        .filter(print_order::Column::OrderNumber.eq(order_number.trim().to_ascii_uppercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Lists orders newest first, filtered and paginated.
///
/// `search` matches the order number, customer name or customer email.
pub async fn list_orders<C>(db: &C, filter: &OrderFilter) -> Result<OrderPage>
where
    C: ConnectionTrait,
{
    let per_page = filter
        .per_page
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let page = filter.page.unwrap_or(1).max(1);
    // the paginator multiplies without a check
    (page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| Error::validation(format!("Page {page} is out of range")))?;

    let mut query = PrintOrder::find();
    if let Some(status) = filter.status {
        query = query.filter(print_order::Column::Status.eq(status.as_str()));
    }
    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        query = query.filter(
            Condition::any()
                .add(print_order::Column::OrderNumber.contains(search))
                .add(print_order::Column::CustomerName.contains(search))
                .add(print_order::Column::CustomerEmail.contains(search)),
        );
    }

    let paginator = query
        .order_by_desc(print_order::Column::CreatedAt)
        .order_by_desc(print_order::Column::Id)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let orders = paginator.fetch_page(page - 1).await?;

    Ok(OrderPage {
        orders,
        total,
        page,
        per_page,
        total_pages: total.div_ceil(per_page),
    })
}

/// Status history of an order, oldest first.
pub async fn get_status_history<C>(db: &C, order_id: i64) -> Result<Vec<status_history::Model>>
where
    C: ConnectionTrait,
{
    StatusHistory::find()
        .filter(status_history::Column::OrderId.eq(order_id))
        .order_by_asc(status_history::Column::CreatedAt)
        .order_by_asc(status_history::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

async fn append_history<C>(
    db: &C,
    order_id: i64,
    previous: Option<OrderStatus>,
    next: OrderStatus,
    actor: &str,
    note: Option<String>,
) -> Result<status_history::Model>
where
    C: ConnectionTrait,
{
    status_history::ActiveModel {
        order_id: Set(order_id),
        previous_status: Set(previous.map(|s| s.as_str().to_string())),
        new_status: Set(next.as_str().to_string()),
        changed_by: Set(actor.to_string()),
        note: Set(note),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Moves `order` to `next` on the active model, stamping milestone timestamps.
fn apply_transition(
    active: &mut print_order::ActiveModel,
    current: OrderStatus,
    next: OrderStatus,
) -> Result<()> {
    if !current.can_transition_to(next) {
        return Err(Error::InvalidTransition {
            from: current,
            to: next,
        });
    }

    let now = Utc::now();
    active.status = Set(next.as_str().to_string());
    match next {
        OrderStatus::Shipped => active.shipped_at = Set(Some(now)),
        OrderStatus::Delivered => active.delivered_at = Set(Some(now)),
        OrderStatus::Completed => active.completed_at = Set(Some(now)),
        _ => {}
    }
    Ok(())
}

/// Applies an admin edit.
///
/// A status equal to the current one is ignored; any other status must be an
/// allowed move and is logged to the history in the same transaction.
///
/// # Errors
/// [`Error::OrderNotFound`], [`Error::InvalidTransition`], or a database error.
#[instrument(skip(db, update))]
pub async fn update_order(
    db: &DatabaseConnection,
    order_id: i64,
    update: OrderUpdate,
    actor: &str,
) -> Result<print_order::Model> {
    let txn = db.begin().await?;

    let order = get_order_by_id(&txn, order_id)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;
    let current = order_status(&order)?;
    let mut active: print_order::ActiveModel = order.into();

    let status_change = update.status.filter(|next| *next != current);
    if let Some(next) = status_change {
        apply_transition(&mut active, current, next)?;
    }
    if let Some(payment_status) = update.payment_status {
        active.payment_status = Set(payment_status.as_str().to_string());
    }
    if let Some(tracking_number) = update.tracking_number {
        active.tracking_number = Set(blank_to_none(Some(tracking_number)));
    }
    if let Some(notes) = update.notes {
        active.notes = Set(blank_to_none(Some(notes)));
    }
    if let Some(admin_notes) = update.admin_notes {
        active.admin_notes = Set(blank_to_none(Some(admin_notes)));
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(&txn).await?;
    if let Some(next) = status_change {
        append_history(&txn, order_id, Some(current), next, actor, update.status_note).await?;
    }

    txn.commit().await?;

    if let Some(next) = status_change {
        info!(order_number = %updated.order_number, from = %current, to = %next, actor, "Order status changed");
    }
    Ok(updated)
}

/// Moves an order to a new status.
///
/// # Errors
/// [`Error::OrderNotFound`], [`Error::InvalidTransition`] (also when the order
/// is already in `next`), or a database error.
pub async fn transition_status(
    db: &DatabaseConnection,
    order_id: i64,
    next: OrderStatus,
    actor: &str,
    note: Option<String>,
) -> Result<print_order::Model> {
    let order = get_order_by_id(db, order_id)
        .await?
        .ok_or_else(|| Error::OrderNotFound {
            id: order_id.to_string(),
        })?;
    let current = order_status(&order)?;
    if current == next {
        return Err(Error::InvalidTransition {
            from: current,
            to: next,
        });
    }

    update_order(
        db,
        order_id,
        OrderUpdate {
            status: Some(next),
            status_note: note,
            ..Default::default()
        },
        actor,
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_order_defaults() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        assert!(order.order_number.starts_with("BP-"));
        assert_eq!(order.status, "pending");
        assert_eq!(order.payment_status, "pending");
        assert_eq!(order.quality, "standard");
        assert_eq!(order.quantity, 1);

        let history = get_status_history(&db, order.id).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].previous_status, None);
        assert_eq!(history[0].new_status, "pending");
        assert_eq!(history[0].changed_by, CUSTOMER_ACTOR);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_order_requires_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let valid = test_new_order();

        for broken in [
            NewOrder { customer_email: None, ..valid.clone() },
            NewOrder { customer_email: Some("not-an-email".into()), ..valid.clone() },
            NewOrder { file_name: Some("  ".into()), ..valid.clone() },
            NewOrder { material: None, ..valid.clone() },
            NewOrder { material: Some("gold".into()), ..valid.clone() },
            NewOrder { total_price: None, ..valid.clone() },
            NewOrder { quantity: Some(0), ..valid.clone() },
            NewOrder { quantity: Some(101), ..valid.clone() },
        ] {
            let result = create_order(&db, broken.clone()).await;
            assert!(
                matches!(result, Err(Error::Validation { .. })),
                "{broken:?} should fail validation"
            );
        }

        let negative = NewOrder { total_price: Some(-5.0), ..valid };
        assert!(matches!(
            create_order(&db, negative).await,
            Err(Error::InvalidAmount { .. })
        ));

        assert!(PrintOrder::find().all(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_total_is_floored_at_minimum() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_order(
            &db,
            NewOrder {
                total_price: Some(98.4),
                ..test_new_order()
            },
        )
        .await?;
        assert_eq!(order.total_price, MIN_ORDER_VALUE);
        Ok(())
    }

    #[tokio::test]
    async fn test_shipping_address_round_trip() -> Result<()> {
        let db = setup_test_db().await?;
        let address = ShippingAddress {
            name: Some("Asha".into()),
            line1: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "KA".into(),
            postal_code: "560001".into(),
            country: "IN".into(),
            ..Default::default()
        };
        let order = create_order(
            &db,
            NewOrder {
                shipping_address: Some(address.clone()),
                ..test_new_order()
            },
        )
        .await?;
        assert_eq!(shipping_address(&order), Some(address));
        Ok(())
    }

    #[tokio::test]
    async fn test_full_fulfillment_path_stamps_timestamps() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Printing,
            OrderStatus::QualityCheck,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Completed,
        ] {
            transition_status(&db, order.id, next, "admin-1", None).await?;
        }

        let done = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(done.status, "completed");
        assert!(done.shipped_at.is_some());
        assert!(done.delivered_at.is_some());
        assert!(done.completed_at.is_some());

        let history = get_status_history(&db, order.id).await?;
        assert_eq!(history.len(), 7);
        assert_eq!(history[6].previous_status.as_deref(), Some("delivered"));
        assert_eq!(history[6].new_status, "completed");
        assert_eq!(history[6].changed_by, "admin-1");
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_transition_is_rejected_without_history() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        let result = transition_status(&db, order.id, OrderStatus::Shipped, "admin-1", None).await;
        assert!(matches!(
            result,
            Err(Error::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped
            })
        ));

        let unchanged = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(unchanged.status, "pending");
        assert_eq!(get_status_history(&db, order.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_terminal_orders_cannot_move() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;
        transition_status(&db, order.id, OrderStatus::Cancelled, "admin-1", None).await?;

        for next in OrderStatus::ALL {
            let result = transition_status(&db, order.id, next, "admin-1", None).await;
            assert!(result.is_err(), "cancelled order moved to {next}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_print_can_be_retried() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;
        for next in [
            OrderStatus::Confirmed,
            OrderStatus::Printing,
            OrderStatus::Failed,
            OrderStatus::Confirmed,
        ] {
            transition_status(&db, order.id, next, "admin-1", Some("retry".into())).await?;
        }
        let order = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(order.status, "confirmed");
        Ok(())
    }

    #[tokio::test]
    async fn test_update_order_fields_without_status() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        let updated = update_order(
            &db,
            order.id,
            OrderUpdate {
                status: Some(OrderStatus::Pending),
                payment_status: Some(PaymentStatus::Paid),
                tracking_number: Some("DTDC123".into()),
                admin_notes: Some("Rush".into()),
                ..Default::default()
            },
            "admin-1",
        )
        .await?;

        assert_eq!(updated.status, "pending");
        assert_eq!(updated.payment_status, "paid");
        assert_eq!(updated.tracking_number.as_deref(), Some("DTDC123"));
        assert_eq!(updated.admin_notes.as_deref(), Some("Rush"));
        assert_eq!(get_status_history(&db, order.id).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_order() -> Result<()> {
        let db = setup_test_db().await?;
        let result = transition_status(&db, 999, OrderStatus::Confirmed, "admin-1", None).await;
        assert!(matches!(result, Err(Error::OrderNotFound { .. })));
        let result = update_order(&db, 999, OrderUpdate::default(), "admin-1").await;
        assert!(matches!(result, Err(Error::OrderNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_get_order_by_number_is_case_insensitive() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;

        let found = get_order_by_number(&db, &order.order_number.to_lowercase()).await?;
        assert_eq!(found.map(|o| o.id), Some(order.id));
        assert!(get_order_by_number(&db, "BP-00000000-XXXXXX").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_filters_and_paginates() -> Result<()> {
        let db = setup_test_db().await?;
        for i in 0..5 {
            create_order(
                &db,
                NewOrder {
                    customer_email: Some(format!("buyer{i}@example.com")),
                    ..test_new_order()
                },
            )
            .await?;
        }
        let special = create_order(
            &db,
            NewOrder {
                customer_email: Some("maker@boxpox.in".into()),
                ..test_new_order()
            },
        )
        .await?;
        transition_status(&db, special.id, OrderStatus::Confirmed, "admin-1", None).await?;

        let page = list_orders(
            &db,
            &OrderFilter {
                page: Some(2),
                per_page: Some(4),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(page.total, 6);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.orders.len(), 2);

        let confirmed = list_orders(
            &db,
            &OrderFilter {
                status: Some(OrderStatus::Confirmed),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(confirmed.total, 1);
        assert_eq!(confirmed.orders[0].id, special.id);

        let searched = list_orders(
            &db,
            &OrderFilter {
                search: Some("boxpox".into()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(searched.total, 1);

        let newest_first = list_orders(&db, &OrderFilter::default()).await?;
        assert_eq!(newest_first.orders[0].id, special.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_list_orders_rejects_page_past_range() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_order(&db).await?;

        let result = list_orders(
            &db,
            &OrderFilter {
                page: Some(u64::MAX),
                per_page: Some(MAX_PAGE_SIZE),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        let empty = list_orders(
            &db,
            &OrderFilter {
                page: Some(1000),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(empty.total, 1);
        assert!(empty.orders.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_history_insert_rolls_back_status() -> Result<()> {
        let db = setup_test_db().await?;
        let order = create_test_order(&db).await?;
        db.execute_unprepared("DROP TABLE order_status_history")
            .await?;

        let result =
            transition_status(&db, order.id, OrderStatus::Confirmed, "admin-1", None).await;
        assert!(matches!(result, Err(Error::Database(_))));

        let unchanged = get_order_by_id(&db, order.id).await?.unwrap();
        assert_eq!(unchanged.status, "pending");
        Ok(())
    }

    #[test]
    fn test_order_number_format() {
        let number = generate_order_number();
        let parts: Vec<_> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "BP");
        assert_eq!(parts[1].len(), 8);
        assert_eq!(parts[2].len(), 6);
        assert_eq!(parts[2], parts[2].to_ascii_uppercase());
    }
}
