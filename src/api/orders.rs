//! Order endpoints: public checkout plus the admin back office.

use super::{AppState, auth::AdminId};
use crate::{
    core::{
        order::{self, NewOrder, OrderFilter, OrderPage, OrderUpdate},
        report::{self, OrderSummary},
        status::OrderStatus,
    },
    entities::{print_order, status_history},
    errors::{Error, Result},
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;

/// Order plus the statuses an admin may move it to
#[derive(Debug, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: print_order::Model,
    pub next_statuses: Vec<OrderStatus>,
}

impl OrderDetail {
    fn new(order: print_order::Model) -> Result<Self> {
        let next_statuses = order::order_status(&order)?.next_statuses().to_vec();
        Ok(Self {
            order,
            next_statuses,
        })
    }
}

async fn find_order(state: &AppState, id: i64) -> Result<print_order::Model> {
    order::get_order_by_id(&state.database, id)
        .await?
        .ok_or_else(|| Error::OrderNotFound { id: id.to_string() })
}

/// `POST /api/boxprint/order`
pub async fn create_order(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<print_order::Model>)> {
    let Json(new_order) = payload?;
    let created = order::create_order(&state.database, new_order).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/boxprint/order/{id}`
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrderDetail>> {
    let order = find_order(&state, id).await?;
    Ok(Json(OrderDetail::new(order)?))
}

/// `PUT /api/boxprint/order/{id}`
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Extension(AdminId(admin)): Extension<AdminId>,
    payload: std::result::Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Json<OrderDetail>> {
    let Json(update) = payload?;
    let updated = order::update_order(&state.database, id, update, &admin).await?;
    Ok(Json(OrderDetail::new(updated)?))
}

/// `GET /api/boxprint/orders`
pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<OrderPage>> {
    Ok(Json(order::list_orders(&state.database, &filter).await?))
}

/// `GET /api/boxprint/order/{id}/history`
pub async fn order_history(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<status_history::Model>>> {
    let order = find_order(&state, id).await?;
    Ok(Json(
        order::get_status_history(&state.database, order.id).await?,
    ))
}

/// `GET /api/boxprint/admin/summary`
pub async fn summary(State(state): State<AppState>) -> Result<Json<OrderSummary>> {
    Ok(Json(report::generate_order_summary(&state.database).await?))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::test_support::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn checkout_body() -> serde_json::Value {
        json!({
            "customer_name": "Asha",
            "customer_email": "asha@example.com",
            "file_name": "gear.stl",
            "material": "petg",
            "quality": "high",
            "infill": 50.0,
            "quantity": 2,
            "total_price": 640.0,
            "shipping_address": {
                "line1": "12 MG Road",
                "city": "Bengaluru",
                "state": "KA",
                "postal_code": "560001"
            }
        })
    }

    async fn place_order(app: &axum::Router) -> serde_json::Value {
        let response = send(
            app,
            json_request("POST", "/api/boxprint/order", None, &checkout_body()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn test_checkout_creates_pending_order() {
        let (app, _db, _dir) = test_app().await;
        let order = place_order(&app).await;

        assert_eq!(order["status"], "pending");
        assert_eq!(order["payment_status"], "pending");
        assert_eq!(order["material"], "petg");
        assert_eq!(order["shipping_address"]["country"], "IN");
        assert!(order["order_number"].as_str().unwrap().starts_with("BP-"));
    }

    #[tokio::test]
    async fn test_checkout_missing_fields_is_400() {
        let (app, _db, _dir) = test_app().await;
        let mut body = checkout_body();
        body.as_object_mut().unwrap().remove("customer_email");

        let response = send(&app, json_request("POST", "/api/boxprint/order", None, &body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await;
        assert!(error["error"].as_str().unwrap().contains("customer_email"));
    }

    #[tokio::test]
    async fn test_checkout_malformed_json_is_400() {
        let (app, _db, _dir) = test_app().await;
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/api/boxprint/order")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let response = send(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_admin_order_lifecycle() {
        let (app, _db, _dir) = test_app().await;
        let order = place_order(&app).await;
        let id = order["id"].as_i64().unwrap();
        let uri = format!("/api/boxprint/order/{id}");

        let response = send(&app, get_request(&uri, Some(ADMIN_ID))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let detail = body_json(response).await;
        assert_eq!(detail["next_statuses"], json!(["confirmed", "cancelled"]));

        let response = send(
            &app,
            json_request(
                "PUT",
                &uri,
                Some(ADMIN_ID),
                &json!({ "status": "shipped" }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &app,
            json_request(
                "PUT",
                &uri,
                Some(ADMIN_ID),
                &json!({
                    "status": "confirmed",
                    "payment_status": "paid",
                    "status_note": "Payment received"
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["status"], "confirmed");
        assert_eq!(updated["payment_status"], "paid");

        let response = send(
            &app,
            get_request(&format!("{uri}/history"), Some(ADMIN_ID)),
        )
        .await;
        let history = body_json(response).await;
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1]["previous_status"], "pending");
        assert_eq!(history[1]["changed_by"], ADMIN_ID);
        assert_eq!(history[1]["note"], "Payment received");
    }

    #[tokio::test]
    async fn test_missing_order_is_404() {
        let (app, _db, _dir) = test_app().await;
        let response = send(&app, get_request("/api/boxprint/order/42", Some(ADMIN_ID))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            get_request("/api/boxprint/order/42/history", Some(ADMIN_ID)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_and_summary() {
        let (app, _db, _dir) = test_app().await;
        place_order(&app).await;
        place_order(&app).await;

        let response = send(
            &app,
            get_request(
                "/api/boxprint/orders?status=pending&per_page=1&page=2",
                Some(ADMIN_ID),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let page = body_json(response).await;
        assert_eq!(page["total"], 2);
        assert_eq!(page["total_pages"], 2);
        assert_eq!(page["orders"].as_array().unwrap().len(), 1);

        let response = send(
            &app,
            get_request("/api/boxprint/orders?search=nobody", Some(ADMIN_ID)),
        )
        .await;
        assert_eq!(body_json(response).await["total"], 0);

        let response = send(&app, get_request("/api/boxprint/admin/summary", Some(ADMIN_ID))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let summary = body_json(response).await;
        assert_eq!(summary["total_orders"], 2);
        assert_eq!(summary["pending_orders"], 2);
    }

    #[tokio::test]
    async fn test_out_of_range_page_is_400() {
        let (app, _db, _dir) = test_app().await;
        place_order(&app).await;

        let response = send(
            &app,
            get_request(
                "/api/boxprint/orders?page=18446744073709551615&per_page=100",
                Some(ADMIN_ID),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
