//! Read-only catalog and status registry.

use crate::core::{
    catalog::{self, CURRENCY_SYMBOL, INFILL_PRESETS, MIN_ORDER_VALUE, Material, Quality},
    status::{self, PaymentStatus, StatusDescriptor},
};
use axum::Json;
use serde::Serialize;

/// Everything the storefront configurator needs
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub materials: &'static [Material],
    pub qualities: &'static [Quality],
    pub infill_presets: [u8; 5],
    pub min_order_value: f64,
    pub currency: &'static str,
}

/// Fulfillment registry plus payment statuses
#[derive(Debug, Serialize)]
pub struct StatusesResponse {
    pub statuses: Vec<StatusDescriptor>,
    pub payment_statuses: [PaymentStatus; 4],
}

/// `GET /api/boxprint/materials`
pub async fn materials() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        materials: catalog::MATERIALS,
        qualities: catalog::QUALITIES,
        infill_presets: INFILL_PRESETS,
        min_order_value: MIN_ORDER_VALUE,
        currency: CURRENCY_SYMBOL,
    })
}

/// `GET /api/boxprint/statuses`
pub async fn statuses() -> Json<StatusesResponse> {
    Json(StatusesResponse {
        statuses: status::registry(),
        payment_statuses: PaymentStatus::ALL,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_materials() {
        let (app, _db, _dir) = test_app().await;
        let response = send(&app, get_request("/api/boxprint/materials", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let catalog = body_json(response).await;

        let materials = catalog["materials"].as_array().unwrap();
        assert_eq!(materials.len(), 5);
        assert_eq!(materials[0]["id"], "pla");
        assert_eq!(catalog["qualities"].as_array().unwrap().len(), 4);
        assert_eq!(catalog["currency"], "₹");
    }

    #[tokio::test]
    async fn test_statuses() {
        let (app, _db, _dir) = test_app().await;
        let response = send(&app, get_request("/api/boxprint/statuses", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let registry = body_json(response).await;

        let statuses = registry["statuses"].as_array().unwrap();
        assert_eq!(statuses.len(), 9);
        assert_eq!(statuses[0]["status"], "pending");
        assert_eq!(statuses[0]["next"], serde_json::json!(["confirmed", "cancelled"]));
        assert_eq!(registry["payment_statuses"].as_array().unwrap().len(), 4);
    }
}
