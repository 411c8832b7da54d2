//! Admin gate for the back-office routes.
//!
//! The upstream auth gateway puts the caller's user id in `x-user-id`; this
//! layer only checks it against `admin_roles`.

use super::AppState;
use crate::{core::auth, errors::Result};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

/// Header carrying the authenticated caller id
pub const USER_ID_HEADER: &str = "x-user-id";

/// Admin id of the current request, inserted by [`require_admin`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminId(pub String);

/// Rejects callers without an admin role (401 without identity, 403 otherwise).
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user_id = request
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let admin = auth::require_admin(&state.database, user_id.as_deref()).await?;
    request.extensions_mut().insert(AdminId(admin));
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::api::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_admin_routes_require_identity() {
        let (app, _db, _dir) = test_app().await;

        let response = send(&app, get_request("/api/boxprint/orders", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await["error"],
            "Authentication required"
        );

        let response = send(&app, get_request("/api/boxprint/orders", Some("intruder"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, get_request("/api/boxprint/orders", Some(ADMIN_ID))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_public_routes_are_open() {
        let (app, _db, _dir) = test_app().await;
        let response = send(&app, get_request("/api/boxprint/materials", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
