//! Session endpoints for one portal.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use http::StatusCode;
use portal_session::{
    Credentials, PortalFamily, PrivilegedSource, ProfileSource, SessionContext, SessionState,
    SessionUser,
};
use serde::Deserialize;

use super::error::IntoResponseError;

#[derive(Deserialize)]
struct ChangePasswordRequest {
    current_password: String,
    password: String,
}

/// JSON key for the portal's profile kind in `/me` responses.
fn profile_key(portal: PortalFamily) -> Option<&'static str> {
    match portal {
        PortalFamily::Buyer => Some("buyer"),
        PortalFamily::Vendor => Some("vendor"),
        PortalFamily::Internal => Some("employee"),
        PortalFamily::SuperAdmin => None,
    }
}

/// Session endpoints for one portal's context. Mount once per portal the
/// host serves, typically under `{PORTAL_ROUTE_PREFIX}/{portal}/auth`:
///
/// - `POST /login`
/// - `POST /logout`
/// - `GET /me`
/// - `POST /password`
pub fn portal_auth_router(context: Arc<SessionContext>) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/password", post(change_password))
        .with_state(context)
}

/// The HTTP face of the privileged resolution step: `GET /me` returning
/// `{ "employee"|"buyer"|"vendor": Profile|null }` for the current provider
/// identity, fetched fresh through the elevated source (and back-filling the
/// identity reference as a side effect). Mount one per portal, e.g. at
/// `{PORTAL_ROUTE_PREFIX}/employee`.
///
/// [`PORTAL_ROUTE_PREFIX`]: portal_session::PORTAL_ROUTE_PREFIX
pub fn privileged_profile_router(context: Arc<SessionContext>) -> Router {
    Router::new()
        .route("/me", get(resolved_profile))
        .with_state(context)
}

async fn resolved_profile(
    State(context): State<Arc<SessionContext>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let portal = context.portal();
    let key = profile_key(portal).ok_or((
        StatusCode::NOT_FOUND,
        "No profile kind for this portal".to_string(),
    ))?;

    let profile = match context.current_identity().await {
        Some(identity) => PrivilegedSource::new(portal)
            .lookup(&identity)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Privileged profile lookup failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Profile lookup failed".to_string(),
                )
            })?,
        None => None,
    };

    let value = serde_json::to_value(profile).map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;
    let mut body = serde_json::Map::new();
    body.insert(key.to_string(), value);
    Ok(Json(serde_json::Value::Object(body)))
}

async fn login(
    State(context): State<Arc<SessionContext>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionUser>, (StatusCode, String)> {
    let user = context.login(credentials).await.into_response_error()?;
    Ok(Json(user))
}

async fn logout(State(context): State<Arc<SessionContext>>) -> StatusCode {
    context.logout().await;
    StatusCode::NO_CONTENT
}

async fn me(State(context): State<Arc<SessionContext>>) -> axum::response::Response {
    match context.snapshot() {
        SessionState::Authenticated(user) => Json(user).into_response(),
        SessionState::Booting => (
            StatusCode::SERVICE_UNAVAILABLE,
            [(http::header::RETRY_AFTER, "1")],
            "Session initializing",
        )
            .into_response(),
        SessionState::Unauthenticated => {
            (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
        }
    }
}

async fn change_password(
    State(context): State<Arc<SessionContext>>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    context
        .change_password(&request.current_password, &request.password)
        .await
        .into_response_error()?;
    Ok(StatusCode::NO_CONTENT)
}
