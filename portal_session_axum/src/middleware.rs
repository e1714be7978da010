use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use http::{Method, StatusCode};
use portal_session::{CanonicalRole, GuardDecision, SessionContext, evaluate};

use super::session::AuthUser;

/// How long clients should wait before retrying while the session boots.
const BOOT_RETRY_AFTER_SECS: &str = "1";

/// Route-guard middleware state: the portal's session context plus the
/// roles a route subtree admits.
///
/// Attach with `axum::middleware::from_fn_with_state`:
///
/// ```no_run
/// use std::sync::Arc;
/// use axum::{Router, middleware::from_fn_with_state, routing::get};
/// use portal_session::CanonicalRole;
/// use portal_session_axum::{AuthUser, RouteGuard, route_guard};
///
/// async fn orders(user: AuthUser) -> String {
///     format!("orders for {}", user.email)
/// }
///
/// fn vendor_routes(context: Arc<portal_session::SessionContext>) -> Router {
///     let guard = RouteGuard::new(context).allow([CanonicalRole::Vendor]);
///     Router::new()
///         .route("/orders", get(orders))
///         .layer(from_fn_with_state(guard, route_guard))
/// }
/// ```
#[derive(Clone)]
pub struct RouteGuard {
    context: Arc<SessionContext>,
    allowed: Vec<CanonicalRole>,
}

impl RouteGuard {
    /// A guard admitting any role of the context's portal family.
    pub fn new(context: Arc<SessionContext>) -> Self {
        Self {
            context,
            allowed: Vec::new(),
        }
    }

    /// Restrict the guard to an explicit role set.
    pub fn allow(mut self, roles: impl IntoIterator<Item = CanonicalRole>) -> Self {
        self.allowed = roles.into_iter().collect();
        self
    }
}

pub async fn route_guard(State(guard): State<RouteGuard>, mut req: Request, next: Next) -> Response {
    let state = guard.context.snapshot();
    let decision = evaluate(&state, &guard.allowed, guard.context.portal());

    match decision_outcome(decision, req.method()) {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(response) => response,
    }
}

/// Turn a guard decision into either the user to attach or the response
/// that ends the request. Browsers navigating (GET) get redirects; API
/// calls get status codes.
fn decision_outcome(decision: GuardDecision, method: &Method) -> Result<AuthUser, Response> {
    match decision {
        GuardDecision::Allow(user) => Ok(AuthUser::from(user)),
        GuardDecision::Loading => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            [(http::header::RETRY_AFTER, BOOT_RETRY_AFTER_SECS)],
            "Session initializing",
        )
            .into_response()),
        GuardDecision::RedirectToLogin(route) | GuardDecision::RedirectToRoleHome(route) => {
            if *method == Method::GET {
                tracing::debug!(%route, "Route guard redirecting");
                Err(Redirect::temporary(&route).into_response())
            } else {
                Err((StatusCode::UNAUTHORIZED, "Unauthorized").into_response())
            }
        }
    }
}
