//! Axum integration for the portal-session library.
//!
//! Provides the route-guard middleware, the [`AuthUser`] extractor, and a
//! per-portal router exposing login/logout/me/password endpoints over a
//! [`SessionContext`].
//!
//! [`SessionContext`]: portal_session::SessionContext

mod error;
mod middleware;
mod router;
mod session;

pub use error::IntoResponseError;
pub use middleware::{RouteGuard, route_guard};
pub use router::{portal_auth_router, privileged_profile_router};
pub use session::AuthUser;

// Re-export the route prefix and initialization function from the core crate
pub use portal_session::{PORTAL_ROUTE_PREFIX, init};
