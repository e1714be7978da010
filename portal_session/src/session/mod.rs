//! Portal session state machine.
//!
//! [`SessionContext`] binds an identity provider to a portal's profile
//! resolver and publishes an observable [`SessionState`] through a watch
//! channel. One context per portal; the buyer, vendor and internal portals
//! each run their own.

mod context;
mod errors;
mod types;

pub use context::SessionContext;
pub use errors::SessionError;
pub use types::{SessionState, SessionUser};
