//! Superadmin console session.
//!
//! A separate, simpler authentication track: a dedicated API issues a
//! bearer token on login and the token is the entire session. No profile
//! tables, no identity provider, no event stream.

mod client;
mod errors;
mod session;
mod token;
mod types;

pub use client::SuperAdminClient;
pub use errors::SuperAdminError;
pub use session::{SuperAdminApi, SuperAdminSession};
pub use token::{MemoryTokenStore, TokenStore};
pub use types::{SuperAdmin, SuperAdminLoginResponse, SuperAdminMeResponse, SuperAdminState};
