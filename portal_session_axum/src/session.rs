use axum::{
    extract::FromRequestParts,
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};
use portal_session::{CanonicalRole, SessionUser};

/// Authenticated portal user, available as an Axum extractor.
///
/// The route-guard middleware inserts this into request extensions after a
/// successful [`GuardDecision::Allow`]; handlers downstream extract it.
/// Extracting it on a route the guard does not cover rejects with 401.
///
/// [`GuardDecision::Allow`]: portal_session::GuardDecision::Allow
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: CanonicalRole,
    pub avatar_url: Option<String>,
}

impl From<SessionUser> for AuthUser {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            avatar_url: user.avatar_url,
        }
    }
}

#[derive(Debug)]
pub struct AuthRejection;

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, "Unauthorized").into_response()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthRejection)
    }
}
