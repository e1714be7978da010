use http::StatusCode;
use portal_session::{SessionError, SuperAdminError};

/// Helper trait for converting errors to a standard response error format.
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                // Bad credentials and a missing/ineligible profile look the
                // same to the caller on purpose.
                SessionError::InvalidCredentials | SessionError::Unauthorized(_) => {
                    StatusCode::UNAUTHORIZED
                }
                SessionError::Provider(_) => StatusCode::BAD_GATEWAY,
                SessionError::Resolver(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.user_message().to_string())
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, SuperAdminError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                SuperAdminError::InvalidCredentials | SuperAdminError::Unauthorized(_) => {
                    StatusCode::UNAUTHORIZED
                }
                SuperAdminError::Network(_) => StatusCode::BAD_GATEWAY,
                SuperAdminError::Api(_) | SuperAdminError::Config(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            (status, e.user_message().to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_statuses() {
        let result: Result<(), SessionError> = Err(SessionError::InvalidCredentials);
        let (status, _) = result.into_response_error().expect_err("should map");
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let result: Result<(), SessionError> =
            Err(SessionError::Unauthorized("no profile".to_string()));
        let (status, body) = result.into_response_error().expect_err("should map");
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(
            !body.contains("profile"),
            "Response body must not reveal whether a profile exists"
        );

        let result: Result<(), SessionError> = Err(SessionError::Provider("down".to_string()));
        let (status, _) = result.into_response_error().expect_err("should map");
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_superadmin_error_statuses() {
        let result: Result<(), SuperAdminError> = Err(SuperAdminError::InvalidCredentials);
        let (status, _) = result.into_response_error().expect_err("should map");
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let result: Result<(), SuperAdminError> =
            Err(SuperAdminError::Network("timeout".to_string()));
        let (status, _) = result.into_response_error().expect_err("should map");
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_superadmin_401_bodies_are_indistinguishable() {
        let credentials: Result<(), SuperAdminError> = Err(SuperAdminError::InvalidCredentials);
        let (_, credentials_body) = credentials.into_response_error().expect_err("should map");

        let role: Result<(), SuperAdminError> = Err(SuperAdminError::Unauthorized(
            "Account role 'ADMIN' is not SUPERADMIN".to_string(),
        ));
        let (_, role_body) = role.into_response_error().expect_err("should map");

        assert_eq!(credentials_body, role_body);
        assert!(!role_body.contains("ADMIN"));
    }
}
