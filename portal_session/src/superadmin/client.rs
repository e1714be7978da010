use std::env;
use url::Url;

use super::errors::SuperAdminError;
use super::types::{SuperAdmin, SuperAdminLoginResponse, SuperAdminMeResponse};

/// reqwest client for the superadmin API.
///
/// Endpoints relative to the base URL: `superadmin/login`, `superadmin/me`,
/// `superadmin/password`. Authentication is a bearer token issued by login;
/// the client itself is stateless and the session layer owns the token.
pub struct SuperAdminClient {
    http: reqwest::Client,
    base: Url,
}

impl SuperAdminClient {
    pub fn new(base_url: &str) -> Result<Self, SuperAdminError> {
        let base = Url::parse(base_url)
            .map_err(|e| SuperAdminError::Config(format!("Invalid base URL: {e}")).log())?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    pub fn from_env() -> Result<Self, SuperAdminError> {
        let base_url = env::var("SUPERADMIN_API_URL")
            .map_err(|_| SuperAdminError::Config("SUPERADMIN_API_URL not set".to_string()).log())?;
        Self::new(&base_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SuperAdminError> {
        self.base
            .join(path)
            .map_err(|e| SuperAdminError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SuperAdminLoginResponse, SuperAdminError> {
        let response = self
            .http
            .post(self.endpoint("superadmin/login")?)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| SuperAdminError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SuperAdminError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(SuperAdminError::Api(format!(
                "Unexpected login status: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| SuperAdminError::Api(e.to_string()))
    }

    /// The account behind a token. Doubles as token validation on boot.
    pub async fn me(&self, token: &str) -> Result<SuperAdmin, SuperAdminError> {
        let response = self
            .http
            .get(self.endpoint("superadmin/me")?)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| SuperAdminError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SuperAdminError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(SuperAdminError::Api(format!(
                "Unexpected me status: {}",
                response.status()
            )));
        }

        let body: SuperAdminMeResponse = response
            .json()
            .await
            .map_err(|e| SuperAdminError::Api(e.to_string()))?;
        Ok(body.superadmin)
    }

    pub async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> Result<(), SuperAdminError> {
        let response = self
            .http
            .post(self.endpoint("superadmin/password")?)
            .bearer_auth(token)
            .json(&serde_json::json!({
                "current_password": current,
                "password": new,
            }))
            .send()
            .await
            .map_err(|e| SuperAdminError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SuperAdminError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(SuperAdminError::Api(format!(
                "Unexpected password change status: {}",
                response.status()
            )));
        }

        Ok(())
    }
}
