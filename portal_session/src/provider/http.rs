use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::{Mutex, broadcast};
use url::Url;

use super::errors::AuthProviderError;
use super::types::{AuthChange, AuthEvent, Credentials, Identity, ProviderSession};
use super::IdentityProvider;

const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Deserialize)]
struct SignInResponse {
    identity: Identity,
    access_token: String,
}

/// reqwest-backed adapter for a hosted identity API.
///
/// Endpoints relative to the base URL: `auth/login`, `auth/logout`,
/// `auth/user`. The adapter caches the established session for the lifetime
/// of the instance and broadcasts the auth changes it causes locally.
pub struct HttpIdentityProvider {
    http: reqwest::Client,
    base: Url,
    session: Mutex<Option<ProviderSession>>,
    events: broadcast::Sender<AuthChange>,
}

impl HttpIdentityProvider {
    pub fn new(base_url: &str) -> Result<Self, AuthProviderError> {
        let base = Url::parse(base_url)
            .map_err(|e| AuthProviderError::Provider(format!("Invalid base URL: {e}")))?;
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            http: reqwest::Client::new(),
            base,
            session: Mutex::new(None),
            events,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthProviderError> {
        self.base
            .join(path)
            .map_err(|e| AuthProviderError::Provider(format!("Invalid endpoint {path}: {e}")))
    }

    fn emit(&self, event: AuthEvent, session: Option<ProviderSession>) {
        // send only fails when nobody is subscribed, which is fine
        let _ = self.events.send(AuthChange { event, session });
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn sign_in_with_password(
        &self,
        credentials: Credentials,
    ) -> Result<ProviderSession, AuthProviderError> {
        let response = self
            .http
            .post(self.endpoint("auth/login")?)
            .json(&credentials)
            .send()
            .await
            .map_err(|e| AuthProviderError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthProviderError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(AuthProviderError::Provider(format!(
                "Unexpected login status: {}",
                response.status()
            )));
        }

        let body: SignInResponse = response
            .json()
            .await
            .map_err(|e| AuthProviderError::Provider(e.to_string()))?;

        let session = ProviderSession {
            identity: body.identity,
            access_token: body.access_token,
        };

        *self.session.lock().await = Some(session.clone());
        self.emit(AuthEvent::SignedIn, Some(session.clone()));

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        let previous = self.session.lock().await.take();
        self.emit(AuthEvent::SignedOut, None);

        // Best-effort server-side invalidation; the local session is already gone.
        if let Some(session) = previous {
            self.http
                .post(self.endpoint("auth/logout")?)
                .bearer_auth(&session.access_token)
                .send()
                .await
                .map_err(|e| AuthProviderError::Network(e.to_string()))?;
        }

        Ok(())
    }

    async fn get_session(&self) -> Result<Option<ProviderSession>, AuthProviderError> {
        Ok(self.session.lock().await.clone())
    }

    async fn update_password(&self, current: &str, new: &str) -> Result<(), AuthProviderError> {
        let session = self
            .session
            .lock()
            .await
            .clone()
            .ok_or(AuthProviderError::InvalidCredentials)?;

        let response = self
            .http
            .patch(self.endpoint("auth/user")?)
            .bearer_auth(&session.access_token)
            .json(&serde_json::json!({
                "current_password": current,
                "password": new,
            }))
            .send()
            .await
            .map_err(|e| AuthProviderError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AuthProviderError::InvalidCredentials);
        }
        if !response.status().is_success() {
            return Err(AuthProviderError::Provider(format!(
                "Unexpected password update status: {}",
                response.status()
            )));
        }

        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
