use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;

use super::client::SuperAdminClient;
use super::errors::SuperAdminError;
use super::token::TokenStore;
use super::types::{SuperAdmin, SuperAdminLoginResponse, SuperAdminState};

/// The slice of the superadmin API the session layer needs.
#[async_trait]
pub trait SuperAdminApi: Send + Sync {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SuperAdminLoginResponse, SuperAdminError>;

    async fn me(&self, token: &str) -> Result<SuperAdmin, SuperAdminError>;

    async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> Result<(), SuperAdminError>;
}

#[async_trait]
impl SuperAdminApi for SuperAdminClient {
    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SuperAdminLoginResponse, SuperAdminError> {
        SuperAdminClient::login(self, email, password).await
    }

    async fn me(&self, token: &str) -> Result<SuperAdmin, SuperAdminError> {
        SuperAdminClient::me(self, token).await
    }

    async fn change_password(
        &self,
        token: &str,
        current: &str,
        new: &str,
    ) -> Result<(), SuperAdminError> {
        SuperAdminClient::change_password(self, token, current, new).await
    }
}

/// Bearer-token session for the superadmin console.
///
/// Unlike the portal sessions there is no identity provider or profile
/// table behind this; the token from `superadmin/login` is the whole
/// session, and `superadmin/me` revalidates it on boot.
pub struct SuperAdminSession {
    api: Arc<dyn SuperAdminApi>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SuperAdminState>,
}

impl SuperAdminSession {
    pub fn new(api: Arc<dyn SuperAdminApi>, tokens: Arc<dyn TokenStore>) -> Arc<Self> {
        let (state, _) = watch::channel(SuperAdminState::Booting);
        Arc::new(Self { api, tokens, state })
    }

    pub fn subscribe(&self) -> watch::Receiver<SuperAdminState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SuperAdminState {
        self.state.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    /// Validate a stored token, if any. An invalid or rejected token is
    /// cleared; network trouble keeps the token for the next attempt but
    /// still lands on `Unauthenticated`.
    pub async fn boot(&self) {
        let Some(token) = self.tokens.get() else {
            self.state.send_replace(SuperAdminState::Unauthenticated);
            return;
        };

        match self.api.me(&token).await {
            Ok(account) => match account.verified_role() {
                Ok(_) => {
                    tracing::info!(account = %account.id, "SuperAdmin session restored");
                    self.state.send_replace(SuperAdminState::Authenticated(account));
                }
                Err(_) => {
                    self.tokens.clear();
                    self.state.send_replace(SuperAdminState::Unauthenticated);
                }
            },
            Err(SuperAdminError::InvalidCredentials) => {
                tracing::info!("Stored superadmin token rejected, clearing");
                self.tokens.clear();
                self.state.send_replace(SuperAdminState::Unauthenticated);
            }
            Err(e) => {
                tracing::warn!(error = %e, "SuperAdmin token validation failed, keeping token");
                self.state.send_replace(SuperAdminState::Unauthenticated);
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<SuperAdmin, SuperAdminError> {
        // Any stale token is invalid the moment a new login starts
        self.tokens.clear();

        let response = self.api.login(email, password).await?;

        if let Err(e) = response.superadmin.verified_role() {
            self.state.send_replace(SuperAdminState::Unauthenticated);
            return Err(e);
        }

        self.tokens.set(&response.token);
        tracing::info!(account = %response.superadmin.id, "SuperAdmin login succeeded");
        self.state
            .send_replace(SuperAdminState::Authenticated(response.superadmin.clone()));
        Ok(response.superadmin)
    }

    /// Drop the token and state. There is no server-side invalidation
    /// endpoint; forgetting the bearer token is the logout.
    pub fn logout(&self) {
        self.tokens.clear();
        self.state.send_replace(SuperAdminState::Unauthenticated);
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), SuperAdminError> {
        let token = self
            .tokens
            .get()
            .ok_or(SuperAdminError::InvalidCredentials)?;
        self.api.change_password(&token, current, new).await?;
        tracing::info!("SuperAdmin password changed");
        Ok(())
    }
}
