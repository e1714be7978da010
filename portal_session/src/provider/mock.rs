//! In-memory identity provider for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::broadcast;

use super::errors::AuthProviderError;
use super::types::{AuthChange, AuthEvent, Credentials, Identity, ProviderSession};
use super::IdentityProvider;

pub(crate) struct MockIdentityProvider {
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    session: Mutex<Option<ProviderSession>>,
    events: broadcast::Sender<AuthChange>,
    fail_sign_out: AtomicBool,
    sign_out_calls: AtomicUsize,
}

impl MockIdentityProvider {
    pub(crate) fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            accounts: Mutex::new(HashMap::new()),
            session: Mutex::new(None),
            events,
            fail_sign_out: AtomicBool::new(false),
            sign_out_calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn with_account(self, password: &str, identity: Identity) -> Self {
        self.accounts
            .lock()
            .expect("accounts lock")
            .insert(identity.email.clone(), (password.to_string(), identity));
        self
    }

    /// Pre-establish a provider session, as if one survived from a previous
    /// page load.
    pub(crate) fn with_session(self, identity: Identity) -> Self {
        *self.session.lock().expect("session lock") = Some(ProviderSession {
            identity,
            access_token: "mock-token".to_string(),
        });
        self
    }

    pub(crate) fn fail_sign_out(&self) {
        self.fail_sign_out.store(true, Ordering::SeqCst);
    }

    pub(crate) fn sign_out_calls(&self) -> usize {
        self.sign_out_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn current_session(&self) -> Option<ProviderSession> {
        self.session.lock().expect("session lock").clone()
    }

    pub(crate) fn emit(&self, event: AuthEvent, session: Option<ProviderSession>) {
        let _ = self.events.send(AuthChange { event, session });
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn sign_in_with_password(
        &self,
        credentials: Credentials,
    ) -> Result<ProviderSession, AuthProviderError> {
        let identity = {
            let accounts = self.accounts.lock().expect("accounts lock");
            match accounts.get(&credentials.email) {
                Some((password, identity)) if *password == credentials.password => {
                    identity.clone()
                }
                _ => return Err(AuthProviderError::InvalidCredentials),
            }
        };

        let session = ProviderSession {
            identity,
            access_token: "mock-token".to_string(),
        };
        *self.session.lock().expect("session lock") = Some(session.clone());
        self.emit(AuthEvent::SignedIn, Some(session.clone()));

        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), AuthProviderError> {
        self.sign_out_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_sign_out.load(Ordering::SeqCst) {
            // Simulate an unreachable provider: the session is not cleared.
            return Err(AuthProviderError::Network("connection refused".to_string()));
        }

        *self.session.lock().expect("session lock") = None;
        self.emit(AuthEvent::SignedOut, None);
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<ProviderSession>, AuthProviderError> {
        Ok(self.session.lock().expect("session lock").clone())
    }

    async fn update_password(&self, current: &str, new: &str) -> Result<(), AuthProviderError> {
        let session = self
            .session
            .lock()
            .expect("session lock")
            .clone()
            .ok_or(AuthProviderError::InvalidCredentials)?;

        let mut accounts = self.accounts.lock().expect("accounts lock");
        match accounts.get_mut(&session.identity.email) {
            Some(entry) if entry.0 == current => {
                entry.0 = new.to_string();
                Ok(())
            }
            _ => Err(AuthProviderError::InvalidCredentials),
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<AuthChange> {
        self.events.subscribe()
    }
}
