use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, broadcast, watch};
use tokio::task::JoinHandle;

use super::errors::SessionError;
use super::types::{SessionState, SessionUser};
use crate::provider::{AuthChange, AuthEvent, Credentials, Identity, IdentityProvider, ProviderSession};
use crate::resolver::ProfileResolver;
use crate::role::PortalFamily;

/// Portal-scoped session state machine.
///
/// Owns the bridge between the identity provider's session and the portal's
/// resolved profile. State is published through a watch channel so any
/// number of observers (middleware, handlers, background tasks) see the
/// latest value without polling.
///
/// Concurrent transitions are ordered by an epoch counter: every entry point
/// claims a fresh epoch up front, and a transition only lands if no newer
/// epoch was claimed while its async work ran. The last event wins.
pub struct SessionContext {
    provider: Arc<dyn IdentityProvider>,
    resolver: ProfileResolver,
    state: watch::Sender<SessionState>,
    epoch: AtomicU64,
    identity: Mutex<Option<Identity>>,
}

impl SessionContext {
    pub fn new(portal: PortalFamily, provider: Arc<dyn IdentityProvider>) -> Arc<Self> {
        Self::with_resolver(provider, ProfileResolver::for_portal(portal))
    }

    pub fn with_resolver(provider: Arc<dyn IdentityProvider>, resolver: ProfileResolver) -> Arc<Self> {
        let (state, _) = watch::channel(SessionState::Booting);
        Arc::new(Self {
            provider,
            resolver,
            state,
            epoch: AtomicU64::new(0),
            identity: Mutex::new(None),
        })
    }

    pub fn portal(&self) -> PortalFamily {
        self.resolver.portal()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// The provider identity backing the current authenticated state, if any.
    pub async fn current_identity(&self) -> Option<Identity> {
        self.identity.lock().await.clone()
    }

    /// Settle the initial `Booting` state from whatever provider session
    /// survived. Resolution failures degrade to `Unauthenticated` here; a
    /// user who was signed in yesterday should land on the login page, not
    /// an error screen.
    pub async fn boot(&self) {
        let epoch = self.next_epoch();

        let session = match self.provider.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!(error = %e, "Session restore failed, treating as signed out");
                None
            }
        };

        self.resolve_and_apply(epoch, session).await;
    }

    /// Follow the provider's auth-change stream until it closes. Each event
    /// claims its own epoch, so a stale resolution can never clobber a newer
    /// sign-out.
    pub fn run_events(self: &Arc<Self>) -> JoinHandle<()> {
        let ctx = Arc::clone(self);
        let mut events = ctx.provider.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(change) => ctx.handle_event(change).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Auth event stream lagged, re-syncing from provider");
                        ctx.boot().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        tracing::debug!("Auth event stream closed");
                        break;
                    }
                }
            }
        })
    }

    pub async fn handle_event(&self, change: AuthChange) {
        tracing::debug!(event = %change.event, "Auth event received");
        let epoch = self.next_epoch();

        match change.event {
            AuthEvent::SignedIn | AuthEvent::TokenRefreshed => {
                self.resolve_and_apply(epoch, change.session).await;
            }
            AuthEvent::SignedOut => {
                self.apply(epoch, SessionState::Unauthenticated, None).await;
            }
        }
    }

    /// Authenticate and resolve, atomically from the caller's point of view:
    /// either the portal ends up `Authenticated` with an eligible profile,
    /// or the provider session is rolled back and the portal is
    /// `Unauthenticated`.
    pub async fn login(&self, credentials: Credentials) -> Result<SessionUser, SessionError> {
        let epoch = self.next_epoch();

        // A leftover session for a different account would confuse the
        // provider's event stream; clear it before signing in.
        if let Ok(Some(_)) = self.provider.get_session().await {
            if let Err(e) = self.provider.sign_out().await {
                tracing::warn!(error = %e, "Pre-login sign-out failed");
            }
        }

        let session = self.provider.sign_in_with_password(credentials).await?;

        match self.resolver.resolve(&session.identity, true).await {
            Ok(Some(resolution)) => {
                let user = SessionUser::from_resolution(&resolution);
                tracing::info!(
                    user_id = %user.id,
                    role = %user.role,
                    portal = %self.portal(),
                    "Login succeeded"
                );
                self.apply(
                    epoch,
                    SessionState::Authenticated(user.clone()),
                    Some(session.identity),
                )
                .await;
                Ok(user)
            }
            Ok(None) => {
                // Unreachable with required set, but the rollback below must
                // not depend on that.
                self.rollback(epoch).await;
                Err(SessionError::Unauthorized("no eligible profile".to_string()).log())
            }
            Err(e) => {
                self.rollback(epoch).await;
                Err(e.into())
            }
        }
    }

    /// Sign out. Never fails: local state is cleared even when the provider
    /// cannot be reached, so the user is signed out of this portal
    /// regardless.
    pub async fn logout(&self) {
        let epoch = self.next_epoch();

        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Provider sign-out failed, clearing local session anyway");
        }

        self.apply(epoch, SessionState::Unauthenticated, None).await;
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), SessionError> {
        self.provider.update_password(current, new).await?;
        tracing::info!(portal = %self.portal(), "Password changed");
        Ok(())
    }

    fn next_epoch(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn resolve_and_apply(&self, epoch: u64, session: Option<ProviderSession>) {
        let Some(session) = session else {
            self.apply(epoch, SessionState::Unauthenticated, None).await;
            return;
        };

        let state = match self.resolver.resolve(&session.identity, false).await {
            Ok(Some(resolution)) => {
                SessionState::Authenticated(SessionUser::from_resolution(&resolution))
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(e) => {
                tracing::warn!(error = %e, "Profile resolution failed, treating as signed out");
                SessionState::Unauthenticated
            }
        };

        let identity = state.is_authenticated().then_some(session.identity);
        self.apply(epoch, state, identity).await;
    }

    async fn rollback(&self, epoch: u64) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "Rollback sign-out failed");
        }
        self.apply(epoch, SessionState::Unauthenticated, None).await;
    }

    // The staleness check and the publish must be one atomic step: checking
    // first and publishing after would let a stale transition land if a newer
    // epoch ran to completion in between. The identity mutex is that critical
    // section, so the epoch is only inspected while holding it.
    async fn apply(&self, epoch: u64, state: SessionState, identity: Option<Identity>) {
        let mut current = self.identity.lock().await;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(epoch, "Discarding stale session transition");
            return;
        }
        *current = identity;
        self.state.send_replace(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Profile, ProfileError};
    use crate::provider::mock::MockIdentityProvider;
    use crate::resolver::ProfileSource;
    use crate::role::CanonicalRole;
    use async_trait::async_trait;

    struct TableSource(Vec<Profile>);

    #[async_trait]
    impl ProfileSource for TableSource {
        fn name(&self) -> &'static str {
            "table"
        }

        async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
            Ok(self
                .0
                .iter()
                .find(|p| p.email == identity.email)
                .cloned())
        }
    }

    /// A source whose lookup blocks until the test releases it, so tests can
    /// interleave transitions at exact points instead of racing timers.
    struct GatedSource {
        inner: TableSource,
        started: Arc<tokio::sync::Notify>,
        release: Arc<tokio::sync::Notify>,
    }

    #[async_trait]
    impl ProfileSource for GatedSource {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn lookup(&self, identity: &Identity) -> Result<Option<Profile>, ProfileError> {
            self.started.notify_one();
            self.release.notified().await;
            self.inner.lookup(identity).await
        }
    }

    fn identity(email: &str) -> Identity {
        Identity {
            id: format!("ident-{email}"),
            email: email.to_string(),
            role_hint: None,
            avatar_url: None,
        }
    }

    fn vendor_profile(email: &str) -> Profile {
        Profile::new(
            format!("ven-{email}"),
            email.to_string(),
            "Vendor One".to_string(),
            "VENDOR".to_string(),
        )
    }

    fn vendor_context(provider: Arc<MockIdentityProvider>, profiles: Vec<Profile>) -> Arc<SessionContext> {
        let resolver = ProfileResolver::with_sources(
            PortalFamily::Vendor,
            vec![Box::new(TableSource(profiles))],
        );
        SessionContext::with_resolver(provider, resolver)
    }

    #[tokio::test]
    async fn test_boot_without_session_is_unauthenticated() {
        let provider = Arc::new(MockIdentityProvider::new());
        let ctx = vendor_context(provider, vec![]);

        assert!(ctx.snapshot().is_loading());
        ctx.boot().await;
        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_boot_restores_surviving_session() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_session(identity("v@shop.com")),
        );
        let ctx = vendor_context(provider, vec![vendor_profile("v@shop.com")]);

        ctx.boot().await;

        let state = ctx.snapshot();
        assert_eq!(state.role(), Some(CanonicalRole::Vendor));
        assert!(ctx.current_identity().await.is_some());
    }

    #[tokio::test]
    async fn test_boot_with_unresolvable_session_degrades() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_session(identity("ghost@shop.com")),
        );
        let ctx = vendor_context(provider, vec![]);

        ctx.boot().await;
        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);
        assert!(ctx.current_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_login_success() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_account("hunter2", identity("v@shop.com")),
        );
        let ctx = vendor_context(provider, vec![vendor_profile("v@shop.com")]);

        let user = ctx
            .login(Credentials {
                email: "v@shop.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .expect("Login should succeed");

        assert_eq!(user.role, CanonicalRole::Vendor);
        assert!(ctx.snapshot().is_authenticated());
    }

    #[tokio::test]
    async fn test_login_bad_password() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_account("hunter2", identity("v@shop.com")),
        );
        let ctx = vendor_context(provider.clone(), vec![vendor_profile("v@shop.com")]);

        let err = ctx
            .login(Credentials {
                email: "v@shop.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .expect_err("Login should fail");

        assert!(matches!(err, SessionError::InvalidCredentials));
        assert!(provider.current_session().is_none());
    }

    /// Valid credentials, but no eligible profile for this portal: the
    /// provider session must be rolled back so no half-authenticated state
    /// lingers.
    #[tokio::test]
    async fn test_login_without_profile_rolls_back_provider_session() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_account("hunter2", identity("v@shop.com")),
        );
        let ctx = vendor_context(provider.clone(), vec![]);

        let err = ctx
            .login(Credentials {
                email: "v@shop.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .expect_err("Login should fail without a profile");

        assert!(matches!(err, SessionError::Unauthorized(_)));
        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);
        assert!(
            provider.current_session().is_none(),
            "Provider session should be rolled back"
        );
        assert_eq!(provider.sign_out_calls(), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_local_state_even_when_provider_fails() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_session(identity("v@shop.com")),
        );
        let ctx = vendor_context(provider.clone(), vec![vendor_profile("v@shop.com")]);
        ctx.boot().await;
        assert!(ctx.snapshot().is_authenticated());

        provider.fail_sign_out();
        ctx.logout().await;

        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);
        assert!(ctx.current_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_event_stream_transitions_state() {
        let provider = Arc::new(
            MockIdentityProvider::new().with_account("hunter2", identity("v@shop.com")),
        );
        let ctx = vendor_context(provider.clone(), vec![vendor_profile("v@shop.com")]);
        let mut rx = ctx.subscribe();

        let handle = ctx.run_events();
        ctx.boot().await;
        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);

        // Sign in through the provider directly, as another tab would
        provider
            .sign_in_with_password(Credentials {
                email: "v@shop.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .expect("Mock sign-in should succeed");

        loop {
            rx.changed().await.expect("Context should stay alive");
            if rx.borrow().is_authenticated() {
                break;
            }
        }

        provider.sign_out().await.expect("Mock sign-out should succeed");
        loop {
            rx.changed().await.expect("Context should stay alive");
            if !rx.borrow().is_authenticated() {
                break;
            }
        }

        handle.abort();
    }

    /// A sign-in whose resolution is still in flight must not overwrite a
    /// newer sign-out, even when that sign-out starts and finishes entirely
    /// inside the sign-in's window.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stale_transition_loses_to_newer_event() {
        let provider = Arc::new(MockIdentityProvider::new());
        let started = Arc::new(tokio::sync::Notify::new());
        let release = Arc::new(tokio::sync::Notify::new());
        let resolver = ProfileResolver::with_sources(
            PortalFamily::Vendor,
            vec![Box::new(GatedSource {
                inner: TableSource(vec![vendor_profile("v@shop.com")]),
                started: started.clone(),
                release: release.clone(),
            })],
        );
        let ctx = SessionContext::with_resolver(provider, resolver);

        let signed_in = AuthChange {
            event: AuthEvent::SignedIn,
            session: Some(ProviderSession {
                identity: identity("v@shop.com"),
                access_token: "t".to_string(),
            }),
        };
        let signed_out = AuthChange {
            event: AuthEvent::SignedOut,
            session: None,
        };

        let stale = {
            let ctx = Arc::clone(&ctx);
            tokio::spawn(async move { ctx.handle_event(signed_in).await })
        };
        // The sign-in has claimed its epoch and is blocked mid-resolution;
        // the sign-out now runs from claim to publish in that window
        started.notified().await;
        ctx.handle_event(signed_out).await;
        assert_eq!(ctx.snapshot(), SessionState::Unauthenticated);

        release.notify_one();
        stale.await.expect("Stale transition task should finish");
        assert_eq!(
            ctx.snapshot(),
            SessionState::Unauthenticated,
            "Stale sign-in must not overwrite the newer sign-out"
        );
        assert!(ctx.current_identity().await.is_none());
    }

    #[tokio::test]
    async fn test_change_password() {
        let provider = Arc::new(
            MockIdentityProvider::new()
                .with_account("hunter2", identity("v@shop.com"))
                .with_session(identity("v@shop.com")),
        );
        let ctx = vendor_context(provider.clone(), vec![vendor_profile("v@shop.com")]);

        ctx.change_password("wrong", "newpass")
            .await
            .expect_err("Wrong current password should fail");
        ctx.change_password("hunter2", "newpass")
            .await
            .expect("Password change should succeed");
    }
}
