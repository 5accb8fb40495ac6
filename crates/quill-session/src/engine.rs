//! The session engine: one authoritative writer reconciling the
//! external OAuth signal, the persisted record, and explicit
//! credential flows into the current [`Session`].

use crate::provider::{IdentityProvider, ProviderIdentity, ProviderSignal};
use crate::state::{Session, SessionTransition};
use quill_api::{ApiClient, AuthSession, LoginRequest, OAuthLoginRequest, RegisterRequest, User};
use quill_storage::CredentialStore;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Outcome of a credential flow (`login`/`register`).
///
/// Failures are reported here rather than propagated; the session keeps
/// its prior state.
#[derive(Debug, Clone, Serialize)]
pub struct AuthAttempt {
    /// Whether the flow succeeded.
    pub success: bool,
    /// Error message (if failed).
    pub error: Option<String>,
}

impl AuthAttempt {
    /// Create a successful outcome.
    pub fn success() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Create a failed outcome.
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// Session engine for authentication state.
///
/// Holds the credential store and API client by injection and owns the
/// watch channel consumers subscribe to. All transitions go through
/// [`Session::apply`]; the engine is the only writer.
pub struct SessionEngine {
    credentials: Arc<CredentialStore>,
    api: Arc<ApiClient>,
    provider: Option<Arc<dyn IdentityProvider>>,
    state: watch::Sender<Session>,
    /// Latest provider signal, consulted by `logout` to decide whether
    /// the provider session must be terminated too.
    last_signal: Mutex<ProviderSignal>,
}

impl SessionEngine {
    /// Create an engine without an external provider handle.
    pub fn new(credentials: Arc<CredentialStore>, api: Arc<ApiClient>) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            credentials,
            api,
            provider: None,
            state,
            last_signal: Mutex::new(ProviderSignal::SignedOut),
        }
    }

    /// Create an engine that can terminate the provider session on
    /// logout.
    pub fn with_provider(
        credentials: Arc<CredentialStore>,
        api: Arc<ApiClient>,
        provider: Arc<dyn IdentityProvider>,
    ) -> Self {
        let mut engine = Self::new(credentials, api);
        engine.provider = Some(provider);
        engine
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Snapshot of the current session.
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Apply one transition and log phase changes.
    fn dispatch(&self, transition: SessionTransition) {
        self.state.send_modify(|session| {
            let next = session.apply(transition);
            if next.phase() != session.phase() {
                debug!(
                    old_phase = ?session.phase(),
                    new_phase = ?next.phase(),
                    "session phase transition"
                );
            }
            *session = next;
        });
    }

    /// Reconcile a change in the external OAuth signal.
    ///
    /// Call once at mount with the current signal and again whenever
    /// the signal's value or status changes. A `SignedIn` delivery
    /// re-runs the token exchange, which is also how a degraded session
    /// retries it.
    pub async fn sync_provider(&self, signal: ProviderSignal) {
        *self.last_signal.lock().unwrap() = signal.clone();
        match signal {
            ProviderSignal::Loading => self.dispatch(SessionTransition::SetLoading(true)),
            ProviderSignal::SignedIn(identity) => self.exchange_identity(identity).await,
            ProviderSignal::SignedOut => self.restore_persisted(),
        }
    }

    /// Settle the session from the persisted record, without any
    /// network call. Missing or unreadable records settle to
    /// unauthenticated.
    pub fn restore_persisted(&self) {
        let token = self.credentials.token().unwrap_or_else(|error| {
            warn!(%error, "failed to read persisted token");
            None
        });
        let user: Option<User> = self.credentials.user().unwrap_or_else(|error| {
            warn!(%error, "failed to read persisted user");
            None
        });

        match (token, user) {
            (Some(token), Some(user)) => {
                debug!(user_id = %user.id, "restored persisted session");
                self.dispatch(SessionTransition::SetToken(token));
                self.dispatch(SessionTransition::SetUser(user));
            }
            _ => self.dispatch(SessionTransition::SetLoading(false)),
        }
    }

    /// Exchange the provider identity for a backend-issued token.
    ///
    /// On failure the session degrades to an in-memory identity derived
    /// from the provider fields: the token keeps its prior value and
    /// nothing is persisted, so API calls needing authorization fail
    /// until a later exchange succeeds.
    async fn exchange_identity(&self, identity: ProviderIdentity) {
        self.dispatch(SessionTransition::SetLoading(true));

        let request = OAuthLoginRequest {
            name: identity.name.clone(),
            email: identity.email.clone(),
        };

        match self.api.oauth_login(&request).await {
            Ok(auth) => {
                if let Err(error) = self.credentials.set_session(&auth.token, &auth.user) {
                    warn!(%error, "failed to persist exchanged session");
                    self.apply_fallback(identity);
                    return;
                }
                info!(user_id = %auth.user.id, "provider identity exchanged for backend token");
                self.dispatch(SessionTransition::SetToken(auth.token));
                self.dispatch(SessionTransition::SetUser(auth.user));
            }
            Err(error) => {
                warn!(error = %error, "token exchange failed, applying degraded identity");
                self.apply_fallback(identity);
            }
        }
    }

    fn apply_fallback(&self, identity: ProviderIdentity) {
        let user = User::from_identity(
            identity.email.clone(),
            identity.name,
            identity.email,
        );
        self.dispatch(SessionTransition::SetUser(user));
    }

    /// Login with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AuthAttempt {
        self.dispatch(SessionTransition::SetLoading(true));

        debug!(email = %email, "attempting credential login");

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&request).await {
            Ok(auth) => self.apply_authenticated(auth, "login"),
            Err(error) => self.fail_attempt(error.to_string(), "login"),
        }
    }

    /// Register a new account.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthAttempt {
        self.dispatch(SessionTransition::SetLoading(true));

        debug!(email = %email, "attempting registration");

        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        match self.api.register(&request).await {
            Ok(auth) => self.apply_authenticated(auth, "register"),
            Err(error) => self.fail_attempt(error.to_string(), "register"),
        }
    }

    /// Persist and apply a successful credential flow. Persisting
    /// happens first so the in-memory session never gets ahead of the
    /// durable record.
    fn apply_authenticated(&self, auth: AuthSession, flow: &str) -> AuthAttempt {
        if let Err(error) = self.credentials.set_session(&auth.token, &auth.user) {
            return self.fail_attempt(error.to_string(), flow);
        }

        info!(flow, user_id = %auth.user.id, "authenticated");
        self.dispatch(SessionTransition::SetToken(auth.token));
        self.dispatch(SessionTransition::SetUser(auth.user));
        AuthAttempt::success()
    }

    fn fail_attempt(&self, message: String, flow: &str) -> AuthAttempt {
        warn!(flow, error = %message, "auth flow failed");
        self.dispatch(SessionTransition::SetLoading(false));
        AuthAttempt::failure(message)
    }

    /// Logout: terminate the provider session when one is active, then
    /// unconditionally clear persisted storage and the in-memory
    /// session. Idempotent.
    pub async fn logout(&self) {
        let provider_active = matches!(
            &*self.last_signal.lock().unwrap(),
            ProviderSignal::SignedIn(_)
        );

        if provider_active {
            if let Some(provider) = &self.provider {
                provider.sign_out().await;
            }
            *self.last_signal.lock().unwrap() = ProviderSignal::SignedOut;
        }

        if let Err(error) = self.credentials.clear_session() {
            warn!(%error, "failed to clear persisted session");
        }

        self.dispatch(SessionTransition::Clear);
        info!("logged out");
    }
}
