//! Auth Controller Module
//!
//! Owns the session state machine and mediates the side effects around
//! it: restoring the persisted token at startup, running the remote
//! identity check on sign-in, and clearing the store on sign-out.
//! State changes are published on a watch channel so the presentation
//! layer can re-select its view after every transition.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::ShellConfig;
use crate::identity::{IdentityClient, IdentityError};
use crate::session::{reduce, AuthAction, Credentials, SessionState};
use crate::storage::SessionStore;

/// Drives the session state machine
pub struct AuthController {
    state_tx: watch::Sender<SessionState>,
    store: SessionStore,
    identity: IdentityClient,
    config: ShellConfig,
    sign_in_busy: AtomicBool,
}

impl AuthController {
    /// Create a controller over the given collaborators
    pub fn new(store: SessionStore, identity: IdentityClient, config: ShellConfig) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());

        Self {
            state_tx,
            store,
            identity,
            config,
            sign_in_busy: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current session state
    pub fn state(&self) -> SessionState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to session state changes
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state_tx.subscribe()
    }

    /// Check if a token is currently held
    pub fn is_signed_in(&self) -> bool {
        self.state().is_signed_in()
    }

    /// The shell configuration this controller runs with
    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    fn dispatch(&self, action: AuthAction) {
        self.state_tx.send_modify(|state| *state = reduce(state, action));
    }

    /// Restore the persisted token. Called once at startup; a failed
    /// read is treated as no token, never as a fatal error.
    pub async fn restore_session(&self) {
        let token = match self.store.load_token() {
            Ok(Some(token)) => {
                info!("Restored persisted token");
                Some(token)
            }
            Ok(None) => {
                info!("No persisted token, starting signed out");
                None
            }
            Err(e) => {
                warn!("Failed to read persisted token: {}. Starting signed out.", e);
                None
            }
        };

        self.dispatch(AuthAction::RestoreToken(token));
    }

    /// Sign in with the given credentials.
    ///
    /// At most one attempt runs at a time; a second call while one is
    /// in flight fails with [`SignInError::Busy`]. On any failure the
    /// session state is left untouched and the caller is expected to
    /// show a single failure notice.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<(), SignInError> {
        if self.sign_in_busy.swap(true, Ordering::SeqCst) {
            warn!("Rejecting sign-in while another attempt is in flight");
            return Err(SignInError::Busy);
        }

        info!("Signing in user: {}", credentials.username);
        let result = self.check_identity(&credentials).await;
        self.sign_in_busy.store(false, Ordering::SeqCst);

        result?;

        self.dispatch(AuthAction::SignIn(self.config.issued_token.clone()));
        self.persist_token();

        info!("Sign in successful");
        Ok(())
    }

    /// Sign out. The state transition is synchronous; clearing the
    /// persisted token is best-effort.
    pub fn sign_out(&self) {
        info!("Signing out");

        self.dispatch(AuthAction::SignOut);

        if let Err(e) = self.store.clear_token() {
            error!("Failed to clear persisted token: {}", e);
        }
    }

    /// Register a new account. There is no distinct registration flow
    /// yet, so this issues the configured token like a sign-in.
    pub fn sign_up(&self, credentials: Credentials) {
        info!("Signing up user: {}", credentials.username);

        self.dispatch(AuthAction::SignUp(self.config.issued_token.clone()));
        self.persist_token();
    }

    async fn check_identity(&self, credentials: &Credentials) -> Result<(), SignInError> {
        let records = match self.identity.lookup_user(&credentials.username).await {
            Ok(records) => records,
            Err(IdentityError::Parse(e)) => {
                // Shape mismatch counts as a rejection, not a crash
                warn!("Identity response had unexpected shape: {}", e);
                return Err(SignInError::Rejected);
            }
            Err(e) => {
                error!("Identity check failed: {}", e);
                return Err(SignInError::Network(e.to_string()));
            }
        };

        let matched = records
            .first()
            .and_then(|record| record.user_name())
            .map(|name| name == self.config.expected_account)
            .unwrap_or(false);

        if matched {
            Ok(())
        } else {
            info!("Identity check rejected user: {}", credentials.username);
            Err(SignInError::Rejected)
        }
    }

    fn persist_token(&self) {
        if let Err(e) = self.store.save_token(&self.config.issued_token) {
            error!("Failed to persist token: {}", e);
        }
    }
}

/// Sign-in failures surfaced to the presentation layer
#[derive(Debug, thiserror::Error)]
pub enum SignInError {
    /// No matching account; shown as "login failed"
    #[error("login failed")]
    Rejected,

    /// The identity check never produced a usable answer
    #[error("Network error: {0}")]
    Network(String),

    /// Another sign-in attempt is already in flight
    #[error("sign-in already in progress")]
    Busy,
}
