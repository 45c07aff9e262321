//! WearCity Companion Session Core
//!
//! The session-state machine behind the WearCity app shell: restores a
//! persisted auth token at startup, validates sign-in credentials
//! against the remote identity check, and tells the presentation layer
//! which top-level stack (loading, auth, main) to render. UI rendering
//! itself lives in the embedding shell, which consumes this crate
//! through [`AppShell`].

pub mod bootstrap;
pub mod config;
pub mod controller;
pub mod identity;
pub mod logging;
pub mod session;
pub mod storage;
pub mod view;

use std::sync::atomic::{AtomicBool, Ordering};

use crate::bootstrap::ResourceTask;
use crate::config::ShellConfig;
use crate::controller::AuthController;
use crate::identity::IdentityClient;
use crate::session::SessionState;
use crate::storage::SessionStore;
use crate::view::{select_view, transition_hint, AppView, TransitionHint};

/// Top-level wiring: the auth controller plus the startup gate that
/// keeps the loading view up until resources are ready. The embedding
/// shell constructs one of these and passes it down; there is no
/// ambient/global state.
pub struct AppShell {
    controller: AuthController,
    resources_ready: AtomicBool,
}

impl AppShell {
    /// Build a shell with default collaborators
    pub fn new(config: ShellConfig) -> Self {
        let store = SessionStore::new();
        let identity = IdentityClient::new(&config.identity_url);

        Self::with_parts(store, identity, config)
    }

    /// Build a shell with injected collaborators
    pub fn with_parts(store: SessionStore, identity: IdentityClient, config: ShellConfig) -> Self {
        Self {
            controller: AuthController::new(store, identity, config),
            resources_ready: AtomicBool::new(false),
        }
    }

    /// The auth controller; sign-in/out/up dispatchers live here
    pub fn controller(&self) -> &AuthController {
        &self.controller
    }

    /// Run startup: token restoration joined with the embedder's
    /// resource tasks. Returns once the loading view may be dismissed.
    pub async fn start(&self, resources: Vec<ResourceTask>) {
        bootstrap::run(&self.controller, resources).await;
        self.resources_ready.store(true, Ordering::SeqCst);
    }

    /// The view the presentation layer should render right now.
    /// Loading stays up until both startup tracks are done, unless the
    /// embedder asked to skip the loading screen.
    pub fn current_view(&self) -> AppView {
        let state = self.controller.state();
        let skip = self.controller.config().skip_loading_screen;

        if !self.resources_ready.load(Ordering::SeqCst) && !skip {
            return AppView::Loading;
        }

        select_view(&state, skip)
    }

    /// Transition style for the current state
    pub fn current_transition(&self) -> TransitionHint {
        transition_hint(&self.controller.state())
    }

    /// Snapshot of the session state
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }
}
