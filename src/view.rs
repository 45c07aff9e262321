//! View Selection Module
//!
//! Pure mapping from session state to the top-level view the
//! presentation layer should render.

use serde::{Deserialize, Serialize};

use crate::session::SessionState;

/// Which top-level UI stack is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppView {
    /// Startup placeholder while the token is being restored
    Loading,
    /// Sign-in stack
    Auth,
    /// Main app stack
    Main,
}

impl std::fmt::Display for AppView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppView::Loading => write!(f, "loading"),
            AppView::Auth => write!(f, "auth"),
            AppView::Main => write!(f, "main"),
        }
    }
}

/// Transition style to use when the active stack changes.
/// A pop feels right when the auth stack replaces the main stack
/// after a sign-out; everything else pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionHint {
    Push,
    Pop,
}

/// Select the view for a session state.
pub fn select_view(state: &SessionState, skip_loading_screen: bool) -> AppView {
    if state.is_loading && !skip_loading_screen {
        AppView::Loading
    } else if state.token.is_none() {
        AppView::Auth
    } else {
        AppView::Main
    }
}

/// Transition style for the current state.
pub fn transition_hint(state: &SessionState) -> TransitionHint {
    if state.is_signout {
        TransitionHint::Pop
    } else {
        TransitionHint::Push
    }
}
