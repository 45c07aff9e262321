//! Session State Module
//!
//! The in-memory session record and the reducer that advances it.
//! All side effects (storage, network) live in the controller; the
//! reducer is a total function of state and action.

use std::fmt;

use serde::Deserialize;

/// Session state, one record per process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// Opaque auth token. `None` means not authenticated.
    pub token: Option<String>,
    /// True only until the initial token restoration completes.
    pub is_loading: bool,
    /// True immediately after an explicit sign-out. Only used to pick
    /// the transition style when the auth UI replaces the main UI.
    pub is_signout: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            is_loading: true,
            is_signout: false,
        }
    }
}

impl SessionState {
    /// Check if a token is present
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }
}

/// Sign-in form data. Used once per attempt, then dropped.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Actions accepted by the reducer.
#[derive(Debug, Clone)]
pub enum AuthAction {
    /// Fired once at startup with whatever the session store held.
    RestoreToken(Option<String>),
    /// The identity check succeeded and issued this token.
    SignIn(String),
    /// User-initiated sign-out.
    SignOut,
    /// Registration; currently indistinguishable from sign-in.
    SignUp(String),
}

/// Advance the session state by one action.
pub fn reduce(state: &SessionState, action: AuthAction) -> SessionState {
    match action {
        AuthAction::RestoreToken(token) => SessionState {
            token,
            is_loading: false,
            is_signout: state.is_signout,
        },
        AuthAction::SignIn(token) | AuthAction::SignUp(token) => SessionState {
            token: Some(token),
            is_signout: false,
            ..state.clone()
        },
        AuthAction::SignOut => SessionState {
            token: None,
            is_signout: true,
            ..state.clone()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_states() -> Vec<SessionState> {
        let tokens = [None, Some("tok".to_string())];
        let mut states = Vec::new();
        for token in tokens {
            for is_loading in [false, true] {
                for is_signout in [false, true] {
                    states.push(SessionState {
                        token: token.clone(),
                        is_loading,
                        is_signout,
                    });
                }
            }
        }
        states
    }

    #[test]
    fn restore_adopts_token_and_ends_loading() {
        for state in all_states() {
            for token in [None, Some("abc123".to_string())] {
                let next = reduce(&state, AuthAction::RestoreToken(token.clone()));
                assert_eq!(next.token, token);
                assert!(!next.is_loading);
            }
        }
    }

    #[test]
    fn sign_in_sets_token_and_clears_signout() {
        for state in all_states() {
            let next = reduce(&state, AuthAction::SignIn("t1".to_string()));
            assert_eq!(next.token.as_deref(), Some("t1"));
            assert!(!next.is_signout);
            assert_eq!(next.is_loading, state.is_loading);
        }
    }

    #[test]
    fn sign_up_behaves_like_sign_in() {
        for state in all_states() {
            let up = reduce(&state, AuthAction::SignUp("t2".to_string()));
            let inn = reduce(&state, AuthAction::SignIn("t2".to_string()));
            assert_eq!(up, inn);
        }
    }

    #[test]
    fn sign_out_clears_token_and_marks_signout() {
        for state in all_states() {
            let next = reduce(&state, AuthAction::SignOut);
            assert_eq!(next.token, None);
            assert!(next.is_signout);
        }
    }

    #[test]
    fn sign_out_is_idempotent() {
        for state in all_states() {
            let once = reduce(&state, AuthAction::SignOut);
            let twice = reduce(&once, AuthAction::SignOut);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let creds = Credentials {
            username: "test".to_string(),
            password: "hunter2".to_string(),
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("test"));
        assert!(!printed.contains("hunter2"));
    }
}
