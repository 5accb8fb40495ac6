//! Session state and its transition function.
//!
//! The session is a small value reduced over typed transitions by the
//! engine, which is the only writer. A failed credential flow issues
//! only `SetLoading` transitions, which is what keeps the prior
//! identity intact across the failure.

use quill_api::User;
use serde::Serialize;

/// The one authoritative client session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    /// True only while resolution (OAuth exchange, credential flow, or
    /// persisted-store read) is in flight.
    pub loading: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            loading: true,
        }
    }
}

/// Typed transitions applied by [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionTransition {
    /// Enter or leave the resolving state
    SetLoading(bool),
    /// Apply a bearer token
    SetToken(String),
    /// Apply a user and finish resolution
    SetUser(User),
    /// Drop identity, token, and loading (logout)
    Clear,
}

/// Coarse phase derived from the session fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Resolution in flight
    Resolving,
    /// A user is present (possibly degraded, without a token)
    Authenticated,
    /// No user, no token, nothing in flight
    Unauthenticated,
}

impl Session {
    /// Apply one transition, producing the next session value.
    pub fn apply(&self, transition: SessionTransition) -> Session {
        let mut next = self.clone();
        match transition {
            SessionTransition::SetLoading(loading) => next.loading = loading,
            SessionTransition::SetToken(token) => next.token = Some(token),
            SessionTransition::SetUser(user) => {
                next.user = Some(user);
                next.loading = false;
            }
            SessionTransition::Clear => {
                next.user = None;
                next.token = None;
                next.loading = false;
            }
        }
        next
    }

    /// Current phase of the session.
    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Resolving
        } else if self.user.is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Unauthenticated
        }
    }

    /// True when a user is present and resolution has settled.
    pub fn is_authenticated(&self) -> bool {
        self.phase() == SessionPhase::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User::from_identity(id, "Ada", "ada@example.com")
    }

    #[test]
    fn test_initial_session_is_resolving() {
        let session = Session::default();
        assert_eq!(session.user, None);
        assert_eq!(session.token, None);
        assert!(session.loading);
        assert_eq!(session.phase(), SessionPhase::Resolving);
    }

    #[test]
    fn test_set_user_finishes_resolution() {
        let session = Session::default().apply(SessionTransition::SetUser(user("u1")));
        assert!(!session.loading);
        assert_eq!(session.phase(), SessionPhase::Authenticated);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_set_token_leaves_loading_untouched() {
        let session = Session::default().apply(SessionTransition::SetToken("t1".to_string()));
        assert_eq!(session.token, Some("t1".to_string()));
        assert!(session.loading);
    }

    #[test]
    fn test_clear_empties_everything() {
        let session = Session::default()
            .apply(SessionTransition::SetToken("t1".to_string()))
            .apply(SessionTransition::SetUser(user("u1")))
            .apply(SessionTransition::Clear);

        assert_eq!(session.user, None);
        assert_eq!(session.token, None);
        assert!(!session.loading);
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
    }

    #[test]
    fn test_loading_roundtrip_preserves_identity() {
        // The failed-login shape: loading toggles, identity survives.
        let authenticated = Session::default()
            .apply(SessionTransition::SetToken("t1".to_string()))
            .apply(SessionTransition::SetUser(user("u1")));

        let after_failure = authenticated
            .apply(SessionTransition::SetLoading(true))
            .apply(SessionTransition::SetLoading(false));

        assert_eq!(after_failure, authenticated);
    }

    #[test]
    fn test_degraded_session_counts_as_authenticated() {
        // Fallback identity without a token is still a signed-in user.
        let session = Session::default().apply(SessionTransition::SetUser(user("ada@example.com")));
        assert_eq!(session.token, None);
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_settled_empty_session_is_unauthenticated() {
        let session = Session::default().apply(SessionTransition::SetLoading(false));
        assert_eq!(session.phase(), SessionPhase::Unauthenticated);
        assert!(!session.is_authenticated());
    }
}
