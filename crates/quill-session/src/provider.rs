//! External OAuth session provider types.
//!
//! The provider manages its own sign-in lifecycle; this client only
//! observes it as a signal and, on logout, asks it to terminate.

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// Identity reported by the OAuth provider for a signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderIdentity {
    pub name: String,
    pub email: String,
}

/// Current state of the external OAuth session, delivered to the
/// engine whenever it changes.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSignal {
    /// The provider has not settled yet
    Loading,
    /// A user is signed in with the provider
    SignedIn(ProviderIdentity),
    /// No provider session
    SignedOut,
}

/// Handle for telling the provider to terminate its session.
pub trait IdentityProvider: Send + Sync {
    /// Sign out on the provider side, without any redirect.
    fn sign_out(&self) -> BoxFuture<'_, ()>;
}
