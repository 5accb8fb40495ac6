//! Session store for the Quill client.
//!
//! This crate provides:
//! - `Session` state with a typed transition function
//! - `SessionEngine`: the single writer reconciling the external OAuth
//!   signal, the persisted bearer token, and explicit credential flows
//! - Provider signal types and the sign-out handle
//! - A loopback callback listener for the browser-based OAuth flow

mod engine;
mod error;
mod oauth;
mod provider;
mod state;

pub use engine::{AuthAttempt, SessionEngine};
pub use error::{SessionError, SessionResult};
pub use oauth::{CallbackServer, DEFAULT_CALLBACK_PORT, DEFAULT_CALLBACK_TIMEOUT_SECS};
pub use provider::{IdentityProvider, ProviderIdentity, ProviderSignal};
pub use state::{Session, SessionPhase, SessionTransition};
