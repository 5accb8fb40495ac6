//! REST request client for the Quill blogging backend.
//!
//! This crate provides:
//! - `ApiClient`: one authorized HTTP request path with a normalized
//!   error contract for every API surface (auth, posts, users, drafts)
//! - Wire types for the backend's JSON shapes
//! - `ApiError`: request errors with body-derived messages; transport
//!   failures propagate unchanged

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiResult};
pub use types::{
    AuthSession, Draft, DraftUpdate, ListQuery, LoginRequest, NewDraft, NewPost,
    OAuthLoginRequest, Post, PostUpdate, RegisterRequest, User, UserStats, UserUpdate,
};
