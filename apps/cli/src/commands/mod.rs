//! CLI command implementations.

pub mod auth;
pub mod drafts;
pub mod posts;
pub mod users;

use anyhow::Result;
use quill_api::ApiClient;
use quill_config::{Config, Paths};
use quill_session::SessionEngine;
use quill_storage::CredentialStore;
use std::io::{self, Write};
use std::sync::Arc;

/// Everything a command needs: configuration plus the constructed
/// client stack (storage, API client, session engine).
pub struct App {
    pub config: Config,
    pub credentials: Arc<CredentialStore>,
    pub api: Arc<ApiClient>,
    pub engine: SessionEngine,
}

impl App {
    /// Build the client stack for this environment.
    pub fn build(paths: &Paths, config: Config) -> Self {
        tracing::debug!(api_url = %config.api_url, "building client stack");
        let storage = quill_storage::open_storage(paths);
        let credentials = Arc::new(CredentialStore::new(storage));
        let api = Arc::new(ApiClient::new(config.api_url.clone(), credentials.clone()));
        let engine = SessionEngine::new(credentials.clone(), api.clone());

        Self {
            config,
            credentials,
            api,
            engine,
        }
    }
}

/// Prompt for a line of input.
pub fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Ask user for confirmation.
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N] ", prompt);
    io::stdout().flush().ok();

    let mut input = String::new();
    if io::stdin().read_line(&mut input).is_err() {
        return false;
    }

    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
