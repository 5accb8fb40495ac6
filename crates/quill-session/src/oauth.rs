//! Loopback listener for the browser-based OAuth flow.
//!
//! Terminal clients cannot host a redirect target, so the web
//! application sends the signed-in identity back through a short-lived
//! HTTP listener on localhost. The caller opens the browser at
//! [`CallbackServer::auth_url`] and awaits the callback.

use crate::error::{SessionError, SessionResult};
use crate::provider::ProviderIdentity;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{debug, error, info};

/// Default callback port.
pub const DEFAULT_CALLBACK_PORT: u16 = 8976;

/// Default callback timeout in seconds.
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 180;

/// Listener that waits for the web application's sign-in redirect.
pub struct CallbackServer {
    port: u16,
    timeout_secs: u64,
}

impl CallbackServer {
    /// Create a new callback listener.
    pub fn new(port: u16, timeout_secs: u64) -> Self {
        Self { port, timeout_secs }
    }

    /// Create with default settings.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CALLBACK_PORT, DEFAULT_CALLBACK_TIMEOUT_SECS)
    }

    /// The callback URL the web application redirects to.
    pub fn callback_url(&self) -> String {
        format!("http://localhost:{}/callback", self.port)
    }

    /// The web application URL to open in the browser.
    pub fn auth_url(&self, web_url: &str) -> String {
        let callback = self.callback_url();
        let encoded: String = url::form_urlencoded::byte_serialize(callback.as_bytes()).collect();
        format!("{}/auth/cli?callback={}", web_url.trim_end_matches('/'), encoded)
    }

    /// Start the listener and wait for the identity callback.
    ///
    /// Resolves to the provider identity on success. Fails when the
    /// web application reports an error, required parameters are
    /// missing, or the timeout elapses.
    pub async fn wait_for_identity(&self) -> SessionResult<ProviderIdentity> {
        let addr = format!("127.0.0.1:{}", self.port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| SessionError::Callback(format!("Failed to bind to {}: {}", addr, e)))?;

        info!(port = self.port, "OAuth callback listener ready");

        let (tx, rx) = oneshot::channel::<Result<ProviderIdentity, String>>();
        let tx = Arc::new(tokio::sync::Mutex::new(Some(tx)));

        let server_handle = tokio::spawn({
            let tx = tx.clone();
            async move {
                loop {
                    match listener.accept().await {
                        Ok((mut socket, _)) => {
                            let tx = tx.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(&mut socket, tx).await {
                                    error!("Error handling callback connection: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            error!("Accept error: {}", e);
                            break;
                        }
                    }
                }
            }
        });

        let timeout = tokio::time::Duration::from_secs(self.timeout_secs);
        let outcome = match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(Ok(identity))) => Ok(identity),
            Ok(Ok(Err(message))) => Err(SessionError::Callback(message)),
            Ok(Err(_)) => Err(SessionError::Callback("callback channel closed".to_string())),
            Err(_) => Err(SessionError::Callback(
                "timed out waiting for sign-in".to_string(),
            )),
        };

        server_handle.abort();

        outcome
    }
}

/// Handle one incoming HTTP connection.
async fn handle_connection(
    socket: &mut tokio::net::TcpStream,
    tx: Arc<tokio::sync::Mutex<Option<oneshot::Sender<Result<ProviderIdentity, String>>>>>,
) -> SessionResult<()> {
    let (reader, mut writer) = socket.split();
    let mut reader = BufReader::new(reader);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    debug!(request = %request_line.trim(), "received callback request");

    if !request_line.starts_with("GET ") {
        send_response(&mut writer, 405, "Method Not Allowed", "Method Not Allowed").await?;
        return Ok(());
    }

    let path_end = request_line.find(" HTTP/").unwrap_or(request_line.len());
    let path = &request_line[4..path_end];

    if !path.starts_with("/callback") {
        send_response(&mut writer, 404, "Not Found", "Not Found").await?;
        return Ok(());
    }

    let query = match path.find('?') {
        Some(idx) => &path[idx + 1..],
        None => "",
    };

    let params: HashMap<String, String> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();

    let name = params.get("name").cloned();
    let email = params.get("email").cloned();
    let error = params.get("error").cloned();

    let result = if let Some(err) = error {
        send_response(&mut writer, 200, "OK", &error_page(&err)).await?;
        Err(err)
    } else if let (Some(name), Some(email)) = (name, email) {
        send_response(&mut writer, 200, "OK", &success_page()).await?;
        Ok(ProviderIdentity { name, email })
    } else {
        send_response(&mut writer, 200, "OK", &error_page("Missing required parameters")).await?;
        Err("Missing required parameters".to_string())
    };

    if let Some(tx) = tx.lock().await.take() {
        let _ = tx.send(result);
    }

    Ok(())
}

/// Send an HTTP response.
async fn send_response(
    writer: &mut tokio::net::tcp::WriteHalf<'_>,
    status_code: u16,
    status_text: &str,
    body: &str,
) -> SessionResult<()> {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_code,
        status_text,
        body.len(),
        body
    );
    writer.write_all(response.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

fn success_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head><title>Quill - Signed in</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px;">
<h1>Signed in</h1>
<p>You can close this window and return to the terminal.</p>
</body>
</html>"#
        .to_string()
}

fn error_page(error: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Quill - Sign-in failed</title></head>
<body style="font-family: system-ui; text-align: center; padding: 50px;">
<h1>Sign-in failed</h1>
<p>Error: {}</p>
<p>You can close this window and try again.</p>
</body>
</html>"#,
        error
    )
}
