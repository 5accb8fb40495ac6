//! REST client for the blogging backend.
//!
//! One private `request` performs every call: URL assembly, JSON
//! content type, bearer injection from the persisted token, and
//! response normalization. Each resource method is a thin fixed-shape
//! call site; validation is the backend's job.

use crate::error::{ApiError, ApiResult};
use crate::types::{
    AuthSession, Draft, DraftUpdate, ListQuery, LoginRequest, NewDraft, NewPost,
    OAuthLoginRequest, Post, PostUpdate, RegisterRequest, User, UserStats, UserUpdate,
};
use quill_storage::CredentialStore;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Fallback message for error bodies carrying neither `message` nor
/// `error`.
const GENERIC_FAILURE: &str = "Request failed";

/// Derive the surfaced error message from a backend error body.
fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .or_else(|| body.get("error").and_then(Value::as_str))
        .unwrap_or(GENERIC_FAILURE)
        .to_string()
}

/// Append query pairs to a path.
fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    format!("{}?{}", path, serializer.finish())
}

/// Client for the blogging backend's REST API.
///
/// Explicitly constructed and injected; reads the bearer token from
/// the credential store on every request, never writes it.
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Arc<CredentialStore>,
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    /// * `base_url` - Backend base URL (e.g. `http://localhost:5000`)
    /// * `credentials` - Store holding the persisted bearer token
    pub fn new(base_url: impl Into<String>, credentials: Arc<CredentialStore>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Build the absolute URL for an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Perform one request and normalize the outcome.
    ///
    /// Success (2xx) resolves to the parsed JSON body. A non-success
    /// status fails with [`ApiError::Request`] carrying the
    /// body-derived message. Transport and decode failures propagate
    /// unchanged as [`ApiError::Http`]. No retries.
    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);

        let mut builder = self
            .http_client
            .request(method.clone(), &url)
            .header("Content-Type", "application/json");

        if let Some(token) = self.credentials.token()? {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(method = %method, url = %url, "sending API request");

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let data: Value = response.json().await?;
            let message = error_message(&data);
            warn!(%status, message = %message, url = %url, "API request failed");
            return Err(ApiError::Request { status, message });
        }

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::POST, path, Some(body)).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.request::<T, ()>(Method::DELETE, path, None).await
    }

    // ==========================================
    // Auth
    // ==========================================

    /// `POST /api/auth/register`
    pub async fn register(&self, body: &RegisterRequest) -> ApiResult<AuthSession> {
        self.post("/api/auth/register", body).await
    }

    /// `POST /api/auth/login`
    pub async fn login(&self, body: &LoginRequest) -> ApiResult<AuthSession> {
        self.post("/api/auth/login", body).await
    }

    /// `POST /api/auth/oauth`: exchange a provider identity for a
    /// backend-issued token.
    pub async fn oauth_login(&self, body: &OAuthLoginRequest) -> ApiResult<AuthSession> {
        self.post("/api/auth/oauth", body).await
    }

    /// `GET /api/auth/me`
    pub async fn current_user(&self) -> ApiResult<User> {
        self.get("/api/auth/me").await
    }

    // ==========================================
    // Posts
    // ==========================================

    /// `GET /api/posts`
    pub async fn list_posts(&self, query: &ListQuery) -> ApiResult<Vec<Post>> {
        self.get(&with_query("/api/posts", &query.pairs())).await
    }

    /// `GET /api/posts/:id`
    pub async fn get_post(&self, id: &str) -> ApiResult<Post> {
        self.get(&format!("/api/posts/{}", id)).await
    }

    /// `POST /api/posts`
    pub async fn create_post(&self, body: &NewPost) -> ApiResult<Post> {
        self.post("/api/posts", body).await
    }

    /// `PUT /api/posts/:id`
    pub async fn update_post(&self, id: &str, body: &PostUpdate) -> ApiResult<Post> {
        self.put(&format!("/api/posts/{}", id), body).await
    }

    /// `DELETE /api/posts/:id`
    pub async fn delete_post(&self, id: &str) -> ApiResult<Value> {
        self.delete(&format!("/api/posts/{}", id)).await
    }

    // ==========================================
    // Users
    // ==========================================

    /// `GET /api/users`
    pub async fn list_users(&self, query: &ListQuery) -> ApiResult<Vec<User>> {
        self.get(&with_query("/api/users", &query.pairs())).await
    }

    /// `GET /api/users/:id`
    pub async fn get_user(&self, id: &str) -> ApiResult<User> {
        self.get(&format!("/api/users/{}", id)).await
    }

    /// `PUT /api/users/:id`
    pub async fn update_user(&self, id: &str, body: &UserUpdate) -> ApiResult<User> {
        self.put(&format!("/api/users/{}", id), body).await
    }

    /// `DELETE /api/users/:id`
    pub async fn delete_user(&self, id: &str) -> ApiResult<Value> {
        self.delete(&format!("/api/users/{}", id)).await
    }

    /// `GET /api/users/:id/stats`
    pub async fn user_stats(&self, id: &str) -> ApiResult<UserStats> {
        self.get(&format!("/api/users/{}/stats", id)).await
    }

    // ==========================================
    // Drafts
    // ==========================================

    /// `GET /api/drafts`
    pub async fn list_drafts(&self, query: &ListQuery) -> ApiResult<Vec<Draft>> {
        self.get(&with_query("/api/drafts", &query.pairs())).await
    }

    /// `GET /api/drafts/:id`
    pub async fn get_draft(&self, id: &str) -> ApiResult<Draft> {
        self.get(&format!("/api/drafts/{}", id)).await
    }

    /// `POST /api/drafts`
    pub async fn create_draft(&self, body: &NewDraft) -> ApiResult<Draft> {
        self.post("/api/drafts", body).await
    }

    /// `PUT /api/drafts/:id`
    pub async fn update_draft(&self, id: &str, body: &DraftUpdate) -> ApiResult<Draft> {
        self.put(&format!("/api/drafts/{}", id), body).await
    }

    /// `DELETE /api/drafts/:id`
    pub async fn delete_draft(&self, id: &str) -> ApiResult<Value> {
        self.delete(&format!("/api/drafts/{}", id)).await
    }

    /// `POST /api/drafts/:id/publish`
    pub async fn publish_draft(&self, id: &str) -> ApiResult<Post> {
        self.post(&format!("/api/drafts/{}/publish", id), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_storage::MemoryStorage;
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn client_for(server_url: &str) -> ApiClient {
        let credentials = Arc::new(CredentialStore::new(Box::new(MemoryStorage::new())));
        ApiClient::new(server_url, credentials)
    }

    fn authed_client_for(server_url: &str, token: &str) -> ApiClient {
        let credentials = Arc::new(CredentialStore::new(Box::new(MemoryStorage::new())));
        credentials
            .set_session(token, &User::from_identity("u1", "Ada", "ada@example.com"))
            .unwrap();
        ApiClient::new(server_url, credentials)
    }

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = json!({"message": "bad title", "error": "other"});
        assert_eq!(error_message(&body), "bad title");
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let body = json!({"error": "not found"});
        assert_eq!(error_message(&body), "not found");
    }

    #[test]
    fn test_error_message_generic_fallback() {
        assert_eq!(error_message(&json!({})), GENERIC_FAILURE);
        assert_eq!(error_message(&json!({"message": 42})), GENERIC_FAILURE);
    }

    #[test]
    fn test_with_query() {
        assert_eq!(with_query("/api/posts", &[]), "/api/posts");
        assert_eq!(
            with_query("/api/posts", &[("search", "rust lang".to_string())]),
            "/api/posts?search=rust+lang"
        );
    }

    #[test]
    fn test_endpoint_join_handles_trailing_slash() {
        let client = client_for("http://localhost:5000/");
        assert_eq!(
            client.endpoint("/api/posts"),
            "http://localhost:5000/api/posts"
        );
    }

    #[tokio::test]
    async fn test_success_resolves_to_parsed_body() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/api/posts/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let value = client.delete_post("1").await.unwrap();
        assert_eq!(value, json!({"id": 1}));
    }

    #[tokio::test]
    async fn test_not_found_surfaces_error_field_verbatim() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/9"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "not found"})))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let error = client.get_post("9").await.unwrap_err();
        assert_eq!(error.to_string(), "not found");
        match error {
            ApiError::Request { status, message } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(message, "not found");
            }
            other => panic!("expected request error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_message_field_wins_over_error_field() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/posts"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "message": "Title is required",
                "error": "validation"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let error = client
            .create_post(&NewPost {
                title: String::new(),
                content: "body".to_string(),
                excerpt: None,
            })
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Title is required");
    }

    #[tokio::test]
    async fn test_non_json_error_body_propagates_decode_failure() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts/1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let error = client.get_post("1").await.unwrap_err();
        assert!(matches!(error, ApiError::Http(_)));
    }

    #[tokio::test]
    async fn test_bearer_header_sent_when_token_present() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "u1",
                "name": "Ada",
                "email": "ada@example.com"
            })))
            .mount(&server)
            .await;

        let client = authed_client_for(&server.uri(), "abc");
        let user = client.current_user().await.unwrap();
        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn test_no_bearer_header_without_token() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        client.list_posts(&ListQuery::default()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("Authorization").is_none());
    }

    #[tokio::test]
    async fn test_list_posts_appends_query_parameters() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/posts"))
            .and(query_param("search", "rust"))
            .and(query_param("limit", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
                "id": "p1",
                "title": "Hello",
                "content": "World",
                "author": "Ada",
                "authorId": "u1"
            }])))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let query = ListQuery {
            search: Some("rust".to_string()),
            limit: Some(10),
            ..Default::default()
        };
        let posts = client.list_posts(&query).await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].author_id, "u1");
    }

    #[tokio::test]
    async fn test_login_posts_credentials_and_parses_session() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({
                "email": "ada@example.com",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "tok-1",
                "user": {"id": "u1", "name": "Ada", "email": "ada@example.com"}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let session = client
            .login(&LoginRequest {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.token, "tok-1");
        assert_eq!(session.user.name, "Ada");
    }

    #[tokio::test]
    async fn test_publish_draft_returns_post() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/drafts/d1/publish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "p1",
                "title": "Hello",
                "content": "World",
                "author": "Ada",
                "authorId": "u1"
            })))
            .mount(&server)
            .await;

        let client = authed_client_for(&server.uri(), "abc");
        let post = client.publish_draft("d1").await.unwrap();
        assert_eq!(post.id, "p1");
    }
}
