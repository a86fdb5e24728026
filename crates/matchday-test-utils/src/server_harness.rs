//! Test server harness for E2E testing
//!
//! Provides `TestServer` for spawning real matchday server instances in tests.

use crate::test_ids::{TEST_BCRYPT_COST, TEST_JWT_SECRET, TEST_PASSWORD};
use matchday_service::config::{Config, DEFAULT_JWT_CLOCK_SKEW_SECONDS, DEFAULT_TOKEN_LIFETIME_HOURS};
use matchday_service::routes::{self, AppState};
use matchday_service::services::token_service::TokenService;
use secrecy::SecretBox;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Test harness for spawning the matchday server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = "../../migrations")]
/// async fn test_create_team_e2e(pool: PgPool) -> Result<()> {
///     let server = TestServer::spawn(pool).await?;
///     let token = server.signup_admin("alice").await?;
///
///     let response = server
///         .client()
///         .post(format!("{}/api/v1/teams", server.url()))
///         .bearer_auth(&token)
///         .json(&json!({"name": "chelsea"}))
///         .send()
///         .await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a new test server instance with isolated database
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign tokens with `TEST_JWT_SECRET`
    /// - Hash passwords at `TEST_BCRYPT_COST`
    /// - Start the HTTP server in the background
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        let config = Config {
            database_url: String::new(), // Not used, the pool is already connected
            bind_address: "127.0.0.1:0".to_string(),
            jwt_secret: SecretBox::new(Box::new(TEST_JWT_SECRET.to_vec())),
            token_lifetime_hours: DEFAULT_TOKEN_LIFETIME_HOURS,
            jwt_clock_skew_seconds: DEFAULT_JWT_CLOCK_SKEW_SECONDS,
            bcrypt_cost: TEST_BCRYPT_COST,
            max_connections: 5,
        };

        let state = Arc::new(AppState::new(pool.clone(), config.clone()));

        // The global recorder can only be installed once per process; later
        // servers get a standalone recorder.
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                PrometheusBuilder::new().build_recorder().handle()
            }
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get reference to the database pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Token service configured exactly like the server's
    pub fn tokens(&self) -> TokenService {
        TokenService::from_config(&self.config)
    }

    /// Resolve the account id a token was issued for
    pub fn account_id(&self, token: &str) -> Result<Uuid, anyhow::Error> {
        Ok(self.tokens().verify_account_id(token)?)
    }

    /// Sign up an admin through the API and return its token
    ///
    /// The name is fixed, the email is `<username>@example.com` and the
    /// password is `TEST_PASSWORD`.
    pub async fn signup_admin(&self, username: &str) -> Result<String, anyhow::Error> {
        self.signup("admin", username).await
    }

    /// Sign up a regular user through the API and return its token
    pub async fn signup_user(&self, username: &str) -> Result<String, anyhow::Error> {
        self.signup("user", username).await
    }

    async fn signup(&self, kind: &str, username: &str) -> Result<String, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/{}/signup", self.url(), kind))
            .json(&json!({
                "name": "Test Account",
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD,
            }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            anyhow::bail!("{} signup failed with {}: {}", kind, status, body);
        }

        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("signup response has no token: {}", body))
    }

    /// Create a team through the API and return its id
    pub async fn create_team(&self, token: &str, name: &str) -> Result<Uuid, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}/api/v1/teams", self.url()))
            .bearer_auth(token)
            .json(&json!({ "name": name }))
            .send()
            .await?;

        let status = response.status();
        let body: Value = response.json().await?;
        if !status.is_success() {
            anyhow::bail!("team creation failed with {}: {}", status, body);
        }

        let id = body["data"]["id"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("team response has no id: {}", body))?;
        Ok(Uuid::parse_str(id)?)
    }

    /// Create a fixture through the API and return the raw response
    pub async fn create_fixture(
        &self,
        token: &str,
        home_team: Uuid,
        away_team: Uuid,
    ) -> Result<reqwest::Response, anyhow::Error> {
        Ok(self
            .client
            .post(format!("{}/api/v1/fixtures", self.url()))
            .bearer_auth(token)
            .json(&json!({
                "homeTeam": home_team,
                "awayTeam": away_team,
            }))
            .send()
            .await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        // Abort the server task when the test server is dropped
        self._handle.abort();
    }
}
