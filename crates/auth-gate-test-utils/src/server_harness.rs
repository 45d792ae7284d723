//! Test server harness for E2E testing
//!
//! Provides `TestAuthGateServer` for spawning real Auth Gate instances in tests.

use auth_gate::config::Config;
use auth_gate::routes::{self, AppState};
use common::secret::EnvSource;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning Auth Gate in E2E tests.
///
/// The same variable map configures the service and backs the secret
/// source, so tests never touch the process environment.
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_health_flow_e2e() -> Result<()> {
///     let server = TestAuthGateServer::spawn(secret_env()).await?;
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthGateServer {
    addr: SocketAddr,
    config: Config,
    _handle: JoinHandle<()>,
}

impl TestAuthGateServer {
    /// Spawn a new test server on a random local port.
    ///
    /// # Arguments
    /// * `vars` - Configuration and secret variables
    ///
    /// # Returns
    /// * `Ok(TestAuthGateServer)` - Running server instance
    /// * `Err(anyhow::Error)` - If configuration or bind fails
    pub async fn spawn(vars: HashMap<String, String>) -> Result<Self, anyhow::Error> {
        let mut config_vars = vars.clone();
        config_vars.insert("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string());

        let config = Config::from_vars(&config_vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        Self::spawn_with_env(config, Arc::new(vars)).await
    }

    /// Spawn with an explicit config and secret source.
    pub async fn spawn_with_env(
        config: Config,
        env: Arc<dyn EnvSource>,
    ) -> Result<Self, anyhow::Error> {
        let state = Arc::new(AppState::new(config.clone(), env));
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            _handle: handle,
        })
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Drop for TestAuthGateServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
