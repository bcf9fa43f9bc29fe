use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;

use sidestage_api::auth::{mint_token_with, Claims};

/// Secrets the spawned server runs with; tests mint tokens against the
/// same values.
pub const TEST_JWT_SECRET: &str = "integration-test-session-secret";
pub const TEST_STORAGE_SECRET: &str = "integration-test-storage-secret";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub base_url: String,
    _child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary; cargo builds it before running
        // integration tests. Assumes the debug profile.
        let mut cmd = Command::new("target/debug/sidestage-api");
        cmd.env("SIDESTAGE_PORT", port.to_string())
            .env("SIDESTAGE_BIND", "127.0.0.1")
            .env("AUTH_JWT_SECRET", TEST_JWT_SECRET)
            .env("STORAGE_SIGNING_SECRET", TEST_STORAGE_SECRET)
            .env("STORAGE_URL", "http://storage.invalid/storage/v1")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited when the environment provides one;
        // database-backed suites skip themselves when it is absent.
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            base_url,
            _child: child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        let url = format!("{}/health", self.base_url);

        while Instant::now() < deadline {
            if let Ok(resp) = client.get(&url).send().await {
                // 503 still means the router is up; only the DB is absent
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server =
        SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Bearer token for an arbitrary test user, signed with the server's secret.
pub fn test_token(email: &str) -> String {
    test_token_for(uuid::Uuid::new_v4(), email)
}

/// Same, for a caller-chosen user id (upload keys embed it).
pub fn test_token_for(user_id: uuid::Uuid, email: &str) -> String {
    let claims = Claims::new(user_id, email, 3600);
    mint_token_with(TEST_JWT_SECRET, &claims).expect("failed to mint test token")
}

/// Token signed with a different secret; the server must reject it.
pub fn foreign_token() -> String {
    let claims = Claims::new(uuid::Uuid::new_v4(), "intruder@example.com", 3600);
    mint_token_with("some-other-secret", &claims).expect("failed to mint test token")
}

/// Database-backed suites run only when explicitly enabled, so the rest of
/// the tests stay runnable without a provisioned schema.
pub fn db_tests_enabled() -> bool {
    std::env::var("SIDESTAGE_TEST_DB").is_ok() && std::env::var("DATABASE_URL").is_ok()
}
