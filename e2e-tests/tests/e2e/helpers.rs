use spam_rs::api::ApiServer;
use spam_rs::config::{Config, StorageBackend};
use spam_rs::service::AnalysisService;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::sleep;

/// Environment variable pointing at an already running server
pub const EXTERNAL_URL_ENV: &str = "SPAM_RS_URL";

/// Test environment configuration
pub struct TestEnv {
    pub base_url: String,
}

impl TestEnv {
    /// Use `SPAM_RS_URL` when set, otherwise start an in-process server
    /// backed by in-memory SQLite on an ephemeral port.
    pub async fn start() -> Result<Self, String> {
        if let Ok(url) = std::env::var(EXTERNAL_URL_ENV) {
            println!("🔗 Using external server at {}", url);
            let env = Self { base_url: url };
            env.wait_for_service(30).await?;
            return Ok(env);
        }

        let mut config = Config::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.database_url = "sqlite::memory:".to_string();

        let service = AnalysisService::from_config(&config)
            .await
            .map_err(|e| format!("Failed to build service: {}", e))?;

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind: {}", e))?;
        let addr = listener
            .local_addr()
            .map_err(|e| format!("No local address: {}", e))?;

        let server = ApiServer::new(service, addr.to_string());
        tokio::spawn(async move {
            if let Err(e) = server.serve(listener).await {
                eprintln!("API server stopped: {}", e);
            }
        });

        let env = Self {
            base_url: format!("http://{}", addr),
        };
        env.wait_for_service(10).await?;
        println!("✅ spam-rs is ready at {}", env.base_url);
        Ok(env)
    }

    /// Wait for /health to answer
    pub async fn wait_for_service(&self, timeout_secs: u64) -> Result<(), String> {
        let client = reqwest::Client::new();
        let url = format!("{}/health", self.base_url);
        let start = std::time::Instant::now();

        loop {
            if start.elapsed().as_secs() > timeout_secs {
                return Err(format!("Timeout waiting for service: {}", url));
            }

            match client.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                _ => sleep(Duration::from_millis(200)).await,
            }
        }
    }
}

/// Test result helper
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub duration: Duration,
}

impl TestResult {
    pub fn success(name: String, duration: Duration) -> Self {
        Self {
            name,
            passed: true,
            message: "✅ Test passed".to_string(),
            duration,
        }
    }

    pub fn failure(name: String, message: String, duration: Duration) -> Self {
        Self {
            name,
            passed: false,
            message: format!("❌ Test failed: {}", message),
            duration,
        }
    }

    pub fn print(&self) {
        println!("\n{}", "=".repeat(80));
        println!("📝 Test: {}", self.name);
        println!("⏱️  Duration: {:?}", self.duration);
        println!("{}", self.message);
        println!("{}", "=".repeat(80));
    }
}

/// Unique user id so runs against a shared server don't collide
pub fn generate_test_user() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("e2e_{}", timestamp)
}
