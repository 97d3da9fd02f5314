use std::path::PathBuf;

use once_cell::sync::Lazy;
use site_backend::{
    broadcast_worker::Broadcaster,
    configuration::{get_configuration, Settings},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use tempfile::TempDir;
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber("site_backend=debug,info".into(), std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber("site_backend=debug,info".into(), std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub github_server: MockServer,
    pub store_path: PathBuf,
    pub operator_email: String,
    pub broadcaster: Broadcaster,
    // Keeps the store directory alive for the duration of the test.
    _store_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Like [`spawn_app`], letting the test adjust the configuration first.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    // Set up subscriber for logging, only first time per run. Other times use existing subscriber.
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;
    let github_server = MockServer::start().await;
    let store_dir = tempfile::tempdir().expect("Failed to create a store directory");
    let store_path = store_dir.path().join("subscribedEmails.json");

    let configuration = {
        // Get the configuration from file
        let mut c = get_configuration().expect("Failed to read configuration");
        // Use a random OS port
        c.application.port = 0;
        c.email_client.base_url = email_server.uri();
        c.github.base_url = github_server.uri();
        // Every test gets its own store
        c.subscribers.path = store_path.clone();
        customise(&mut c);
        c
    };
    let operator_email = configuration.email_client.operator_email.clone();

    // Start the server
    let app = Application::build(configuration)
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());
    let broadcaster = app.broadcaster();
    tokio::spawn(app.run_until_stopped());

    TestApp {
        address,
        email_server,
        github_server,
        store_path,
        operator_email,
        broadcaster,
        _store_dir: store_dir,
    }
}

impl TestApp {
    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/contact", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe(&self, body: &serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/subscribe", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscribe_raw(&self, body: &'static str) -> reqwest::Response {
        reqwest::Client::new()
            .post(&format!("{}/api/subscribe", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::Client::new()
            .get(&format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Stored addresses, or `None` while the store file does not exist.
    pub fn stored_subscribers(&self) -> Option<Vec<String>> {
        let raw = std::fs::read(&self.store_path).ok()?;
        Some(serde_json::from_slice(&raw).expect("The store file is not a JSON list"))
    }

    pub fn seed_subscribers(&self, subscribers: &[&str]) {
        let raw = serde_json::to_vec(subscribers).unwrap();
        std::fs::write(&self.store_path, raw).expect("Failed to seed the store");
    }

    /// Bodies of every request the mail API has received so far.
    pub async fn sent_emails(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| serde_json::from_slice(&r.body).unwrap())
            .collect()
    }
}
