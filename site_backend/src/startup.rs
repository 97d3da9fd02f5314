use std::{net::TcpListener, sync::Arc};

use anyhow::{anyhow, Context};
use axum::{
    extract::FromRef,
    routing::{get, post, IntoMakeService},
    Router, Server,
};
use hyper::server::conn::AddrIncoming;
use tower_http::cors::CorsLayer;

use crate::{
    broadcast_worker::{BroadcastSchedule, Broadcaster},
    configuration::{Settings, SiteSettings},
    domain::SubscriberEmail,
    email_client::EmailClient,
    github_client::GithubClient,
    routes::{contact, health_check, list_repos, sitemap_xml, subscribe},
    subscriber_store::SubscriberStore,
    telemetry::RouterExt,
};

pub struct Application {
    port: u16,
    server: Server<AddrIncoming, IntoMakeService<Router>>,
    broadcaster: Broadcaster,
    schedule: BroadcastSchedule,
}

impl Application {
    /// Validates the configuration, binds the listener and wires up the
    /// shared clients. Nothing is served until [`Application::run_until_stopped`].
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let operator = configuration
            .email_client
            .operator()
            .map_err(|e| anyhow!("Invalid operator email address: {}", e))?;
        let schedule = configuration
            .broadcast
            .schedule()
            .map_err(|e| anyhow!("Invalid broadcast schedule: {}", e))?;
        let email_client = configuration
            .email_client
            .client()
            .map_err(|e| anyhow!("Invalid sender email address: {}", e))?;

        let store = Arc::new(configuration.subscribers.store());
        let email_client = Arc::new(email_client);
        let github = Arc::new(configuration.github.client());

        let broadcaster = Broadcaster::new(
            store.clone(),
            email_client.clone(),
            configuration.site.clone(),
            configuration.broadcast.max_concurrency,
        );

        let app_state = AppState {
            store,
            email_client,
            github,
            site: configuration.site,
            operator: OperatorEmail(operator),
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)
            .with_context(|| format!("Failed to bind {}", address))?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}:{}", configuration.application.host, port);

        let server = run(listener, app_state)?;

        Ok(Self {
            port,
            server,
            broadcaster,
            schedule,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Handle on the daily broadcast, sharing the store and mail client
    /// with the HTTP handlers.
    pub fn broadcaster(&self) -> Broadcaster {
        self.broadcaster.clone()
    }

    pub fn schedule(&self) -> BroadcastSchedule {
        self.schedule
    }

    pub async fn run_until_stopped(self) -> Result<(), hyper::Error> {
        self.server.await
    }
}

fn run(
    listener: TcpListener,
    app_state: AppState,
) -> Result<Server<AddrIncoming, IntoMakeService<Router>>, hyper::Error> {
    // Create a router that will contain and match all routes for the application
    let app = Router::new()
        .route("/health_check", get(health_check))
        .route("/api/contact", post(contact))
        .route("/api/subscribe", post(subscribe))
        .route("/api/repos", get(list_repos))
        .route("/sitemap.xml", get(sitemap_xml))
        .layer(CorsLayer::permissive())
        .add_axum_tracing_layer()
        .with_state(app_state);

    Ok(Server::from_tcp(listener)?.serve(app.into_make_service()))
}

/// Address that receives contact-form notifications.
#[derive(Clone, Debug)]
pub struct OperatorEmail(pub SubscriberEmail);

#[derive(Clone)]
pub struct AppState {
    store: Arc<SubscriberStore>,
    email_client: Arc<EmailClient>,
    github: Arc<GithubClient>,
    site: SiteSettings,
    operator: OperatorEmail,
}

impl FromRef<AppState> for Arc<SubscriberStore> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.store.clone()
    }
}

impl FromRef<AppState> for Arc<EmailClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.email_client.clone()
    }
}

impl FromRef<AppState> for Arc<GithubClient> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.github.clone()
    }
}

impl FromRef<AppState> for SiteSettings {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.site.clone()
    }
}

impl FromRef<AppState> for OperatorEmail {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.operator.clone()
    }
}
