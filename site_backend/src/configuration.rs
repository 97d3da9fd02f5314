use std::path::PathBuf;

use chrono::FixedOffset;
use secrecy::Secret;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

use crate::{
    broadcast_worker::BroadcastSchedule, domain::SubscriberEmail, email_client::EmailClient,
    github_client::GithubClient, subscriber_store::SubscriberStore,
};

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    // Grab the execution directory
    let base_path = std::env::current_dir().expect("Failed to determine the current directory");
    let configuration_directory = base_path.join("configuration");

    // Detect the running environment
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .expect("Failed to parse APP_ENVIRONMENT");

    let environment_filename = format!("{}.yml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // e.g. `APP_GITHUB__TOKEN=...` sets `Settings.github.token`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings = settings.try_deserialize::<Settings>();
    tracing::debug!("Settings values: {:?}", &settings);

    settings
}

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_client: EmailClientSettings,
    pub github: GithubSettings,
    pub subscribers: SubscriberStoreSettings,
    pub broadcast: BroadcastSettings,
    pub site: SiteSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmailClientSettings {
    pub base_url: String,
    pub sender_email: String,
    pub username: String,
    pub password: Secret<String>,
    /// Inbox that receives contact-form submissions.
    pub operator_email: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl EmailClientSettings {
    pub fn client(self) -> Result<EmailClient, String> {
        let sender_email = self.sender()?;
        let timeout = self.timeout();
        Ok(EmailClient::new(
            self.base_url,
            sender_email,
            self.username,
            self.password,
            timeout,
        ))
    }

    pub fn sender(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.sender_email.clone())
    }

    pub fn operator(&self) -> Result<SubscriberEmail, String> {
        SubscriberEmail::parse(self.operator_email.clone())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_milliseconds)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GithubSettings {
    pub base_url: String,
    pub token: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_milliseconds: u64,
}

impl GithubSettings {
    pub fn client(self) -> GithubClient {
        let timeout = std::time::Duration::from_millis(self.timeout_milliseconds);
        GithubClient::new(self.base_url, self.token, timeout)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SubscriberStoreSettings {
    pub path: PathBuf,
}

impl SubscriberStoreSettings {
    pub fn store(&self) -> SubscriberStore {
        SubscriberStore::new(self.path.clone())
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct BroadcastSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub hour: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub minute: u32,
    /// The broadcast fires in this fixed offset from UTC, never in the host's local zone.
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub utc_offset_hours: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_concurrency: usize,
}

impl BroadcastSettings {
    pub fn schedule(&self) -> Result<BroadcastSchedule, String> {
        let offset = FixedOffset::east_opt(self.utc_offset_hours * 60 * 60).ok_or_else(|| {
            format!(
                "{} is not a valid UTC offset in hours",
                self.utc_offset_hours
            )
        })?;
        BroadcastSchedule::new(self.hour, self.minute, offset)
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SiteSettings {
    pub name: String,
    pub base_url: String,
}

/// The possible runtime environments for this application.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either 'local' or 'production'",
                other
            )),
        }
    }
}
