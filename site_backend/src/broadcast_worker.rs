use std::sync::Arc;

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    configuration::SiteSettings,
    domain::SubscriberEmail,
    email_client::EmailClient,
    email_templates::{self, EmailTemplate},
    subscriber_store::SubscriberStore,
};

/// Sleeps until the next scheduled time, broadcasts, and repeats forever.
pub async fn run_worker_until_stopped(
    broadcaster: Broadcaster,
    schedule: BroadcastSchedule,
) -> Result<(), anyhow::Error> {
    worker_loop(broadcaster, schedule).await
}

async fn worker_loop(
    broadcaster: Broadcaster,
    schedule: BroadcastSchedule,
) -> Result<(), anyhow::Error> {
    let mut last_run = None;
    loop {
        let now = Utc::now();
        let next_run = schedule.next_run_following(now, last_run);
        tracing::info!(next_run = %next_run, "Waiting for the next daily broadcast.");
        tokio::time::sleep((next_run - now).to_std()?).await;

        broadcaster.run().await;
        last_run = Some(next_run);
    }
}

/// Wall-clock time of the daily broadcast, pinned to a fixed UTC offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BroadcastSchedule {
    at: NaiveTime,
    offset: FixedOffset,
}

impl BroadcastSchedule {
    pub fn new(hour: u32, minute: u32, offset: FixedOffset) -> Result<Self, String> {
        let at = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or_else(|| format!("{:02}:{:02} is not a valid time of day", hour, minute))?;
        Ok(Self { at, offset })
    }

    /// The first trigger strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.offset).naive_local();
        let mut next = local_now.date().and_time(self.at);
        if next <= local_now {
            next += Duration::days(1);
        }
        let next_utc = next - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&next_utc)
    }

    /// Like [`BroadcastSchedule::next_run_after`], but never at or before
    /// `last_run`, even when the wall clock reads earlier than it.
    pub fn next_run_following(
        &self,
        now: DateTime<Utc>,
        last_run: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let from = last_run.map_or(now, |last_run| now.max(last_run));
        self.next_run_after(from)
    }
}

/// Everything a broadcast run needs, shared with the HTTP handlers.
#[derive(Clone)]
pub struct Broadcaster {
    store: Arc<SubscriberStore>,
    email_client: Arc<EmailClient>,
    site: SiteSettings,
    max_concurrency: usize,
}

impl Broadcaster {
    pub fn new(
        store: Arc<SubscriberStore>,
        email_client: Arc<EmailClient>,
        site: SiteSettings,
        max_concurrency: usize,
    ) -> Self {
        Self {
            store,
            email_client,
            site,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Delivers the daily message to every stored subscriber.
    ///
    /// A failed delivery is logged and recorded in the report; it never stops
    /// the remaining deliveries. With `max_concurrency == 1` subscribers are
    /// served one at a time, in store order.
    #[tracing::instrument(name = "Daily broadcast", skip_all, fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self) -> BroadcastReport {
        let stored = match self.store.read_all().await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::error!(
                    error.cause_chain = ?e,
                    error.message = %e,
                    "Failed to read the subscriber store. Skipping this broadcast.",
                );
                return BroadcastReport::default();
            }
        };
        if stored.is_empty() {
            tracing::info!("No subscribed emails.");
            return BroadcastReport::default();
        }

        let template = Arc::new(email_templates::daily_broadcast(&self.site));
        let mut report = BroadcastReport::default();
        let mut deliveries = JoinSet::new();

        for (position, address) in stored.into_iter().enumerate() {
            let recipient = match SubscriberEmail::parse(address.clone()) {
                Ok(recipient) => recipient,
                Err(e) => {
                    tracing::warn!(
                        error.message = %e,
                        "Skipping a subscriber. Their stored address is invalid.",
                    );
                    report.record(position, address, DeliveryOutcome::Skipped(e));
                    continue;
                }
            };

            while deliveries.len() >= self.max_concurrency {
                if let Some(joined) = deliveries.join_next().await {
                    report.collect(joined);
                }
            }

            let email_client = self.email_client.clone();
            let template = template.clone();
            let span = tracing::info_span!("Deliver daily broadcast", subscriber_email = %recipient);
            deliveries.spawn(
                async move {
                    let outcome = deliver(&email_client, &recipient, &template).await;
                    (position, address, outcome)
                }
                .instrument(span),
            );
        }

        while let Some(joined) = deliveries.join_next().await {
            report.collect(joined);
        }
        report.finish();

        tracing::info!(
            delivered = report.delivered(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Daily broadcast finished."
        );
        report
    }
}

async fn deliver(
    email_client: &EmailClient,
    recipient: &SubscriberEmail,
    template: &EmailTemplate,
) -> DeliveryOutcome {
    match email_client.send_email(recipient, template).await {
        Ok(()) => {
            tracing::info!("Sent daily email.");
            DeliveryOutcome::Delivered
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "Failed to deliver the daily broadcast to a subscriber. Skipping.",
            );
            DeliveryOutcome::Failed(e.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(String),
    /// The stored address could not be parsed, so nothing was sent.
    Skipped(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientReport {
    pub position: usize,
    pub recipient: String,
    pub outcome: DeliveryOutcome,
}

/// Per-recipient results of one broadcast run, in store order.
#[derive(Clone, Debug, Default)]
pub struct BroadcastReport {
    pub recipients: Vec<RecipientReport>,
}

impl BroadcastReport {
    pub fn delivered(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Delivered))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, DeliveryOutcome::Skipped(_)))
    }

    fn count(&self, predicate: impl Fn(&DeliveryOutcome) -> bool) -> usize {
        self.recipients
            .iter()
            .filter(|r| predicate(&r.outcome))
            .count()
    }

    fn record(&mut self, position: usize, recipient: String, outcome: DeliveryOutcome) {
        self.recipients.push(RecipientReport {
            position,
            recipient,
            outcome,
        });
    }

    fn collect(
        &mut self,
        joined: Result<(usize, String, DeliveryOutcome), tokio::task::JoinError>,
    ) {
        match joined {
            Ok((position, recipient, outcome)) => self.record(position, recipient, outcome),
            Err(e) => tracing::error!(
                error.message = %e,
                "A delivery task ended without reporting its outcome.",
            ),
        }
    }

    fn finish(&mut self) {
        self.recipients.sort_by_key(|r| r.position);
    }
}
