pub mod broadcast_worker;
pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod email_templates;
pub mod error;
pub mod github_client;
pub mod markup;
pub mod routes;
pub mod sitemap;
pub mod startup;
pub mod subscriber_store;
pub mod telemetry;

/// Formats an error followed by every error in its `source` chain.
pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}
