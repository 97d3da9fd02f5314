use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};
use chrono::Utc;

use crate::{configuration::SiteSettings, sitemap};

/// Serves `sitemap.xml`, with today's date on the static pages.
#[tracing::instrument(name = "Generating the sitemap", skip(site))]
pub async fn sitemap_xml(State(site): State<SiteSettings>) -> impl IntoResponse {
    match sitemap::generate(&site.base_url, Utc::now().date_naive()) {
        Ok(xml) => (StatusCode::OK, [(header::CONTENT_TYPE, "application/xml")], xml),
        Err(e) => {
            tracing::error!(error.message = %e, "Failed to generate the sitemap");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                "Error generating sitemap".to_string(),
            )
        }
    }
}
