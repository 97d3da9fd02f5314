//! Sitemap generation.
//!
//! Produces the `sitemap.xml` document for the public site from the
//! compiled-in page and post lists.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2025-01-01</lastmod>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use std::fmt::Write;

use chrono::NaiveDate;

use crate::markup::escape;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Static pages, with their crawl priority. Their `lastmod` is the day the
/// sitemap is generated.
pub const PAGES: [StaticPage; 7] = [
    StaticPage::new("/", "1.0"),
    StaticPage::new("/about", "0.9"),
    StaticPage::new("/services", "0.9"),
    StaticPage::new("/articles", "0.8"),
    StaticPage::new("/contact", "0.8"),
    StaticPage::new("/privacy-policy", "0.6"),
    StaticPage::new("/terms", "0.6"),
];

/// Blog posts, published under `/blog/<slug>`.
pub const POSTS: [BlogPost; 3] = [
    BlogPost::new("mern-stack-development", "2025-09-25"),
    BlogPost::new("web-hosting-guide", "2025-09-25"),
    BlogPost::new("future-of-ai", "2025-09-25"),
];

const POST_PRIORITY: &str = "0.7";

pub struct StaticPage {
    pub path: &'static str,
    pub priority: &'static str,
}

impl StaticPage {
    const fn new(path: &'static str, priority: &'static str) -> Self {
        Self { path, priority }
    }
}

pub struct BlogPost {
    pub slug: &'static str,
    pub updated: &'static str,
}

impl BlogPost {
    const fn new(slug: &'static str, updated: &'static str) -> Self {
        Self { slug, updated }
    }
}

/// Builds the sitemap for the site hosted at `base_url`.
pub fn generate(base_url: &str, today: NaiveDate) -> Result<String, std::fmt::Error> {
    let base_url = base_url.trim_end_matches('/');
    let today = today.format("%Y-%m-%d").to_string();

    let mut xml = String::with_capacity(2048);
    writeln!(xml, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(xml, r#"<urlset xmlns="{SITEMAP_NS}">"#)?;

    for page in &PAGES {
        let loc = format!("{}{}", base_url, page.path);
        write_url(&mut xml, &loc, &today, page.priority)?;
    }
    for post in &POSTS {
        let loc = format!("{}/blog/{}", base_url, post.slug);
        write_url(&mut xml, &loc, post.updated, POST_PRIORITY)?;
    }

    write!(xml, "</urlset>")?;
    Ok(xml)
}

fn write_url(xml: &mut String, loc: &str, lastmod: &str, priority: &str) -> std::fmt::Result {
    writeln!(xml, "  <url>")?;
    writeln!(xml, "    <loc>{}</loc>", escape(loc))?;
    writeln!(xml, "    <lastmod>{}</lastmod>", lastmod)?;
    writeln!(xml, "    <priority>{}</priority>", priority)?;
    writeln!(xml, "  </url>")
}
