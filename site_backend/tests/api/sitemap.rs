use quick_xml::{events::Event, Reader};

use crate::helpers::spawn_app;

/// Reads the whole document, panicking on the first XML error, and
/// returns the number of `url` elements directly under `urlset`.
fn count_urls_in_urlset(xml: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut urls = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(element)) => {
                let name = element.name().as_ref().to_vec();
                if name == b"url" && open.len() == 1 && open[0] == b"urlset" {
                    urls += 1;
                }
                open.push(name);
            }
            Ok(Event::End(element)) => {
                assert_eq!(open.pop().as_deref(), Some(element.name().as_ref()));
            }
            Ok(Event::Eof) => break,
            Err(e) => panic!(
                "Sitemap is not well-formed at byte {}: {}",
                reader.buffer_position(),
                e
            ),
            Ok(_) => {}
        }
    }
    assert!(open.is_empty(), "Unclosed elements: {:?}", open);
    urls
}

#[tokio::test]
async fn sitemap_is_well_formed_xml() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let xml = app.get("/sitemap.xml").await.text().await.unwrap();

    // Assert
    assert_eq!(count_urls_in_urlset(&xml), 10);
}

#[tokio::test]
async fn sitemap_is_served_as_xml() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.get("/sitemap.xml").await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("application/xml")
    );
}

#[tokio::test]
async fn sitemap_lists_every_page_and_post() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let xml = app.get("/sitemap.xml").await.text().await.unwrap();

    // Assert
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    assert!(xml.trim_end().ends_with("</urlset>"));
    assert_eq!(xml.matches("<url>").count(), 10);
    assert!(xml.contains("<loc>https://codearntech.cloud/</loc>"));
    assert!(xml.contains("<loc>https://codearntech.cloud/blog/web-hosting-guide</loc>"));
}

#[tokio::test]
async fn sitemap_uses_the_configured_site_url() {
    // Arrange
    let app = crate::helpers::spawn_app_with(|c| {
        c.site.base_url = "https://staging.example.com/".into();
    })
    .await;

    // Act
    let xml = app.get("/sitemap.xml").await.text().await.unwrap();

    // Assert
    assert!(xml.contains("<loc>https://staging.example.com/about</loc>"));
    assert!(!xml.contains("codearntech.cloud"));
}
