use std::time::Duration;

use url::Url;

use crate::AcquireError;

/// Readable content pulled out of one web page.
#[derive(Debug, Clone, Default)]
pub struct WebPage {
    /// Heading and paragraph text in document order, one block per line pair.
    pub text: String,
    /// Absolute image URLs, deduplicated, in document order.
    pub images: Vec<String>,
}

/// Client tuned for fetching pages rather than APIs.
#[must_use]
pub fn default_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(15))
        .timeout(Duration::from_secs(30))
        .user_agent(concat!("topical/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .unwrap_or_default()
}

/// Fetch a page and pull out its heading/paragraph text and image URLs.
///
/// Failures (bad URL, network error, non-2xx status) come back as a
/// `[Error fetching ...]` sentinel in `text` with no images, never as an
/// `Err`.
pub async fn fetch_website(client: &reqwest::Client, url: &str) -> WebPage {
    match fetch_inner(client, url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(url, error = %e, "website fetch failed");
            WebPage {
                text: format!("[Error fetching {url}]: {e}"),
                images: Vec::new(),
            }
        }
    }
}

async fn fetch_inner(client: &reqwest::Client, url: &str) -> Result<WebPage, AcquireError> {
    let base = Url::parse(url)?;

    let response = client.get(base.clone()).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(AcquireError::Status(status.as_u16()));
    }

    let html = response.text().await?;

    // HTML parsing is CPU-bound, keep it off the async workers.
    tokio::task::spawn_blocking(move || parse_page(&html, &base))
        .await
        .map_err(|e| AcquireError::Task(e.to_string()))?
}

fn parse_page(html: &str, base: &Url) -> Result<WebPage, AcquireError> {
    let soup = scrape_core::Soup::parse(html);

    let blocks = soup
        .find_all("h1, h2, h3, h4, h5, h6, p")
        .map_err(|e| AcquireError::Selector(e.to_string()))?;

    let mut parts = Vec::new();
    for tag in blocks {
        let text = tag.text();
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_owned());
        }
    }

    let imgs = soup
        .find_all("img")
        .map_err(|e| AcquireError::Selector(e.to_string()))?;

    let mut images = Vec::new();
    for tag in imgs {
        let Some(src) = tag.get("src") else { continue };
        let src = src.trim();
        if src.is_empty() || src.starts_with("data:") {
            continue;
        }
        let Ok(resolved) = base.join(src) else {
            continue;
        };
        let resolved = resolved.to_string();
        if !images.contains(&resolved) {
            images.push(resolved);
        }
    }

    Ok(WebPage {
        text: parts.join("\n\n"),
        images,
    })
}
