//! Page fetching with soft failure: anything that goes wrong yields `""`.

use std::{future::Future, time::Duration};

use reqwest::{Client, Url};

use crate::{Result, html::html_to_text};

/// Browser-like user agent; many brand sites reject unknown clients.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
  AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Fetches a page and returns its visible text, or `""` on any failure.
pub trait PageFetcher: Send + Sync {
  fn fetch_text<'a>(&'a self, url: &'a str) -> impl Future<Output = String> + Send + 'a;
}

/// `true` when the URL path names a PDF document.
pub fn is_pdf(url: &str) -> bool {
  let path = match Url::parse(url) {
    Ok(parsed) => parsed.path().to_ascii_lowercase(),
    Err(_) => url.to_ascii_lowercase(),
  };
  path.ends_with(".pdf")
}

#[derive(Clone)]
pub struct HttpFetcher {
  client: Client,
}

impl HttpFetcher {
  pub fn new(timeout: Duration) -> Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(USER_AGENT)
      .build()?;
    Ok(Self { client })
  }

  async fn fetch_html(&self, url: &str) -> reqwest::Result<String> {
    self
      .client
      .get(url)
      .send()
      .await?
      .error_for_status()?
      .text()
      .await
  }
}

impl PageFetcher for HttpFetcher {
  async fn fetch_text(&self, url: &str) -> String {
    if is_pdf(url) {
      tracing::debug!(url, "skipping pdf");
      return String::new();
    }

    match self.fetch_html(url).await {
      Ok(html) => html_to_text(&html),
      Err(e) => {
        tracing::warn!(url, error = %e, "page fetch failed");
        String::new()
      }
    }
  }
}
