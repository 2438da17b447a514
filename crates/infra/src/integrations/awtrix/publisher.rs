//! Awtrix HTTP implementation of the `DisplayHandler` port.

use async_trait::async_trait;
use busylight_core::DisplayHandler;
use busylight_domain::{BusylightError, DisplayConfig, DisplayState, Result};
use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;

use super::payload::{render, AwtrixPayload};
use crate::http::HttpClient;

/// Pushes rendered display states to an Awtrix clock as a custom app.
pub struct AwtrixPublisher {
    client: HttpClient,
    url: Url,
    config: DisplayConfig,
}

impl AwtrixPublisher {
    /// # Errors
    /// `BusylightError::Config` when the endpoint is missing or not a URL.
    pub fn new(config: DisplayConfig) -> Result<Self> {
        let url = custom_app_url(config.require_endpoint()?, &config.app_name)?;
        let client = HttpClient::builder().timeout(config.timeout()).build()?;

        Ok(Self { client, url, config })
    }

    pub fn with_client(mut self, client: HttpClient) -> Self {
        self.client = client;
        self
    }

    /// Target of every publish, `{endpoint}/api/custom?name={app_name}`.
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn render(&self, state: &DisplayState) -> AwtrixPayload {
        render(state, &self.config)
    }
}

#[async_trait]
impl DisplayHandler for AwtrixPublisher {
    #[instrument(skip_all, fields(phase = %state.phase()))]
    async fn handle(&self, state: DisplayState) -> Result<()> {
        let payload = self.render(&state);
        debug!(text = %payload.text, color = %payload.color, "publishing display state");

        let request = self.client.request(Method::POST, self.url.clone()).json(&payload);
        self.client
            .send_checked(request)
            .await
            .map_err(|e| BusylightError::Display(format!("publish to {}: {e}", self.url)))?;

        Ok(())
    }
}

fn custom_app_url(endpoint: &str, app_name: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint)
        .map_err(|e| BusylightError::Config(format!("invalid display endpoint '{endpoint}': {e}")))?;

    if url.cannot_be_a_base() {
        return Err(BusylightError::Config(format!("invalid display endpoint '{endpoint}'")));
    }

    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{base_path}/api/custom"));
    url.query_pairs_mut().clear().append_pair("name", app_name.trim());

    Ok(url)
}
