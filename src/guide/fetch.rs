//! MEDIA-select guide download

use reqwest::header::ACCEPT;
use std::time::Duration;
use url::Url;

use super::error::{GuideError, GuideResult};
use super::netrc::Netrc;
use crate::config::GuideConfig;
use crate::models::GuideRecord;
use crate::utils::format_bytes;

/// The guide API pretty-prints when asked through the media type
const GUIDE_ACCEPT: &str = "application/json;indent=4";

/// HTTP client for the weekly guide endpoint
#[derive(Debug, Clone)]
pub struct GuideClient {
    client: reqwest::Client,
    url: Url,
    username: Option<String>,
    password: Option<String>,
}

impl GuideClient {
    /// Create a client from the guide configuration
    pub fn new(config: &GuideConfig) -> GuideResult<Self> {
        let url = Url::parse(&config.url).map_err(|e| GuideError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(format!("freebox-select/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;

        let (username, password) = match (&config.username, &config.netrc_file) {
            (Some(username), _) => (Some(username.clone()), config.password.clone()),
            (None, Some(netrc_file)) => {
                let host = url.host_str().unwrap_or_default();
                match Netrc::from_file(netrc_file)?.credentials(host) {
                    Some(creds) => {
                        tracing::debug!(
                            host,
                            netrc = %netrc_file.display(),
                            "Using credentials from netrc"
                        );
                        (Some(creds.login), creds.password)
                    }
                    None => (None, None),
                }
            }
            (None, None) => (None, None),
        };

        Ok(Self {
            client,
            url,
            username,
            password,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Download the guide as a list of records
    pub async fn fetch(&self) -> GuideResult<Vec<GuideRecord>> {
        let mut request = self.client.get(self.url.clone()).header(ACCEPT, GUIDE_ACCEPT);
        if let Some(ref username) = self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        tracing::debug!(url = %self.url, "Fetching guide");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Guide server refused the request");
            return Err(GuideError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let records: Vec<GuideRecord> =
            serde_json::from_slice(&body).map_err(|e| GuideError::InvalidResponse {
                reason: e.to_string(),
            })?;

        tracing::info!(
            records = records.len(),
            size = %format_bytes(body.len() as u64),
            "Guide downloaded"
        );

        Ok(records)
    }
}
