use reqwest::blocking::Client;
use url::Url;

use crate::errors::{StripError, StripResult};

/// HTTP client capability: one GET, returning the body bytes of a 2xx
/// response. Used for primary feed fetches and per-item comic page fetches.
#[cfg_attr(test, mockall::automock)]
pub trait Fetcher: Send + Sync {
    fn get(&self, url: &str, headers: &[(String, String)]) -> StripResult<Vec<u8>>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(30)
    }
}

impl Fetcher for HttpFetcher {
    fn get(&self, url: &str, headers: &[(String, String)]) -> StripResult<Vec<u8>> {
        Url::parse(url).map_err(|e| StripError::InvalidUrl(format!("{}: {}", url, e)))?;

        let mut request = self.client.get(url);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send()?;
        if !response.status().is_success() {
            return Err(StripError::UpstreamFetch(format!(
                "{} returned {}",
                url,
                response.status()
            )));
        }

        Ok(response.bytes()?.to_vec())
    }
}
