use crate::error::DownloaderError;
use log::{debug, warn};

/// Thin HTTP GET wrapper shared by the scan and download phases.
///
/// Redirects are followed with reqwest's default policy. There is no retry
/// and no caching; a failed request is reported to the caller, which decides
/// whether it is fatal.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// `insecure` turns off TLS certificate verification. Some archive
    /// mirrors serve self-signed or mismatched certificates; enabling this
    /// means responses can be forged by anyone on the network path.
    pub fn new(insecure: bool) -> Result<Self, DownloaderError> {
        if insecure {
            warn!("TLS certificate verification is disabled");
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(DownloaderError::ClientError)?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloaderError> {
        debug!("GET {}", url);
        let network_error = |e| DownloaderError::NetworkError {
            url: url.to_string(),
            source: e,
        };

        let resp = self.client.get(url).send().await.map_err(network_error)?;

        if !resp.status().is_success() {
            return Err(DownloaderError::HttpStatusError {
                url: url.to_string(),
                status: resp.status(),
            });
        }

        let body = resp.bytes().await.map_err(network_error)?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
