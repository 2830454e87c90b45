// API client module: contains a small blocking HTTP client that performs
// the one upload request this tool exists for. The whole flow is
// synchronous — read the file, POST the bytes, return the raw body.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_DISPOSITION};
use reqwest::Url;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

/// The upstream API documents no timeout; 30 seconds is what its own
/// reference clients pass.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Filename reported in Content-Disposition when the input path has no
/// usable basename.
const FALLBACK_FILENAME: &str = "file.mp3";

/// Upload client holding a reqwest blocking client, the endpoint URL and
/// the license token for the Authorization header.
pub struct ApiClient {
    client: Client,
    endpoint_url: Url,
    token: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient {
            client,
            endpoint_url: config.endpoint_url.clone(),
            token: config.auth_token.clone(),
        })
    }

    /// The two headers the upload endpoint expects: a Content-Disposition
    /// naming the upload and an Authorization line carrying the license.
    fn upload_headers(&self, filename: &str) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_str(&content_disposition(filename))
                .context("Filename is not valid in a Content-Disposition header")?,
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("license {}", self.token))
                .context("License token is not valid in an Authorization header")?,
        );
        Ok(headers)
    }

    /// POST the file bytes to the endpoint and return the raw response
    /// body. The body is opaque to this tool: a non-2xx status is logged
    /// but its body is still handed back verbatim for the caller to print.
    pub fn upload(&self, body: Vec<u8>, filename: &str) -> Result<String> {
        let headers = self.upload_headers(filename)?;
        tracing::info!("uploading {} bytes to {}", body.len(), self.endpoint_url);

        let res = self
            .client
            .post(self.endpoint_url.clone())
            .headers(headers)
            .body(body)
            .send()
            .context("Failed to send upload request")?;

        let status = res.status();
        if !status.is_success() {
            tracing::warn!("upload endpoint answered {status}");
        }
        res.text().context("Failed to read upload response body")
    }
}

/// Read the whole input file into one buffer. The upload is a single
/// non-chunked POST, so the file must fit in memory.
pub fn read_file_bytes(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("Unable to open file {}", path.display()))
}

/// Basename of the input path, reported to the server in the
/// Content-Disposition header.
pub fn upload_filename(path: &Path) -> &str {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(FALLBACK_FILENAME)
}

fn content_disposition(filename: &str) -> String {
    format!("attachment; filename={filename}")
}
