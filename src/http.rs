use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING};
use reqwest::Client;

const APP_USER_AGENT: &str = "NetheriteLauncher/0.1.0";

/// Shared HTTP client for metadata and artifact fetches.
///
/// Content-encoding is forced to identity so response bytes digest to the
/// checksums declared by the remote metadata.
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));

    Client::builder()
        .user_agent(APP_USER_AGENT)
        .default_headers(default_headers)
        .timeout(Duration::from_secs(30))
        .build()
}
