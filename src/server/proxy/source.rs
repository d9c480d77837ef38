//! Loading the proxy list at startup.

use tracing::{info, warn};

use crate::server::{proxy::ProxyEndpoint, util::parse::parse_proxy_list};

/// Fetches and parses the proxy list from `url`.
///
/// The list is fetched once. A failed request, a non-2xx status, or an unreadable body
/// is logged and yields an empty list, which makes the scheduler fall back to the direct
/// path.
///
/// # Arguments
/// - `http` - Client used for the fetch (normally the direct client)
/// - `url` - Location of the newline-delimited proxy list
///
/// # Returns
/// - `Vec<ProxyEndpoint>` - Endpoints from every well-formed line, possibly empty
pub async fn load_proxy_list(http: &reqwest::Client, url: &str) -> Vec<ProxyEndpoint> {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Failed to fetch proxy list, using direct connection: {}", e);
            return Vec::new();
        }
    };

    if !response.status().is_success() {
        warn!(
            "Proxy list request returned HTTP {}, using direct connection",
            response.status()
        );
        return Vec::new();
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Failed to read proxy list, using direct connection: {}", e);
            return Vec::new();
        }
    };

    let endpoints = parse_proxy_list(&body);
    info!("Loaded {} proxies", endpoints.len());

    endpoints
}
