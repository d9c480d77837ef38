use tracing::warn;

use crate::server::{error::proxy::ProxyLineError, proxy::ProxyEndpoint};

/// Parses a single proxy list line.
///
/// Accepts `host:port` or `host:port:user:pass`. Surrounding whitespace is trimmed;
/// whitespace inside a field is rejected.
///
/// # Arguments
/// - `line` - One line of the proxy source, without its newline
///
/// # Returns
/// - `Ok(ProxyEndpoint)` - Line describes a valid endpoint
/// - `Err(ProxyLineError)` - Line is malformed
pub fn parse_proxy_line(line: &str) -> Result<ProxyEndpoint, ProxyLineError> {
    let fields: Vec<&str> = line.trim().split(':').collect();

    if fields.iter().any(|f| f.chars().any(char::is_whitespace)) {
        return Err(ProxyLineError::Whitespace);
    }

    let (host, port, credentials) = match fields.as_slice() {
        [host, port] => (*host, *port, None),
        [host, port, user, pass] => (*host, *port, Some((*user, *pass))),
        other => return Err(ProxyLineError::FieldCount(other.len())),
    };

    if host.is_empty() {
        return Err(ProxyLineError::EmptyHost);
    }

    let port = match port.parse::<u16>() {
        Ok(port) if port != 0 => port,
        _ => return Err(ProxyLineError::InvalidPort(port.to_string())),
    };

    let endpoint = match credentials {
        Some((user, pass)) => {
            if user.is_empty() {
                return Err(ProxyLineError::EmptyUsername);
            }
            ProxyEndpoint::with_credentials(host, port, user, pass)
        }
        None => ProxyEndpoint::new(host, port),
    };

    Ok(endpoint)
}

/// Parses a newline-delimited proxy list.
///
/// Each line is validated independently. Blank lines and `#` comments are ignored,
/// malformed lines are logged and skipped.
///
/// # Arguments
/// - `text` - Full contents of the proxy source
///
/// # Returns
/// - `Vec<ProxyEndpoint>` - Endpoints from every well-formed line, in source order
pub fn parse_proxy_list(text: &str) -> Vec<ProxyEndpoint> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .filter_map(|(number, line)| match parse_proxy_line(line) {
            Ok(endpoint) => Some(endpoint),
            Err(e) => {
                warn!("Skipping proxy list line {}: {}", number + 1, e);
                None
            }
        })
        .collect()
}
