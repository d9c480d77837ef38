use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::server::error::api::ApiError;

/// Raw upstream response wrapper.
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    comment: Option<String>,
}

/// Decodes an upstream response body into the caller's result type.
///
/// A `FAILED` envelope becomes `ApiError::Upstream` even on a 4xx response, because the
/// upstream reports bad arguments (e.g. unknown handles) with HTTP 400 and a comment.
/// A non-2xx response without a recognizable envelope is `ApiError::HttpStatus`.
///
/// # Arguments
/// - `method` - API method the body belongs to, for error context
/// - `http_status` - HTTP status code of the response
/// - `body` - Raw response body
///
/// # Returns
/// - `Ok(T)` - `status` was `OK` and `result` decoded as `T`
/// - `Err(ApiError::Upstream)` - `status` was `FAILED`; carries `comment` verbatim
/// - `Err(ApiError::HttpStatus)` - Non-2xx status and no envelope
/// - `Err(ApiError::Decode)` - Malformed envelope or unexpected `result` shape
pub fn decode_envelope<T: DeserializeOwned>(
    method: &str,
    http_status: u16,
    body: &str,
) -> Result<T, ApiError> {
    let success = (200..300).contains(&http_status);

    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !success => {
            return Err(ApiError::HttpStatus {
                method: method.to_string(),
                status: http_status,
            })
        }
        Err(e) => {
            return Err(ApiError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })
        }
    };

    match envelope.status.as_str() {
        "OK" if success => {
            let result = envelope.result.unwrap_or(Value::Null);
            serde_json::from_value(result).map_err(|e| ApiError::Decode {
                method: method.to_string(),
                message: e.to_string(),
            })
        }
        "OK" => Err(ApiError::HttpStatus {
            method: method.to_string(),
            status: http_status,
        }),
        "FAILED" => Err(ApiError::Upstream {
            method: method.to_string(),
            comment: envelope.comment.unwrap_or_default(),
        }),
        other => Err(ApiError::Decode {
            method: method.to_string(),
            message: format!("unknown envelope status '{}'", other),
        }),
    }
}
