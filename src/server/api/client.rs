use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::server::{
    api::envelope::decode_envelope,
    error::api::ApiError,
    model::codeforces::{Contest, Problemset, RatingChange, Submission, User},
    proxy::RequestScheduler,
};

/// Base URL of the public Codeforces API.
pub const DEFAULT_API_URL: &str = "https://codeforces.com/api";

/// Client for the Codeforces RPC-style API.
///
/// Every call goes through the shared [`RequestScheduler`], which picks the egress path
/// and enforces request spacing. The client holds no cache state and never retries;
/// retry and fallback decisions belong to the calling service.
///
/// Cloning is cheap and clones share the scheduler.
#[derive(Clone)]
pub struct CodeforcesClient {
    base_url: String,
    timeout: Duration,
    scheduler: RequestScheduler,
}

impl CodeforcesClient {
    /// Creates a new CodeforcesClient.
    ///
    /// # Arguments
    /// - `base_url` - API root, e.g. `https://codeforces.com/api`; a trailing slash is ignored
    /// - `timeout` - Hard timeout applied to every request
    /// - `scheduler` - Egress path scheduler shared with other clients
    ///
    /// # Returns
    /// - `CodeforcesClient` - New client instance
    pub fn new(base_url: impl Into<String>, timeout: Duration, scheduler: RequestScheduler) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            base_url,
            timeout,
            scheduler,
        }
    }

    pub fn scheduler(&self) -> &RequestScheduler {
        &self.scheduler
    }

    /// Calls `method` with `params` and decodes the envelope's result as `T`.
    ///
    /// # Arguments
    /// - `method` - API method name, e.g. `user.status`
    /// - `params` - Query parameters in order
    ///
    /// # Returns
    /// - `Ok(T)` - Upstream answered `OK` with a result of the expected shape
    /// - `Err(ApiError::Timeout)` - No response within the configured timeout
    /// - `Err(ApiError::Transport)` - Connection-level failure
    /// - `Err(ApiError::HttpStatus)` - Non-2xx response without an envelope
    /// - `Err(ApiError::Upstream)` - Upstream answered `FAILED`; carries its comment
    /// - `Err(ApiError::Decode)` - Malformed envelope or result
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, method);
        let timeout = self.timeout;

        self.scheduler
            .schedule(|path| async move {
                debug!("Calling {} via egress path {}", method, path);

                let response = path
                    .http()
                    .get(&url)
                    .query(params)
                    .timeout(timeout)
                    .send()
                    .await
                    .map_err(|e| transport_error(method, e))?;

                let status = response.status().as_u16();
                let body = response
                    .text()
                    .await
                    .map_err(|e| transport_error(method, e))?;

                decode_envelope(method, status, &body)
            })
            .await
    }

    /// Fetches the full problemset with solve statistics.
    pub async fn problemset_problems(&self) -> Result<Problemset, ApiError> {
        self.request("problemset.problems", &[]).await
    }

    /// Fetches the rating changes of a finished contest.
    pub async fn contest_rating_changes(
        &self,
        contest_id: i64,
    ) -> Result<Vec<RatingChange>, ApiError> {
        self.request(
            "contest.ratingChanges",
            &[("contestId", contest_id.to_string())],
        )
        .await
    }

    /// Fetches a handle's submissions, newest first.
    ///
    /// # Arguments
    /// - `handle` - Codeforces handle
    /// - `from` - 1-based index of the first submission to return
    /// - `count` - Maximum number of submissions
    pub async fn user_status(
        &self,
        handle: &str,
        from: u32,
        count: u32,
    ) -> Result<Vec<Submission>, ApiError> {
        self.request(
            "user.status",
            &[
                ("handle", handle.to_string()),
                ("from", from.to_string()),
                ("count", count.to_string()),
            ],
        )
        .await
    }

    /// Fetches the contest list, optionally the gym contests instead.
    pub async fn contest_list(&self, gym: bool) -> Result<Vec<Contest>, ApiError> {
        self.request("contest.list", &[("gym", gym.to_string())])
            .await
    }

    /// Fetches profile information for up to several handles at once.
    pub async fn user_info(&self, handles: &[String]) -> Result<Vec<User>, ApiError> {
        self.request("user.info", &[("handles", handles.join(";"))])
            .await
    }
}

/// Classifies a reqwest failure as a timeout or a generic transport error.
fn transport_error(method: &str, err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout {
            method: method.to_string(),
        }
    } else {
        ApiError::Transport {
            method: method.to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::util::clock::ManualClock;
    use axum::{extract::Query, http::StatusCode, routing::get, Router};
    use std::collections::HashMap;
    use std::sync::Arc;

    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn client(base_url: &str, timeout: Duration) -> CodeforcesClient {
        let scheduler =
            RequestScheduler::new(Vec::new(), Duration::ZERO, Arc::new(ManualClock::default()))
                .unwrap();
        CodeforcesClient::new(base_url, timeout, scheduler)
    }

    fn upstream() -> Router {
        Router::new()
            .route(
                "/api/problemset.problems",
                get(|| async {
                    r#"{"status":"OK","result":{"problems":[{"contestId":1,"index":"A","name":"Theatre Square","rating":1000,"tags":["math"]}],"problemStatistics":[]}}"#
                }),
            )
            .route(
                "/api/contest.ratingChanges",
                get(|| async {
                    r#"{"status":"FAILED","result":null,"comment":"Call limit exceeded"}"#
                }),
            )
            .route(
                "/api/user.info",
                get(|| async {
                    (
                        StatusCode::BAD_REQUEST,
                        r#"{"status":"FAILED","comment":"handles: User with handle ghost not found"}"#,
                    )
                }),
            )
            .route(
                "/api/user.status",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    format!(
                        r#"{{"status":"OK","result":[{{"id":1,"creationTimeSeconds":1700000000,"problem":{{"index":"A","name":"{}"}},"verdict":"OK"}}]}}"#,
                        params.get("handle").cloned().unwrap_or_default()
                    )
                }),
            )
            .route("/api/contest.list", get(|| async { "definitely not json" }))
            .route(
                "/api/blog.entry",
                get(|| async { (StatusCode::BAD_GATEWAY, "<html>502</html>") }),
            )
            .route(
                "/api/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    r#"{"status":"OK","result":1}"#
                }),
            )
    }

    #[tokio::test]
    async fn returns_result_on_ok() {
        let base = serve(upstream()).await;

        let problemset = client(&base, Duration::from_secs(5))
            .problemset_problems()
            .await
            .unwrap();

        assert_eq!(problemset.problems.len(), 1);
        assert_eq!(problemset.problems[0].id(), "1A");
        assert_eq!(problemset.problems[0].rating, Some(1000));
    }

    #[tokio::test]
    async fn failed_envelope_surfaces_comment_verbatim() {
        let base = serve(upstream()).await;

        let err = client(&base, Duration::from_secs(5))
            .contest_rating_changes(1)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Call limit exceeded");
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn failed_envelope_on_http_400_is_upstream_error() {
        let base = serve(upstream()).await;

        let err = client(&base, Duration::from_secs(5))
            .user_info(&["ghost".to_string()])
            .await
            .unwrap_err();

        assert_eq!(
            err.comment(),
            Some("handles: User with handle ghost not found")
        );
    }

    #[tokio::test]
    async fn sends_query_parameters() {
        let base = serve(upstream()).await;

        let submissions = client(&base, Duration::from_secs(5))
            .user_status("tourist", 1, 10)
            .await
            .unwrap();

        assert_eq!(submissions[0].problem.name, "tourist");
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let base = serve(upstream()).await;

        let err = client(&base, Duration::from_secs(5))
            .contest_list(false)
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn bad_gateway_is_http_status_error() {
        let base = serve(upstream()).await;

        let err = client(&base, Duration::from_secs(5))
            .request::<serde_json::Value>("blog.entry", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::HttpStatus { status: 502, .. }));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let base = serve(upstream()).await;

        let err = client(&base, Duration::from_millis(200))
            .request::<i32>("slow", &[])
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ApiError::Timeout {
                method: "slow".to_string()
            }
        );
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}/api", addr), Duration::from_secs(5))
            .request::<i32>("user.info", &[])
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Transport { .. }));
    }
}
