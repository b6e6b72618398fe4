//! Node REST client: bounded calls plus per-endpoint status classification.

use std::future::Future;
use std::time::Duration;

use cosign_types::DetachedCosignature;

use crate::dto::NodeInfo;
use crate::error::ApiError;
use crate::transport::{HttpResponse, HttpTransport};

/// Default bound for every network call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for one or more nodes, generic over the transport.
///
/// The client holds no node URL; every call names its target, so one client
/// serves the whole node registry.
pub struct NodeClient<T> {
    transport: T,
    timeout: Duration,
}

/// Run `fut` with an upper bound. On expiry the future is dropped, which
/// aborts the in-flight request.
pub(crate) async fn bounded<F, R>(timeout: Duration, fut: F) -> Result<R, ApiError>
where
    F: Future<Output = Result<R, ApiError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Strip trailing slashes so paths can be appended.
pub(crate) fn base_url(node_url: &str) -> Result<&str, ApiError> {
    let trimmed = node_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ApiError::MissingParameter("node_url"));
    }
    Ok(trimmed)
}

impl<T: HttpTransport> NodeClient<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// Default request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) async fn get(&self, url: &str, timeout: Duration) -> Result<HttpResponse, ApiError> {
        tracing::debug!(%url, timeout_ms = timeout.as_millis() as u64, "GET");
        bounded(timeout, self.transport.get(url, timeout)).await
    }

    /// `GET {node}/node/info`.
    pub async fn node_info(&self, node_url: &str, timeout: Duration) -> Result<NodeInfo, ApiError> {
        let url = format!("{}/node/info", base_url(node_url)?);
        let response = self.get(&url, timeout).await?;
        match response.status {
            200..=299 => NodeInfo::parse(&response.body),
            404 => Err(ApiError::NotFound),
            status => Err(ApiError::Server(status)),
        }
    }

    /// `PUT {node}/transactions/cosignature`. Only `202 Accepted` is success.
    pub async fn announce_cosignature(
        &self,
        node_url: &str,
        cosignature: &DetachedCosignature,
    ) -> Result<(), ApiError> {
        let url = format!("{}/transactions/cosignature", base_url(node_url)?);
        let body = serde_json::to_value(cosignature)
            .map_err(|e| ApiError::MalformedResponse(format!("cannot encode cosignature: {e}")))?;

        tracing::debug!(%url, parent_hash = %cosignature.parent_hash, "PUT cosignature");
        let response = bounded(
            self.timeout,
            self.transport.put_json(&url, &body, self.timeout),
        )
        .await?;

        classify_announce_status(response.status)
    }
}

pub(crate) fn classify_announce_status(status: u16) -> Result<(), ApiError> {
    match status {
        202 => Ok(()),
        400 => Err(ApiError::InvalidContent),
        409 => Err(ApiError::ValidationFailed),
        200..=299 => Err(ApiError::UnexpectedStatus(status)),
        status => Err(ApiError::Server(status)),
    }
}

pub(crate) fn classify_partial_status(status: u16) -> Result<(), ApiError> {
    match status {
        200..=299 => Ok(()),
        404 => Err(ApiError::NotFound),
        409 => Err(ApiError::InvalidParameters),
        status => Err(ApiError::Server(status)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announce_status_table() {
        assert_eq!(classify_announce_status(202), Ok(()));
        assert_eq!(classify_announce_status(400), Err(ApiError::InvalidContent));
        assert_eq!(classify_announce_status(409), Err(ApiError::ValidationFailed));
        assert_eq!(classify_announce_status(500), Err(ApiError::Server(500)));
        assert_eq!(classify_announce_status(200), Err(ApiError::UnexpectedStatus(200)));
    }

    #[test]
    fn partial_status_table() {
        assert_eq!(classify_partial_status(200), Ok(()));
        assert_eq!(classify_partial_status(404), Err(ApiError::NotFound));
        assert_eq!(classify_partial_status(409), Err(ApiError::InvalidParameters));
        assert_eq!(classify_partial_status(503), Err(ApiError::Server(503)));
    }

    #[test]
    fn base_url_strips_slashes() {
        assert_eq!(base_url("https://a.example:3001///").unwrap(), "https://a.example:3001");
        assert_eq!(base_url("  "), Err(ApiError::MissingParameter("node_url")));
    }

    #[tokio::test]
    async fn bounded_times_out() {
        let slow = async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, ApiError>(())
        };
        let result = bounded(Duration::from_millis(10), slow).await;
        assert_eq!(result, Err(ApiError::Timeout(10)));
    }
}
