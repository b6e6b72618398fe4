//! Nullable HTTP transport: scripted responses, recorded requests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cosign_client::{ApiError, HttpResponse, HttpTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

/// A request the transport received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    url_fragment: String,
    outcome: Result<HttpResponse, ApiError>,
    delay: Option<Duration>,
}

#[derive(Debug, Default)]
struct Inner {
    routes: Vec<Route>,
    calls: Vec<RecordedCall>,
}

/// A test transport that answers from a route table instead of the network.
///
/// Routes match on method plus a URL substring; the most recently added
/// matching route wins. Unmatched requests fail as
/// [`ApiError::Network`]. Clones share state, so a test can keep a handle
/// after moving the transport into a client.
#[derive(Debug, Clone, Default)]
pub struct NullTransport {
    inner: Arc<Mutex<Inner>>,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn route(&self, method: Method, url_fragment: &str, outcome: Result<HttpResponse, ApiError>, delay: Option<Duration>) {
        self.inner.lock().unwrap().routes.push(Route {
            method,
            url_fragment: url_fragment.to_string(),
            outcome,
            delay,
        });
    }

    /// Answer GETs whose URL contains `url_fragment`.
    pub fn on_get(&self, url_fragment: &str, status: u16, body: impl Into<String>) {
        self.route(Method::Get, url_fragment, Ok(HttpResponse::new(status, body)), None);
    }

    /// Answer PUTs whose URL contains `url_fragment`.
    pub fn on_put(&self, url_fragment: &str, status: u16, body: impl Into<String>) {
        self.route(Method::Put, url_fragment, Ok(HttpResponse::new(status, body)), None);
    }

    /// Fail matching requests at the transport level.
    pub fn fail(&self, method: Method, url_fragment: &str, error: ApiError) {
        self.route(method, url_fragment, Err(error), None);
    }

    /// Answer matching GETs only after `delay`.
    pub fn on_get_delayed(&self, url_fragment: &str, delay: Duration, status: u16, body: impl Into<String>) {
        self.route(Method::Get, url_fragment, Ok(HttpResponse::new(status, body)), Some(delay));
    }

    /// Answer matching PUTs only after `delay`.
    pub fn on_put_delayed(&self, url_fragment: &str, delay: Duration, status: u16, body: impl Into<String>) {
        self.route(Method::Put, url_fragment, Ok(HttpResponse::new(status, body)), Some(delay));
    }

    /// All requests received so far (for assertions).
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.lock().unwrap().calls.len()
    }

    pub fn calls_to(&self, method: Method) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.method == method).collect()
    }

    /// Record the call and pick the route, releasing the lock before any delay.
    fn dispatch(&self, method: Method, url: &str, body: Option<serde_json::Value>) -> Option<Route> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(RecordedCall {
            method,
            url: url.to_string(),
            body,
        });
        inner
            .routes
            .iter()
            .rev()
            .find(|r| r.method == method && url.contains(&r.url_fragment))
            .cloned()
    }

    async fn respond(&self, method: Method, url: &str, body: Option<serde_json::Value>) -> Result<HttpResponse, ApiError> {
        let route = self
            .dispatch(method, url, body)
            .ok_or_else(|| ApiError::Network(format!("no route for {url}")))?;
        if let Some(delay) = route.delay {
            tokio::time::sleep(delay).await;
        }
        route.outcome
    }
}

impl HttpTransport for NullTransport {
    async fn get(&self, url: &str, _timeout: Duration) -> Result<HttpResponse, ApiError> {
        self.respond(Method::Get, url, None).await
    }

    async fn put_json(
        &self,
        url: &str,
        body: &serde_json::Value,
        _timeout: Duration,
    ) -> Result<HttpResponse, ApiError> {
        self.respond(Method::Put, url, Some(body.clone())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn routes_and_records() {
        let transport = NullTransport::new();
        transport.on_get("/node/info", 200, "{}");
        transport.on_get("/node/info", 503, "");

        let response = transport
            .get("https://a.example:3001/node/info", Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(response.status, 503);

        let missing = transport
            .get("https://a.example:3001/other", Duration::from_secs(1))
            .await;
        assert!(matches!(missing, Err(ApiError::Network(_))));
        assert_eq!(transport.call_count(), 2);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let transport = NullTransport::new();
        let handle = transport.clone();
        transport.on_put("/cosignature", 202, "");
        transport
            .put_json("https://a/transactions/cosignature", &serde_json::json!({}), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(handle.calls_to(Method::Put).len(), 1);
    }
}
