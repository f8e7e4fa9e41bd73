//! Blocking HTTP transport backed by ureq.

use task_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes core requests with a shared ureq agent.
///
/// Status codes are never treated as errors here; `TaskClient` interprets
/// them. Only failures with no response become `TransportError`.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match req.method {
            HttpMethod::Get => with_headers(self.agent.get(&req.path), req).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&req.path), req).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&req.path), req), req),
            HttpMethod::Put => send(with_headers(self.agent.put(&req.path), req), req),
        };
        let mut response = result.map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    req: &HttpRequest,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match req.body.as_deref() {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
