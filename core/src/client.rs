//! Stateless HTTP request builder and response parser for the task API.
//!
//! # Design
//! `TaskClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! `send` is the single place a `Transport` is invoked, so transport failures
//! are normalized into `ApiError::Transport` in one spot.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{CreateTask, ErrorBody, Stats, Task};

/// Message used when a failed response carries no `error` field.
pub const GENERIC_REQUEST_ERROR: &str = "Request failed";

const JSON_CONTENT_TYPE: (&str, &str) = ("content-type", "application/json");

/// Synchronous, stateless client for the task API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Build a request for `endpoint` with the default JSON content type.
    /// Caller `headers` are merged over the default.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        body: Option<String>,
        headers: &[(&str, &str)],
    ) -> HttpRequest {
        let mut request = HttpRequest {
            method,
            path: format!("{}{endpoint}", self.base_url),
            headers: vec![(JSON_CONTENT_TYPE.0.to_string(), JSON_CONTENT_TYPE.1.to_string())],
            body,
        };
        for (name, value) in headers {
            request.set_header(name, value);
        }
        request
    }

    pub fn build_list_tasks(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/tasks", None, &[])
    }

    pub fn build_stats(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/tasks/stats", None, &[])
    }

    pub fn build_create_task(&self, input: &CreateTask) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.request(HttpMethod::Post, "/tasks", Some(body), &[]))
    }

    pub fn build_complete_task(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Put, &format!("/tasks/{id}/complete"), None, &[])
    }

    pub fn build_delete_task(&self, id: u64) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/tasks/{id}"), None, &[])
    }

    /// Execute `request`, mapping a missing response to `ApiError::Transport`.
    /// Non-2xx responses are returned as data for the `parse_*` methods.
    pub fn send<T: Transport + ?Sized>(
        &self,
        transport: &T,
        request: &HttpRequest,
    ) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        match transport.execute(request) {
            Ok(response) => {
                debug!(status = response.status, path = %request.path, "received response");
                Ok(response)
            }
            Err(err) => {
                warn!(path = %request.path, error = %err, "transport failure");
                Err(ApiError::Transport(err.0))
            }
        }
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<Task>, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<Stats, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    pub fn parse_complete_task(&self, response: HttpResponse) -> Result<Task, ApiError> {
        check_status(&response)?;
        parse_json(&response)
    }

    /// Any 2xx is success; the body (JSON or empty) is ignored.
    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// Map a non-2xx status to `ApiError::Request`, preferring the server's
/// `error` field over the generic message.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<ErrorBody>(&response.body)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| GENERIC_REQUEST_ERROR.to_string());
    Err(ApiError::Request {
        status: response.status,
        message,
    })
}

fn parse_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
