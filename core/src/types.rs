//! Domain DTOs for the task API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! The client holds only the copy fetched for the current render cycle; the
//! API owns every task. Integration tests catch any schema drift between the
//! two crates.

use serde::{Deserialize, Serialize};

/// A single task returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

/// Aggregate counts computed by the server.
///
/// `total == completed + pending` is expected but never checked here.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

/// Request payload for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    pub title: String,
}

/// Failure payload sent by the server alongside a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
