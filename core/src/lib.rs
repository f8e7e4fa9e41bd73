//! Client core for the task board.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for the task
//! REST API, renders tasks, stats and the status banner to view models, and runs
//! the add / complete / delete commands. Network I/O goes through a
//! host-supplied `Transport`, so the whole crate is deterministic under test.
//!
//! # Design
//! - `TaskClient` is stateless; it holds only `base_url`. Each operation is
//!   split into `build_*` and `parse_*`.
//! - `TaskManager` owns the per-page state (`UiState`, last fetched tasks and
//!   stats) and re-fetches everything after every successful mutation.
//! - Rendering is a pure function of that state.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod app;
pub mod client;
pub mod error;
pub mod http;
pub mod render;
pub mod types;
pub mod ui;

pub use app::{PageView, RefreshToken, TaskManager};
pub use client::TaskClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
pub use render::Layout;
pub use types::{CreateTask, ErrorBody, Stats, Task};
pub use ui::{Clock, LoadingIndicator, ManualClock, SystemClock, UiState};
