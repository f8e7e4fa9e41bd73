//! Command handlers that tie the client, the renderers and `UiState` together.
//!
//! # Design
//! `TaskManager` owns the transport, the clock and the state a page is
//! rendered from: the task list and stats of the last applied refresh, plus
//! the banner. There is no cache beyond that; every successful mutation is
//! followed by a full refresh.
//!
//! Every refresh takes a `RefreshToken`. Responses are applied only if their
//! token is at least as new as the last one applied, so when a host runs
//! refreshes concurrently the last *initiated* refresh wins.

use tracing::{info, instrument, warn};

use crate::client::TaskClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::render::{self, BannerView, StatsView, TaskListView, DELETE_CONFIRMATION};
use crate::types::{CreateTask, Stats, Task};
use crate::ui::{Clock, SystemClock, UiState};

pub const EMPTY_TITLE_MESSAGE: &str = "Please enter a task title";
pub const COMPLETE_FAILED_MESSAGE: &str = "Failed to complete task";
pub const COMPLETE_UNREACHABLE_MESSAGE: &str = "Could not complete task";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete task";
pub const DELETE_UNREACHABLE_MESSAGE: &str = "Could not delete task";

/// Orders refreshes; a larger token was issued later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshToken(u64);

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub tasks: TaskListView,
    pub stats: StatsView,
    pub banner: BannerView,
}

#[derive(Debug, Default)]
struct Board {
    tasks: Vec<Task>,
    stats: Stats,
    issued: u64,
    tasks_applied: u64,
    stats_applied: u64,
}

pub struct TaskManager<T, C = SystemClock> {
    client: TaskClient,
    transport: T,
    clock: C,
    ui: UiState,
    board: Board,
}

impl<T: Transport> TaskManager<T, SystemClock> {
    pub fn new(client: TaskClient, transport: T) -> Self {
        Self::with_clock(client, transport, SystemClock)
    }
}

impl<T: Transport, C: Clock> TaskManager<T, C> {
    pub fn with_clock(client: TaskClient, transport: T, clock: C) -> Self {
        Self {
            client,
            transport,
            clock,
            ui: UiState::new(),
            board: Board::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn tasks(&self) -> &[Task] {
        &self.board.tasks
    }

    pub fn stats(&self) -> Stats {
        self.board.stats
    }

    /// Execute one request with the loading indicator raised for its whole
    /// duration.
    pub fn call(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let _loading = self.ui.loading().start();
        self.client.send(&self.transport, request)
    }

    pub fn fetch_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self.call(&self.client.build_list_tasks())?;
        self.client.parse_list_tasks(response)
    }

    pub fn fetch_stats(&self) -> Result<Stats, ApiError> {
        let response = self.call(&self.client.build_stats())?;
        self.client.parse_stats(response)
    }

    pub fn begin_refresh(&mut self) -> RefreshToken {
        self.board.issued += 1;
        RefreshToken(self.board.issued)
    }

    /// Replace the rendered task list unless a newer refresh already did.
    pub fn apply_tasks(&mut self, token: RefreshToken, tasks: Vec<Task>) -> bool {
        if token.0 < self.board.tasks_applied {
            info!(token = token.0, latest = self.board.tasks_applied, "discarding stale task list");
            return false;
        }
        self.board.tasks_applied = token.0;
        self.board.tasks = tasks;
        true
    }

    /// Replace the rendered stats unless a newer refresh already did.
    pub fn apply_stats(&mut self, token: RefreshToken, stats: Stats) -> bool {
        if token.0 < self.board.stats_applied {
            info!(token = token.0, latest = self.board.stats_applied, "discarding stale stats");
            return false;
        }
        self.board.stats_applied = token.0;
        self.board.stats = stats;
        true
    }

    /// Reload the task list and the stats. Both are attempted; the first
    /// failure is shown in the banner and returned.
    #[instrument(skip(self))]
    pub fn refresh(&mut self) -> Result<(), ApiError> {
        let token = self.begin_refresh();

        let tasks = self.fetch_tasks().map(|tasks| {
            self.apply_tasks(token, tasks);
        });
        let stats = self.fetch_stats().map(|stats| {
            self.apply_stats(token, stats);
        });

        let outcome = tasks.and(stats);
        if let Err(err) = &outcome {
            self.show_error(err.to_string());
        }
        outcome
    }

    /// Create a task from `title_field`. The field is cleared only on success.
    #[instrument(skip(self, title_field))]
    pub fn add_task(&mut self, title_field: &mut String) -> Result<Task, ApiError> {
        let title = title_field.trim();
        if title.is_empty() {
            let err = ApiError::Validation(EMPTY_TITLE_MESSAGE.to_string());
            self.show_error(err.to_string());
            return Err(err);
        }

        let input = CreateTask {
            title: title.to_string(),
        };
        let created = self
            .client
            .build_create_task(&input)
            .and_then(|request| self.call(&request))
            .and_then(|response| self.client.parse_create_task(response));

        match created {
            Ok(task) => {
                info!(id = task.id, "task created");
                title_field.clear();
                self.hide_error();
                let _ = self.refresh();
                Ok(task)
            }
            Err(err) => {
                self.show_error(err.to_string());
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub fn complete_task(&mut self, id: u64) -> Result<(), ApiError> {
        let request = self.client.build_complete_task(id);
        let completed = self
            .call(&request)
            .and_then(|response| self.client.parse_complete_task(response));

        match completed {
            Ok(_) => {
                info!(id, "task completed");
                let _ = self.refresh();
                Ok(())
            }
            Err(err) => {
                let message = if err.is_transport() {
                    COMPLETE_UNREACHABLE_MESSAGE
                } else {
                    COMPLETE_FAILED_MESSAGE
                };
                warn!(id, error = %err, "complete failed");
                self.show_error(message);
                Err(err)
            }
        }
    }

    /// Delete a task after `confirm` accepts the prompt. Returns `Ok(false)`
    /// without issuing a request when the user declines.
    #[instrument(skip(self, confirm))]
    pub fn delete_task(
        &mut self,
        id: u64,
        confirm: impl FnOnce(&str) -> bool,
    ) -> Result<bool, ApiError> {
        if !confirm(DELETE_CONFIRMATION) {
            info!(id, "delete declined");
            return Ok(false);
        }

        let request = self.client.build_delete_task(id);
        let deleted = self
            .call(&request)
            .and_then(|response| self.client.parse_delete_task(response));

        match deleted {
            Ok(()) => {
                info!(id, "task deleted");
                let _ = self.refresh();
                Ok(true)
            }
            Err(err) => {
                let message = if err.is_transport() {
                    DELETE_UNREACHABLE_MESSAGE
                } else {
                    DELETE_FAILED_MESSAGE
                };
                warn!(id, error = %err, "delete failed");
                self.show_error(message);
                Err(err)
            }
        }
    }

    pub fn show_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "showing error banner");
        self.ui.show_error(message, self.clock.now());
    }

    pub fn hide_error(&mut self) {
        self.ui.hide_error();
    }

    /// Let the banner's auto-hide deadline take effect.
    pub fn tick(&mut self) {
        self.ui.tick(self.clock.now());
    }

    pub fn view(&self) -> PageView {
        PageView {
            tasks: render::render_tasks(&self.board.tasks),
            stats: render::render_stats(&self.board.stats),
            banner: render::render_banner(&self.ui),
        }
    }
}
