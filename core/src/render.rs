//! Pure renderers from fetched data and `UiState` to view models.
//!
//! # Design
//! Every function here is deterministic: the same input always yields the
//! same view, and task order is the order the API returned. Views carry
//! visibility flags and per-task actions as data; the host turns them into
//! markup with an escaping template engine.
//!
//! Two markup layouts exist, card list and table; neither is canonical.

use std::str::FromStr;

use crate::types::{Stats, Task};
use crate::ui::UiState;

pub const NO_TASKS_MESSAGE: &str = "No tasks yet. Add one above!";
pub const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this task?";

/// Markup structure for the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    /// A flex list of `div.task-item` cards.
    #[default]
    Cards,
    /// Table rows with an id column.
    Table,
}

impl FromStr for Layout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cards" | "card" => Ok(Layout::Cards),
            "table" => Ok(Layout::Table),
            other => Err(format!("unknown layout `{other}` (expected `cards` or `table`)")),
        }
    }
}

/// One rendered task. `title` is raw text; escaping is the template's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub status: &'static str,
    /// Whether the "Complete" action is offered. Delete is always offered.
    pub can_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListView {
    pub list_visible: bool,
    pub placeholder_visible: bool,
    pub items: Vec<TaskItem>,
}

/// A counter display slot: element id, label and the text written into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatSlot {
    pub id: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub slots: [StatSlot; 3],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerView {
    pub loading_visible: bool,
    pub error: Option<String>,
}

pub fn render_tasks(tasks: &[Task]) -> TaskListView {
    TaskListView {
        list_visible: !tasks.is_empty(),
        placeholder_visible: tasks.is_empty(),
        items: tasks.iter().map(render_task).collect(),
    }
}

fn render_task(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id,
        title: task.title.clone(),
        completed: task.completed,
        status: if task.completed { "Completed" } else { "Pending" },
        can_complete: !task.completed,
    }
}

pub fn render_stats(stats: &Stats) -> StatsView {
    let slot = |id, label, value: u64| StatSlot {
        id,
        label,
        value: value.to_string(),
    };
    StatsView {
        slots: [
            slot("total-tasks", "Total", stats.total),
            slot("completed-tasks", "Completed", stats.completed),
            slot("pending-tasks", "Pending", stats.pending),
        ],
    }
}

pub fn render_banner(ui: &UiState) -> BannerView {
    BannerView {
        loading_visible: ui.is_loading(),
        error: ui.error_message().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    fn task(id: u64, title: &str, completed: bool) -> Task {
        Task {
            id,
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let view = render_tasks(&[]);
        assert!(!view.list_visible);
        assert!(view.placeholder_visible);
        assert!(view.items.is_empty());
    }

    #[test]
    fn non_empty_list_hides_placeholder() {
        let view = render_tasks(&[task(1, "A", false)]);
        assert!(view.list_visible);
        assert!(!view.placeholder_visible);
    }

    #[test]
    fn complete_action_only_for_pending_tasks() {
        let view = render_tasks(&[task(1, "A", false), task(2, "B", true)]);
        assert!(view.items[0].can_complete);
        assert_eq!(view.items[0].status, "Pending");
        assert!(!view.items[1].can_complete);
        assert_eq!(view.items[1].status, "Completed");
    }

    #[test]
    fn titles_are_passed_through_unmodified() {
        let hostile = r#"<script>alert("x")</script> & 'co'"#;
        let view = render_tasks(&[task(1, hostile, false)]);
        assert_eq!(view.items[0].title, hostile);
    }

    #[test]
    fn rendering_is_idempotent_and_order_preserving() {
        let tasks = vec![task(9, "zeta", false), task(1, "alpha", true)];
        let first = render_tasks(&tasks);
        assert_eq!(first, render_tasks(&tasks));
        let ids: Vec<u64> = first.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, vec![9, 1]);
    }

    #[test]
    fn stats_are_written_verbatim() {
        let view = render_stats(&Stats {
            total: 5,
            completed: 4,
            pending: 3,
        });
        let slots: Vec<(&str, &str)> = view
            .slots
            .iter()
            .map(|slot| (slot.id, slot.value.as_str()))
            .collect();
        assert_eq!(
            slots,
            vec![("total-tasks", "5"), ("completed-tasks", "4"), ("pending-tasks", "3")]
        );
    }

    #[test]
    fn banner_reflects_ui_state() {
        let mut ui = UiState::new();
        assert_eq!(
            render_banner(&ui),
            BannerView {
                loading_visible: false,
                error: None
            }
        );
        ui.show_error("db down", Instant::now());
        let _loading = ui.loading().start();
        let view = render_banner(&ui);
        assert!(view.loading_visible);
        assert_eq!(view.error.as_deref(), Some("db down"));
    }

    #[test]
    fn layout_parses_case_insensitively() {
        assert_eq!("Table".parse::<Layout>(), Ok(Layout::Table));
        assert_eq!("cards".parse::<Layout>(), Ok(Layout::Cards));
        assert!("grid".parse::<Layout>().is_err());
    }
}
