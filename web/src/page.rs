//! Askama templates for the board page and its fragments.
//!
//! Every fragment is rendered from the core's view models; askama escapes
//! titles, the banner message and the draft.

use askama::Template;
use task_core::render::{
    BannerView, StatsView, TaskListView, DELETE_CONFIRMATION, NO_TASKS_MESSAGE,
};
use task_core::ui::ERROR_DISPLAY_DURATION;
use task_core::{Layout, PageView};

#[derive(Template)]
#[template(path = "page.html")]
struct PageTemplate<'a> {
    draft: &'a str,
    stats: String,
    banner: String,
    tasks: String,
    auto_hide: bool,
    auto_hide_ms: u128,
}

#[derive(Template)]
#[template(path = "stats.html")]
struct StatsTemplate<'a> {
    stats: &'a StatsView,
}

#[derive(Template)]
#[template(path = "banner.html")]
struct BannerTemplate<'a> {
    banner: &'a BannerView,
}

#[derive(Template)]
#[template(path = "tasks/cards.html")]
struct TaskCardsTemplate<'a> {
    tasks: &'a TaskListView,
    confirm: &'static str,
    no_tasks: &'static str,
}

#[derive(Template)]
#[template(path = "tasks/table.html")]
struct TaskTableTemplate<'a> {
    tasks: &'a TaskListView,
    confirm: &'static str,
    no_tasks: &'static str,
}

fn render_task_list(tasks: &TaskListView, layout: Layout) -> Result<String, askama::Error> {
    match layout {
        Layout::Cards => TaskCardsTemplate {
            tasks,
            confirm: DELETE_CONFIRMATION,
            no_tasks: NO_TASKS_MESSAGE,
        }
        .render(),
        Layout::Table => TaskTableTemplate {
            tasks,
            confirm: DELETE_CONFIRMATION,
            no_tasks: NO_TASKS_MESSAGE,
        }
        .render(),
    }
}

/// Render the whole page. `draft` is the current content of the title field.
pub fn render_page(view: &PageView, layout: Layout, draft: &str) -> Result<String, askama::Error> {
    PageTemplate {
        draft,
        stats: StatsTemplate { stats: &view.stats }.render()?,
        banner: BannerTemplate {
            banner: &view.banner,
        }
        .render()?,
        tasks: render_task_list(&view.tasks, layout)?,
        auto_hide: view.banner.error.is_some(),
        auto_hide_ms: ERROR_DISPLAY_DURATION.as_millis(),
    }
    .render()
}
