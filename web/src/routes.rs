//! Axum routes that drive one board per browser session.
//!
//! Every command runs on tokio's blocking pool because `Transport` is
//! synchronous. Each session sits behind its own mutex, so one browser's
//! commands are applied one at a time in arrival order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use task_core::{Layout, TaskClient, TaskManager, Transport};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::page::render_page;

/// Name of the cookie that identifies a browser session.
pub const SESSION_COOKIE: &str = "task_board_session";

/// The board state behind one browser: the manager, which owns the banner,
/// plus the current content of the title field. Tasks and stats come from
/// the shared API; the banner and the draft are private to the session.
pub struct Session<T> {
    pub manager: TaskManager<T>,
    pub draft: String,
}

type SharedSession<T> = Arc<Mutex<Session<T>>>;

pub struct AppState<T> {
    client: TaskClient,
    transport: T,
    layout: Layout,
    sessions: Arc<Mutex<HashMap<String, SharedSession<T>>>>,
}

impl<T: Clone> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: self.transport.clone(),
            layout: self.layout,
            sessions: Arc::clone(&self.sessions),
        }
    }
}

impl<T: Transport + Clone + Send + 'static> AppState<T> {
    pub fn new(client: TaskClient, transport: T, layout: Layout) -> Self {
        Self {
            client,
            transport,
            layout,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Look up the session named by the cookie, or start a new one and add
    /// its cookie to the jar.
    fn session(&self, jar: CookieJar) -> (CookieJar, SharedSession<T>) {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        let existing = jar
            .get(SESSION_COOKIE)
            .and_then(|cookie| sessions.get(cookie.value()).cloned());
        if let Some(session) = existing {
            return (jar, session);
        }

        let id = Uuid::new_v4().to_string();
        tracing::debug!(session = %id, "starting session");
        let session = Arc::new(Mutex::new(Session {
            manager: TaskManager::new(self.client.clone(), self.transport.clone()),
            draft: String::new(),
        }));
        sessions.insert(id.clone(), Arc::clone(&session));

        let cookie = Cookie::build((SESSION_COOKIE, id))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .build();
        (jar.add(cookie), session)
    }
}

/// Run `f` against one session on the blocking pool.
async fn with_session<T, R, F>(session: SharedSession<T>, f: F) -> Result<R, WebError>
where
    T: Send + 'static,
    F: FnOnce(&mut Session<T>) -> R + Send + 'static,
    R: Send + 'static,
{
    let result = tokio::task::spawn_blocking(move || {
        let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut session)
    })
    .await?;
    Ok(result)
}

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// A command panicked or was cancelled on the blocking pool.
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("template rendering failed")]
    Template(#[from] askama::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("<h1>Internal Server Error</h1><p>An unexpected error occurred. Please try again.</p>"),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteTaskForm {
    #[serde(default)]
    pub confirmed: String,
}

pub fn app<T: Transport + Clone + Send + Sync + 'static>(state: AppState<T>) -> Router {
    Router::new()
        .route("/", get(index::<T>))
        .route("/health", get(health))
        .route("/tasks", post(add_task::<T>))
        .route("/tasks/{id}/complete", post(complete_task::<T>))
        .route("/tasks/{id}/delete", post(delete_task::<T>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tracing::instrument]
async fn health() -> &'static str {
    "OK"
}

/// Load tasks and stats, then render the page.
#[tracing::instrument(skip(state, jar))]
async fn index<T: Transport + Clone + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), WebError> {
    let (jar, session) = state.session(jar);
    let (view, draft) = with_session(session, |session| {
        session.manager.tick();
        let _ = session.manager.refresh();
        (session.manager.view(), session.draft.clone())
    })
    .await?;
    let html = render_page(&view, state.layout, &draft)?;
    Ok((jar, Html(html)))
}

#[tracing::instrument(skip(state, jar))]
async fn add_task<T: Transport + Clone + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
    Form(form): Form<AddTaskForm>,
) -> Result<(CookieJar, Redirect), WebError> {
    let (jar, session) = state.session(jar);
    with_session(session, move |session| {
        session.draft = form.title;
        let Session { manager, draft } = session;
        let _ = manager.add_task(draft);
    })
    .await?;
    Ok((jar, Redirect::to("/")))
}

#[tracing::instrument(skip(state, jar))]
async fn complete_task<T: Transport + Clone + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
    Path(id): Path<u64>,
) -> Result<(CookieJar, Redirect), WebError> {
    let (jar, session) = state.session(jar);
    with_session(session, move |session| {
        let _ = session.manager.complete_task(id);
    })
    .await?;
    Ok((jar, Redirect::to("/")))
}

#[tracing::instrument(skip(state, jar))]
async fn delete_task<T: Transport + Clone + Send + Sync + 'static>(
    State(state): State<AppState<T>>,
    jar: CookieJar,
    Path(id): Path<u64>,
    Form(form): Form<DeleteTaskForm>,
) -> Result<(CookieJar, Redirect), WebError> {
    let confirmed = form.confirmed == "true";
    let (jar, session) = state.session(jar);
    with_session(session, move |session| {
        let _ = session.manager.delete_task(id, |_| confirmed);
    })
    .await?;
    Ok((jar, Redirect::to("/")))
}
