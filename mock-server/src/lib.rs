use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    pub completed: u64,
    pub pending: u64,
}

#[derive(Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

/// Tasks keyed by id, so listing is always in creation order.
#[derive(Debug)]
pub struct Store {
    tasks: BTreeMap<u64, Task>,
    next_id: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 1,
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

fn error(status: StatusCode, message: &str) -> (StatusCode, Json<ErrorBody>) {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
}

fn not_found() -> (StatusCode, Json<ErrorBody>) {
    error(StatusCode::NOT_FOUND, "Task not found")
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/stats", get(get_stats))
        .route("/tasks/{id}/complete", put(complete_task))
        .route("/tasks/{id}", delete(delete_task))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_tasks(State(db): State<Db>) -> Json<Vec<Task>> {
    let store = db.read().await;
    Json(store.tasks.values().cloned().collect())
}

async fn get_stats(State(db): State<Db>) -> Json<Stats> {
    let store = db.read().await;
    let total = store.tasks.len() as u64;
    let completed = store.tasks.values().filter(|t| t.completed).count() as u64;
    Json(Stats {
        total,
        completed,
        pending: total - completed,
    })
}

async fn create_task(
    State(db): State<Db>,
    Json(input): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let title = input.title.as_deref().map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "Title is required"));
    }

    let mut store = db.write().await;
    let task = Task {
        id: store.next_id,
        title: title.to_string(),
        completed: false,
    };
    store.next_id += 1;
    store.tasks.insert(task.id, task.clone());
    tracing::debug!(id = task.id, "created task");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn complete_task(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Task>> {
    let mut store = db.write().await;
    let task = store.tasks.get_mut(&id).ok_or_else(not_found)?;
    task.completed = true;
    Ok(Json(task.clone()))
}

async fn delete_task(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<MessageBody>> {
    let mut store = db.write().await;
    store.tasks.remove(&id).ok_or_else(not_found)?;
    Ok(Json(MessageBody {
        message: "Task deleted".to_string(),
    }))
}
