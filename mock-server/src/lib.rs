use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TodoPage {
    pub items: Vec<Todo>,
    pub total: usize,
}

#[derive(Deserialize)]
pub struct CreateTodo {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

/// Full replace: both fields are required.
#[derive(Deserialize)]
pub struct UpdateTodo {
    pub title: String,
    pub completed: bool,
}

/// Todos in creation order plus the next id to hand out.
#[derive(Debug)]
pub struct Store {
    next_id: u64,
    todos: Vec<Todo>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            todos: Vec::new(),
        }
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, Json<Value>)>;

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": message })))
}

fn not_found() -> (StatusCode, Json<Value>) {
    detail(StatusCode::NOT_FOUND, "Todo not found")
}

fn validate_title(title: &str) -> ApiResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(detail(StatusCode::UNPROCESSABLE_ENTITY, "Title must not be empty"));
    }
    Ok(title.to_string())
}

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", patch(toggle_todo))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Newest first.
async fn list_todos(State(db): State<Db>) -> Json<TodoPage> {
    let store = db.read().await;
    let items: Vec<Todo> = store.todos.iter().rev().cloned().collect();
    Json(TodoPage {
        total: items.len(),
        items,
    })
}

async fn create_todo(
    State(db): State<Db>,
    Json(input): Json<CreateTodo>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let title = validate_title(&input.title)?;
    let mut store = db.write().await;
    let todo = Todo {
        id: store.next_id,
        title,
        completed: input.completed,
    };
    store.next_id += 1;
    store.todos.push(todo.clone());
    log::debug!("created todo {}", todo.id);
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn update_todo(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateTodo>,
) -> ApiResult<Json<Todo>> {
    let title = validate_title(&input.title)?;
    let mut store = db.write().await;
    let todo = store.todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
    todo.title = title;
    todo.completed = input.completed;
    Ok(Json(todo.clone()))
}

async fn toggle_todo(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<Json<Todo>> {
    let mut store = db.write().await;
    let todo = store.todos.iter_mut().find(|t| t.id == id).ok_or_else(not_found)?;
    todo.completed = !todo.completed;
    Ok(Json(todo.clone()))
}

async fn delete_todo(State(db): State<Db>, Path(id): Path<u64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    let index = store.todos.iter().position(|t| t.id == id).ok_or_else(not_found)?;
    store.todos.remove(index);
    log::debug!("deleted todo {id}");
    Ok(StatusCode::NO_CONTENT)
}
