use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub pinned: bool,
}

#[derive(Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub pinned: bool,
}

/// Filters accepted by `GET /notes`.
#[derive(Debug, Default, Deserialize)]
pub struct NoteFilter {
    pub id: Option<Uuid>,
    pub offset: Option<usize>,
    pub length: Option<usize>,
}

/// Everything `/echo` saw of a request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

pub type Db = Arc<RwLock<Vec<Note>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/notes", get(list_notes).post(create_note))
        .route("/notes/{id}", get(get_note).delete(delete_note))
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/malformed", get(malformed))
        .route("/delay/{ms}", get(delay))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_notes(State(db): State<Db>, Query(filter): Query<NoteFilter>) -> Json<Vec<Note>> {
    let notes = db.read().await;
    let matching = notes
        .iter()
        .filter(|note| filter.id.map_or(true, |id| note.id == id))
        .skip(filter.offset.unwrap_or(0))
        .take(filter.length.unwrap_or(usize::MAX))
        .cloned()
        .collect();
    Json(matching)
}

async fn create_note(State(db): State<Db>, Json(input): Json<CreateNote>) -> (StatusCode, Json<Note>) {
    let note = Note {
        id: Uuid::new_v4(),
        title: input.title,
        pinned: input.pinned,
    };
    db.write().await.push(note.clone());
    (StatusCode::CREATED, Json(note))
}

async fn get_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Note>, (StatusCode, Json<ErrorBody>)> {
    let notes = db.read().await;
    notes
        .iter()
        .find(|note| note.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found(id))
}

async fn delete_note(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let mut notes = db.write().await;
    let before = notes.len();
    notes.retain(|note| note.id != id);
    if notes.len() == before {
        return Err(not_found(id));
    }
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: Uuid) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            message: format!("note {id} not found"),
        }),
    )
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<ErrorBody>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (
        status,
        Json(ErrorBody {
            message: format!("requested status {}", status.as_u16()),
        }),
    )
}

async fn malformed() -> &'static str {
    "{\"title\": unterminated"
}

async fn delay(Path(ms): Path<u64>) -> Json<ErrorBody> {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(ErrorBody {
        message: format!("waited {ms}ms"),
    })
}
