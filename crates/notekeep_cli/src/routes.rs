//! Axum route handlers for the notes HTTP API.
//!
//! Store calls do blocking file I/O, so every handler runs its store
//! operation on the blocking pool.

use crate::error::ApiError;
use axum::extract::{Form, FromRequest, Multipart, Path, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, Json};
use axum::routing::{get, post};
use axum::Router;
use log::debug;
use notekeep_core::{JsonFileNoteRepository, Note, NoteStore, NoteStoreResult};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const UPLOAD_FORM: &str = include_str!("../static/upload_form.html");

pub type FileNoteStore = NoteStore<JsonFileNoteRepository>;

pub struct AppState {
    pub store: FileNoteStore,
    pub api_doc: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct WriteNoteForm {
    pub note_name: String,
    #[serde(default)]
    pub note: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/docs", get(docs))
        .route("/notes", get(list_notes))
        .route(
            "/notes/:name",
            get(get_note).put(update_note).delete(delete_note),
        )
        .route("/write", post(write_note))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

async fn with_store<T, F>(state: &Arc<AppState>, op: F) -> Result<T, ApiError>
where
    F: FnOnce(&FileNoteStore) -> NoteStoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    let result = tokio::task::spawn_blocking(move || op(&state.store))
        .await
        .map_err(|err| ApiError::Task(err.to_string()))?;
    result.map_err(ApiError::from)
}

// GET /
async fn index() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

// GET /docs
async fn docs(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(state.api_doc.clone())
}

// GET /notes
async fn list_notes(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Note>>, ApiError> {
    let notes = with_store(&state, |store| Ok(store.get_all())).await?;
    Ok(Json(notes))
}

// GET /notes/:name
async fn get_note(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Note>, ApiError> {
    let note = with_store(&state, move |store| store.get_by_name(&name)).await?;
    Ok(Json(note))
}

// PUT /notes/:name
async fn update_note(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    debug!("event=http_update module=cli name={:?}", name);
    with_store(&state, move |store| store.update(&name, req.content)).await?;
    Ok((StatusCode::OK, "Note updated"))
}

// DELETE /notes/:name
async fn delete_note(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<(StatusCode, &'static str), ApiError> {
    debug!("event=http_delete module=cli name={:?}", name);
    with_store(&state, move |store| store.delete(&name)).await?;
    Ok((StatusCode::OK, "Note deleted"))
}

// POST /write
async fn write_note(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Result<(StatusCode, &'static str), ApiError> {
    let form = read_write_form(request).await?;
    debug!("event=http_write module=cli name={:?}", form.note_name);
    with_store(&state, move |store| store.create(form.note_name, form.note)).await?;
    Ok((StatusCode::CREATED, "Note saved"))
}

/// Reads `/write` fields from a multipart or urlencoded body.
async fn read_write_form(request: Request) -> Result<WriteNoteForm, ApiError> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        let Form(form) = Form::<WriteNoteForm>::from_request(request, &())
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.status(), rejection.body_text()))?;
        return Ok(form);
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|rejection| ApiError::BadRequest(rejection.status(), rejection.body_text()))?;

    let mut note_name = None;
    let mut note = String::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::BadRequest(err.status(), err.body_text()))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("note_name") => {
                note_name = Some(
                    field
                        .text()
                        .await
                        .map_err(|err| ApiError::BadRequest(err.status(), err.body_text()))?,
                );
            }
            Some("note") => {
                note = field
                    .text()
                    .await
                    .map_err(|err| ApiError::BadRequest(err.status(), err.body_text()))?;
            }
            _ => {}
        }
    }

    let note_name = note_name.ok_or_else(|| {
        ApiError::BadRequest(
            StatusCode::BAD_REQUEST,
            "missing field `note_name`".to_string(),
        )
    })?;
    Ok(WriteNoteForm { note_name, note })
}
