use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::Error;
use crate::record::{
    Chapter, File, Folder, Message, NewChapter, NewFile, NewFolder, NewMessage, Question,
    QuestionInput,
};
use crate::server::AppState;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkQuestionsRequest {
    #[serde(default)]
    pub chapter_id: Option<i64>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

#[derive(Serialize)]
pub struct BulkQuestionsResponse {
    pub success: bool,
    pub created_count: usize,
    pub questions: Vec<Question>,
}

/// Error returned by handlers.
///
/// Client mistakes carry their message back; storage failures are logged and
/// reported with a generic message naming only the action.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(&'static str),
}

impl ApiError {
    fn from_error(action: &'static str, err: Error) -> Self {
        if err.is_client_error() {
            ApiError::BadRequest(err.to_string())
        } else {
            tracing::error!("Failed to {}: {}", action, err);
            ApiError::Internal(action)
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(action) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Failed to {}", action))
            }
        };

        (status, Json(ErrorResponse { error })).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Run a store operation off the async runtime
async fn blocking<T, F>(action: &'static str, op: F) -> ApiResult<T>
where
    F: FnOnce() -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    match tokio::task::spawn_blocking(op).await {
        Ok(Ok(value)) => Ok(Json(value)),
        Ok(Err(err)) => Err(ApiError::from_error(action, err)),
        Err(join_err) => {
            tracing::error!("Failed to {}: task aborted: {}", action, join_err);
            Err(ApiError::Internal(action))
        }
    }
}

// ========== Messages ==========

pub async fn list_messages(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Message>> {
    let store = state.stores.messages.clone();
    blocking("get messages", move || store.list()).await
}

pub async fn create_message(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewMessage>, JsonRejection>,
) -> ApiResult<Message> {
    let Json(input) = payload?;
    let store = state.stores.messages.clone();
    blocking("create message", move || store.insert(&input)).await
}

// ========== Files ==========

pub async fn list_files(State(state): State<Arc<AppState>>) -> ApiResult<Vec<File>> {
    let store = state.stores.files.clone();
    blocking("get files", move || store.list()).await
}

pub async fn create_file(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewFile>, JsonRejection>,
) -> ApiResult<File> {
    let Json(input) = payload?;
    let store = state.stores.files.clone();
    blocking("create file", move || store.insert(&input)).await
}

pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<DeleteResponse> {
    let store = state.stores.files.clone();
    blocking("delete file", move || {
        store.delete_by_id(id)?;
        Ok(DeleteResponse { success: true })
    })
    .await
}

// ========== Folders ==========

pub async fn list_folders(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Folder>> {
    let store = state.stores.folders.clone();
    blocking("get folders", move || store.list()).await
}

pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewFolder>, JsonRejection>,
) -> ApiResult<Folder> {
    let Json(input) = payload?;
    let store = state.stores.folders.clone();
    blocking("create folder", move || store.insert(&input)).await
}

pub async fn delete_folder(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<DeleteResponse> {
    let store = state.stores.folders.clone();
    blocking("delete folder", move || {
        store.delete_by_id(id)?;
        Ok(DeleteResponse { success: true })
    })
    .await
}

// ========== Chapters ==========

pub async fn list_chapters(State(state): State<Arc<AppState>>) -> ApiResult<Vec<Chapter>> {
    let store = state.stores.chapters.clone();
    blocking("get chapters", move || store.list()).await
}

pub async fn list_subject_chapters(
    State(state): State<Arc<AppState>>,
    Path(subject_id): Path<i64>,
) -> ApiResult<Vec<Chapter>> {
    let store = state.stores.chapters.clone();
    blocking("get chapters", move || store.list_by_parent(subject_id)).await
}

pub async fn create_chapter(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewChapter>, JsonRejection>,
) -> ApiResult<Chapter> {
    let Json(input) = payload?;
    let coordinator = state.coordinator.clone();
    blocking("create chapter", move || coordinator.create_chapter(&input)).await
}

pub async fn delete_chapter(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<DeleteResponse> {
    let coordinator = state.coordinator.clone();
    blocking("delete chapter", move || {
        coordinator.delete_chapter(id)?;
        Ok(DeleteResponse { success: true })
    })
    .await
}

// ========== Questions ==========

pub async fn list_chapter_questions(
    State(state): State<Arc<AppState>>,
    Path(chapter_id): Path<i64>,
) -> ApiResult<Vec<Question>> {
    let store = state.stores.questions.clone();
    blocking("get questions", move || store.list_by_parent(chapter_id)).await
}

pub async fn create_bulk_questions(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BulkQuestionsRequest>, JsonRejection>,
) -> ApiResult<BulkQuestionsResponse> {
    let Json(request) = payload?;
    let coordinator = state.coordinator.clone();
    blocking("create questions", move || {
        let questions = coordinator.bulk_insert_questions(request.chapter_id, request.questions)?;
        Ok(BulkQuestionsResponse {
            success: true,
            created_count: questions.len(),
            questions,
        })
    })
    .await
}
