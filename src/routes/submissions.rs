use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::db::SUBMISSION_LIST_CAP;
use crate::error::AppError;
use crate::models::{Submission, SubmissionSummary};
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

pub async fn create(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SubmissionSummary>, AppError> {
    let is_multipart = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("multipart/form-data"));
    if !is_multipart {
        return Err(AppError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let form = parser::parse_multipart(&headers, body).await?;

    let submission = pipeline::run(&state, form).await?;
    Ok(Json(SubmissionSummary::from(&submission)))
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Vec<Submission>>, AppError> {
    let submissions = state.store.list(SUBMISSION_LIST_CAP).await?;
    Ok(Json(submissions))
}

pub async fn get(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<Submission>, AppError> {
    // Ids that are not UUIDs cannot name a stored submission.
    let submission = match Uuid::parse_str(&id) {
        Ok(id) => state.store.find_by_id(id).await?,
        Err(_) => None,
    }
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;
    Ok(Json(submission))
}
