use crate::{
    data::student::{Student, StudentPayload},
    error::{MalformedBodySnafu, RosterError, RosterResult},
    state::RosterState,
};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use snafu::ResultExt;

fn parse_id(raw: &str) -> RosterResult<i64> {
    raw.parse().map_err(|_| RosterError::InvalidStudentId {
        original: raw.to_string(),
    })
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<Vec<Student>>> {
    Ok(Json(state.list().await?))
}

pub async fn post_student(
    State(state): State<RosterState>,
    body: Result<Json<StudentPayload>, JsonRejection>,
) -> RosterResult<(StatusCode, Json<Student>)> {
    let Json(payload) = body.context(MalformedBodySnafu)?;
    let student = state.create(payload).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn get_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<Json<Student>> {
    Ok(Json(state.read(parse_id(&id)?).await?))
}

pub async fn put_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
    body: Result<Json<StudentPayload>, JsonRejection>,
) -> RosterResult<Json<Student>> {
    let id = parse_id(&id)?;
    // a missing student is reported even when the body is unusable
    state.read(id).await?;
    let Json(payload) = body.context(MalformedBodySnafu)?;
    Ok(Json(state.update(id, payload).await?))
}

pub async fn delete_student(
    State(state): State<RosterState>,
    Path(id): Path<String>,
) -> RosterResult<StatusCode> {
    state.delete(parse_id(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
