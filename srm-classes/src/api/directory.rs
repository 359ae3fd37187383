//! Student and teacher registration endpoints
//!
//! Just enough directory surface to seed and tear down the records classes
//! reference.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use srm_common::db::{Student, Teacher};
use srm_common::Error;

use super::{DataResponse, MessageResponse};
use crate::db::{Directory, NewStudent, NewTeacher};
use crate::error::ApiResult;
use crate::AppState;

/// POST /student/create
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Student>>)> {
    let Json(new) = payload?;
    let student = state.directory.register_student(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_msg("Student created successfully", student)),
    ))
}

/// GET /student/:id
pub async fn get_student(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DataResponse<Student>>> {
    let Path(id) = id?;
    let student = state
        .directory
        .student_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Student not found".to_string()))?;

    Ok(Json(DataResponse::new(student)))
}

/// DELETE /student/:id
pub async fn delete_student(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.directory.delete_student(id).await?;

    Ok(Json(MessageResponse::ok("Student deleted successfully")))
}

/// POST /teacher/create
pub async fn create_teacher(
    State(state): State<AppState>,
    payload: Result<Json<NewTeacher>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<Teacher>>)> {
    let Json(new) = payload?;
    let teacher = state.directory.register_teacher(new).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_msg("Teacher created successfully", teacher)),
    ))
}

/// GET /teacher/:id
pub async fn get_teacher(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DataResponse<Teacher>>> {
    let Path(id) = id?;
    let teacher = state
        .directory
        .teacher_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Teacher not found".to_string()))?;

    Ok(Json(DataResponse::new(teacher)))
}

/// DELETE /teacher/:id
pub async fn delete_teacher(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.directory.delete_teacher(id).await?;

    Ok(Json(MessageResponse::ok("Teacher deleted successfully")))
}

/// Build directory routes
pub fn directory_routes() -> Router<AppState> {
    Router::new()
        .route("/student/create", post(create_student))
        .route("/student/:id", get(get_student).delete(delete_student))
        .route("/teacher/create", post(create_teacher))
        .route("/teacher/:id", get(get_teacher).delete(delete_teacher))
}
