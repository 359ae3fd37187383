//! Class composition endpoints
//!
//! Thin adapters: parse, call the composer, wrap the result in the response
//! envelope. Status codes come from [`ApiError`].

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use srm_common::db::Student;
use srm_common::Error;

use super::{DataResponse, MessageResponse};
use crate::error::ApiResult;
use crate::models::{ClassFilters, ClassListItem, ClassView, SubjectAssignmentView};
use crate::request::{CreateClassRequest, UpdateClassRequest};
use crate::AppState;

/// POST /class/create
pub async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<CreateClassRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<DataResponse<ClassView>>)> {
    let Json(request) = payload?;
    let view = state.composer.create_class(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::with_msg("Class created successfully", view)),
    ))
}

/// GET /class/all?standard=&section=&academicYear=
pub async fn list_classes(
    State(state): State<AppState>,
    filters: Result<Query<ClassFilters>, QueryRejection>,
) -> ApiResult<Json<DataResponse<Vec<ClassListItem>>>> {
    let Query(filters) = filters?;
    let classes = state.composer.list_classes(&filters.normalized()).await?;

    Ok(Json(DataResponse::counted(classes)))
}

/// GET /class/:id
pub async fn get_class(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DataResponse<ClassView>>> {
    let Path(id) = id?;
    let view = state
        .composer
        .get_class_by_id(id)
        .await?
        .ok_or_else(|| Error::NotFound("Class not found".to_string()))?;

    Ok(Json(DataResponse::new(view)))
}

/// PUT /class/:id
pub async fn update_class(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateClassRequest>, JsonRejection>,
) -> ApiResult<Json<DataResponse<ClassView>>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    let view = state.composer.update_class(id, request).await?;

    Ok(Json(DataResponse::with_msg("Class updated successfully", view)))
}

/// DELETE /class/:id
pub async fn delete_class(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let Path(id) = id?;
    state.composer.delete_class(id).await?;

    Ok(Json(MessageResponse::ok("Class deleted successfully")))
}

/// GET /class/:id/subjects
pub async fn get_class_subjects(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DataResponse<Vec<SubjectAssignmentView>>>> {
    let Path(id) = id?;
    let subjects = state.composer.get_class_subjects(id).await?;

    Ok(Json(DataResponse::new(subjects)))
}

/// GET /class/:id/students
pub async fn get_class_students(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<DataResponse<Vec<Student>>>> {
    let Path(id) = id?;
    let students = state.composer.get_class_students(id).await?;

    Ok(Json(DataResponse::counted(students)))
}

/// Build class routes
pub fn class_routes() -> Router<AppState> {
    Router::new()
        .route("/class/create", post(create_class))
        .route("/class/all", get(list_classes))
        .route(
            "/class/:id",
            get(get_class).put(update_class).delete(delete_class),
        )
        .route("/class/:id/subjects", get(get_class_subjects))
        .route("/class/:id/students", get(get_class_students))
}
