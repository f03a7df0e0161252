//! # REST API for Student Records
//!
//! Endpoints for creating, listing, and looking up students.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::NewStudent;

/// Create a new student
pub async fn create_student(
    State(state): State<AppState>,
    Json(request): Json<NewStudent>,
) -> impl IntoResponse {
    info!("POST /api/students - name: {}", request.name);

    match state.student_service.create_student(request).await {
        Ok(student) => (StatusCode::CREATED, Json(student)).into_response(),
        Err(e) => {
            error!("Failed to create student: {}", e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// Get a student by unique id
pub async fn get_student(
    State(state): State<AppState>,
    axum::extract::Path(unique_id): axum::extract::Path<String>,
) -> impl IntoResponse {
    info!("GET /api/students/{}", unique_id);

    match state.student_service.get_student(&unique_id).await {
        Ok(Some(student)) => (StatusCode::OK, Json(student)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Student not found").into_response(),
        Err(e) => {
            error!("Failed to get student: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving student").into_response()
        }
    }
}

/// List all students
pub async fn list_students(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/students");

    match state.student_service.list_students().await {
        Ok(students) => (StatusCode::OK, Json(students)).into_response(),
        Err(e) => {
            error!("Failed to list students: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing students").into_response()
        }
    }
}
