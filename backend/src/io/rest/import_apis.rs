//! # REST API for CSV Bulk Import
//!
//! One endpoint accepting a raw CSV body. The two rejection modes keep
//! distinct messages so a client can tell a bad file from bad data.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::domain::columns::ImportError;
use crate::AppState;

/// Bulk-import students from an uploaded CSV file
pub async fn import_students(State(state): State<AppState>, body: String) -> impl IntoResponse {
    info!("POST /api/students/import - {} bytes", body.len());

    match state.import_service.import_csv(&body).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => match e.downcast_ref::<ImportError>() {
            Some(import_error) => {
                error!("Import rejected: {}", import_error);
                (StatusCode::BAD_REQUEST, import_error.to_string()).into_response()
            }
            None => {
                error!("Failed to import students: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Error importing students").into_response()
            }
        },
    }
}
