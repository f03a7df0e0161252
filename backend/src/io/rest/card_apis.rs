//! # REST API for Saved Cards
//!
//! Endpoints for creating, listing, and looking up generated cards, plus
//! the preview endpoint that resolves a card's layout into renderable
//! values.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use log::{error, info};

use crate::AppState;
use shared::CreateCardRequest;

/// Create a saved card
pub async fn create_card(
    State(state): State<AppState>,
    Json(request): Json<CreateCardRequest>,
) -> impl IntoResponse {
    info!("POST /api/saved-cards - template: {}", request.template);

    match state.card_service.create_card(request).await {
        Ok(card) => (StatusCode::CREATED, Json(card)).into_response(),
        Err(e) => {
            error!("Failed to create card: {}", e);
            let status = if e.to_string().contains("not found") {
                StatusCode::NOT_FOUND
            } else {
                StatusCode::BAD_REQUEST
            };
            (status, e.to_string()).into_response()
        }
    }
}

/// Get a saved card by unique id
pub async fn get_card(
    State(state): State<AppState>,
    axum::extract::Path(unique_id): axum::extract::Path<String>,
) -> impl IntoResponse {
    info!("GET /api/saved-cards/{}", unique_id);

    match state.card_service.get_card(&unique_id).await {
        Ok(Some(card)) => (StatusCode::OK, Json(card)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Saved card not found").into_response(),
        Err(e) => {
            error!("Failed to get card: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error retrieving card").into_response()
        }
    }
}

/// List all saved cards with their students populated
pub async fn list_cards(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/saved-cards");

    match state.card_service.list_cards().await {
        Ok(cards) => (StatusCode::OK, Json(cards)).into_response(),
        Err(e) => {
            error!("Failed to list cards: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error listing cards").into_response()
        }
    }
}

/// Resolve a card's layout into the values a renderer draws
pub async fn preview_card(
    State(state): State<AppState>,
    axum::extract::Path(unique_id): axum::extract::Path<String>,
) -> impl IntoResponse {
    info!("GET /api/saved-cards/{}/preview", unique_id);

    match state.card_service.preview_card(&unique_id).await {
        Ok(Some(preview)) => (StatusCode::OK, Json(preview)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Saved card not found").into_response(),
        Err(e) => {
            error!("Failed to preview card: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error resolving card").into_response()
        }
    }
}
