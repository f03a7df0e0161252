//! # Student Card Backend
//!
//! Non-UI logic for the student ID card generator: records entered through
//! a form or imported in bulk from CSV become stored students, and students
//! plus a card template (built-in or custom) become saved cards a renderer
//! can draw.
//!
//! The backend follows a layered architecture:
//! ```text
//! UI / rendering collaborators (external)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (resolvers, services)
//!     ↓
//! Storage Layer (sqlite persistence)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use anyhow::Result;
use log::info;
use tower_http::cors::{Any, CorsLayer};

use crate::domain::{CardService, ImportService, StudentService};
use crate::storage::{CardRepository, DbConnection, StudentRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub student_service: StudentService,
    pub import_service: ImportService,
    pub card_service: CardService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend(database_url: &str) -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::new(database_url).await?;

    info!("Setting up domain services");
    let students = StudentRepository::new(db.clone());
    let cards = CardRepository::new(db);

    Ok(AppState {
        student_service: StudentService::new(students.clone()),
        import_service: ImportService::new(students.clone()),
        card_service: CardService::new(cards, students),
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow a browser frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/students", get(io::rest::list_students).post(io::rest::create_student))
        .route("/students/import", post(io::rest::import_students))
        .route("/students/:unique_id", get(io::rest::get_student))
        .route("/saved-cards", get(io::rest::list_cards).post(io::rest::create_card))
        .route("/saved-cards/:unique_id", get(io::rest::get_card))
        .route("/saved-cards/:unique_id/preview", get(io::rest::preview_card));

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
