//! # REST API Interface Layer
//!
//! HTTP endpoints for the student card service. This layer handles
//! request/response serialization, translation of domain errors to HTTP
//! status codes, and request logging; business rules live in the domain
//! layer.

pub mod card_apis;
pub mod import_apis;
pub mod student_apis;

pub use card_apis::{create_card, get_card, list_cards, preview_card};
pub use import_apis::import_students;
pub use student_apis::{create_student, get_student, list_students};
