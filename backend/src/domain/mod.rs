//! Domain layer: the two resolvers at the core of the service (column
//! resolution for imported tables, card layout resolution) plus the
//! services that orchestrate them over storage.

pub mod card_service;
pub mod columns;
pub mod import_service;
pub mod layout;
pub mod student_service;

pub use card_service::CardService;
pub use import_service::ImportService;
pub use student_service::StudentService;
