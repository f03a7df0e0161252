//! Storage layer: sqlite persistence for students and saved cards.
//!
//! `DbConnection` owns the pool and the schema; the repositories expose the
//! create/read/list operations the domain layer is written against. List
//! fields (`allergies`, `custom_fields`) and custom layouts are stored as
//! JSON text columns and parsed back into structured form on read.

pub mod cards;
pub mod db;
pub mod students;

pub use cards::CardRepository;
pub use db::DbConnection;
pub use students::StudentRepository;
