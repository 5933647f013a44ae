//! Domain layer for the YaNote service.
//!
//! Pure logic with no I/O: error types, slug derivation, and the form
//! validation rules shared by the database and HTTP layers.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod notes;
pub mod slug;
pub mod types;
