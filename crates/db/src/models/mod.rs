//! Row models and DTOs, one module per table.

pub mod note;
pub mod user;
