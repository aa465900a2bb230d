//! Shared domain types, errors, and validation rules.

pub mod error;
pub mod todo;
pub mod types;
