//! Shared request-handling utilities.

pub mod validate;

pub use validate::{ValidatedJson, ValidatedQuery};
