//! HTTP API layer.
//!
//! Handlers, middleware, and DTOs behind the reconciliation endpoints:
//! the settings blob, per-source schedule state, the active descriptor
//! listing, and the manual reconcile trigger.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
mod doc;
