//! HTTP request handlers for API endpoints.
//!
//! This module contains all request handlers organized by resource type.

pub mod actions;
pub mod health;
pub mod schedules;
pub mod settings;
pub mod sources;
