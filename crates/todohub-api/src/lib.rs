//! # todohub-api
//!
//! HTTP API layer for TodoHub built on Axum.
//!
//! Provides the auth/session REST endpoints, extractors, DTOs, and error
//! mapping. Transport concerns live here only; every auth decision is made
//! in `todohub-auth` and surfaces as an `AppError` this crate translates
//! into a status code.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
