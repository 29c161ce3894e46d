//! Integration tests for the TodoHub auth API.
//!
//! These run against a live PostgreSQL instance; set
//! `TODOHUB_TEST_DATABASE_URL` and run with `cargo test -- --ignored`.

mod helpers;

mod auth_flow;
mod refresh;
mod reset;
mod sessions;
