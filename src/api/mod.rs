//! Client for the gitagu backend.
//!
//! Two endpoints are used:
//!
//! | Method | Path                          | Body                    | Response                    |
//! |--------|-------------------------------|-------------------------|-----------------------------|
//! | POST   | `/api/breakdown-tasks`        | `BreakdownRequest`      | `BreakdownResponse`         |
//! | POST   | `/api/create-devin-session`   | `CreateSessionRequest`  | `CreatedSession`            |
//!
//! `BackendClient` is the seam the board talks to; `HttpBackend` is the
//! `reqwest` implementation.

pub mod client;
pub mod models;

pub use client::{BackendClient, HttpBackend, error_message};
pub use models::{BreakdownRequest, BreakdownResponse, CreateSessionRequest, CreatedSession};
