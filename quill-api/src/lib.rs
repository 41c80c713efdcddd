//! # quill-api: the client-facing surface of the report pipeline
//!
//! Thin by design: submission mints an immutable [`JobDescriptor`],
//! enqueues it, and answers `202 Accepted` without ever waiting on a
//! render. Status is derived, not stored — the probe checks whether the
//! deterministic artifact key exists and reports `completed` or
//! `processing` accordingly. Download streams the stored bytes back with
//! their recorded content type.
//!
//! The requesting principal is taken from the `x-owner-id` header;
//! credential issuance lives outside this service.
//!
//! [`JobDescriptor`]: quill_core::JobDescriptor

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::ApiState;
