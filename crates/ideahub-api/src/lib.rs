//! # ideahub-api
//!
//! HTTP API layer for IdeaHub built on Axum.
//!
//! Provides the auth and identity endpoints, the refresh-cookie plumbing,
//! the bearer-token extractor, DTOs, and error mapping.

pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
