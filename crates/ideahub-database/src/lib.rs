//! # ideahub-database
//!
//! Account persistence for IdeaHub.
//!
//! The [`store::AccountStore`] trait is the seam between the auth layer
//! and storage. Two implementations are provided: [`store::PgAccountStore`]
//! backed by PostgreSQL, and [`store::MemoryAccountStore`] for tests and
//! single-process development.

pub mod connection;
pub mod migration;
pub mod store;

pub use store::{AccountStore, MemoryAccountStore, PgAccountStore};
