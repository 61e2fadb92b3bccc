//! Domain model for the telenovela production pipeline.
//!
//! This crate contains no database or network dependencies; every function
//! is a pure evaluation over data passed in by the caller. The `db` and
//! `api` crates supply snapshots and project records and render the results.

pub mod aggregate;
pub mod error;
pub mod gating;
pub mod lifecycle;
pub mod recovery;
pub mod registry;
pub mod snapshot;
pub mod state;
pub mod steps;
pub mod types;
