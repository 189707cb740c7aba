//! STAKELENS — USD normalization and analytics for crypto game-session
//! records.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod input;
pub mod normalize;
pub mod prices;
pub mod report;
pub mod types;
