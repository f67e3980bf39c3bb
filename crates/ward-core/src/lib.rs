//! Core types and trait definitions for the Ward incident tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The storage backend and the JSON API both depend on it.

pub mod incident;
pub mod status;
pub mod store;
pub mod user;
