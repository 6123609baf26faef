//! Test infrastructure shared by the end-to-end tests
//!
//! This module provides container lifecycle management and seed/cleanup
//! helpers for running the harness against a real Db2 instance with the
//! ASN capture scripts installed.

pub mod container;
pub mod tables;

pub use container::Db2Container;
