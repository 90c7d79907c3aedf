//! Configuration
//!
//! Shared type definitions, result codes, and the harness configuration
//! assembled by the CLI layer.

pub mod types;
