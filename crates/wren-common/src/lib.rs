//! Common utilities for the wren parser.
//!
//! This crate provides shared infrastructure used by all wren components:
//! - **Warning System** - deduplicated warnings for recovered markup and
//!   unsupported input, emitted through `tracing`
//! - **Logging** - `tracing-subscriber` setup for binaries and tests

pub mod logging;
pub mod warning;
