//! 🔦 flashkit core library.
//!
//! `flashkit-core` holds shared types, the CLI definition, and session reporting used by
//! the workflow crate and the binary.

pub mod cli;
pub mod errors;
pub mod logging;
pub mod report;
