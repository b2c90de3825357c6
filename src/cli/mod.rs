//! Command-line interface functionality
//!
//! This module contains the CLI components, available when the `cli`
//! feature is enabled.

mod main;

pub use main::main;
