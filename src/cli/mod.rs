//! Command-line interface
//!
//! Argument parsing and command handlers for the `dml-config` binary.

pub mod args;
pub mod commands;
