//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod defaults;
pub mod normalize;
pub mod schema;
pub mod validate;

use crate::cli::args::{Cli, Commands};
use crate::error::DmlError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), DmlError> {
    match cli.command {
        Commands::Validate(args) => validate::run(&args),
        Commands::Normalize(args) => normalize::run(&args),
        Commands::Defaults(args) => defaults::run(&args),
        Commands::Schema(args) => schema::run(&args),
    }
}
