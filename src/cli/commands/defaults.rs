//! `defaults` command
//!
//! Emits the settings the game starts with when no file exists: the
//! defaults after post-load validation.

use crate::cli::args::DefaultsArgs;
use crate::config::loader::render;
use crate::config::{ConfigFormat, ConfigLoader, ConfigRoot, LoaderOptions, PostLoad};
use crate::error::DmlError;

/// Prints or writes the default settings tree.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn run(args: &DefaultsArgs) -> Result<(), DmlError> {
    let format = ConfigFormat::from(args.output_format);
    let mut config = ConfigRoot::default();
    config.validate_post_load();

    match &args.output {
        Some(path) => {
            let loader = ConfigLoader::new(LoaderOptions {
                format: Some(format),
                ..LoaderOptions::default()
            });
            loader.save(&config, path)?;
            tracing::info!(file = %path.display(), "default configuration written");
        }
        None => print!("{}", render(&config, format)?),
    }
    Ok(())
}
