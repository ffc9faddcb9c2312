//! `normalize` command
//!
//! Prints the repaired settings tree, or writes it back over the input.

use crate::cli::args::NormalizeArgs;
use crate::config::loader::render;
use crate::config::{ConfigFormat, ConfigLoader};
use crate::error::DmlError;

/// Loads, repairs and emits one settings file.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or written.
pub fn run(args: &NormalizeArgs) -> Result<(), DmlError> {
    let loader = ConfigLoader::with_defaults();
    let result = loader.load(&args.file)?;

    for repair in &result.repairs {
        tracing::warn!(
            field = %repair.path,
            from = %repair.from,
            to = %repair.to,
            "value repaired"
        );
    }

    if args.write {
        loader.save(&result.config, &args.file)?;
        tracing::info!(
            file = %args.file.display(),
            repairs = result.repairs.len(),
            "configuration rewritten"
        );
        return Ok(());
    }

    let format = args
        .output_format
        .map_or_else(|| ConfigFormat::from_path(&args.file), Into::into);
    print!("{}", render(&result.config, format)?);
    Ok(())
}
