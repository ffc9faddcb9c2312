//! `validate` command
//!
//! Loads each file through the full pipeline and reports what the
//! post-load validation changed. Repairs never fail a file unless
//! `--strict` is given.

use std::path::Path;

use serde::Serialize;

use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::config::{ConfigLoader, LoadResult, LoadWarning, Repair};
use crate::error::{ConfigError, DmlError};

/// Outcome of validating one file.
#[derive(Debug, Serialize)]
struct FileReport {
    path: String,
    valid: bool,
    repairs: Vec<Repair>,
    warnings: Vec<LoadWarning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FileReport {
    fn loaded(path: &Path, result: LoadResult, strict: bool) -> Self {
        let valid = !strict || (result.repairs.is_empty() && result.warnings.is_empty());
        Self {
            path: path.display().to_string(),
            valid,
            repairs: result.repairs,
            warnings: result.warnings,
            error: None,
        }
    }

    fn failed(path: &Path, err: &ConfigError) -> Self {
        Self {
            path: path.display().to_string(),
            valid: false,
            repairs: Vec::new(),
            warnings: Vec::new(),
            error: Some(err.to_string()),
        }
    }
}

/// Validates every file, prints the report, and fails if any file failed.
///
/// # Errors
///
/// Returns `ValidationFailed` with the number of failed files.
pub fn run(args: &ValidateArgs) -> Result<(), DmlError> {
    let loader = ConfigLoader::with_defaults();

    let reports: Vec<FileReport> = args
        .files
        .iter()
        .map(|path| {
            tracing::info!(file = %path.display(), "validating configuration");
            match loader.load(path) {
                Ok(result) => FileReport::loaded(path, result, args.strict),
                Err(err) => {
                    tracing::error!(file = %path.display(), error = %err, "configuration rejected");
                    FileReport::failed(path, &err)
                }
            }
        })
        .collect();

    match args.format {
        OutputFormat::Human => print!("{}", render_human(&reports)),
        OutputFormat::Json => println!("{}", render_json(&reports)?),
    }

    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(ConfigError::ValidationFailed { count: failed }.into());
    }
    Ok(())
}

fn render_human(reports: &[FileReport]) -> String {
    use std::fmt::Write;

    let mut out = String::new();
    for report in reports {
        if let Some(error) = &report.error {
            let _ = writeln!(out, "{}: error: {error}", report.path);
            continue;
        }

        let status = if report.repairs.is_empty() {
            "ok".to_string()
        } else {
            format!("{} value(s) repaired", report.repairs.len())
        };
        let _ = writeln!(out, "{}: {status}", report.path);
        for repair in &report.repairs {
            let _ = writeln!(out, "  repaired {repair}");
        }
        for warning in &report.warnings {
            match &warning.location {
                Some(location) => {
                    let _ = writeln!(out, "  warning: {} at {location}", warning.message);
                }
                None => {
                    let _ = writeln!(out, "  warning: {}", warning.message);
                }
            }
        }
    }
    out
}

fn render_json(reports: &[FileReport]) -> Result<String, DmlError> {
    let summary = serde_json::json!({
        "total": reports.len(),
        "failed": reports.iter().filter(|r| !r.valid).count(),
        "repaired": reports.iter().map(|r| r.repairs.len()).sum::<usize>(),
    });
    let output = serde_json::json!({
        "files": reports,
        "summary": summary,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFormat, FieldValue};
    use std::path::PathBuf;

    fn report_for(text: &str, strict: bool) -> FileReport {
        let result = ConfigLoader::with_defaults()
            .load_from_str(text, ConfigFormat::Json)
            .unwrap();
        FileReport::loaded(Path::new("settings.json"), result, strict)
    }

    #[test]
    fn repairs_pass_without_strict() {
        let report = report_for(r#"{"trial": {"arenaRadius": 0}}"#, false);
        assert!(report.valid);
        assert!(!report.repairs.is_empty());
    }

    #[test]
    fn repairs_fail_with_strict() {
        let report = report_for(r#"{"trial": {"arenaRadius": 0}}"#, true);
        assert!(!report.valid);
    }

    #[test]
    fn unknown_keys_fail_with_strict() {
        let report = report_for(
            r#"{"trial": {"warmupTime": 24000}, "unknown": 1}"#,
            true,
        );
        assert!(report.repairs.is_empty());
        assert!(!report.valid);
    }

    #[test]
    fn human_report_lists_repairs() {
        let report = FileReport {
            path: "settings.json".to_string(),
            valid: true,
            repairs: vec![Repair {
                path: "matterCondenser.processTime".to_string(),
                from: FieldValue::Integer(0),
                to: FieldValue::Integer(1),
            }],
            warnings: vec![LoadWarning {
                message: "Unknown key 'x' is ignored".to_string(),
                location: Some("trial.x".to_string()),
            }],
            error: None,
        };
        let text = render_human(&[report]);
        assert_eq!(
            text,
            "settings.json: 1 value(s) repaired\n\
             \x20 repaired matterCondenser.processTime: 0 -> 1\n\
             \x20 warning: Unknown key 'x' is ignored at trial.x\n"
        );
    }

    #[test]
    fn json_report_has_summary() {
        let failed = FileReport::failed(
            Path::new("missing.json"),
            &ConfigError::MissingFile {
                path: PathBuf::from("missing.json"),
            },
        );
        let ok = report_for("{}", false);
        let text = render_json(&[ok, failed]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["summary"]["total"], 2);
        assert_eq!(value["summary"]["failed"], 1);
        assert_eq!(value["summary"]["repaired"], 1);
        assert_eq!(value["files"][1]["error"], "file not found: missing.json");
        assert!(value["files"][0].get("error").is_none());
    }
}
