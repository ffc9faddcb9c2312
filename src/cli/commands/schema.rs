//! `schema` command
//!
//! Renders the configuration descriptor as a table or as JSON.

use std::fmt::Write;

use crate::cli::args::{OutputFormat, SchemaArgs};
use crate::config::descriptor::{
    Layout, SectionDescriptor, describe, option_translation_key, tooltip_translation_key,
};
use crate::error::DmlError;

/// Prints the descriptor of every section.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &SchemaArgs) -> Result<(), DmlError> {
    let sections = describe();
    match args.format {
        OutputFormat::Human => print!("{}", render_human(&sections)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sections)?),
    }
    Ok(())
}

fn render_human(sections: &[SectionDescriptor]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(
            out,
            "[{}] {}",
            section.key,
            section.category_translation_key()
        );
        render_section(&mut out, section, section.key, 1);
    }
    out
}

fn render_section(out: &mut String, section: &SectionDescriptor, path: &str, depth: usize) {
    let indent = "  ".repeat(depth);
    for field in &section.fields {
        let field_path = format!("{path}.{}", field.key);
        let _ = write!(
            out,
            "{indent}{:<28} {:<8} {:<10} {}",
            field.key,
            field.kind.to_string(),
            field.default.to_string(),
            field.bound
        );
        if field.tooltip {
            let _ = write!(out, "  tooltip: {}", tooltip_translation_key(&field_path));
        }
        out.truncate(out.trim_end_matches(' ').len());
        out.push('\n');
    }

    for sub in &section.subsections {
        let sub_path = format!("{path}.{}", sub.key);
        let layout = match sub.layout {
            Layout::Transitive => "inline",
            Layout::Collapsible {
                start_expanded: true,
            } => "collapsible, expanded",
            Layout::Collapsible {
                start_expanded: false,
            } => "collapsible, collapsed",
        };
        let _ = writeln!(
            out,
            "{indent}{} ({layout}) {}",
            sub.key,
            option_translation_key(&sub_path)
        );
        if sub.tooltip {
            let _ = writeln!(out, "{indent}  tooltip: {}", tooltip_translation_key(&sub_path));
        }
        render_section(out, sub, &sub_path, depth + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_lists_every_section() {
        let text = render_human(&describe());
        for section in describe() {
            assert!(text.contains(&format!("[{}]", section.key)));
        }
    }

    #[test]
    fn human_shows_bounds_and_tooltips() {
        let text = render_human(&describe());
        let warmup = text
            .lines()
            .find(|l| l.trim_start().starts_with("warmupTime"))
            .unwrap();
        assert!(warmup.contains("integer"));
        assert!(warmup.contains("60"));
        assert!(warmup.ends_with(">= maxTime"));

        assert!(text.contains(
            "tooltip: text.autoconfig.dml-refabricated.option.systemGlitch.damageLimiter.@Tooltip"
        ));
        assert!(text.contains("costs (collapsible, expanded)"));
    }

    #[test]
    fn human_lines_have_no_trailing_spaces() {
        let text = render_human(&describe());
        assert!(text.lines().all(|l| !l.ends_with(' ')));
    }

    #[test]
    fn nested_fields_are_indented_deeper() {
        let text = render_human(&describe());
        let fly = text
            .lines()
            .find(|l| l.trim_start().starts_with("fly "))
            .unwrap();
        assert!(fly.starts_with("    fly"));
    }
}
