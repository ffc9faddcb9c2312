//! Configuration loader
//!
//! Loading pipeline:
//! 1. Size check and read
//! 2. Parse (JSON or YAML) into a generic tree
//! 3. Unknown-key detection against the descriptor
//! 4. Deserialization to `ConfigRoot` (missing keys keep their defaults)
//! 5. Post-load validation, recording every repair
//! 6. Freeze with `Arc`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::config::descriptor::{self, MOD_ID, SectionDescriptor};
use crate::config::schema::ConfigRoot;
use crate::config::validation::{PostLoad, Repair, RepairLog};
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Default location of the settings file, relative to the game directory.
#[must_use]
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config").join(format!("{MOD_ID}.json"))
}

/// On-disk representation of the settings tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigFormat {
    /// JSON, the format the game writes.
    #[default]
    Json,
    /// YAML.
    Yaml,
}

impl ConfigFormat {
    /// Picks the format from a file extension; anything but `.yaml`/`.yml`
    /// is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Options for the configuration loader.
#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Limits for configuration size.
    pub limits: ConfigLimits,

    /// Forces a format instead of deriving it from the file extension.
    pub format: Option<ConfigFormat>,
}

/// Limits to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: u64,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("DML_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and repaired configuration.
    pub config: Arc<ConfigRoot>,

    /// Values the post-load validation changed.
    pub repairs: Vec<Repair>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Configuration loader.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
}

impl ConfigLoader {
    #[must_use]
    pub const fn new(options: LoaderOptions) -> Self {
        Self { options }
    }

    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    fn format_for(&self, path: &Path) -> ConfigFormat {
        self.options
            .format
            .unwrap_or_else(|| ConfigFormat::from_path(path))
    }

    /// Loads a configuration file and returns the repaired configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, exceeds the size limit,
    /// is empty, or does not parse into the settings tree. Out-of-range
    /// values are never errors.
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|_| ConfigError::MissingFile {
            path: path.to_path_buf(),
        })?;

        let limit = self.options.limits.max_config_size;
        if metadata.len() > limit {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::InvalidData {
                ConfigError::ParseError {
                    path: path.to_path_buf(),
                    line: None,
                    message: source.to_string(),
                }
            } else {
                ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        tracing::info!(file = %path.display(), "loading configuration");
        self.parse(&raw, self.format_for(path), path)
    }

    /// Runs the pipeline on in-memory text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is empty or does not parse into the
    /// settings tree.
    pub fn load_from_str(
        &self,
        content: &str,
        format: ConfigFormat,
    ) -> Result<LoadResult, ConfigError> {
        self.parse(content, format, Path::new("<memory>"))
    }

    /// Loads `path`, first writing the default configuration there if the
    /// file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults cannot be written or the existing
    /// file cannot be loaded.
    pub fn load_or_create(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        if path.exists() {
            return self.load(path);
        }

        tracing::info!(file = %path.display(), "no configuration found, writing defaults");
        let mut config = ConfigRoot::default();
        let repairs = config.normalize();
        self.save(&config, path)?;

        Ok(LoadResult {
            config: Arc::new(config),
            repairs,
            warnings: Vec::new(),
        })
    }

    /// Writes `config` to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, config: &ConfigRoot, path: &Path) -> Result<(), ConfigError> {
        let text = render(config, self.format_for(path))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| ConfigError::WriteError {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(file = %path.display(), "configuration written");
        Ok(())
    }

    fn parse(
        &self,
        raw: &str,
        format: ConfigFormat,
        path: &Path,
    ) -> Result<LoadResult, ConfigError> {
        let content = raw.strip_prefix('\u{feff}').unwrap_or(raw);

        if content.trim().is_empty() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration file is empty".to_string(),
            });
        }

        let tree: Value = match format {
            ConfigFormat::Json => {
                serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                    path: path.to_path_buf(),
                    line: Some(e.line()),
                    message: e.to_string(),
                })?
            }
            ConfigFormat::Yaml => {
                serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                    path: path.to_path_buf(),
                    line: e.location().map(|l| l.line()),
                    message: e.to_string(),
                })?
            }
        };

        if !tree.is_object() {
            return Err(ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: "Configuration root must be a mapping of sections".to_string(),
            });
        }

        let warnings = find_unknown_keys(&tree);
        for warning in &warnings {
            tracing::warn!(
                location = warning.location.as_deref().unwrap_or("<unknown>"),
                "{}",
                warning.message
            );
        }

        let mut config: ConfigRoot =
            serde_json::from_value(tree).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                line: None,
                message: format!("Failed to deserialize configuration: {e}"),
            })?;

        let mut log = RepairLog::new();
        config.repair(&mut log);
        if !log.is_empty() {
            tracing::info!(
                file = %path.display(),
                repairs = log.repairs().len(),
                "out-of-range values repaired"
            );
        }

        Ok(LoadResult {
            config: Arc::new(config),
            repairs: log.into_repairs(),
            warnings,
        })
    }
}

/// Serializes a configuration in the given format.
///
/// # Errors
///
/// Returns an error if the serializer fails.
pub fn render(config: &ConfigRoot, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map(|mut s| {
                s.push('\n');
                s
            })
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
        ConfigFormat::Yaml => {
            serde_yaml::to_string(config).map_err(|e| ConfigError::SerializeError(e.to_string()))
        }
    }
}

// ============================================================================
// Unknown keys
// ============================================================================

/// Reports keys the settings tree does not know, with a suggestion when a
/// known key is close.
fn find_unknown_keys(tree: &Value) -> Vec<LoadWarning> {
    let mut warnings = Vec::new();
    let Some(root) = tree.as_object() else {
        return warnings;
    };

    for (key, value) in root {
        match descriptor::find_section(key) {
            Some(section) => check_section(&section, value, key, &mut warnings),
            None => {
                let sections = descriptor::describe();
                warnings.push(unknown_key(key, key, sections.iter().map(|s| s.key)));
            }
        }
    }
    warnings
}

fn check_section(
    section: &SectionDescriptor,
    value: &Value,
    path: &str,
    warnings: &mut Vec<LoadWarning>,
) {
    let Some(map) = value.as_object() else {
        return;
    };

    for (key, value) in map {
        let child_path = format!("{path}.{key}");
        if let Some(sub) = section.subsection(key) {
            check_section(sub, value, &child_path, warnings);
        } else if section.field(key).is_none() {
            warnings.push(unknown_key(key, &child_path, section.keys()));
        }
    }
}

fn unknown_key<'a>(
    key: &str,
    path: &str,
    known: impl Iterator<Item = &'a str>,
) -> LoadWarning {
    let message = suggest_key(key, known).map_or_else(
        || format!("Unknown key '{key}' is ignored"),
        |s| format!("Unknown key '{key}' is ignored (did you mean '{s}'?)"),
    );
    LoadWarning {
        message,
        location: Some(path.to_string()),
    }
}

/// Suggests the closest known key for typo correction.
///
/// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
fn suggest_key<'a>(input: &str, known: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    known
        .map(|k| (k, strsim::damerau_levenshtein(input, k)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(k, _)| k)
}

// ============================================================================
// Helper Functions
// ============================================================================

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::FieldValue;

    fn load_json(text: &str) -> LoadResult {
        ConfigLoader::with_defaults()
            .load_from_str(text, ConfigFormat::Json)
            .unwrap()
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.yaml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.YML")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a")), ConfigFormat::Json);
    }

    #[test]
    fn test_default_config_path() {
        assert_eq!(
            default_config_path(),
            Path::new("config").join("dml-refabricated.json")
        );
    }

    #[test]
    fn test_load_repairs_values() {
        let result = load_json(r#"{"trial": {"arenaRadius": 0}, "matterCondenser": {"processTime": 0}}"#);
        assert_eq!(result.config.trial.arena_radius, 1);
        assert_eq!(result.config.matter_condenser.process_time, 1);
        assert!(result.repairs.iter().any(|r| r.path == "trial.arenaRadius"
            && r.from == FieldValue::Integer(0)
            && r.to == FieldValue::Integer(1)));
    }

    #[test]
    fn test_load_yaml() {
        let result = ConfigLoader::with_defaults()
            .load_from_str(
                "systemGlitch:\n  teleportChance: 5.0\n",
                ConfigFormat::Yaml,
            )
            .unwrap();
        assert!((result.config.system_glitch.teleport_chance - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overflowing_floats_render_and_reload() {
        let loader = ConfigLoader::with_defaults();
        for (text, format) in [
            (r#"{"systemGlitch": {"damageLimiter": 1e39}}"#, ConfigFormat::Json),
            (r#"{"glitchArmor": {"costs": {"fly": -1e39}}}"#, ConfigFormat::Json),
            ("systemGlitch:\n  damageLimiter: 1.0e39\n", ConfigFormat::Yaml),
        ] {
            let first = loader.load_from_str(text, format).unwrap();
            assert_eq!(first.repairs.len(), 2, "{text}");

            let rendered = render(&first.config, ConfigFormat::Json).unwrap();
            let second = loader.load_from_str(&rendered, ConfigFormat::Json).unwrap();
            assert!(second.repairs.is_empty(), "{rendered}");
            assert_eq!(second.config, first.config);
        }
    }

    #[test]
    fn test_unreadable_path_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ConfigLoader::with_defaults().load(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }), "{err:?}");
    }

    #[test]
    fn test_invalid_utf8_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dml-refabricated.json");
        std::fs::write(&path, [b'{', 0xff, 0xfe, b'}']).unwrap();

        let err = ConfigLoader::with_defaults().load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }), "{err:?}");
    }

    #[test]
    fn test_empty_content_rejected() {
        let err = ConfigLoader::with_defaults()
            .load_from_str("  \n", ConfigFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_bom_is_stripped() {
        let result = load_json("\u{feff}{\"dataModel\": {\"basicDataRequired\": 4}}");
        assert_eq!(result.config.data_model.basic_data_required, 4);
    }

    #[test]
    fn test_non_mapping_root_rejected() {
        let err = ConfigLoader::with_defaults()
            .load_from_str("[1, 2, 3]", ConfigFormat::Json)
            .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_syntax_error_reports_line() {
        let err = ConfigLoader::with_defaults()
            .load_from_str("{\n\"trial\": {\n  \"arenaRadius\": ,\n}}", ConfigFormat::Json)
            .unwrap_err();
        match err {
            ConfigError::ParseError { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_section_warns_with_suggestion() {
        let result = load_json(r#"{"trail": {"arenaRadius": 10}}"#);
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].location.as_deref(), Some("trail"));
        assert!(result.warnings[0].message.contains("did you mean 'trial'"));
        // The misspelled section is ignored, so the default survives.
        assert_eq!(result.config.trial.arena_radius, 12);
    }

    #[test]
    fn test_unknown_field_warns() {
        let result = load_json(r#"{"glitchArmor": {"costs": {"flight": 1.0}, "soulVisonRange": 3}}"#);
        let locations: Vec<&str> = result
            .warnings
            .iter()
            .filter_map(|w| w.location.as_deref())
            .collect();
        assert!(locations.contains(&"glitchArmor.costs.flight"));
        assert!(locations.contains(&"glitchArmor.soulVisonRange"));
        let typo = result
            .warnings
            .iter()
            .find(|w| w.location.as_deref() == Some("glitchArmor.soulVisonRange"))
            .unwrap();
        assert!(typo.message.contains("soulVisionRange"));
    }

    #[test]
    fn test_no_suggestion_for_distant_key() {
        let result = load_json(r#"{"completelyUnrelatedSetting": true}"#);
        assert_eq!(result.warnings.len(), 1);
        assert!(!result.warnings[0].message.contains("did you mean"));
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.json");
        std::fs::write(&path, format!("{{\"pad\": \"{}\"}}", "x".repeat(64))).unwrap();

        let loader = ConfigLoader::new(LoaderOptions {
            limits: ConfigLimits {
                max_config_size: 16,
            },
            format: None,
        });
        let err = loader.load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge { limit: 16, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = ConfigLoader::with_defaults()
            .load(Path::new("/nonexistent/dml-refabricated.json"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingFile { .. }));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("dml-refabricated.json");

        let loader = ConfigLoader::with_defaults();
        let created = loader.load_or_create(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.config.trial.warmup_time, 24000);

        let reloaded = loader.load(&path).unwrap();
        assert!(reloaded.repairs.is_empty());
        assert!(reloaded.warnings.is_empty());
        assert_eq!(reloaded.config, created.config);
    }

    #[test]
    fn test_save_yaml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");

        let mut config = ConfigRoot::default();
        config.trial.arena_radius = 20;
        config.validate_post_load();

        let loader = ConfigLoader::with_defaults();
        loader.save(&config, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("arenaRadius: 20"));

        let loaded = loader.load(&path).unwrap();
        assert_eq!(*loaded.config, config);
    }

    #[test]
    fn test_forced_format_overrides_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.txt");
        std::fs::write(&path, "trial:\n  maxMobsInArena: -4\n").unwrap();

        let loader = ConfigLoader::new(LoaderOptions {
            format: Some(ConfigFormat::Yaml),
            ..LoaderOptions::default()
        });
        let result = loader.load(&path).unwrap();
        assert_eq!(result.config.trial.max_mobs_in_arena, 0);
    }
}
