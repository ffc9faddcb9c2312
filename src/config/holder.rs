//! Owned configuration handle
//!
//! A `ConfigHolder` is created once at the application's composition point
//! and passed to whatever needs settings. Consumers take `Arc<ConfigRoot>`
//! snapshots; a reload swaps in a new snapshot and leaves existing ones
//! untouched.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::loader::{ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
use crate::config::schema::ConfigRoot;
use crate::config::validation::{PostLoad, Repair};
use crate::error::ConfigError;

/// Owns the current settings snapshot and the file it came from.
#[derive(Debug)]
pub struct ConfigHolder {
    path: PathBuf,
    loader: ConfigLoader,
    current: Arc<ConfigRoot>,
    repairs: Vec<Repair>,
    warnings: Vec<LoadWarning>,
}

impl ConfigHolder {
    /// Loads the settings at `path`, writing defaults first if the file is
    /// missing.
    ///
    /// A file that cannot be parsed does not prevent startup: the defaults
    /// are used instead and a warning is recorded.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures unrelated to the file's content:
    /// writing defaults for a missing file, a file over the size limit, or
    /// a path that cannot be read (a directory, missing permissions).
    pub fn open(path: impl Into<PathBuf>, options: LoaderOptions) -> Result<Self, ConfigError> {
        let path = path.into();
        let loader = ConfigLoader::new(options);
        let result = load_with_fallback(&loader, &path)?;

        Ok(Self {
            path,
            loader,
            current: result.config,
            repairs: result.repairs,
            warnings: result.warnings,
        })
    }

    /// Returns the current settings snapshot.
    #[must_use]
    pub fn get(&self) -> Arc<ConfigRoot> {
        Arc::clone(&self.current)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Repairs made while producing the current snapshot.
    #[must_use]
    pub fn last_repairs(&self) -> &[Repair] {
        &self.repairs
    }

    /// Warnings from producing the current snapshot.
    #[must_use]
    pub fn last_warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Re-reads the file and replaces the current snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigHolder::open`]. On error the current snapshot is kept.
    pub fn reload(&mut self) -> Result<Arc<ConfigRoot>, ConfigError> {
        let result = load_with_fallback(&self.loader, &self.path)?;
        tracing::info!(
            file = %self.path.display(),
            repairs = result.repairs.len(),
            "configuration reloaded"
        );

        self.current = result.config;
        self.repairs = result.repairs;
        self.warnings = result.warnings;
        Ok(self.get())
    }
}

fn load_with_fallback(loader: &ConfigLoader, path: &Path) -> Result<LoadResult, ConfigError> {
    match loader.load_or_create(path) {
        Ok(result) => Ok(result),
        Err(err @ ConfigError::ParseError { .. }) => {
            tracing::warn!(
                file = %path.display(),
                error = %err,
                "configuration unusable, falling back to defaults"
            );
            let mut config = ConfigRoot::default();
            let repairs = config.normalize();
            Ok(LoadResult {
                config: Arc::new(config),
                repairs,
                warnings: vec![LoadWarning {
                    message: format!("Using default configuration: {err}"),
                    location: None,
                }],
            })
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dml-refabricated.json");

        let holder = ConfigHolder::open(&path, LoaderOptions::default()).unwrap();
        assert!(path.exists());
        assert_eq!(holder.get().trial.arena_radius, 12);
        assert!(holder.last_warnings().is_empty());
    }

    #[test]
    fn open_falls_back_on_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dml-refabricated.json");
        std::fs::write(&path, "{ not json").unwrap();

        let holder = ConfigHolder::open(&path, LoaderOptions::default()).unwrap();
        assert_eq!(holder.get().data_model.basic_data_required, 8);
        assert_eq!(holder.last_warnings().len(), 1);
        assert!(holder.last_warnings()[0].message.contains("default"));
        // The broken file is left for the user to fix.
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn open_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();

        let err = ConfigHolder::open(dir.path(), LoaderOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }), "{err:?}");
    }

    #[test]
    fn reload_swaps_snapshot_and_keeps_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dml-refabricated.json");
        std::fs::write(&path, r#"{"trial": {"maxMobsInArena": 4}}"#).unwrap();

        let mut holder = ConfigHolder::open(&path, LoaderOptions::default()).unwrap();
        let before = holder.get();
        assert_eq!(before.trial.max_mobs_in_arena, 4);

        std::fs::write(&path, r#"{"trial": {"maxMobsInArena": -2}}"#).unwrap();
        let after = holder.reload().unwrap();

        assert_eq!(before.trial.max_mobs_in_arena, 4);
        assert_eq!(after.trial.max_mobs_in_arena, 0);
        assert!(
            holder
                .last_repairs()
                .iter()
                .any(|r| r.path == "trial.maxMobsInArena")
        );
    }

    #[test]
    fn reload_size_error_keeps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dml-refabricated.json");
        std::fs::write(&path, "{}").unwrap();

        let options = LoaderOptions {
            limits: crate::config::loader::ConfigLimits {
                max_config_size: 64,
            },
            format: None,
        };
        let mut holder = ConfigHolder::open(&path, options).unwrap();
        std::fs::write(&path, format!("{{\"pad\": \"{}\"}}", "x".repeat(128))).unwrap();

        assert!(holder.reload().is_err());
        assert_eq!(holder.get().trial.arena_radius, 12);
        assert_eq!(holder.path(), path.as_path());
    }
}
