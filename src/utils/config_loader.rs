use crate::core::models::{BuildConfig, BuildMode, ManifestConfig, PruneConfig, RemovalBounds, DEFAULT_CODE_PATTERN};
use crate::utils::{Logger, Result, ShearsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "shears.config.json";

/// Configuration file format (shears.config.json)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShearsConfig {
    /// Output directory written by the bundler (default: "public/build")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outdir: Option<String>,

    /// Bundler stats file listing the entries (default: "build-stats.json")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<String>,

    /// URL prefix the web server exposes the output under (default: "/build/")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_path: Option<String>,

    /// Entries whose script output is removed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prune_entries: Option<Vec<String>>,

    /// Accepted number of removed files per entry (default: 1..=2)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub removal_bounds: Option<RemovalBounds>,

    /// Pattern for script filenames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_pattern: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<ManifestFileConfig>,

    /// Delete files the build no longer produces (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<BuildMode>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ManifestFileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// Values given on the command line; `None` defers to the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub outdir: Option<String>,
    pub stats: Option<String>,
    pub public_path: Option<String>,
    pub prune_entries: Vec<String>,
    pub no_manifest: bool,
    pub no_clean: bool,
    pub development: bool,
}

/// Config loader that supports config files with CLI override
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file if it exists
    /// Searches for shears.config.json in the project root
    pub fn load_from_file(root: &Path) -> Result<Option<ShearsConfig>> {
        let config_path = root.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            Logger::debug(&format!("No {} found, using defaults", CONFIG_FILE_NAME));
            return Ok(None);
        }

        Self::load_from_path(&config_path).map(Some)
    }

    /// Load an explicitly named config file
    pub fn load_from_path(config_path: &Path) -> Result<ShearsConfig> {
        Logger::debug(&format!("Loading config from {}", config_path.display()));

        let content = std::fs::read_to_string(config_path)
            .map_err(ShearsError::Io)?;

        let config: ShearsConfig = serde_json::from_str(&content)
            .map_err(|e| ShearsError::config(format!(
                "Failed to parse {}: {}",
                config_path.display(),
                e
            )))?;

        Logger::debug("✅ Config file loaded successfully");
        Ok(config)
    }

    /// Merge file config with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(
        file_config: Option<ShearsConfig>,
        root: PathBuf,
        cli: &CliOverrides,
    ) -> BuildConfig {
        let base = file_config.unwrap_or_default();
        let defaults = BuildConfig::default();

        let resolve = |value: &str| {
            if Path::new(value).is_absolute() {
                PathBuf::from(value)
            } else {
                root.join(value)
            }
        };

        let outdir = cli
            .outdir
            .as_deref()
            .or(base.outdir.as_deref())
            .map(resolve)
            .unwrap_or_else(|| root.join(&defaults.outdir));

        let stats = cli
            .stats
            .as_deref()
            .or(base.stats.as_deref())
            .map(resolve)
            .unwrap_or_else(|| root.join(&defaults.stats));

        let targets = if cli.prune_entries.is_empty() {
            base.prune_entries.unwrap_or_default()
        } else {
            cli.prune_entries.clone()
        };

        let prune = PruneConfig {
            targets,
            bounds: base.removal_bounds.unwrap_or_default(),
            code_pattern: base
                .code_pattern
                .unwrap_or_else(|| DEFAULT_CODE_PATTERN.to_string()),
        };

        let manifest_file = base.manifest.unwrap_or_default();
        let manifest = ManifestConfig {
            enabled: !cli.no_manifest && manifest_file.enabled.unwrap_or(true),
            base_path: manifest_file.base_path,
            file_name: manifest_file
                .file_name
                .unwrap_or_else(|| ManifestConfig::default().file_name),
        };

        let mode = if cli.development {
            BuildMode::Development
        } else {
            base.mode.unwrap_or(defaults.mode)
        };

        BuildConfig {
            outdir,
            stats,
            public_path: cli
                .public_path
                .clone()
                .or(base.public_path)
                .unwrap_or(defaults.public_path),
            prune,
            manifest,
            clean: !cli.no_clean && base.clean.unwrap_or(true),
            mode,
            root,
        }
    }

    /// Generate example config file
    pub fn generate_example() -> String {
        let example = ShearsConfig {
            outdir: Some("public/build".to_string()),
            stats: Some("build-stats.json".to_string()),
            public_path: Some("/build/".to_string()),
            prune_entries: Some(vec!["css/app".to_string()]),
            removal_bounds: Some(RemovalBounds::default()),
            code_pattern: Some(DEFAULT_CODE_PATTERN.to_string()),
            manifest: Some(ManifestFileConfig {
                enabled: Some(true),
                base_path: None,
                file_name: Some("manifest.json".to_string()),
            }),
            clean: Some(true),
            mode: Some(BuildMode::Production),
        };
        serde_json::to_string_pretty(&example).unwrap_or_else(|_| {
            r#"{
  "outdir": "public/build",
  "stats": "build-stats.json",
  "publicPath": "/build/",
  "pruneEntries": ["css/app"]
}"#.to_string()
        })
    }
}
