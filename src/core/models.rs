use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use serde::{Serialize, Deserialize};

/// A file produced by the bundler, held in memory until it is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedAsset {
    pub filename: String,
    pub content: Vec<u8>,
}

impl EmittedAsset {
    pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            content: content.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// The build's output set, keyed by filename
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTable {
    assets: BTreeMap<String, EmittedAsset>,
}

impl AssetTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an asset, returning the previous one
    pub fn insert(&mut self, asset: EmittedAsset) -> Option<EmittedAsset> {
        self.assets.insert(asset.filename.clone(), asset)
    }

    pub fn remove(&mut self, filename: &str) -> Option<EmittedAsset> {
        self.assets.remove(filename)
    }

    pub fn get(&self, filename: &str) -> Option<&EmittedAsset> {
        self.assets.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.assets.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Filenames in sorted order
    pub fn filenames(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EmittedAsset> {
        self.assets.values()
    }
}

impl FromIterator<EmittedAsset> for AssetTable {
    fn from_iter<I: IntoIterator<Item = EmittedAsset>>(iter: I) -> Self {
        let mut table = AssetTable::new();
        for asset in iter {
            table.insert(asset);
        }
        table
    }
}

/// A named entry point and the files the bundler attributed to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputGroup {
    pub name: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub auxiliary_files: Vec<String>,
}

impl OutputGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Vec::new(),
            auxiliary_files: Vec::new(),
        }
    }

    pub fn with_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = files.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_auxiliary_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auxiliary_files = files.into_iter().map(Into::into).collect();
        self
    }
}

/// The bundler's stats file: one record per output group
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildStats {
    #[serde(default)]
    pub groups: Vec<OutputGroup>,
}

/// One build pass: the asset table and the groups pointing into it.
/// A fresh compilation is created for every pass.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub assets: AssetTable,
    pub groups: Vec<OutputGroup>,
}

impl Compilation {
    pub fn new(assets: AssetTable, groups: Vec<OutputGroup>) -> Self {
        Self { assets, groups }
    }

    pub fn group(&self, name: &str) -> Option<&OutputGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut OutputGroup> {
        self.groups.iter_mut().find(|g| g.name == name)
    }
}

/// Accepted number of removed files per pruned group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovalBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for RemovalBounds {
    /// One script file, optionally with its source map
    fn default() -> Self {
        Self { min: 1, max: 2 }
    }
}

impl RemovalBounds {
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && count <= self.max
    }
}

pub const DEFAULT_CODE_PATTERN: &str = r"\.js(\?[^.]*)?$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PruneConfig {
    /// Names of the groups whose code output is dropped
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub bounds: RemovalBounds,
    /// Filename pattern identifying executable code
    #[serde(default = "default_code_pattern")]
    pub code_pattern: String,
}

fn default_code_pattern() -> String {
    DEFAULT_CODE_PATTERN.to_string()
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            targets: Vec::new(),
            bounds: RemovalBounds::default(),
            code_pattern: default_code_pattern(),
        }
    }
}

impl PruneConfig {
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            targets: targets.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_bounds(mut self, min: usize, max: usize) -> Self {
        self.bounds = RemovalBounds { min, max };
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestConfig {
    pub enabled: bool,
    /// Key prefix; derived from the public path when unset
    pub base_path: Option<String>,
    pub file_name: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_path: None,
            file_name: "manifest.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Production,
    Development,
}

impl BuildMode {
    pub fn is_production(&self) -> bool {
        matches!(self, BuildMode::Production)
    }
}

#[derive(Debug, Clone)]
pub struct BuildConfig {
    pub root: PathBuf,
    pub outdir: PathBuf,
    pub stats: PathBuf,
    pub public_path: String,
    pub prune: PruneConfig,
    pub manifest: ManifestConfig,
    pub clean: bool,
    pub mode: BuildMode,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            outdir: PathBuf::from("public/build"),
            stats: PathBuf::from("build-stats.json"),
            public_path: "/build/".to_string(),
            prune: PruneConfig::default(),
            manifest: ManifestConfig::default(),
            clean: true,
            mode: BuildMode::Production,
        }
    }
}

impl BuildConfig {
    /// Output directory relative to the project root, for display
    pub fn relative_outdir(&self) -> String {
        let relative = self.outdir.strip_prefix(&self.root).unwrap_or(&self.outdir);
        relative.display().to_string()
    }

    /// Manifest key prefix: the configured one, or the public path
    /// without its leading slash
    pub fn manifest_base_path(&self) -> String {
        match &self.manifest.base_path {
            Some(base) => base.clone(),
            None => self.public_path.trim_start_matches('/').to_string(),
        }
    }
}

/// Files removed from one pruned group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrunedGroup {
    pub name: String,
    pub removed: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    pub groups: Vec<PrunedGroup>,
}

impl PruneReport {
    pub fn removed_count(&self) -> usize {
        self.groups.iter().map(|g| g.removed.len()).sum()
    }
}

#[derive(Debug, Default)]
pub struct BuildResult {
    pub success: bool,
    pub output_files: Vec<OutputFile>,
    pub pruned: PruneReport,
    pub deleted_files: Vec<PathBuf>,
    pub errors: Vec<String>,
    pub build_time: Duration,
}

#[derive(Debug, Clone)]
pub struct OutputFile {
    pub name: String,
    pub path: PathBuf,
    pub size: usize,
}
