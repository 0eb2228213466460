// Manifest Plugin: maps logical asset names to their emitted URLs

use crate::core::models::{BuildConfig, Compilation, EmittedAsset};
use crate::core::plugin::{Plugin, PluginContext};
use crate::core::pruner::strip_query;
use crate::utils::{Logger, Result};
use std::collections::{BTreeMap, HashSet};

/// Writes `manifest.json` into the asset table.
///
/// Entry files are keyed as `<basePath><entry name><ext>`, so
/// `css/app.a1b2c3d4.css` of entry `css/app` becomes `build/css/app.css`.
/// Files that belong to no entry (images, fonts) are keyed by their own
/// name. Values are `<publicPath><filename>`.
pub struct ManifestPlugin {
    file_name: String,
    base_path: String,
    public_path: String,
}

impl ManifestPlugin {
    pub fn new(file_name: impl Into<String>, base_path: impl Into<String>, public_path: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            base_path: base_path.into(),
            public_path: public_path.into(),
        }
    }

    pub fn from_config(config: &BuildConfig) -> Self {
        Self::new(
            config.manifest.file_name.clone(),
            config.manifest_base_path(),
            config.public_path.clone(),
        )
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Manifest entries for the current state of the compilation
    pub fn entries(&self, compilation: &Compilation) -> BTreeMap<String, String> {
        let mut manifest = BTreeMap::new();
        let mut claimed = HashSet::new();

        for group in &compilation.groups {
            for file in group.files.iter().chain(group.auxiliary_files.iter()) {
                let stored = if compilation.assets.contains(file) {
                    file.as_str()
                } else {
                    strip_query(file)
                };
                if !compilation.assets.contains(stored) {
                    continue;
                }

                claimed.insert(stored.to_string());
                manifest.insert(
                    format!("{}{}{}", self.base_path, group.name, manifest_extension(file)),
                    format!("{}{}", self.public_path, file),
                );
            }
        }

        for filename in compilation.assets.filenames() {
            if filename == self.file_name || claimed.contains(filename) {
                continue;
            }
            manifest.insert(
                format!("{}{}", self.base_path, filename),
                format!("{}{}", self.public_path, filename),
            );
        }

        manifest
    }
}

/// Extension used in manifest keys: `.css`, `.js`, or `.js.map` for maps
fn manifest_extension(filename: &str) -> String {
    let path = strip_query(filename);
    let basename = path.rsplit('/').next().unwrap_or(path);

    let extension = |name: &str| name.rfind('.').map(|i| name[i..].to_string()).unwrap_or_default();

    match basename.strip_suffix(".map") {
        Some(stem) => format!("{}.map", extension(stem)),
        None => extension(basename),
    }
}

impl Plugin for ManifestPlugin {
    fn name(&self) -> &str {
        "manifest-plugin"
    }

    fn process_assets(&self, compilation: &mut Compilation, _context: &PluginContext) -> Result<()> {
        let entries = self.entries(compilation);
        let json = serde_json::to_string_pretty(&entries)?;

        Logger::debug(&format!("Manifest: {} entries -> {}", entries.len(), self.file_name));
        compilation
            .assets
            .insert(EmittedAsset::new(self.file_name.clone(), json.into_bytes()));
        Ok(())
    }
}
