use crate::core::{interfaces::*, models::*, plugin::{Plugin, PluginContext, PluginManager}};
use crate::plugins::{CompletionPlugin, ManifestPlugin, PrunePlugin};
use crate::utils::{ErrorContext, Logger, Result, ShearsError, Timer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

/// Runs one finalize pass: load the bundler's output, run the asset
/// hooks, write the result back and report.
pub struct FinalizeService {
    fs_service: Arc<dyn FileSystemService>,
    plugin_manager: PluginManager,
    pruner: Option<Arc<PrunePlugin>>,
}

/// Output of the emit step
struct Emitted {
    output_files: Vec<OutputFile>,
    deleted_files: Vec<PathBuf>,
}

impl FinalizeService {
    pub fn new(fs_service: Arc<dyn FileSystemService>) -> Self {
        Self {
            fs_service,
            plugin_manager: PluginManager::new(),
            pruner: None,
        }
    }

    /// Service with the standard plugin chain for `config`:
    /// prune, then manifest, then the completion message in production
    pub fn from_config(fs_service: Arc<dyn FileSystemService>, config: &BuildConfig) -> Result<Self> {
        let mut service = Self::new(fs_service)
            .with_pruner(Arc::new(PrunePlugin::new(&config.prune)?));

        if config.manifest.enabled {
            service = service.with_plugin(Arc::new(ManifestPlugin::from_config(config)));
        }

        if config.mode.is_production() {
            service = service.with_plugin(Arc::new(CompletionPlugin::new(config.relative_outdir())));
        }

        Ok(service)
    }

    /// Register the prune plugin; its report ends up in the build result
    pub fn with_pruner(mut self, plugin: Arc<PrunePlugin>) -> Self {
        self.plugin_manager.register(plugin.clone());
        self.pruner = Some(plugin);
        self
    }

    /// Register a plugin with the finalize service
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugin_manager.register(plugin);
        self
    }

    pub fn plugin_manager(&self) -> &PluginManager {
        &self.plugin_manager
    }

    /// Read the stats file and the output directory into a fresh compilation
    pub async fn load_compilation(&self, config: &BuildConfig) -> Result<Compilation> {
        let _timer = Timer::start("Loading compilation");

        let raw = self.fs_service.read_file(&config.stats).await.map_err(|e| {
            ShearsError::stats(format!("cannot read {}: {}", config.stats.display(), e))
        })?;
        let stats: BuildStats = serde_json::from_str(&raw).map_err(|e| {
            ShearsError::stats(format!("invalid stats file {}: {}", config.stats.display(), e))
        })?;

        let assets = self
            .fs_service
            .load_assets(&config.outdir, std::slice::from_ref(&config.stats))
            .await?;

        Logger::loaded_compilation(stats.groups.len(), assets.len());
        Ok(Compilation::new(assets, stats.groups))
    }

    /// Write the asset table to the output directory.
    ///
    /// Only assets that are new or changed since `loaded` are written. With
    /// `clean`, files missing from the table are deleted once every write
    /// has succeeded.
    async fn emit(&self, config: &BuildConfig, loaded: &AssetTable, compilation: &Compilation) -> Result<Emitted> {
        let _timer = Timer::start("Emitting assets");
        self.fs_service.create_directory(&config.outdir).await?;

        let mut output_files = Vec::with_capacity(compilation.assets.len());
        for asset in compilation.assets.iter() {
            let path = config.outdir.join(&asset.filename);
            if loaded.get(&asset.filename) != Some(asset) {
                self.fs_service.write_bytes(&path, &asset.content).await.map_err(|e| {
                    ShearsError::build_with_context(
                        format!("failed to write asset: {}", e),
                        ErrorContext::new().with_file(path.clone()),
                    )
                })?;
                Logger::wrote_file(&asset.filename, asset.size());
            }
            output_files.push(OutputFile {
                name: asset.filename.clone(),
                path,
                size: asset.size(),
            });
        }

        let mut deleted_files = Vec::new();
        if config.clean {
            for name in self.fs_service.list_files(&config.outdir).await? {
                let path = config.outdir.join(&name);
                if compilation.assets.contains(&name) || path == config.stats {
                    continue;
                }
                self.fs_service.remove_file(&path).await.map_err(|e| {
                    ShearsError::build_with_context(
                        format!("failed to delete stale file: {}", e),
                        ErrorContext::new().with_file(path.clone()),
                    )
                })?;
                Logger::removed_file(&name);
                deleted_files.push(path);
            }
            self.fs_service.remove_empty_dirs(&config.outdir).await?;
        }

        Ok(Emitted {
            output_files,
            deleted_files,
        })
    }

    async fn run_pass(&self, config: &BuildConfig, context: &PluginContext, start: Instant) -> Result<BuildResult> {
        let mut compilation = self.load_compilation(config).await?;
        let loaded = compilation.assets.clone();

        {
            let _timer = Timer::start("Processing assets");
            self.plugin_manager.process_assets(&mut compilation, context)?;
        }

        let emitted = self.emit(config, &loaded, &compilation).await?;

        Ok(BuildResult {
            success: true,
            output_files: emitted.output_files,
            pruned: self
                .pruner
                .as_ref()
                .and_then(|p| p.last_report())
                .unwrap_or_default(),
            deleted_files: emitted.deleted_files,
            errors: Vec::new(),
            build_time: start.elapsed(),
        })
    }
}

#[async_trait::async_trait]
impl BuildService for FinalizeService {
    async fn build(&mut self, config: &BuildConfig) -> Result<BuildResult> {
        let start = Instant::now();
        Logger::finalize_start(&config.relative_outdir(), &config.stats.display().to_string());

        // 🔌 PLUGIN HOOK: on_build_start
        let context = PluginContext::new(config.root.clone(), config.clone());
        Logger::debug(&format!(
            "Running finalize hooks for {} plugins: {}",
            self.plugin_manager.plugin_count(),
            self.plugin_manager.plugin_names().join(", ")
        ));
        self.plugin_manager.on_build_start(&context)?;

        match self.run_pass(config, &context, start).await {
            Ok(result) => {
                // 🔌 PLUGIN HOOK: on_build_end
                self.plugin_manager.on_build_end(&context, &result)?;
                Logger::debug(&format!("Finalize pass completed in {:.2?}", result.build_time));
                Ok(result)
            }
            Err(e) => {
                let failed = BuildResult {
                    success: false,
                    errors: vec![e.to_string()],
                    build_time: start.elapsed(),
                    ..Default::default()
                };
                if let Err(hook_error) = self.plugin_manager.on_build_end(&context, &failed) {
                    Logger::warn(&format!("on_build_end failed after an aborted pass: {}", hook_error));
                }
                Err(e)
            }
        }
    }
}
