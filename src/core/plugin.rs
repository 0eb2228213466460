// Plugin system for the finalize pipeline
// Hooks run in registration order around one build pass

use crate::core::models::{BuildConfig, BuildResult, Compilation};
use crate::utils::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Context provided to plugins during execution
#[derive(Debug, Clone)]
pub struct PluginContext {
    /// Project root directory
    pub root: PathBuf,
    /// Current build configuration
    pub config: BuildConfig,
}

impl PluginContext {
    pub fn new(root: PathBuf, config: BuildConfig) -> Self {
        Self { root, config }
    }
}

/// Main plugin trait that all plugins must implement
///
/// Plugins can hook into three stages of a pass:
/// - Build start, before the compilation is loaded
/// - Asset processing, with exclusive access to the compilation
/// - Build end (success or failure)
pub trait Plugin: Send + Sync {
    /// Unique name for this plugin
    fn name(&self) -> &str;

    /// Called at the start of a pass
    ///
    /// Use this to validate configuration or reset per-pass state.
    fn on_build_start(&self, _context: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Called once all assets of the pass exist and before anything is
    /// written to disk
    ///
    /// An error aborts the pass; later plugins do not run.
    fn process_assets(&self, _compilation: &mut Compilation, _context: &PluginContext) -> Result<()> {
        Ok(())
    }

    /// Called at the end of a pass (success or failure)
    fn on_build_end(&self, _context: &PluginContext, _result: &BuildResult) -> Result<()> {
        Ok(())
    }
}

/// Manages plugin registration and execution
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create a new empty plugin manager
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Register a plugin
    pub fn register(&mut self, plugin: Arc<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Get number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Execute on_build_start hook for all plugins
    pub fn on_build_start(&self, context: &PluginContext) -> Result<()> {
        for plugin in &self.plugins {
            plugin.on_build_start(context)?;
        }
        Ok(())
    }

    /// Execute process_assets hooks for all plugins
    ///
    /// Each plugin sees the compilation as left by the previous one.
    pub fn process_assets(&self, compilation: &mut Compilation, context: &PluginContext) -> Result<()> {
        for plugin in &self.plugins {
            plugin.process_assets(compilation, context)?;
        }
        Ok(())
    }

    /// Execute on_build_end hook for all plugins
    pub fn on_build_end(&self, context: &PluginContext, result: &BuildResult) -> Result<()> {
        for plugin in &self.plugins {
            plugin.on_build_end(context, result)?;
        }
        Ok(())
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
