// Prune Plugin: drops the script output of stylesheet-only entries

use crate::core::models::{Compilation, PruneConfig, PruneReport};
use crate::core::plugin::{Plugin, PluginContext};
use crate::core::pruner::Pruner;
use crate::utils::{Logger, Result};
use parking_lot::RwLock;

/// Finalize hook wrapping [`Pruner`]
///
/// # Example
/// ```
/// use shears::plugins::PrunePlugin;
/// use shears::core::models::PruneConfig;
/// use shears::core::services::FinalizeService;
/// use shears::infrastructure::TokioFileSystemService;
/// use std::sync::Arc;
///
/// let plugin = PrunePlugin::new(&PruneConfig::new(["css/app"])).unwrap();
/// let service = FinalizeService::new(Arc::new(TokioFileSystemService))
///     .with_plugin(Arc::new(plugin));
/// ```
pub struct PrunePlugin {
    pruner: Pruner,
    last_report: RwLock<Option<PruneReport>>,
}

impl PrunePlugin {
    pub fn new(config: &PruneConfig) -> Result<Self> {
        Ok(Self {
            pruner: Pruner::new(config)?,
            last_report: RwLock::new(None),
        })
    }

    /// Report of the most recent successful pass
    pub fn last_report(&self) -> Option<PruneReport> {
        self.last_report.read().clone()
    }
}

impl Plugin for PrunePlugin {
    fn name(&self) -> &str {
        "prune-plugin"
    }

    fn on_build_start(&self, _context: &PluginContext) -> Result<()> {
        *self.last_report.write() = None;
        Ok(())
    }

    fn process_assets(&self, compilation: &mut Compilation, _context: &PluginContext) -> Result<()> {
        if self.pruner.targets().is_empty() {
            Logger::debug("No prune targets configured");
            return Ok(());
        }

        let report = self.pruner.prune(compilation)?;
        Logger::debug(&format!(
            "Prune plugin removed {} files from {} entries",
            report.removed_count(),
            report.groups.len()
        ));
        *self.last_report.write() = Some(report);
        Ok(())
    }
}
