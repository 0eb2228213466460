use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;
use std::time::Instant;

pub struct Logger;

impl Logger {
    /// Install the global subscriber. `RUST_LOG` wins over the default filter.
    pub fn init(verbose: bool) {
        let default_filter = if verbose { "shears=debug" } else { "shears=info" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // A second init (tests, repeated CLI runs) is harmless
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init();
    }

    pub fn finalize_start(outdir: &str, stats: &str) {
        info!("✂️  Shears - Finalizing build output");
        info!("═══════════════════════════════════════");
        info!("📦 Output: {}", outdir);
        info!("📄 Stats: {}", stats);
    }

    pub fn loaded_compilation(groups: usize, assets: usize) {
        info!("📁 Loaded {} entries, {} assets", groups, assets);
    }

    pub fn pruned_group(group: &str, removed: &[String]) {
        info!("✂️  Pruned {} ({})", group, removed.join(", "));
    }

    pub fn removed_file(name: &str) {
        debug!("🗑️  Removed: {}", name);
    }

    pub fn wrote_file(name: &str, size: usize) {
        debug!("💾 Wrote: {} ({} bytes)", name, size);
    }

    pub fn info(msg: &str) {
        info!("{}", msg);
    }

    pub fn debug(msg: &str) {
        debug!("{}", msg);
    }

    pub fn error(msg: &str) {
        error!("❌ {}", msg);
    }

    pub fn warn(msg: &str) {
        warn!("⚠️  {}", msg);
    }
}

pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: &str) -> Self {
        debug!("⏱️  Starting: {}", name);
        Self {
            start: Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("⏱️  Completed: {} in {:.2?}", self.name, self.elapsed());
    }
}
