// Watch mode
// Re-runs the finalize pass whenever the bundler rewrites its stats file

use crate::core::models::BuildConfig;
use crate::core::interfaces::BuildService;
use crate::utils::{Result, Logger, ShearsError};
use notify::{Watcher, RecursiveMode, Event, EventKind, RecommendedWatcher};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Debounce delay in milliseconds
    pub debounce_ms: u64,
    /// Whether to clear console on rebuild
    pub clear_console: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 200,
            clear_console: false,
        }
    }
}

/// Watches the stats file and triggers a fresh pass on every change
pub struct ShearsWatcher {
    config: WatchConfig,
    build_config: BuildConfig,
}

impl ShearsWatcher {
    pub fn new(config: WatchConfig, build_config: BuildConfig) -> Self {
        Self {
            config,
            build_config,
        }
    }

    /// Run until Ctrl+C. Failed passes are logged and the session goes on.
    pub async fn watch<B: BuildService>(&self, build_service: &mut B) -> Result<()> {
        let stats = &self.build_config.stats;
        let watch_dir = stats
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        Logger::info("👀 Watch mode started - waiting for the bundler...");
        Logger::info(&format!("   Watching: {}", stats.display()));
        Logger::info("   Press Ctrl+C to stop");

        let (tx, rx) = channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                if let Ok(event) = res {
                    let _ = tx.send(event);
                }
            },
            notify::Config::default(),
        )?;

        // The bundler may replace the file, so watch its directory
        watcher.watch(watch_dir, RecursiveMode::NonRecursive)
            .map_err(|e| ShearsError::build(format!("Failed to watch {}: {}", watch_dir.display(), e)))?;

        if self.build_config.stats.exists() {
            Logger::info("🔨 Initial pass...");
            self.run_pass(build_service).await;
        }

        self.process_events(rx, build_service).await
    }

    /// Process file system events with debouncing
    async fn process_events<B: BuildService>(
        &self,
        rx: Receiver<Event>,
        build_service: &mut B,
    ) -> Result<()> {
        let mut pending = false;
        let mut last_change_time = Instant::now();
        let debounce_duration = Duration::from_millis(self.config.debounce_ms);

        // Spawn a task to handle Ctrl+C
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::mpsc::channel::<()>(1);
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            let _ = shutdown_tx.send(()).await;
        });

        loop {
            if shutdown_rx.try_recv().is_ok() {
                Logger::info("👋 Stopping watch mode...");
                break;
            }

            match rx.recv_timeout(Duration::from_millis(50)) {
                Ok(event) => {
                    if self.is_stats_event(&event) {
                        pending = true;
                        last_change_time = Instant::now();
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if pending && last_change_time.elapsed() >= debounce_duration {
                        pending = false;
                        self.trigger_rebuild(build_service).await;
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                    Logger::warn("Watch channel disconnected");
                    break;
                }
            }
        }

        Ok(())
    }

    async fn trigger_rebuild<B: BuildService>(&self, build_service: &mut B) {
        if self.config.clear_console {
            print!("\x1B[2J\x1B[1;1H");
        }

        Logger::info("🔄 Stats file changed, finalizing...");
        self.run_pass(build_service).await;
    }

    async fn run_pass<B: BuildService>(&self, build_service: &mut B) {
        let start = Instant::now();

        match build_service.build(&self.build_config).await {
            Ok(result) => {
                Logger::info(&format!(
                    "✅ Pass complete in {:.0}ms ({} files, {} pruned)",
                    start.elapsed().as_millis(),
                    result.output_files.len(),
                    result.pruned.removed_count()
                ));
            }
            Err(e) => {
                Logger::error(&e.format_detailed());
            }
        }
    }

    /// Events that touch the stats file, ignoring reads and metadata
    fn is_stats_event(&self, event: &Event) -> bool {
        if matches!(event.kind, EventKind::Access(_) | EventKind::Other) {
            return false;
        }

        let stats_name = self.build_config.stats.file_name();
        event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == stats_name)
    }
}
