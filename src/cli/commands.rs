use crate::core::{interfaces::*, services::*};
use crate::infrastructure::TokioFileSystemService;
use crate::utils::{CliOverrides, ConfigLoader, Logger, Result, ShearsWatcher, WatchConfig};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "shears")]
#[command(about = "Shears - finalize web build output: prune by-product entries, write the manifest")]
pub struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prune, write the manifest and clean the output directory
    Finalize {
        /// Project root directory
        #[arg(short, long, default_value = ".")]
        root: String,
        /// Config file (default: <root>/shears.config.json)
        #[arg(short, long)]
        config: Option<String>,
        /// Bundler stats file
        #[arg(short, long)]
        stats: Option<String>,
        /// Output directory
        #[arg(short, long)]
        outdir: Option<String>,
        /// Entry whose script output is removed (repeatable)
        #[arg(short, long = "prune", value_name = "ENTRY")]
        prune: Vec<String>,
        /// Public URL prefix for manifest values
        #[arg(long)]
        public_path: Option<String>,
        /// Do not write the manifest
        #[arg(long)]
        no_manifest: bool,
        /// Keep files the build no longer produces
        #[arg(long)]
        no_clean: bool,
        /// Development mode (no completion message)
        #[arg(long)]
        development: bool,
        /// Re-run whenever the stats file changes
        #[arg(short, long)]
        watch: bool,
    },
    /// Print an example shears.config.json
    Init,
    /// Show version information
    Info,
}

pub struct CliHandler;

impl CliHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn run(&self) -> Result<()> {
        let cli = Cli::parse();
        Logger::init(cli.verbose);

        match cli.command {
            Commands::Finalize {
                root,
                config,
                stats,
                outdir,
                prune,
                public_path,
                no_manifest,
                no_clean,
                development,
                watch,
            } => {
                let overrides = CliOverrides {
                    outdir,
                    stats,
                    public_path,
                    prune_entries: prune,
                    no_manifest,
                    no_clean,
                    development,
                };
                self.handle_finalize_command(&root, config.as_deref(), &overrides, watch).await
            }
            Commands::Init => {
                println!("{}", ConfigLoader::generate_example());
                Ok(())
            }
            Commands::Info => {
                self.handle_info_command();
                Ok(())
            }
        }
    }

    async fn handle_finalize_command(
        &self,
        root: &str,
        config_path: Option<&str>,
        overrides: &CliOverrides,
        watch: bool,
    ) -> Result<()> {
        let root = PathBuf::from(root);
        let file_config = match config_path {
            Some(path) => Some(ConfigLoader::load_from_path(&root.join(path))?),
            None => ConfigLoader::load_from_file(&root)?,
        };
        let config = ConfigLoader::merge_with_cli(file_config, root, overrides);

        if config.prune.targets.is_empty() {
            Logger::warn("No prune entries configured; only the manifest and cleanup will run");
        }

        let fs_service = Arc::new(TokioFileSystemService);
        let mut service = FinalizeService::from_config(fs_service, &config)?;

        if watch {
            let watcher = ShearsWatcher::new(WatchConfig::default(), config);
            return watcher.watch(&mut service).await;
        }

        let result = service.build(&config).await?;
        for group in &result.pruned.groups {
            Logger::debug(&format!("{}: removed {}", group.name, group.removed.join(", ")));
        }
        Ok(())
    }

    fn handle_info_command(&self) {
        tracing::info!("✂️  Shears v{}", env!("CARGO_PKG_VERSION"));
        tracing::info!("══════════════════════════════════════");
        tracing::info!("Finalize stage for web asset builds");
        tracing::info!("");
        tracing::info!("🎯 Steps, in order:");
        tracing::info!("  • Prune script output of stylesheet-only entries");
        tracing::info!("  • Write the asset manifest");
        tracing::info!("  • Clean stale files from the output directory");
        tracing::info!("  • Report the number of files written");
    }
}

impl Default for CliHandler {
    fn default() -> Self {
        Self::new()
    }
}
