//! Shears: the finalize stage of a web asset build.
//!
//! Runs after the bundler has emitted its output. Script files of
//! stylesheet-only entries are pruned, a manifest is written, stale
//! files are cleaned and a one-line summary is printed.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod plugins;
pub mod utils;

pub use crate::core::models::{
    AssetTable, BuildConfig, Compilation, EmittedAsset, OutputGroup, PruneConfig, PruneReport,
    RemovalBounds,
};
pub use crate::core::pruner::{prune, Pruner};
pub use crate::utils::{Result, ShearsError};
