// Completion Plugin: one status line per successful build

use crate::core::models::BuildResult;
use crate::core::plugin::{Plugin, PluginContext};
use crate::utils::{Logger, Result};
use colored::*;
use parking_lot::RwLock;

/// Prints `"<n> files written to <outdir>"` after each successful build.
///
/// The message list is replaced on every run, so a watch session shows the
/// count of the latest build only.
pub struct CompletionPlugin {
    output_path: String,
    messages: RwLock<Vec<String>>,
    quiet: bool,
}

impl CompletionPlugin {
    /// `output_path` is shown as is, usually relative to the project root
    pub fn new(output_path: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            messages: RwLock::new(Vec::new()),
            quiet: false,
        }
    }

    /// Keep messages without printing them
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.read().clone()
    }

    fn format_message(&self, count: usize) -> String {
        format!("{} files written to {}", count, self.output_path)
    }

    fn print_message(&self, count: usize) {
        println!();
        println!(
            "  {} {} files written to {}",
            "✔".bright_green(),
            count.to_string().yellow(),
            self.output_path.yellow()
        );
        println!();
    }
}

impl Plugin for CompletionPlugin {
    fn name(&self) -> &str {
        "completion-plugin"
    }

    fn on_build_end(&self, _context: &PluginContext, result: &BuildResult) -> Result<()> {
        if !result.success {
            self.messages.write().clear();
            Logger::warn(&format!("Build failed with {} error(s)", result.errors.len()));
            return Ok(());
        }

        let count = result.output_files.len();
        *self.messages.write() = vec![self.format_message(count)];

        if !self.quiet {
            self.print_message(count);
        }
        Ok(())
    }
}
