use std::path::PathBuf;
use thiserror::Error;

/// Extra location details attached to build errors
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub file_path: Option<PathBuf>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }
}

#[derive(Error, Debug)]
pub enum ShearsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A pruned group produced an unexpected number of files.
    ///
    /// This means the bundler no longer emits what the prune configuration
    /// was written against, so the whole pass is aborted.
    #[error(
        "Entry \"{group}\" removed {} file(s), expected between {min} and {max}: [{}]",
        .matched.len(),
        .matched.join(", ")
    )]
    Prune {
        group: String,
        matched: Vec<String>,
        min: usize,
        max: usize,
    },

    #[error("Prune target \"{0}\" does not match any output group of this build")]
    MissingGroup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Stats error: {0}")]
    Stats(String),

    #[error("Build error: {message}")]
    Build {
        message: String,
        context: Option<ErrorContext>,
    },
}

impl ShearsError {
    /// Create a simple build error without context
    pub fn build(message: String) -> Self {
        Self::Build {
            message,
            context: None,
        }
    }

    /// Create a build error with context
    pub fn build_with_context(message: String, context: ErrorContext) -> Self {
        Self::Build {
            message,
            context: Some(context),
        }
    }

    pub fn config(message: String) -> Self {
        Self::Config(message)
    }

    pub fn stats(message: String) -> Self {
        Self::Stats(message)
    }

    /// True for errors caused by the prune configuration drifting away from
    /// the bundler's output
    pub fn is_configuration_drift(&self) -> bool {
        matches!(self, Self::Prune { .. } | Self::MissingGroup(_))
    }

    /// Format error with enhanced context display
    pub fn format_detailed(&self) -> String {
        match self {
            ShearsError::Build { message, context } => {
                let mut output = format!("❌ Build Error: {}", message);
                if let Some(ctx) = context {
                    if let Some(ref file_path) = ctx.file_path {
                        output.push_str(&format!("\n📁 File: {}", file_path.display()));
                    }
                }
                output
            }
            ShearsError::Prune { group, matched, min, max } => {
                let mut output = format!(
                    "❌ Prune Error: entry \"{}\" expected {}..={} removed files, found {}",
                    group,
                    min,
                    max,
                    matched.len()
                );
                for file in matched {
                    output.push_str(&format!("\n   • {}", file));
                }
                output.push_str("\n💡 The bundler output changed; review the prune configuration");
                output
            }
            _ => format!("❌ {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShearsError>;

impl From<regex::Error> for ShearsError {
    fn from(err: regex::Error) -> Self {
        ShearsError::config(format!("Invalid code pattern: {}", err))
    }
}

impl From<anyhow::Error> for ShearsError {
    fn from(err: anyhow::Error) -> Self {
        ShearsError::build(err.to_string())
    }
}

impl From<notify::Error> for ShearsError {
    fn from(err: notify::Error) -> Self {
        ShearsError::build(format!("Watcher error: {}", err))
    }
}
