use crate::core::models::*;
use crate::utils::Result;
use std::path::{Path, PathBuf};
use async_trait::async_trait;

/// File system operations interface
#[async_trait]
pub trait FileSystemService: Send + Sync {
    /// Load every file under `dir` as an asset named by its
    /// `/`-separated path relative to `dir`. Paths in `exclude` are skipped.
    async fn load_assets(&self, dir: &Path, exclude: &[PathBuf]) -> Result<AssetTable>;
    /// Relative names of every file under `dir`
    async fn list_files(&self, dir: &Path) -> Result<Vec<String>>;
    async fn read_file(&self, path: &Path) -> Result<String>;
    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()>;
    async fn remove_file(&self, path: &Path) -> Result<()>;
    /// Remove empty directories below `dir`, keeping `dir` itself
    async fn remove_empty_dirs(&self, dir: &Path) -> Result<()>;
    async fn create_directory(&self, path: &Path) -> Result<()>;
    fn file_exists(&self, path: &Path) -> bool;
}

/// Build service interface
#[async_trait]
pub trait BuildService: Send + Sync {
    async fn build(&mut self, config: &BuildConfig) -> Result<BuildResult>;
}
