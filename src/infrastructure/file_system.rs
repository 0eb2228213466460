use crate::core::{interfaces::FileSystemService, models::*};
use crate::utils::{Result, ShearsError};
use std::path::{Path, PathBuf};
use tokio::fs;

pub struct TokioFileSystemService;

impl TokioFileSystemService {
    /// Every file below `dir`, depth first
    async fn walk(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let mut pending = vec![dir.to_path_buf()];

        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current).await
                .map_err(ShearsError::Io)?;

            while let Some(entry) = entries.next_entry().await
                .map_err(ShearsError::Io)? {

                let path = entry.path();
                let file_type = entry.file_type().await
                    .map_err(ShearsError::Io)?;

                if file_type.is_dir() {
                    pending.push(path);
                } else if file_type.is_file() {
                    files.push(path);
                }
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Asset name of `path` inside `dir`: relative, `/`-separated
pub fn asset_name(dir: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[async_trait::async_trait]
impl FileSystemService for TokioFileSystemService {
    async fn load_assets(&self, dir: &Path, exclude: &[PathBuf]) -> Result<AssetTable> {
        let mut table = AssetTable::new();
        if !dir.exists() {
            return Ok(table);
        }

        for path in self.walk(dir).await? {
            if exclude.iter().any(|e| e == &path) {
                continue;
            }
            let Some(name) = asset_name(dir, &path) else {
                continue;
            };
            let content = fs::read(&path).await
                .map_err(ShearsError::Io)?;
            table.insert(EmittedAsset::new(name, content));
        }

        Ok(table)
    }

    async fn list_files(&self, dir: &Path) -> Result<Vec<String>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        Ok(self
            .walk(dir)
            .await?
            .iter()
            .filter_map(|p| asset_name(dir, p))
            .collect())
    }

    async fn read_file(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).await
            .map_err(ShearsError::Io)
    }

    async fn write_bytes(&self, path: &Path, content: &[u8]) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            self.create_directory(parent).await?;
        }

        fs::write(path, content).await
            .map_err(ShearsError::Io)
    }

    async fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).await
            .map_err(ShearsError::Io)
    }

    async fn remove_empty_dirs(&self, dir: &Path) -> Result<()> {
        if !dir.exists() {
            return Ok(());
        }

        let mut dirs = Vec::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let mut entries = fs::read_dir(&current).await
                .map_err(ShearsError::Io)?;
            while let Some(entry) = entries.next_entry().await
                .map_err(ShearsError::Io)? {
                if entry.file_type().await.map_err(ShearsError::Io)?.is_dir() {
                    pending.push(entry.path());
                    dirs.push(entry.path());
                }
            }
        }

        // Deepest first so parents empty out after their children
        dirs.sort_by_key(|d| std::cmp::Reverse(d.components().count()));
        for d in dirs {
            let mut entries = fs::read_dir(&d).await
                .map_err(ShearsError::Io)?;
            if entries.next_entry().await.map_err(ShearsError::Io)?.is_none() {
                fs::remove_dir(&d).await
                    .map_err(ShearsError::Io)?;
            }
        }

        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).await
            .map_err(ShearsError::Io)
    }

    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
