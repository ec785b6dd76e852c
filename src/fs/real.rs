use async_trait::async_trait;
use std::io;
use std::path::Path;
use tokio::{fs, task};

use crate::models::{EntryKind, FileStat};

use super::FileSystem;

/// `FileSystem` backed by the host OS through tokio.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFileSystem;

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path).await
    }

    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        fs::write(path, data).await
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let metadata = fs::metadata(path).await?;
        let file_type = metadata.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };

        Ok(FileStat {
            kind,
            modified: metadata.modified().ok(),
            created: metadata.created().ok(),
            accessed: metadata.accessed().ok(),
        })
    }

    async fn unlink(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to).await
    }

    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let dir = dir.to_path_buf();
        task::spawn_blocking(move || {
            let mut names = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                names.push(entry?.file_name().to_string_lossy().into_owned());
            }
            // Sorted so listings do not depend on the host's enumeration order.
            names.sort();
            Ok(names)
        })
        .await
        .map_err(io::Error::other)?
    }
}
