mod real;

#[cfg(test)]
mod mock;

pub use real::RealFileSystem;

#[cfg(test)]
pub use mock::{MockFileSystem, Op};

use async_trait::async_trait;
use std::io;
use std::path::Path;

use crate::models::FileStat;

/// The filesystem primitives a collection is built on.
///
/// Implementations report a missing path as `io::ErrorKind::NotFound`.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;
    /// Creates the file or truncates it before writing.
    async fn write_file(&self, path: &Path, data: &[u8]) -> io::Result<()>;
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;
    async fn unlink(&self, path: &Path) -> io::Result<()>;
    async fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
    /// Names of the entries directly under `dir`.
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<String>>;
}
