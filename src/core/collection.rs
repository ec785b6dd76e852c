use std::io;
use std::path::{Path, PathBuf};

use futures_util::future::try_join_all;
use tracing::{debug, warn};

use crate::core::filter::{ExtensionFilter, retain_files};
use crate::error::{Error, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::models::{FileRecord, Removed};

/// Options for building a [`FileCollection`].
#[derive(Debug, Clone, Default)]
pub struct CollectionOptions {
    /// Directory every name is resolved against (None means the current
    /// working directory)
    pub base_directory: Option<PathBuf>,
    /// Extensions `list` and `all` admit, leading `.` included (empty means
    /// all extensions)
    pub allowed_extensions: Vec<String>,
}

type BaseDirectoryListener = Box<dyn Fn(&Path, &Path) + Send + Sync>;

/// A directory of files with asynchronous CRUD operations.
///
/// Nothing is cached: every operation goes back to the filesystem. The
/// extension allow-list only narrows `list` and `all`; every other
/// operation accepts any name. Multi-step operations (`rename`, `copy`,
/// `all`) never roll back side effects that completed before a failure.
pub struct FileCollection<F: FileSystem = RealFileSystem> {
    fs: F,
    base: PathBuf,
    extensions: ExtensionFilter,
    listeners: Vec<BaseDirectoryListener>,
}

impl FileCollection<RealFileSystem> {
    /// Collection over the host filesystem.
    pub fn open(options: CollectionOptions) -> Result<Self> {
        Self::with_fs(RealFileSystem, options)
    }
}

impl<F: FileSystem> FileCollection<F> {
    pub fn with_fs(fs: F, options: CollectionOptions) -> Result<Self> {
        let base = match options.base_directory {
            Some(dir) if dir.as_os_str().is_empty() => {
                return Err(Error::InvalidConstruction(
                    "base directory can't be blank".to_owned(),
                ));
            }
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|err| {
                Error::InvalidConstruction(format!(
                    "can't resolve current directory: {err}"
                ))
            })?,
        };
        let extensions = ExtensionFilter::new(options.allowed_extensions)?;

        debug!(base = %base.display(), extensions = ?extensions.extensions(), "collection created");
        Ok(Self {
            fs,
            base,
            extensions,
            listeners: Vec::new(),
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base
    }

    /// Point the collection at another directory.
    ///
    /// Registered listeners are called with `(new, old)` after the switch.
    pub fn set_base_directory(&mut self, directory: impl Into<PathBuf>) -> Result<&mut Self> {
        let directory = directory.into();
        if directory.as_os_str().is_empty() {
            return Err(Error::InvalidArgument(
                "directory name can't be blank".to_owned(),
            ));
        }

        let old = std::mem::replace(&mut self.base, directory);
        debug!(old = %old.display(), new = %self.base.display(), "base directory changed");
        for listener in &self.listeners {
            listener(&self.base, &old);
        }

        Ok(self)
    }

    /// Register a callback for base directory changes, invoked as
    /// `listener(new, old)`.
    pub fn on_base_directory_change<L>(&mut self, listener: L) -> &mut Self
    where
        L: Fn(&Path, &Path) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn allowed_extensions(&self) -> Vec<&str> {
        self.extensions.extensions()
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }

    /// Read a file together with its timestamps.
    ///
    /// The content read and the stat run concurrently. A failed read is
    /// reported ahead of a failed stat, and either one fails the call.
    pub async fn find(&self, name: &str) -> Result<FileRecord> {
        let path = self.resolve(name);
        debug!(name, path = %path.display(), "find");

        let (content, stat) = tokio::join!(self.fs.read_file(&path), self.fs.stat(&path));
        let content = content.map_err(|source| Error::from_io("read", &path, source))?;
        let stat = stat.map_err(|source| Error::from_io("stat", &path, source))?;

        Ok(FileRecord::new(name, content).with_stat(&stat))
    }

    /// Names of the regular files directly under the base directory that
    /// pass the extension allow-list, in enumeration order.
    pub async fn list(&self) -> Result<Vec<String>> {
        debug!(base = %self.base.display(), "list");
        let names = self
            .fs
            .read_dir(&self.base)
            .await
            .map_err(|source| Error::io("read_dir", &self.base, source))?;

        let candidates = self.extensions.apply(names);
        retain_files(&self.fs, &self.base, candidates).await
    }

    /// Every listed file, in `list` order.
    ///
    /// Reads run concurrently and the first failure fails the call; no
    /// partial result is returned.
    pub async fn all(&self) -> Result<Vec<FileRecord>> {
        let names = self.list().await?;
        debug!(count = names.len(), "all");
        try_join_all(names.iter().map(|name| self.find(name))).await
    }

    /// Create or fully overwrite a file. The record carries no timestamps.
    pub async fn write(&self, name: &str, data: impl AsRef<[u8]>) -> Result<FileRecord> {
        let path = self.resolve(name);
        let data = data.as_ref();
        debug!(name, path = %path.display(), len = data.len(), "write");

        self.fs
            .write_file(&path, data)
            .await
            .map_err(|source| Error::io("write", &path, source))?;

        Ok(FileRecord::new(name, data))
    }

    pub async fn destroy(&self, name: &str) -> Result<Removed> {
        let path = self.resolve(name);
        debug!(name, path = %path.display(), "destroy");

        self.fs
            .unlink(&path)
            .await
            .map_err(|source| Error::from_io("unlink", &path, source))?;

        Ok(Removed {
            id: name.to_owned(),
        })
    }

    /// Rename a file and return it as found under its new name.
    ///
    /// When the rename succeeds but the follow-up read fails, the rename
    /// stays in place and the read error is returned.
    pub async fn rename(&self, old_name: &str, new_name: &str) -> Result<FileRecord> {
        let from = self.resolve(old_name);
        let to = self.resolve(new_name);
        debug!(from = %from.display(), to = %to.display(), "rename");

        if let Err(source) = self.fs.rename(&from, &to).await {
            return Err(self.rename_error(&from, &to, source).await);
        }

        self.find(new_name).await.inspect_err(|err| {
            warn!(old_name, new_name, error = %err, "renamed file could not be read back");
        })
    }

    /// `NotFound` from a rename is only a missing source when the source is
    /// really gone; otherwise the destination was unusable.
    async fn rename_error(&self, from: &Path, to: &Path, source: io::Error) -> Error {
        if source.kind() == io::ErrorKind::NotFound && self.fs.stat(from).await.is_ok() {
            return Error::io("rename", to, source);
        }
        Error::from_io("rename", from, source)
    }

    /// Copy a file's content to another name.
    ///
    /// Not atomic: a failed write may leave a partial destination file.
    pub async fn copy(&self, source_name: &str, copy_name: &str) -> Result<FileRecord> {
        debug!(source_name, copy_name, "copy");
        let source = self.find(source_name).await?;
        self.write(copy_name, source.content).await
    }
}
