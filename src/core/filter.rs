use std::collections::HashSet;
use std::path::Path;

use futures_util::future::try_join_all;
use tracing::trace;

use crate::error::{Error, Result};
use crate::fs::FileSystem;

/// Allow-list of file extensions, each stored with its leading `.`.
///
/// Matching is exact and case sensitive: `.md` does not admit `NOTE.MD`.
/// An empty allow-list admits every name.
#[derive(Clone, Debug, Default)]
pub struct ExtensionFilter {
    allowed: HashSet<String>,
}

impl ExtensionFilter {
    /// Returns `InvalidConstruction` for an entry that is empty or lacks
    /// the leading `.`.
    pub fn new<I, S>(extensions: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut allowed = HashSet::new();
        for extension in extensions {
            let extension = extension.into();
            if extension.is_empty() {
                return Err(Error::InvalidConstruction(
                    "allowed extension can't be blank".to_owned(),
                ));
            }
            if !extension.starts_with('.') {
                return Err(Error::InvalidConstruction(format!(
                    "allowed extension {extension:?} must start with '.'"
                )));
            }
            allowed.insert(extension);
        }

        Ok(Self { allowed })
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Allowed extensions in sorted order.
    pub fn extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        extensions.sort_unstable();
        extensions
    }

    #[inline]
    pub fn allows(&self, name: &str) -> bool {
        if self.is_empty() {
            return true;
        }

        match extension_of(name) {
            Some(extension) => self.allowed.contains(&extension),
            None => false,
        }
    }

    pub fn apply(&self, names: Vec<String>) -> Vec<String> {
        if self.is_empty() {
            return names;
        }

        names
            .into_iter()
            .filter(|name| {
                let keep = self.allows(name);
                trace!(name = %name, keep, "extension filter");
                keep
            })
            .collect()
    }
}

/// Extension of `name` from its last `.`, leading dot included.
///
/// Dotfiles such as `.gitignore` have no extension; a trailing dot yields
/// `"."`.
pub fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|extension| format!(".{}", extension.to_string_lossy()))
}

/// Keep only the names under `base` that are regular files.
///
/// Every candidate is stat'ed concurrently; enumeration order is kept.
/// Any stat failure, including a vanished entry, fails the whole call.
pub async fn retain_files<F: FileSystem>(
    fs: &F,
    base: &Path,
    names: Vec<String>,
) -> Result<Vec<String>> {
    let stats = try_join_all(names.iter().map(|name| async move {
        let path = base.join(name);
        fs.stat(&path)
            .await
            .map_err(|source| Error::io("stat", path, source))
    }))
    .await?;

    Ok(names
        .into_iter()
        .zip(stats)
        .filter(|(name, stat)| {
            trace!(name = %name, kind = ?stat.kind, "kind filter");
            stat.is_file()
        })
        .map(|(name, _)| name)
        .collect())
}
