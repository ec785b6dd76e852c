use std::borrow::Cow;
use std::time::SystemTime;

use super::FileStat;

/// A file as returned by the read and write operations of a collection.
///
/// `id` is always the name the caller passed in, never a resolved path.
/// Timestamps are only present when the producing operation also stat'ed
/// the file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileRecord {
    pub id: String,
    pub content: Vec<u8>,
    pub last_modified: Option<SystemTime>,
    pub birth_time: Option<SystemTime>,
    pub last_accessed: Option<SystemTime>,
}

impl FileRecord {
    pub fn new(id: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            last_modified: None,
            birth_time: None,
            last_accessed: None,
        }
    }

    pub fn with_stat(mut self, stat: &FileStat) -> Self {
        self.last_modified = stat.modified;
        self.birth_time = stat.created;
        self.last_accessed = stat.accessed;
        self
    }

    /// Content decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Confirmation returned by `destroy`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Removed {
    pub id: String,
}
