use std::time::SystemTime;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

/// Metadata the collection consumes from a `stat` call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub modified: Option<SystemTime>,
    pub created: Option<SystemTime>,
    pub accessed: Option<SystemTime>,
}

impl FileStat {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}
