mod entry;
mod record;

pub use entry::{EntryKind, FileStat};
pub use record::{FileRecord, Removed};
