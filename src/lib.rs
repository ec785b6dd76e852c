//! A directory of files exposed as an asynchronous collection.
//!
//! [`FileCollection`] binds a base directory and an optional extension
//! allow-list, and offers `find`, `list`, `all`, `write`, `destroy`,
//! `rename` and `copy` over the files directly beneath it.

pub mod core;
pub mod error;
pub mod fs;
pub mod models;

pub use crate::core::{CollectionOptions, FileCollection};
pub use error::{Error, Result};
pub use models::{FileRecord, Removed};
