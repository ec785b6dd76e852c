mod collection;
pub mod filter;

pub use collection::{CollectionOptions, FileCollection};
