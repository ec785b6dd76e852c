use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "filebin")]
#[command(about = "Manage the files of a directory as a collection", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Base directory (defaults to current directory)
    #[arg(short, long, env = "FILEBIN_DIR", global = true)]
    pub dir: Option<PathBuf>,

    /// Extension admitted by list and all, leading dot included (repeatable)
    #[arg(
        short,
        long = "ext",
        env = "FILEBIN_EXTENSIONS",
        value_delimiter = ',',
        global = true
    )]
    pub extensions: Vec<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "FILEBIN_LOG_LEVEL", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the names of the files in the collection
    List,
    /// Print every file in the collection with its content
    All,
    /// Print the content of a file
    Find { name: String },
    /// Write CONTENT (or stdin) to a file, replacing it
    Write {
        name: String,
        content: Option<String>,
    },
    /// Delete a file
    Destroy { name: String },
    /// Rename a file
    Rename { old: String, new: String },
    /// Copy a file to a new name
    Copy { source: String, copy: String },
}
