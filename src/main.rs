mod cli;

use std::io::{self, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use filebin::{CollectionOptions, FileCollection};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("filebin: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let files = FileCollection::open(CollectionOptions {
        base_directory: cli.dir,
        allowed_extensions: cli.extensions,
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List => {
            for name in files.list().await? {
                writeln!(out, "{name}")?;
            }
        }
        Command::All => {
            for record in files.all().await? {
                writeln!(out, "==> {} <==", record.id)?;
                out.write_all(&record.content)?;
                if !record.content.ends_with(b"\n") {
                    writeln!(out)?;
                }
            }
        }
        Command::Find { name } => {
            let record = files.find(&name).await?;
            out.write_all(&record.content)?;
        }
        Command::Write { name, content } => {
            let data = match content {
                Some(content) => content.into_bytes(),
                None => {
                    let mut buf = Vec::new();
                    io::stdin()
                        .read_to_end(&mut buf)
                        .context("failed to read content from stdin")?;
                    buf
                }
            };
            let record = files.write(&name, data).await?;
            writeln!(out, "{}", record.id)?;
        }
        Command::Destroy { name } => {
            let removed = files.destroy(&name).await?;
            writeln!(out, "{}", removed.id)?;
        }
        Command::Rename { old, new } => {
            let record = files.rename(&old, &new).await?;
            writeln!(out, "{}", record.id)?;
        }
        Command::Copy { source, copy } => {
            let record = files.copy(&source, &copy).await?;
            writeln!(out, "{}", record.id)?;
        }
    }

    out.flush()?;
    Ok(())
}
