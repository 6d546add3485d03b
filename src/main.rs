use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use humansize::{BINARY, format_size};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

use subpeek::{ArchivePreviewResult, ArchivePreviewer, ArchiveType, PreviewConfig, print_line};

/// List the contents of zip and tar(.gz) submissions without extracting them
#[derive(Parser, Debug)]
#[command(name = "subpeek", version)]
struct Cli {
    /// Archives to preview
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Print each result as a JSON line
    #[arg(long)]
    json: bool,

    /// Detect the format from this name instead of the file name
    #[arg(long)]
    name: Option<String>,

    /// Largest archive to read, in bytes
    #[arg(long, value_name = "BYTES")]
    max_size: Option<u64>,

    /// Largest decompressed tar stream to inflate, in bytes
    #[arg(long, value_name = "BYTES")]
    max_decompressed: Option<u64>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> PreviewConfig {
        let mut config = PreviewConfig::default();
        if let Some(bytes) = self.max_size {
            config = config.with_max_archive_size(bytes);
        }
        if let Some(bytes) = self.max_decompressed {
            config = config.with_max_decompressed_size(bytes);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let previewer = ArchivePreviewer::new(cli.config());
    let mut failed = false;

    for path in &cli.files {
        if let Err(e) = preview_one(&previewer, &cli, path).await {
            tracing::debug!("Preview failed: {:?}", e);
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            failed = true;
        }
    }

    if failed {
        std::process::exit(1);
    }
    Ok(())
}

async fn preview_one(previewer: &ArchivePreviewer, cli: &Cli, path: &Path) -> Result<()> {
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .len();

    let result = match &cli.name {
        Some(name) => previewer.preview_file_as(path, name).await,
        None => previewer.preview_file(path).await,
    }
    .with_context(|| format!("Failed to preview {}", path.display()))?;

    if cli.json {
        print_line!("{}", serde_json::to_string(&result)?);
        return Ok(());
    }

    print_listing(path, size, &result)
}

fn print_listing(path: &Path, size: u64, result: &ArchivePreviewResult) -> Result<()> {
    let kind = match result.archive_type {
        ArchiveType::Zip => "zip".green(),
        ArchiveType::Tar => "tar".green(),
        ArchiveType::Unsupported => "unsupported".yellow(),
    };
    print_line!(
        "{} ({}) [{}]",
        path.display().to_string().bold(),
        format_size(size, BINARY),
        kind
    );

    if !result.is_supported() {
        print_line!("  no preview available for this file type");
        return Ok(());
    }

    for entry in &result.entries {
        if entry.is_dir {
            print_line!("  {}", entry.path.blue().bold());
        } else {
            print_line!("  {}", entry.path);
        }
    }

    print_line!(
        "{} directories, {} files",
        result.dirs().count(),
        result.files().count()
    );
    Ok(())
}
