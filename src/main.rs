use clap::Parser;
use filesort::cli::{SortMode, run_cli};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sort files into destination folders using a filename pattern mapping.
#[derive(Parser)]
#[command(name = "filesort", version, about)]
struct Cli {
    /// Path to the JSON mapping file (pattern -> destination folder).
    #[arg(short, long)]
    mapping: PathBuf,

    /// Folders to sort, processed in order.
    #[arg(required = true)]
    folders: Vec<PathBuf>,

    /// After sorting, recursively relocate misplaced files to their
    /// correct folders.
    #[arg(long)]
    deep_audit: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mode = if cli.deep_audit {
        SortMode::DeepAudit
    } else {
        SortMode::Shallow
    };

    match run_cli(&cli.mapping, &cli.folders, mode) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
