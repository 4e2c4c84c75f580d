use clap::{Args, Parser, Subcommand};
use gh_namecheck::Category;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gh-namecheck",
    version,
    about = "Check GitHub username availability and generate candidates from seed letters"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate candidate usernames from permutations of seed letters
    Generate {
        /// Letters to permute
        seed: String,

        /// Length of each candidate
        #[arg(short, long, default_value_t = 5)]
        length: usize,

        /// Write candidates to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Check candidates for availability
    Check(CheckArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// File with one username per line
    #[arg(short, long, conflicts_with = "seed", required_unless_present = "seed")]
    pub file: Option<PathBuf>,

    /// Generate candidates from these letters instead of reading a file
    #[arg(short, long)]
    pub seed: Option<String>,

    /// Candidate length when generating from a seed
    #[arg(short, long, default_value_t = 5)]
    pub length: usize,

    /// Number of probes in flight at once
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Base URL profiles are probed under
    #[arg(long)]
    pub base_url: Option<String>,

    /// Accept invalid TLS certificates (testing only)
    #[arg(long)]
    pub insecure: bool,

    /// Drop candidates GitHub would never accept as usernames
    #[arg(long)]
    pub skip_invalid: bool,

    /// Export every non-empty category into this directory
    #[arg(short, long)]
    pub export_dir: Option<PathBuf>,

    /// Export one category to a file, e.g. `available=free.txt` (repeatable)
    #[arg(long = "export", value_name = "CATEGORY=PATH", value_parser = parse_export)]
    pub exports: Vec<(Category, PathBuf)>,

    /// Write a JSON report of all results
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

fn parse_export(value: &str) -> Result<(Category, PathBuf), String> {
    let (category, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=PATH, got '{}'", value))?;
    if path.trim().is_empty() {
        return Err(format!("missing file path for '{}'", category));
    }
    let category = category.parse::<Category>().map_err(|e| e.to_string())?;
    Ok((category, PathBuf::from(path)))
}
