//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Live-preview a single HTML file, styled with a shadcn theme and
/// utility classes generated from its current markup
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// HTML file to serve and watch
    #[arg(default_value = "index.html", value_hint = clap::ValueHint::FilePath)]
    pub file: PathBuf,

    /// Port number to listen on [default: 3000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Hostname or address to bind [default: 127.0.0.1]
    #[arg(short = 'H', long)]
    pub hostname: Option<String>,

    /// Color theme: gray, neutral, slate, stone, zinc [default: slate]
    #[arg(short, long)]
    pub theme: Option<String>,

    /// Config file path (default: sol.toml in the current directory, if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Coalesce bursts of file events into one reload, in milliseconds (0 = off)
    #[arg(long, value_name = "MS")]
    pub debounce: Option<u64>,

    /// Show debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}
