// src/cli/args.rs
use clap::Parser;
use std::path::PathBuf;

/// Flags win over their `CARDSMITH_*` environment variables, which win over
/// the config file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
pub struct Args {
    /// Path to TOML config file (optional)
    #[arg(short, long, value_name = "FILE", env = "CARDSMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, value_name = "HOST", env = "CARDSMITH_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, value_name = "PORT", env = "CARDSMITH_PORT")]
    pub port: Option<u16>,

    /// Text-generation executable, invoked as `<COMMAND> run <MODEL> <PROMPT>`
    #[arg(long, value_name = "COMMAND", env = "CARDSMITH_COMMAND")]
    pub command: Option<String>,

    /// Model name passed to the executable
    #[arg(short, long, value_name = "MODEL", env = "CARDSMITH_MODEL")]
    pub model: Option<String>,

    /// Kill the model process after this many seconds (0 = never)
    #[arg(short, long, value_name = "SECONDS", env = "CARDSMITH_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Reject model output that is not a list of [front, back] string pairs
    #[arg(long)]
    pub strict: bool,

    /// Write the effective configuration to FILE and exit
    #[arg(long, value_name = "FILE")]
    pub write_config: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
