use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use keystore_codec::DocumentFormat;

#[derive(Parser)]
#[command(
    name = "keystore",
    about = "Inspect and edit an interlocked keystore rooted in a host directory",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Host directory standing in for the device filesystem
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// TOML file with path, format and declared defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Device path of the document, overriding the config file
    #[arg(long, global = true)]
    pub file: Option<String>,

    /// Document format, overriding the config file
    #[arg(long, global = true)]
    pub format: Option<DocumentFormat>,

    /// Declare an extra default as KEY=VALUE
    #[arg(short = 'd', long = "default", global = true)]
    pub defaults: Vec<String>,

    #[arg(long, global = true, value_enum, default_value = "disabled")]
    pub interlock: InterlockArg,

    /// Suppress operator diagnostics
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Interlock sources available on a host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum InterlockArg {
    /// No interlock: never remount, saves are refused.
    None,
    /// Interlock explicitly disabled: storage is writable.
    Disabled,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the live store
    Show,
    /// Print one value
    Get(GetArgs),
    /// Set values and save
    Set(SetArgs),
    /// Remove keys and save
    Remove(RemoveArgs),
}

#[derive(Args)]
pub struct GetArgs {
    pub key: String,
}

#[derive(Args)]
pub struct SetArgs {
    /// KEY=VALUE assignments
    #[arg(required = true)]
    pub assignments: Vec<String>,
}

#[derive(Args)]
pub struct RemoveArgs {
    #[arg(required = true)]
    pub keys: Vec<String>,
}
