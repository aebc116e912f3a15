use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use showtech_inventory::capture::DEFAULT_MAX_BYTES;
use showtech_inventory::registry::Category;

#[derive(Parser, Debug)]
#[command(name = "showtech-inventory")]
#[command(about = "Extract interface, ACL, trunk and CDP inventory from Cisco show-tech captures")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// List the command sections found in a capture.
    Sections(SectionsArgs),
    /// Guess the device type and platform family of a capture.
    Detect(DetectArgs),
    /// Extract inventory records from one or more captures.
    Extract(ExtractArgs),
}

#[derive(Parser, Debug)]
pub struct SectionsArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Refuse files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,
}

#[derive(Parser, Debug)]
pub struct DetectArgs {
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Refuse files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Capture files to process.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = CategoryArg::All)]
    pub category: CategoryArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
    /// Write `<hostname>.json` per capture into this directory.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Device type override, for example "Cisco NXOS" or "ios".
    #[arg(long)]
    pub hint: Option<String>,
    /// Column layout TOML for the brief tables. Defaults to the built-in layouts.
    #[arg(long)]
    pub layouts: Option<PathBuf>,
    /// Refuse files larger than this many bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BYTES)]
    pub max_bytes: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum CategoryArg {
    All,
    Interfaces,
    Acls,
    Trunks,
    Cdp,
}

impl CategoryArg {
    pub fn categories(self) -> Option<Vec<Category>> {
        match self {
            CategoryArg::All => None,
            CategoryArg::Interfaces => Some(vec![Category::Interfaces]),
            CategoryArg::Acls => Some(vec![Category::AccessLists]),
            CategoryArg::Trunks => Some(vec![Category::Trunks]),
            CategoryArg::Cdp => Some(vec![Category::Cdp]),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
