use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::factory::NoMatchPolicy;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,           // global --quiet
    pub no_color: bool,        // global --no-color
    pub rules: Option<PathBuf>, // global --rules, wins over config
}

#[derive(Parser)]
#[command(name = "pathhdr")]
#[command(about = "Classify locale data paths into Section/Page/Header/Code and sort them for display")]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress spinners and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Rule table file to use instead of the embedded one
    #[arg(long, global = true, value_name = "FILE")]
    pub rules: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify individual paths
    Classify(ClassifyArgs),

    /// Classify a list of paths and print them in display order
    Sort(SortArgs),

    /// Show classified paths as a Section/Page/Header/Code tree
    Tree(SortArgs),

    /// List rules with their hit counts
    Rules(RulesArgs),

    /// Initialize a pathheader.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated lines
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// Aligned table
    Table,
}

#[derive(Parser)]
pub struct ClassifyArgs {
    /// Paths to classify
    #[arg(required = true)]
    pub paths: Vec<String>,

    /// Stored value for the path(s); `∅∅∅` marks the item hidden
    #[arg(long)]
    pub value: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Args, Clone)]
pub struct InputArgs {
    /// File with one path per line; `-` or omitted reads stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// What to do with paths no rule matches (overrides config)
    #[arg(long, value_enum)]
    pub no_match: Option<NoMatchPolicy>,
}

#[derive(Parser)]
pub struct SortArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Classify these paths first so hit counts mean something
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Only list rules that matched nothing
    #[arg(long)]
    pub unused: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Force stdout even when --out-dir is given
    #[arg(long)]
    pub stdout: bool,
}
