//! CLI argument definitions for the fieldmap tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use fieldmap_core::MappingStrategy;

#[derive(Parser)]
#[command(
    name = "fieldmap",
    version,
    about = "Propose field mappings between two JSON documents",
    long_about = "Propose field-level mapping rules between a source and a target JSON document.\n\n\
                  Fields are paired by exact name, then by an optional semantic oracle, then by\n\
                  fuzzy name and type similarity. Each rule carries a confidence score."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate mapping rules from SOURCE to TARGET.
    Map(MapArgs),

    /// Print the schema tree inferred from a JSON document.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct MapArgs {
    /// Source JSON document.
    #[arg(value_name = "SOURCE")]
    pub source: PathBuf,

    /// Target JSON document.
    #[arg(value_name = "TARGET")]
    pub target: PathBuf,

    /// TOML file with [matching], [limits] and [synonyms] sections.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rule generator (overrides the config file).
    #[arg(long = "strategy", value_enum)]
    pub strategy: Option<StrategyArg>,

    /// External command used as the semantic oracle.
    ///
    /// The command line is split on whitespace and run without a shell. It
    /// receives the matching prompt on stdin and must print `source:target`
    /// pairs, one per line, on stdout. A failing command only disables the
    /// semantic tier for that level.
    #[arg(long = "oracle-command", value_name = "CMD")]
    pub oracle_command: Option<String>,

    /// Drop oracle pairs that name unknown fields or reuse a target.
    #[arg(long = "validate-oracle")]
    pub validate_oracle: bool,

    /// How to print the result on stdout.
    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,

    /// Write the configuration as JSON to FILE instead of stdout.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// JSON document to inspect.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Config file providing [limits].
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long = "format", value_enum, default_value = "table")]
    pub format: OutputFormatArg,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum OutputFormatArg {
    Json,
    Table,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum StrategyArg {
    Tiered,
    Structural,
}

impl From<StrategyArg> for MappingStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Tiered => Self::Tiered,
            StrategyArg::Structural => Self::Structural,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
