//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for turn results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Assistant reply plus a quote summary
    Text,
    /// Assistant reply only
    Reply,
    /// Full turn output (text, history, termination) as JSON
    Json,
}

/// CLI arguments for arkcutt
#[derive(Parser, Debug)]
#[command(name = "arkcutt")]
#[command(author, version, about = "Laser-cutting quote assistant")]
#[command(long_about = r#"
ArkCutt answers laser-cutting quote requests. A chat model drives a small
set of tools: DXF analysis, material catalogs, pricing, delivery
estimates and text-to-DXF generation. A quote is only computed after the
design file has been analyzed.

Configuration files are loaded from (later wins):
1. ~/.config/arkcutt/config.toml   Global config
2. ./arkcutt.toml or ./.arkcutt.toml   Project-level config
3. --config <path>     Explicit config file
4. ARKCUTT_* environment variables (ARKCUTT_TURN__MAX_STEPS=4)

Example:
  arkcutt "Quote this box in 3mm DM" --file box.dxf
  arkcutt --request turn.json --output json
  arkcutt --chat
"#)]
pub struct Cli {
    /// Message to send (not required in chat or request mode)
    pub message: Option<String>,

    /// Attach a DXF file to the message (can be specified multiple times)
    #[arg(short, long, value_name = "PATH")]
    pub file: Vec<PathBuf>,

    /// Run a JSON turn request (`{"messages": [...]}`), `-` for stdin
    #[arg(long, value_name = "PATH", conflicts_with_all = ["message", "chat"])]
    pub request: Option<PathBuf>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Chat model override
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Step ceiling override
    #[arg(long, value_name = "N")]
    pub max_steps: Option<usize>,

    /// Run the tool calls of one batch one after another
    #[arg(long)]
    pub sequential: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the effective config, then exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_with_files() {
        let cli = Cli::try_parse_from([
            "arkcutt",
            "Quote this",
            "--file",
            "box.dxf",
            "-f",
            "lid.dxf",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.message.as_deref(), Some("Quote this"));
        assert_eq!(cli.file.len(), 2);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.output, OutputFormat::Text);
    }

    #[test]
    fn test_request_conflicts_with_chat() {
        assert!(Cli::try_parse_from(["arkcutt", "--request", "turn.json", "--chat"]).is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "arkcutt",
            "--chat",
            "--model",
            "gpt-4o-mini",
            "--max-steps",
            "3",
            "--sequential",
            "-o",
            "json",
        ])
        .unwrap();
        assert!(cli.chat);
        assert_eq!(cli.max_steps, Some(3));
        assert!(cli.sequential);
        assert_eq!(cli.output, OutputFormat::Json);
    }
}
