//! CLI command definitions and argument parsing.

use clap::{Args, Parser, Subcommand};
use scriptmind_domain::Category;
use std::path::PathBuf;

/// Scriptmind - Extract structured memories from movie scripts and chat about them.
#[derive(Debug, Parser)]
#[command(name = "scriptmind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (entries only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract memories from a movie script
    Extract(ExtractArgs),

    /// Print a stored memory file
    Show(ShowArgs),

    /// Ask one question about a processed script
    Ask(AskArgs),

    /// Chat interactively about a processed script
    Chat(ChatArgs),

    /// Manage the configuration file
    Config(ConfigArgs),
}

/// Provider settings that override the configuration file.
#[derive(Debug, Default, Args)]
pub struct ProviderArgs {
    /// Provider backend
    #[arg(long, value_enum)]
    pub provider: Option<ProviderArg>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,

    /// Endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key for OpenAI-compatible backends
    #[arg(long, env = "SCRIPTMIND_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Script file to process
    pub script: PathBuf,

    /// Write the memories to this file instead of the output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Chunk window in characters
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Overlap between consecutive chunks in characters
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Chunks extracted concurrently per category
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-call extraction timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Memory file written by `extract`
    pub memories: PathBuf,

    /// Only show one category
    #[arg(long, value_enum)]
    pub category: Option<CategoryArg>,
}

/// Arguments for the ask command.
#[derive(Debug, Parser)]
pub struct AskArgs {
    /// Memory file written by `extract`
    pub memories: PathBuf,

    /// Script the memories were extracted from
    #[arg(short, long)]
    pub script: PathBuf,

    /// The question
    pub question: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Arguments for the chat command.
#[derive(Debug, Parser)]
pub struct ChatArgs {
    /// Memory file written by `extract`
    pub memories: PathBuf,

    /// Script the memories were extracted from
    #[arg(short, long)]
    pub script: PathBuf,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Memory category argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CategoryArg {
    /// Facts, concepts, character traits, world building
    Semantic,
    /// Events, scenes, timeline, turning points
    Episodic,
    /// Skills, processes, behaviors, rules
    Procedural,
}

/// Provider backend argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProviderArg {
    /// Local Ollama server
    Ollama,
    /// OpenAI-compatible endpoint
    Openai,
    /// Offline mock
    Mock,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<CategoryArg> for Category {
    fn from(category: CategoryArg) -> Self {
        match category {
            CategoryArg::Semantic => Category::Semantic,
            CategoryArg::Episodic => Category::Episodic,
            CategoryArg::Procedural => Category::Procedural,
        }
    }
}

impl From<ProviderArg> for scriptmind_llm::ProviderKind {
    fn from(provider: ProviderArg) -> Self {
        match provider {
            ProviderArg::Ollama => scriptmind_llm::ProviderKind::Ollama,
            ProviderArg::Openai => scriptmind_llm::ProviderKind::OpenAi,
            ProviderArg::Mock => scriptmind_llm::ProviderKind::Mock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scriptmind_llm::ProviderKind;

    #[test]
    fn test_extract_command() {
        let cli = Cli::parse_from([
            "scriptmind",
            "extract",
            "matrix.txt",
            "-o",
            "out.json",
            "--chunk-size",
            "4000",
            "--concurrency",
            "4",
            "--provider",
            "mock",
        ]);
        match cli.command {
            Command::Extract(args) => {
                assert_eq!(args.script, PathBuf::from("matrix.txt"));
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
                assert_eq!(args.chunk_size, Some(4000));
                assert_eq!(args.overlap, None);
                assert_eq!(args.concurrency, Some(4));
                assert_eq!(args.provider.provider, Some(ProviderArg::Mock));
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["scriptmind", "show", "m.json", "--format", "json", "-vv", "--no-color"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert_eq!(cli.verbose, 2);
        assert!(cli.no_color);
    }

    #[test]
    fn test_show_category() {
        let cli = Cli::parse_from(["scriptmind", "show", "m.json", "--category", "episodic"]);
        match cli.command {
            Command::Show(args) => assert_eq!(args.category, Some(CategoryArg::Episodic)),
            _ => panic!("Expected Show command"),
        }
    }

    #[test]
    fn test_ask_command() {
        let cli = Cli::parse_from(["scriptmind", "ask", "m.json", "--script", "matrix.txt", "Who is Neo?"]);
        match cli.command {
            Command::Ask(args) => {
                assert_eq!(args.question, "Who is Neo?");
                assert_eq!(args.script, PathBuf::from("matrix.txt"));
            }
            _ => panic!("Expected Ask command"),
        }
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["scriptmind", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["scriptmind"]).is_err());
    }

    #[test]
    fn test_conversions() {
        let category: Category = CategoryArg::Procedural.into();
        assert_eq!(category, Category::Procedural);
        let kind: ProviderKind = ProviderArg::Openai.into();
        assert_eq!(kind, ProviderKind::OpenAi);
    }
}
