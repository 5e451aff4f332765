//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for one-shot answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One colored section per provider
    Text,
    /// The provider map as JSON, as the HTTP API returns it
    Json,
}

/// CLI arguments for ai-fiesta
#[derive(Parser, Debug)]
#[command(name = "fiesta")]
#[command(author, version, about = "Ask several LLM providers at once and compare their answers")]
#[command(long_about = r#"
AI Fiesta sends one message to several LLM providers in parallel (Gemini,
Groq, OpenRouter and Qwen via OpenRouter) and shows every answer side by side.
A provider that fails only loses its own slot.

Configuration files are loaded from (in priority order):
1. FIESTA_* environment variables (FIESTA_SERVER__BIND=0.0.0.0:8080)
2. --config <path>     Explicit config file
3. ./fiesta.toml       Project-level config
4. ~/.config/ai-fiesta/config.toml   Global config

Provider keys are read from GEMINI_API_KEY, GROQ_API_KEY and OPENROUTER_API_KEY.

Example:
  fiesta serve --bind 127.0.0.1:3000
  fiesta chat
  fiesta chat --remote http://127.0.0.1:3000
  fiesta ask "What's the best way to handle errors in Rust?"
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP API (POST /api/chat, GET /api/models, GET /health)
    Serve {
        /// Address to listen on (overrides [server] bind)
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,

        /// Also write logs to a daily rolling file in this directory
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Interactive chat with a per-session message quota
    Chat {
        /// Send messages to a running server instead of calling providers directly
        #[arg(long, value_name = "URL")]
        remote: Option<String>,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,

        /// Forget any saved session and start fresh
        #[arg(long)]
        fresh: bool,
    },

    /// Ask one question and print every provider's answer
    Ask {
        /// The message to send
        message: String,

        /// Send the message to a running server instead of calling providers directly
        #[arg(long, value_name = "URL")]
        remote: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,

        /// Suppress progress indicators
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the model catalog
    Models,
}
