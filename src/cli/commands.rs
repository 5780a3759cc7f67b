use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `AsteronIris` recall - automatic and on-demand message retraction.
#[derive(Parser, Debug)]
#[command(name = "asteroniris-recall")]
#[command(author = "theonlyhennygod")]
#[command(version = "0.1.0")]
#[command(about = "Retract flagged bot replies and bulk-recall group messages.", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.asteroniris/recall.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate a text message against the configured recall policy
    Check {
        /// Group the message would be sent to
        #[arg(long)]
        group: Option<String>,

        /// Message text
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Print the effective configuration
    Config,

    /// Recall recent group messages through the OneBot endpoint
    Recall {
        /// Group to recall messages in
        #[arg(long)]
        group: String,

        /// User whose messages are recalled (repeatable)
        #[arg(long = "user")]
        users: Vec<String>,

        /// Bot account id, used as the target when no --user is given
        #[arg(long)]
        self_id: Option<String>,

        /// Number of recent messages to scan (default from config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}
