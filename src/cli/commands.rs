use clap::{Parser, Subcommand};

use crate::db::SessionId;

#[derive(Parser)]
#[command(name = "chatrelay", version, about = "Chat relay for streamed LLM turns", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Override the config file path globally
    #[arg(short, long, global = true, default_value = "config.yaml")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Enter interactive CLI chat REPL mode
    Chat {
        /// The id of the session to connect to
        #[arg(short, long)]
        session: SessionId,
    },

    /// Manage chat sessions
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
pub enum SessionAction {
    /// Create a new session
    Create {
        #[arg(short, long, default_value = "Session")]
        name: String,
    },

    /// Print the messages of a session
    History {
        id: SessionId,
    },
}
