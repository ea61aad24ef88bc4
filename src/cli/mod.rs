pub mod commands;

use futures_util::StreamExt;
use std::io::{self, Write};
use std::sync::Arc;
use thiserror::Error;

use crate::chat::{ChatError, ChatService};
use crate::cli::commands::SessionAction;
use crate::config::AppConfig;
use crate::db::{ensure_schema, get_connection, service::DbService, DbPool, DbStore, SessionId, StoreError};
use crate::llm::{LlmError, ProviderFactory};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Chat(#[from] ChatError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Session {0} not found")]
    SessionNotFound(SessionId),
}

fn open_store(config: &AppConfig) -> Result<DbPool, CliError> {
    let pool = get_connection(&config.database).map_err(StoreError::from)?;
    {
        let conn = pool.lock().map_err(|_| StoreError::Poisoned)?;
        ensure_schema(&conn).map_err(StoreError::from)?;
    }
    Ok(pool)
}

/// Runs a `session` subcommand.
pub fn run_session(action: SessionAction, config_path: &str) -> Result<(), CliError> {
    let config = AppConfig::load(config_path)?;
    let pool = open_store(&config)?;
    let conn = pool.lock().map_err(|_| StoreError::Poisoned)?;

    match action {
        SessionAction::Create { name } => {
            let session = DbService::insert_session(&conn, &name)?;
            println!("Created Session: {} ({})", session.name, session.id);
        }
        SessionAction::History { id } => {
            if DbService::get_session(&conn, id)?.is_none() {
                return Err(CliError::SessionNotFound(id));
            }
            for m in DbService::get_history(&conn, id)? {
                println!("[{}] {}: {}", m.created_at, m.role.as_str().to_uppercase(), m.content);
            }
        }
    }
    Ok(())
}

/// Runs the terminal chat REPL against one session.
pub async fn run_chat(session_id: SessionId, config_path: &str) -> Result<(), CliError> {
    let config = AppConfig::load(config_path)?;
    run_repl(session_id, config).await
}

async fn run_repl(session_id: SessionId, config: AppConfig) -> Result<(), CliError> {
    let pool = open_store(&config)?;

    let session_exists = {
        let conn = pool.lock().map_err(|_| StoreError::Poisoned)?;
        DbService::get_session(&conn, session_id)?.is_some()
    };
    if !session_exists {
        return Err(CliError::SessionNotFound(session_id));
    }

    let llm = ProviderFactory::create_default(&config)?;
    let chat = ChatService::new(
        Arc::new(DbStore::new(pool)),
        llm,
        ProviderFactory::default_options(&config),
    );

    println!("--- Chatrelay Terminal Chat ---");
    println!("Connected to Session: {}", session_id);
    println!("Type /exit to quit.");
    println!("-------------------------------");

    loop {
        print!("\nUser> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let text = input.trim();

        if text.is_empty() {
            continue;
        }
        if text == "/exit" || text == "/quit" {
            break;
        }

        let mut turn = chat.start_turn(session_id, text).await?;

        print!("{}> ", chat.provider_name());
        io::stdout().flush()?;

        while let Some(chunk) = turn.next().await {
            match chunk {
                Ok(chunk) => {
                    print!("{}", chunk);
                    io::stdout().flush()?;
                }
                Err(e) => {
                    eprintln!("\nTurn failed: {}", e);
                    break;
                }
            }
        }
        println!();
    }

    Ok(())
}
