use actix_web::{web, App, HttpServer};
use chatrelay::chat::ChatService;
use chatrelay::cli::{
    commands::{Cli, Commands},
    run_chat, run_session,
};
use chatrelay::config::AppConfig;
use chatrelay::db::{self, DbStore};
use chatrelay::llm::ProviderFactory;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve => return serve(&cli.config).await,
        Commands::Session { action } => run_session(action, &cli.config),
        Commands::Chat { session } => run_chat(session, &cli.config).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn serve(config_path: &str) -> std::io::Result<()> {
    info!("Starting Chatrelay server...");

    let config = match AppConfig::load(config_path) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let db_pool = match db::get_connection(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            error!("Failed to open database: {}", e);
            std::process::exit(1);
        }
    };

    let schema_result = match db_pool.lock() {
        Ok(conn) => db::ensure_schema(&conn).map_err(|e| e.to_string()),
        Err(_) => Err("database lock poisoned".to_string()),
    };
    if let Err(e) = schema_result {
        error!("Failed to initialize database schema: {}", e);
        std::process::exit(1);
    }

    let llm_provider = match ProviderFactory::create_default(&config) {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to initialize LLM provider: {}", e);
            std::process::exit(1);
        }
    };

    let chat_service = ChatService::new(
        Arc::new(DbStore::new(db_pool.clone())),
        llm_provider,
        ProviderFactory::default_options(&config),
    );

    let host = config.server.host.clone();
    let port = config.server.port;

    info!("Server listening on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(chat_service.clone()))
            .configure(chatrelay::api::routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
