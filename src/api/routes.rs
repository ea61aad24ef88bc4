use actix_web::{get, post, web, HttpResponse, Result as WebResult};
use chrono::SecondsFormat;
use std::fmt::Display;
use tracing::error;

use crate::api::models::{ChatHistoryRequest, PromptRequest};
use crate::api::sse::turn_body;
use crate::chat::{ChatError, ChatService};
use crate::db::{service::DbService, DbPool, SessionId, StoreError};

pub const DEFAULT_SESSION_NAME: &str = "Session";

fn internal_error(e: impl Display) -> HttpResponse {
    error!("Request failed: {}", e);
    HttpResponse::InternalServerError().body(e.to_string())
}

fn session_exists(pool: &DbPool, id: SessionId) -> Result<bool, StoreError> {
    let conn = pool.lock().map_err(|_| StoreError::Poisoned)?;
    Ok(DbService::get_session(&conn, id)?.is_some())
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"status": "healthy"}))
}

#[get("/create-new-chat-session")]
pub async fn create_new_chat_session(pool: web::Data<DbPool>) -> WebResult<HttpResponse> {
    let conn = match pool.lock() {
        Ok(conn) => conn,
        Err(_) => return Ok(internal_error(StoreError::Poisoned)),
    };

    match DbService::insert_session(&conn, DEFAULT_SESSION_NAME) {
        Ok(session) => Ok(HttpResponse::Ok().json(session.id)),
        Err(e) => Ok(internal_error(e)),
    }
}

#[post("/prompt-llm-response")]
pub async fn prompt_llm_response(
    pool: web::Data<DbPool>,
    chat: web::Data<ChatService>,
    req: web::Json<PromptRequest>,
) -> WebResult<HttpResponse> {
    let req = req.into_inner();

    match session_exists(&pool, req.session_id) {
        Ok(true) => {}
        Ok(false) => return Ok(HttpResponse::NotFound().body("Session not found")),
        Err(e) => return Ok(internal_error(e)),
    }

    let turn = match chat.start_turn(req.session_id, &req.message).await {
        Ok(turn) => turn,
        Err(e @ ChatError::Llm(_)) => {
            error!("Could not open LLM stream: {}", e);
            return Ok(HttpResponse::BadGateway().body(e.to_string()));
        }
        Err(e) => return Ok(internal_error(e)),
    };

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(turn_body(turn)))
}

#[post("/get-chat-history")]
pub async fn get_chat_history(
    pool: web::Data<DbPool>,
    req: web::Json<ChatHistoryRequest>,
) -> WebResult<HttpResponse> {
    let conn = match pool.lock() {
        Ok(conn) => conn,
        Err(_) => return Ok(internal_error(StoreError::Poisoned)),
    };

    match DbService::get_session(&conn, req.session_id) {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(HttpResponse::NotFound().body("Session not found")),
        Err(e) => return Ok(internal_error(e)),
    }

    match DbService::get_history(&conn, req.session_id) {
        Ok(messages) => {
            let lines: Vec<String> = messages
                .into_iter()
                .map(|m| {
                    format!(
                        "{} : {} : {}",
                        m.role,
                        m.content,
                        m.created_at.to_rfc3339_opts(SecondsFormat::Micros, true)
                    )
                })
                .collect();
            Ok(HttpResponse::Ok().json(lines))
        }
        Err(e) => Ok(internal_error(e)),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(create_new_chat_session)
        .service(prompt_llm_response)
        .service(get_chat_history);
}
