// rsa_webhook_chat/chat_peer/src/server.rs

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chat_crypto::{InboundError, MessageHandler, Session, Status};
use serde::Serialize;

use crate::console;

#[derive(Serialize, Debug)]
struct Health {
    status: &'static str,
    identity: String,
    handshake_complete: bool,
    version: &'static str,
}

/// Rotas do peer: troca de chaves, entrega de envelopes e saúde.
pub fn router(session: Arc<Session>) -> Router {
    Router::new()
        .route("/get_public_key", get(get_public_key))
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(session)
}

async fn get_public_key(State(session): State<Arc<Session>>) -> String {
    session.public_key().to_string()
}

/// Handler de entrada do peer: delega ao contrato da sessão e exibe o
/// resultado no console.
pub struct ConsoleHandler {
    session: Arc<Session>,
}

impl ConsoleHandler {
    pub fn new(session: Arc<Session>) -> Self {
        ConsoleHandler { session }
    }
}

impl MessageHandler for ConsoleHandler {
    fn handle(&self, raw: &[u8]) -> Status {
        let identity = self.session.identity();
        self.session.handle_with(raw, |result| match result {
            Ok(message) => console::show_incoming(identity, message),
            Err(InboundError::Integrity { sender }) => console::show_alert(&format!(
                "ALERTA: HASH INVÁLIDO da mensagem de {}. MENSAGEM DESCARTADA.",
                sender
            )),
            Err(_) => {}
        })
    }
}

async fn webhook(State(session): State<Arc<Session>>, body: Bytes) -> (StatusCode, &'static str) {
    respond(ConsoleHandler::new(session).handle(&body))
}

fn respond(status: Status) -> (StatusCode, &'static str) {
    let code = StatusCode::from_u16(status.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (code, status.reason())
}

async fn health(State(session): State<Arc<Session>>) -> Json<Health> {
    Json(Health {
        status: "ok",
        identity: session.identity().to_string(),
        handshake_complete: session.is_handshake_complete(),
        version: env!("CARGO_PKG_VERSION"),
    })
}
