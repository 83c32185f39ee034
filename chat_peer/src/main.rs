// rsa_webhook_chat/chat_peer/src/main.rs

mod config;
mod console;
mod server;
mod transport;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chat_crypto::{HandshakeCoordinator, HandshakeError, KeyPair, Session};
use clap::Parser;
use tracing::{error, info};

use config::Args;
use transport::HttpTransport;

/// Código de saída quando o parceiro não responde ao handshake.
const EXIT_HANDSHAKE_FAILED: u8 = 2;

/// Toda falha de handshake é fatal e sai com o mesmo código distinto.
fn exit_code_for(_error: &HandshakeError) -> ExitCode {
    ExitCode::from(EXIT_HANDSHAKE_FAILED)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chat_peer=info,chat_crypto=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.no_clear {
        clearscreen::clear().unwrap_or_else(|e| eprintln!("Erro ao limpar tela: {}", e));
    }

    let bits = args.key_bits;
    info!(bits, "gerando par de chaves RSA");
    let keys = tokio::task::spawn_blocking(move || KeyPair::generate(bits))
        .await
        .context("thread de geração de chaves encerrada")?
        .context("falha ao gerar chaves")?;
    let session = Arc::new(Session::new(args.user.clone(), keys));

    // Servidor de entrada roda separado do handshake: o parceiro precisa
    // conseguir buscar nossa chave enquanto ainda tentamos buscar a dele.
    let listener = tokio::net::TcpListener::bind(args.bind_addr())
        .await
        .with_context(|| format!("não foi possível ligar o servidor à porta {}", args.my_port))?;
    let app = server::router(Arc::clone(&session));
    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "servidor HTTP encerrado com erro");
        }
    });

    console::banner(session.identity(), args.my_port);

    let transport = HttpTransport::new(args.peer_url(), args.request_timeout())
        .context("falha ao criar cliente HTTP")?;
    info!(peer = transport.peer_url(), "tentando conectar com o parceiro");

    let mut handshake = HandshakeCoordinator::new(args.retry_policy());
    if let Err(e) = handshake.run(&session, &transport).await {
        error!(error = %e, "handshake falhou");
        eprintln!("\n[ERRO] Não foi possível conectar ao parceiro. Verifique o outro terminal.");
        server_handle.abort();
        return Ok(exit_code_for(&e));
    }

    let result = console::run(Arc::clone(&session), &transport).await;
    server_handle.abort();
    result.map(|_| ExitCode::SUCCESS)
}
