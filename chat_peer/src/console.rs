// rsa_webhook_chat/chat_peer/src/console.rs

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use chat_crypto::{ReceivedMessage, SendError, Session};
use inquire::{InquireError, Text};
use tracing::{error, warn};

use crate::transport::HttpTransport;

/// O que o usuário digitou no prompt.
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    Message(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
    if line.trim().eq_ignore_ascii_case("sair") || line.trim().eq_ignore_ascii_case("exit") {
        Input::Exit
    } else if line.trim().is_empty() {
        Input::Empty
    } else {
        Input::Message(line.to_string())
    }
}

fn prompt_label(identity: &str) -> String {
    format!("[{}]:", identity)
}

pub fn show_incoming(own_identity: &str, message: &ReceivedMessage) {
    let mut out = io::stdout().lock();
    let _ = write!(out, "\n[ {} diz ]: {}\n{} ", message.sender, message.text, prompt_label(own_identity));
    let _ = out.flush();
}

pub fn show_alert(text: &str) {
    eprintln!("\n!!! {} !!!", text);
}

pub fn banner(identity: &str, port: u16) {
    println!("{}", "=".repeat(50));
    println!("      Chat iniciado para o usuário: {}", identity);
    println!("      Ouvindo na porta: {}", port);
    println!("{}", "=".repeat(50));
}

/// Lê uma linha; `None` em EOF, Ctrl-C ou Esc.
fn read_line(label: String) -> Result<Option<String>> {
    if io::stdin().is_terminal() {
        return match Text::new(&label).prompt() {
            Ok(line) => Ok(Some(line)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e).context("falha ao ler a entrada"),
        };
    }

    print!("{} ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Laço de envio: uma mensagem por vez, bloqueando na entrega.
pub async fn run(session: Arc<Session>, transport: &HttpTransport) -> Result<()> {
    println!("{}", "-".repeat(50));
    println!("Chat pronto! Digite sua mensagem e pressione Enter.");
    println!("Digite 'sair' para fechar.");
    println!("{}", "-".repeat(50));

    loop {
        let label = prompt_label(session.identity());
        let line = tokio::task::spawn_blocking(move || read_line(label))
            .await
            .context("thread de entrada encerrada")??;

        let text = match line.as_deref().map(parse_input) {
            None | Some(Input::Exit) => break,
            Some(Input::Empty) => continue,
            Some(Input::Message(text)) => text,
        };

        match session.send(transport, &text).await {
            Ok(status) if status.is_accepted() => {}
            Ok(status) => warn!(%status, "parceiro recusou a mensagem"),
            Err(SendError::HandshakePending) => {
                println!("Aguarde o handshake ser concluído antes de enviar mensagens.")
            }
            Err(e) => error!(error = %e, "erro ao enviar mensagem"),
        }
    }

    println!("\nEncerrando o chat...");
    Ok(())
}
