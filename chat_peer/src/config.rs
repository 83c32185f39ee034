// rsa_webhook_chat/chat_peer/src/config.rs

use std::time::Duration;

use chat_crypto::RetryPolicy;
use clap::Parser;

/// Chat P2P criptografado com RSA feito à mão.
#[derive(Parser, Debug, Clone)]
#[command(name = "chat_peer", version, about)]
pub struct Args {
    /// Porta em que esta aplicação escuta
    #[arg(long, env = "CHAT_MY_PORT")]
    pub my_port: u16,

    /// Porta da aplicação parceira
    #[arg(long, env = "CHAT_PEER_PORT")]
    pub peer_port: u16,

    /// Host da aplicação parceira
    #[arg(long, default_value = "127.0.0.1", env = "CHAT_PEER_HOST")]
    pub peer_host: String,

    /// Seu nome de usuário (identidade do remetente)
    #[arg(long, default_value = "Anonymous", env = "CHAT_USER")]
    pub user: String,

    /// Bits de cada primo do par de chaves
    #[arg(long, default_value_t = 256, env = "CHAT_KEY_BITS")]
    pub key_bits: usize,

    /// Tentativas de handshake antes de desistir
    #[arg(long, default_value_t = 5, env = "CHAT_HANDSHAKE_ATTEMPTS")]
    pub handshake_attempts: u32,

    /// Espera entre tentativas de handshake, em segundos
    #[arg(long, default_value_t = 3, env = "CHAT_HANDSHAKE_DELAY_SECS")]
    pub handshake_delay_secs: u64,

    /// Timeout de cada requisição HTTP ao parceiro, em segundos
    #[arg(long, default_value_t = 3, env = "CHAT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: u64,

    /// Não limpa o terminal ao iniciar
    #[arg(long)]
    pub no_clear: bool,
}

impl Args {
    pub fn peer_url(&self) -> String {
        format!("http://{}:{}", self.peer_host, self.peer_port)
    }

    pub fn bind_addr(&self) -> String {
        format!("127.0.0.1:{}", self.my_port)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.handshake_attempts,
            delay: Duration::from_secs(self.handshake_delay_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
