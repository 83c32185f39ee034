// rsa_webhook_chat/chat_crypto/src/handshake.rs

use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{HandshakeError, TransportError};
use crate::rsa::PublicKey;
use crate::session::Session;
use crate::transport::PeerTransport;

/// Número de tentativas e intervalo fixo entre elas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 5,
            delay: Duration::from_secs(3),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandshakeState {
    Idle,
    Requesting { attempt: u32 },
    Completed,
    Failed,
}

/// Troca de chaves com o parceiro: busca `(n, e)` até conseguir ou esgotar a política.
///
/// Roda uma única vez. `Failed` é terminal e fatal para o processo dono.
#[derive(Debug)]
pub struct HandshakeCoordinator {
    policy: RetryPolicy,
    state: HandshakeState,
}

impl HandshakeCoordinator {
    pub fn new(policy: RetryPolicy) -> Self {
        HandshakeCoordinator {
            policy,
            state: HandshakeState::Idle,
        }
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Bloqueia o fluxo chamador até `Completed` ou `Failed`.
    ///
    /// A espera entre tentativas usa o relógio do tokio, então o servidor de
    /// entrada continua atendendo o parceiro enquanto aguardamos.
    pub async fn run<T: PeerTransport>(
        &mut self,
        session: &Session,
        transport: &T,
    ) -> Result<PublicKey, HandshakeError> {
        if self.state != HandshakeState::Idle {
            return Err(HandshakeError::AlreadyFinished);
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = TransportError::Unreachable("nenhuma tentativa feita".into());

        for attempt in 1..=max_attempts {
            self.state = HandshakeState::Requesting { attempt };

            match transport.fetch_public_key().await {
                Ok(key) => {
                    if session.set_peer_key(key.clone()).is_err() {
                        self.state = HandshakeState::Failed;
                        return Err(HandshakeError::PeerKeyAlreadySet);
                    }
                    self.state = HandshakeState::Completed;
                    info!(attempt, "conexão estabelecida e chave pública do parceiro recebida");
                    return Ok(key);
                }
                Err(e) => {
                    warn!(attempt, max_attempts, error = %e, "tentativa de handshake falhou");
                    last_error = e;
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        self.state = HandshakeState::Failed;
        error!(attempts = max_attempts, "não foi possível conectar ao parceiro");
        Err(HandshakeError::Exhausted { attempts: max_attempts, last: last_error })
    }
}
