// rsa_webhook_chat/chat_crypto/src/session.rs

use std::sync::OnceLock;

use tracing::{debug, warn};

use crate::envelope::WireEnvelope;
use crate::error::{InboundError, SendError};
use crate::rsa::{self, KeyPair, PublicKey};
use crate::sha256;
use crate::status::Status;
use crate::transport::{MessageHandler, PeerTransport};

/// Mensagem aceita: decifrada e com hash conferido.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub sender: String,
    pub text: String,
}

/// Estado de um peer: identidade, par de chaves local e chave do parceiro.
///
/// A chave do parceiro é escrita uma única vez pelo handshake. O `OnceLock`
/// publica a escrita para as leituras feitas em outras threads.
#[derive(Debug)]
pub struct Session {
    identity: String,
    keys: KeyPair,
    peer_key: OnceLock<PublicKey>,
}

impl Session {
    pub fn new(identity: impl Into<String>, keys: KeyPair) -> Self {
        Session {
            identity: identity.into(),
            keys,
            peer_key: OnceLock::new(),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    pub fn peer_key(&self) -> Option<&PublicKey> {
        self.peer_key.get()
    }

    pub fn is_handshake_complete(&self) -> bool {
        self.peer_key.get().is_some()
    }

    /// Grava a chave do parceiro. Falha se já houver uma gravada.
    pub(crate) fn set_peer_key(&self, key: PublicKey) -> Result<(), PublicKey> {
        self.peer_key.set(key)
    }

    /// Cifra para o parceiro e calcula o digest do texto puro.
    pub fn seal(&self, text: &str) -> Result<WireEnvelope, SendError> {
        let peer_key = self.peer_key().ok_or(SendError::HandshakePending)?;
        let ciphertext = rsa::encrypt(text, peer_key)?;
        Ok(WireEnvelope::new(self.identity.as_str(), ciphertext, sha256::digest(text)))
    }

    /// Sela e entrega uma mensagem. Não há nova tentativa nem fila.
    pub async fn send<T: PeerTransport>(&self, transport: &T, text: &str) -> Result<Status, SendError> {
        let envelope = self.seal(text)?;
        let status = transport.deliver(&envelope).await?;
        debug!(%status, "envelope entregue");
        Ok(status)
    }

    /// Processa um envelope recebido: parse, decifragem e verificação do hash.
    pub fn receive(&self, raw: &[u8]) -> Result<ReceivedMessage, InboundError> {
        let text = std::str::from_utf8(raw)
            .map_err(|e| InboundError::Unclassified(format!("corpo não é UTF-8: {}", e)))?;
        let envelope = WireEnvelope::parse(text).map_err(InboundError::Format)?;

        let message = rsa::decrypt(&envelope.ciphertext, self.keys.private_key())
            .map_err(InboundError::Decode)?;

        if !sha256::verify(&message, &envelope.digest) {
            return Err(InboundError::Integrity { sender: envelope.sender });
        }

        Ok(ReceivedMessage { sender: envelope.sender, text: message })
    }

    /// `receive` seguido do mapeamento para `Status`. O `observe` vê o
    /// resultado antes (mensagem aceita ou falha), para quem precisa exibi-lo.
    pub fn handle_with<F>(&self, raw: &[u8], observe: F) -> Status
    where
        F: FnOnce(&Result<ReceivedMessage, InboundError>),
    {
        let result = self.receive(raw);
        observe(&result);
        match result {
            Ok(_) => Status::Accepted,
            Err(e) => {
                warn!(error = %e, "envelope rejeitado");
                e.status()
            }
        }
    }
}

impl MessageHandler for Session {
    fn handle(&self, raw: &[u8]) -> Status {
        self.handle_with(raw, |_| {})
    }
}
