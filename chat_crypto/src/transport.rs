// rsa_webhook_chat/chat_crypto/src/transport.rs

use std::future::Future;

use crate::envelope::WireEnvelope;
use crate::error::TransportError;
use crate::rsa::PublicKey;
use crate::status::Status;

/// O que o núcleo precisa da rede para falar com o parceiro.
pub trait PeerTransport: Send + Sync {
    /// Busca `(n, e)` no endpoint de troca de chaves do parceiro.
    fn fetch_public_key(&self) -> impl Future<Output = Result<PublicKey, TransportError>> + Send;

    /// Entrega um envelope e devolve o status respondido pelo parceiro.
    fn deliver(
        &self,
        envelope: &WireEnvelope,
    ) -> impl Future<Output = Result<Status, TransportError>> + Send;
}

/// Contrato de entrada que o transporte invoca para cada envelope recebido.
pub trait MessageHandler: Send + Sync {
    fn handle(&self, raw: &[u8]) -> Status;
}
