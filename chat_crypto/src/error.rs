// rsa_webhook_chat/chat_crypto/src/error.rs

//! Tipos de erro da biblioteca, um enum por família de falha.

use thiserror::Error;

use crate::status::Status;

/// Falhas na geração de primos e pares de chaves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyGenError {
    #[error("tamanho de {0} bits não é suportado para gerar primos")]
    UnsupportedBitLength(usize),

    #[error("nenhum primo de {bits} bits encontrado em {attempts} tentativas")]
    PrimeSearchExhausted { bits: usize, attempts: u32 },

    #[error("não foi possível sortear q distinto de p em {0} tentativas")]
    DistinctPrimesExhausted(u32),

    #[error("nenhum expoente público coprimo com φ(n) em {0} tentativas")]
    ExponentSearchExhausted(u32),

    #[error("não foi possível calcular o inverso modular 'd'")]
    NoModularInverse,
}

/// Falhas de cifragem e decifragem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("mensagem (como número) é maior ou igual ao módulo n do destinatário")]
    MessageTooLarge,

    #[error("texto cifrado é maior ou igual ao módulo n")]
    CiphertextOutOfRange,

    #[error("bytes decifrados não são UTF-8 válido: {0}")]
    Decode(#[from] std::string::FromUtf8Error),
}

/// Envelope recebido com formato inválido.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("envelope deve ter 3 campos, encontrados {found}")]
    FieldCount { found: usize },

    #[error("texto cifrado não é um inteiro decimal: {0:?}")]
    InvalidCiphertext(String),
}

/// Falhas do colaborador de rede.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("peer inacessível: {0}")]
    Unreachable(String),

    #[error("tempo esgotado ao contatar o peer")]
    Timeout,

    #[error("peer respondeu com status HTTP {0}")]
    Status(u16),

    #[error("chave pública malformada: {0:?}")]
    MalformedKey(String),
}

/// Falhas ao processar um envelope de entrada.
#[derive(Error, Debug)]
pub enum InboundError {
    #[error("envelope malformado: {0}")]
    Format(FormatError),

    #[error("hash inválido na mensagem de {sender}")]
    Integrity { sender: String },

    #[error("falha ao decifrar: {0}")]
    Decode(CipherError),

    #[error("erro inesperado: {0}")]
    Unclassified(String),
}

impl InboundError {
    /// Status externo correspondente a cada tipo de falha.
    pub fn status(&self) -> Status {
        match self {
            InboundError::Format(FormatError::FieldCount { .. }) => Status::MalformedEnvelope,
            InboundError::Format(FormatError::InvalidCiphertext(_)) => Status::ProcessingFailed,
            InboundError::Integrity { .. } => Status::IntegrityCheckFailed,
            InboundError::Decode(_) | InboundError::Unclassified(_) => Status::ProcessingFailed,
        }
    }
}

/// Falhas no caminho de envio.
#[derive(Error, Debug)]
pub enum SendError {
    #[error("aguarde o handshake ser concluído antes de enviar mensagens")]
    HandshakePending,

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Falhas do handshake. Todas são fatais para o processo.
#[derive(Error, Debug)]
pub enum HandshakeError {
    #[error("não foi possível obter a chave do parceiro após {attempts} tentativas: {last}")]
    Exhausted { attempts: u32, last: TransportError },

    #[error("chave pública do parceiro já foi definida")]
    PeerKeyAlreadySet,

    #[error("handshake já terminou")]
    AlreadyFinished,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inbound_errors_map_to_statuses() {
        let format = InboundError::Format(FormatError::FieldCount { found: 2 });
        assert_eq!(format.status(), Status::MalformedEnvelope);

        let integrity = InboundError::Integrity { sender: "ana".into() };
        assert_eq!(integrity.status(), Status::IntegrityCheckFailed);

        let decode = InboundError::Decode(CipherError::CiphertextOutOfRange);
        assert_eq!(decode.status(), Status::ProcessingFailed);

        let bad_number = InboundError::Format(FormatError::InvalidCiphertext("abc".into()));
        assert_eq!(bad_number.status(), Status::ProcessingFailed);

        let other = InboundError::Unclassified("corpo não é UTF-8".into());
        assert_eq!(other.status(), Status::ProcessingFailed);
    }
}
