// rsa_webhook_chat/chat_crypto/src/status.rs

/// Resposta de entrega devolvida ao remetente de um envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Accepted,
    MalformedEnvelope,
    IntegrityCheckFailed,
    ProcessingFailed,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Accepted => 200,
            Status::MalformedEnvelope | Status::IntegrityCheckFailed => 400,
            Status::ProcessingFailed => 500,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Status::Accepted => "OK",
            Status::MalformedEnvelope => "malformed envelope",
            Status::IntegrityCheckFailed => "integrity check failed",
            Status::ProcessingFailed => "error",
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Status::Accepted
    }

    /// Reconstrói o status a partir do código e corpo da resposta do peer.
    /// Qualquer combinação desconhecida vira `ProcessingFailed`.
    pub fn from_response(code: u16, body: &str) -> Status {
        match (code, body.trim()) {
            (200..=299, _) => Status::Accepted,
            (400, reason) if reason == Status::MalformedEnvelope.reason() => Status::MalformedEnvelope,
            (400, reason) if reason == Status::IntegrityCheckFailed.reason() => {
                Status::IntegrityCheckFailed
            }
            _ => Status::ProcessingFailed,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code(), self.reason())
    }
}
