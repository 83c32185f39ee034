// rsa_webhook_chat/chat_crypto/src/lib.rs

// Criptografia feita à mão (Miller-Rabin, RSA sem padding, SHA-256) e o
// protocolo de troca de chaves e envelopes entre os dois peers.
pub mod arith;
pub mod envelope;
pub mod error;
pub mod handshake;
pub mod primality;
pub mod rsa;
pub mod session;
pub mod sha256;
pub mod status;
pub mod transport;

// Exporta o que as aplicações usam diretamente.
pub use envelope::WireEnvelope;
pub use error::{CipherError, FormatError, HandshakeError, InboundError, KeyGenError, SendError, TransportError};
pub use handshake::{HandshakeCoordinator, HandshakeState, RetryPolicy};
pub use rsa::{KeyPair, PrivateKey, PublicKey};
pub use session::{ReceivedMessage, Session};
pub use status::Status;
pub use transport::{MessageHandler, PeerTransport};
