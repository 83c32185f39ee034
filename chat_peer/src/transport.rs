// rsa_webhook_chat/chat_peer/src/transport.rs

use std::time::Duration;

use chat_crypto::{PeerTransport, PublicKey, Status, TransportError, WireEnvelope};
use reqwest::Client;
use tracing::debug;

/// Fala com o parceiro pelos endpoints HTTP `/get_public_key` e `/webhook`.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    client: Client,
    peer_url: String,
}

impl HttpTransport {
    pub fn new(peer_url: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport {
            client,
            peer_url: peer_url.into(),
        })
    }

    pub fn peer_url(&self) -> &str {
        &self.peer_url
    }
}

fn classify(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Unreachable(e.to_string())
    }
}

impl PeerTransport for HttpTransport {
    async fn fetch_public_key(&self) -> Result<PublicKey, TransportError> {
        let url = format!("{}/get_public_key", self.peer_url);
        debug!(%url, "buscando chave pública do parceiro");

        let response = self.client.get(&url).send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let body = response.text().await.map_err(classify)?;
        body.parse()
    }

    async fn deliver(&self, envelope: &WireEnvelope) -> Result<Status, TransportError> {
        let url = format!("{}/webhook", self.peer_url);
        let response = self
            .client
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(envelope.serialize())
            .send()
            .await
            .map_err(classify)?;

        let code = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Ok(Status::from_response(code, &body))
    }
}
