// rsa_webhook_chat/chat_crypto/src/envelope.rs

use std::fmt;
use std::str::FromStr;

use num_bigint::BigUint;

use crate::error::FormatError;

/// Separador literal entre os campos do envelope.
pub const DELIMITER: &str = "###";

/// Unidade trocada entre os peers: `remetente###cifradoDecimal###digestHex`.
///
/// Nenhum campo é escapado. Um remetente contendo `###` corrompe o envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WireEnvelope {
    pub sender: String,
    pub ciphertext: BigUint,
    pub digest: String,
}

impl WireEnvelope {
    pub fn new(sender: impl Into<String>, ciphertext: BigUint, digest: impl Into<String>) -> Self {
        WireEnvelope {
            sender: sender.into(),
            ciphertext,
            digest: digest.into(),
        }
    }

    pub fn parse(text: &str) -> Result<WireEnvelope, FormatError> {
        let fields: Vec<&str> = text.split(DELIMITER).collect();
        let [sender, ciphertext, digest] = fields[..] else {
            return Err(FormatError::FieldCount { found: fields.len() });
        };

        let ciphertext = ciphertext
            .trim()
            .parse::<BigUint>()
            .map_err(|_| FormatError::InvalidCiphertext(ciphertext.to_string()))?;

        Ok(WireEnvelope::new(sender, ciphertext, digest))
    }

    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for WireEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{DELIMITER}{}{DELIMITER}{}", self.sender, self.ciphertext, self.digest)
    }
}

impl FromStr for WireEnvelope {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WireEnvelope::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WireEnvelope {
        WireEnvelope::new(
            "Ana",
            "123456789012345678901234567890".parse().unwrap(),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        )
    }

    #[test]
    fn test_serialize_layout() {
        assert_eq!(
            sample().serialize(),
            "Ana###123456789012345678901234567890###b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn test_parse_inverts_serialize() {
        let envelope = sample();
        let parsed = WireEnvelope::parse(&envelope.serialize()).unwrap();
        assert_eq!(parsed, envelope);
        assert_eq!(parsed.serialize(), envelope.serialize());
    }

    #[test]
    fn test_empty_fields_still_count() {
        let parsed: WireEnvelope = "###0###".parse().unwrap();
        assert_eq!(parsed.sender, "");
        assert_eq!(parsed.ciphertext, BigUint::from(0u32));
        assert_eq!(parsed.digest, "");
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(WireEnvelope::parse("Ana"), Err(FormatError::FieldCount { found: 1 }));
        assert_eq!(WireEnvelope::parse("Ana###42"), Err(FormatError::FieldCount { found: 2 }));
        assert_eq!(
            WireEnvelope::parse("Ana###42###abc###extra"),
            Err(FormatError::FieldCount { found: 4 })
        );
    }

    #[test]
    fn test_delimiter_in_sender_corrupts_envelope() {
        let envelope = WireEnvelope::new("A###B", BigUint::from(7u32), "ff");
        assert_eq!(
            WireEnvelope::parse(&envelope.serialize()),
            Err(FormatError::FieldCount { found: 4 })
        );
    }

    #[test]
    fn test_non_numeric_ciphertext() {
        assert_eq!(
            WireEnvelope::parse("Ana###12a4###ff"),
            Err(FormatError::InvalidCiphertext("12a4".into()))
        );
        assert_eq!(
            WireEnvelope::parse("Ana######ff"),
            Err(FormatError::InvalidCiphertext("".into()))
        );
    }
}
