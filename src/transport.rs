//! The base64 transport encoding between the framing and the ciphertext.
//!
//! Inside the envelope the ciphertext is stored as ASCII base64 (standard
//! alphabet, padded). Files written by some tools carry incidental line
//! breaks inside the text, so decoding strips CR and LF anywhere in the
//! payload and trims surrounding whitespace before handing the rest to
//! the base64 decoder. Encoding never wraps.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::fmt;

/// Decodes the text payload into raw cipher bytes
pub fn decode(payload: &[u8]) -> Result<Vec<u8>, TransportError> {
    let cleaned: Vec<u8> = payload
        .iter()
        .copied()
        .filter(|&b| b != b'\r' && b != b'\n')
        .collect();
    STANDARD
        .decode(cleaned.trim_ascii())
        .map_err(TransportError)
}

/// Encodes cipher bytes as an unwrapped base64 text payload
pub fn encode(data: &[u8]) -> Vec<u8> {
    STANDARD.encode(data).into_bytes()
}

/// Error type for payloads that are not valid base64 text
#[derive(Debug)]
pub struct TransportError(base64::DecodeError);

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload is not valid base64: {}", self.0)
    }
}
