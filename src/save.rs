//! Whole-file decode and encode, plus the document helpers editors use.

use crate::envelope::{self, SaveEnvelope};
use crate::{cipher, transport, Error};

/// The decoded save document
///
/// The game's save schema is open and shifts between patches, so the
/// document is a dynamic JSON value rather than a static struct: null,
/// booleans, numbers, strings, arrays, and objects, nested arbitrarily.
/// Object key insertion order is preserved across a decode and encode
/// cycle.
pub type SaveState = serde_json::Value;

/// Decodes raw save file bytes into a [`SaveState`]
///
/// Runs the full pipeline: strip the binary framing, base64-decode the
/// payload, decrypt, and parse the JSON document. The first stage to
/// fail aborts the decode and its error is surfaced through
/// [`Error::kind`](crate::Error::kind).
pub fn decode_save(data: &[u8]) -> Result<SaveState, Error> {
    let envelope = SaveEnvelope::from_slice(data)?;
    let ciphertext = transport::decode(envelope.payload())?;
    let plaintext = cipher::decrypt(&ciphertext)?;
    let state = serde_json::from_slice(&plaintext)?;
    Ok(state)
}

/// Encodes a [`SaveState`] into complete save file bytes
///
/// The document is rendered compactly (the game accepts any JSON
/// whitespace), encrypted, base64-encoded, and framed. Serialization of
/// a [`SaveState`] cannot fail in practice; an error here signals a
/// defect rather than a condition worth presenting to a user.
pub fn encode_save(state: &SaveState) -> Result<Vec<u8>, Error> {
    let plaintext = serde_json::to_vec(state)?;
    let ciphertext = cipher::encrypt(&plaintext);
    let payload = transport::encode(&ciphertext);
    Ok(envelope::frame(&payload))
}

/// Returns true if `text` parses as a JSON document
///
/// Editors call this for live feedback while a user types; it re-parses
/// from scratch every time and keeps no state.
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<SaveState>(text).is_ok()
}

/// Sets the value at a dotted path inside a document
///
/// `set_field(state, "playerData.geo", 500.into())` writes the nested
/// field, creating empty intermediate objects for path segments that do
/// not exist yet. Returns false without modifying anything further when
/// a segment lands on a non-object value.
pub fn set_field(state: &mut SaveState, path: &str, value: SaveState) -> bool {
    let mut target = state;
    let mut parts = path.split('.').peekable();
    while let Some(part) = parts.next() {
        let map = match target {
            SaveState::Object(map) => map,
            _ => return false,
        };
        if parts.peek().is_none() {
            map.insert(part.to_string(), value);
            return true;
        }
        target = map
            .entry(part.to_string())
            .or_insert_with(|| SaveState::Object(serde_json::Map::new()));
    }
    false
}
