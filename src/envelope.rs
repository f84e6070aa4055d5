//! The outer binary framing wrapped around the transport payload.
//!
//! A save file is laid out as:
//!
//! 1. Preamble - a fixed 22 byte sequence, the serialization header the
//!    game's C# `BinaryFormatter` emits before a length-prefixed string
//! 2. Length - the payload length as a LEB128 varint
//! 3. Payload - the base64 text of the encrypted document
//! 4. Sentinel - a single `0x0B` byte closing the file
//!
//! The preamble bytes and the sentinel have no documented meaning beyond
//! being required for the game to accept the file. The game does not
//! cross-check the declared length against the payload it actually reads,
//! and files with a mismatched length field exist in the wild, so
//! [`SaveEnvelope::from_slice`] exposes the declared length without
//! enforcing it.

use std::fmt;

/// The fixed 22 byte sequence that opens every save file.
pub const SAVE_MAGIC: [u8; 22] = [
    0, 1, 0, 0, 0, 255, 255, 255, 255, 1, 0, 0, 0, 0, 0, 0, 0, 6, 1, 0, 0, 0,
];

/// The byte that closes every save file.
pub const SAVE_SENTINEL: u8 = 0x0b;

/// A LEB128 varint carries at most 5 bytes for a 32 bit value.
const VARINT_MAX_LEN: usize = 5;

/// A parsed view of a save file's framing
///
/// Borrows the payload from the input; nothing is copied until a later
/// pipeline stage needs an owned buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEnvelope<'a> {
    declared_len: u32,
    payload: &'a [u8],
    sentinel: u8,
}

impl<'a> SaveEnvelope<'a> {
    /// Splits raw save file bytes into the framing's logical parts
    ///
    /// The preamble is skipped by length only. The game never validates
    /// its contents, and neither do we, so a file with a mangled preamble
    /// still decodes as long as the rest of the framing holds up.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, EnvelopeError> {
        // Preamble plus at least a one byte length field and the sentinel.
        if data.len() < SAVE_MAGIC.len() + 1 {
            return Err(EnvelopeErrorKind::TooShort {
                have: data.len(),
                need: SAVE_MAGIC.len() + 1,
            }
            .into());
        }

        let (declared_len, varint_len) = read_varint(&data[SAVE_MAGIC.len()..])?;
        let payload_start = SAVE_MAGIC.len() + varint_len;

        // Everything between the varint and the trailing sentinel.
        let sentinel_at = data.len() - 1;
        if payload_start >= sentinel_at {
            return Err(EnvelopeErrorKind::MissingPayload.into());
        }

        Ok(SaveEnvelope {
            declared_len,
            payload: &data[payload_start..sentinel_at],
            sentinel: data[sentinel_at],
        })
    }

    /// Returns the payload length recorded in the varint field
    ///
    /// Informational only: the original tooling ignores this value, so a
    /// mismatch with [`payload`](Self::payload) length is not an error.
    pub fn declared_len(&self) -> u32 {
        self.declared_len
    }

    /// Returns the payload bytes between the varint and the sentinel
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Returns the file's final byte, expected to be [`SAVE_SENTINEL`]
    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }
}

/// Wraps a payload in the full save file framing
///
/// Total over any payload: preamble, LEB128 length, payload bytes,
/// sentinel.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(SAVE_MAGIC.len() + VARINT_MAX_LEN + payload.len() + 1);
    out.extend_from_slice(&SAVE_MAGIC);
    write_varint(payload.len() as u32, &mut out);
    out.extend_from_slice(payload);
    out.push(SAVE_SENTINEL);
    out
}

/// Reads a LEB128 varint, returning the value and the bytes consumed.
///
/// 7 data bits per byte, least significant group first, high bit set on
/// every byte except the last. A 32 bit value terminates within 5 bytes;
/// anything longer is malformed.
pub(crate) fn read_varint(data: &[u8]) -> Result<(u32, usize), EnvelopeError> {
    let mut value = 0u32;
    for (i, &byte) in data.iter().take(VARINT_MAX_LEN).enumerate() {
        value |= u32::from(byte & 0x7f) << (i * 7);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(EnvelopeErrorKind::UnterminatedLength.into())
}

/// Writes `value` as a LEB128 varint using the minimum number of bytes.
pub(crate) fn write_varint(mut value: u32, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Error type for envelope operations
#[derive(Debug)]
pub struct EnvelopeError {
    kind: EnvelopeErrorKind,
}

impl EnvelopeError {
    /// Return the specific kind of error
    pub fn kind(&self) -> &EnvelopeErrorKind {
        &self.kind
    }
}

impl From<EnvelopeErrorKind> for EnvelopeError {
    fn from(kind: EnvelopeErrorKind) -> Self {
        EnvelopeError { kind }
    }
}

/// Specific kind of envelope error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeErrorKind {
    /// Input ends before the framing could possibly be complete
    TooShort {
        /// bytes present in the input
        have: usize,
        /// minimum bytes the framing requires
        need: usize,
    },
    /// The length varint did not terminate within 5 bytes
    UnterminatedLength,
    /// No payload bytes remain between the length field and the sentinel
    MissingPayload,
}

impl std::error::Error for EnvelopeError {}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EnvelopeErrorKind::TooShort { have, need } => {
                write!(f, "file too short: {} bytes, need at least {}", have, need)
            }
            EnvelopeErrorKind::UnterminatedLength => {
                write!(f, "length field is an unterminated varint")
            }
            EnvelopeErrorKind::MissingPayload => write!(f, "no payload between framing bytes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;
    use rstest::*;

    #[rstest]
    #[case(0, &[0x00])]
    #[case(127, &[0x7f])]
    #[case(128, &[0x80, 0x01])]
    #[case(16383, &[0xff, 0x7f])]
    #[case(16384, &[0x80, 0x80, 0x01])]
    #[case((1 << 28) - 1, &[0xff, 0xff, 0xff, 0x7f])]
    #[case(1 << 28, &[0x80, 0x80, 0x80, 0x80, 0x01])]
    fn test_varint_boundaries(#[case] value: u32, #[case] encoded: &[u8]) {
        let mut out = Vec::new();
        write_varint(value, &mut out);
        assert_eq!(out, encoded);
        assert_eq!(read_varint(encoded).unwrap(), (value, encoded.len()));
    }

    #[quickcheck]
    fn varint_roundtrip(value: u32) -> bool {
        let mut out = Vec::new();
        write_varint(value, &mut out);
        matches!(read_varint(&out), Ok((v, n)) if v == value && n == out.len())
    }

    #[test]
    fn test_varint_ignores_trailing_bytes() {
        assert_eq!(read_varint(&[0x2c, 0xff, 0xff]).unwrap(), (44, 1));
    }

    #[test]
    fn test_varint_unterminated() {
        let err = read_varint(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01]).unwrap_err();
        assert_eq!(err.kind(), &EnvelopeErrorKind::UnterminatedLength);

        // Input exhausted while the continuation bit is still set
        let err = read_varint(&[0x80]).unwrap_err();
        assert_eq!(err.kind(), &EnvelopeErrorKind::UnterminatedLength);
    }

    #[test]
    fn test_frame_roundtrip() {
        let framed = frame(b"SGVsbG8=");
        let envelope = SaveEnvelope::from_slice(&framed).unwrap();
        assert_eq!(envelope.payload(), b"SGVsbG8=");
        assert_eq!(envelope.declared_len(), 8);
        assert_eq!(envelope.sentinel(), SAVE_SENTINEL);
    }

    #[test]
    fn test_frame_layout() {
        let framed = frame(b"ab");
        assert_eq!(&framed[..22], &SAVE_MAGIC);
        assert_eq!(&framed[22..], &[0x02, b'a', b'b', 0x0b]);
    }

    #[test]
    fn test_truncated_input() {
        let err = SaveEnvelope::from_slice(&[0u8; 10]).unwrap_err();
        assert_eq!(err.kind(), &EnvelopeErrorKind::TooShort { have: 10, need: 23 });
    }

    #[test]
    fn test_empty_payload() {
        let framed = frame(b"");
        let err = SaveEnvelope::from_slice(&framed).unwrap_err();
        assert_eq!(err.kind(), &EnvelopeErrorKind::MissingPayload);
    }

    #[test]
    fn test_declared_len_not_enforced() {
        // A file whose length field disagrees with the payload still
        // unframes, matching the game's own tolerance.
        let mut data = SAVE_MAGIC.to_vec();
        write_varint(999, &mut data);
        data.extend_from_slice(b"payload");
        data.push(SAVE_SENTINEL);

        let envelope = SaveEnvelope::from_slice(&data).unwrap();
        assert_eq!(envelope.declared_len(), 999);
        assert_eq!(envelope.payload(), b"payload");
    }

    #[test]
    fn test_mangled_preamble_accepted() {
        let mut framed = frame(b"payload");
        framed[0] = 0xde;
        framed[21] = 0xad;
        let envelope = SaveEnvelope::from_slice(&framed).unwrap();
        assert_eq!(envelope.payload(), b"payload");
    }
}
