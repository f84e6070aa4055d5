//! AES layer protecting the JSON document.
//!
//! The game encrypts every save with a single key baked into its
//! binaries, in ECB mode with PKCS7 padding. ECB leaks equal-block
//! structure, but this is an inherited property of the format being
//! reverse engineered: the bytes must match what the game produces, so
//! the mode is reproduced as-is rather than improved.

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes256;
use std::fmt;

/// The AES-256 key shared by every Silksong save file.
pub const SAVE_KEY: &[u8; 32] = b"UKu52ePUBwetZ9wNX88o54dnfKRu0T1l";

const BLOCK_LEN: usize = 16;

/// Decrypts ciphertext and strips its PKCS7 padding
///
/// The input must be a positive multiple of the 16 byte block size.
/// Invalid padding after decryption means either corrupted ciphertext or
/// a file encrypted under a different key; the two are indistinguishable.
pub fn decrypt(data: &[u8]) -> Result<Vec<u8>, CipherError> {
    if data.is_empty() || data.len() % BLOCK_LEN != 0 {
        return Err(CipherError::UnalignedLength(data.len()));
    }

    let cipher = Aes256::new(GenericArray::from_slice(SAVE_KEY));
    let mut buffer = data.to_vec();
    for chunk in buffer.chunks_exact_mut(BLOCK_LEN) {
        cipher.decrypt_block(GenericArray::from_mut_slice(chunk));
    }

    strip_padding(&mut buffer)?;
    Ok(buffer)
}

/// Applies PKCS7 padding and encrypts, block by block
///
/// Total over any input; an empty plaintext becomes one full padding
/// block.
pub fn encrypt(data: &[u8]) -> Vec<u8> {
    let pad = BLOCK_LEN - data.len() % BLOCK_LEN;
    let mut buffer = Vec::with_capacity(data.len() + pad);
    buffer.extend_from_slice(data);
    buffer.resize(data.len() + pad, pad as u8);

    let cipher = Aes256::new(GenericArray::from_slice(SAVE_KEY));
    for chunk in buffer.chunks_exact_mut(BLOCK_LEN) {
        cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
    }
    buffer
}

fn strip_padding(buffer: &mut Vec<u8>) -> Result<(), CipherError> {
    let pad = usize::from(*buffer.last().ok_or(CipherError::InvalidPadding)?);
    if pad == 0 || pad > BLOCK_LEN {
        return Err(CipherError::InvalidPadding);
    }
    if !buffer[buffer.len() - pad..]
        .iter()
        .all(|&byte| usize::from(byte) == pad)
    {
        return Err(CipherError::InvalidPadding);
    }
    buffer.truncate(buffer.len() - pad);
    Ok(())
}

/// Error type for cipher operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// Ciphertext length is not a positive multiple of the block size
    UnalignedLength(usize),

    /// PKCS7 padding was invalid after decryption: the ciphertext is
    /// corrupted or was produced under a different key
    InvalidPadding,
}

impl std::error::Error for CipherError {}

impl fmt::Display for CipherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CipherError::UnalignedLength(len) => {
                write!(f, "ciphertext length {} is not a positive multiple of 16", len)
            }
            CipherError::InvalidPadding => {
                write!(f, "invalid padding: wrong key or corrupted ciphertext")
            }
        }
    }
}
