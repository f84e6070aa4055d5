use crate::cipher::CipherError;
use crate::envelope::EnvelopeError;
use crate::transport::TransportError;
use std::fmt;

/// An error that can occur when decoding or encoding a save file
#[derive(Debug)]
pub struct Error(Box<ErrorKind>);

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Error {
        Error(Box::new(kind))
    }

    /// Return the specific type of error
    pub fn kind(&self) -> &ErrorKind {
        &self.0
    }
}

/// Specific type of error
///
/// Each variant corresponds to one stage of the decode pipeline. The first
/// stage to fail aborts the whole operation; no partial output is returned.
#[derive(Debug)]
pub enum ErrorKind {
    /// The outer binary framing could not be stripped
    Envelope(EnvelopeError),

    /// The payload was not valid base64 text
    Transport(TransportError),

    /// The ciphertext could not be decrypted
    Cipher(CipherError),

    /// The plaintext was not a well-formed JSON document
    Document(serde_json::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self.0 {
            ErrorKind::Envelope(ref err) => Some(err),
            ErrorKind::Transport(ref err) => Some(err),
            ErrorKind::Cipher(ref err) => Some(err),
            ErrorKind::Document(ref err) => Some(err),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self.0 {
            ErrorKind::Envelope(ref err) => write!(f, "envelope error: {}", err),
            ErrorKind::Transport(ref err) => write!(f, "transport error: {}", err),
            ErrorKind::Cipher(ref err) => write!(f, "cipher error: {}", err),
            ErrorKind::Document(ref err) => write!(f, "document error: {}", err),
        }
    }
}

impl From<EnvelopeError> for Error {
    fn from(error: EnvelopeError) -> Self {
        Error::new(ErrorKind::Envelope(error))
    }
}

impl From<TransportError> for Error {
    fn from(error: TransportError) -> Self {
        Error::new(ErrorKind::Transport(error))
    }
}

impl From<CipherError> for Error {
    fn from(error: CipherError) -> Self {
        Error::new(ErrorKind::Cipher(error))
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::new(ErrorKind::Document(error))
    }
}
