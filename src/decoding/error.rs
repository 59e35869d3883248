use std::io;

use thiserror::Error;

/// A decoding failure, together with the byte offset at which it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct Error {
    kind: ErrorKind,
    offset: usize,
}

/// An enumeration of potential errors that appear during bencode decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A byte string length prefix is not a canonical non-negative decimal, or does not
    /// fit in memory.
    #[error("malformed byte string length")]
    MalformedLength,

    /// An integer has a leading zero, is `-0`, is empty, or contains a non-digit.
    #[error("malformed integer")]
    MalformedInteger,

    /// An integer is syntactically valid but outside the 64-bit signed range.
    #[error("integer out of 64-bit range")]
    IntegerOverflow,

    /// Input ended inside a byte string or integer, or before any value started.
    #[error("input truncated")]
    TruncatedInput,

    /// Input ended before a list or dictionary was closed.
    #[error("unterminated list or dictionary")]
    UnterminatedContainer,

    /// A dictionary key is something other than a byte string.
    #[error("dictionary key must be a byte string, found {0}")]
    InvalidKeyType(&'static str),

    /// A dictionary contains the same key twice.
    #[error("duplicate dictionary key {:?}", String::from_utf8_lossy(.0))]
    DuplicateKey(Vec<u8>),

    /// A dictionary was closed directly after a key.
    #[error("dictionary key without a value")]
    MissingValue,

    /// A value starts with a byte that is not a bencode type marker.
    #[error("unknown type marker {}", describe_byte(.0))]
    UnknownTag(u8),

    /// Lists and dictionaries are nested deeper than the decoder allows.
    #[error("maximum nesting depth exceeded")]
    NestingTooDeep,

    /// Bytes remain after a complete top-level value.
    #[error("trailing data after value")]
    TrailingData,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind, offset: usize) -> Self {
        Error { kind, offset }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Byte offset into the input at which the problem was detected.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

fn describe_byte(byte: &u8) -> String {
    if byte.is_ascii_graphic() {
        format!("{:?}", char::from(*byte))
    } else {
        format!("0x{byte:02x}")
    }
}

/// Failure to decode bencode from an [`io::Read`] source.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The source could not be read.
    #[error("failed to read bencode source")]
    Io(#[from] io::Error),

    /// The source holds more bytes than the caller allowed.
    #[error("bencode source exceeds {limit} bytes")]
    TooLarge {
        /// The byte limit passed by the caller.
        limit: usize,
    },

    /// The bytes read are not valid bencode.
    #[error(transparent)]
    Decode(#[from] Error),
}

#[test]
fn decoding_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<Error>();
    is_sync::<Error>();
    is_send::<ReadError>();
    is_sync::<ReadError>();
}

#[test]
fn display_names_offset() {
    let err = Error::new(ErrorKind::UnknownTag(b'x'), 7);
    assert_eq!(err.to_string(), "unknown type marker 'x' at offset 7");
}
