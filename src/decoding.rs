//! Decodes bencoded input
//!
//! # Basic decoding
//!
//! Most callers only need [`decode`], which reads exactly one value and rejects
//! anything left over:
//!
//! ```
//! use bencode_metainfo::decoding::decode;
//!
//! let value = decode(b"d3:fooi1ee").unwrap();
//! assert_eq!(value.get(b"foo").and_then(|v| v.as_integer()), Some(1));
//! ```
//!
//! Byte strings in the returned [`Value`](crate::Value) borrow from the input buffer.
//! Use [`Value::into_owned`](crate::Value::into_owned) to detach them.
//!
//! # Configuring the decoder
//!
//! Decoders have a depth limit to prevent resource exhaustion from hostile inputs. The
//! default of [`DEFAULT_MAX_DEPTH`] is generous; the tighter the bound, the less memory an
//! attacker can make the decoder hold on to:
//!
//! ```
//! use bencode_metainfo::decoding::{Decoder, ErrorKind};
//!
//! let err = Decoder::new(b"llleee").with_max_depth(2).decode().unwrap_err();
//! assert_eq!(err.kind(), &ErrorKind::NestingTooDeep);
//! ```
//!
//! Lists and dicts have a depth equal to the depth of their deepest member plus one;
//! atoms have depth zero.
//!
//! Bytes after the first complete value are an error by default. To read a value from the
//! front of a longer buffer, use [`decode_prefix`] or
//! [`Decoder::with_trailing_data`]:
//!
//! ```
//! use bencode_metainfo::decoding::decode_prefix;
//!
//! let (value, consumed) = decode_prefix(b"i42eleftover").unwrap();
//! assert_eq!(value.as_integer(), Some(42));
//! assert_eq!(consumed, 4);
//! ```
//!
//! # Key order
//!
//! Canonical bencode stores dictionary keys in raw byte order. The decoder accepts
//! dictionaries whose keys are out of order (plenty of real torrent files have them), and
//! reports it through [`Decoder::keys_sorted`]. Encoding always writes keys sorted.
//! Duplicate keys are always rejected.
//!
//! # Error handling
//!
//! Every [`Error`] carries the byte offset at which it was detected. Once an error is
//! encountered, the decoder won't try to muddle through it; every future call to the same
//! decoder returns the same error.

mod decoder;
mod error;
mod reader;

pub use self::{
    decoder::{Decoder, Tokens, TrailingData, decode, decode_prefix},
    error::{Error, ErrorKind, ReadError},
    reader::from_reader,
};
pub use crate::state_tracker::{DEFAULT_MAX_DEPTH, Token};
