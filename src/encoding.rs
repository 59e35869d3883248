//! Canonical bencode encoding.
//!
//! Encoding a [`Value`](crate::Value) cannot fail. Dictionaries are always written in raw
//! key byte order, whatever order their keys arrived in when decoded, so the output is
//! the canonical form of the value:
//!
//! ```
//! use bencode_metainfo::{decoding::decode, encoding::encode};
//!
//! let value = decode(b"d1:bi1e1:ai2ee").unwrap();
//! assert_eq!(encode(&value), b"d1:ai2e1:bi1ee");
//! ```
//!
//! Decoding the output of [`encode`] yields a value equal to the one encoded.

mod encoder;

pub use self::encoder::{encode, encode_into};
