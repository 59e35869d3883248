//! Decodes and encodes bencode, and validates BitTorrent metainfo.
//!
//! The decoder is zero-copy as far as possible: byte strings in a decoded [`Value`] borrow
//! from the input. It rejects every malformed or non-canonical number and length, and
//! reports the byte offset of the first problem. Dictionaries whose keys arrive out of
//! order are accepted, since real torrent files contain them; the encoder always writes
//! keys sorted, so re-encoding produces the canonical form.
//!
//! ```
//! use bencode_metainfo::{Value, decoding::decode, metainfo::Metainfo};
//!
//! let bytes = b"d8:announce9:http://t/4:infod6:lengthi3e4:name1:x\
//!               12:piece lengthi16e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";
//!
//! let value: Value = decode(bytes).unwrap();
//! assert_eq!(value.to_bencode(), bytes);
//!
//! let metainfo = Metainfo::from_value(&value).unwrap();
//! assert_eq!(metainfo.announce(), "http://t/");
//! println!("info-hash {}", metainfo.info_hash());
//! ```
//!
//! The library reports what it tolerates through [`tracing`] events at `debug` level and
//! never installs a subscriber of its own.
//!
//! # Features
//!
//! * `serde`: `Serialize`/`Deserialize` for [`Value`], and `Serialize` for
//!   [`InfoHash`](metainfo::InfoHash).
//! * `inspect`: pretty printing and a compact escaped `Display` for [`Value`].
#![cfg_attr(not(test), warn(missing_docs))]

pub mod decoding;
pub mod encoding;
#[cfg(feature = "inspect")]
pub mod inspect;
pub mod metainfo;
mod state_tracker;
pub mod value;

pub use crate::value::Value;
