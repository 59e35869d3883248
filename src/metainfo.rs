//! A validated, read-only view of a BitTorrent metainfo (`.torrent`) dictionary.
//!
//! The view borrows from a decoded [`Value`](crate::Value), so the caller decodes first and
//! keeps the tree alive for as long as the view is in use:
//!
//! ```
//! use bencode_metainfo::{decoding::decode, metainfo::{FileLayout, Metainfo}};
//!
//! let torrent = b"d8:announce23:http://tracker/announce4:infod6:lengthi40000e\
//!                 4:name8:data.bin12:piece lengthi32768e6:pieces40:\
//!                 0123456789abcdefghij0123456789abcdefghijee";
//!
//! let value = decode(torrent).unwrap();
//! let meta = Metainfo::from_value(&value).unwrap();
//!
//! assert_eq!(meta.name(), "data.bin");
//! assert_eq!(meta.piece_count(), 2);
//! assert_eq!(meta.piece_size(1), Some(40000 - 32768));
//! assert_eq!(meta.files(), &FileLayout::Single { length: 40000 });
//! assert_eq!(meta.info_hash().to_hex().len(), 40);
//! ```
//!
//! # Validation
//!
//! Every required key is checked when the view is built, and optional keys that are
//! present must have the right type; nothing is ever replaced by a default. Path segments
//! of multi-file torrents are rejected if they could escape the download directory.
//!
//! # Info-hash
//!
//! [`Metainfo::info_hash`] is the SHA-1 of the canonical encoding of the `info`
//! dictionary. It is computed on first use and then cached, and only depends on `info`.

mod error;
mod files;
mod info_hash;
mod view;

pub use self::{
    error::{MetainfoError, Reason},
    files::{FileEntry, FileLayout},
    info_hash::{InfoHash, ParseInfoHashError},
    view::Metainfo,
};
