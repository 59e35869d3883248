//! Human-readable renderings of a [`Value`](crate::Value), for debugging and for the
//! `torrent-inspect` tool.
//!
//! * [`Display`](std::fmt::Display) prints the value's bencode on one line. Byte strings
//!   that hold anything outside the printable ASCII range are written as `\xNN` escapes.
//! * [`Value::as_pretty_printed`](crate::Value::as_pretty_printed) puts every list member
//!   and every dictionary key and value on its own line, indented by tabs.
//! * [`Value::as_rust_string_literal`](crate::Value::as_rust_string_literal) renders the
//!   pretty form as a Rust byte-string literal, ready to paste into a test.
//!
//! ```
//! use bencode_metainfo::decoding::decode;
//!
//! let value = decode(b"li1e3:\x00\x01\x02e").unwrap();
//! assert_eq!(value.to_string(), r"li1e3:\x00\x01\x02e");
//! assert_eq!(value.as_pretty_printed(), "l\n\ti1e\n\t3:\\x00\\x01\\x02\ne");
//! ```

mod display;
