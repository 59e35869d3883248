use std::sync::OnceLock;

use tracing::{debug, trace};

use super::{
    FileLayout, InfoHash, MetainfoError, Reason,
    files::path_segment,
};
use crate::{encoding::encode, value::Value};

const PIECE_HASH_LEN: usize = 20;

/// A torrent's metainfo, validated and borrowed from its decoded root dictionary.
///
/// The view is immutable, and [`Send`] + [`Sync`]: the info-hash is computed at most once
/// even when several threads ask for it.
#[derive(Debug, Clone)]
pub struct Metainfo<'a> {
    announce: &'a str,
    announce_list: Option<Vec<Vec<&'a str>>>,
    comment: Option<&'a str>,
    created_by: Option<&'a str>,
    creation_date: Option<i64>,
    info: &'a Value<'a>,
    name: &'a str,
    piece_length: u64,
    pieces: &'a [u8],
    files: FileLayout<'a>,
    private: bool,
    info_hash: OnceLock<InfoHash>,
}

impl<'a> Metainfo<'a> {
    /// Validate `root` as a metainfo dictionary and build a view over it.
    pub fn from_value(root: &'a Value<'a>) -> Result<Self, MetainfoError> {
        expect(root, "<root>", "dictionary", Value::as_dict)?;

        let announce = root
            .get(b"announce")
            .ok_or(Reason::MissingKey("announce"))?
            .as_str()
            .ok_or(Reason::InvalidAnnounceUrl)?;

        let info = root.get(b"info").ok_or(Reason::MissingKey("info"))?;
        expect(info, "info", "dictionary", Value::as_dict)?;

        let piece_length = expect(
            info.get(b"piece length")
                .ok_or(Reason::MissingKey("piece length"))?,
            "piece length",
            "integer",
            Value::as_integer,
        )?;
        let piece_length = match u64::try_from(piece_length) {
            Ok(length) if length > 0 => length,
            _ => return Err(Reason::InvalidPieceLength(piece_length).into()),
        };

        let pieces = expect(
            info.get(b"pieces").ok_or(Reason::MissingKey("pieces"))?,
            "pieces",
            "byte string",
            Value::as_bytes,
        )?;
        if pieces.len() % PIECE_HASH_LEN != 0 {
            return Err(Reason::MalformedPieceHashes(pieces.len()).into());
        }

        let files = FileLayout::from_info(info)?;

        let name = path_segment(info.get(b"name").ok_or(Reason::MissingKey("name"))?)
            .map_err(|reason| match reason {
                Reason::WrongType { expected, found, .. } => Reason::WrongType {
                    key: "name",
                    expected,
                    found,
                },
                other => other,
            })?;

        let announce_list = root
            .get(b"announce-list")
            .map(announce_tiers)
            .transpose()?;
        let comment = optional(root, "comment", "UTF-8 string", Value::as_str)?;
        let created_by = optional(root, "created by", "UTF-8 string", Value::as_str)?;
        let creation_date = optional(root, "creation date", "integer", Value::as_integer)?;
        let private = optional(info, "private", "integer", Value::as_integer)? == Some(1);

        let metainfo = Metainfo {
            announce,
            announce_list,
            comment,
            created_by,
            creation_date,
            info,
            name,
            piece_length,
            pieces,
            files,
            private,
            info_hash: OnceLock::new(),
        };

        debug!(
            name = metainfo.name,
            pieces = metainfo.piece_count(),
            multi_file = matches!(metainfo.files, FileLayout::Multi { .. }),
            "built metainfo view"
        );

        Ok(metainfo)
    }

    /// The primary tracker URL.
    pub fn announce(&self) -> &'a str {
        self.announce
    }

    /// Tracker tiers from `announce-list`, if present.
    pub fn announce_list(&self) -> Option<&[Vec<&'a str>]> {
        self.announce_list.as_deref()
    }

    /// `announce` followed by every `announce-list` URL, each URL once.
    pub fn trackers(&self) -> Vec<&'a str> {
        let mut trackers = vec![self.announce];
        for url in self.announce_list.iter().flatten().flatten() {
            if !trackers.contains(url) {
                trackers.push(*url);
            }
        }
        trackers
    }

    /// Suggested file or directory name.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Bytes per piece.
    pub fn piece_length(&self) -> u64 {
        self.piece_length
    }

    /// The concatenated 20-byte piece hashes.
    pub fn pieces(&self) -> &'a [u8] {
        self.pieces
    }

    /// Number of pieces.
    pub fn piece_count(&self) -> usize {
        self.pieces.len() / PIECE_HASH_LEN
    }

    /// SHA-1 of piece `index`, or `None` past the last piece.
    pub fn piece_hash(&self, index: usize) -> Option<&'a [u8; 20]> {
        let start = index.checked_mul(PIECE_HASH_LEN)?;
        let end = start.checked_add(PIECE_HASH_LEN)?;
        self.pieces.get(start..end)?.try_into().ok()
    }

    /// Every piece hash, in piece order.
    pub fn piece_hashes(&self) -> impl Iterator<Item = &'a [u8; 20]> + use<'a> {
        let pieces: &'a [u8] = self.pieces;
        pieces
            .chunks_exact(PIECE_HASH_LEN)
            .filter_map(|chunk| <&[u8; 20]>::try_from(chunk).ok())
    }

    /// Size in bytes of piece `index`. Every piece is `piece_length` long except the last,
    /// which holds whatever remains of [`total_length`](Self::total_length).
    pub fn piece_size(&self, index: usize) -> Option<u64> {
        if index >= self.piece_count() {
            return None;
        }
        let start = (index as u64).saturating_mul(self.piece_length);
        Some(self.total_length().saturating_sub(start).min(self.piece_length))
    }

    /// How the content is split into files.
    pub fn files(&self) -> &FileLayout<'a> {
        &self.files
    }

    /// Size of the torrent's content in bytes.
    pub fn total_length(&self) -> u64 {
        self.files.total_length()
    }

    /// Whether `info.private` is 1: peers should only come from the listed trackers.
    pub fn is_private(&self) -> bool {
        self.private
    }

    /// Free-form `comment`.
    pub fn comment(&self) -> Option<&'a str> {
        self.comment
    }

    /// The program that created the torrent.
    pub fn created_by(&self) -> Option<&'a str> {
        self.created_by
    }

    /// Creation time in seconds since the Unix epoch.
    pub fn creation_date(&self) -> Option<i64> {
        self.creation_date
    }

    /// The raw `info` dictionary.
    pub fn info(&self) -> &'a Value<'a> {
        self.info
    }

    /// SHA-1 of the canonical encoding of [`info`](Self::info).
    pub fn info_hash(&self) -> InfoHash {
        *self.info_hash.get_or_init(|| {
            let encoded = encode(self.info);
            let hash = InfoHash::of(&encoded);
            trace!(%hash, bytes = encoded.len(), "computed info-hash");
            hash
        })
    }
}

/// `project` applied to `value`, or a `WrongType` naming what was found instead.
pub(super) fn expect<'v, 'a, T>(
    value: &'v Value<'a>,
    key: &'static str,
    expected: &'static str,
    project: impl FnOnce(&'v Value<'a>) -> Option<T>,
) -> Result<T, Reason> {
    project(value).ok_or(Reason::WrongType {
        key,
        expected,
        found: found(value),
    })
}

fn found(value: &Value) -> &'static str {
    match value {
        Value::Bytes(_) if value.as_str().is_none() => "non-UTF-8 byte string",
        _ => value.kind(),
    }
}

fn optional<'a, T>(
    dict: &'a Value<'a>,
    key: &'static str,
    expected: &'static str,
    project: impl FnOnce(&'a Value<'a>) -> Option<T>,
) -> Result<Option<T>, Reason> {
    dict.get(key.as_bytes())
        .map(|value| expect(value, key, expected, project))
        .transpose()
}

fn announce_tiers<'a>(value: &'a Value<'a>) -> Result<Vec<Vec<&'a str>>, Reason> {
    const KEY: &str = "announce-list";

    expect(value, KEY, "list of tiers", Value::as_list)?
        .iter()
        .map(|tier| -> Result<Vec<&'a str>, Reason> {
            expect(tier, KEY, "list of URLs", Value::as_list)?
                .iter()
                .map(|url| expect(url, KEY, "UTF-8 string", Value::as_str))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::decode;

    const SINGLE: &[u8] = b"d8:announce13:http://t/annc7:comment2:hi10:created by4:test\
        13:creation datei1700000000e4:infod6:lengthi50e4:name5:a.txt12:piece lengthi20e\
        6:pieces60:000000000000000000001111111111111111111122222222222222222222\
        7:privatei1eee";

    fn with_view<R>(input: &[u8], check: impl FnOnce(Result<Metainfo, MetainfoError>) -> R) -> R {
        let value = decode(input).unwrap();
        check(Metainfo::from_value(&value))
    }

    fn reason(input: &[u8]) -> Reason {
        with_view(input, |view| view.unwrap_err().reason().clone())
    }

    #[test]
    fn reads_every_field() {
        with_view(SINGLE, |view| {
            let view = view.unwrap();
            assert_eq!(view.announce(), "http://t/annc");
            assert_eq!(view.comment(), Some("hi"));
            assert_eq!(view.created_by(), Some("test"));
            assert_eq!(view.creation_date(), Some(1_700_000_000));
            assert_eq!(view.name(), "a.txt");
            assert_eq!(view.piece_length(), 20);
            assert_eq!(view.piece_count(), 3);
            assert_eq!(view.piece_hash(1), Some(&[b'1'; 20]));
            assert_eq!(view.piece_hash(3), None);
            assert_eq!(view.piece_hashes().count(), 3);
            assert_eq!(view.files(), &FileLayout::Single { length: 50 });
            assert_eq!(view.total_length(), 50);
            assert!(view.is_private());
            assert_eq!(view.announce_list(), None);
            assert_eq!(view.trackers(), ["http://t/annc"]);
            assert_eq!(view.info().get(b"name").and_then(Value::as_str), Some("a.txt"));
        });
    }

    #[test]
    fn last_piece_is_short() {
        with_view(SINGLE, |view| {
            let view = view.unwrap();
            assert_eq!(view.piece_size(0), Some(20));
            assert_eq!(view.piece_size(1), Some(20));
            assert_eq!(view.piece_size(2), Some(10));
            assert_eq!(view.piece_size(3), None);
        });
    }

    #[test]
    fn info_hash_covers_canonical_info() {
        with_view(SINGLE, |view| {
            let view = view.unwrap();
            let info = encode(view.info());
            assert_eq!(view.info_hash(), InfoHash::of(&info));
            assert_eq!(view.info_hash(), view.info_hash());
        });
    }

    #[test]
    fn trackers_are_deduplicated() {
        let input = b"d8:announce1:a13:announce-listll1:a1:bel1:cl1:beee\
                      4:infod6:lengthi0e4:name1:x12:piece lengthi1e6:pieces0:ee";
        // The second tier holds a nested list, which is not a URL.
        assert_eq!(
            reason(input),
            Reason::WrongType {
                key: "announce-list",
                expected: "UTF-8 string",
                found: "list"
            }
        );

        let input = b"d8:announce1:a13:announce-listll1:a1:bel1:c1:bee\
                      4:infod6:lengthi0e4:name1:x12:piece lengthi1e6:pieces0:ee";
        with_view(input, |view| {
            let view = view.unwrap();
            assert_eq!(view.trackers(), ["a", "b", "c"]);
            assert_eq!(
                view.announce_list(),
                Some(&[vec!["a", "b"], vec!["c", "b"]][..])
            );
        });
    }

    #[test]
    fn required_keys() {
        assert_eq!(
            reason(b"i1e"),
            Reason::WrongType {
                key: "<root>",
                expected: "dictionary",
                found: "integer"
            }
        );
        assert_eq!(reason(b"de"), Reason::MissingKey("announce"));
        assert_eq!(reason(b"d8:announcei1ee"), Reason::InvalidAnnounceUrl);
        assert_eq!(reason(b"d8:announce2:\xff\xfee"), Reason::InvalidAnnounceUrl);
        assert_eq!(reason(b"d8:announce1:ae"), Reason::MissingKey("info"));
        assert_eq!(
            reason(b"d8:announce1:a4:infolee"),
            Reason::WrongType {
                key: "info",
                expected: "dictionary",
                found: "list"
            }
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infodee"),
            Reason::MissingKey("piece length")
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod12:piece lengthi1eee"),
            Reason::MissingKey("pieces")
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod12:piece lengthi1e6:pieces0:ee"),
            Reason::MissingKey("length")
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod6:lengthi0e12:piece lengthi1e6:pieces0:ee"),
            Reason::MissingKey("name")
        );
    }

    #[test]
    fn rejects_bad_values() {
        assert_eq!(
            reason(
                b"d8:announce1:a4:infod6:lengthi0e4:name2:..\
                  12:piece lengthi1e6:pieces0:ee"
            ),
            Reason::UnsafePath("..".into())
        );
        assert_eq!(
            reason(
                b"d8:announce1:a4:infod6:lengthi0e4:namei1e\
                  12:piece lengthi1e6:pieces0:ee"
            ),
            Reason::WrongType {
                key: "name",
                expected: "byte string",
                found: "integer"
            }
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod4:name1:x12:piece lengthi0eee"),
            Reason::InvalidPieceLength(0)
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod4:name1:x12:piece lengthi-5eee"),
            Reason::InvalidPieceLength(-5)
        );
        assert_eq!(
            reason(b"d8:announce1:a4:infod4:name1:x12:piece lengthi1e6:pieces3:abcee"),
            Reason::MalformedPieceHashes(3)
        );
        assert_eq!(
            reason(
                b"d8:announce1:a7:commenti1e4:infod6:lengthi0e4:name1:x\
                  12:piece lengthi1e6:pieces0:ee"
            ),
            Reason::WrongType {
                key: "comment",
                expected: "UTF-8 string",
                found: "integer"
            }
        );
        assert_eq!(
            reason(
                b"d8:announce1:a4:infod6:lengthi0e4:name1:x\
                  12:piece lengthi1e6:pieces0:7:private1:1ee"
            ),
            Reason::WrongType {
                key: "private",
                expected: "integer",
                found: "byte string"
            }
        );
    }

    #[test]
    fn view_is_send_and_sync() {
        fn is_send_sync<T: Send + Sync>() {}
        is_send_sync::<Metainfo<'static>>();
    }
}
