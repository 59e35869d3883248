use std::str;

use super::{Reason, view::expect};
use crate::value::Value;

/// How the torrent's content maps onto files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileLayout<'a> {
    /// One file, named after the torrent.
    Single {
        /// Size of the file in bytes.
        length: u64,
    },
    /// A directory, named after the torrent, holding these files in piece order.
    Multi {
        /// The files, in the order their bytes appear in the pieces.
        files: Vec<FileEntry<'a>>,
    },
}

/// A file within a multi-file torrent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry<'a> {
    /// Size of the file in bytes.
    pub length: u64,
    /// Path segments below the torrent directory; never empty, and no segment is empty,
    /// `.`, `..`, or contains a separator.
    pub path: Vec<&'a str>,
    /// Byte offset of the file within the concatenated torrent content.
    pub offset: u64,
}

impl<'a> FileLayout<'a> {
    /// Sum of all file lengths.
    pub fn total_length(&self) -> u64 {
        match self {
            FileLayout::Single { length } => *length,
            FileLayout::Multi { files } => files
                .iter()
                .fold(0u64, |total, file| total.saturating_add(file.length)),
        }
    }

    /// Reads `length` or `files` from an `info` dictionary.
    pub(super) fn from_info(info: &'a Value<'a>) -> Result<Self, Reason> {
        match (info.get(b"length"), info.get(b"files")) {
            (Some(_), Some(_)) => Err(Reason::AmbiguousFileLayout),
            (None, None) => Err(Reason::MissingKey("length")),
            (Some(length), None) => Ok(FileLayout::Single {
                length: file_length(length)?,
            }),
            (None, Some(files)) => {
                let list = expect(files, "files", "list", Value::as_list)?;
                let mut entries = Vec::with_capacity(list.len());
                let mut offset = 0u64;
                for file in list {
                    let entry = file_entry(file, offset)?;
                    offset = offset.saturating_add(entry.length);
                    entries.push(entry);
                }
                Ok(FileLayout::Multi { files: entries })
            },
        }
    }
}

impl FileEntry<'_> {
    /// Path segments joined with `/`.
    pub fn joined_path(&self) -> String {
        self.path.join("/")
    }
}

fn file_entry<'a>(file: &'a Value<'a>, offset: u64) -> Result<FileEntry<'a>, Reason> {
    expect(file, "files", "list of dictionaries", Value::as_dict)?;

    let length = file_length(file.get(b"length").ok_or(Reason::MissingKey("length"))?)?;

    let segments = expect(
        file.get(b"path").ok_or(Reason::MissingKey("path"))?,
        "path",
        "list",
        Value::as_list,
    )?;
    if segments.is_empty() {
        return Err(Reason::UnsafePath(String::new()));
    }
    let path = segments
        .iter()
        .map(path_segment)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FileEntry {
        length,
        path,
        offset,
    })
}

fn file_length(value: &Value) -> Result<u64, Reason> {
    let length = expect(value, "length", "integer", Value::as_integer)?;
    u64::try_from(length).map_err(|_| Reason::InvalidLength(length))
}

/// A UTF-8 string usable as a single path component on every common platform.
pub(super) fn path_segment<'a>(value: &'a Value<'a>) -> Result<&'a str, Reason> {
    let bytes = expect(value, "path", "byte string", Value::as_bytes)?;
    let segment = str::from_utf8(bytes)
        .map_err(|_| Reason::UnsafePath(String::from_utf8_lossy(bytes).into_owned()))?;

    let unsafe_segment = segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0']);
    if unsafe_segment {
        return Err(Reason::UnsafePath(segment.to_owned()));
    }
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoding::decode;

    fn layout(info: &[u8]) -> Result<FileLayout<'static>, Reason> {
        let value = decode(info).unwrap().into_owned();
        // Leak so the borrowed layout can outlive this helper.
        let value: &'static Value<'static> = Box::leak(Box::new(value));
        FileLayout::from_info(value)
    }

    #[test]
    fn single_file() {
        assert_eq!(
            layout(b"d6:lengthi12ee"),
            Ok(FileLayout::Single { length: 12 })
        );
        assert_eq!(layout(b"d6:lengthi-1ee"), Err(Reason::InvalidLength(-1)));
        assert_eq!(
            layout(b"d6:length1:5e"),
            Err(Reason::WrongType {
                key: "length",
                expected: "integer",
                found: "byte string"
            })
        );
    }

    #[test]
    fn multi_file_offsets_accumulate() {
        let files = layout(b"d5:filesld6:lengthi3e4:pathl1:a1:bee\
                              d6:lengthi4e4:pathl1:ceeee")
        .unwrap();
        assert_eq!(files.total_length(), 7);
        match files {
            FileLayout::Multi { files } => {
                assert_eq!(files.len(), 2);
                assert_eq!(files[0].path, ["a", "b"]);
                assert_eq!(files[0].joined_path(), "a/b");
                assert_eq!(files[0].offset, 0);
                assert_eq!(files[1].path, ["c"]);
                assert_eq!(files[1].offset, 3);
            },
            other => panic!("expected multi-file layout, got {:?}", other),
        }
    }

    #[test]
    fn exactly_one_layout_key() {
        assert_eq!(
            layout(b"d5:filesle6:lengthi1ee"),
            Err(Reason::AmbiguousFileLayout)
        );
        assert_eq!(layout(b"de"), Err(Reason::MissingKey("length")));
    }

    #[test]
    fn rejects_unsafe_segments() {
        for (info, segment) in [
            (&b"d5:filesld6:lengthi1e4:pathl2:..eeee"[..], ".."),
            (b"d5:filesld6:lengthi1e4:pathl1:.eeee", "."),
            (b"d5:filesld6:lengthi1e4:pathl0:eeee", ""),
            (b"d5:filesld6:lengthi1e4:pathl3:a/beeee", "a/b"),
            (b"d5:filesld6:lengthi1e4:pathl3:a\\beeee", "a\\b"),
            (b"d5:filesld6:lengthi1e4:pathl2:a\0eeee", "a\0"),
            (b"d5:filesld6:lengthi1e4:pathleeee", ""),
        ] {
            assert_eq!(
                layout(info),
                Err(Reason::UnsafePath(segment.to_owned())),
                "{}",
                String::from_utf8_lossy(info)
            );
        }
    }

    #[test]
    fn rejects_malformed_entries() {
        assert_eq!(
            layout(b"d5:filesli1eee"),
            Err(Reason::WrongType {
                key: "files",
                expected: "list of dictionaries",
                found: "integer"
            })
        );
        assert_eq!(
            layout(b"d5:filesld4:pathl1:aeeee"),
            Err(Reason::MissingKey("length"))
        );
        assert_eq!(
            layout(b"d5:filesld6:lengthi1eeee"),
            Err(Reason::MissingKey("path"))
        );
        assert_eq!(
            layout(b"d5:filesld6:lengthi1e4:pathli1eeeee"),
            Err(Reason::WrongType {
                key: "path",
                expected: "byte string",
                found: "integer"
            })
        );
    }
}
