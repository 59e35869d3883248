use thiserror::Error;

/// Failure to build a [`Metainfo`](super::Metainfo) view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum MetainfoError {
    /// The decoded tree is not a well-formed metainfo dictionary.
    #[error("invalid metainfo: {0}")]
    InvalidMetainfo(#[from] Reason),
}

impl MetainfoError {
    /// The specific rule that was violated.
    pub fn reason(&self) -> &Reason {
        match self {
            MetainfoError::InvalidMetainfo(reason) => reason,
        }
    }
}

/// Why a tree was rejected as metainfo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Reason {
    /// A required key is absent.
    #[error("missing key {0:?}")]
    MissingKey(&'static str),

    /// A key is present but holds the wrong kind of value.
    #[error("key {key:?} should be a {expected}, found {found}")]
    WrongType {
        /// The offending key, or `<root>` for the top-level value.
        key: &'static str,
        /// What the key must hold.
        expected: &'static str,
        /// What it holds instead.
        found: &'static str,
    },

    /// `announce` is not a UTF-8 string.
    #[error("announce URL is not a UTF-8 string")]
    InvalidAnnounceUrl,

    /// `piece length` is zero or negative.
    #[error("piece length must be positive, found {0}")]
    InvalidPieceLength(i64),

    /// The length of `pieces` is not a multiple of 20.
    #[error("pieces holds {0} bytes, which is not a whole number of 20-byte hashes")]
    MalformedPieceHashes(usize),

    /// A file length is negative.
    #[error("file length must not be negative, found {0}")]
    InvalidLength(i64),

    /// `name` or a path segment could escape the download directory.
    #[error("unsafe path segment {0:?}")]
    UnsafePath(String),

    /// `info` holds both `length` and `files`.
    #[error("info holds both \"length\" and \"files\"")]
    AmbiguousFileLayout,
}

#[test]
fn metainfo_errors_are_sync_send() {
    fn is_send<T: Send>() {}
    fn is_sync<T: Sync>() {}
    is_send::<MetainfoError>();
    is_sync::<MetainfoError>();
}

#[test]
fn display_wraps_reason() {
    let err = MetainfoError::from(Reason::WrongType {
        key: "info",
        expected: "dictionary",
        found: "list",
    });
    assert_eq!(
        err.to_string(),
        "invalid metainfo: key \"info\" should be a dictionary, found list"
    );
}
