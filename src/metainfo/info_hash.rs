use std::{fmt, str::FromStr};

use sha1::{Digest, Sha1};
use thiserror::Error;

/// The SHA-1 of a torrent's canonically encoded `info` dictionary.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InfoHash([u8; 20]);

/// A string that is not 40 hex digits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("info-hash must be 40 hex digits")]
pub struct ParseInfoHashError;

impl InfoHash {
    /// Hash the given bytes, which should be an encoded `info` dictionary.
    pub fn of(encoded_info: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(encoded_info);
        InfoHash(hasher.finalize().into())
    }

    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase hex, as used in magnet links and tracker logs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse 40 hex digits, either case.
    pub fn from_hex(s: &str) -> Result<Self, ParseInfoHashError> {
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| ParseInfoHashError)?;
        Ok(InfoHash(bytes))
    }
}

impl From<[u8; 20]> for InfoHash {
    fn from(bytes: [u8; 20]) -> Self {
        InfoHash(bytes)
    }
}

impl FromStr for InfoHash {
    type Err = ParseInfoHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        InfoHash::from_hex(s)
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "serde")]
impl serde_::Serialize for InfoHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde_::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}
