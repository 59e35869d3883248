use std::io::Read;

use crate::{
    decoding::{ReadError, decode},
    value::Value,
};

/// Read `source` to its end and decode the single value it holds.
///
/// At most `limit` bytes are accepted; a longer source fails with
/// [`ReadError::TooLarge`] without buffering the excess. Blocking reads are the only
/// suspension point, and the returned value owns its bytes.
///
/// ```
/// use bencode_metainfo::decoding::from_reader;
///
/// let value = from_reader(&b"l4:spami42ee"[..], 1 << 20).unwrap();
/// assert_eq!(value.as_list().map(Vec::len), Some(2));
/// ```
pub fn from_reader<R: Read>(source: R, limit: usize) -> Result<Value<'static>, ReadError> {
    let mut buffer = Vec::new();
    source
        .take((limit as u64).saturating_add(1))
        .read_to_end(&mut buffer)?;

    if buffer.len() > limit {
        return Err(ReadError::TooLarge { limit });
    }

    Ok(decode(&buffer)?.into_owned())
}
