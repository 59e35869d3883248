//! `Value`s hold arbitrary borrowed or owned bencode data.
//!
//! A decoded `Value` borrows its byte strings from the input buffer; call
//! [`Value::into_owned`] to keep it beyond the buffer's lifetime. Dictionaries are
//! held in raw key order, so [`Value::to_bencode`] always produces canonical output.
//!
//! If the `serde` feature is enabled, `Value` also implements `Serialize` and
//! `Deserialize`.

use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map},
    mem, str, vec,
};

#[cfg(feature = "serde")]
use serde_ as serde;

mod traverse;

pub use self::traverse::Visitor;

/// An owned or borrowed bencoded value.
///
/// Dropping a value and [`Value::into_owned`] keep their own work stacks, as does
/// [`Value::walk`]. The derived `Clone`, `PartialEq` and `Debug` impls recurse.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum Value<'a> {
    /// An owned or borrowed byte string
    Bytes(Cow<'a, [u8]>),
    /// A dictionary mapping byte strings to values
    Dict(BTreeMap<Cow<'a, [u8]>, Value<'a>>),
    /// A signed integer
    Integer(i64),
    /// A list of values
    List(Vec<Value<'a>>),
}

impl<'a> Value<'a> {
    /// Creates an owned byte string value from a UTF-8 string.
    pub fn string(s: &str) -> Value<'static> {
        Value::Bytes(Cow::Owned(s.as_bytes().to_vec()))
    }

    /// Convert this Value into an owned Value with static lifetime
    pub fn into_owned(self) -> Value<'static> {
        let mut stack: Vec<Detaching<'a>> = Vec::new();
        let mut pending = self;

        loop {
            // Descend to the first leaf or empty container under `pending`
            let mut finished = loop {
                match &mut pending {
                    Value::Bytes(bytes) => {
                        break Value::Bytes(Cow::Owned(mem::take(bytes).into_owned()));
                    },
                    Value::Integer(integer) => break Value::Integer(*integer),
                    Value::List(list) => {
                        let capacity = list.len();
                        let mut rest = mem::take(list).into_iter();
                        match rest.next() {
                            Some(first) => {
                                stack.push(Detaching::List(Vec::with_capacity(capacity), rest));
                                pending = first;
                            },
                            None => break Value::List(Vec::new()),
                        }
                    },
                    Value::Dict(dict) => {
                        let mut rest = mem::take(dict).into_iter();
                        match rest.next() {
                            Some((key, first)) => {
                                let key = Cow::Owned(key.into_owned());
                                stack.push(Detaching::Dict(BTreeMap::new(), rest, key));
                                pending = first;
                            },
                            None => break Value::Dict(BTreeMap::new()),
                        }
                    },
                }
            };

            // Hand `finished` to its parent, closing every parent it completes
            loop {
                match stack.last_mut() {
                    None => return finished,
                    Some(Detaching::List(owned, rest)) => {
                        owned.push(finished);
                        match rest.next() {
                            Some(next) => {
                                pending = next;
                                break;
                            },
                            None => {
                                finished = Value::List(mem::take(owned));
                                stack.pop();
                            },
                        }
                    },
                    Some(Detaching::Dict(owned, rest, key)) => {
                        owned.insert(mem::take(key), finished);
                        match rest.next() {
                            Some((next_key, next)) => {
                                *key = Cow::Owned(next_key.into_owned());
                                pending = next;
                                break;
                            },
                            None => {
                                finished = Value::Dict(mem::take(owned));
                                stack.pop();
                            },
                        }
                    },
                }
            }
        }
    }

    /// Name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bytes(_) => "byte string",
            Value::Dict(_) => "dictionary",
            Value::Integer(_) => "integer",
            Value::List(_) => "list",
        }
    }

    /// The integer, if this is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(integer) => Some(*integer),
            _ => None,
        }
    }

    /// The raw bytes, if this is a byte string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Returns the value as a UTF-8 string, if it is a byte string holding valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.as_bytes().and_then(|bytes| str::from_utf8(bytes).ok())
    }

    /// The members, if this is a list.
    pub fn as_list(&self) -> Option<&Vec<Value<'a>>> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    /// The entries in raw key order, if this is a dictionary.
    pub fn as_dict(&self) -> Option<&BTreeMap<Cow<'a, [u8]>, Value<'a>>> {
        match self {
            Value::Dict(dict) => Some(dict),
            _ => None,
        }
    }

    /// Looks up `key` if this value is a dictionary.
    pub fn get(&self, key: &[u8]) -> Option<&Value<'a>> {
        self.as_dict()?.get(key)
    }

    /// Encode this value canonically. See [`encode`](crate::encoding::encode).
    pub fn to_bencode(&self) -> Vec<u8> {
        crate::encoding::encode(self)
    }
}

/// A container half way through [`Value::into_owned`]: the members detached so far, the
/// members still borrowed, and for dictionaries the key of the member being detached.
enum Detaching<'a> {
    List(Vec<Value<'static>>, vec::IntoIter<Value<'a>>),
    Dict(
        BTreeMap<Cow<'static, [u8]>, Value<'static>>,
        btree_map::IntoIter<Cow<'a, [u8]>, Value<'a>>,
        Cow<'static, [u8]>,
    ),
}

impl Drop for Value<'_> {
    fn drop(&mut self) {
        let mut stack = match self {
            Value::List(list) if !list.is_empty() => mem::take(list),
            Value::Dict(dict) if !dict.is_empty() => mem::take(dict).into_values().collect(),
            _ => return,
        };
        // Members are emptied before they go out of scope, so their own drop returns at once
        while let Some(mut value) = stack.pop() {
            match &mut value {
                Value::List(list) => stack.append(list),
                Value::Dict(dict) => stack.extend(mem::take(dict).into_values()),
                Value::Bytes(_) | Value::Integer(_) => {},
            }
        }
    }
}

impl From<i64> for Value<'static> {
    fn from(integer: i64) -> Self {
        Value::Integer(integer)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Bytes(Cow::Borrowed(s.as_bytes()))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(bytes))
    }
}

impl From<Vec<u8>> for Value<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(bytes))
    }
}

impl<'a> From<Vec<Value<'a>>> for Value<'a> {
    fn from(list: Vec<Value<'a>>) -> Self {
        Value::List(list)
    }
}

impl<'a> From<BTreeMap<Cow<'a, [u8]>, Value<'a>>> for Value<'a> {
    fn from(dict: BTreeMap<Cow<'a, [u8]>, Value<'a>>) -> Self {
        Value::Dict(dict)
    }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use std::{
        fmt::{self, Formatter},
        marker::PhantomData,
    };

    use serde::{
        Serialize,
        de::Unexpected,
        ser::{SerializeMap, SerializeSeq},
    };
    use serde_bytes::Bytes;

    use super::*;

    impl<'a> Serialize for Value<'a> {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::ser::Serializer,
        {
            match self {
                Value::Bytes(string) => serializer.serialize_bytes(string),
                Value::Integer(int) => serializer.serialize_i64(*int),
                Value::List(list) => {
                    let mut seed = serializer.serialize_seq(Some(list.len()))?;
                    for value in list {
                        seed.serialize_element(value)?;
                    }
                    seed.end()
                },
                Value::Dict(dict) => {
                    let mut seed = serializer.serialize_map(Some(dict.len()))?;
                    for (k, v) in dict {
                        let bytes = Bytes::new(k);
                        seed.serialize_entry(bytes, v)?;
                    }
                    seed.end()
                },
            }
        }
    }

    impl<'de: 'a, 'a> serde::de::Deserialize<'de> for Value<'a> {
        #[inline]
        fn deserialize<D>(deserializer: D) -> Result<Value<'a>, D::Error>
        where
            D: serde::de::Deserializer<'de>,
        {
            deserializer.deserialize_any(ValueVisitor(PhantomData))
        }
    }

    struct ValueVisitor<'a>(PhantomData<&'a ()>);

    impl<'de: 'a, 'a> serde::de::Visitor<'de> for ValueVisitor<'a> {
        type Value = Value<'a>;

        fn expecting(&self, formatter: &mut Formatter) -> fmt::Result {
            formatter.write_str("any valid bencode value")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Value<'a>, E> {
            Ok(Value::Integer(value))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Value<'a>, E>
        where
            E: serde::de::Error,
        {
            i64::try_from(value)
                .map(Value::Integer)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_borrowed_bytes<E>(self, value: &'de [u8]) -> Result<Value<'a>, E>
        where
            E: serde::de::Error,
        {
            Ok(Value::Bytes(Cow::Borrowed(value)))
        }

        fn visit_borrowed_str<E>(self, value: &'de str) -> Result<Value<'a>, E>
        where
            E: serde::de::Error,
        {
            Ok(Value::Bytes(Cow::Borrowed(value.as_bytes())))
        }

        fn visit_str<E>(self, value: &str) -> Result<Value<'a>, E>
        where
            E: serde::de::Error,
        {
            Ok(Value::Bytes(Cow::Owned(value.as_bytes().to_vec())))
        }

        fn visit_bytes<E>(self, value: &[u8]) -> Result<Value<'a>, E>
        where
            E: serde::de::Error,
        {
            Ok(Value::Bytes(Cow::Owned(value.to_vec())))
        }

        fn visit_string<E>(self, value: String) -> Result<Value<'a>, E> {
            Ok(Value::Bytes(Cow::Owned(value.into_bytes())))
        }

        fn visit_byte_buf<E>(self, value: Vec<u8>) -> Result<Value<'a>, E> {
            Ok(Value::Bytes(Cow::Owned(value)))
        }

        fn visit_seq<V>(self, mut access: V) -> Result<Value<'a>, V::Error>
        where
            V: serde::de::SeqAccess<'de>,
        {
            let mut list = Vec::new();
            while let Some(e) = access.next_element()? {
                list.push(e);
            }
            Ok(Value::List(list))
        }

        fn visit_map<V>(self, mut access: V) -> Result<Value<'a>, V::Error>
        where
            V: serde::de::MapAccess<'de>,
        {
            let mut map = BTreeMap::new();
            while let Some((k, v)) = access.next_entry::<serde_bytes::ByteBuf, _>()? {
                map.insert(Cow::Owned(k.into_vec()), v);
            }
            Ok(Value::Dict(map))
        }
    }
}
