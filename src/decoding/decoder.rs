use std::{borrow::Cow, collections::BTreeMap, str};

use tracing::debug;

use crate::{
    decoding::{Error, ErrorKind},
    state_tracker::{StateTracker, Token},
    value::Value,
};

/// Decode exactly one value from `buffer`, rejecting anything after it.
pub fn decode(buffer: &[u8]) -> Result<Value<'_>, Error> {
    Decoder::new(buffer).decode()
}

/// Decode the value at the front of `buffer`, returning it together with the number
/// of bytes it occupied. Whatever follows is left untouched.
pub fn decode_prefix(buffer: &[u8]) -> Result<(Value<'_>, usize), Error> {
    let mut decoder = Decoder::new(buffer).with_trailing_data(TrailingData::Ignore);
    let value = decoder.decode_value()?;
    Ok((value, decoder.offset()))
}

/// What [`Decoder::decode`] does with bytes that follow the first complete value.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TrailingData {
    /// Fail with [`ErrorKind::TrailingData`].
    #[default]
    Reject,
    /// Stop after the first value and leave the rest unread.
    Ignore,
}

/// A bencode decoder
///
/// This can be used to either get a stream of tokens (using the [`Decoder::tokens()`] method) or to
/// read a complete value at a time (using the [`Decoder::decode_value()`]) method.
#[derive(Debug)]
pub struct Decoder<'a> {
    source: &'a [u8],
    offset: usize,
    state: StateTracker<&'a [u8]>,
    trailing: TrailingData,
}

/// Which kind of decimal number [`Decoder::take_int`] is reading.
#[derive(Copy, Clone)]
enum Number {
    /// `i<digits>e`, signed
    Integer,
    /// `<digits>:` in front of a byte string
    Length,
}

impl Number {
    fn terminator(self) -> u8 {
        match self {
            Number::Integer => b'e',
            Number::Length => b':',
        }
    }

    fn malformed(self) -> ErrorKind {
        match self {
            Number::Integer => ErrorKind::MalformedInteger,
            Number::Length => ErrorKind::MalformedLength,
        }
    }
}

impl<'ser> Decoder<'ser> {
    /// Create a new decoder from the given byte array
    pub fn new(buffer: &'ser [u8]) -> Self {
        Decoder {
            source: buffer,
            offset: 0,
            state: StateTracker::new(),
            trailing: TrailingData::default(),
        }
    }

    /// Set the maximum nesting depth of the decoder. An unlimited-depth decoder may be
    /// created using `with_max_depth(usize::MAX)`. Decoding, walking, encoding, dropping
    /// and [`Value::into_owned`] handle any depth, but the bookkeeping for open containers
    /// grows with the input, and the derived `Clone`, `PartialEq` and `Debug` impls of
    /// [`Value`] recurse once per level.
    #[must_use]
    pub fn with_max_depth(mut self, new_max_depth: usize) -> Self {
        self.state.set_max_depth(new_max_depth);
        self
    }

    /// Choose how [`Decoder::decode`] treats bytes after the first value.
    #[must_use]
    pub fn with_trailing_data(mut self, policy: TrailingData) -> Self {
        self.trailing = policy;
        self
    }

    /// Number of bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether every dictionary read so far had its keys in canonical order.
    pub fn keys_sorted(&self) -> bool {
        self.state.unsorted_keys() == 0
    }

    fn take_byte(&mut self) -> Option<u8> {
        let byte = self.source.get(self.offset).copied();
        if byte.is_some() {
            self.offset += 1;
        }
        byte
    }

    fn take_chunk(&mut self, count: usize) -> Option<&'ser [u8]> {
        match self.offset.checked_add(count) {
            Some(end_pos) if end_pos <= self.source.len() => {
                let ret = &self.source[self.offset..end_pos];
                self.offset = end_pos;
                Some(ret)
            },
            _ => None,
        }
    }

    fn take_int(&mut self, number: Number) -> Result<&'ser str, Error> {
        enum State {
            Start,
            Sign,
            Zero,
            Digits,
        }

        let terminator = number.terminator();
        let malformed = |at: usize| Error::new(number.malformed(), at);

        let mut curpos = self.offset;
        let mut state = State::Start;

        let mut success = false;
        while curpos < self.source.len() {
            let c = self.source[curpos];
            match state {
                State::Start => match c {
                    b'-' if matches!(number, Number::Integer) => state = State::Sign,
                    b'0' => state = State::Zero,
                    b'1'..=b'9' => state = State::Digits,
                    _ => return Err(malformed(curpos)),
                },
                State::Zero => {
                    if c == terminator {
                        success = true;
                        break;
                    }
                    return Err(malformed(curpos));
                },
                State::Sign => match c {
                    b'1'..=b'9' => state = State::Digits,
                    _ => return Err(malformed(curpos)),
                },
                State::Digits => match c {
                    b'0'..=b'9' => {},
                    c if c == terminator => {
                        success = true;
                        break;
                    },
                    _ => return Err(malformed(curpos)),
                },
            }
            curpos += 1;
        }

        if !success {
            return Err(Error::new(ErrorKind::TruncatedInput, curpos));
        }

        let slice = &self.source[self.offset..curpos];
        let start = self.offset;
        self.offset = curpos + 1;

        // Every byte has been checked to be ASCII above
        str::from_utf8(slice).map_err(|_| malformed(start))
    }

    fn raw_next_token(&mut self) -> Result<Token<'ser>, Error> {
        let start = self.offset;
        let byte = self
            .take_byte()
            .ok_or(Error::new(ErrorKind::TruncatedInput, start))?;

        let token = match byte {
            b'e' => Token::End,
            b'l' => Token::List,
            b'd' => Token::Dict,
            b'i' => Token::Num(self.take_int(Number::Integer)?),
            b'0'..=b'9' => {
                self.offset -= 1;

                let digits = self.take_int(Number::Length)?;
                let len = digits
                    .parse::<usize>()
                    .map_err(|_| Error::new(ErrorKind::MalformedLength, start))?;
                let payload = self.offset;
                Token::String(
                    self.take_chunk(len)
                        .ok_or(Error::new(ErrorKind::TruncatedInput, payload))?,
                )
            },
            tag => return Err(Error::new(ErrorKind::UnknownTag(tag), start)),
        };

        Ok(token)
    }

    /// Read the next token. Returns `Ok(Some(token))` if a token was successfully read,
    /// `Ok(None)` at a clean end of input.
    fn next_token(&mut self) -> Result<Option<Token<'ser>>, Error> {
        self.state.check_error()?;

        let start = self.offset;
        if start == self.source.len() {
            self.state.observe_eof(start)?;
            return Ok(None);
        }

        let tok_result = self.raw_next_token();
        let tok = self.state.latch_err(tok_result)?;

        let unsorted_before = self.state.unsorted_keys();
        self.state.observe_token(&tok, start)?;
        if self.state.unsorted_keys() > unsorted_before {
            debug!(
                offset = start,
                depth = self.state.depth(),
                "accepting dictionary key out of canonical order"
            );
        }

        Ok(Some(tok))
    }

    /// Iterate over the tokens in the input stream. This guarantees that the resulting stream
    /// of tokens constitutes a valid bencoded structure.
    pub fn tokens(self) -> Tokens<'ser> {
        Tokens(self)
    }
}

/// Iterator over the tokens in the input stream. This guarantees that the resulting stream
/// of tokens constitutes a valid bencoded structure.
pub struct Tokens<'a>(Decoder<'a>);

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        // Only report an error once
        if self.0.state.check_error().is_err() {
            return None;
        }
        match self.0.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

// High level interface

/// A list or dictionary whose closing token hasn't been read yet
enum Partial<'a> {
    List(Vec<Value<'a>>),
    Dict {
        entries: BTreeMap<Cow<'a, [u8]>, Value<'a>>,
        pending_key: Option<&'a [u8]>,
    },
}

impl<'ser> Decoder<'ser> {
    /// Read the next complete value from the input.
    ///
    /// Containers are assembled on an explicit stack, so the call stack stays flat
    /// regardless of how deeply the input nests. Calling this repeatedly reads
    /// consecutive values; bytes after the value are not inspected.
    pub fn decode_value(&mut self) -> Result<Value<'ser>, Error> {
        let mut open: Vec<Partial<'ser>> = Vec::new();

        loop {
            let start = self.offset;
            let token = match self.next_token()? {
                Some(token) => token,
                None => {
                    return self
                        .state
                        .latch_err(Err(Error::new(ErrorKind::TruncatedInput, start)));
                },
            };

            let value = match token {
                Token::List => {
                    open.push(Partial::List(Vec::new()));
                    continue;
                },
                Token::Dict => {
                    open.push(Partial::Dict {
                        entries: BTreeMap::new(),
                        pending_key: None,
                    });
                    continue;
                },
                Token::String(bytes) => {
                    if let Some(Partial::Dict {
                        pending_key: pending_key @ None,
                        ..
                    }) = open.last_mut()
                    {
                        *pending_key = Some(bytes);
                        continue;
                    }
                    Value::Bytes(Cow::Borrowed(bytes))
                },
                Token::Num(digits) => match digits.parse::<i64>() {
                    Ok(integer) => Value::Integer(integer),
                    // The syntax was checked while tokenizing, so only range remains
                    Err(_) => {
                        return self
                            .state
                            .latch_err(Err(Error::new(ErrorKind::IntegerOverflow, start)));
                    },
                },
                Token::End => match open.pop() {
                    Some(Partial::List(items)) => Value::List(items),
                    Some(Partial::Dict { entries, .. }) => Value::Dict(entries),
                    // The state tracker rejects an unmatched end before we get here
                    None => {
                        return self
                            .state
                            .latch_err(Err(Error::new(ErrorKind::UnknownTag(b'e'), start)));
                    },
                },
            };

            match open.last_mut() {
                None => return Ok(value),
                Some(Partial::List(items)) => items.push(value),
                Some(Partial::Dict {
                    entries,
                    pending_key,
                }) => {
                    if let Some(key) = pending_key.take() {
                        entries.insert(Cow::Borrowed(key), value);
                    }
                },
            }
        }
    }

    /// Read one value and apply the trailing-data policy to whatever follows it.
    pub fn decode(mut self) -> Result<Value<'ser>, Error> {
        let value = self.decode_value()?;

        if self.trailing == TrailingData::Reject && self.offset < self.source.len() {
            return self
                .state
                .latch_err(Err(Error::new(ErrorKind::TrailingData, self.offset)));
        }

        Ok(value)
    }
}
