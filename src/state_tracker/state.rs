use std::collections::BTreeSet;

use crate::{
    decoding::{Error, ErrorKind},
    state_tracker::{DEFAULT_MAX_DEPTH, Token},
};

/// The state of current level of the decoder
#[derive(Clone, Eq, PartialEq, Debug)]
enum State<S: Ord> {
    /// An inner list. Allows any token
    Seq,
    /// Inside a map, expecting a key. Contains every key read so far, so duplicates
    /// can be rejected and out-of-order keys noticed
    MapKey(BTreeSet<S>),
    /// Inside a map, expecting a value
    MapValue(BTreeSet<S>),
    /// Received an error while decoding
    Failed(Error),
}

/// Used to validate that a structure is valid
#[derive(Debug)]
pub(crate) struct StateTracker<S: Ord> {
    state: Vec<State<S>>,
    max_depth: usize,
    unsorted_keys: usize,
}

impl<S: Ord> Default for StateTracker<S> {
    fn default() -> Self {
        StateTracker {
            state: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            unsorted_keys: 0,
        }
    }
}

impl<S> StateTracker<S>
where
    S: AsRef<[u8]> + Ord,
{
    pub fn new() -> Self {
        <Self as Default>::default()
    }

    pub fn set_max_depth(&mut self, new_max_depth: usize) {
        self.max_depth = new_max_depth
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.state.len()
    }

    /// How many dictionary keys so far arrived before a key that sorts after them.
    pub fn unsorted_keys(&self) -> usize {
        self.unsorted_keys
    }

    /// Observe that an EOF was seen. This function is idempotent.
    pub fn observe_eof(&mut self, offset: usize) -> Result<(), Error> {
        self.check_error()?;

        if self.state.is_empty() {
            Ok(())
        } else {
            self.latch_err(Err(Error::new(ErrorKind::UnterminatedContainer, offset)))
        }
    }

    #[allow(clippy::match_same_arms)]
    pub fn observe_token<'a>(&mut self, token: &Token<'a>, offset: usize) -> Result<(), Error>
    where
        S: From<&'a [u8]>,
    {
        use self::{State::*, Token::*};

        self.check_error()?;

        match (self.state.pop(), *token) {
            (None, End) => {
                return self.latch_err(Err(Error::new(ErrorKind::UnknownTag(b'e'), offset)));
            },
            (Some(Seq), End) => {},
            (Some(MapKey(_)), End) => {},
            (Some(MapKey(mut keys)), String(label)) => {
                let label = S::from(label);
                if keys.contains(&label) {
                    let duplicate = label.as_ref().to_vec();
                    self.state.push(MapKey(keys));
                    return self.latch_err(Err(Error::new(
                        ErrorKind::DuplicateKey(duplicate),
                        offset,
                    )));
                }
                if keys.last().is_some_and(|greatest| *greatest > label) {
                    self.unsorted_keys += 1;
                }
                keys.insert(label);
                self.state.push(MapValue(keys));
            },
            (Some(oldstate @ MapKey(_)), tok) => {
                self.state.push(oldstate);
                return self.latch_err(Err(Error::new(
                    ErrorKind::InvalidKeyType(tok.name()),
                    offset,
                )));
            },
            (Some(MapValue(keys)), List) => {
                self.state.push(MapKey(keys));
                self.enter(Seq, offset)?;
            },
            (Some(MapValue(keys)), Dict) => {
                self.state.push(MapKey(keys));
                self.enter(MapKey(BTreeSet::new()), offset)?;
            },
            (Some(oldstate @ MapValue(_)), End) => {
                self.state.push(oldstate);
                return self.latch_err(Err(Error::new(ErrorKind::MissingValue, offset)));
            },
            (Some(MapValue(keys)), _) => {
                self.state.push(MapKey(keys));
            },
            (oldstate, List) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
                self.enter(Seq, offset)?;
            },
            (oldstate, Dict) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
                self.enter(MapKey(BTreeSet::new()), offset)?;
            },
            (oldstate, _) => {
                if let Some(oldstate) = oldstate {
                    self.state.push(oldstate);
                }
            },
        }
        Ok(())
    }

    fn enter(&mut self, container: State<S>, offset: usize) -> Result<(), Error> {
        if self.state.len() >= self.max_depth {
            return self.latch_err(Err(Error::new(ErrorKind::NestingTooDeep, offset)));
        }
        self.state.push(container);
        Ok(())
    }

    pub fn latch_err<T>(&mut self, result: Result<T, Error>) -> Result<T, Error> {
        self.check_error()?;
        if let Err(ref err) = result {
            self.state.push(State::Failed(err.clone()))
        }
        result
    }

    pub fn check_error(&self) -> Result<(), Error> {
        if let Some(State::Failed(error)) = self.state.last() {
            Err(error.clone())
        } else {
            Ok(())
        }
    }
}
