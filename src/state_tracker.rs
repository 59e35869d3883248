//! State tracking for decoding
//!
//! The tracker holds one entry per open container, so structural validation never
//! recurses no matter how deeply the input nests.

mod state;
mod token;

pub use self::token::Token;
pub(crate) use self::state::StateTracker;

/// Default bound on the number of simultaneously open lists and dictionaries.
pub const DEFAULT_MAX_DEPTH: usize = 1000;
