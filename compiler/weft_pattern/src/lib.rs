//! Character-level pattern algebra.
//!
//! A [`Pattern`] recognizes a prefix of a text window and reports its length
//! in bytes, or `None` for a mismatch. Patterns produce no value and carry no
//! state, so they are freely shared and cloned (an `Arc` per node).
//!
//! | Building block | Module |
//! |----------------|--------|
//! | Char predicates (`is_digit`, `among`, ...) | [`chars`] |
//! | Pattern type, combinators, basic constructors | [`pattern`] |
//! | Words, numbers, regex literals | [`lexical`] |
//!
//! Lengths are byte lengths of whole chars. A successful match of the window
//! `[begin, end)` is always within `0..=end - begin`.

pub mod chars;
mod error;
pub mod lexical;
pub mod pattern;

pub use chars::CharPredicate;
pub use error::BoundsError;
pub use pattern::Pattern;
