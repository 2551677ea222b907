use thiserror::Error;

/// Why a tokenizer could not turn a scanned range into a token.
///
/// Scanners decide what text a token covers, so these only show up when a
/// tokenizer is paired with a scanner that accepts more than it can handle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("range {begin}+{len} is not a valid slice of the source")]
    Range { begin: usize, len: usize },
    #[error("illegal char literal {0}")]
    IllegalChar(String),
    #[error("invalid digit {digit:?} in {text}")]
    InvalidDigit { digit: char, text: String },
    #[error("integer literal {0} out of range")]
    Overflow(String),
    #[error("{text} is not quoted by {open} and {close}")]
    Unquoted { text: String, open: String, close: String },
}

/// Building or querying a word table went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum WordsError {
    #[error("{0} duplicated")]
    Duplicated(String),
    #[error("token {0} unavailable")]
    Unavailable(String),
}
