//! How a parser application can fail.
//!
//! | Variant | Tier | Caught by |
//! |---------|------|-----------|
//! | `Fail` | ordinary failure; details in the context's error slot | alternation, repetition, `optional` |
//! | `Signal` | escape raised by [`raise`](crate::raise) | the nearest matching [`try_catch`](crate::Parser::try_catch) |
//! | `User` | grammar-author error from [`try_map`](crate::Parser::try_map) / [`abort`](crate::abort) | nothing; ends the parse |
//! | `Fault` | internal fault, collects frames on the way out | nothing; ends the parse |
//!
//! Only `Fail` drives backtracking. Every other variant passes straight
//! through `|`, `many` and friends via `?`.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::exception::ParserException;

/// The result of applying a parser.
pub type Reply<T> = Result<T, Failure>;

pub enum Failure {
    Fail,
    Signal(Box<Signal>),
    User(Box<UserError>),
    Fault(Box<ParserException>),
}

impl Failure {
    #[inline]
    pub fn is_fail(&self) -> bool {
        matches!(self, Failure::Fail)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Fail => f.write_str("Fail"),
            Failure::Signal(s) => f.debug_tuple("Signal").field(s).finish(),
            Failure::User(e) => f.debug_tuple("User").field(e).finish(),
            Failure::Fault(e) => f.debug_tuple("Fault").field(e).finish(),
        }
    }
}

/// Identity of an escape payload.
///
/// Two keys are equal only if one is a clone of the other; payload values
/// are never compared.
#[derive(Clone)]
pub struct SignalKey(Arc<dyn Any + Send + Sync>);

impl SignalKey {
    pub fn new<P: Any + Send + Sync>(payload: P) -> Self {
        SignalKey(Arc::new(payload))
    }

    /// A fresh key with no payload of interest.
    pub fn unique() -> Self {
        SignalKey::new(())
    }

    pub fn payload(&self) -> &(dyn Any + Send + Sync) {
        &*self.0
    }

    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for SignalKey {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for SignalKey {}

impl fmt::Debug for SignalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignalKey({:p})", self.addr())
    }
}

/// A raised escape on its way to a handler.
///
/// A repetition unwound by a signal leaves what it had collected so far in
/// the signal; the handler receives it.
pub struct Signal {
    key: SignalKey,
    partial: Option<Box<dyn Any>>,
}

impl Signal {
    pub(crate) fn new(key: SignalKey) -> Self {
        Signal { key, partial: None }
    }

    pub fn key(&self) -> &SignalKey {
        &self.key
    }

    /// Raised with (a clone of) `key`.
    pub fn is(&self, key: &SignalKey) -> bool {
        self.key == *key
    }

    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.key.payload().downcast_ref::<P>()
    }

    pub(crate) fn set_partial<T: 'static>(&mut self, value: T) {
        self.partial = Some(Box::new(value));
    }

    pub(crate) fn take_partial<T: 'static>(&mut self) -> Option<T> {
        match self.partial.take()?.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.partial = Some(other);
                None
            }
        }
    }

    /// Text for an escape nobody caught.
    pub(crate) fn describe(&self) -> String {
        if let Some(s) = self.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = self.downcast_ref::<String>() {
            s.clone()
        } else {
            format!("{:?}", self.key)
        }
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("key", &self.key)
            .field("partial", &self.partial.is_some())
            .finish()
    }
}

/// An error raised by grammar code; not backtrackable.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct UserError {
    pub message: String,
    /// Where to report it; the failing position when absent.
    pub index: Option<usize>,
}

impl UserError {
    pub fn new(message: impl Into<String>) -> Self {
        UserError {
            message: message.into(),
            index: None,
        }
    }

    #[must_use]
    pub fn at(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}
