//! Result collection for repetition.
//!
//! Repetition combinators do not know what they build. They ask a factory
//! for a fresh [`Accumulator`] on every application, feed it each value, and
//! return whatever it produces.

/// A sink for repeated results.
pub trait Accumulator<T> {
    type Output;

    fn accumulate(&mut self, value: T);

    fn result(self) -> Self::Output;
}

impl<T> Accumulator<T> for Vec<T> {
    type Output = Vec<T>;

    fn accumulate(&mut self, value: T) {
        self.push(value);
    }

    fn result(self) -> Vec<T> {
        self
    }
}

/// Counts values and drops them.
#[derive(Clone, Copy, Debug, Default)]
pub struct Count(pub usize);

impl<T> Accumulator<T> for Count {
    type Output = usize;

    fn accumulate(&mut self, _value: T) {
        self.0 += 1;
    }

    fn result(self) -> usize {
        self.0
    }
}

/// Drops values.
#[derive(Clone, Copy, Debug, Default)]
pub struct Discard;

impl<T> Accumulator<T> for Discard {
    type Output = ();

    fn accumulate(&mut self, _value: T) {}

    fn result(self) {}
}

/// Left fold starting from `init`.
pub struct FoldLeft<S, X, F> {
    init: S,
    items: Vec<X>,
    f: F,
}

impl<S, X, F> FoldLeft<S, X, F>
where
    F: FnMut(S, X) -> S,
{
    pub fn new(init: S, f: F) -> Self {
        FoldLeft {
            init,
            items: Vec::new(),
            f,
        }
    }
}

impl<S, X, F> Accumulator<X> for FoldLeft<S, X, F>
where
    F: FnMut(S, X) -> S,
{
    type Output = S;

    fn accumulate(&mut self, value: X) {
        self.items.push(value);
    }

    fn result(self) -> S {
        self.items.into_iter().fold(self.init, self.f)
    }
}
