use thiserror::Error;

/// A repetition constructed with a lower bound above its upper bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("min ({min}) > max ({max})")]
pub struct BoundsError {
    pub min: usize,
    pub max: usize,
}

impl BoundsError {
    /// `Ok(())` when `min <= max`.
    pub fn check(min: usize, max: usize) -> Result<(), BoundsError> {
        if min > max {
            Err(BoundsError { min, max })
        } else {
            Ok(())
        }
    }
}
