//! Fallible deep copies.
//!
//! Cloning a value object may allocate, and allocation is allowed to fail, so the codec types
//! implement [`TryClone`] instead of relying on [`Clone`] alone. [`clone_optional`] carries the
//! "clone of nothing is nothing" rule: an absent source clones to an absent destination and that
//! is a success, not an error.

use crate::Result;

/// A deep copy that reports allocation and copy failures instead of aborting.
pub trait TryClone: Sized {
    /// Create an independent copy of `self`.
    ///
    /// # Errors
    /// Returns [`crate::Error::AllocationFailure`] or [`crate::Error::CopyFailure`] if a buffer
    /// backing the copy could not be created.
    fn try_clone(&self) -> Result<Self>;
}

/// Clone an optional source.
///
/// `None` yields `Ok(None)`; `Some(source)` yields the result of [`TryClone::try_clone`].
///
/// # Errors
/// Propagates the error of [`TryClone::try_clone`]; no partial clone is returned.
///
/// # Examples
///
/// ```rust
/// use fvalue::{clone_optional, Integer};
///
/// let nothing: Option<&Integer> = None;
/// assert!(clone_optional(nothing)?.is_none());
///
/// let integer = Integer::from_value(0x2a, 8)?;
/// let copy = clone_optional(Some(&integer))?.unwrap();
/// assert_eq!(copy.copy_to_integer(), (0x2a, 8));
/// # Ok::<(), fvalue::Error>(())
/// ```
pub fn clone_optional<T: TryClone>(source: Option<&T>) -> Result<Option<T>> {
    match source {
        Some(source) => Ok(Some(source.try_clone()?)),
        None => Ok(None),
    }
}
