//! Fallible memory primitives used by every buffer-owning operation.
//!
//! Allocation, copying and zero-filling are routed through this module so that each of them has
//! an observable failure path. Allocation goes through [`Vec::try_reserve_exact`] and reports
//! [`crate::Error::AllocationFailure`] instead of aborting; copy and fill report
//! [`crate::Error::CopyFailure`] when source and destination disagree in length.
//!
//! In unit tests the [`fault`] harness can force the N-th call of a primitive on the current
//! thread to fail, which is how the rest of the crate proves that a failing allocation or copy
//! never leaves partially written output behind.

use crate::{Error, Result};

/// Allocate a zero-filled buffer of `size` bytes.
///
/// # Errors
/// Returns [`Error::AllocationFailure`] if the allocator cannot provide the memory, and
/// [`Error::InvalidArgument`] if `size` exceeds `isize::MAX`.
pub(crate) fn allocate(size: usize) -> Result<Vec<u8>> {
    check_size(size)?;
    fault::on_allocate(size)?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(size)
        .map_err(|_| Error::AllocationFailure(size))?;
    buffer.resize(size, 0);

    Ok(buffer)
}

/// Reserve room for `additional` more elements in `vec`.
///
/// # Errors
/// Returns [`Error::AllocationFailure`] if the allocator cannot provide the memory.
pub(crate) fn reserve<T>(vec: &mut Vec<T>, additional: usize) -> Result<()> {
    let bytes = additional.saturating_mul(std::mem::size_of::<T>());
    fault::on_allocate(bytes)?;

    vec.try_reserve(additional)
        .map_err(|_| Error::AllocationFailure(bytes))
}

/// Copy `src` into `dst`; both must have the same length.
///
/// # Errors
/// Returns [`Error::CopyFailure`] on a length mismatch.
pub(crate) fn copy(dst: &mut [u8], src: &[u8]) -> Result<()> {
    fault::on_copy()?;

    if dst.len() != src.len() {
        return Err(Error::CopyFailure);
    }

    dst.copy_from_slice(src);
    Ok(())
}

/// Overwrite `buffer` with zeros.
///
/// # Errors
/// Returns [`Error::CopyFailure`] if the fill primitive fails.
pub(crate) fn zero(buffer: &mut [u8]) -> Result<()> {
    fault::on_zero()?;

    buffer.fill(0);
    Ok(())
}

/// Allocate a new buffer and copy `src` into it.
///
/// # Errors
/// Propagates failures of [`allocate`] and [`copy`].
pub(crate) fn duplicate(src: &[u8]) -> Result<Vec<u8>> {
    let mut buffer = allocate(src.len())?;
    copy(&mut buffer, src)?;
    Ok(buffer)
}

/// Reject sizes that do not fit the signed size range.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if `size > isize::MAX`.
pub(crate) fn check_size(size: usize) -> Result<()> {
    if size > isize::MAX as usize {
        return Err(invalid_argument_error!(
            "Size {} exceeds the maximum of {}",
            size,
            isize::MAX
        ));
    }
    Ok(())
}

/// Thread-local fault injection for the memory primitives.
///
/// Only active in unit tests; in regular builds the hooks compile down to `Ok(())`.
#[cfg(test)]
pub(crate) mod fault {
    use std::cell::Cell;

    use crate::{Error, Result};

    /// Which primitive a fault is armed for.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Primitive {
        Allocate,
        Copy,
        Zero,
    }

    thread_local! {
        static ARMED: Cell<Option<(Primitive, usize)>> = const { Cell::new(None) };
        static CALLS: Cell<[usize; 3]> = const { Cell::new([0; 3]) };
    }

    fn slot(primitive: Primitive) -> usize {
        match primitive {
            Primitive::Allocate => 0,
            Primitive::Copy => 1,
            Primitive::Zero => 2,
        }
    }

    /// Make the `nth` (0-based) call of `primitive` on this thread fail, and reset all counters.
    pub(crate) fn arm(primitive: Primitive, nth: usize) {
        ARMED.with(|armed| armed.set(Some((primitive, nth))));
        CALLS.with(|calls| calls.set([0; 3]));
    }

    /// Disarm any pending fault and reset all counters.
    pub(crate) fn disarm() {
        ARMED.with(|armed| armed.set(None));
        CALLS.with(|calls| calls.set([0; 3]));
    }

    /// Number of calls of `primitive` seen since the last [`arm`] or [`disarm`].
    pub(crate) fn calls(primitive: Primitive) -> usize {
        CALLS.with(|calls| calls.get()[slot(primitive)])
    }

    /// Returns true if the armed fault has been triggered.
    pub(crate) fn triggered() -> bool {
        ARMED.with(|armed| match armed.get() {
            Some((primitive, nth)) => calls(primitive) > nth,
            None => false,
        })
    }

    fn hit(primitive: Primitive) -> bool {
        let index = slot(primitive);
        let seen = CALLS.with(|calls| {
            let mut current = calls.get();
            let seen = current[index];
            current[index] += 1;
            calls.set(current);
            seen
        });

        ARMED.with(|armed| armed.get() == Some((primitive, seen)))
    }

    pub(crate) fn on_allocate(size: usize) -> Result<()> {
        if hit(Primitive::Allocate) {
            return Err(Error::AllocationFailure(size));
        }
        Ok(())
    }

    pub(crate) fn on_copy() -> Result<()> {
        if hit(Primitive::Copy) {
            return Err(Error::CopyFailure);
        }
        Ok(())
    }

    pub(crate) fn on_zero() -> Result<()> {
        if hit(Primitive::Zero) {
            return Err(Error::CopyFailure);
        }
        Ok(())
    }
}

#[cfg(not(test))]
pub(crate) mod fault {
    use crate::Result;

    #[inline(always)]
    pub(crate) fn on_allocate(_size: usize) -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn on_copy() -> Result<()> {
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn on_zero() -> Result<()> {
        Ok(())
    }
}
