//! Scanner state shared by every scan

use std::fmt;
use std::ops::Range;

use scout_apdu_core::Executor;

use crate::error::{Result, ScanError};
use crate::progress::{NoProgress, ScanProgress};

/// Largest accepted bound of a byte range (class, instruction, P1, P2)
pub const BYTE_RANGE_MAX: u16 = 0x100;

/// Largest accepted bound of a file identifier range
pub const FILE_ID_RANGE_MAX: u32 = 0x10000;

/// Sequential prober over an executor
///
/// The scanner borrows the executor for its whole lifetime, so no other code
/// can interleave commands with a running scan and disturb the card's
/// selection state.
pub struct Scanner<'a, E: Executor + ?Sized> {
    pub(crate) executor: &'a mut E,
    pub(crate) progress: Box<dyn ScanProgress + 'a>,
}

impl<E: Executor + ?Sized> fmt::Debug for Scanner<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl<'a, E: Executor + ?Sized> Scanner<'a, E> {
    /// Create a scanner that reports no progress
    pub fn new(executor: &'a mut E) -> Self {
        Self {
            executor,
            progress: Box::new(NoProgress),
        }
    }

    /// Report progress to `progress`
    pub fn with_progress(mut self, progress: impl ScanProgress + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Get the underlying executor
    pub fn executor(&mut self) -> &mut E {
        &mut *self.executor
    }
}

pub(crate) const fn check_bound(name: &'static str, value: u32, max: u32) -> Result<()> {
    if value > max {
        return Err(ScanError::OutOfRange { name, value, max });
    }
    Ok(())
}

/// Validate both ends of a byte range
pub(crate) fn check_byte_range(
    start_name: &'static str,
    end_name: &'static str,
    range: &Range<u16>,
) -> Result<()> {
    check_bound(start_name, u32::from(range.start), u32::from(BYTE_RANGE_MAX))?;
    check_bound(end_name, u32::from(range.end), u32::from(BYTE_RANGE_MAX))
}

/// Values of a validated byte range
pub(crate) fn bytes_of(range: Range<u16>) -> impl Iterator<Item = u8> {
    range.filter_map(|value| u8::try_from(value).ok())
}

/// Number of steps in a range, for progress totals
pub(crate) fn steps<T: Into<u64> + Copy>(range: &Range<T>) -> u64 {
    range.end.into().saturating_sub(range.start.into())
}
