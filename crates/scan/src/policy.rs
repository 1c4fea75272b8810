//! Status category policies
//!
//! Every scanner reduces a probe's
//! [`StatusCategory`](scout_apdu_core::StatusCategory) to one [`Action`]. The
//! tables live next to each scanner as plain functions.

/// What a scanner does with a probe outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Record the probed value
    Found,
    /// Nothing here, move to the next value
    Skip,
    /// Abandon the remaining inner range
    NextOuter,
    /// Probe the same value again with Le set to its maximum
    RetryWithMaxLength,
    /// Stop the scan with an error
    Abort,
}
