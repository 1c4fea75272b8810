//! Progress reporting hooks

/// Receiver of scan progress
///
/// Scanners call [`begin`](Self::begin) once per pass, [`advance`](Self::advance)
/// once per outer step (class, P1, file identifier or tag) and
/// [`found`](Self::found) with a human readable line for every discovery.
/// All methods default to doing nothing.
pub trait ScanProgress {
    /// A pass of `total` steps starts
    fn begin(&mut self, _label: &str, _total: u64) {}

    /// One step of the current pass completed
    fn advance(&mut self) {}

    /// Something was discovered
    fn found(&mut self, _message: &str) {}

    /// The current pass ended, normally or not
    fn finish(&mut self) {}
}

/// Progress receiver that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ScanProgress for NoProgress {}

impl<P: ScanProgress + ?Sized> ScanProgress for &mut P {
    fn begin(&mut self, label: &str, total: u64) {
        (**self).begin(label, total);
    }

    fn advance(&mut self) {
        (**self).advance();
    }

    fn found(&mut self, message: &str) {
        (**self).found(message);
    }

    fn finish(&mut self) {
        (**self).finish();
    }
}
