//! Elementary file discovery

use std::fmt;
use std::ops::Range;

use scout_apdu_core::{Executor, FileId, Iso7816Ext, StatusCategory};
use tracing::{info, instrument, warn};

use crate::attribute::{FileAttributes, is_selectable};
use crate::error::{Result, ScanError};
use crate::policy::Action;
use crate::scanner::{FILE_ID_RANGE_MAX, Scanner, check_bound, steps};

/// A selectable elementary file and what could be inferred about it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EfEntry {
    /// File identifier
    pub file_id: FileId,
    /// Inferred attributes
    pub attributes: FileAttributes,
}

impl fmt::Display for EfEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EF {} ({}) found", self.file_id, self.attributes)
    }
}

/// Category table for SELECT probes
pub(crate) const fn policy(category: StatusCategory) -> Action {
    if is_selectable(category) {
        return Action::Found;
    }
    match category {
        StatusCategory::FileNotAccessible => Action::Skip,
        _ => Action::Abort,
    }
}

impl<E: Executor + ?Sized> Scanner<'_, E> {
    /// Select every file identifier in `ids` and classify the files that exist
    ///
    /// See [`list_ef_with`](Self::list_ef_with).
    pub fn list_ef(&mut self, cla: u8, ids: Range<u32>) -> Result<Vec<EfEntry>> {
        self.list_ef_with(cla, ids, |_| {})
    }

    /// Select every file identifier in `ids` and classify the files that exist,
    /// calling `on_found` for each as soon as it is classified
    ///
    /// Both bounds must lie within `0..=0x10000`. A file that is not found is
    /// skipped; any other status besides success aborts the scan with
    /// [`ScanError::UnexpectedStatus`].
    #[instrument(level = "debug", skip(self, on_found))]
    pub fn list_ef_with<F>(&mut self, cla: u8, ids: Range<u32>, on_found: F) -> Result<Vec<EfEntry>>
    where
        F: FnMut(&EfEntry),
    {
        check_bound("start", ids.start, FILE_ID_RANGE_MAX)?;
        check_bound("end", ids.end, FILE_ID_RANGE_MAX)?;

        self.progress.begin("List EF", steps(&ids));
        let result = self.scan_ef(cla, ids, on_found);
        self.progress.finish();
        result
    }

    fn scan_ef<F>(&mut self, cla: u8, ids: Range<u32>, mut on_found: F) -> Result<Vec<EfEntry>>
    where
        F: FnMut(&EfEntry),
    {
        let mut found = Vec::new();

        for id in ids.filter_map(|id| u16::try_from(id).ok()) {
            let file_id = FileId::new(id);
            let selected = self.executor.select_ef(file_id, cla)?;

            match policy(selected.category()) {
                Action::Found => {
                    let attributes = self.attribute_ef(file_id, cla)?;
                    let entry = EfEntry {
                        file_id,
                        attributes,
                    };
                    info!(file_id = %file_id, attributes = %attributes, "EF found");
                    self.progress.found(&entry.to_string());
                    on_found(&entry);
                    found.push(entry);
                }
                Action::Abort => {
                    warn!(
                        file_id = %file_id,
                        status = %selected.status(),
                        category = %selected.category(),
                        "Unexpected status while selecting EF, aborting"
                    );
                    return Err(ScanError::unexpected_status(file_id, selected.status()));
                }
                _ => {}
            }
            self.progress.advance();
        }

        Ok(found)
    }
}
