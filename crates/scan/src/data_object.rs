//! Data object discovery with GET DATA

use std::fmt;
use std::ops::Range;

use scout_apdu_core::{DataObjectTag, Executor, Iso7816Ext, StatusCategory, StatusWord};
use tracing::{info, instrument};

use crate::error::Result;
use crate::policy::Action;
use crate::scanner::{Scanner, steps};

/// 1-byte tags probed, under both encodings
pub const ONE_BYTE_TAGS: Range<u16> = 0x01..0xFF;

/// 2-byte tags probed; lower values are not valid 2-byte tags
pub const TWO_BYTE_TAGS: Range<u32> = 0x1F1F..0x10000;

/// A data object the card recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataObjectEntry {
    /// Tag of the object
    pub tag: DataObjectTag,
    /// Whether the object answered under the simplified (SIMPLE-TLV) encoding
    pub simplified: bool,
    /// Status returned by GET DATA
    pub status: StatusWord,
}

impl fmt::Display for DataObjectEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = match (self.tag, self.simplified) {
            (_, true) => "simplified encoding",
            (DataObjectTag::OneByte(_), false) => "1 byte tag",
            (DataObjectTag::TwoByte(_), false) => "2 byte tag",
        };
        write!(f, "Data Object {} ({form}) found", self.tag)
    }
}

/// Category table for GET DATA probes
pub(crate) const fn policy(category: StatusCategory) -> Action {
    match category {
        StatusCategory::NormalEnd | StatusCategory::IncorrectLengthField => Action::Found,
        _ => Action::Skip,
    }
}

impl<E: Executor + ?Sized> Scanner<'_, E> {
    /// Probe GET DATA for every 1-byte tag, natively and simplified, then
    /// for every 2-byte tag
    ///
    /// See [`list_do_with`](Self::list_do_with).
    pub fn list_do(&mut self, cla: u8) -> Result<Vec<DataObjectEntry>> {
        self.list_do_with(cla, |_, _| {})
    }

    /// Probe GET DATA for every tag, calling `on_found` with each discovered
    /// entry and the payload the card returned for it
    ///
    /// Three passes run in order: 1-byte tags `01..FE`, the same tags under
    /// the simplified encoding, and 2-byte tags `1F1F..FFFF`.
    #[instrument(level = "debug", skip(self, on_found))]
    pub fn list_do_with<F>(&mut self, cla: u8, mut on_found: F) -> Result<Vec<DataObjectEntry>>
    where
        F: FnMut(&DataObjectEntry, &[u8]),
    {
        let mut found = Vec::new();

        let one_byte_tags = || {
            ONE_BYTE_TAGS
                .filter_map(|tag| u8::try_from(tag).ok())
                .map(DataObjectTag::OneByte)
        };
        let two_byte_tags = TWO_BYTE_TAGS
            .filter_map(|tag| u16::try_from(tag).ok())
            .map(DataObjectTag::TwoByte);

        let passes: [(&str, u64, bool, Box<dyn Iterator<Item = DataObjectTag>>); 3] = [
            (
                "List Data Object (1 byte tag)",
                steps(&ONE_BYTE_TAGS),
                false,
                Box::new(one_byte_tags()),
            ),
            (
                "List Data Object (Simplified encoding)",
                steps(&ONE_BYTE_TAGS),
                true,
                Box::new(one_byte_tags()),
            ),
            (
                "List Data Object (2 byte tag)",
                steps(&TWO_BYTE_TAGS),
                false,
                Box::new(two_byte_tags),
            ),
        ];

        for (label, total, simplified, tags) in passes {
            self.progress.begin(label, total);
            let result = self.scan_do(cla, simplified, tags, &mut found, &mut on_found);
            self.progress.finish();
            result?;
        }

        Ok(found)
    }

    fn scan_do<F>(
        &mut self,
        cla: u8,
        simplified: bool,
        tags: impl Iterator<Item = DataObjectTag>,
        found: &mut Vec<DataObjectEntry>,
        on_found: &mut F,
    ) -> Result<()>
    where
        F: FnMut(&DataObjectEntry, &[u8]),
    {
        for tag in tags {
            let response = self.executor.get_data(tag, simplified, cla)?;

            if policy(response.category()) == Action::Found {
                let entry = DataObjectEntry {
                    tag,
                    simplified,
                    status: response.status(),
                };
                info!(tag = %tag, simplified, status = %entry.status, "Data object found");
                self.progress.found(&entry.to_string());
                on_found(&entry, response.data());
                found.push(entry);
            }
            self.progress.advance();
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy() {
        assert_eq!(policy(StatusCategory::NormalEnd), Action::Found);
        assert_eq!(policy(StatusCategory::IncorrectLengthField), Action::Found);
        assert_eq!(policy(StatusCategory::WrongLeField), Action::Skip);
        assert_eq!(policy(StatusCategory::ReferencedDataNotFound), Action::Skip);
        assert_eq!(policy(StatusCategory::SecurityNotSatisfied), Action::Skip);
    }

    #[test]
    fn test_tag_ranges() {
        assert_eq!(steps(&ONE_BYTE_TAGS), 0xFE);
        assert_eq!(TWO_BYTE_TAGS.start, 0x1F1F);
        assert_eq!(TWO_BYTE_TAGS.end, 0x10000);
    }

    #[test]
    fn test_entry_display() {
        let entry = DataObjectEntry {
            tag: DataObjectTag::OneByte(0x4F),
            simplified: true,
            status: StatusWord::new(0x90, 0x00),
        };
        assert_eq!(entry.to_string(), "Data Object 4F (simplified encoding) found");

        let entry = DataObjectEntry {
            tag: DataObjectTag::TwoByte(0x5F20),
            simplified: false,
            status: StatusWord::new(0x67, 0x00),
        };
        assert_eq!(entry.to_string(), "Data Object 5F20 (2 byte tag) found");
    }
}
