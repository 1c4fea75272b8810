//! Class and instruction discovery

use std::fmt;
use std::ops::Range;

use scout_apdu_core::{Command, Executor, StatusCategory, StatusWord};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::policy::Action;
use crate::scanner::{Scanner, bytes_of, check_byte_range, steps};

/// A class/instruction pair the card did not reject
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaInsEntry {
    /// Class byte
    pub cla: u8,
    /// Instruction byte
    pub ins: u8,
    /// Status returned for `CLA INS 00 00`
    pub status: StatusWord,
}

impl fmt::Display for ClaInsEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CLA {:02X}, INS {:02X} found with status {} ({})",
            self.cla,
            self.ins,
            self.status,
            self.status.category()
        )
    }
}

/// Category table for class/instruction probes
pub(crate) const fn policy(category: StatusCategory) -> Action {
    match category {
        StatusCategory::ClassNotSupported => Action::NextOuter,
        StatusCategory::InstructionNotSupported
        | StatusCategory::LogicalChannelFeatureNotSupported
        | StatusCategory::SecureMessagingFeatureNotSupported => Action::Skip,
        _ => Action::Found,
    }
}

impl<E: Executor + ?Sized> Scanner<'_, E> {
    /// Probe `CLA INS 00 00` for every class in `cla` and instruction in `ins`
    ///
    /// Both ranges must lie within `0..=0x100`. Once a class is reported as
    /// unsupported its remaining instructions are not probed.
    #[instrument(level = "debug", skip(self))]
    pub fn list_cla_ins(&mut self, cla: Range<u16>, ins: Range<u16>) -> Result<Vec<ClaInsEntry>> {
        check_byte_range("cla_start", "cla_end", &cla)?;
        check_byte_range("ins_start", "ins_end", &ins)?;

        self.progress.begin("List valid CLA-INS", steps(&cla));
        let result = self.scan_cla_ins(cla, ins);
        self.progress.finish();
        result
    }

    fn scan_cla_ins(&mut self, cla: Range<u16>, ins: Range<u16>) -> Result<Vec<ClaInsEntry>> {
        let mut found = Vec::new();

        for cla in bytes_of(cla) {
            for ins in bytes_of(ins.clone()) {
                let response = self.executor.execute(&Command::new(cla, ins, 0x00, 0x00))?;
                let status = response.status();

                match policy(status.category()) {
                    Action::NextOuter => {
                        debug!(cla, ins, %status, "Class not supported");
                        break;
                    }
                    Action::Found => {
                        let entry = ClaInsEntry { cla, ins, status };
                        info!(cla, ins, %status, "Instruction found");
                        self.progress.found(&entry.to_string());
                        found.push(entry);
                    }
                    _ => {}
                }
            }
            self.progress.advance();
        }

        Ok(found)
    }
}
