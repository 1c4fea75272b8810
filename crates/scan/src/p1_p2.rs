//! Parameter discovery for a fixed instruction

use std::fmt;
use std::ops::Range;

use scout_apdu_core::{Command, Executor, ExpectedLength, StatusCategory, StatusWord};
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::policy::Action;
use crate::scanner::{Scanner, bytes_of, check_byte_range, steps};

/// A parameter pair the card accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P1P2Entry {
    /// First parameter byte
    pub p1: u8,
    /// Second parameter byte
    pub p2: u8,
    /// Status of the probe that qualified the pair
    pub status: StatusWord,
    /// Whether the pair only qualified once Le asked for the maximum
    pub max_le: bool,
}

impl fmt::Display for P1P2Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "P1 {:02X}, P2 {:02X}, {} found with status {} ({})",
            self.p1,
            self.p2,
            if self.max_le { "Le=MAX" } else { "No Le" },
            self.status,
            self.status.category()
        )
    }
}

/// Category table for the probe without Le
pub(crate) const fn first_probe_policy(category: StatusCategory) -> Action {
    match category {
        StatusCategory::IncorrectParameterBytes => Action::RetryWithMaxLength,
        _ => Action::Found,
    }
}

/// Category table for the retry with Le set to the maximum
pub(crate) const fn retry_policy(category: StatusCategory) -> Action {
    match category {
        StatusCategory::IncorrectParameterBytes => Action::Skip,
        _ => Action::Found,
    }
}

impl<E: Executor + ?Sized> Scanner<'_, E> {
    /// Probe `CLA INS P1 P2` for every pair in `p1` x `p2`
    ///
    /// Each pair is first sent without Le. A pair rejected with incorrect
    /// parameters is sent again asking for the maximum response length, and
    /// only discarded if rejected twice. Both ranges must lie within
    /// `0..=0x100`.
    #[instrument(level = "debug", skip(self))]
    pub fn list_p1_p2(
        &mut self,
        cla: u8,
        ins: u8,
        p1: Range<u16>,
        p2: Range<u16>,
    ) -> Result<Vec<P1P2Entry>> {
        check_byte_range("p1_start", "p1_end", &p1)?;
        check_byte_range("p2_start", "p2_end", &p2)?;

        self.progress.begin("List valid P1-P2", steps(&p1));
        let result = self.scan_p1_p2(cla, ins, p1, p2);
        self.progress.finish();
        result
    }

    fn scan_p1_p2(
        &mut self,
        cla: u8,
        ins: u8,
        p1: Range<u16>,
        p2: Range<u16>,
    ) -> Result<Vec<P1P2Entry>> {
        let mut found = Vec::new();

        for p1 in bytes_of(p1) {
            for p2 in bytes_of(p2.clone()) {
                if let Some(entry) = self.probe_p1_p2(cla, ins, p1, p2)? {
                    info!(p1, p2, status = %entry.status, max_le = entry.max_le, "Parameters found");
                    self.progress.found(&entry.to_string());
                    found.push(entry);
                }
            }
            self.progress.advance();
        }

        Ok(found)
    }

    fn probe_p1_p2(&mut self, cla: u8, ins: u8, p1: u8, p2: u8) -> Result<Option<P1P2Entry>> {
        let command = Command::new(cla, ins, p1, p2);
        let status = self.executor.execute(&command)?.status();
        if first_probe_policy(status.category()) == Action::Found {
            return Ok(Some(P1P2Entry {
                p1,
                p2,
                status,
                max_le: false,
            }));
        }

        let command = command.with_le(ExpectedLength::Max);
        let status = self.executor.execute(&command)?.status();
        if retry_policy(status.category()) == Action::Found {
            return Ok(Some(P1P2Entry {
                p1,
                p2,
                status,
                max_le: true,
            }));
        }

        debug!(p1, p2, %status, "Parameters rejected with and without Le");
        Ok(None)
    }
}
