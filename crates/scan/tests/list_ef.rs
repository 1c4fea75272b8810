//! File discovery against a simulated card

mod common;

use common::{SimulatedCard, executor, sent, sw};
use scout_apdu_core::{CardExecutor, Command, FileId, StatusCategory, StatusWord};
use scout_scan::{EfEntry, FileAttributes, ScanError, Scanner};

/// Card holding a transparent file at 0001, a locked PIN at 0003 and a file
/// with an unreadable descriptor at 0004; `select_status` overrides SELECT
fn card(select_status: fn(u16) -> Option<u16>) -> CardExecutor<SimulatedCard> {
    let mut selected = 0u16;
    executor(move |command: &Command| match command.ins {
        0xA4 => {
            let id = command
                .data()
                .map_or(0, |data| u16::from_be_bytes([data[0], data[1]]));
            if let Some(status) = select_status(id) {
                return sw(status);
            }
            selected = id;
            match id {
                0x0001 | 0x0003 => sw(0x9000),
                0x0004 => sw(0x6284),
                _ => sw(0x6A82),
            }
        }
        0x20 if selected == 0x0003 => sw(0x63C0),
        0xB0 if selected == 0x0001 || selected == 0x0004 => sw(0x9000),
        _ => sw(0x6A81),
    })
}

#[test]
fn test_missing_files_are_skipped() {
    let mut executor = card(|_| None);
    let mut reported = Vec::new();

    let found = Scanner::new(&mut executor)
        .list_ef_with(0x00, 0x0000..0x0006, |entry| reported.push(*entry))
        .unwrap();

    assert_eq!(
        found,
        vec![
            EfEntry {
                file_id: FileId::new(0x0001),
                attributes: FileAttributes::TRANSPARENT_FILE,
            },
            EfEntry {
                file_id: FileId::new(0x0003),
                attributes: FileAttributes::VERIFY_KEY | FileAttributes::LOCKED,
            },
            EfEntry {
                file_id: FileId::new(0x0004),
                attributes: FileAttributes::TRANSPARENT_FILE,
            },
        ]
    );
    assert_eq!(reported, found);

    // missing files never reach the classifier
    let commands = sent(&executor);
    let verifies = commands.iter().filter(|c| c.ins == 0x20).count();
    assert_eq!(verifies, 3);
    let selects = commands.iter().filter(|c| c.ins == 0xA4).count();
    assert_eq!(selects, 6 + 3);
}

#[test]
fn test_unexpected_select_status_aborts() {
    let mut executor = card(|id| (id == 0x0002).then_some(0x6982));
    let mut reported = Vec::new();

    let err = Scanner::new(&mut executor)
        .list_ef_with(0x00, 0x0000..0x0010, |entry| reported.push(*entry))
        .unwrap_err();

    assert_eq!(
        err,
        ScanError::UnexpectedStatus {
            file_id: FileId::new(0x0002),
            status: StatusWord::new(0x69, 0x82),
            category: StatusCategory::SecurityNotSatisfied,
        }
    );
    assert_eq!(reported.len(), 1);
    assert_eq!(reported[0].file_id, FileId::new(0x0001));

    // nothing after the failing selection
    let last = sent(&executor).last().unwrap();
    assert_eq!(last.ins, 0xA4);
    assert_eq!(last.data(), Some([0x00, 0x02].as_slice()));
}

#[test]
fn test_identifiers_encoded_most_significant_first() {
    let mut executor = card(|_| None);

    Scanner::new(&mut executor)
        .list_ef(0x00, 0xFFFE..0x10000)
        .unwrap();

    let ids: Vec<_> = sent(&executor).iter().filter_map(|c| c.data()).collect();
    assert_eq!(ids, vec![[0xFF, 0xFE].as_slice(), [0xFF, 0xFF].as_slice()]);
}

#[test]
fn test_out_of_range_bounds_issue_no_probes() {
    let mut executor = card(|_| None);
    let mut scanner = Scanner::new(&mut executor);

    assert!(matches!(
        scanner.list_ef(0x00, 0x0000..0x10001),
        Err(ScanError::OutOfRange { name: "end", value: 0x10001, max: 0x10000 })
    ));
    assert!(matches!(
        scanner.list_ef(0x00, 0x20000..0x0000),
        Err(ScanError::OutOfRange { name: "start", .. })
    ));

    drop(scanner);
    assert!(sent(&executor).is_empty());
}
