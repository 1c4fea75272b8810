//! Class/instruction discovery against a simulated card

mod common;

use common::{executor, sent, sw};
use scout_apdu_core::StatusWord;
use scout_scan::{ClaInsEntry, ScanError, Scanner};

#[test]
fn test_unsupported_class_abandons_remaining_instructions() {
    let mut executor = executor(|command| match (command.cla, command.ins) {
        (0x00, 0xA4) => sw(0x6A86),
        (0x00, _) => sw(0x6D00),
        _ => sw(0x6E00),
    });

    let found = Scanner::new(&mut executor)
        .list_cla_ins(0x00..0x02, 0x00..0x100)
        .unwrap();

    assert_eq!(
        found,
        vec![ClaInsEntry {
            cla: 0x00,
            ins: 0xA4,
            status: StatusWord::new(0x6A, 0x86),
        }]
    );

    // 256 instructions under class 00, a single one under class 01
    let commands = sent(&executor);
    assert_eq!(commands.len(), 0x100 + 1);
    let class_01: Vec<_> = commands.iter().filter(|c| c.cla == 0x01).collect();
    assert_eq!(class_01.len(), 1);
    assert_eq!(class_01[0].ins, 0x00);
}

#[test]
fn test_two_by_two_grid() {
    let mut executor = executor(|command| match (command.cla, command.ins) {
        (0x00, 0xA4) => sw(0x9000),
        (0x00, _) => sw(0x6D00),
        _ => sw(0x6E00),
    });

    let found = Scanner::new(&mut executor)
        .list_cla_ins(0x00..0x02, 0x00..0x02)
        .unwrap();
    assert!(found.is_empty());
    assert!(!sent(&executor).iter().any(|c| c.cla == 0x01 && c.ins == 0x01));
}

#[test]
fn test_probe_shape_and_skipped_categories() {
    let mut executor = executor(|command| match command.ins {
        0x00 => sw(0x6881),
        0x01 => sw(0x6882),
        0x02 => sw(0x6D00),
        _ => sw(0x6982),
    });

    let found = Scanner::new(&mut executor)
        .list_cla_ins(0x80..0x81, 0x00..0x04)
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].ins, 0x03);
    for command in sent(&executor) {
        assert_eq!((command.p1, command.p2), (0x00, 0x00));
        assert_eq!(command.le, None);
        assert_eq!(command.data(), None);
    }
}

#[test]
fn test_out_of_range_bounds_issue_no_probes() {
    let mut executor = executor(|_| sw(0x9000));
    let mut scanner = Scanner::new(&mut executor);

    for (cla, ins, name) in [
        (0x00..0x101, 0x00..0x100, "cla_end"),
        (0x101..0x00, 0x00..0x100, "cla_start"),
        (0x00..0x100, 0x200..0x100, "ins_start"),
        (0x00..0x100, 0x00..0xFFFF, "ins_end"),
    ] {
        match scanner.list_cla_ins(cla, ins) {
            Err(ScanError::OutOfRange { name: bound, .. }) => assert_eq!(bound, name),
            other => panic!("expected out of range error, got {other:?}"),
        }
    }

    drop(scanner);
    assert!(sent(&executor).is_empty());
}
