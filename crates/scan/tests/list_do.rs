//! Data object discovery against a simulated card

mod common;

use common::{executor, ok_with, sent, sw};
use scout_apdu_core::{Command, DataObjectTag};
use scout_scan::{DataObjectEntry, Scanner};

fn tag_of(command: &Command) -> u16 {
    u16::from_be_bytes([command.p1, command.p2])
}

fn card(command: &Command) -> Vec<u8> {
    match (command.p1, command.p2) {
        (0x00, 0x4F) => ok_with(&[0xA0, 0x00, 0x00, 0x03, 0x08]),
        (0x02, 0x4F) => sw(0x6700),
        (0x00, 0x5A) => sw(0x6C10),
        (0x5F, 0x20) => ok_with(b"DOE<<JOHN"),
        _ => sw(0x6A88),
    }
}

#[test]
fn test_three_passes_in_order() {
    let mut executor = executor(card);
    let mut payloads = Vec::new();

    let found = Scanner::new(&mut executor)
        .list_do_with(0x00, |entry, payload| payloads.push((entry.tag, payload.to_vec())))
        .unwrap();

    let tags: Vec<_> = found.iter().map(|e| (e.tag, e.simplified)).collect();
    assert_eq!(
        tags,
        vec![
            (DataObjectTag::OneByte(0x4F), false),
            (DataObjectTag::OneByte(0x4F), true),
            (DataObjectTag::TwoByte(0x5F20), false),
        ]
    );
    assert_eq!(
        payloads,
        vec![
            (DataObjectTag::OneByte(0x4F), vec![0xA0, 0x00, 0x00, 0x03, 0x08]),
            (DataObjectTag::OneByte(0x4F), vec![]),
            (DataObjectTag::TwoByte(0x5F20), b"DOE<<JOHN".to_vec()),
        ]
    );
}

#[test]
fn test_probe_order_and_bounds() {
    let mut executor = executor(card);

    Scanner::new(&mut executor).list_do(0x00).unwrap();

    let commands = sent(&executor);
    assert_eq!(commands.len(), 0xFE * 2 + (0x10000 - 0x1F1F));

    let (native, rest) = commands.split_at(0xFE);
    let (simplified, two_byte) = rest.split_at(0xFE);
    assert!(native.iter().all(|c| c.p1 == 0x00));
    assert_eq!((native[0].p2, native[0xFD].p2), (0x01, 0xFE));
    assert!(simplified.iter().all(|c| c.p1 == 0x02));

    assert_eq!(tag_of(&two_byte[0]), 0x1F1F);
    assert!(two_byte.iter().all(|c| tag_of(c) >= 0x1F1F));
    assert_eq!(tag_of(two_byte.last().unwrap()), 0xFFFF);
    assert!(commands.iter().all(|c| c.ins == 0xCA && c.cla == 0x00));
}

#[test]
fn test_wrong_le_is_not_found() {
    let mut executor = executor(card);

    let found = Scanner::new(&mut executor).list_do(0x00).unwrap();

    assert!(!found.contains(&DataObjectEntry {
        tag: DataObjectTag::OneByte(0x5A),
        simplified: false,
        status: scout_apdu_core::StatusWord::new(0x6C, 0x10),
    }));
    assert!(found.iter().all(|e| e.tag != DataObjectTag::OneByte(0x5A)));
}
