//! Scan commands

use std::error::Error;
use std::io::{self, Write};
use std::ops::Range;

use scout_apdu_core::{Executor, FileId};
use scout_scan::{EfEntry, Scanner};

use crate::progress::TerminalProgress;

fn scanner<E: Executor>(executor: &mut E) -> Scanner<'_, E> {
    Scanner::new(executor).with_progress(TerminalProgress::new())
}

/// List the class/instruction pairs the card accepts
pub fn cla_ins_command<E: Executor>(
    executor: &mut E,
    cla: Range<u16>,
    ins: Range<u16>,
) -> Result<(), Box<dyn Error>> {
    let found = scanner(executor).list_cla_ins(cla, ins)?;

    println!("Found {} CLA-INS pair(s)", found.len());
    for entry in found {
        println!(
            "  CLA {:02X}  INS {:02X}  SW {} ({})",
            entry.cla,
            entry.ins,
            entry.status,
            entry.status.category()
        );
    }

    Ok(())
}

/// List the P1/P2 values an instruction accepts
pub fn p1_p2_command<E: Executor>(
    executor: &mut E,
    cla: u8,
    ins: u8,
    p1: Range<u16>,
    p2: Range<u16>,
) -> Result<(), Box<dyn Error>> {
    let found = scanner(executor).list_p1_p2(cla, ins, p1, p2)?;

    println!("Found {} P1-P2 pair(s) for CLA {cla:02X} INS {ins:02X}", found.len());
    for entry in found {
        println!(
            "  P1 {:02X}  P2 {:02X}  {:6}  SW {} ({})",
            entry.p1,
            entry.p2,
            if entry.max_le { "Le=MAX" } else { "No Le" },
            entry.status,
            entry.status.category()
        );
    }

    Ok(())
}

/// Show the inferred attributes of one file
pub fn attribute_ef_command<E: Executor>(
    executor: &mut E,
    file_id: FileId,
    cla: u8,
) -> Result<(), Box<dyn Error>> {
    let attributes = scanner(executor).attribute_ef(file_id, cla)?;

    println!("EF {file_id}: {attributes}");
    Ok(())
}

/// List the elementary files and their attributes
pub fn ef_command<E: Executor>(
    executor: &mut E,
    cla: u8,
    ids: Range<u32>,
) -> Result<(), Box<dyn Error>> {
    list_ef(executor, cla, ids, &mut io::stdout().lock())
}

/// Files classified before a scan aborts are still written to `out`
fn list_ef<E: Executor, W: Write>(
    executor: &mut E,
    cla: u8,
    ids: Range<u32>,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let mut classified = Vec::new();
    let result = scanner(executor).list_ef_with(cla, ids, |entry| classified.push(*entry));

    match result {
        Ok(found) => {
            writeln!(out, "Found {} EF(s)", found.len())?;
            write_efs(out, &found)?;
            Ok(())
        }
        Err(err) => {
            writeln!(out, "Found {} EF(s) before the scan stopped", classified.len())?;
            write_efs(out, &classified)?;
            Err(err.into())
        }
    }
}

fn write_efs<W: Write>(out: &mut W, entries: &[EfEntry]) -> io::Result<()> {
    for entry in entries {
        writeln!(out, "  EF {}  {}", entry.file_id, entry.attributes)?;
    }
    Ok(())
}

/// List the data objects with their payloads
pub fn do_command<E: Executor>(executor: &mut E, cla: u8) -> Result<(), Box<dyn Error>> {
    let mut payloads = Vec::new();
    let found = scanner(executor).list_do_with(cla, |_, payload| payloads.push(payload.to_vec()))?;

    println!("Found {} data object(s)", found.len());
    for (entry, payload) in found.iter().zip(&payloads) {
        println!(
            "  Tag {:4}  {:10}  SW {}  {}",
            entry.tag.to_string(),
            if entry.simplified { "simplified" } else { "native" },
            entry.status,
            hex::encode_upper(payload)
        );
    }

    Ok(())
}
