// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cross-reference index and trailer.
//
// Every xref entry is exactly 20 bytes: `oooooooooo ggggg k` followed by a
// space and `\n`. Readers seek by multiplying, so a value that would need an
// eleventh digit is an error, never a truncation.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{Reference, XrefEntryKind};

use super::value::{Dictionary, Value};

/// Largest byte offset that fits the ten-digit offset field.
pub const MAX_OFFSET: u64 = 9_999_999_999;

/// Generation recorded for the free-list head (object 0).
pub const FREE_HEAD_GENERATION: u16 = 65_535;

/// Length of one xref entry line including its two-byte terminator.
pub const ENTRY_LEN: usize = 20;

/// Trailer keys that are always derived from the document.
const RESERVED_TRAILER_KEYS: [&str; 3] = ["Size", "Root", "Info"];

/// One row of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XrefEntry {
    pub offset: u64,
    pub generation: u16,
    pub kind: XrefEntryKind,
}

impl XrefEntry {
    fn write_to(&self, out: &mut Vec<u8>) {
        let line = format!(
            "{:010} {:05} {} \n",
            self.offset,
            self.generation,
            self.kind.keyword()
        );
        debug_assert_eq!(line.len(), ENTRY_LEN);
        out.extend_from_slice(line.as_bytes());
    }
}

/// Offset table keyed by object number, with object 0 as the free-list head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XrefTable {
    entries: Vec<XrefEntry>,
}

impl Default for XrefTable {
    fn default() -> Self {
        Self::new()
    }
}

impl XrefTable {
    /// Table holding only the free-list head.
    pub fn new() -> Self {
        Self {
            entries: vec![XrefEntry {
                offset: 0,
                generation: FREE_HEAD_GENERATION,
                kind: XrefEntryKind::Free,
            }],
        }
    }

    /// Record the next in-use object and return the number it was filed
    /// under.
    pub fn push(&mut self, offset: u64, generation: u16) -> Result<u32> {
        if offset > MAX_OFFSET {
            return Err(BlattwerkError::EncodingOverflow {
                field: "xref offset",
                value: offset,
                max: MAX_OFFSET,
            });
        }
        let number = u32::try_from(self.entries.len()).map_err(|_| BlattwerkError::EncodingOverflow {
            field: "object number",
            value: self.entries.len() as u64,
            max: u64::from(u32::MAX),
        })?;
        self.entries.push(XrefEntry {
            offset,
            generation,
            kind: XrefEntryKind::InUse,
        });
        Ok(number)
    }

    /// Number of entries including the free-list head, i.e. the trailer
    /// `/Size`.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Entry filed under object `number`.
    pub fn get(&self, number: u32) -> Option<&XrefEntry> {
        self.entries.get(number as usize)
    }

    /// Append the `xref` section: keyword, one subsection header, entries.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(format!("xref\n0 {}\n", self.entries.len()).as_bytes());
        for entry in &self.entries {
            entry.write_to(out);
        }
    }
}

/// The closing block naming the root, metadata, and the index position.
#[derive(Debug, Clone)]
pub struct Trailer<'a> {
    pub size: usize,
    pub root: Reference,
    pub info: Option<Reference>,
    pub extra: &'a Dictionary,
    pub xref_offset: u64,
}

impl Trailer<'_> {
    /// `/Size`, `/Root`, and `/Info`, followed by the caller's extra entries.
    pub fn dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::new()
            .with("Size", Value::from(self.size as i64))
            .with("Root", self.root);
        if let Some(info) = self.info {
            dict.insert("Info", info);
        }
        for (key, value) in self.extra.iter() {
            let reserved = RESERVED_TRAILER_KEYS
                .iter()
                .any(|k| k.as_bytes() == key.as_bytes());
            if !reserved {
                dict.insert(key.clone(), value.clone());
            }
        }
        dict
    }

    /// Append the trailer dictionary, `startxref`, and `%%EOF`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"trailer\n");
        self.dictionary().write_to(out);
        out.extend_from_slice(format!("\nstartxref\n{}\n%%EOF\n", self.xref_offset).as_bytes());
    }
}
