// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types shared by the object model and the serializer.

use serde::{Deserialize, Serialize};

/// Non-owning handle to an indirect object: `(object number, generation)`.
///
/// References are resolved by whoever reads the file, never by the writer,
/// so holding one says nothing about whether the target exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
    pub number: u32,
    pub generation: u16,
}

impl Reference {
    /// Reference to object `number` at `generation`.
    pub fn new(number: u32, generation: u16) -> Self {
        Self { number, generation }
    }
}

impl std::fmt::Display for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} R", self.number, self.generation)
    }
}

/// PDF version announced in the file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfVersion {
    V1_4,
    V1_5,
    V1_6,
    V1_7,
    V2_0,
}

impl PdfVersion {
    /// Header comment for this version, without the line ending.
    pub fn header(&self) -> &'static str {
        match self {
            Self::V1_4 => "%PDF-1.4",
            Self::V1_5 => "%PDF-1.5",
            Self::V1_6 => "%PDF-1.6",
            Self::V1_7 => "%PDF-1.7",
            Self::V2_0 => "%PDF-2.0",
        }
    }
}

/// State of a cross-reference entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefEntryKind {
    /// Object is present at the recorded offset.
    InUse,
    /// Slot is on the free list.
    Free,
}

impl XrefEntryKind {
    /// Single-letter keyword written at the end of an xref line.
    pub fn keyword(&self) -> char {
        match self {
            Self::InUse => 'n',
            Self::Free => 'f',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_display() {
        assert_eq!(Reference::new(12, 0).to_string(), "12 0 R");
    }

    #[test]
    fn references_order_by_number() {
        assert!(Reference::new(2, 0) < Reference::new(10, 0));
    }

    #[test]
    fn xref_keywords() {
        assert_eq!(XrefEntryKind::InUse.keyword(), 'n');
        assert_eq!(XrefEntryKind::Free.keyword(), 'f');
    }
}
