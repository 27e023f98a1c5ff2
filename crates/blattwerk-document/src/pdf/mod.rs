// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — object model, streams, the document registry, and the
// serializer with its cross-reference index.

pub mod content;
pub mod document;
pub mod serializer;
pub mod stream;
pub mod value;
pub mod xref;

pub use content::ContentStream;
pub use document::{Document, IndirectObject, Payload};
pub use serializer::Serializer;
pub use stream::Stream;
pub use value::{Dictionary, Name, Number, PdfString, StringForm, Value, encode};
pub use xref::{Trailer, XrefEntry, XrefTable};
