// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — PDF object graph construction and serialization.
//
// Callers build values and streams, register them in a `Document` to get
// indirect references, link objects through those references, and serialize
// once. The output carries an exact cross-reference index so readers can
// seek to any object.

pub mod convert;
pub mod pdf;

// Re-export the primary types so callers can use `blattwerk_document::Document` etc.
pub use convert::value_from_json_str;
pub use pdf::content::ContentStream;
pub use pdf::document::{Document, Payload};
pub use pdf::serializer::Serializer;
pub use pdf::stream::Stream;
pub use pdf::value::{Dictionary, Name, Number, PdfString, Value};

pub use blattwerk_core::{BlattwerkError, Reference, WriterConfig};
