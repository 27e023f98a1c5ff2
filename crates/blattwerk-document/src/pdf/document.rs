// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Object registry — the document arena.
//
// Object numbers are handed out eagerly at registration while content is
// only encoded at serialization time, which is what lets objects point at
// each other (forward references, cycles) without owning each other.

use std::io::Write;
use std::path::Path;

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{Reference, WriterConfig};
use tracing::{debug, info, instrument};

use super::serializer::Serializer;
use super::stream::Stream;
use super::value::{Dictionary, Name, Number, PdfString, Value};

/// Generation number of every object written by this crate.
pub const GENERATION: u16 = 0;

/// Content of an indirect object.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Value(Value),
    Stream(Stream),
}

impl Payload {
    /// Append the encoded payload, without the `obj`/`endobj` wrapper.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Value(value) => value.write_to(out),
            Self::Stream(stream) => stream.write_to(out),
        }
    }
}

macro_rules! value_payloads {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Payload {
                fn from(value: $ty) -> Self {
                    Self::Value(Value::from(value))
                }
            }
        )*
    };
}

value_payloads!(bool, i32, i64, u32, Number, Name, PdfString, Vec<Value>, Dictionary, Reference);

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Value(Value::from(text))
    }
}

impl From<Stream> for Payload {
    fn from(stream: Stream) -> Self {
        Self::Stream(stream)
    }
}

/// A numbered slot in the document. `payload` is `None` between
/// [`Document::reserve`] and [`Document::fill`].
#[derive(Debug, Clone, PartialEq)]
pub struct IndirectObject {
    reference: Reference,
    payload: Option<Payload>,
}

impl IndirectObject {
    /// Reference other objects use to point here.
    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// Object number, also the xref slot.
    pub fn number(&self) -> u32 {
        self.reference.number
    }

    /// `None` while the slot is only reserved.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }
}

/// An ordered collection of indirect objects plus the trailer designations.
///
/// Each document owns its own numbering, so any number of documents can be
/// built side by side. A document is consumed by serialization.
#[derive(Debug, Clone, Default)]
pub struct Document {
    config: WriterConfig,
    objects: Vec<IndirectObject>,
    root: Option<Reference>,
    info: Option<Reference>,
    trailer_extra: Dictionary,
}

impl Document {
    /// Empty document with the default writer configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty document serialized with `config`.
    pub fn with_config(config: WriterConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Configuration used by `add_stream` and serialization.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    // -- Registration ---------------------------------------------------------

    /// Register an object and return its reference. Numbers start at 1 and
    /// follow call order.
    pub fn register(&mut self, payload: impl Into<Payload>) -> Result<Reference> {
        self.push(Some(payload.into()))
    }

    /// Claim the next object number without content, for objects that need
    /// to be referenced before they can be built.
    pub fn reserve(&mut self) -> Result<Reference> {
        self.push(None)
    }

    /// Supply the content of a reserved object.
    pub fn fill(&mut self, reference: Reference, payload: impl Into<Payload>) -> Result<()> {
        let object = self.slot_mut(reference)?;
        if object.payload.is_some() {
            return Err(BlattwerkError::AlreadyFilled {
                number: reference.number,
            });
        }
        object.payload = Some(payload.into());
        Ok(())
    }

    /// Build a stream using the configured compression and register it.
    pub fn add_stream(&mut self, dictionary: Dictionary, payload: impl Into<Vec<u8>>) -> Result<Reference> {
        let level = if self.config.compress_streams {
            Some(self.config.compression_level.unwrap_or(DEFAULT_LEVEL))
        } else {
            None
        };
        let stream = Stream::with_level(dictionary, payload, level)?;
        self.register(stream)
    }

    fn push(&mut self, payload: Option<Payload>) -> Result<Reference> {
        let number = next_number(self.objects.len())?;
        let reference = Reference::new(number, GENERATION);
        self.objects.push(IndirectObject { reference, payload });
        debug!(number, "object registered");
        Ok(reference)
    }

    fn slot_mut(&mut self, reference: Reference) -> Result<&mut IndirectObject> {
        let index = (reference.number as usize)
            .checked_sub(1)
            .ok_or_else(|| unknown_object(reference))?;
        match self.objects.get_mut(index) {
            Some(object) if object.reference == reference => Ok(object),
            _ => Err(unknown_object(reference)),
        }
    }

    // -- Lookup ---------------------------------------------------------------

    /// Registered content, or `None` for unknown or unfilled references.
    pub fn get(&self, reference: Reference) -> Option<&Payload> {
        let index = (reference.number as usize).checked_sub(1)?;
        self.objects
            .get(index)
            .filter(|object| object.reference == reference)
            .and_then(|object| object.payload.as_ref())
    }

    /// Mutable access to registered content, e.g. to close a cycle after
    /// both ends exist.
    pub fn get_mut(&mut self, reference: Reference) -> Option<&mut Payload> {
        self.slot_mut(reference).ok()?.payload.as_mut()
    }

    /// Objects in number order.
    pub fn objects(&self) -> impl Iterator<Item = &IndirectObject> {
        self.objects.iter()
    }

    /// Number of registered objects, reservations included.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    // -- Trailer designations -------------------------------------------------

    /// Designate the document catalog.
    pub fn set_root(&mut self, reference: Reference) {
        self.root = Some(reference);
    }

    /// The designated catalog, if any.
    pub fn root(&self) -> Option<Reference> {
        self.root
    }

    /// Designate the document information (metadata) dictionary.
    pub fn set_info(&mut self, reference: Reference) {
        self.info = Some(reference);
    }

    /// The designated metadata dictionary, if any.
    pub fn info(&self) -> Option<Reference> {
        self.info
    }

    /// Extra trailer entry passed through untouched, e.g. `/ID` or
    /// `/Encrypt` prepared by the caller. `Size`, `Root`, and `Info` are
    /// always written from the document itself.
    pub fn set_trailer_entry(&mut self, key: impl Into<Name>, value: impl Into<Value>) {
        self.trailer_extra.insert(key, value);
    }

    /// Caller-supplied trailer entries in insertion order.
    pub fn trailer_entries(&self) -> &Dictionary {
        &self.trailer_extra
    }

    // -- Output ---------------------------------------------------------------

    /// Serialize into a complete PDF byte buffer.
    pub fn serialize(self) -> Result<Vec<u8>> {
        Serializer::new(&self.config).serialize(self)
    }

    /// Serialize and write the bytes to `sink`.
    #[instrument(skip_all)]
    pub fn write_to(self, mut sink: impl Write) -> Result<usize> {
        let bytes = self.serialize()?;
        sink.write_all(&bytes)?;
        sink.flush()?;
        Ok(bytes.len())
    }

    /// Serialize and write the bytes to a file.
    pub fn write_to_file(self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.serialize()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(bytes = bytes.len(), "Wrote PDF to {}", path.as_ref().display());
        Ok(bytes.len())
    }

    pub(crate) fn into_parts(self) -> DocumentParts {
        DocumentParts {
            objects: self.objects,
            root: self.root,
            info: self.info,
            trailer_extra: self.trailer_extra,
        }
    }
}

/// zlib level used when compression is on and no level is configured.
const DEFAULT_LEVEL: u32 = 6;

/// Object number for the next slot of an arena holding `count` objects.
/// Numbers are 1-based; slot 0 is the xref free-list head.
fn next_number(count: usize) -> Result<u32> {
    u32::try_from(count)
        .ok()
        .and_then(|n| n.checked_add(1))
        .ok_or(BlattwerkError::EncodingOverflow {
            field: "object number",
            value: (count as u64).saturating_add(1),
            max: u64::from(u32::MAX),
        })
}

fn unknown_object(reference: Reference) -> BlattwerkError {
    BlattwerkError::UnknownObject {
        number: reference.number,
    }
}

/// Owned pieces of a document handed to the serializer.
pub(crate) struct DocumentParts {
    pub objects: Vec<IndirectObject>,
    pub root: Option<Reference>,
    pub info: Option<Reference>,
    pub trailer_extra: Dictionary,
}
