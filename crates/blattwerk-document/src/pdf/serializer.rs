// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Serializer — one pass from a `Document` to a complete PDF byte buffer.
//
// Layout: header, `n g obj … endobj` blocks in number order, the xref
// section, the trailer. The offset recorded for each object is the length of
// the buffer at the moment its `obj` line starts, so the index is exact by
// construction. The walk follows the registration list, never references.

use blattwerk_core::WriterConfig;
use blattwerk_core::error::{BlattwerkError, Result};
use tracing::{debug, info, instrument};

use super::document::{Document, DocumentParts};
use super::xref::{Trailer, XrefTable};

/// High-byte comment written after the header so the file is sniffed as
/// binary.
const BINARY_MARKER: &[u8] = b"%\xF0\x9F\x96\xA4\n";

/// Writes documents according to a [`WriterConfig`].
#[derive(Debug, Clone, Default)]
pub struct Serializer {
    config: WriterConfig,
}

impl Serializer {
    /// Serializer producing output shaped by `config`.
    pub fn new(config: &WriterConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Produce the final bytes. The document is consumed; on error nothing
    /// partial is returned.
    #[instrument(skip_all, fields(objects = document.len()))]
    pub fn serialize(&self, document: Document) -> Result<Vec<u8>> {
        let DocumentParts {
            objects,
            root,
            info,
            trailer_extra,
        } = document.into_parts();

        let root = root.ok_or(BlattwerkError::MissingRoot)?;
        if let Some(unfilled) = objects.iter().find(|object| object.payload().is_none()) {
            return Err(BlattwerkError::UnfilledObject {
                number: unfilled.number(),
            });
        }

        let mut out = Vec::new();
        self.write_header(&mut out);

        let mut xref = XrefTable::new();
        for object in &objects {
            let reference = object.reference();
            let filed_as = xref.push(out.len() as u64, reference.generation)?;
            debug_assert_eq!(filed_as, reference.number);

            out.extend_from_slice(
                format!("{} {} obj\n", reference.number, reference.generation).as_bytes(),
            );
            if let Some(payload) = object.payload() {
                payload.write_to(&mut out);
            }
            out.extend_from_slice(b"\nendobj\n");
        }
        debug!(objects = objects.len(), body_len = out.len(), "body written");

        let xref_offset = out.len() as u64;
        xref.write_to(&mut out);

        Trailer {
            size: xref.size(),
            root,
            info,
            extra: &trailer_extra,
            xref_offset,
        }
        .write_to(&mut out);

        info!(
            objects = objects.len(),
            bytes = out.len(),
            xref_offset,
            "PDF serialized"
        );
        Ok(out)
    }

    fn write_header(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self.config.version.header().as_bytes());
        out.push(b'\n');
        if self.config.binary_marker {
            out.extend_from_slice(BINARY_MARKER);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::stream::Stream;
    use crate::pdf::value::{Dictionary, Value};
    use blattwerk_core::{PdfVersion, Reference};
    use std::io::Read;

    fn plain_config() -> WriterConfig {
        WriterConfig {
            binary_marker: false,
            ..WriterConfig::default()
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    /// Parse the xref section back into `(offset, generation, kind)` rows.
    fn read_xref(bytes: &[u8]) -> Vec<(u64, u16, char)> {
        let start = find(bytes, b"startxref\n").unwrap() + b"startxref\n".len();
        let end = start + bytes[start..].iter().position(|&b| b == b'\n').unwrap();
        let xref_offset: usize = std::str::from_utf8(&bytes[start..end]).unwrap().parse().unwrap();

        let text = std::str::from_utf8(&bytes[xref_offset..]).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("xref"));
        let count: usize = lines.next().unwrap().split(' ').nth(1).unwrap().parse().unwrap();
        lines
            .take(count)
            .map(|line| {
                let mut fields = line.split(' ');
                let offset = fields.next().unwrap().parse().unwrap();
                let generation = fields.next().unwrap().parse().unwrap();
                let kind = fields.next().unwrap().chars().next().unwrap();
                (offset, generation, kind)
            })
            .collect()
    }

    fn catalog_document() -> (Document, Reference, Reference) {
        let mut doc = Document::with_config(plain_config());
        let pages = doc.reserve().unwrap();
        let catalog = doc
            .register(
                Dictionary::new()
                    .with("Type", Value::name("Catalog"))
                    .with("Pages", pages),
            )
            .unwrap();
        doc.fill(
            pages,
            Dictionary::new()
                .with("Type", Value::name("Pages"))
                .with("Kids", Vec::<Value>::new())
                .with("Count", 0),
        )
        .unwrap();
        doc.set_root(catalog);
        (doc, catalog, pages)
    }

    #[test]
    fn single_empty_root_is_byte_exact() {
        let mut doc = Document::new();
        let root = doc.register(Dictionary::new()).unwrap();
        doc.set_root(root);
        let bytes = doc.serialize().unwrap();

        let mut expected = b"%PDF-1.7\n%\xF0\x9F\x96\xA4\n".to_vec();
        expected.extend_from_slice(
            b"1 0 obj\n<<>>\nendobj\n\
              xref\n0 2\n\
              0000000000 65535 f \n\
              0000000015 00000 n \n\
              trailer\n<</Size 2 /Root 1 0 R>>\n\
              startxref\n35\n%%EOF\n",
        );
        assert_eq!(bytes, expected);

        let xref = read_xref(&bytes);
        assert_eq!(xref, [(0, 65535, 'f'), (15, 0, 'n')]);
    }

    #[test]
    fn every_offset_points_at_its_obj_marker() {
        let mut doc = Document::new();
        let mut refs = Vec::new();
        refs.push(doc.register(Dictionary::new().with("Title", "multi\nline (x)")).unwrap());
        refs.push(doc.register(vec![Value::from(1), Value::name("N a m e")]).unwrap());
        refs.push(doc.register(Stream::new(Dictionary::new(), vec![0u8, 10, 13, 255], false).unwrap()).unwrap());
        refs.push(doc.register(Stream::new(Dictionary::new(), b"zz".repeat(300), true).unwrap()).unwrap());
        refs.push(doc.register(Value::real(2.5).unwrap()).unwrap());
        doc.set_root(refs[0]);
        let bytes = doc.serialize().unwrap();

        let xref = read_xref(&bytes);
        assert_eq!(xref.len(), refs.len() + 1);
        for reference in &refs {
            let (offset, generation, kind) = xref[reference.number as usize];
            assert_eq!(kind, 'n');
            assert_eq!(generation, 0);
            let marker = format!("{} 0 obj\n", reference.number);
            assert!(bytes[offset as usize..].starts_with(marker.as_bytes()));
        }
    }

    #[test]
    fn uncompressed_stream_payload_appears_verbatim() {
        let mut doc = Document::with_config(plain_config());
        let stream = doc.register(Stream::new(Dictionary::new(), b"hello".to_vec(), false).unwrap()).unwrap();
        doc.set_root(stream);
        let bytes = doc.serialize().unwrap();

        assert!(find(&bytes, b"<</Length 5>>\nstream\nhello\nendstream\nendobj\n").is_some());
    }

    #[test]
    fn compressed_stream_length_matches_emitted_bytes() {
        let payload = b"The quick brown fox. ".repeat(64);
        let mut doc = Document::with_config(plain_config());
        let stream = doc.register(Stream::new(Dictionary::new(), payload.clone(), true).unwrap()).unwrap();
        doc.set_root(stream);
        let bytes = doc.serialize().unwrap();

        let dict_start = find(&bytes, b"<</Filter /FlateDecode /Length ").unwrap();
        let digits_start = dict_start + b"<</Filter /FlateDecode /Length ".len();
        let digits_end = digits_start + bytes[digits_start..].iter().position(|&b| b == b'>').unwrap();
        let declared: usize = std::str::from_utf8(&bytes[digits_start..digits_end]).unwrap().parse().unwrap();

        let data_start = find(&bytes, b"stream\n").unwrap() + b"stream\n".len();
        let data_end = find(&bytes, b"\nendstream").unwrap();
        assert_eq!(data_end - data_start, declared);

        let mut inflated = Vec::new();
        flate2::read::ZlibDecoder::new(&bytes[data_start..data_end])
            .read_to_end(&mut inflated)
            .unwrap();
        assert_eq!(inflated, payload);
    }

    #[test]
    fn mutual_references_serialize_once_each() {
        let mut doc = Document::with_config(plain_config());
        let a = doc.reserve().unwrap();
        let b = doc.register(Dictionary::new().with("Peer", a)).unwrap();
        doc.fill(a, Dictionary::new().with("Peer", b)).unwrap();
        doc.set_root(a);
        let bytes = doc.serialize().unwrap();

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.contains("1 0 obj\n<</Peer 2 0 R>>\nendobj\n"));
        assert!(text.contains("2 0 obj\n<</Peer 1 0 R>>\nendobj\n"));
        assert_eq!(text.matches(" obj\n").count(), 2);
        assert_eq!(read_xref(&bytes).len(), 3);
    }

    #[test]
    fn info_and_extras_reach_the_trailer() {
        let (mut doc, _, _) = catalog_document();
        let info = doc.register(Dictionary::new().with("Producer", "blattwerk")).unwrap();
        doc.set_info(info);
        doc.set_trailer_entry("ID", vec![Value::from(crate::PdfString::hex(vec![1, 2]))]);
        let bytes = doc.serialize().unwrap();

        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("trailer\n<</Size 4 /Root 2 0 R /Info 3 0 R /ID [<0102>]>>\n"));
    }

    #[test]
    fn dangling_references_are_not_validated() {
        let mut doc = Document::with_config(plain_config());
        let root = doc.register(Dictionary::new().with("Missing", Reference::new(42, 0))).unwrap();
        doc.set_root(root);
        let bytes = doc.serialize().unwrap();
        assert!(find(&bytes, b"/Missing 42 0 R").is_some());
    }

    #[test]
    fn missing_root_fails() {
        let mut doc = Document::new();
        doc.register(Dictionary::new()).unwrap();
        assert!(matches!(doc.serialize(), Err(BlattwerkError::MissingRoot)));
    }

    #[test]
    fn unfilled_reservation_fails() {
        let mut doc = Document::new();
        let root = doc.register(Dictionary::new()).unwrap();
        doc.reserve().unwrap();
        doc.set_root(root);
        assert!(matches!(
            doc.serialize(),
            Err(BlattwerkError::UnfilledObject { number: 2 })
        ));
    }

    #[test]
    fn header_follows_config() {
        let config = WriterConfig {
            version: PdfVersion::V1_4,
            binary_marker: false,
            ..WriterConfig::default()
        };
        let mut doc = Document::with_config(config);
        let root = doc.register(Dictionary::new()).unwrap();
        doc.set_root(root);
        let bytes = doc.serialize().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.4\n1 0 obj\n"));
    }

    #[test]
    fn serialization_is_deterministic() {
        let (first, _, _) = catalog_document();
        let (second, _, _) = catalog_document();
        assert_eq!(first.serialize().unwrap(), second.serialize().unwrap());
    }

    #[test]
    fn external_reader_accepts_output() {
        let (mut doc, catalog, pages) = catalog_document();
        let payload = b"BT /F1 12 Tf (hi) Tj ET".to_vec();
        let content = doc.register(Stream::new(Dictionary::new(), payload.clone(), true).unwrap()).unwrap();
        let info = doc.register(Dictionary::new().with("Title", "Blättchen")).unwrap();
        doc.set_info(info);
        let bytes = doc.serialize().unwrap();

        let parsed = lopdf::Document::load_mem(&bytes).expect("lopdf should load the output");
        let root = parsed.trailer.get(b"Root").unwrap().as_reference().unwrap();
        assert_eq!(root, (catalog.number, catalog.generation));
        assert!(parsed.get_object((pages.number, pages.generation)).is_ok());

        let stream = parsed
            .get_object((content.number, content.generation))
            .unwrap()
            .as_stream()
            .unwrap();
        assert_eq!(stream.decompressed_content().unwrap(), payload);
    }
}
