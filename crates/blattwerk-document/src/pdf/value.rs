// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Primitive value model — the closed set of PDF object kinds and their
// byte-level encoding.
//
// Values are plain data. Graph edges are `Reference`s (object number +
// generation) rather than owned children, so cycles never show up here.

use blattwerk_core::Reference;
use blattwerk_core::error::{BlattwerkError, Result};
use chrono::{DateTime, Offset, TimeZone};

/// Bytes that terminate a name or string token in PDF syntax.
const DELIMITERS: &[u8] = b"()<>[]{}/%";

/// UTF-16BE byte-order mark prefixed to non-ASCII text strings.
const UTF16_BE_BOM: [u8; 2] = [0xFE, 0xFF];

/// Any PDF primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Boolean(bool),
    Number(Number),
    Name(Name),
    String(PdfString),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Reference(Reference),
}

impl Value {
    /// Shorthand for a name value, e.g. `Value::name("Catalog")` → `/Catalog`.
    pub fn name(name: impl Into<Name>) -> Self {
        Self::Name(name.into())
    }

    /// Real number value; fails for NaN and infinities.
    pub fn real(value: f64) -> Result<Self> {
        Number::real(value).map(Self::Number)
    }

    /// The dictionary inside this value, if it is one.
    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Append the encoded form of this value to `out`.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        match self {
            Self::Boolean(true) => out.extend_from_slice(b"true"),
            Self::Boolean(false) => out.extend_from_slice(b"false"),
            Self::Number(number) => number.write_to(out),
            Self::Name(name) => name.write_to(out),
            Self::String(string) => string.write_to(out),
            Self::Array(items) => {
                out.push(b'[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(b' ');
                    }
                    item.write_to(out);
                }
                out.push(b']');
            }
            Self::Dictionary(dict) => dict.write_to(out),
            Self::Reference(reference) => out.extend_from_slice(reference.to_string().as_bytes()),
        }
    }

    /// Encoded form of this value as a fresh buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.write_to(&mut out);
        out
    }
}

/// Encode any value to bytes.
pub fn encode(value: &Value) -> Vec<u8> {
    value.encode()
}

// -- Numbers ------------------------------------------------------------------

/// Integer or finite real.
///
/// Reals are checked at construction, so every `Number` has a plain decimal
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(NumberRepr);

#[derive(Debug, Clone, Copy, PartialEq)]
enum NumberRepr {
    Integer(i64),
    Real(f64),
}

impl Number {
    /// Integer number, written in plain decimal.
    pub fn integer(value: i64) -> Self {
        Self(NumberRepr::Integer(value))
    }

    /// Real number; fails for NaN and infinities.
    pub fn real(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(BlattwerkError::TypeMismatch {
                expected: "finite number",
                found: value.to_string(),
            });
        }
        Ok(Self(NumberRepr::Real(value)))
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        let text = match self.0 {
            NumberRepr::Integer(value) => value.to_string(),
            // `Display` for f64 gives the shortest round-tripping digits and
            // never switches to exponent form.
            NumberRepr::Real(value) if value == 0.0 => "0".to_owned(),
            NumberRepr::Real(value) => value.to_string(),
        };
        out.extend_from_slice(text.as_bytes());
    }
}

impl TryFrom<f64> for Number {
    type Error = BlattwerkError;

    fn try_from(value: f64) -> Result<Self> {
        Self::real(value)
    }
}

macro_rules! integer_conversions {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(value: $ty) -> Self {
                    Self::integer(i64::from(value))
                }
            }

            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Number(Number::from(value))
                }
            }
        )*
    };
}

integer_conversions!(i8, i16, i32, i64, u8, u16, u32);

// -- Names --------------------------------------------------------------------

/// A PDF name, stored as raw bytes without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Name(Vec<u8>);

impl Name {
    /// Name from raw bytes, without the leading slash.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw bytes before escaping.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        out.push(b'/');
        for &byte in &self.0 {
            if is_regular_name_byte(byte) {
                out.push(byte);
            } else {
                out.push(b'#');
                out.extend_from_slice(hex::encode_upper([byte]).as_bytes());
            }
        }
    }
}

/// Printable, non-delimiter, non-`#` bytes pass through a name unescaped.
fn is_regular_name_byte(byte: u8) -> bool {
    (0x21..=0x7E).contains(&byte) && byte != b'#' && !DELIMITERS.contains(&byte)
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self(name.into_bytes())
    }
}

impl From<&[u8]> for Name {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

// -- Strings ------------------------------------------------------------------

/// How a string is written: `( … )` literal or `< … >` hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringForm {
    Literal,
    Hex,
}

/// A PDF string: raw bytes plus the syntax used to write them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfString {
    bytes: Vec<u8>,
    form: StringForm,
}

impl PdfString {
    /// Byte string written in parenthesised form with escapes.
    pub fn literal(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            form: StringForm::Literal,
        }
    }

    /// Byte string written as uppercase hex digits.
    pub fn hex(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            form: StringForm::Hex,
        }
    }

    /// Text string. ASCII stays literal; anything else becomes UTF-16BE with
    /// a byte-order mark, written as hex.
    pub fn text(text: &str) -> Self {
        if text.is_ascii() {
            return Self::literal(text.as_bytes());
        }
        let mut bytes = UTF16_BE_BOM.to_vec();
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Self::hex(bytes)
    }

    /// PDF date string `D:YYYYMMDDHHmmSS+HH'mm'`.
    pub fn date<Tz>(moment: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let offset = moment.offset().fix().local_minus_utc();
        let sign = if offset < 0 { '-' } else { '+' };
        let minutes = offset.abs() / 60;
        let text = format!(
            "D:{}{}{:02}'{:02}'",
            moment.format("%Y%m%d%H%M%S"),
            sign,
            minutes / 60,
            minutes % 60
        );
        Self::literal(text.into_bytes())
    }

    /// Raw bytes before escaping or UTF-16 conversion.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Syntax the string is written in.
    pub fn form(&self) -> StringForm {
        self.form
    }

    fn write_to(&self, out: &mut Vec<u8>) {
        match self.form {
            StringForm::Literal => {
                out.push(b'(');
                for &byte in &self.bytes {
                    match byte {
                        b'(' | b')' | b'\\' => out.extend_from_slice(&[b'\\', byte]),
                        b'\n' => out.extend_from_slice(b"\\n"),
                        b'\r' => out.extend_from_slice(b"\\r"),
                        _ => out.push(byte),
                    }
                }
                out.push(b')');
            }
            StringForm::Hex => {
                out.push(b'<');
                out.extend_from_slice(hex::encode_upper(&self.bytes).as_bytes());
                out.push(b'>');
            }
        }
    }
}

impl From<&str> for PdfString {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for PdfString {
    fn from(text: String) -> Self {
        Self::text(&text)
    }
}

// -- Dictionaries -------------------------------------------------------------

/// Name → value mapping that keeps insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(Name, Value)>,
}

impl Dictionary {
    /// Empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<Name>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<Name>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name.as_bytes() == key.as_bytes())
            .map(|(_, value)| value)
    }

    /// Mutable value stored under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(name, _)| name.as_bytes() == key.as_bytes())
            .map(|(_, value)| value)
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let index = self
            .entries
            .iter()
            .position(|(name, _)| name.as_bytes() == key.as_bytes())?;
        Some(self.entries.remove(index).1)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Name, &Value)> {
        self.entries.iter().map(|(name, value)| (name, value))
    }

    pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<<");
        for (i, (key, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push(b' ');
            }
            key.write_to(out);
            out.push(b' ');
            value.write_to(out);
        }
        out.extend_from_slice(b">>");
    }
}

impl<K: Into<Name>, V: Into<Value>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (key, value) in iter {
            dict.insert(key, value);
        }
        dict
    }
}

// -- Value conversions --------------------------------------------------------

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<Name> for Value {
    fn from(value: Name) -> Self {
        Self::Name(value)
    }
}

impl From<PdfString> for Value {
    fn from(value: PdfString) -> Self {
        Self::String(value)
    }
}

/// `&str` becomes a text string. Use [`Value::name`] for names.
impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(PdfString::text(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(PdfString::text(&value))
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Array(value)
    }
}

impl From<Dictionary> for Value {
    fn from(value: Dictionary) -> Self {
        Self::Dictionary(value)
    }
}

impl From<Reference> for Value {
    fn from(value: Reference) -> Self {
        Self::Reference(value)
    }
}
