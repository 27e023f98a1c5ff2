// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Host value conversion — JSON values into PDF primitives.
//
// JSON is the loosely typed input callers usually have on hand (metadata
// blobs, configuration). Anything without a PDF counterpart is refused here,
// at construction time, instead of being coerced.

use blattwerk_core::error::{BlattwerkError, Result};
use serde_json::Value as Json;

use crate::pdf::value::{Dictionary, Number, PdfString, Value};

impl TryFrom<Json> for Value {
    type Error = BlattwerkError;

    /// Map a JSON value onto the closed PDF value set.
    ///
    /// Strings always stay strings, whatever they start with. JSON has no
    /// name type, so names are added with `Dictionary::insert` after
    /// conversion. Object key order is preserved.
    fn try_from(json: Json) -> Result<Self> {
        match json {
            Json::Null => Err(mismatch("null")),
            Json::Bool(flag) => Ok(Value::Boolean(flag)),
            Json::Number(number) => convert_number(&number).map(Value::Number),
            Json::String(text) => Ok(Value::String(PdfString::text(&text))),
            Json::Array(items) => items
                .into_iter()
                .map(Value::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Json::Object(map) => {
                let mut dict = Dictionary::new();
                for (key, item) in map {
                    dict.insert(key, Value::try_from(item)?);
                }
                Ok(Value::Dictionary(dict))
            }
        }
    }
}

/// Parse a JSON document straight into a value.
pub fn value_from_json_str(json: &str) -> Result<Value> {
    let parsed: Json = serde_json::from_str(json)?;
    Value::try_from(parsed)
}

fn convert_number(number: &serde_json::Number) -> Result<Number> {
    if let Some(integer) = number.as_i64() {
        return Ok(Number::integer(integer));
    }
    if number.is_u64() {
        // Above i64::MAX: no PDF integer can hold it.
        return Err(BlattwerkError::TypeMismatch {
            expected: "integer within i64 range",
            found: number.to_string(),
        });
    }
    match number.as_f64() {
        Some(real) => Number::real(real),
        None => Err(mismatch("non-numeric number")),
    }
}

fn mismatch(found: &str) -> BlattwerkError {
    BlattwerkError::TypeMismatch {
        expected: "boolean, number, string, array, or object",
        found: found.to_owned(),
    }
}
