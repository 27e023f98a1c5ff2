// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content stream builder — graphics and text operators, one per line.
//
// This only emits operator syntax. What a font name or an XObject name
// refers to is the caller's business.

use blattwerk_core::error::Result;

use super::stream::Stream;
use super::value::{Dictionary, Name, PdfString, Value};

/// Accumulates content-stream operators into a byte payload.
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    buffer: Vec<u8>,
}

impl ContentStream {
    /// Empty content stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Whether no operator has been added yet.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Wrap the operators in a stream object.
    pub fn into_stream(self, extra: Dictionary, compress: bool) -> Result<Stream> {
        Stream::new(extra, self.buffer, compress)
    }

    fn push(&mut self, operands: &[Value], operator: &str) -> &mut Self {
        if !self.buffer.is_empty() {
            self.buffer.push(b'\n');
        }
        for operand in operands {
            operand.write_to(&mut self.buffer);
            self.buffer.push(b' ');
        }
        self.buffer.extend_from_slice(operator.as_bytes());
        self
    }

    fn push_numbers(&mut self, numbers: &[f64], operator: &str) -> Result<&mut Self> {
        let operands = numbers
            .iter()
            .map(|&n| Value::real(n))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.push(&operands, operator))
    }

    // -- Path construction ----------------------------------------------------

    /// Begin a new subpath at `(x, y)`.
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.push_numbers(&[x, y], "m")
    }

    /// Straight segment from the current point to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        self.push_numbers(&[x, y], "l")
    }

    /// Cubic Bézier to `(x3, y3)` with control points `(x1, y1)` and `(x2, y2)`.
    pub fn curve_to(
        &mut self,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        x3: f64,
        y3: f64,
    ) -> Result<&mut Self> {
        self.push_numbers(&[x1, y1, x2, y2, x3, y3], "c")
    }

    /// Bézier whose first control point is the current point.
    pub fn curve_start_to(&mut self, x2: f64, y2: f64, x3: f64, y3: f64) -> Result<&mut Self> {
        self.push_numbers(&[x2, y2, x3, y3], "v")
    }

    /// Bézier whose second control point is the end point.
    pub fn curve_end_to(&mut self, x1: f64, y1: f64, x3: f64, y3: f64) -> Result<&mut Self> {
        self.push_numbers(&[x1, y1, x3, y3], "y")
    }

    /// Rectangle subpath from a corner and its size (`re`).
    pub fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<&mut Self> {
        self.push_numbers(&[x, y, width, height], "re")
    }

    /// Close the current subpath (`h`).
    pub fn close(&mut self) -> &mut Self {
        self.push(&[], "h")
    }

    // -- Path painting --------------------------------------------------------

    /// Stroke the path (`S`).
    pub fn stroke(&mut self) -> &mut Self {
        self.push(&[], "S")
    }

    /// Close and stroke the path (`s`).
    pub fn stroke_and_close(&mut self) -> &mut Self {
        self.push(&[], "s")
    }

    /// Fill the path with the nonzero or even-odd rule (`f`, `f*`).
    pub fn fill(&mut self, even_odd: bool) -> &mut Self {
        self.push(&[], if even_odd { "f*" } else { "f" })
    }

    /// Fill, then stroke the path (`B`, `B*`).
    pub fn fill_and_stroke(&mut self, even_odd: bool) -> &mut Self {
        self.push(&[], if even_odd { "B*" } else { "B" })
    }

    /// Close, fill, then stroke the path (`b`, `b*`).
    pub fn fill_stroke_and_close(&mut self, even_odd: bool) -> &mut Self {
        self.push(&[], if even_odd { "b*" } else { "b" })
    }

    /// Intersect the clipping path with the current path.
    pub fn clip(&mut self, even_odd: bool) -> &mut Self {
        self.push(&[], if even_odd { "W*" } else { "W" })
    }

    /// End the path without painting it.
    pub fn end(&mut self) -> &mut Self {
        self.push(&[], "n")
    }

    // -- Graphics state -------------------------------------------------------

    /// Save the graphics state (`q`).
    pub fn push_state(&mut self) -> &mut Self {
        self.push(&[], "q")
    }

    /// Restore the last saved graphics state (`Q`).
    pub fn pop_state(&mut self) -> &mut Self {
        self.push(&[], "Q")
    }

    /// Concatenate `[a b c d e f]` onto the transformation matrix.
    pub fn transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<&mut Self> {
        self.push_numbers(&[a, b, c, d, e, f], "cm")
    }

    /// Line width in user space units (`w`).
    pub fn set_line_width(&mut self, width: f64) -> Result<&mut Self> {
        self.push_numbers(&[width], "w")
    }

    /// Line cap style, 0 to 2 (`J`).
    pub fn set_line_cap(&mut self, cap: u8) -> &mut Self {
        self.push(&[Value::from(cap)], "J")
    }

    /// Line join style, 0 to 2 (`j`).
    pub fn set_line_join(&mut self, join: u8) -> &mut Self {
        self.push(&[Value::from(join)], "j")
    }

    /// Miter limit (`M`).
    pub fn set_miter_limit(&mut self, limit: f64) -> Result<&mut Self> {
        self.push_numbers(&[limit], "M")
    }

    /// Dash pattern and phase (`d`).
    pub fn set_dash(&mut self, pattern: &[f64], phase: f64) -> Result<&mut Self> {
        let dashes = pattern
            .iter()
            .map(|&n| Value::real(n))
            .collect::<Result<Vec<_>>>()?;
        let phase = Value::real(phase)?;
        Ok(self.push(&[Value::Array(dashes), phase], "d"))
    }

    /// Apply the named graphics state parameter dictionary.
    pub fn set_state(&mut self, name: impl Into<Name>) -> &mut Self {
        self.push(&[Value::name(name)], "gs")
    }

    // -- Colour ---------------------------------------------------------------

    /// RGB colour for stroking or non-stroking operations (`RG`, `rg`).
    pub fn set_color_rgb(&mut self, r: f64, g: f64, b: f64, stroke: bool) -> Result<&mut Self> {
        self.push_numbers(&[r, g, b], if stroke { "RG" } else { "rg" })
    }

    /// Select a colour space by resource name (`CS`, `cs`).
    pub fn color_space(&mut self, space: impl Into<Name>, stroke: bool) -> &mut Self {
        self.push(&[Value::name(space)], if stroke { "CS" } else { "cs" })
    }

    /// Select a pattern or special colour by name.
    pub fn set_color_special(&mut self, name: impl Into<Name>, stroke: bool) -> &mut Self {
        self.push(&[Value::name(name)], if stroke { "SCN" } else { "scn" })
    }

    /// Paint the named shading (`sh`).
    pub fn shading(&mut self, name: impl Into<Name>) -> &mut Self {
        self.push(&[Value::name(name)], "sh")
    }

    /// Draw the named external object (`Do`).
    pub fn draw_x_object(&mut self, name: impl Into<Name>) -> &mut Self {
        self.push(&[Value::name(name)], "Do")
    }

    // -- Text -----------------------------------------------------------------

    /// Start a text object (`BT`).
    pub fn begin_text(&mut self) -> &mut Self {
        self.push(&[], "BT")
    }

    /// End the text object (`ET`).
    pub fn end_text(&mut self) -> &mut Self {
        self.push(&[], "ET")
    }

    /// Font resource and size (`Tf`).
    pub fn set_font_size(&mut self, font: impl Into<Name>, size: f64) -> Result<&mut Self> {
        let size = Value::real(size)?;
        Ok(self.push(&[Value::name(font), size], "Tf"))
    }

    /// Text rendering mode, 0 to 7 (`Tr`).
    pub fn set_text_rendering(&mut self, mode: u8) -> &mut Self {
        self.push(&[Value::from(mode)], "Tr")
    }

    /// Set the text matrix (`Tm`).
    pub fn text_matrix(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<&mut Self> {
        self.push_numbers(&[a, b, c, d, e, f], "Tm")
    }

    /// Show a string (`TJ`).
    pub fn show_text(&mut self, text: impl Into<PdfString>) -> &mut Self {
        self.push(&[Value::Array(vec![Value::String(text.into())])], "TJ")
    }
}
