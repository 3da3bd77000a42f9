// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decoding colored UTF-8 spans into codepoints.

use alloc::string::String;
use alloc::vec::Vec;
use peniko::color::palette::css::WHITE;
use smallvec::SmallVec;

use crate::Color;
use crate::error::Error;

/// A span of UTF-8 text drawn with one color.
///
/// The text is raw bytes so callers can pass data straight from files or foreign APIs;
/// malformed UTF-8 is reported as an [`ErrorKind::Decoding`](crate::ErrorKind::Decoding) error.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ColoredText<'a> {
    /// The color of this span.
    pub color: Color,
    /// UTF-8 encoded text.
    pub text: &'a [u8],
}

impl<'a> ColoredText<'a> {
    /// Creates a span of `text` drawn with `color`.
    pub fn new(color: Color, text: &'a (impl AsRef<[u8]> + ?Sized)) -> Self {
        Self {
            color,
            text: text.as_ref(),
        }
    }
}

impl<'a> From<&'a str> for ColoredText<'a> {
    /// Creates an opaque white span, which draws with the unmodified base color.
    fn from(text: &'a str) -> Self {
        Self::new(WHITE, text)
    }
}

/// A color change within a [`ColoredCodepoints`] sequence.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IndexedColor {
    /// The color used from `index` onwards.
    pub color: Color,
    /// Index of the first codepoint using `color`.
    pub index: usize,
}

/// A flat codepoint sequence with sparse color changes.
///
/// Each color applies from its index until the next color change or the end of the
/// sequence. Indices are strictly increasing. Codepoints before the first color change use
/// the base draw color.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ColoredCodepoints {
    /// Codepoints in reading order.
    pub codepoints: Vec<u32>,
    /// Color changes, ordered by index.
    pub colors: SmallVec<[IndexedColor; 2]>,
}

impl ColoredCodepoints {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes plain text without color changes.
    pub fn from_text(text: &(impl AsRef<[u8]> + ?Sized)) -> Result<Self, Error> {
        let mut out = Self::new();
        decode_utf8(text.as_ref(), &mut out.codepoints)?;
        Ok(out)
    }

    /// Decodes a sequence of colored spans.
    ///
    /// Empty spans are skipped. A single opaque white span covering everything is normalized
    /// to no color changes at all.
    pub fn from_spans(spans: &[ColoredText<'_>]) -> Result<Self, Error> {
        let mut out = Self::new();
        if let Some(first) = spans.first() {
            out.codepoints.reserve(first.text.len());
        }

        let mut offset = 0;
        for span in spans {
            // Two colors must never share a starting index.
            if span.text.is_empty() {
                continue;
            }
            let index = out.codepoints.len();
            decode_utf8(span.text, &mut out.codepoints)
                .map_err(|e| e.with_byte_offset(offset))?;
            offset += span.text.len();
            out.colors.push(IndexedColor {
                color: span.color,
                index,
            });
        }

        if let [only] = out.colors.as_slice() {
            if only.index == 0 && only.color == WHITE {
                out.colors.clear();
            }
        }

        out.debug_assert_sorted();
        Ok(out)
    }

    /// Whether the sequence has no codepoints.
    pub fn is_empty(&self) -> bool {
        self.codepoints.is_empty()
    }

    /// The number of codepoints.
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }

    /// Re-encodes the codepoints as a string.
    ///
    /// Values that are not Unicode scalar values become U+FFFD.
    pub fn to_text(&self) -> String {
        self.codepoints
            .iter()
            .map(|&cp| char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()
    }

    /// Checks that color indices are strictly increasing.
    pub(crate) fn debug_assert_sorted(&self) {
        debug_assert!(
            self.colors.windows(2).all(|w| w[0].index < w[1].index),
            "color indices must be strictly increasing"
        );
    }
}

/// Appends the codepoints of `text` to `out`.
///
/// On malformed input nothing is appended and the error carries the offset of the first
/// invalid byte.
pub fn decode_utf8(text: &[u8], out: &mut Vec<u32>) -> Result<(), Error> {
    let text = core::str::from_utf8(text).map_err(|e| Error::decoding(e, 0))?;
    out.reserve(text.len());
    out.extend(text.chars().map(u32::from));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use peniko::color::palette::css::{BLUE, RED};

    fn cps(text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    #[test]
    fn plain_text() {
        let text = ColoredCodepoints::from_text("añ€😀").unwrap();
        assert_eq!(text.codepoints, [0x61, 0xF1, 0x20AC, 0x1F600]);
        assert!(text.colors.is_empty());
        assert_eq!(text.to_text(), "añ€😀");
    }

    #[test]
    fn spans_record_color_changes() {
        let spans = [
            ColoredText::new(RED, "AB"),
            ColoredText::new(BLUE, ""),
            ColoredText::new(BLUE, "C"),
        ];
        let text = ColoredCodepoints::from_spans(&spans).unwrap();
        assert_eq!(text.codepoints, cps("ABC"));
        assert_eq!(
            text.colors.as_slice(),
            [
                IndexedColor {
                    color: RED,
                    index: 0
                },
                IndexedColor {
                    color: BLUE,
                    index: 2
                },
            ]
        );
    }

    #[test]
    fn single_white_span_is_normalized() {
        let text = ColoredCodepoints::from_spans(&[ColoredText::from("hello")]).unwrap();
        assert!(text.colors.is_empty());

        let text = ColoredCodepoints::from_spans(&[ColoredText::new(RED, "hello")]).unwrap();
        assert_eq!(text.colors.len(), 1);
    }

    #[test]
    fn no_spans_is_empty() {
        let text = ColoredCodepoints::from_spans(&[]).unwrap();
        assert!(text.is_empty());
        assert!(text.colors.is_empty());
    }

    #[test]
    fn malformed_span_fails_whole_call() {
        let spans = [
            ColoredText::new(RED, "abc"),
            ColoredText::new(BLUE, b"d\xe2\x82".as_slice()),
        ];
        let err = ColoredCodepoints::from_spans(&spans).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.valid_up_to(), Some(4));
    }

    #[test]
    fn malformed_text_appends_nothing() {
        let mut out = cps("x");
        let err = decode_utf8(b"ok\xc0", &mut out).unwrap_err();
        assert_eq!(err.valid_up_to(), Some(2));
        assert_eq!(out, cps("x"));
    }
}
