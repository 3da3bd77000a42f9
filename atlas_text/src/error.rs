// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::source::{DataType, PixelFormat};

/// Error type for text decoding, atlas uploads and font configuration.
///
/// Carries a non-exhaustive [`ErrorKind`] plus contextual information about the failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// The non-exhaustive category describing this error.
    kind: ErrorKind,

    /// Extra detail for the failure.
    context: Context,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    Decoding {
        valid_up_to: usize,
        error_len: Option<usize>,
    },
    Format {
        atlas: PixelFormat,
        glyph: PixelFormat,
    },
    Texture {
        format: PixelFormat,
    },
    Fallback {
        primary: DataType,
        fallback: DataType,
    },
}

impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// For decoding errors, the byte offset of the first invalid UTF-8 sequence.
    ///
    /// When text is made of several spans the offset counts bytes across all of them.
    pub fn valid_up_to(&self) -> Option<usize> {
        match self.context {
            Context::Decoding { valid_up_to, .. } => Some(valid_up_to),
            _ => None,
        }
    }

    /// For format errors, the atlas format and the rejected glyph format.
    pub fn formats(&self) -> Option<(PixelFormat, PixelFormat)> {
        match self.context {
            Context::Format { atlas, glyph } => Some((atlas, glyph)),
            _ => None,
        }
    }

    /// For device errors, the texture format the device can't sample.
    pub fn texture_format(&self) -> Option<PixelFormat> {
        match self.context {
            Context::Texture { format } => Some(format),
            _ => None,
        }
    }

    pub(crate) fn decoding(err: core::str::Utf8Error, base: usize) -> Self {
        Self {
            kind: ErrorKind::Decoding,
            context: Context::Decoding {
                valid_up_to: base + err.valid_up_to(),
                error_len: err.error_len(),
            },
        }
    }

    /// Shifts the offset of a decoding error by `base` bytes.
    pub(crate) fn with_byte_offset(mut self, base: usize) -> Self {
        if let Context::Decoding { valid_up_to, .. } = &mut self.context {
            *valid_up_to += base;
        }
        self
    }

    pub(crate) fn unsupported_format(atlas: PixelFormat, glyph: PixelFormat) -> Self {
        Self {
            kind: ErrorKind::UnsupportedFormatConversion,
            context: Context::Format { atlas, glyph },
        }
    }

    pub(crate) fn unsupported_texture(format: PixelFormat) -> Self {
        Self {
            kind: ErrorKind::UnsupportedFormatConversion,
            context: Context::Texture { format },
        }
    }

    pub(crate) fn incompatible_fallback(primary: DataType, fallback: DataType) -> Self {
        Self {
            kind: ErrorKind::IncompatibleFallback,
            context: Context::Fallback { primary, fallback },
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.context {
            Context::Decoding {
                valid_up_to,
                error_len: Some(len),
            } => write!(
                f,
                "UTF-8 decoding error: invalid sequence of {len} byte(s) at offset {valid_up_to}"
            ),
            Context::Decoding {
                valid_up_to,
                error_len: None,
            } => write!(
                f,
                "UTF-8 decoding error: incomplete sequence at offset {valid_up_to}"
            ),
            Context::Format { atlas, glyph } => write!(
                f,
                "cannot upload {glyph:?} glyphs to a {atlas:?} texture atlas: unexpected format conversion"
            ),
            Context::Texture { format } => {
                write!(f, "the device cannot sample {format:?} texture atlases")
            }
            Context::Fallback { primary, fallback } => write!(
                f,
                "font fallbacks must be of the same font type ({fallback:?} fallback for a {primary:?} font)"
            ),
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Text was not valid UTF-8.
    Decoding,

    /// A glyph bitmap could not be converted to the atlas pixel format, or the device has
    /// no atlas format for it.
    UnsupportedFormatConversion,

    /// A fallback font has a different glyph source type than the primary font.
    IncompatibleFallback,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn decoding_offset_is_relative_to_all_spans() {
        let err = core::str::from_utf8(b"ab\xffcd").unwrap_err();
        let err = Error::decoding(err, 10);
        assert_eq!(err.kind(), ErrorKind::Decoding);
        assert_eq!(err.valid_up_to(), Some(12));
        assert_eq!(err.formats(), None);
        assert_eq!(
            err.to_string(),
            "UTF-8 decoding error: invalid sequence of 1 byte(s) at offset 12"
        );
    }

    #[test]
    fn format_error_reports_both_formats() {
        let err = Error::unsupported_format(PixelFormat::Rgba8, PixelFormat::R8);
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormatConversion);
        assert_eq!(err.formats(), Some((PixelFormat::Rgba8, PixelFormat::R8)));
        assert_eq!(err.valid_up_to(), None);
    }

    #[test]
    fn texture_error_reports_the_rejected_format() {
        let err = Error::unsupported_texture(PixelFormat::R8);
        assert_eq!(err.kind(), ErrorKind::UnsupportedFormatConversion);
        assert_eq!(err.texture_format(), Some(PixelFormat::R8));
        assert_eq!(err.formats(), None);
        assert_eq!(err.to_string(), "the device cannot sample R8 texture atlases");
    }
}
