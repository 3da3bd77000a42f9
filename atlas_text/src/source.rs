// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph sources and the fallback chain.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use smallvec::SmallVec;

use crate::error::Error;

/// The advance of a substituted tab glyph, in multiples of the space advance.
pub const SPACES_PER_TAB: f32 = 4.0;

const TAB: u32 = '\t' as u32;
const SPACE: u32 = ' ' as u32;

/// Pixel layout of glyph bitmaps and atlas textures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// Single 8-bit coverage channel.
    R8,
    /// 8-bit luminance plus 8-bit alpha.
    La8,
    /// 8-bit red, green, blue and alpha.
    Rgba8,
}

impl PixelFormat {
    /// The number of bytes used by one pixel.
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::R8 => 1,
            Self::La8 => 2,
            Self::Rgba8 => 4,
        }
    }

    /// The number of bytes used by a `width` x `height` region.
    pub const fn slice_size(self, width: u32, height: u32) -> usize {
        width as usize * height as usize * self.bytes_per_pixel()
    }
}

/// How a glyph source produces its glyphs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Glyphs are cut out of a pre-drawn image.
    Bitmap,
    /// Glyphs are rasterized from vector outlines.
    ///
    /// Outline glyphs keep luminance constant and vary alpha, so their atlases are cleared to
    /// transparent white and their baseline falls back to a line-height heuristic.
    Outline,
}

/// A rasterized glyph with its metrics.
#[derive(Clone, PartialEq)]
pub struct GlyphBitmap {
    /// Pixel data, `width * height * format.bytes_per_pixel()` bytes, rows top to bottom.
    pub pixels: Vec<u8>,
    /// Width of the bitmap in pixels.
    pub width: u32,
    /// Height of the bitmap in pixels.
    pub height: u32,
    /// Pixel layout of `pixels`.
    pub format: PixelFormat,
    /// Horizontal pen advance, in source pixels.
    pub advance: f32,
    /// Horizontal offset from the pen position to the left edge of the bitmap.
    pub bearing_x: f32,
    /// Vertical offset from the baseline up to the top edge of the bitmap.
    pub bearing_y: f32,
}

impl GlyphBitmap {
    /// Creates a zero-area glyph that only carries metrics.
    pub fn empty(format: PixelFormat, advance: f32, bearing_x: f32, bearing_y: f32) -> Self {
        Self {
            pixels: Vec::new(),
            width: 0,
            height: 0,
            format,
            advance,
            bearing_x,
            bearing_y,
        }
    }

    /// Whether the bitmap has no pixels and never needs atlas space.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl Debug for GlyphBitmap {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphBitmap")
            .field("pixels", &self.pixels.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("advance", &self.advance)
            .field("bearing_x", &self.bearing_x)
            .field("bearing_y", &self.bearing_y)
            .finish()
    }
}

/// A provider of glyph bitmaps and font metrics, usually a rasterizer for one font file.
///
/// All lengths are in source pixels; divide by [`dpi_scale`](Self::dpi_scale) to get
/// layout units.
pub trait GlyphSource {
    /// Whether this source has a glyph for `codepoint`.
    fn has_glyph(&self, codepoint: u32) -> bool;

    /// Rasterizes `codepoint`.
    ///
    /// Sources return their "missing glyph" representation for codepoints they don't have.
    fn glyph_bitmap(&self, codepoint: u32) -> GlyphBitmap;

    /// The kerning adjustment between two glyphs.
    fn kerning(&self, left: u32, right: u32) -> f32;

    /// Distance from the baseline to the top of the line.
    fn ascent(&self) -> f32;

    /// Distance from the baseline to the bottom of the line (usually negative).
    fn descent(&self) -> f32;

    /// The line height.
    fn height(&self) -> f32;

    /// Ratio between source pixels and layout units.
    fn dpi_scale(&self) -> f32;

    /// How this source produces its glyphs.
    fn data_type(&self) -> DataType;
}

/// A primary glyph source followed by fallbacks, in priority order.
#[derive(Clone)]
pub(crate) struct SourceChain {
    sources: SmallVec<[Arc<dyn GlyphSource>; 2]>,
}

impl SourceChain {
    pub(crate) fn new(primary: Arc<dyn GlyphSource>) -> Self {
        let mut sources = SmallVec::new();
        sources.push(primary);
        Self { sources }
    }

    pub(crate) fn primary(&self) -> &Arc<dyn GlyphSource> {
        &self.sources[0]
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<dyn GlyphSource>> {
        self.sources.iter()
    }

    pub(crate) fn has_glyph(&self, codepoint: u32) -> bool {
        self.sources.iter().any(|s| s.has_glyph(codepoint))
    }

    /// Rasterizes `codepoint` with the highest ranked source that has it.
    ///
    /// Returns the bitmap together with the DPI scale of the source that produced it.
    pub(crate) fn glyph_bitmap(&self, codepoint: u32) -> (GlyphBitmap, f32) {
        let primary = self.primary();

        // Sources without a tab glyph get a wide space instead.
        if codepoint == TAB && !self.has_glyph(TAB) {
            let space = primary.glyph_bitmap(SPACE);
            let tab = GlyphBitmap::empty(
                space.format,
                space.advance * SPACES_PER_TAB,
                space.bearing_x,
                space.bearing_y,
            );
            return (tab, primary.dpi_scale());
        }

        for source in &self.sources {
            if source.has_glyph(codepoint) {
                return (source.glyph_bitmap(codepoint), source.dpi_scale());
            }
        }

        (primary.glyph_bitmap(codepoint), primary.dpi_scale())
    }

    /// Replaces the fallbacks, keeping the primary source.
    ///
    /// Fails without changing anything when a fallback produces a different kind of glyphs.
    pub(crate) fn set_fallbacks(
        &mut self,
        fallbacks: impl IntoIterator<Item = Arc<dyn GlyphSource>>,
    ) -> Result<(), Error> {
        let primary_type = self.primary().data_type();
        let fallbacks: SmallVec<[Arc<dyn GlyphSource>; 2]> = fallbacks.into_iter().collect();
        if let Some(bad) = fallbacks.iter().find(|f| f.data_type() != primary_type) {
            return Err(Error::incompatible_fallback(primary_type, bad.data_type()));
        }
        self.sources.truncate(1);
        self.sources.extend(fallbacks);
        Ok(())
    }
}

impl Debug for SourceChain {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceChain")
            .field("sources", &self.sources.len())
            .field("data_type", &self.primary().data_type())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::{BoxGlyphSource, GlyphBox};

    fn chain(primary: BoxGlyphSource) -> SourceChain {
        SourceChain::new(Arc::new(primary))
    }

    #[test]
    fn tab_is_substituted_by_wide_space() {
        let chain = chain(BoxGlyphSource::monospace(16.0, 8.0));
        let (tab, dpi) = chain.glyph_bitmap('\t' as u32);
        assert!(tab.is_empty());
        assert_eq!(tab.advance, 32.0);
        assert_eq!(dpi, 1.0);
    }

    #[test]
    fn explicit_tab_glyph_wins() {
        let source = BoxGlyphSource::monospace(16.0, 8.0)
            .with_glyph('\t', GlyphBox::new(10.0, 3, 3));
        let chain = chain(source);
        let (tab, _) = chain.glyph_bitmap('\t' as u32);
        assert_eq!(tab.advance, 10.0);
        assert_eq!(tab.width, 3);
    }

    #[test]
    fn fallback_is_used_for_missing_glyphs() {
        let primary = BoxGlyphSource::monospace(16.0, 8.0).without_glyph('x');
        let fallback = BoxGlyphSource::monospace(16.0, 12.0).with_dpi_scale(2.0);
        let mut chain = chain(primary);
        chain
            .set_fallbacks([Arc::new(fallback) as Arc<dyn GlyphSource>])
            .unwrap();

        let (x, dpi) = chain.glyph_bitmap('x' as u32);
        assert_eq!(x.advance, 12.0);
        assert_eq!(dpi, 2.0);

        let (a, dpi) = chain.glyph_bitmap('a' as u32);
        assert_eq!(a.advance, 8.0);
        assert_eq!(dpi, 1.0);
    }

    #[test]
    fn missing_everywhere_uses_primary() {
        let primary = BoxGlyphSource::monospace(16.0, 8.0).without_glyph('x');
        let chain = chain(primary);
        assert!(!chain.has_glyph('x' as u32));
        let (x, _) = chain.glyph_bitmap('x' as u32);
        assert_eq!(x.advance, 8.0);
    }

    #[test]
    fn mismatched_fallback_is_rejected() {
        let primary = BoxGlyphSource::monospace(16.0, 8.0).with_data_type(DataType::Outline);
        let good = BoxGlyphSource::monospace(16.0, 8.0).with_data_type(DataType::Outline);
        let bad = BoxGlyphSource::monospace(16.0, 8.0).with_data_type(DataType::Bitmap);
        let mut chain = chain(primary);
        chain
            .set_fallbacks([Arc::new(good) as Arc<dyn GlyphSource>])
            .unwrap();

        let err = chain
            .set_fallbacks([Arc::new(bad) as Arc<dyn GlyphSource>])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncompatibleFallback);
        assert_eq!(chain.iter().count(), 2);
    }
}
