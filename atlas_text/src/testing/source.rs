// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::source::{DataType, GlyphBitmap, GlyphSource, PixelFormat};

/// Luminance of every pixel of a [`BoxGlyphSource`] glyph. Alpha is always 255.
pub const GLYPH_LUMINANCE: u8 = 200;

/// A solid rectangular glyph.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphBox {
    /// Pen advance in source pixels.
    pub advance: f32,
    /// Bitmap width.
    pub width: u32,
    /// Bitmap height.
    pub height: u32,
    /// Offset from the pen to the left edge.
    pub bearing_x: f32,
    /// Offset from the baseline up to the top edge.
    pub bearing_y: f32,
}

impl GlyphBox {
    /// A box standing on the baseline.
    pub fn new(advance: f32, width: u32, height: u32) -> Self {
        Self {
            advance,
            width,
            height,
            bearing_x: 0.0,
            bearing_y: height as f32,
        }
    }

    /// Replaces the bearings.
    pub fn with_bearing(mut self, bearing_x: f32, bearing_y: f32) -> Self {
        self.bearing_x = bearing_x;
        self.bearing_y = bearing_y;
        self
    }
}

/// A rasterizer that draws every glyph as a solid box.
///
/// Printable characters are `advance` wide and as tall as the line. The space is an empty
/// glyph, and control characters are not covered at all.
#[derive(Clone, Debug)]
pub struct BoxGlyphSource {
    height: f32,
    ascent: f32,
    descent: f32,
    dpi_scale: f32,
    data_type: DataType,
    format: PixelFormat,
    default_glyph: GlyphBox,
    overrides: HashMap<u32, Option<GlyphBox>, FixedState>,
    kerning: HashMap<(u32, u32), f32, FixedState>,
}

impl BoxGlyphSource {
    /// A monospace font with lines `height` pixels tall.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "test metrics are small and positive"
    )]
    pub fn monospace(height: f32, advance: f32) -> Self {
        Self {
            height,
            ascent: height * 0.8,
            descent: -height * 0.2,
            dpi_scale: 1.0,
            data_type: DataType::Bitmap,
            format: PixelFormat::Rgba8,
            default_glyph: GlyphBox::new(advance, advance as u32, height as u32),
            overrides: HashMap::with_hasher(FixedState::default()),
            kerning: HashMap::with_hasher(FixedState::default()),
        }
        .with_glyph(' ', GlyphBox::new(advance, 0, 0))
    }

    /// Replaces the glyph of `c`.
    pub fn with_glyph(mut self, c: char, glyph: GlyphBox) -> Self {
        self.overrides.insert(c.into(), Some(glyph));
        self
    }

    /// Removes `c`. The source still draws a default box for it, like a missing glyph.
    pub fn without_glyph(mut self, c: char) -> Self {
        self.overrides.insert(c.into(), None);
        self
    }

    /// Sets the kerning between `left` and `right`.
    pub fn with_kerning(mut self, left: char, right: char, kerning: f32) -> Self {
        self.kerning.insert((left.into(), right.into()), kerning);
        self
    }

    /// Sets the ascent. The default is 80% of the line height.
    pub fn with_ascent(mut self, ascent: f32) -> Self {
        self.ascent = ascent;
        self
    }

    /// Sets the data type. The default is [`DataType::Bitmap`].
    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    /// Sets the pixel format of glyph bitmaps. The default is [`PixelFormat::Rgba8`].
    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the DPI scale. The default is 1.
    pub fn with_dpi_scale(mut self, dpi_scale: f32) -> Self {
        self.dpi_scale = dpi_scale;
        self
    }

    /// The pixel format of glyph bitmaps.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    fn is_printable(codepoint: u32) -> bool {
        char::from_u32(codepoint).is_some_and(|c| !c.is_control())
    }

    fn pixel(&self) -> &'static [u8] {
        match self.format {
            PixelFormat::R8 => &[GLYPH_LUMINANCE],
            PixelFormat::La8 => &[GLYPH_LUMINANCE, 255],
            PixelFormat::Rgba8 => &[GLYPH_LUMINANCE, GLYPH_LUMINANCE, GLYPH_LUMINANCE, 255],
        }
    }
}

impl GlyphSource for BoxGlyphSource {
    fn has_glyph(&self, codepoint: u32) -> bool {
        match self.overrides.get(&codepoint) {
            Some(glyph) => glyph.is_some(),
            None => Self::is_printable(codepoint),
        }
    }

    fn glyph_bitmap(&self, codepoint: u32) -> GlyphBitmap {
        let glyph = match self.overrides.get(&codepoint) {
            Some(Some(glyph)) => *glyph,
            Some(None) => self.default_glyph,
            None if Self::is_printable(codepoint) => self.default_glyph,
            None => return GlyphBitmap::empty(self.format, 0.0, 0.0, 0.0),
        };
        let pixel_count = glyph.width as usize * glyph.height as usize;
        let pixels: Vec<u8> = self.pixel().repeat(pixel_count);
        GlyphBitmap {
            pixels,
            width: glyph.width,
            height: glyph.height,
            format: self.format,
            advance: glyph.advance,
            bearing_x: glyph.bearing_x,
            bearing_y: glyph.bearing_y,
        }
    }

    fn kerning(&self, left: u32, right: u32) -> f32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0.0)
    }

    fn ascent(&self) -> f32 {
        self.ascent
    }

    fn descent(&self) -> f32 {
        self.descent
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn dpi_scale(&self) -> f32 {
        self.dpi_scale
    }

    fn data_type(&self) -> DataType {
        self.data_type
    }
}
