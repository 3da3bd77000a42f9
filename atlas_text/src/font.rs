// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The font facade.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use log::warn;
use peniko::kurbo::Affine;

use crate::Color;
use crate::atlas::{GlyphAtlas, GlyphRecord};
use crate::batch::{BatchSubmitter, submit_draw_commands};
use crate::decode::{ColoredCodepoints, ColoredText, decode_utf8};
use crate::error::Error;
use crate::gpu::{GpuDevice, SamplerState};
use crate::kerning::KerningCache;
use crate::layout::{Alignment, TextLayout};
use crate::source::{DataType, GlyphSource, PixelFormat, SourceChain};
use crate::util::round_px;
use crate::wrap::{Advances, WrappedLines, wrap_lines};

const NEWLINE: u32 = '\n' as u32;
const CARRIAGE_RETURN: u32 = '\r' as u32;
const SPACE: u32 = ' ' as u32;

/// Options for [`Font::new`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FontConfig {
    /// How atlas textures are sampled.
    pub sampler: SamplerState,
    /// Line spacing as a multiple of the font height.
    pub line_height: f32,
    /// Whether span colors are multiplied with the base color in linear light.
    ///
    /// When disabled the multiplication happens on sRGB encoded components.
    pub gamma_correct: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            sampler: SamplerState::default(),
            line_height: 1.0,
            gamma_correct: true,
        }
    }
}

/// A font backed by a glyph atlas on a GPU device.
///
/// All metrics are in layout units: source pixels divided by the DPI scale of the primary
/// glyph source, rounded to whole pixels.
pub struct Font<D: GpuDevice> {
    sources: SourceChain,
    atlas: GlyphAtlas<D>,
    kerning: KerningCache,
    line_height: f32,
    gamma_correct: bool,
}

impl<D: GpuDevice> Font<D> {
    /// Creates a font drawing glyphs from `source` into textures created on `device`.
    ///
    /// The atlas format follows the glyphs of `source`. Luminance-alpha glyphs go into an
    /// RGBA atlas when the device can't sample luminance-alpha textures.
    pub fn new(source: Arc<dyn GlyphSource>, device: D, config: FontConfig) -> Result<Self, Error> {
        let glyph_format = source.glyph_bitmap(SPACE).format;
        let format = if device.supports_format(glyph_format) {
            glyph_format
        } else if glyph_format == PixelFormat::La8 && device.supports_format(PixelFormat::Rgba8) {
            PixelFormat::Rgba8
        } else {
            return Err(Error::unsupported_texture(glyph_format));
        };

        let atlas = GlyphAtlas::new(
            device,
            format,
            source.data_type(),
            config.sampler,
            source.height(),
        );
        Ok(Self {
            sources: SourceChain::new(source),
            atlas,
            kerning: KerningCache::new(),
            line_height: config.line_height,
            gamma_correct: config.gamma_correct,
        })
    }

    /// The width of the widest line of `text`.
    ///
    /// Lines are separated by `'\n'`; carriage returns are ignored.
    pub fn measure_width(&mut self, text: &(impl AsRef<[u8]> + ?Sized)) -> Result<f32, Error> {
        let mut codepoints = Vec::new();
        decode_utf8(text.as_ref(), &mut codepoints)?;

        let mut max_width = 0.0_f32;
        for line in codepoints.split(|&c| c == NEWLINE) {
            let mut width = 0.0;
            let mut prev = 0;
            for &c in line.iter().filter(|&&c| c != CARRIAGE_RETURN) {
                width += self.glyph(c)?.advance + self.kerning(prev, c);
                prev = c;
            }
            max_width = max_width.max(width);
        }
        Ok(max_width)
    }

    /// The advance of `codepoint`.
    pub fn glyph_width(&mut self, codepoint: u32) -> Result<f32, Error> {
        Ok(self.glyph(codepoint)?.advance)
    }

    /// The kerning between two codepoints.
    pub fn kerning(&mut self, left: u32, right: u32) -> f32 {
        self.kerning.kerning(&self.sources, left, right)
    }

    /// The kerning between the first characters of `left` and `right`.
    ///
    /// An empty string stands for "no character", which has no kerning.
    pub fn kerning_between(
        &mut self,
        left: &(impl AsRef<[u8]> + ?Sized),
        right: &(impl AsRef<[u8]> + ?Sized),
    ) -> Result<f32, Error> {
        let left = first_codepoint(left.as_ref())?;
        let right = first_codepoint(right.as_ref())?;
        Ok(self.kerning(left, right))
    }

    /// Breaks colored text into lines no wider than `width`.
    ///
    /// Returns the text of every line together with its width. See [`wrap_lines`] for the
    /// breaking rules.
    pub fn wrap(
        &mut self,
        spans: &[ColoredText<'_>],
        width: f32,
    ) -> Result<(Vec<String>, Vec<f32>), Error> {
        let text = ColoredCodepoints::from_spans(spans)?;
        let wrapped = self.wrap_codepoints(&text, width)?;
        let lines = wrapped.lines.iter().map(ColoredCodepoints::to_text).collect();
        Ok((lines, wrapped.widths))
    }

    /// Breaks decoded text into lines no wider than `width`, keeping color changes.
    pub fn wrap_codepoints(
        &mut self,
        text: &ColoredCodepoints,
        width: f32,
    ) -> Result<WrappedLines, Error> {
        wrap_lines(self, text, width)
    }

    /// Lays out colored text, breaking lines only at newlines.
    ///
    /// Span colors are multiplied with `color`.
    pub fn layout(
        &mut self,
        spans: &[ColoredText<'_>],
        color: Color,
    ) -> Result<TextLayout<D::Texture>, Error> {
        let text = ColoredCodepoints::from_spans(spans)?;
        self.generate(&text, color)
    }

    /// Lays out colored text wrapped at `width` and aligned within it.
    pub fn layout_wrapped(
        &mut self,
        spans: &[ColoredText<'_>],
        width: f32,
        align: Alignment,
        color: Color,
    ) -> Result<TextLayout<D::Texture>, Error> {
        let text = ColoredCodepoints::from_spans(spans)?;
        self.generate_formatted(&text, color, width, align)
    }

    /// Submits a layout to `batch`.
    pub fn draw<B: BatchSubmitter<D::Texture> + ?Sized>(
        &self,
        batch: &mut B,
        layout: &TextLayout<D::Texture>,
        transform: Affine,
    ) {
        if layout.is_stale(self) {
            warn!(
                "drawing a layout from cache generation {} with generation {}",
                layout.generation(),
                self.cache_generation()
            );
        }
        submit_draw_commands(batch, transform, layout.commands(), layout.vertices());
    }

    /// Lays out colored text and submits it to `batch`.
    pub fn print<B: BatchSubmitter<D::Texture> + ?Sized>(
        &mut self,
        batch: &mut B,
        spans: &[ColoredText<'_>],
        transform: Affine,
        color: Color,
    ) -> Result<(), Error> {
        let layout = self.layout(spans, color)?;
        self.draw(batch, &layout, transform);
        Ok(())
    }

    /// Lays out wrapped and aligned colored text and submits it to `batch`.
    pub fn printf<B: BatchSubmitter<D::Texture> + ?Sized>(
        &mut self,
        batch: &mut B,
        spans: &[ColoredText<'_>],
        wrap: f32,
        align: Alignment,
        transform: Affine,
        color: Color,
    ) -> Result<(), Error> {
        let layout = self.layout_wrapped(spans, wrap, align, color)?;
        self.draw(batch, &layout, transform);
        Ok(())
    }

    /// Whether the primary source or a fallback has a glyph for `codepoint`.
    pub fn has_glyph(&self, codepoint: u32) -> bool {
        self.sources.has_glyph(codepoint)
    }

    /// Whether every character of `text` has a glyph. Empty text has none.
    pub fn has_glyphs(&self, text: &(impl AsRef<[u8]> + ?Sized)) -> Result<bool, Error> {
        let mut codepoints = Vec::new();
        decode_utf8(text.as_ref(), &mut codepoints)?;
        Ok(!codepoints.is_empty() && codepoints.iter().all(|&c| self.has_glyph(c)))
    }

    /// Uses the primary sources of `fallbacks`, in order, for glyphs this font lacks.
    ///
    /// Replaces any previous fallbacks. Every fallback must produce the same kind of glyphs
    /// as this font; otherwise nothing changes. Glyphs that were already rasterized keep their
    /// current look.
    pub fn set_fallbacks<E: GpuDevice>(&mut self, fallbacks: &[&Font<E>]) -> Result<(), Error> {
        self.sources
            .set_fallbacks(fallbacks.iter().map(|f| f.primary_source().clone()))
    }

    /// Sets line spacing as a multiple of the font height.
    pub fn set_line_height(&mut self, line_height: f32) {
        self.line_height = line_height;
    }

    /// Line spacing as a multiple of the font height.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// The height of the font.
    pub fn height(&self) -> f32 {
        self.scaled(self.primary_source().height())
    }

    /// Distance from the baseline to the top of the line.
    pub fn ascent(&self) -> f32 {
        self.scaled(self.primary_source().ascent())
    }

    /// Distance from the baseline to the bottom of the line, usually negative.
    pub fn descent(&self) -> f32 {
        self.scaled(self.primary_source().descent())
    }

    /// Distance from the top of the line to the baseline.
    ///
    /// Falls back to an estimate from the height for outline fonts without an ascent.
    pub fn baseline(&self) -> f32 {
        let ascent = self.ascent();
        if ascent != 0.0 {
            ascent
        } else if self.data_type() == DataType::Outline {
            round_px(self.height() / 1.25)
        } else {
            0.0
        }
    }

    /// Ratio between source pixels and layout units.
    pub fn dpi_scale(&self) -> f32 {
        self.primary_source().dpi_scale()
    }

    /// How atlas textures are sampled.
    pub fn sampler(&self) -> SamplerState {
        self.atlas.sampler()
    }

    /// Changes how atlas textures are sampled, including existing ones.
    pub fn set_sampler(&mut self, sampler: SamplerState) {
        self.atlas.set_sampler(sampler);
    }

    /// Whether span colors are multiplied with the base color in linear light.
    pub fn gamma_correct(&self) -> bool {
        self.gamma_correct
    }

    /// Counter that increases whenever the atlas is rebuilt.
    ///
    /// Layouts built with an older generation must be rebuilt.
    pub fn cache_generation(&self) -> u32 {
        self.atlas.generation()
    }

    /// Recreates the atlas after its textures were lost.
    ///
    /// Every glyph is rasterized again on demand. Kerning is kept.
    pub fn reload(&mut self) {
        self.atlas.reload();
    }

    /// The glyph atlas.
    pub fn atlas(&self) -> &GlyphAtlas<D> {
        &self.atlas
    }

    /// The glyph source this font was created with.
    pub fn primary_source(&self) -> &Arc<dyn GlyphSource> {
        self.sources.primary()
    }

    pub(crate) fn glyph(&mut self, codepoint: u32) -> Result<GlyphRecord, Error> {
        self.atlas.get_or_create(&self.sources, codepoint)
    }

    pub(crate) fn data_type(&self) -> DataType {
        self.primary_source().data_type()
    }

    fn scaled(&self, value: f32) -> f32 {
        round_px(value / self.dpi_scale())
    }
}

impl<D: GpuDevice> Advances for Font<D> {
    fn advance(&mut self, codepoint: u32) -> Result<f32, Error> {
        self.glyph_width(codepoint)
    }

    fn kerning(&mut self, left: u32, right: u32) -> f32 {
        Self::kerning(self, left, right)
    }
}

impl<D: GpuDevice> Debug for Font<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Font")
            .field("sources", &self.sources)
            .field("atlas", &self.atlas)
            .field("kerning", &self.kerning.len())
            .field("line_height", &self.line_height)
            .field("gamma_correct", &self.gamma_correct)
            .finish()
    }
}

fn first_codepoint(text: &[u8]) -> Result<u32, Error> {
    let mut codepoints = Vec::new();
    decode_utf8(text, &mut codepoints)?;
    Ok(codepoints.first().copied().unwrap_or(0))
}
