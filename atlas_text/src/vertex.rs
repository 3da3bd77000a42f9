// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph vertices and span color compositing.

use peniko::color::{AlphaColor, LinearSrgb};

use crate::Color;

/// Vertex layouts understood by [`BatchSubmitter`](crate::BatchSubmitter) implementations.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum VertexFormat {
    /// `f32` x/y position, `u16` normalized s/t texture coordinates, `u8` RGBA color.
    XyF32StU16RgbaU8,
}

/// One corner of a glyph quad.
///
/// Quads are four vertices in the order top-left, bottom-left, top-right, bottom-right:
///
/// ```text
/// 0---2
/// | / |
/// 1---3
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[repr(C)]
pub struct GlyphVertex {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position, growing downwards.
    pub y: f32,
    /// Horizontal texture coordinate, normalized to the `u16` range.
    pub s: u16,
    /// Vertical texture coordinate, normalized to the `u16` range.
    pub t: u16,
    /// sRGB color with straight alpha.
    pub color: [u8; 4],
}

impl GlyphVertex {
    /// The layout of this vertex type.
    pub const FORMAT: VertexFormat = VertexFormat::XyF32StU16RgbaU8;
}

/// Packs a color into 8-bit sRGB components.
pub(crate) fn pack_color(color: Color) -> [u8; 4] {
    color.to_rgba8().to_u8_array()
}

/// Clamps every component of `color` to `0..=1`.
pub(crate) fn clamp_color(color: Color) -> Color {
    Color::new(color.components.map(|c| c.clamp(0.0, 1.0)))
}

/// Composites a span color against the base draw color.
///
/// With `gamma_correct` the multiplication happens in linear light, otherwise directly on
/// the sRGB encoded components. Alpha is always multiplied as-is.
pub(crate) fn composite(span: Color, base: Color, gamma_correct: bool) -> [u8; 4] {
    let span = clamp_color(span);
    if !gamma_correct {
        return pack_color(multiply(span, base));
    }
    let span: AlphaColor<LinearSrgb> = span.convert();
    let base: AlphaColor<LinearSrgb> = base.convert();
    let mixed = AlphaColor::<LinearSrgb>::new(multiply_components(span.components, base.components));
    pack_color(mixed.convert())
}

fn multiply(a: Color, b: Color) -> Color {
    Color::new(multiply_components(a.components, b.components))
}

fn multiply_components(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    [a[0] * b[0], a[1] * b[1], a[2] * b[2], a[3] * b[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use peniko::color::palette::css::{BLUE, RED, WHITE};

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(size_of::<GlyphVertex>(), 16);
    }

    #[test]
    fn white_base_keeps_span_color() {
        assert_eq!(composite(RED, WHITE, true), [255, 0, 0, 255]);
        assert_eq!(composite(BLUE, WHITE, true), [0, 0, 255, 255]);
    }

    #[test]
    fn gamma_correct_multiply_differs_from_plain() {
        let grey = Color::new([0.5, 0.5, 0.5, 1.0]);
        let linear = composite(grey, grey, true);
        let plain = composite(grey, grey, false);
        // 0.5 * 0.5 = 0.25 when encoded.
        assert_eq!(plain, [64, 64, 64, 255]);
        // In linear light the product is darker once re-encoded (about 0.237).
        assert!((58..=62).contains(&linear[0]), "{linear:?} vs {plain:?}");
        assert_eq!(linear[3], 255);
    }

    #[test]
    fn span_color_is_clamped() {
        let over = Color::new([2.0, -1.0, 0.0, 1.5]);
        assert_eq!(composite(over, WHITE, true), [255, 0, 0, 255]);
    }
}
