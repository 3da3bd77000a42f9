// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Helpers shared by the integration tests.

use std::sync::Arc;

use atlas_text::testing::{BoxGlyphSource, MemoryDevice, MemoryTexture, UploadRect};
use atlas_text::{ColoredText, Font, FontConfig};

/// Lines are 16 pixels tall, every glyph is 8 pixels wide.
pub(crate) fn monospace() -> BoxGlyphSource {
    BoxGlyphSource::monospace(16.0, 8.0)
}

pub(crate) fn font(source: BoxGlyphSource) -> Font<MemoryDevice> {
    font_on(source, MemoryDevice::new(4096))
}

pub(crate) fn font_on(source: BoxGlyphSource, device: MemoryDevice) -> Font<MemoryDevice> {
    Font::new(Arc::new(source), device, FontConfig::default()).unwrap()
}

pub(crate) fn plain(text: &str) -> [ColoredText<'_>; 1] {
    [ColoredText::from(text)]
}

/// `count` distinct printable characters, starting at U+0100.
pub(crate) fn distinct_chars(count: u32) -> String {
    (0x100..0x100 + count).filter_map(char::from_u32).collect()
}

/// Regions uploaded to `texture`, without the upload that cleared it.
pub(crate) fn glyph_uploads(texture: &MemoryTexture) -> Vec<UploadRect> {
    texture
        .uploads()
        .into_iter()
        .filter(|r| !(r.width == texture.width() && r.height == texture.height()))
        .collect()
}

pub(crate) fn overlaps(a: &UploadRect, b: &UploadRect) -> bool {
    a.x < b.x + b.width && b.x < a.x + a.width && a.y < b.y + b.height && b.y < a.y + a.height
}
