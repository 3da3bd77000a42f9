// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas sizes and the row packer.

use log::trace;

/// Padding in pixels kept around every glyph to prevent texture bleeding.
pub const GLYPH_PADDING: u32 = 2;

/// Width and height of the smallest atlas.
pub const INITIAL_ATLAS_SIZE: u32 = 128;

/// Upper bound on the atlas width, further limited by the device.
pub const MAX_ATLAS_WIDTH: u32 = 8192;

/// Upper bound on the atlas height, further limited by the device.
pub const MAX_ATLAS_HEIGHT: u32 = 4096;

/// Dimensions of an atlas page in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AtlasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl AtlasSize {
    /// Creates a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// The largest atlas allowed on a device with the given texture size limit.
    pub fn max_for_device(max_texture_size: u32) -> Self {
        Self {
            width: MAX_ATLAS_WIDTH.min(max_texture_size),
            height: MAX_ATLAS_HEIGHT.min(max_texture_size),
        }
    }

    /// The next step on the growth ladder: `128x128 -> 256x128 -> 256x256 -> 512x256 -> ...`.
    ///
    /// Returns `self` once neither dimension can double without exceeding `max`.
    pub fn next(self, max: Self) -> Self {
        let wider = Self::new(self.width * 2, self.height);
        let taller = Self::new(self.width, self.height * 2);
        let (preferred, other) = if self.width == self.height {
            (wider, taller)
        } else {
            (taller, wider)
        };
        if preferred.fits_within(max) {
            preferred
        } else if other.fits_within(max) {
            other
        } else {
            self
        }
    }

    /// The smallest size on the ladder that comfortably holds glyphs of a font whose lines
    /// are `line_height` pixels tall, capped at `max`.
    pub fn initial(line_height: f32, max: Self) -> Self {
        let line_height = f64::from(line_height);
        let mut size = Self::new(INITIAL_ATLAS_SIZE, INITIAL_ATLAS_SIZE);
        loop {
            if (line_height * 0.8) * line_height * 30.0 <= size.area() {
                return size;
            }
            let next = size.next(max);
            if next == size {
                return size;
            }
            size = next;
        }
    }

    /// Whether a `width` x `height` glyph plus padding on both sides fits on an empty page.
    pub fn fits_glyph(self, width: u32, height: u32) -> bool {
        width + GLYPH_PADDING * 2 < self.width && height + GLYPH_PADDING * 2 < self.height
    }

    /// Whether this size is strictly larger than `other` in either dimension.
    pub fn is_larger_than(self, other: Self) -> bool {
        self.width > other.width || self.height > other.height
    }

    fn fits_within(self, max: Self) -> bool {
        self.width <= max.width && self.height <= max.height
    }

    fn area(self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }
}

/// Fills a page row by row, never reusing space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RowPacker {
    x: u32,
    y: u32,
    row_height: u32,
}

impl RowPacker {
    pub(crate) fn new() -> Self {
        Self {
            x: GLYPH_PADDING,
            y: GLYPH_PADDING,
            row_height: GLYPH_PADDING,
        }
    }

    /// Finds room for a `width` x `height` glyph on a page of `size`.
    ///
    /// The glyph must satisfy [`AtlasSize::fits_glyph`]. Returns the top-left corner, or
    /// `None` when the page is full.
    pub(crate) fn allocate(&mut self, width: u32, height: u32, size: AtlasSize) -> Option<(u32, u32)> {
        if self.x + width + GLYPH_PADDING > size.width {
            self.x = GLYPH_PADDING;
            self.y += self.row_height;
            self.row_height = GLYPH_PADDING;
            trace!("atlas row full, continuing at y={}", self.y);
        }
        if self.y + height + GLYPH_PADDING > size.height {
            return None;
        }
        let origin = (self.x, self.y);
        self.x += width + GLYPH_PADDING;
        self.row_height = self.row_height.max(height + GLYPH_PADDING);
        Some(origin)
    }
}
