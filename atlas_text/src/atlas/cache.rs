// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph records and the atlas pages that back them.

use alloc::borrow::Cow;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt::{Debug, Formatter};
use foldhash::fast::FixedState;
use hashbrown::HashMap;
use log::{debug, warn};

use super::packer::{AtlasSize, RowPacker};
use crate::error::Error;
use crate::gpu::{GpuDevice, GpuTexture, SamplerState};
use crate::source::{DataType, GlyphBitmap, PixelFormat, SourceChain};
use crate::util::{norm_to_u16, round_px};
use crate::vertex::GlyphVertex;

/// How far quads are extruded past the glyph bitmap, in pixels.
///
/// The transparent padding around each glyph turns the extrusion into antialiased edges.
const QUAD_EXTRUSION: f32 = 1.0;

/// Identifies an atlas page within one [`GlyphAtlas`].
///
/// Ids are never reused, so a page created later always has a larger id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AtlasId(u32);

impl AtlasId {
    pub(crate) const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw id.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Cached placement and metrics for one codepoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphRecord {
    /// Horizontal pen advance in layout units, rounded to whole pixels.
    pub advance: f32,
    /// The glyph quad relative to the pen position on the baseline.
    ///
    /// All zeros for glyphs without pixels.
    pub vertices: [GlyphVertex; 4],
    /// The page holding the glyph bitmap, `None` for glyphs without pixels.
    pub atlas: Option<AtlasId>,
}

impl GlyphRecord {
    fn advance_only(advance: f32) -> Self {
        Self {
            advance,
            vertices: [GlyphVertex::default(); 4],
            atlas: None,
        }
    }
}

/// One texture of the atlas.
#[derive(Clone, Debug)]
pub struct AtlasPage<T> {
    id: AtlasId,
    size: AtlasSize,
    texture: T,
}

impl<T> AtlasPage<T> {
    /// The page id referenced by [`GlyphRecord::atlas`].
    pub fn id(&self) -> AtlasId {
        self.id
    }

    /// The page dimensions.
    pub fn size(&self) -> AtlasSize {
        self.size
    }

    /// The backing texture.
    pub fn texture(&self) -> &T {
        &self.texture
    }
}

enum Placement {
    Placed(GlyphRecord),
    PageFull,
}

/// Packs glyph bitmaps into GPU textures and caches their quads.
///
/// Only the last page receives new glyphs. When it is full the atlas either grows, which
/// replaces every page with a single larger one and bumps the [generation](Self::generation),
/// or, once at its maximum size, starts a new page of the same size.
pub struct GlyphAtlas<D: GpuDevice> {
    device: D,
    format: PixelFormat,
    data_type: DataType,
    sampler: SamplerState,
    size: AtlasSize,
    max_size: AtlasSize,
    pages: Vec<AtlasPage<D::Texture>>,
    packer: RowPacker,
    glyphs: HashMap<u32, GlyphRecord, FixedState>,
    generation: u32,
    next_id: u32,
}

impl<D: GpuDevice> GlyphAtlas<D> {
    /// Creates an atlas sized for lines `line_height` pixels tall, with one empty page.
    ///
    /// `data_type` decides the color new pages are cleared to.
    pub fn new(
        device: D,
        format: PixelFormat,
        data_type: DataType,
        sampler: SamplerState,
        line_height: f32,
    ) -> Self {
        let max_size = AtlasSize::max_for_device(device.max_texture_size());
        let size = AtlasSize::initial(line_height, max_size);
        let mut atlas = Self {
            device,
            format,
            data_type,
            sampler,
            size,
            max_size,
            pages: Vec::new(),
            packer: RowPacker::new(),
            glyphs: HashMap::with_hasher(FixedState::default()),
            generation: 0,
            next_id: 0,
        };
        atlas.reload();
        atlas
    }

    /// Returns the record for `codepoint`, rasterizing and packing it on a miss.
    ///
    /// A miss may grow the atlas, in which case every cached glyph is packed again and the
    /// generation increases. Records returned before that refer to a page that no longer
    /// exists.
    pub(crate) fn get_or_create(
        &mut self,
        sources: &SourceChain,
        codepoint: u32,
    ) -> Result<GlyphRecord, Error> {
        if let Some(record) = self.glyphs.get(&codepoint) {
            return Ok(*record);
        }

        // Glyphs to re-pack before `codepoint`, popped from the back.
        let mut replay: Vec<u32> = Vec::new();
        loop {
            let next = replay.pop().unwrap_or(codepoint);
            let (bitmap, dpi) = sources.glyph_bitmap(next);
            match self.place(&bitmap, dpi)? {
                Placement::Placed(record) => {
                    self.glyphs.insert(next, record);
                    if next == codepoint {
                        return Ok(record);
                    }
                }
                Placement::PageFull => {
                    if next != codepoint {
                        replay.push(next);
                    }
                    if self.add_page() {
                        self.requeue_all(&mut replay, codepoint);
                    }
                }
            }
        }
    }

    /// Returns the cached record for `codepoint` without rasterizing.
    pub fn get(&self, codepoint: u32) -> Option<GlyphRecord> {
        self.glyphs.get(&codepoint).copied()
    }

    /// Drops every glyph and page, then starts over with one empty page at the current size.
    ///
    /// Used after the GPU resources were lost. Increments the generation.
    pub fn reload(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.glyphs.clear();
        self.pages.clear();
        self.create_page(self.size);
        debug!(
            "atlas reloaded at {}x{}, generation {}",
            self.size.width, self.size.height, self.generation
        );
    }

    /// Changes how pages are sampled, including existing ones.
    pub fn set_sampler(&mut self, sampler: SamplerState) {
        self.sampler = sampler;
        for page in &self.pages {
            page.texture.set_sampler(&sampler);
        }
    }

    /// The sampler applied to every page.
    pub fn sampler(&self) -> SamplerState {
        self.sampler
    }

    /// Counter that increases whenever previously returned records become invalid.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// The number of cached glyphs.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether no glyph is cached.
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// The number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All pages, oldest first. The last one receives new glyphs.
    pub fn pages(&self) -> &[AtlasPage<D::Texture>] {
        &self.pages
    }

    /// The texture of page `id`, if it still exists.
    pub fn texture(&self, id: AtlasId) -> Option<&D::Texture> {
        self.pages
            .iter()
            .find(|page| page.id == id)
            .map(|page| &page.texture)
    }

    /// The size of the active page.
    pub fn size(&self) -> AtlasSize {
        self.size
    }

    /// The largest size the atlas may grow to on this device.
    pub fn max_size(&self) -> AtlasSize {
        self.max_size
    }

    /// The pixel format of every page.
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The device pages are created on.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Tries to pack `bitmap` into the active page.
    fn place(&mut self, bitmap: &GlyphBitmap, dpi: f32) -> Result<Placement, Error> {
        let advance = round_px(bitmap.advance / dpi);
        if bitmap.is_empty() {
            return Ok(Placement::Placed(GlyphRecord::advance_only(advance)));
        }

        let (width, height) = (bitmap.width, bitmap.height);
        if !self.size.fits_glyph(width, height) {
            if self.size.next(self.max_size).is_larger_than(self.size) {
                return Ok(Placement::PageFull);
            }
            warn!(
                "{width}x{height} glyph does not fit a {}x{} atlas, drawing nothing",
                self.size.width, self.size.height
            );
            return Ok(Placement::Placed(GlyphRecord::advance_only(advance)));
        }

        let pixels = self.convert_pixels(bitmap)?;
        let Some((x, y)) = self.packer.allocate(width, height, self.size) else {
            return Ok(Placement::PageFull);
        };
        let Some(page) = self.pages.last() else {
            return Ok(Placement::PageFull);
        };
        page.texture.upload_region(x, y, width, height, &pixels);

        Ok(Placement::Placed(GlyphRecord {
            advance,
            vertices: self.quad(bitmap, dpi, x, y),
            atlas: Some(page.id),
        }))
    }

    /// Builds the quad for a glyph stored at `(x, y)` of the active page.
    fn quad(&self, bitmap: &GlyphBitmap, dpi: f32, x: u32, y: u32) -> [GlyphVertex; 4] {
        let o = QUAD_EXTRUSION;
        let (w, h) = (bitmap.width as f32, bitmap.height as f32);
        let (tx, ty) = (f64::from(x), f64::from(y));
        let (tw, th) = (f64::from(self.size.width), f64::from(self.size.height));
        let (tw_glyph, th_glyph) = (f64::from(bitmap.width), f64::from(bitmap.height));
        let o64 = f64::from(o);

        let left = norm_to_u16((tx - o64) / tw);
        let right = norm_to_u16((tx + tw_glyph + o64) / tw);
        let top = norm_to_u16((ty - o64) / th);
        let bottom = norm_to_u16((ty + th_glyph + o64) / th);

        let x0 = -o + bitmap.bearing_x / dpi;
        let x1 = (w + o) / dpi + bitmap.bearing_x / dpi;
        let y0 = -o - bitmap.bearing_y / dpi;
        let y1 = (h + o) / dpi - bitmap.bearing_y / dpi;
        let color = [255; 4];

        // 0---2
        // | / |
        // 1---3
        [
            GlyphVertex {
                x: x0,
                y: y0,
                s: left,
                t: top,
                color,
            },
            GlyphVertex {
                x: x0,
                y: y1,
                s: left,
                t: bottom,
                color,
            },
            GlyphVertex {
                x: x1,
                y: y0,
                s: right,
                t: top,
                color,
            },
            GlyphVertex {
                x: x1,
                y: y1,
                s: right,
                t: bottom,
                color,
            },
        ]
    }

    /// Returns the glyph pixels in the atlas format.
    fn convert_pixels<'a>(&self, bitmap: &'a GlyphBitmap) -> Result<Cow<'a, [u8]>, Error> {
        match (self.format, bitmap.format) {
            (atlas, glyph) if atlas == glyph => Ok(Cow::Borrowed(&bitmap.pixels)),
            (PixelFormat::Rgba8, PixelFormat::La8) => Ok(Cow::Owned(
                bitmap
                    .pixels
                    .chunks_exact(2)
                    .flat_map(|la| [la[0], la[0], la[0], la[1]])
                    .collect(),
            )),
            (atlas, glyph) => Err(Error::unsupported_format(atlas, glyph)),
        }
    }

    /// Starts a new active page after the current one filled up.
    ///
    /// Returns `true` when the atlas grew, which drops every page and glyph.
    fn add_page(&mut self) -> bool {
        let next = self.size.next(self.max_size);
        if next.is_larger_than(self.size) {
            debug!(
                "growing atlas from {}x{} to {}x{}",
                self.size.width, self.size.height, next.width, next.height
            );
            self.pages.clear();
            self.size = next;
            self.generation = self.generation.wrapping_add(1);
            self.create_page(next);
            true
        } else {
            self.create_page(self.size);
            false
        }
    }

    /// Moves every cached glyph into `replay`, so they are packed again in ascending codepoint
    /// order before `requested`.
    fn requeue_all(&mut self, replay: &mut Vec<u32>, requested: u32) {
        let mut codepoints: Vec<u32> = self
            .glyphs
            .drain()
            .map(|(codepoint, _)| codepoint)
            .chain(replay.drain(..))
            .filter(|&codepoint| codepoint != requested)
            .collect();
        codepoints.sort_unstable();
        codepoints.dedup();
        debug!("re-packing {} glyphs", codepoints.len());
        replay.extend(codepoints.into_iter().rev());
    }

    fn create_page(&mut self, size: AtlasSize) {
        let texture = self
            .device
            .create_texture(size.width, size.height, self.format);
        texture.set_sampler(&self.sampler);
        texture.upload_region(0, 0, size.width, size.height, &self.clear_pixels(size));

        let id = AtlasId::new(self.next_id);
        self.next_id += 1;
        debug!(
            "created {:?} atlas page {} ({}x{})",
            self.format, id.0, size.width, size.height
        );
        self.pages.push(AtlasPage { id, size, texture });
        self.packer = RowPacker::new();
    }

    /// Pixels for an empty page.
    ///
    /// Outline glyphs keep luminance constant and vary alpha, so their pages start out as
    /// transparent white. Everything else starts transparent black.
    fn clear_pixels(&self, size: AtlasSize) -> Vec<u8> {
        let len = self.format.slice_size(size.width, size.height);
        match (self.data_type, self.format) {
            (DataType::Outline, PixelFormat::La8) => [255_u8, 0].repeat(len / 2),
            (DataType::Outline, PixelFormat::Rgba8) => [255_u8, 255, 255, 0].repeat(len / 4),
            _ => vec![0; len],
        }
    }
}

impl<D: GpuDevice> Debug for GlyphAtlas<D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GlyphAtlas")
            .field("format", &self.format)
            .field("size", &self.size)
            .field("pages", &self.pages.len())
            .field("glyphs", &self.glyphs.len())
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}
