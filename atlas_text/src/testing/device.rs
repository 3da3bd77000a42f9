// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::rc::Rc;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt::{Debug, Formatter};

use crate::gpu::{GpuDevice, GpuTexture, SamplerState};
use crate::source::PixelFormat;

/// A region passed to [`GpuTexture::upload_region`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UploadRect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A device that keeps textures in memory.
///
/// Clones share the same list of created textures.
#[derive(Clone)]
pub struct MemoryDevice {
    max_texture_size: u32,
    unsupported: Vec<PixelFormat>,
    textures: Rc<RefCell<Vec<MemoryTexture>>>,
}

impl MemoryDevice {
    /// Creates a device whose textures can be at most `max_texture_size` pixels wide and tall.
    pub fn new(max_texture_size: u32) -> Self {
        Self {
            max_texture_size,
            unsupported: Vec::new(),
            textures: Rc::default(),
        }
    }

    /// Makes the device reject textures of `format`.
    pub fn without_format(mut self, format: PixelFormat) -> Self {
        self.unsupported.push(format);
        self
    }

    /// Every texture created so far, oldest first.
    pub fn textures(&self) -> Vec<MemoryTexture> {
        self.textures.borrow().clone()
    }
}

impl Debug for MemoryDevice {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryDevice")
            .field("max_texture_size", &self.max_texture_size)
            .field("unsupported", &self.unsupported)
            .field("textures", &self.textures.borrow().len())
            .finish()
    }
}

impl GpuDevice for MemoryDevice {
    type Texture = MemoryTexture;

    fn create_texture(&self, width: u32, height: u32, format: PixelFormat) -> MemoryTexture {
        assert!(
            width <= self.max_texture_size && height <= self.max_texture_size,
            "{width}x{height} texture exceeds the device limit"
        );
        let mut textures = self.textures.borrow_mut();
        let texture = MemoryTexture(Rc::new(TextureData {
            index: textures.len(),
            width,
            height,
            format,
            pixels: RefCell::new(vec![0; format.slice_size(width, height)]),
            uploads: RefCell::default(),
            sampler: Cell::new(None),
        }));
        textures.push(texture.clone());
        texture
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn supports_format(&self, format: PixelFormat) -> bool {
        !self.unsupported.contains(&format)
    }
}

/// A texture stored in memory.
///
/// Clones refer to the same texture.
#[derive(Clone)]
pub struct MemoryTexture(Rc<TextureData>);

struct TextureData {
    index: usize,
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: RefCell<Vec<u8>>,
    uploads: RefCell<Vec<UploadRect>>,
    sampler: Cell<Option<SamplerState>>,
}

impl MemoryTexture {
    /// The position of this texture in [`MemoryDevice::textures`].
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.0.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.0.height
    }

    /// The pixel format.
    pub fn format(&self) -> PixelFormat {
        self.0.format
    }

    /// The bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Vec<u8> {
        let bpp = self.0.format.bytes_per_pixel();
        let start = (y as usize * self.0.width as usize + x as usize) * bpp;
        self.0.pixels.borrow()[start..start + bpp].to_vec()
    }

    /// Every region uploaded so far, oldest first.
    pub fn uploads(&self) -> Vec<UploadRect> {
        self.0.uploads.borrow().clone()
    }

    /// The last sampler applied, if any.
    pub fn sampler(&self) -> Option<SamplerState> {
        self.0.sampler.get()
    }
}

impl PartialEq for MemoryTexture {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for MemoryTexture {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryTexture")
            .field("index", &self.0.index)
            .field("width", &self.0.width)
            .field("height", &self.0.height)
            .field("format", &self.0.format)
            .finish_non_exhaustive()
    }
}

impl GpuTexture for MemoryTexture {
    fn upload_region(&self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) {
        let data = &self.0;
        assert!(
            x + width <= data.width && y + height <= data.height,
            "upload of {width}x{height} at ({x}, {y}) is out of bounds"
        );
        let bpp = data.format.bytes_per_pixel();
        assert_eq!(
            pixels.len(),
            data.format.slice_size(width, height),
            "upload size does not match the region"
        );

        let row_len = width as usize * bpp;
        let mut dst = data.pixels.borrow_mut();
        if row_len > 0 {
            for (row, src) in pixels.chunks_exact(row_len).enumerate() {
                let start = ((y as usize + row) * data.width as usize + x as usize) * bpp;
                dst[start..start + row_len].copy_from_slice(src);
            }
        }
        data.uploads.borrow_mut().push(UploadRect {
            x,
            y,
            width,
            height,
        });
    }

    fn set_sampler(&self, sampler: &SamplerState) {
        self.0.sampler.set(Some(*sampler));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_write_rows() {
        let device = MemoryDevice::new(64);
        let texture = device.create_texture(4, 4, PixelFormat::La8);
        texture.upload_region(1, 2, 2, 1, &[1, 2, 3, 4]);
        assert_eq!(texture.pixel(1, 2), [1, 2]);
        assert_eq!(texture.pixel(2, 2), [3, 4]);
        assert_eq!(texture.pixel(0, 2), [0, 0]);
        assert_eq!(
            texture.uploads(),
            [UploadRect {
                x: 1,
                y: 2,
                width: 2,
                height: 1
            }]
        );
        assert_eq!(device.textures(), [texture]);
    }

    #[test]
    fn format_support_is_configurable() {
        assert!(MemoryDevice::new(64).supports_format(PixelFormat::La8));
        let device = MemoryDevice::new(64).without_format(PixelFormat::La8);
        assert!(!device.supports_format(PixelFormat::La8));
        assert!(device.supports_format(PixelFormat::Rgba8));
        assert!(device.supports_format(PixelFormat::R8));
    }
}
