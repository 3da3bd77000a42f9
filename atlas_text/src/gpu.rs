// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The GPU collaborator: texture creation, pixel uploads and sampling state.

use crate::source::PixelFormat;

/// Texture filtering mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMode {
    /// Bilinear filtering.
    #[default]
    Linear,
    /// Nearest-neighbour sampling.
    Nearest,
}

/// How atlas textures are sampled when drawing glyph quads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SamplerState {
    /// Filter used when the glyph is drawn smaller than its bitmap.
    pub min_filter: FilterMode,
    /// Filter used when the glyph is drawn larger than its bitmap.
    pub mag_filter: FilterMode,
    /// Maximum anisotropy, `1` disables anisotropic filtering.
    pub max_anisotropy: u8,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            max_anisotropy: 1,
        }
    }
}

/// A device that can create atlas textures.
///
/// Implementations are usually a cheap handle to the real graphics device.
pub trait GpuDevice {
    /// The texture handle type.
    ///
    /// Handles are cloned into draw commands, so cloning should be cheap and every clone must
    /// refer to the same texture.
    type Texture: GpuTexture + Clone;

    /// Creates an uninitialized `width` x `height` texture.
    fn create_texture(&self, width: u32, height: u32, format: PixelFormat) -> Self::Texture;

    /// The largest supported texture dimension.
    fn max_texture_size(&self) -> u32;

    /// Whether textures of `format` can be sampled.
    fn supports_format(&self, format: PixelFormat) -> bool {
        let _ = format;
        true
    }
}

/// A texture that can receive pixel uploads.
pub trait GpuTexture {
    /// Replaces the pixels of a region.
    ///
    /// `pixels` holds `width * height` pixels in the texture's format, rows top to bottom.
    fn upload_region(&self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]);

    /// Applies sampling parameters.
    fn set_sampler(&self, sampler: &SamplerState);
}
