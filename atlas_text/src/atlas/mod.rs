// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph atlas cache.
//!
//! Glyphs are rasterized once and packed into GPU textures with a simple row packer:
//! - Glyphs are placed left to right, starting a new row when the current one is full
//! - Nothing is ever evicted; a full atlas either grows or gets a sibling page
//! - Growing replaces the atlas and bumps the cache generation, invalidating every record

mod cache;
mod packer;

pub use cache::{AtlasId, AtlasPage, GlyphAtlas, GlyphRecord};
pub use packer::{AtlasSize, GLYPH_PADDING, INITIAL_ATLAS_SIZE, MAX_ATLAS_HEIGHT, MAX_ATLAS_WIDTH};
