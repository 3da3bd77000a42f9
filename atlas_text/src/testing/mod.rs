// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory collaborators for tests.
//!
//! These stand in for a real rasterizer, GPU device and renderer, and record everything that
//! is sent to them so tests can inspect it.

mod batch;
mod device;
mod source;

pub use batch::{RecordedBatch, RecordingBatch};
pub use device::{MemoryDevice, MemoryTexture, UploadRect};
pub use source::{BoxGlyphSource, GLYPH_LUMINANCE, GlyphBox};
