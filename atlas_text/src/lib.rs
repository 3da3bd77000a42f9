// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atlas Text renders dynamically sized text without re-rasterizing glyphs every frame.
//!
//! Glyphs are rasterized on demand by a [`GlyphSource`], packed into one or more GPU texture
//! atlases owned by a [`GlyphAtlas`], and laid out into quads by a [`Font`]. The output of a
//! layout is a [`TextLayout`]: a vertex buffer plus a list of [`DrawCommand`]s, each of which is
//! a contiguous range of vertices sharing one atlas texture.
//!
//! The GPU and the rasterizer are external collaborators, modelled by the [`GpuDevice`],
//! [`GpuTexture`], [`GlyphSource`] and [`BatchSubmitter`] traits.
//!
//! ## Features
//!
//! - `std` (enabled by default): Get floating point functions from the standard library
//!   (likely using your target's libc).
//! - `libm`: Use floating point implementations from [libm].
//! - `testing`: Expose the in-memory collaborators in [`testing`] for use in tests.
//!
//! At least one of `std` and `libm` is required; `std` overrides `libm`.
//!
//! [libm]: https://crates.io/crates/libm

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("atlas_text requires either the `std` or `libm` feature to be enabled");

// Suppress the unused_crate_dependencies lint when both std and libm are specified.
#[cfg(all(feature = "std", feature = "libm"))]
use core_maths as _;

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub use peniko;

mod atlas;
mod batch;
mod decode;
mod error;
mod font;
mod gpu;
mod impl_bytemuck;
mod kerning;
mod layout;
mod source;
mod util;
mod vertex;
mod wrap;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use atlas::{
    AtlasId, AtlasPage, AtlasSize, GLYPH_PADDING, GlyphAtlas, GlyphRecord, INITIAL_ATLAS_SIZE,
    MAX_ATLAS_HEIGHT, MAX_ATLAS_WIDTH,
};
pub use batch::{BatchSubmitter, submit_draw_commands};
pub use decode::{ColoredCodepoints, ColoredText, IndexedColor, decode_utf8};
pub use error::{Error, ErrorKind};
pub use font::{Font, FontConfig};
pub use gpu::{FilterMode, GpuDevice, GpuTexture, SamplerState};
pub use kerning::KerningCache;
pub use layout::{Alignment, DrawCommand, ParseAlignmentError, TextInfo, TextLayout};
pub use source::{DataType, GlyphBitmap, GlyphSource, PixelFormat, SPACES_PER_TAB};
pub use vertex::{GlyphVertex, VertexFormat};
pub use wrap::{Advances, WrappedLines, wrap_lines};

/// The color type used for text spans and base draw colors.
pub type Color = peniko::color::AlphaColor<peniko::color::Srgb>;
