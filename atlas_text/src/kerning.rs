// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Kerning cache.

use foldhash::fast::FixedState;
use hashbrown::HashMap;

use crate::source::SourceChain;
use crate::util::round_px;

/// Caches rounded kerning values for glyph pairs.
///
/// Entries are never invalidated: neither atlas growth nor changes to the fallback list
/// affect kerning already computed.
#[derive(Clone, Debug, Default)]
pub struct KerningCache {
    pairs: HashMap<u64, f32, FixedState>,
}

impl KerningCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// The kerning between `left` and `right` in layout units, rounded to whole pixels.
    ///
    /// The first source that has both glyphs decides. When no source has both, the primary
    /// source's value is used.
    pub(crate) fn kerning(&mut self, sources: &SourceChain, left: u32, right: u32) -> f32 {
        *self
            .pairs
            .entry(pair_key(left, right))
            .or_insert_with(|| lookup(sources, left, right))
    }

    /// The number of cached pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no pair is cached.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn pair_key(left: u32, right: u32) -> u64 {
    (u64::from(left) << 32) | u64::from(right)
}

fn lookup(sources: &SourceChain, left: u32, right: u32) -> f32 {
    let source = sources
        .iter()
        .find(|s| s.has_glyph(left) && s.has_glyph(right))
        .unwrap_or_else(|| sources.primary());
    round_px(source.kerning(left, right) / source.dpi_scale())
}
