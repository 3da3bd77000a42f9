// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec;
use alloc::vec::Vec;

use crate::batch::BatchSubmitter;
use crate::vertex::{GlyphVertex, VertexFormat};

/// One call to [`BatchSubmitter::request_quads`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedBatch<T> {
    /// The texture the quads are drawn with.
    pub texture: T,
    /// The vertex layout.
    pub format: VertexFormat,
    /// The vertices written by the caller.
    pub vertices: Vec<GlyphVertex>,
}

/// A renderer that records every batch.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordingBatch<T> {
    /// Batches in submission order.
    pub batches: Vec<RecordedBatch<T>>,
}

impl<T> RecordingBatch<T> {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
        }
    }

    /// The total number of recorded vertices.
    pub fn vertex_count(&self) -> usize {
        self.batches.iter().map(|b| b.vertices.len()).sum()
    }
}

impl<T> Default for RecordingBatch<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> BatchSubmitter<T> for RecordingBatch<T> {
    fn request_quads(
        &mut self,
        texture: &T,
        format: VertexFormat,
        vertex_count: usize,
    ) -> &mut [GlyphVertex] {
        self.batches.push(RecordedBatch {
            texture: texture.clone(),
            format,
            vertices: vec![GlyphVertex::default(); vertex_count],
        });
        let last = self.batches.len() - 1;
        &mut self.batches[last].vertices
    }
}
