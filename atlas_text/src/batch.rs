// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Submission of laid out text to a renderer.

use peniko::kurbo::{Affine, Point};

use crate::layout::DrawCommand;
use crate::vertex::{GlyphVertex, VertexFormat};

/// A renderer that accepts batches of textured quads.
pub trait BatchSubmitter<T> {
    /// Reserves room for `vertex_count` vertices drawn with `texture`.
    ///
    /// `vertex_count` is a multiple of four; every four vertices form one quad in the order
    /// documented on [`GlyphVertex`]. The returned slice is exactly `vertex_count` long and
    /// is filled by the caller.
    fn request_quads(
        &mut self,
        texture: &T,
        format: VertexFormat,
        vertex_count: usize,
    ) -> &mut [GlyphVertex];
}

/// Copies the vertices of every command into `batch`, transforming their positions.
///
/// Commands with no vertices are skipped.
pub fn submit_draw_commands<T, B: BatchSubmitter<T> + ?Sized>(
    batch: &mut B,
    transform: Affine,
    commands: &[DrawCommand<T>],
    vertices: &[GlyphVertex],
) {
    for command in commands {
        let Some(source) = vertices.get(command.range()) else {
            debug_assert!(false, "draw command out of bounds: {:?}", command.range());
            continue;
        };
        if source.is_empty() {
            continue;
        }
        let dest = batch.request_quads(&command.texture, GlyphVertex::FORMAT, source.len());
        for (dst, src) in dest.iter_mut().zip(source) {
            *dst = transform_vertex(transform, *src);
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "vertex positions are stored as f32"
)]
fn transform_vertex(transform: Affine, mut vertex: GlyphVertex) -> GlyphVertex {
    let p = transform * Point::new(f64::from(vertex.x), f64::from(vertex.y));
    vertex.x = p.x as f32;
    vertex.y = p.y as f32;
    vertex
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::AtlasId;
    use crate::testing::RecordingBatch;
    use alloc::vec;
    use alloc::vec::Vec;

    fn quad(x: f32, y: f32) -> [GlyphVertex; 4] {
        let v = |x, y| GlyphVertex {
            x,
            y,
            s: 1,
            t: 2,
            color: [9; 4],
        };
        [v(x, y), v(x, y + 1.0), v(x + 1.0, y), v(x + 1.0, y + 1.0)]
    }

    #[test]
    fn commands_are_copied_and_transformed() {
        let vertices: Vec<GlyphVertex> = [quad(0.0, 0.0), quad(10.0, 0.0), quad(20.0, 0.0)]
            .concat();
        let commands = vec![
            DrawCommand {
                start_vertex: 8,
                vertex_count: 4,
                atlas: AtlasId::new(1),
                texture: "b",
            },
            DrawCommand {
                start_vertex: 0,
                vertex_count: 8,
                atlas: AtlasId::new(0),
                texture: "a",
            },
        ];
        let mut batch = RecordingBatch::new();
        submit_draw_commands(
            &mut batch,
            Affine::translate((100.0, 50.0)),
            &commands,
            &vertices,
        );

        assert_eq!(batch.batches.len(), 2);
        assert_eq!(batch.batches[0].texture, "b");
        assert_eq!(batch.batches[0].vertices.len(), 4);
        assert_eq!(batch.batches[0].vertices[0].x, 120.0);
        assert_eq!(batch.batches[0].vertices[0].y, 50.0);
        assert_eq!(batch.batches[1].texture, "a");
        assert_eq!(batch.batches[1].vertices.len(), 8);
        assert_eq!(batch.batches[1].vertices[7].x, 111.0);
        assert_eq!(batch.batches[1].vertices[7].s, 1);
        assert_eq!(batch.batches[1].vertices[7].color, [9; 4]);
        assert_eq!(batch.batches[1].format, GlyphVertex::FORMAT);
    }

    #[test]
    fn nothing_is_submitted_for_empty_input() {
        let mut batch = RecordingBatch::<&str>::new();
        submit_draw_commands(&mut batch, Affine::IDENTITY, &[], &[]);
        assert!(batch.batches.is_empty());
    }
}
