// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Laid out text: vertices grouped into draw commands.

mod generate;

use alloc::vec::Vec;
use core::fmt;
use core::ops::Range;
use core::str::FromStr;

use crate::atlas::AtlasId;
use crate::font::Font;
use crate::gpu::GpuDevice;
use crate::vertex::GlyphVertex;

/// Horizontal alignment of wrapped lines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// Align lines to the left edge.
    #[default]
    Left,
    /// Center lines within the wrap width.
    Middle,
    /// Align lines to the right edge.
    Right,
    /// Spread the free space of each line evenly over its spaces.
    ///
    /// Lines without spaces, and lines as wide as the wrap width, are left aligned.
    Justified,
}

impl Alignment {
    /// The name accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Middle => "center",
            Self::Right => "right",
            Self::Justified => "justify",
        }
    }
}

impl FromStr for Alignment {
    type Err = ParseAlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Middle),
            "right" => Ok(Self::Right),
            "justify" => Ok(Self::Justified),
            _ => Err(ParseAlignmentError),
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown [`Alignment`] name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseAlignmentError;

impl fmt::Display for ParseAlignmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of \"left\", \"center\", \"right\" or \"justify\"")
    }
}

impl core::error::Error for ParseAlignmentError {}

/// The size of laid out text.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TextInfo {
    /// Width of the widest line.
    pub width: f32,
    /// Total height of all lines.
    pub height: f32,
}

/// A contiguous range of vertices drawn with one atlas texture.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand<T> {
    /// Index of the first vertex.
    pub start_vertex: usize,
    /// Number of vertices, a multiple of four.
    pub vertex_count: usize,
    /// The atlas page the texture belongs to.
    pub atlas: AtlasId,
    /// The atlas texture.
    pub texture: T,
}

impl<T> DrawCommand<T> {
    /// The vertex range covered by this command.
    pub fn range(&self) -> Range<usize> {
        self.start_vertex..self.start_vertex + self.vertex_count
    }
}

/// A vertex range on one atlas page, before the page texture is resolved.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub(crate) atlas: AtlasId,
    pub(crate) start: usize,
    pub(crate) count: usize,
}

impl Run {
    fn end(&self) -> usize {
        self.start + self.count
    }
}

/// Appends `run`, extending the last run instead when both use the same page and are
/// contiguous.
pub(crate) fn push_run(runs: &mut Vec<Run>, run: Run) {
    match runs.last_mut() {
        Some(last) if last.atlas == run.atlas && last.end() == run.start => last.count += run.count,
        _ => runs.push(run),
    }
}

/// Stably sorts runs by page, then coalesces neighbours.
pub(crate) fn sort_runs(runs: &mut Vec<Run>) {
    runs.sort_by_key(|run| (run.atlas, run.start));
    let sorted = core::mem::take(runs);
    for run in sorted {
        push_run(runs, run);
    }
}

/// Text laid out into glyph quads, ready to be drawn any number of times.
///
/// A layout refers to atlas pages by texture. When the font's atlas grows or is reloaded
/// those pages go away and the layout becomes [stale](Self::is_stale); lay the text out
/// again before drawing it.
#[derive(Clone, Debug, PartialEq)]
pub struct TextLayout<T> {
    pub(crate) vertices: Vec<GlyphVertex>,
    pub(crate) commands: Vec<DrawCommand<T>>,
    pub(crate) info: TextInfo,
    pub(crate) generation: u32,
}

impl<T> TextLayout<T> {
    /// Creates a layout with no vertices.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            commands: Vec::new(),
            info: TextInfo::default(),
            generation: 0,
        }
    }

    /// All glyph vertices, four per visible glyph.
    pub fn vertices(&self) -> &[GlyphVertex] {
        &self.vertices
    }

    /// Draw commands, sorted by atlas page and then by first vertex.
    pub fn commands(&self) -> &[DrawCommand<T>] {
        &self.commands
    }

    /// The size of the text.
    pub fn info(&self) -> TextInfo {
        self.info
    }

    /// The font cache generation this layout was built against.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether `font`'s atlas changed since this layout was built.
    pub fn is_stale<D: GpuDevice<Texture = T>>(&self, font: &Font<D>) -> bool {
        self.generation != font.cache_generation()
    }
}

impl<T> Default for TextLayout<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    fn run(atlas: u32, start: usize, count: usize) -> Run {
        Run {
            atlas: AtlasId::new(atlas),
            start,
            count,
        }
    }

    #[test]
    fn alignment_names_round_trip() {
        for align in [
            Alignment::Left,
            Alignment::Middle,
            Alignment::Right,
            Alignment::Justified,
        ] {
            assert_eq!(align.to_string().parse::<Alignment>(), Ok(align));
        }
        assert_eq!("centre".parse::<Alignment>(), Err(ParseAlignmentError));
        assert_eq!("Left".parse::<Alignment>(), Err(ParseAlignmentError));
    }

    #[test]
    fn contiguous_runs_merge() {
        let mut runs = Vec::new();
        push_run(&mut runs, run(0, 0, 4));
        push_run(&mut runs, run(0, 4, 8));
        push_run(&mut runs, run(1, 12, 4));
        push_run(&mut runs, run(1, 20, 4));
        assert_eq!(runs, [run(0, 0, 12), run(1, 12, 4), run(1, 20, 4)]);
    }

    #[test]
    fn sorting_groups_pages() {
        let mut runs = vec![run(1, 0, 4), run(0, 4, 4), run(1, 8, 4), run(0, 12, 4)];
        sort_runs(&mut runs);
        assert_eq!(runs, [run(0, 4, 4), run(0, 12, 4), run(1, 0, 4), run(1, 8, 4)]);

        let mut runs = vec![run(1, 4, 4), run(0, 0, 4), run(1, 8, 4)];
        sort_runs(&mut runs);
        assert_eq!(runs, [run(0, 0, 4), run(1, 4, 8)]);
    }
}
