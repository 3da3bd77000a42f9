// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vertex generation.

use alloc::vec::Vec;

use super::{Alignment, DrawCommand, Run, TextInfo, TextLayout, push_run, sort_runs};
use crate::Color;
use crate::decode::ColoredCodepoints;
use crate::error::Error;
use crate::font::Font;
use crate::gpu::GpuDevice;
use crate::source::DataType;
use crate::util::{floor, round_px};
use crate::vertex::{GlyphVertex, composite, pack_color};
use crate::wrap::wrap_lines;

const NEWLINE: u32 = '\n' as u32;
const CARRIAGE_RETURN: u32 = '\r' as u32;
const SPACE: u32 = ' ' as u32;

/// Pen position of the first glyph.
#[derive(Copy, Clone, Debug, Default)]
struct Origin {
    x: f32,
    y: f32,
}

impl<D: GpuDevice> Font<D> {
    /// Lays out `text` starting at the origin, breaking lines only at newlines.
    pub(crate) fn generate(
        &mut self,
        text: &ColoredCodepoints,
        base_color: Color,
    ) -> Result<TextLayout<D::Texture>, Error> {
        let mut vertices = Vec::with_capacity(text.len() * 4);
        let (runs, info) =
            self.generate_runs(text, base_color, 0.0, Origin::default(), &mut vertices)?;
        Ok(self.resolve(runs, vertices, info))
    }

    /// Lays out `text` wrapped at `wrap` and aligned within it.
    pub(crate) fn generate_formatted(
        &mut self,
        text: &ColoredCodepoints,
        base_color: Color,
        wrap: f32,
        align: Alignment,
    ) -> Result<TextLayout<D::Texture>, Error> {
        let wrap = wrap.max(0.0);
        if text.is_empty() {
            return Ok(TextLayout {
                generation: self.cache_generation(),
                ..TextLayout::new()
            });
        }

        let mut vertices = Vec::with_capacity(text.len() * 4);
        loop {
            let generation = self.cache_generation();
            vertices.clear();
            let (runs, info) = self.formatted_pass(text, base_color, wrap, align, &mut vertices)?;
            // Lines laid out before the atlas changed refer to pages that are gone.
            if self.cache_generation() == generation {
                return Ok(self.resolve(runs, vertices, info));
            }
        }
    }

    fn formatted_pass(
        &mut self,
        text: &ColoredCodepoints,
        base_color: Color,
        wrap: f32,
        align: Alignment,
        vertices: &mut Vec<GlyphVertex>,
    ) -> Result<(Vec<Run>, TextInfo), Error> {
        let wrapped = wrap_lines(self, text, wrap)?;
        let line_height = self.height() * self.line_height();

        let mut runs = Vec::new();
        let mut y = 0.0;
        let mut max_width = 0.0_f32;
        for (line, width) in wrapped.iter() {
            max_width = max_width.max(width);
            let mut origin = Origin { x: 0.0, y: floor(y) };
            let mut extra_spacing = 0.0;
            match align {
                Alignment::Left => {}
                Alignment::Right => origin.x = floor(wrap - width),
                Alignment::Middle => origin.x = floor((wrap - width) / 2.0),
                Alignment::Justified => {
                    let spaces = line.codepoints.iter().filter(|&&c| c == SPACE).count();
                    if width < wrap && spaces >= 1 {
                        extra_spacing = (wrap - width) / spaces as f32;
                    }
                }
            }

            let (line_runs, _) =
                self.generate_runs(line, base_color, extra_spacing, origin, vertices)?;
            for run in line_runs {
                push_run(&mut runs, run);
            }
            y += line_height;
        }

        sort_runs(&mut runs);
        Ok((
            runs,
            TextInfo {
                width: max_width,
                height: y,
            },
        ))
    }

    /// Appends the quads of `text` to `vertices`.
    ///
    /// Starts over whenever fetching a glyph changes the cache generation, since quads
    /// emitted before that point refer to pages that no longer exist.
    fn generate_runs(
        &mut self,
        text: &ColoredCodepoints,
        base_color: Color,
        extra_spacing: f32,
        origin: Origin,
        vertices: &mut Vec<GlyphVertex>,
    ) -> Result<(Vec<Run>, TextInfo), Error> {
        let first_vertex = vertices.len();
        let baseline_offset = if self.data_type() == DataType::Outline {
            self.baseline()
        } else {
            0.0
        };
        let line_advance = round_px(self.height() * self.line_height());
        let base = pack_color(base_color);
        let gamma_correct = self.gamma_correct();

        'restart: loop {
            let generation = self.cache_generation();
            vertices.truncate(first_vertex);

            let mut runs: Vec<Run> = Vec::new();
            let (mut dx, mut dy) = (origin.x, origin.y);
            let mut max_width = 0.0_f32;
            let mut prev = 0;
            let mut color = base;
            let mut next_color = 0;

            for (i, &c) in text.codepoints.iter().enumerate() {
                if let Some(entry) = text.colors.get(next_color) {
                    if entry.index == i {
                        color = composite(entry.color, base_color, gamma_correct);
                        next_color += 1;
                    }
                }

                if c == NEWLINE {
                    max_width = max_width.max(dx);
                    dy += line_advance;
                    dx = origin.x;
                    prev = 0;
                    continue;
                }
                if c == CARRIAGE_RETURN {
                    continue;
                }

                let glyph = self.glyph(c)?;
                if self.cache_generation() != generation {
                    continue 'restart;
                }

                dx += self.kerning(prev, c);

                if let Some(atlas) = glyph.atlas {
                    let start = vertices.len();
                    vertices.extend(glyph.vertices.iter().map(|v| GlyphVertex {
                        x: v.x + dx,
                        y: v.y + dy + baseline_offset,
                        color,
                        ..*v
                    }));
                    match runs.last_mut() {
                        Some(last) if last.atlas == atlas => last.count += 4,
                        _ => runs.push(Run {
                            atlas,
                            start,
                            count: 4,
                        }),
                    }
                }

                dx += glyph.advance;
                if c == SPACE && extra_spacing != 0.0 {
                    dx = floor(dx + extra_spacing);
                }
                prev = c;
            }

            runs.sort_by_key(|run| (run.atlas, run.start));
            max_width = max_width.max(dx);
            let last_line = if dx > 0.0 { line_advance } else { 0.0 };
            return Ok((
                runs,
                TextInfo {
                    width: max_width - origin.x,
                    height: dy + last_line - origin.y,
                },
            ));
        }
    }

    /// Looks up the texture of every run.
    fn resolve(
        &self,
        runs: Vec<Run>,
        vertices: Vec<GlyphVertex>,
        info: TextInfo,
    ) -> TextLayout<D::Texture> {
        let atlas = self.atlas();
        let commands = runs
            .into_iter()
            .filter_map(|run| {
                let texture = atlas.texture(run.atlas);
                debug_assert!(texture.is_some(), "run refers to a dropped atlas page");
                Some(DrawCommand {
                    start_vertex: run.start,
                    vertex_count: run.count,
                    atlas: run.atlas,
                    texture: texture?.clone(),
                })
            })
            .collect();
        TextLayout {
            vertices,
            commands,
            info,
            generation: self.cache_generation(),
        }
    }
}
