// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking.

use alloc::vec::Vec;

use crate::Color;
use crate::decode::{ColoredCodepoints, IndexedColor};
use crate::error::Error;

const NEWLINE: u32 = '\n' as u32;
const CARRIAGE_RETURN: u32 = '\r' as u32;
const SPACE: u32 = ' ' as u32;

/// Horizontal metrics used while breaking lines.
///
/// Implemented by [`Font`](crate::Font); looking up an advance may rasterize the glyph.
pub trait Advances {
    /// The advance of `codepoint` in layout units.
    fn advance(&mut self, codepoint: u32) -> Result<f32, Error>;

    /// The kerning between two codepoints in layout units.
    ///
    /// `left` is `0` at the start of a line.
    fn kerning(&mut self, left: u32, right: u32) -> f32;
}

/// The result of [`wrap_lines`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WrappedLines {
    /// The codepoints of every line, with the color changes that apply to them.
    pub lines: Vec<ColoredCodepoints>,
    /// The width of every line, not counting trailing spaces.
    pub widths: Vec<f32>,
}

impl WrappedLines {
    /// The number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether there are no lines.
    ///
    /// [`wrap_lines`] always produces at least one line.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterates over lines and their widths.
    pub fn iter(&self) -> impl Iterator<Item = (&ColoredCodepoints, f32)> + '_ {
        self.lines.iter().zip(self.widths.iter().copied())
    }
}

/// Breaks `text` into lines no wider than `wrap_limit`.
///
/// Lines break at newlines and, when a character would overflow the limit, after the last
/// space of the line. A line without spaces breaks right before the overflowing character,
/// and a character that is wider than the limit on its own gets a line of its own, without
/// any spaces that led up to it. Spaces never cause a break, and an exact fit stays on the
/// line.
///
/// Color changes are carried over to the lines they apply to: a line that continues a
/// colored run starts with a color change at index 0.
///
/// The last line is always emitted, so empty text yields one empty line.
pub fn wrap_lines<A: Advances + ?Sized>(
    metrics: &mut A,
    text: &ColoredCodepoints,
    wrap_limit: f32,
) -> Result<WrappedLines, Error> {
    text.debug_assert_sorted();
    let mut breaker = LineBreaker::new(text);
    let codepoints = &text.codepoints;

    let mut i = 0;
    while let Some(&c) = codepoints.get(i) {
        // Colors apply even when the character itself is skipped.
        breaker.update_color(i);

        if c == NEWLINE {
            breaker.finish_line(breaker.width - breaker.trailing_space_width);
            i += 1;
            continue;
        }
        if c == CARRIAGE_RETURN {
            i += 1;
            continue;
        }

        let char_width = metrics.advance(c)? + metrics.kerning(breaker.prev, c);
        let new_width = breaker.width + char_width;

        if c != SPACE && new_width > wrap_limit {
            if breaker.is_blank() {
                // Too wide even on its own: keep it and let whatever follows end the line.
                // Leading spaces go, as they would at a rewind.
                breaker.clear_line();
                breaker.width = metrics.advance(c)? + metrics.kerning(0, c);
                breaker.push(c);
                i += 1;
                continue;
            }
            if let Some(space) = breaker.last_space {
                breaker.rewind_to(space);
                i = space + 1;
                if breaker.line.is_empty() {
                    // Only leading spaces were left; retry the word on this line.
                    breaker.clear_line();
                    continue;
                }
            }
            breaker.finish_line(breaker.width);
            continue;
        }

        if breaker.prev != SPACE && c == SPACE {
            breaker.width_before_last_space = breaker.width;
        }
        breaker.width = new_width;
        breaker.push(c);

        if c == SPACE {
            breaker.last_space = Some(i);
            breaker.trailing_space_width += char_width;
        } else {
            breaker.trailing_space_width = 0.0;
        }
        i += 1;
    }

    breaker.finish_line(breaker.width - breaker.trailing_space_width);
    Ok(breaker.out)
}

struct LineBreaker<'a> {
    text: &'a ColoredCodepoints,
    out: WrappedLines,

    line: ColoredCodepoints,
    width: f32,
    width_before_last_space: f32,
    trailing_space_width: f32,
    prev: u32,
    /// Index into the source text of the last space on the current line.
    last_space: Option<usize>,

    /// Index into `text.colors` of the active color.
    color_index: Option<usize>,
    /// Whether the active color must be recorded before the next codepoint of the line.
    color_pending: bool,
}

impl<'a> LineBreaker<'a> {
    fn new(text: &'a ColoredCodepoints) -> Self {
        Self {
            text,
            out: WrappedLines::default(),
            line: ColoredCodepoints::new(),
            width: 0.0,
            width_before_last_space: 0.0,
            trailing_space_width: 0.0,
            prev: 0,
            last_space: None,
            color_index: None,
            color_pending: false,
        }
    }

    fn active_color(&self) -> Option<Color> {
        self.color_index.map(|k| self.text.colors[k].color)
    }

    fn update_color(&mut self, index: usize) {
        let next = self.color_index.map_or(0, |k| k + 1);
        if self
            .text
            .colors
            .get(next)
            .is_some_and(|entry| entry.index == index)
        {
            self.color_index = Some(next);
            self.color_pending = true;
        }
    }

    fn push(&mut self, c: u32) {
        if self.color_pending {
            if let Some(color) = self.active_color() {
                self.line.colors.push(IndexedColor {
                    color,
                    index: self.line.codepoints.len(),
                });
            }
            self.color_pending = false;
        }
        self.line.codepoints.push(c);
        self.prev = c;
    }

    /// Drops everything after the last space of the line, and the spaces before it.
    fn rewind_to(&mut self, space: usize) {
        let cps = &mut self.line.codepoints;
        while cps.last().is_some_and(|&c| c != SPACE) {
            cps.pop();
        }
        while cps.last() == Some(&SPACE) {
            cps.pop();
        }
        let len = cps.len();
        while self.line.colors.last().is_some_and(|c| c.index >= len) {
            self.line.colors.pop();
        }

        // Continue with the color that was active at the space.
        self.color_index = self.text.colors[..self.color_index.map_or(0, |k| k + 1)]
            .iter()
            .rposition(|entry| entry.index <= space);
        self.width = self.width_before_last_space;
    }

    /// Whether the line has nothing but spaces.
    fn is_blank(&self) -> bool {
        self.line.codepoints.iter().all(|&c| c == SPACE)
    }

    /// Drops the current line without emitting it.
    fn clear_line(&mut self) {
        self.line = ColoredCodepoints::new();
        self.reset();
    }

    fn finish_line(&mut self, width: f32) {
        let line = core::mem::take(&mut self.line);
        line.debug_assert_sorted();
        self.out.lines.push(line);
        self.out.widths.push(width);
        self.reset();
    }

    fn reset(&mut self) {
        self.color_pending = self.color_index.is_some();
        self.width = 0.0;
        self.width_before_last_space = 0.0;
        self.trailing_space_width = 0.0;
        self.prev = 0;
        self.last_space = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::ColoredText;
    use alloc::string::String;
    use alloc::vec;
    use peniko::color::palette::css::{BLUE, RED};

    /// Every character is `advance` wide, with optional overrides and kerning pairs.
    struct FixedAdvances {
        advance: f32,
        wide: Vec<(char, f32)>,
        kerning: Vec<((char, char), f32)>,
    }

    impl FixedAdvances {
        fn new(advance: f32) -> Self {
            Self {
                advance,
                wide: Vec::new(),
                kerning: Vec::new(),
            }
        }

        fn with_advance(mut self, c: char, advance: f32) -> Self {
            self.wide.push((c, advance));
            self
        }

        fn with_kerning(mut self, left: char, right: char, kerning: f32) -> Self {
            self.kerning.push(((left, right), kerning));
            self
        }
    }

    impl Advances for FixedAdvances {
        fn advance(&mut self, codepoint: u32) -> Result<f32, Error> {
            let advance = self
                .wide
                .iter()
                .find(|(c, _)| u32::from(*c) == codepoint)
                .map_or(self.advance, |(_, a)| *a);
            Ok(advance)
        }

        fn kerning(&mut self, left: u32, right: u32) -> f32 {
            self.kerning
                .iter()
                .find(|((l, r), _)| u32::from(*l) == left && u32::from(*r) == right)
                .map_or(0.0, |(_, k)| *k)
        }
    }

    fn wrap(metrics: &mut FixedAdvances, text: &str, limit: f32) -> (Vec<String>, Vec<f32>) {
        let text = ColoredCodepoints::from_text(text).unwrap();
        let wrapped = wrap_lines(metrics, &text, limit).unwrap();
        let lines = wrapped.lines.iter().map(|l| l.to_text()).collect();
        (lines, wrapped.widths)
    }

    #[test]
    fn short_text_is_one_line() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "hello world", 100.0);
        assert_eq!(lines, ["hello world"]);
        assert_eq!(widths, [88.0]);
    }

    #[test]
    fn breaks_after_last_space() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "one two three", 60.0);
        assert_eq!(lines, ["one two", "three"]);
        assert_eq!(widths, [56.0, 40.0]);
    }

    #[test]
    fn space_runs_are_dropped_at_breaks() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "ab   cd", 32.0);
        assert_eq!(lines, ["ab", "cd"]);
        assert_eq!(widths, [16.0, 16.0]);
    }

    #[test]
    fn newlines_split_and_keep_trailing_spaces() {
        let mut metrics = FixedAdvances::new(8.0).with_kerning('B', 'B', -1.0);
        let (lines, widths) = wrap(&mut metrics, "A\nBB  \nC", 100.0);
        assert_eq!(lines, ["A", "BB  ", "C"]);
        assert_eq!(widths, [8.0, 15.0, 8.0]);
    }

    #[test]
    fn exact_fit_stays_on_the_line() {
        let (lines, _) = wrap(&mut FixedAdvances::new(8.0), "abcd", 32.0);
        assert_eq!(lines, ["abcd"]);
        let (lines, _) = wrap(&mut FixedAdvances::new(8.0), "abcd", 31.0);
        assert_eq!(lines, ["abc", "d"]);
    }

    #[test]
    fn words_without_spaces_break_anywhere() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "abcdefgh", 30.0);
        assert_eq!(lines, ["abc", "def", "gh"]);
        assert_eq!(widths, [24.0, 24.0, 16.0]);
    }

    #[test]
    fn overwide_character_gets_its_own_line() {
        let mut metrics = FixedAdvances::new(8.0).with_advance('W', 100.0);
        let (lines, widths) = wrap(&mut metrics, "W", 50.0);
        assert_eq!(lines, ["W"]);
        assert_eq!(widths, [100.0]);

        let (lines, widths) = wrap(&mut metrics, "aWb", 50.0);
        assert_eq!(lines, ["a", "W", "b"]);
        assert_eq!(widths, [8.0, 100.0, 8.0]);

        let (lines, widths) = wrap(&mut metrics, "xx W yy", 50.0);
        assert_eq!(lines, ["xx", "W", "yy"]);
        assert_eq!(widths, [16.0, 100.0, 16.0]);
    }

    #[test]
    fn overwide_character_before_newline_adds_no_blank_line() {
        let mut metrics = FixedAdvances::new(8.0).with_advance('W', 100.0);
        let (lines, widths) = wrap(&mut metrics, "W\nab", 50.0);
        assert_eq!(lines, ["W", "ab"]);
        assert_eq!(widths, [100.0, 16.0]);

        let (lines, widths) = wrap(&mut metrics, "W  \nab", 50.0);
        assert_eq!(lines, ["W  ", "ab"]);
        assert_eq!(widths, [100.0, 16.0]);
    }

    #[test]
    fn leading_spaces_before_overwide_character_are_dropped() {
        let mut metrics = FixedAdvances::new(8.0).with_advance('W', 100.0);
        let (lines, widths) = wrap(&mut metrics, "  W", 50.0);
        assert_eq!(lines, ["W"]);
        assert_eq!(widths, [100.0]);

        let (lines, _) = wrap(&mut metrics, "a\n   W b", 50.0);
        assert_eq!(lines, ["a", "W", "b"]);
    }

    #[test]
    fn leading_spaces_before_overflowing_word_are_dropped() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "  abc", 24.0);
        assert_eq!(lines, ["abc"]);
        assert_eq!(widths, [24.0]);

        let (lines, _) = wrap(&mut FixedAdvances::new(8.0), "  ab", 32.0);
        assert_eq!(lines, ["  ab"]);
    }

    #[test]
    fn limit_narrower_than_any_glyph_puts_one_glyph_per_line() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "ab  cd", 4.0);
        assert_eq!(lines, ["a", "b", "c", "d"]);
        assert_eq!(widths, [8.0; 4]);
    }

    #[test]
    fn carriage_returns_are_ignored() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "ab\r\ncd", 100.0);
        assert_eq!(lines, ["ab", "cd"]);
        assert_eq!(widths, [16.0, 16.0]);
    }

    #[test]
    fn empty_text_is_one_empty_line() {
        let (lines, widths) = wrap(&mut FixedAdvances::new(8.0), "", 100.0);
        assert_eq!(lines, [""]);
        assert_eq!(widths, [0.0]);

        let (lines, _) = wrap(&mut FixedAdvances::new(8.0), "a\n", 100.0);
        assert_eq!(lines, ["a", ""]);
    }

    #[test]
    fn colors_follow_rewound_words() {
        let text =
            ColoredCodepoints::from_spans(&[ColoredText::new(RED, "ab c"), ColoredText::new(BLUE, "d")])
                .unwrap();
        let wrapped = wrap_lines(&mut FixedAdvances::new(8.0), &text, 28.0).unwrap();
        assert_eq!(wrapped.len(), 2);
        assert_eq!(wrapped.lines[0].to_text(), "ab");
        assert_eq!(
            wrapped.lines[0].colors.as_slice(),
            [IndexedColor {
                color: RED,
                index: 0
            }]
        );
        assert_eq!(wrapped.lines[1].to_text(), "cd");
        assert_eq!(
            wrapped.lines[1].colors.as_slice(),
            [
                IndexedColor {
                    color: RED,
                    index: 0
                },
                IndexedColor {
                    color: BLUE,
                    index: 1
                }
            ]
        );
    }

    #[test]
    fn color_starting_after_the_break_is_kept() {
        let text =
            ColoredCodepoints::from_spans(&[ColoredText::new(RED, "ab "), ColoredText::new(BLUE, "cd")])
                .unwrap();
        let wrapped = wrap_lines(&mut FixedAdvances::new(8.0), &text, 24.0).unwrap();
        let colors: Vec<_> = wrapped.lines.iter().map(|l| l.colors.to_vec()).collect();
        assert_eq!(
            colors,
            [
                vec![IndexedColor {
                    color: RED,
                    index: 0
                }],
                vec![IndexedColor {
                    color: BLUE,
                    index: 0
                }],
            ]
        );
    }

    #[test]
    fn colors_need_a_codepoint_to_be_recorded() {
        let text = ColoredCodepoints::from_spans(&[ColoredText::new(RED, "a\n")]).unwrap();
        let wrapped = wrap_lines(&mut FixedAdvances::new(8.0), &text, 100.0).unwrap();
        assert_eq!(wrapped.lines[0].colors.len(), 1);
        assert!(wrapped.lines[1].colors.is_empty());
    }

    #[test]
    fn uncolored_prefix_stays_uncolored_on_later_lines() {
        let text = ColoredCodepoints::from_text("ab\ncd").unwrap();
        let wrapped = wrap_lines(&mut FixedAdvances::new(8.0), &text, 100.0).unwrap();
        assert!(wrapped.lines.iter().all(|l| l.colors.is_empty()));
    }
}
