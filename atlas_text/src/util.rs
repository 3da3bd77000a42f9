// Copyright 2026 the Atlas Text Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Misc helpers.

#[cfg(not(feature = "std"))]
#[allow(unused_imports, reason = "only needed when floats come from libm")]
use core_maths::CoreFloat;

/// Rounds to the nearest whole pixel, with halves rounding up.
#[inline]
pub(crate) fn round_px(x: f32) -> f32 {
    (x + 0.5).floor()
}

#[inline]
pub(crate) fn floor(x: f32) -> f32 {
    x.floor()
}

/// Maps `n` in `0..=1` to the full `u16` range, truncating.
#[expect(
    clippy::cast_possible_truncation,
    reason = "normalized coordinates are in 0..=1 for glyphs placed inside the atlas"
)]
#[inline]
pub(crate) fn norm_to_u16(n: f64) -> u16 {
    (n * f64::from(u16::MAX)) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn halves_round_up() {
        assert_eq!(round_px(2.5), 3.0);
        assert_eq!(round_px(2.49), 2.0);
        assert_eq!(round_px(-2.5), -2.0);
    }

    #[test]
    fn normalized_coordinates_cover_u16() {
        assert_eq!(norm_to_u16(0.0), 0);
        assert_eq!(norm_to_u16(1.0), u16::MAX);
        assert_eq!(norm_to_u16(0.5), 32767);
    }
}
