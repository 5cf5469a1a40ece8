// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reference source-pixel fetcher.
//!
//! One pixel at a time, dispatching on the fetch descriptor at run time.
//! Every fetch family is covered here, which is what makes the reference
//! backend total over the signature space: the optimized and dithered
//! variants of a family share the generic implementation.

use gesso_common::color::PremulRgba8;
use gesso_common::fetch::{
    ExtendMode, FetchData, GradientKind, PatternPlacement, PatternSource,
};
use gesso_common::pixel::read_premul;

/// Produces source pixels for one fill call.
pub(crate) struct Fetcher<'a, 'b> {
    data: &'a FetchData<'b>,
}

impl<'a, 'b> Fetcher<'a, 'b> {
    pub(crate) fn new(data: &'a FetchData<'b>) -> Self {
        Self { data }
    }

    /// The source pixel for destination coordinate `(x, y)`.
    pub(crate) fn fetch(&self, x: u32, y: u32) -> PremulRgba8 {
        match *self.data {
            FetchData::Solid(color) => color,
            FetchData::Pattern { ref src, extend, placement } => {
                fetch_pattern(src, extend, placement, x, y)
            }
            FetchData::Gradient { lut, extend, kind } => fetch_gradient(lut, extend, kind, x, y),
            FetchData::PixelPtr { pixels, x0 } => pixels[(x - x0) as usize],
        }
    }
}

/// The reference fetch routine usable as the first stage of a two-stage
/// pipeline.
pub(crate) fn fetch_span(data: &FetchData<'_>, x: u32, y: u32, out: &mut [PremulRgba8]) {
    let fetcher = Fetcher::new(data);
    for (i, px) in out.iter_mut().enumerate() {
        *px = fetcher.fetch(x + i as u32, y);
    }
}

fn fetch_pattern(
    src: &PatternSource<'_>,
    extend: ExtendMode,
    placement: PatternPlacement,
    x: u32,
    y: u32,
) -> PremulRgba8 {
    match placement {
        PatternPlacement::Aligned { tx, ty } => {
            pattern_pixel(src, extend, i64::from(x) - i64::from(tx), i64::from(y) - i64::from(ty))
        }
        PatternPlacement::Frac { tx, ty } => {
            let sx = (i64::from(x) << 8) - tx;
            let sy = (i64::from(y) << 8) - ty;
            pattern_bilinear(src, extend, sx, sy)
        }
        PatternPlacement::Affine { inv, bilinear } => {
            let [a, b, c, d, e, f] = inv;
            let u = a * f64::from(x) + c * f64::from(y) + e;
            let v = b * f64::from(x) + d * f64::from(y) + f;

            if bilinear {
                let sx = ((u - 0.5) * 256.0).floor() as i64;
                let sy = ((v - 0.5) * 256.0).floor() as i64;
                pattern_bilinear(src, extend, sx, sy)
            } else {
                pattern_pixel(src, extend, u.floor() as i64, v.floor() as i64)
            }
        }
    }
}

/// One pattern pixel at whole coordinates, extended into bounds.
fn pattern_pixel(src: &PatternSource<'_>, extend: ExtendMode, sx: i64, sy: i64) -> PremulRgba8 {
    let ix = extend_coord(sx, i64::from(src.width), extend);
    let iy = extend_coord(sy, i64::from(src.height), extend);
    let offset = iy as usize * src.stride + ix as usize * src.format.bytes_per_pixel();
    read_premul(src.format, &src.pixels[offset..])
}

/// Bilinear sample at a 24.8 sub-pixel position.
fn pattern_bilinear(src: &PatternSource<'_>, extend: ExtendMode, sx: i64, sy: i64) -> PremulRgba8 {
    let ix = sx >> 8;
    let iy = sy >> 8;
    let wx = (sx & 0xFF) as u32;
    let wy = (sy & 0xFF) as u32;

    if wx == 0 && wy == 0 {
        return pattern_pixel(src, extend, ix, iy);
    }

    let p00 = pattern_pixel(src, extend, ix, iy);
    let p10 = pattern_pixel(src, extend, ix + 1, iy);
    let p01 = pattern_pixel(src, extend, ix, iy + 1);
    let p11 = pattern_pixel(src, extend, ix + 1, iy + 1);

    let wa = (256 - wx) * (256 - wy);
    let wb = wx * (256 - wy);
    let wc = (256 - wx) * wy;
    let wd = wx * wy;

    let blend = |c00: u8, c10: u8, c01: u8, c11: u8| -> u8 {
        let acc = u32::from(c00) * wa
            + u32::from(c10) * wb
            + u32::from(c01) * wc
            + u32::from(c11) * wd;
        ((acc + 0x8000) >> 16) as u8
    };

    PremulRgba8 {
        r: blend(p00.r, p10.r, p01.r, p11.r),
        g: blend(p00.g, p10.g, p01.g, p11.g),
        b: blend(p00.b, p10.b, p01.b, p11.b),
        a: blend(p00.a, p10.a, p01.a, p11.a),
    }
}

fn fetch_gradient(
    lut: &[PremulRgba8],
    extend: ExtendMode,
    kind: GradientKind,
    x: u32,
    y: u32,
) -> PremulRgba8 {
    debug_assert!(!lut.is_empty(), "gradient table must not be empty");

    let t = match kind {
        GradientKind::Linear { ox, dxx, dxy } => ox + f64::from(x) * dxx + f64::from(y) * dxy,
        GradientKind::Radial { inv, cx, cy, scale } => {
            let [a, b, c, d, e, f] = inv;
            let u = a * f64::from(x) + c * f64::from(y) + e;
            let v = b * f64::from(x) + d * f64::from(y) + f;
            (u - cx).hypot(v - cy) * scale
        }
        GradientKind::Conic { inv, cx, cy, offset } => {
            let [a, b, c, d, e, f] = inv;
            let u = a * f64::from(x) + c * f64::from(y) + e;
            let v = b * f64::from(x) + d * f64::from(y) + f;
            let turns = (v - cy).atan2(u - cx) / core::f64::consts::TAU + offset;
            (turns - turns.floor()) * lut.len() as f64
        }
    };

    lut[extend_index(t, lut.len(), extend)]
}

/// Clamp, tile or mirror a whole coordinate into `0..size`.
fn extend_coord(v: i64, size: i64, mode: ExtendMode) -> i64 {
    match mode {
        ExtendMode::Pad => v.clamp(0, size - 1),
        ExtendMode::Repeat => v.rem_euclid(size),
        ExtendMode::Reflect => {
            let p = v.rem_euclid(2 * size);
            if p < size { p } else { 2 * size - 1 - p }
        }
    }
}

/// Clamp, tile or mirror a table position into `0..len`.
fn extend_index(t: f64, len: usize, mode: ExtendMode) -> usize {
    let n = len as f64;
    let idx = match mode {
        ExtendMode::Pad => t.clamp(0.0, n - 1.0),
        ExtendMode::Repeat => t.rem_euclid(n),
        ExtendMode::Reflect => {
            let p = t.rem_euclid(2.0 * n);
            if p < n { p } else { 2.0 * n - p }
        }
    };
    (idx as usize).min(len - 1)
}
