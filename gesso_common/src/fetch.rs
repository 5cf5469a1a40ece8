// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source-fetch descriptors.
//!
//! A [`FetchData`] carries everything a pipeline needs to produce source
//! pixels: a solid color, a pattern image with its placement, or a gradient
//! lookup table with its geometry. The constructors also *classify* the
//! fetch into a [`FetchType`] — the signature field the dispatcher keys
//! specialization on — so callers cannot build a descriptor whose data and
//! signature disagree.

use crate::format::PixelFormat;
use crate::signature::FetchType;
use log::warn;
use peniko::color::PremulRgba8;
use peniko::kurbo::{Affine, Point};

/// How pixels outside a source's natural domain are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendMode {
    /// Clamp to the nearest edge value.
    Pad,
    /// Tile the source.
    Repeat,
    /// Tile the source, mirroring every other tile.
    Reflect,
}

impl From<peniko::Extend> for ExtendMode {
    fn from(value: peniko::Extend) -> Self {
        match value {
            peniko::Extend::Pad => Self::Pad,
            peniko::Extend::Repeat => Self::Repeat,
            peniko::Extend::Reflect => Self::Reflect,
        }
    }
}

/// Pattern sampling quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternQuality {
    /// Nearest-neighbor sampling.
    Nearest,
    /// Bilinear filtering.
    Bilinear,
}

/// Gradient rendering quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientQuality {
    /// Plain nearest-entry lookups.
    Nearest,
    /// Dithered lookups.
    Dither,
}

/// A borrowed pattern image.
#[derive(Debug, Clone, Copy)]
pub struct PatternSource<'a> {
    /// Raw pixel bytes.
    pub pixels: &'a [u8],
    /// Row stride in bytes.
    pub stride: usize,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Stored pixel format.
    pub format: PixelFormat,
}

/// Placement of a pattern relative to the destination.
#[derive(Debug, Clone, Copy)]
pub enum PatternPlacement {
    /// Whole-pixel translation by `(tx, ty)`.
    Aligned {
        /// Horizontal translation in pixels.
        tx: i32,
        /// Vertical translation in pixels.
        ty: i32,
    },
    /// Sub-pixel translation in 24.8 fixed point; sampled bilinearly with
    /// per-axis weights derived from the fractional parts.
    Frac {
        /// Horizontal translation in 24.8 fixed point.
        tx: i64,
        /// Vertical translation in 24.8 fixed point.
        ty: i64,
    },
    /// Full affine mapping from destination to source space.
    Affine {
        /// Inverse transform coefficients `[a, b, c, d, e, f]`, evaluated at
        /// pixel centers.
        inv: [f64; 6],
        /// Whether to sample bilinearly.
        bilinear: bool,
    },
}

/// Gradient geometry, mapping a destination pixel to a table position.
#[derive(Debug, Clone, Copy)]
pub enum GradientKind {
    /// Linear: `index = ox + x * dxx + y * dxy`.
    Linear {
        /// Index at pixel `(0, 0)`.
        ox: f64,
        /// Index step per pixel in x.
        dxx: f64,
        /// Index step per pixel in y.
        dxy: f64,
    },
    /// Radial around a center with a radius scaled to the table length.
    Radial {
        /// Inverse transform coefficients, evaluated at pixel centers.
        inv: [f64; 6],
        /// Center in source space.
        cx: f64,
        /// Center in source space.
        cy: f64,
        /// Table entries per unit distance.
        scale: f64,
    },
    /// Conic sweep around a center.
    Conic {
        /// Inverse transform coefficients, evaluated at pixel centers.
        inv: [f64; 6],
        /// Center in source space.
        cx: f64,
        /// Center in source space.
        cy: f64,
        /// Angle offset in turns.
        offset: f64,
    },
}

/// Everything a pipeline needs to produce source pixels.
#[derive(Debug, Clone, Copy)]
pub enum FetchData<'a> {
    /// A solid premultiplied color.
    Solid(PremulRgba8),
    /// A pattern image.
    Pattern {
        /// The source image.
        src: PatternSource<'a>,
        /// Extend mode applied on both axes.
        extend: ExtendMode,
        /// Placement of the pattern.
        placement: PatternPlacement,
    },
    /// A gradient lookup table.
    Gradient {
        /// Premultiplied table entries; never empty.
        lut: &'a [PremulRgba8],
        /// Extend mode applied to the table position.
        extend: ExtendMode,
        /// The gradient geometry.
        kind: GradientKind,
    },
    /// A span of already fetched pixels starting at destination `x0`.
    ///
    /// This is the source of a two-stage pipeline's second stage and never
    /// appears as a cache key.
    PixelPtr {
        /// The prefetched pixels.
        pixels: &'a [PremulRgba8],
        /// Destination x coordinate of the first pixel.
        x0: u32,
    },
}

impl<'a> FetchData<'a> {
    /// A solid premultiplied color.
    pub fn solid(color: PremulRgba8) -> (Self, FetchType) {
        (Self::Solid(color), FetchType::Solid)
    }

    /// A pattern translated by whole pixels that never leaves its source
    /// bounds, so no extend handling is needed.
    pub fn pattern_blit(src: PatternSource<'a>, tx: i32, ty: i32) -> (Self, FetchType) {
        let data = Self::Pattern {
            src,
            extend: ExtendMode::Pad,
            placement: PatternPlacement::Aligned { tx, ty },
        };
        (data, FetchType::PatternAlignedBlit)
    }

    /// A pattern translated by whole pixels.
    pub fn pattern_aligned(
        src: PatternSource<'a>,
        extend: ExtendMode,
        tx: i32,
        ty: i32,
    ) -> (Self, FetchType) {
        let fetch_type = match extend {
            ExtendMode::Pad => FetchType::PatternAlignedPad,
            ExtendMode::Repeat => FetchType::PatternAlignedRepeat,
            ExtendMode::Reflect => FetchType::PatternAlignedRoR,
        };
        let data = Self::Pattern {
            src,
            extend,
            placement: PatternPlacement::Aligned { tx, ty },
        };
        (data, fetch_type)
    }

    /// A pattern translated by a sub-pixel amount, given in 24.8 fixed
    /// point.
    ///
    /// Nearest-neighbor quality rounds the translation to whole pixels; a
    /// zero fractional part on either axis selects the cheaper
    /// one-dimensional filtering variant.
    pub fn pattern_frac(
        src: PatternSource<'a>,
        extend: ExtendMode,
        quality: PatternQuality,
        tx: i64,
        ty: i64,
    ) -> (Self, FetchType) {
        if quality == PatternQuality::Nearest {
            return Self::pattern_aligned(
                src,
                extend,
                ((tx + 0x80) >> 8) as i32,
                ((ty + 0x80) >> 8) as i32,
            );
        }

        let fx = tx & 0xFF;
        let fy = ty & 0xFF;
        if fx == 0 && fy == 0 {
            return Self::pattern_aligned(src, extend, (tx >> 8) as i32, (ty >> 8) as i32);
        }

        let ror = extend != ExtendMode::Pad;
        let fetch_type = match (fx != 0, fy != 0, ror) {
            (true, false, false) => FetchType::PatternFxPad,
            (true, false, true) => FetchType::PatternFxRoR,
            (false, true, false) => FetchType::PatternFyPad,
            (false, true, true) => FetchType::PatternFyRoR,
            (true, true, false) => FetchType::PatternFxFyPad,
            (true, true, true) => FetchType::PatternFxFyRoR,
            (false, false, _) => unreachable!(),
        };

        let data = Self::Pattern {
            src,
            extend,
            placement: PatternPlacement::Frac { tx, ty },
        };
        (data, fetch_type)
    }

    /// A pattern under an arbitrary affine transform from source to
    /// destination space.
    ///
    /// Returns `None` if the transform is not invertible.
    pub fn pattern_affine(
        src: PatternSource<'a>,
        extend: ExtendMode,
        quality: PatternQuality,
        transform: Affine,
    ) -> Option<(Self, FetchType)> {
        let inv = invert_at_pixel_centers(transform)?;
        let bilinear = quality == PatternQuality::Bilinear;

        // The optimized variants require a scale-only mapping; anything
        // with rotation or shear takes the generic path.
        let axis_aligned = inv[1] == 0.0 && inv[2] == 0.0;
        let fetch_type = match (bilinear, axis_aligned) {
            (false, false) => FetchType::PatternAffineNNAny,
            (false, true) => FetchType::PatternAffineNNOpt,
            (true, false) => FetchType::PatternAffineBiAny,
            (true, true) => FetchType::PatternAffineBiOpt,
        };

        let data = Self::Pattern {
            src,
            extend,
            placement: PatternPlacement::Affine { inv, bilinear },
        };
        Some((data, fetch_type))
    }

    /// A linear gradient from `p0` to `p1` in source space.
    ///
    /// Returns `None` if the transform is not invertible or the gradient
    /// line is degenerate.
    pub fn gradient_linear(
        lut: &'a [PremulRgba8],
        extend: ExtendMode,
        quality: GradientQuality,
        p0: Point,
        p1: Point,
        transform: Affine,
    ) -> Option<(Self, FetchType)> {
        assert!(!lut.is_empty(), "gradient table must not be empty");

        let inv = invert_at_pixel_centers(transform)?;
        let dx = p1.x - p0.x;
        let dy = p1.y - p0.y;
        let len2 = dx * dx + dy * dy;
        if len2 == 0.0 {
            warn!("degenerate linear gradient: both points coincide");
            return None;
        }

        let n = lut.len() as f64;
        let scale_x = dx / len2 * n;
        let scale_y = dy / len2 * n;

        let [a, b, c, d, e, f] = inv;
        let ox = (e - p0.x) * scale_x + (f - p0.y) * scale_y;
        let dxx = a * scale_x + b * scale_y;
        let dxy = c * scale_x + d * scale_y;

        let fetch_type = gradient_fetch_type(
            extend,
            quality,
            FetchType::GradientLinearNNPad,
            FetchType::GradientLinearNNRoR,
            FetchType::GradientLinearDitherPad,
            FetchType::GradientLinearDitherRoR,
        );
        let data = Self::Gradient {
            lut,
            extend,
            kind: GradientKind::Linear { ox, dxx, dxy },
        };
        Some((data, fetch_type))
    }

    /// A radial gradient around `center` with the given radius.
    ///
    /// Returns `None` if the transform is not invertible or the radius is
    /// not positive.
    pub fn gradient_radial(
        lut: &'a [PremulRgba8],
        extend: ExtendMode,
        quality: GradientQuality,
        center: Point,
        radius: f64,
        transform: Affine,
    ) -> Option<(Self, FetchType)> {
        assert!(!lut.is_empty(), "gradient table must not be empty");

        if radius <= 0.0 {
            warn!("degenerate radial gradient: radius must be positive");
            return None;
        }
        let inv = invert_at_pixel_centers(transform)?;

        let fetch_type = gradient_fetch_type(
            extend,
            quality,
            FetchType::GradientRadialNNPad,
            FetchType::GradientRadialNNRoR,
            FetchType::GradientRadialDitherPad,
            FetchType::GradientRadialDitherRoR,
        );
        let data = Self::Gradient {
            lut,
            extend,
            kind: GradientKind::Radial {
                inv,
                cx: center.x,
                cy: center.y,
                scale: lut.len() as f64 / radius,
            },
        };
        Some((data, fetch_type))
    }

    /// A conic gradient sweeping around `center`, starting `offset` turns
    /// past the positive x axis.
    ///
    /// Returns `None` if the transform is not invertible.
    pub fn gradient_conic(
        lut: &'a [PremulRgba8],
        quality: GradientQuality,
        center: Point,
        offset: f64,
        transform: Affine,
    ) -> Option<(Self, FetchType)> {
        assert!(!lut.is_empty(), "gradient table must not be empty");

        let inv = invert_at_pixel_centers(transform)?;
        let fetch_type = match quality {
            GradientQuality::Nearest => FetchType::GradientConicNN,
            GradientQuality::Dither => FetchType::GradientConicDither,
        };
        let data = Self::Gradient {
            lut,
            // A full sweep tiles naturally; the angle is periodic.
            extend: ExtendMode::Repeat,
            kind: GradientKind::Conic {
                inv,
                cx: center.x,
                cy: center.y,
                offset,
            },
        };
        Some((data, fetch_type))
    }

    /// A prefetched span for the second stage of a two-stage pipeline.
    pub fn pixel_ptr(pixels: &'a [PremulRgba8], x0: u32) -> Self {
        Self::PixelPtr { pixels, x0 }
    }
}

fn gradient_fetch_type(
    extend: ExtendMode,
    quality: GradientQuality,
    nn_pad: FetchType,
    nn_ror: FetchType,
    dither_pad: FetchType,
    dither_ror: FetchType,
) -> FetchType {
    // Repeat and reflect share a code path; pad stands alone.
    let ror = extend != ExtendMode::Pad;
    match (quality, ror) {
        (GradientQuality::Nearest, false) => nn_pad,
        (GradientQuality::Nearest, true) => nn_ror,
        (GradientQuality::Dither, false) => dither_pad,
        (GradientQuality::Dither, true) => dither_ror,
    }
}

/// Invert a transform and fold the half-pixel center offset into the
/// translation, so fetchers can evaluate at integer coordinates.
fn invert_at_pixel_centers(transform: Affine) -> Option<[f64; 6]> {
    if transform.determinant() == 0.0 {
        warn!("fetch transform is not invertible");
        return None;
    }
    let [a, b, c, d, e, f] = transform.inverse().as_coeffs();
    Some([a, b, c, d, e + 0.5 * (a + c), f + 0.5 * (b + d)])
}
