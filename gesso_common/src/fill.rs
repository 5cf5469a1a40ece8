// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fill geometry: the per-call description of which destination pixels a
//! pipeline touches and with what coverage.
//!
//! The interesting constructor is [`FillData::box_u_24x8`], which decomposes
//! a sub-pixel box into a compact run-length program of coverage commands:
//! at most three distinct scanline kinds (partial top, fully covered middle,
//! partial bottom), with the middle block emitted once and repeated.

use crate::rect::IntBox;
use crate::signature::FillType;
use smallvec::SmallVec;

/// Coverage scale constants shared between the rasterizer and the pipeline.
pub mod a8 {
    /// Number of fractional bits.
    pub const SHIFT: u32 = 8;
    /// Full coverage on the accumulator scale.
    pub const SCALE: u32 = 1 << SHIFT;
    /// Maximum 8-bit coverage value.
    pub const MASK: u32 = SCALE - 1;
}

/// How many pixels one bit of an analytic occupancy word represents.
///
/// Hardcoded because the rasterizer and the compositor must agree on it.
/// Larger values shrink the bit vectors but grow the cell work per set bit.
pub const PIXELS_PER_BIT: u32 = 4;

/// The fill rule applied when folding analytic coverage deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    /// Non-zero winding.
    NonZero,
    /// Even-odd parity.
    EvenOdd,
}

impl FillRule {
    /// The mask applied to the accumulated winding before it is folded into
    /// an 8-bit coverage value: all ones for non-zero, nine bits for
    /// even-odd.
    #[inline]
    pub const fn mask(self) -> u32 {
        match self {
            Self::NonZero => 0xFFFF_FFFF,
            Self::EvenOdd => 0x1FF,
        }
    }
}

/// One entry in a scanline coverage program.
///
/// A program is a flat list of commands. Span commands ([`Self::CMask`],
/// [`Self::VMask`]) describe one scanline each and appear in increasing `x`
/// order; a scanline is terminated by [`Self::End`] (move on to the next
/// scanline's commands) or [`Self::Repeat`] (run the scanline just described
/// for `count` rows in total). Every program ends with one of the two
/// terminators.
///
/// Variable-coverage commands address their bytes through an offset into the
/// geometry's byte buffer rather than a raw pointer; `advance` is added once
/// per repeated row, which is how a rectangular external mask walks down its
/// source rows without duplicating commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskCmd {
    /// Constant coverage over `x0..x1`.
    CMask {
        /// Start of the span, inclusive.
        x0: u32,
        /// End of the span, exclusive.
        x1: u32,
        /// Coverage applied to every pixel of the span.
        coverage: u8,
    },
    /// Per-pixel coverage bytes over `x0..x1`.
    VMask {
        /// Start of the span, inclusive.
        x0: u32,
        /// End of the span, exclusive.
        x1: u32,
        /// Offset of the first coverage byte in the geometry's byte buffer.
        offset: u32,
        /// Added to `offset` for every repeated row.
        advance: u32,
        /// Whether the bytes already include the fill's global alpha. When
        /// `false` the filler multiplies each byte by the global alpha at
        /// composition time.
        has_global_alpha: bool,
    },
    /// Terminates the current scanline's commands.
    End,
    /// Runs the scanline just described for `count` rows in total.
    Repeat {
        /// Total number of rows covered by the repeated scanline.
        count: u32,
    },
}

impl MaskCmd {
    /// Whether this command terminates a scanline program.
    #[inline]
    pub fn is_terminator(&self) -> bool {
        matches!(self, Self::End | Self::Repeat { .. })
    }
}

/// Bytes reserved per distinct scanline in a [`BoxUScratch`].
const MASK_ROW_STRIDE: usize = 32;

/// Widest box that is emitted as one flat per-row mask instead of a
/// three-part border/middle/border split.
const MAX_MASK_ONLY_WIDTH: u32 = 20;

/// Caller-provided scratch for decomposing a sub-pixel box.
///
/// The returned [`FillData`] borrows the command program and mask bytes
/// stored here, so the scratch must outlive the fill call. A single scratch
/// can be reused across calls.
#[derive(Debug, Clone)]
pub struct BoxUScratch {
    cmds: SmallVec<[MaskCmd; 12]>,
    bytes: [u8; MASK_ROW_STRIDE * 3],
}

impl BoxUScratch {
    /// Create an empty scratch.
    pub fn new() -> Self {
        Self {
            cmds: SmallVec::new(),
            bytes: [0; MASK_ROW_STRIDE * 3],
        }
    }
}

impl Default for BoxUScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// The geometry of one fill call.
///
/// The stored bounds are always the tight box of non-zero coverage, and a
/// geometry that would cover nothing is reported as `None` by the
/// constructors rather than materialized — an empty fill is a normal
/// outcome, not an error, and must simply not be dispatched.
#[derive(Debug)]
pub enum FillData<'a> {
    /// An axis-aligned box filled with constant coverage.
    BoxA {
        /// The filled box.
        bounds: IntBox,
        /// Coverage applied to every pixel.
        alpha: u8,
    },
    /// A coverage-command program.
    Mask {
        /// Tight bounds of the program.
        bounds: IntBox,
        /// Global alpha, applied to commands without it.
        alpha: u8,
        /// The command program.
        cmds: &'a [MaskCmd],
        /// Coverage bytes referenced by variable-coverage commands.
        bytes: &'a [u8],
    },
    /// Cell buffers produced by the analytic rasterizer.
    Analytic {
        /// Fill boundary; `x1` acts as the maximum width.
        bounds: IntBox,
        /// Global alpha.
        alpha: u8,
        /// The fill rule to fold accumulated winding with.
        fill_rule: FillRule,
        /// Occupancy bits, one per [`PIXELS_PER_BIT`] pixels, most
        /// significant bit first within each word.
        bits: &'a [u32],
        /// Occupancy words per scanline.
        bit_stride: usize,
        /// Signed winding deltas in 8.9 fixed point, one cell per pixel.
        cells: &'a [i32],
        /// Cells per scanline.
        cell_stride: usize,
    },
}

impl<'a> FillData<'a> {
    /// An axis-aligned box with constant coverage.
    ///
    /// The box must not be degenerate; the caller resolves empty boxes
    /// before reaching the pipeline.
    pub fn box_a(alpha: u8, x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        assert!(x0 < x1, "degenerate box: x0 >= x1");
        assert!(y0 < y1, "degenerate box: y0 >= y1");

        Self::BoxA {
            bounds: IntBox::new(x0, y0, x1, y1),
            alpha,
        }
    }

    /// Decompose a box with sub-pixel boundaries, given in 24.8 fixed point,
    /// into a coverage-command program.
    ///
    /// Returns `None` when the box rounds to zero visible coverage.
    pub fn box_u_24x8(
        alpha: u8,
        x0: i32,
        y0: i32,
        x1: i32,
        y1: i32,
        scratch: &'a mut BoxUScratch,
    ) -> Option<Self> {
        assert!(x0 >= 0 && y0 >= 0, "box coordinates must be clipped to the surface");
        assert!(x0 < x1, "degenerate box: x0 >= x1");
        assert!(y0 < y1, "degenerate box: y0 >= y1");

        let a = u32::from(alpha);
        if a == 0 {
            return None;
        }

        let ax0 = (x0 >> 8) as u32;
        let ay0 = (y0 >> 8) as u32;
        let ax1 = ((x1 + 0xFF) >> 8) as u32;
        let ay1 = ((y1 + 0xFF) >> 8) as u32;

        let mut fx0 = (x0 & 0xFF) as u32;
        let fy0_raw = (y0 & 0xFF) as u32;
        let fx1 = (((x1 - 1) & 0xFF) + 1) as u32;
        let fy1 = (((y1 - 1) & 0xFF) + 1) as u32;

        let w = ax1 - ax0;
        let h = ay1 - ay0;

        // A one-row box folds both vertical fractions into one value; the
        // top "strip" is then the whole box and no bottom strip exists.
        let fy0 = (if h == 1 { fy1 } else { 256 }) - fy0_raw;

        let cmds = &mut scratch.cmds;
        let bytes = &mut scratch.bytes;
        cmds.clear();

        let mut yb0 = ay0;
        let mut yb1 = ay1;

        if w == 1 {
            // A one-pixel-wide box has no independent left/right borders;
            // the single column's fraction is the difference of the two
            // edge fractions.
            fx0 = fx1 - fx0;

            let m0 = mask_3(fx0, fy0, a);
            if h == 1 {
                if m0 == 0 {
                    return None;
                }
                cmds.push(MaskCmd::CMask { x0: ax0, x1: ax1, coverage: m0 as u8 });
                cmds.push(MaskCmd::End);
                return Some(Self::mask_from_scratch(ax0, yb0, ax1, yb1, scratch));
            }

            let m1 = mask_2(fx0, a);
            if m1 == 0 {
                return None;
            }

            if m0 != 0 {
                cmds.push(MaskCmd::CMask { x0: ax0, x1: ax1, coverage: m0 as u8 });
                cmds.push(MaskCmd::End);
            } else {
                yb0 += 1;
            }

            if h > 2 {
                cmds.push(MaskCmd::CMask { x0: ax0, x1: ax1, coverage: m1 as u8 });
                cmds.push(MaskCmd::Repeat { count: h - 2 });
            }

            let m2 = mask_3(fx0, fy1, a);
            if m2 != 0 {
                cmds.push(MaskCmd::CMask { x0: ax0, x1: ax1, coverage: m2 as u8 });
                cmds.push(MaskCmd::End);
            } else {
                yb1 -= 1;
            }

            if yb0 >= yb1 {
                return None;
            }
            return Some(Self::mask_from_scratch(ax0, yb0, ax1, yb1, scratch));
        }

        // With more than one column the edge fractions describe different
        // pixels: fx0 becomes the left border fraction, fx1 the right one.
        fx0 = 256 - fx0;

        // Full-coverage values of the three scanline kinds decide which
        // strips exist at all.
        let m_top = mask_2(fy0, a);
        let m_mid = a;
        let m_bot = mask_2(fy1, a);

        let aligned = fx0 == 256 && fx1 == 256;
        let narrow = w <= MAX_MASK_ONLY_WIDTH;

        let mut emit_row = |cmds: &mut SmallVec<[MaskCmd; 12]>, row: usize, fy: u32, m_full: u32| {
            if aligned {
                cmds.push(MaskCmd::CMask { x0: ax0, x1: ax1, coverage: m_full as u8 });
            } else {
                let base = row * MASK_ROW_STRIDE;
                let m_left = mask_3(fx0, fy, a) as u8;
                let m_right = mask_3(fx1, fy, a) as u8;

                if narrow {
                    // One flat mask covering the whole row keeps small fills
                    // at a single command per scanline.
                    bytes[base] = m_left;
                    for b in &mut bytes[base + 1..base + w as usize - 1] {
                        *b = m_full as u8;
                    }
                    bytes[base + w as usize - 1] = m_right;
                    cmds.push(MaskCmd::VMask {
                        x0: ax0,
                        x1: ax1,
                        offset: base as u32,
                        advance: 0,
                        has_global_alpha: true,
                    });
                } else {
                    bytes[base] = m_left;
                    bytes[base + 1] = m_right;
                    cmds.push(MaskCmd::VMask {
                        x0: ax0,
                        x1: ax0 + 1,
                        offset: base as u32,
                        advance: 0,
                        has_global_alpha: true,
                    });
                    cmds.push(MaskCmd::CMask { x0: ax0 + 1, x1: ax1 - 1, coverage: m_full as u8 });
                    cmds.push(MaskCmd::VMask {
                        x0: ax1 - 1,
                        x1: ax1,
                        offset: base as u32 + 1,
                        advance: 0,
                        has_global_alpha: true,
                    });
                }
            }
        };

        if h == 1 {
            if m_top == 0 {
                return None;
            }
            emit_row(cmds, 0, fy0, m_top);
            cmds.push(MaskCmd::End);
            return Some(Self::mask_from_scratch(ax0, yb0, ax1, yb1, scratch));
        }

        if m_top != 0 {
            emit_row(cmds, 0, fy0, m_top);
            cmds.push(MaskCmd::End);
        } else {
            yb0 += 1;
        }

        if h > 2 {
            emit_row(cmds, 1, 256, m_mid);
            cmds.push(MaskCmd::Repeat { count: h - 2 });
        }

        if m_bot != 0 {
            emit_row(cmds, 2, fy1, m_bot);
            cmds.push(MaskCmd::End);
        } else {
            yb1 -= 1;
        }

        if yb0 >= yb1 {
            return None;
        }
        Some(Self::mask_from_scratch(ax0, yb0, ax1, yb1, scratch))
    }

    /// Decompose a box with fractional boundaries given in floating point.
    ///
    /// See [`Self::box_u_24x8`].
    pub fn box_u(alpha: u8, x0: f64, y0: f64, x1: f64, y1: f64, scratch: &'a mut BoxUScratch) -> Option<Self> {
        Self::box_u_24x8(
            alpha,
            (x0 * 256.0) as i32,
            (y0 * 256.0) as i32,
            (x1 * 256.0) as i32,
            (y1 * 256.0) as i32,
            scratch,
        )
    }

    fn mask_from_scratch(x0: u32, y0: u32, x1: u32, y1: u32, scratch: &'a BoxUScratch) -> Self {
        Self::Mask {
            bounds: IntBox::new(x0, y0, x1, y1),
            alpha: 0xFF,
            cmds: &scratch.cmds,
            bytes: &scratch.bytes,
        }
    }

    /// A caller-owned coverage-command program.
    ///
    /// Nothing is copied; the commands and bytes must stay alive for the
    /// duration of the fill call, which the borrow expresses.
    pub fn mask(
        alpha: u8,
        bounds: IntBox,
        cmds: &'a [MaskCmd],
        bytes: &'a [u8],
    ) -> Self {
        debug_assert!(!bounds.is_empty(), "degenerate mask bounds");
        debug_assert!(
            cmds.last().is_some_and(MaskCmd::is_terminator),
            "mask program must end with a terminator"
        );

        Self::Mask { bounds, alpha, cmds, bytes }
    }

    /// Coverage produced by the analytic rasterizer.
    ///
    /// This is a carrier only — the deltas are folded by the pipeline, and
    /// no rasterization happens here.
    pub fn analytic(
        alpha: u8,
        fill_rule: FillRule,
        bounds: IntBox,
        bits: &'a [u32],
        bit_stride: usize,
        cells: &'a [i32],
        cell_stride: usize,
    ) -> Self {
        debug_assert!(!bounds.is_empty(), "degenerate analytic bounds");

        Self::Analytic {
            bounds,
            alpha,
            fill_rule,
            bits,
            bit_stride,
            cells,
            cell_stride,
        }
    }

    /// The fill type this geometry dispatches as.
    #[inline]
    pub fn fill_type(&self) -> FillType {
        match self {
            Self::BoxA { .. } => FillType::BoxA,
            Self::Mask { .. } => FillType::Mask,
            Self::Analytic { .. } => FillType::Analytic,
        }
    }

    /// The tight bounds of the geometry.
    #[inline]
    pub fn bounds(&self) -> IntBox {
        match self {
            Self::BoxA { bounds, .. }
            | Self::Mask { bounds, .. }
            | Self::Analytic { bounds, .. } => *bounds,
        }
    }

    /// The global alpha of the fill.
    #[inline]
    pub fn alpha(&self) -> u8 {
        match self {
            Self::BoxA { alpha, .. }
            | Self::Mask { alpha, .. }
            | Self::Analytic { alpha, .. } => *alpha,
        }
    }
}

/// Coverage of a border pixel: two fractions and the alpha, rounded.
#[inline]
fn mask_3(fx: u32, fy: u32, a: u32) -> u32 {
    (fx * fy * a + 0x8000) >> 16
}

/// Coverage of a full-width or full-height pixel: one fraction and the
/// alpha, rounded.
#[inline]
fn mask_2(f: u32, a: u32) -> u32 {
    (f * a + 0x80) >> 8
}
