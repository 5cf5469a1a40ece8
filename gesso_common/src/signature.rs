// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The packed pipeline signature and its field enumerations.
//!
//! A [`Signature`] describes one concrete pipeline configuration — which
//! destination and source formats are involved, which blend operator is
//! applied, how coverage is produced and how source pixels are fetched —
//! packed into a single `u32` so it can act as a key in pipeline caches.

use crate::format::PixelFormat;
use core::ops::{BitOr, BitOrAssign};

/// The blend operator combining a fetched source pixel with the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum CompOp {
    /// Source over destination (the default operator).
    SrcOver = 0,
    /// Source replaces destination, interpolated by coverage.
    SrcCopy = 1,
    /// Saturating addition of source and destination.
    Plus = 2,
    /// Destination attenuated by coverage; source pixels are never read.
    Clear = 3,
}

impl CompOp {
    /// Number of blend operators.
    pub const COUNT: usize = 4;

    /// All blend operators, indexable by discriminant.
    pub const ALL: [Self; Self::COUNT] = [Self::SrcOver, Self::SrcCopy, Self::Plus, Self::Clear];

    #[inline]
    pub fn from_u32(value: u32) -> Self {
        debug_assert!((value as usize) < Self::COUNT, "invalid comp op {value}");
        Self::ALL[value as usize]
    }
}

/// How the coverage of each composited pixel is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FillType {
    /// Axis-aligned box with constant coverage.
    BoxA = 0,
    /// A coverage-command program (sub-pixel boxes and external masks).
    Mask = 1,
    /// Cell buffers produced by the analytic rasterizer.
    Analytic = 2,
}

impl FillType {
    /// Number of fill types.
    pub const COUNT: usize = 3;

    /// All fill types, indexable by discriminant.
    pub const ALL: [Self; Self::COUNT] = [Self::BoxA, Self::Mask, Self::Analytic];

    #[inline]
    pub fn from_u32(value: u32) -> Self {
        debug_assert!((value as usize) < Self::COUNT, "invalid fill type {value}");
        Self::ALL[value as usize]
    }
}

/// How source pixels are produced.
///
/// The values are deliberately laid out in contiguous per-family ranges
/// (solid, aligned pattern, fractional pattern, affine pattern, linear /
/// radial / conic gradient), each family further split into quality and
/// extend variants. Classifying a fetch type is therefore always a range
/// comparison against the family's first/last constant, never a bitmask
/// test, and new variants can be added to a family without growing a set
/// of boolean flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum FetchType {
    /// Solid color.
    Solid = 0,

    /// Pattern, pixel-aligned, no extend handling required.
    PatternAlignedBlit = 1,
    /// Pattern, pixel-aligned, padded in x.
    PatternAlignedPad = 2,
    /// Pattern, pixel-aligned, repeated in x.
    PatternAlignedRepeat = 3,
    /// Pattern, pixel-aligned, repeated-or-reflected in x.
    PatternAlignedRoR = 4,

    /// Pattern with a fractional x translation, padded.
    PatternFxPad = 5,
    /// Pattern with a fractional x translation, repeated-or-reflected.
    PatternFxRoR = 6,
    /// Pattern with a fractional y translation, padded.
    PatternFyPad = 7,
    /// Pattern with a fractional y translation, repeated-or-reflected.
    PatternFyRoR = 8,
    /// Pattern with fractional x and y translations, padded.
    PatternFxFyPad = 9,
    /// Pattern with fractional x and y translations, repeated-or-reflected.
    PatternFxFyRoR = 10,

    /// Pattern under an affine transform, nearest-neighbor sampling.
    PatternAffineNNAny = 11,
    /// Pattern under an affine transform, nearest-neighbor, optimized case.
    PatternAffineNNOpt = 12,
    /// Pattern under an affine transform, bilinear sampling.
    PatternAffineBiAny = 13,
    /// Pattern under an affine transform, bilinear, optimized case.
    PatternAffineBiOpt = 14,

    /// Linear gradient, padded.
    GradientLinearNNPad = 15,
    /// Linear gradient, repeated-or-reflected.
    GradientLinearNNRoR = 16,
    /// Linear gradient, padded, dithered.
    GradientLinearDitherPad = 17,
    /// Linear gradient, repeated-or-reflected, dithered.
    GradientLinearDitherRoR = 18,

    /// Radial gradient, padded.
    GradientRadialNNPad = 19,
    /// Radial gradient, repeated-or-reflected.
    GradientRadialNNRoR = 20,
    /// Radial gradient, padded, dithered.
    GradientRadialDitherPad = 21,
    /// Radial gradient, repeated-or-reflected, dithered.
    GradientRadialDitherRoR = 22,

    /// Conic gradient.
    GradientConicNN = 23,
    /// Conic gradient, dithered.
    GradientConicDither = 24,

    /// A prefetched span of pixels.
    ///
    /// Used as the source of the second stage of a two-stage pipeline. This
    /// is not a valid fetch type for building a signature.
    PixelPtr = 25,
}

impl FetchType {
    /// Number of fetch types valid in a signature (excludes [`Self::PixelPtr`]).
    pub const COUNT: usize = 25;

    /// All fetch types, indexable by discriminant.
    pub const ALL: [Self; 26] = [
        Self::Solid,
        Self::PatternAlignedBlit,
        Self::PatternAlignedPad,
        Self::PatternAlignedRepeat,
        Self::PatternAlignedRoR,
        Self::PatternFxPad,
        Self::PatternFxRoR,
        Self::PatternFyPad,
        Self::PatternFyRoR,
        Self::PatternFxFyPad,
        Self::PatternFxFyRoR,
        Self::PatternAffineNNAny,
        Self::PatternAffineNNOpt,
        Self::PatternAffineBiAny,
        Self::PatternAffineBiOpt,
        Self::GradientLinearNNPad,
        Self::GradientLinearNNRoR,
        Self::GradientLinearDitherPad,
        Self::GradientLinearDitherRoR,
        Self::GradientRadialNNPad,
        Self::GradientRadialNNRoR,
        Self::GradientRadialDitherPad,
        Self::GradientRadialDitherRoR,
        Self::GradientConicNN,
        Self::GradientConicDither,
        Self::PixelPtr,
    ];

    /// First fetch type of the pattern families.
    pub const PATTERN_ANY_FIRST: Self = Self::PatternAlignedBlit;
    /// Last fetch type of the pattern families.
    pub const PATTERN_ANY_LAST: Self = Self::PatternAffineBiOpt;

    /// First pixel-aligned pattern fetch type.
    pub const PATTERN_ALIGNED_FIRST: Self = Self::PatternAlignedBlit;
    /// Last pixel-aligned pattern fetch type.
    pub const PATTERN_ALIGNED_LAST: Self = Self::PatternAlignedRoR;

    /// First fractional-translation pattern fetch type.
    pub const PATTERN_UNALIGNED_FIRST: Self = Self::PatternFxPad;
    /// Last fractional-translation pattern fetch type.
    pub const PATTERN_UNALIGNED_LAST: Self = Self::PatternFxFyRoR;

    /// First affine pattern fetch type.
    pub const PATTERN_AFFINE_FIRST: Self = Self::PatternAffineNNAny;
    /// Last affine pattern fetch type.
    pub const PATTERN_AFFINE_LAST: Self = Self::PatternAffineBiOpt;

    /// First gradient fetch type.
    pub const GRADIENT_ANY_FIRST: Self = Self::GradientLinearNNPad;
    /// Last gradient fetch type.
    pub const GRADIENT_ANY_LAST: Self = Self::GradientConicDither;

    /// First linear gradient fetch type.
    pub const GRADIENT_LINEAR_FIRST: Self = Self::GradientLinearNNPad;
    /// Last linear gradient fetch type.
    pub const GRADIENT_LINEAR_LAST: Self = Self::GradientLinearDitherRoR;

    /// First radial gradient fetch type.
    pub const GRADIENT_RADIAL_FIRST: Self = Self::GradientRadialNNPad;
    /// Last radial gradient fetch type.
    pub const GRADIENT_RADIAL_LAST: Self = Self::GradientRadialDitherRoR;

    /// First conic gradient fetch type.
    pub const GRADIENT_CONIC_FIRST: Self = Self::GradientConicNN;
    /// Last conic gradient fetch type.
    pub const GRADIENT_CONIC_LAST: Self = Self::GradientConicDither;

    #[inline]
    pub fn from_u32(value: u32) -> Self {
        debug_assert!((value as usize) < Self::ALL.len(), "invalid fetch type {value}");
        Self::ALL[value as usize]
    }

    /// Whether this fetch type belongs to one of the pattern families.
    #[inline]
    pub fn is_pattern(self) -> bool {
        (Self::PATTERN_ANY_FIRST..=Self::PATTERN_ANY_LAST).contains(&self)
    }

    /// Whether this fetch type belongs to one of the gradient families.
    #[inline]
    pub fn is_gradient(self) -> bool {
        (Self::GRADIENT_ANY_FIRST..=Self::GRADIENT_ANY_LAST).contains(&self)
    }
}

/// A pipeline signature packed into a single `u32` value.
///
/// Each field occupies its own contiguous, non-overlapping bit range, so a
/// signature is cheap to copy, compare and hash, and two signatures can be
/// combined with `|` while they describe disjoint fields. A signature is
/// built per draw call from the resolved paint state and is immutable
/// afterwards; the pending flag is the one transient bit and must be
/// cleared before the signature is used as a cache key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Signature {
    value: u32,
}

impl Signature {
    const DST_FORMAT_MASK: u32 = 0x0000_000F;
    const SRC_FORMAT_MASK: u32 = 0x0000_00F0;
    const COMP_OP_MASK: u32 = 0x0000_3F00;
    const FILL_TYPE_MASK: u32 = 0x0000_C000;
    const FETCH_TYPE_MASK: u32 = 0x001F_0000;
    const PENDING_FLAG_MASK: u32 = 0x8000_0000;

    /// Create a signature from a previously packed value.
    #[inline]
    pub const fn from_value(value: u32) -> Self {
        Self { value }
    }

    /// Return a signature only containing a destination format.
    #[inline]
    pub const fn from_dst_format(format: PixelFormat) -> Self {
        Self::from_field(Self::DST_FORMAT_MASK, format as u32)
    }

    /// Return a signature only containing a source format.
    #[inline]
    pub const fn from_src_format(format: PixelFormat) -> Self {
        Self::from_field(Self::SRC_FORMAT_MASK, format as u32)
    }

    /// Return a signature only containing a blend operator.
    #[inline]
    pub const fn from_comp_op(comp_op: CompOp) -> Self {
        Self::from_field(Self::COMP_OP_MASK, comp_op as u32)
    }

    /// Return a signature only containing a fill type.
    #[inline]
    pub const fn from_fill_type(fill_type: FillType) -> Self {
        Self::from_field(Self::FILL_TYPE_MASK, fill_type as u32)
    }

    /// Return a signature only containing a fetch type.
    #[inline]
    pub const fn from_fetch_type(fetch_type: FetchType) -> Self {
        Self::from_field(Self::FETCH_TYPE_MASK, fetch_type as u32)
    }

    /// Return a signature only containing the pending flag.
    #[inline]
    pub const fn from_pending_flag() -> Self {
        Self { value: Self::PENDING_FLAG_MASK }
    }

    /// The signature as a packed `u32` value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.value
    }

    const fn from_field(mask: u32, v: u32) -> Self {
        Self { value: v << mask.trailing_zeros() }
    }

    #[inline]
    fn get(self, mask: u32) -> u32 {
        (self.value & mask) >> mask.trailing_zeros()
    }

    #[inline]
    fn set(&mut self, mask: u32, v: u32) {
        debug_assert!(v <= mask >> mask.trailing_zeros(), "signature field overflow");
        self.value = (self.value & !mask) | (v << mask.trailing_zeros());
    }

    // `add` assumes the field is still zero, so building a signature out of
    // `|`-combined parts never has to mask anything out.
    #[inline]
    fn add(&mut self, mask: u32, v: u32) {
        debug_assert!(v <= mask >> mask.trailing_zeros(), "signature field overflow");
        debug_assert!(self.value & mask == 0, "signature field set twice");
        self.value |= v << mask.trailing_zeros();
    }

    /// Extract the destination pixel format.
    #[inline]
    pub fn dst_format(self) -> PixelFormat {
        PixelFormat::from_u32(self.get(Self::DST_FORMAT_MASK))
    }

    /// Extract the source pixel format.
    #[inline]
    pub fn src_format(self) -> PixelFormat {
        PixelFormat::from_u32(self.get(Self::SRC_FORMAT_MASK))
    }

    /// Extract the blend operator.
    #[inline]
    pub fn comp_op(self) -> CompOp {
        CompOp::from_u32(self.get(Self::COMP_OP_MASK))
    }

    /// Extract the fill type.
    #[inline]
    pub fn fill_type(self) -> FillType {
        FillType::from_u32(self.get(Self::FILL_TYPE_MASK))
    }

    /// Extract the fetch type.
    #[inline]
    pub fn fetch_type(self) -> FetchType {
        FetchType::from_u32(self.get(Self::FETCH_TYPE_MASK))
    }

    /// Whether the pending flag is set.
    #[inline]
    pub fn has_pending_flag(self) -> bool {
        self.value & Self::PENDING_FLAG_MASK != 0
    }

    /// Whether the source is a solid color.
    #[inline]
    pub fn is_solid(self) -> bool {
        self.value & Self::FETCH_TYPE_MASK == 0
    }

    /// Whether the source is a pattern.
    #[inline]
    pub fn is_pattern(self) -> bool {
        self.fetch_type().is_pattern()
    }

    /// Whether the source is a gradient.
    #[inline]
    pub fn is_gradient(self) -> bool {
        self.fetch_type().is_gradient()
    }

    /// Overwrite the destination pixel format.
    #[inline]
    pub fn set_dst_format(&mut self, v: PixelFormat) {
        self.set(Self::DST_FORMAT_MASK, v as u32);
    }

    /// Overwrite the source pixel format.
    #[inline]
    pub fn set_src_format(&mut self, v: PixelFormat) {
        self.set(Self::SRC_FORMAT_MASK, v as u32);
    }

    /// Overwrite the blend operator.
    #[inline]
    pub fn set_comp_op(&mut self, v: CompOp) {
        self.set(Self::COMP_OP_MASK, v as u32);
    }

    /// Overwrite the fill type.
    #[inline]
    pub fn set_fill_type(&mut self, v: FillType) {
        self.set(Self::FILL_TYPE_MASK, v as u32);
    }

    /// Overwrite the fetch type.
    #[inline]
    pub fn set_fetch_type(&mut self, v: FetchType) {
        self.set(Self::FETCH_TYPE_MASK, v as u32);
    }

    /// Add the destination pixel format to a zero field.
    #[inline]
    pub fn add_dst_format(&mut self, v: PixelFormat) {
        self.add(Self::DST_FORMAT_MASK, v as u32);
    }

    /// Add the source pixel format to a zero field.
    #[inline]
    pub fn add_src_format(&mut self, v: PixelFormat) {
        self.add(Self::SRC_FORMAT_MASK, v as u32);
    }

    /// Add the blend operator to a zero field.
    #[inline]
    pub fn add_comp_op(&mut self, v: CompOp) {
        self.add(Self::COMP_OP_MASK, v as u32);
    }

    /// Add the fill type to a zero field.
    #[inline]
    pub fn add_fill_type(&mut self, v: FillType) {
        self.add(Self::FILL_TYPE_MASK, v as u32);
    }

    /// Add the fetch type to a zero field.
    #[inline]
    pub fn add_fetch_type(&mut self, v: FetchType) {
        self.add(Self::FETCH_TYPE_MASK, v as u32);
    }

    /// Mark the signature as pending.
    #[inline]
    pub fn set_pending_flag(&mut self) {
        self.value |= Self::PENDING_FLAG_MASK;
    }

    /// Clear the pending flag.
    #[inline]
    pub fn clear_pending_flag(&mut self) {
        self.value &= !Self::PENDING_FLAG_MASK;
    }
}

impl BitOr for Signature {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self { value: self.value | rhs.value }
    }
}

impl BitOrAssign for Signature {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.value |= rhs.value;
    }
}

impl core::fmt::Debug for Signature {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Signature")
            .field("dst_format", &self.dst_format())
            .field("src_format", &self.src_format())
            .field("comp_op", &self.comp_op())
            .field("fill_type", &self.fill_type())
            .field("fetch_type", &self.fetch_type())
            .field("pending", &self.has_pending_flag())
            .finish()
    }
}
