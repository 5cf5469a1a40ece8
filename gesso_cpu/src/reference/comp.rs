// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The blend operators, expressed on unpacked pixels.
//!
//! See <https://www.w3.org/TR/compositing-1/#porterduffcompositingoperators>
//! for the underlying formulas; sources are premultiplied and every operator
//! takes the segment coverage as a mask in `0..=255`.

use gesso_common::pixel::Unpacked;

/// One blend operator, generic over the destination's pixel kind.
pub(crate) trait CompositeOp {
    /// Whether the operator reads source pixels at all.
    const NEEDS_SRC: bool = true;

    /// Combine a destination and a masked source pixel.
    fn composite<U: Unpacked>(dst: U, src: U, mask: u32) -> U;
}

/// Source over destination.
pub(crate) struct SrcOver;

/// Source replaces destination, interpolated by coverage.
pub(crate) struct SrcCopy;

/// Saturating addition.
pub(crate) struct Plus;

/// Destination attenuated by coverage.
pub(crate) struct Clear;

impl CompositeOp for SrcOver {
    #[inline(always)]
    fn composite<U: Unpacked>(dst: U, src: U, mask: u32) -> U {
        let sm = src.mul(mask).div255();
        sm.add(dst.mul(255 - sm.alpha()).div255())
    }
}

impl CompositeOp for SrcCopy {
    #[inline(always)]
    fn composite<U: Unpacked>(dst: U, src: U, mask: u32) -> U {
        src.mul(mask).div255().add(dst.mul(255 - mask).div255())
    }
}

impl CompositeOp for Plus {
    #[inline(always)]
    fn composite<U: Unpacked>(dst: U, src: U, mask: u32) -> U {
        dst.saturating_add(src.mul(mask).div255())
    }
}

impl CompositeOp for Clear {
    const NEEDS_SRC: bool = false;

    #[inline(always)]
    fn composite<U: Unpacked>(dst: U, _src: U, mask: u32) -> U {
        dst.mul(255 - mask).div255()
    }
}
