// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The portable reference backend.
//!
//! A statically compiled table of pipelines covering the entire enumerated
//! configuration space, built on the pixel I/O layer one pixel at a time.
//! Destination format and blend operator select the table entry; source
//! format, fill type and fetch strategy are handled dynamically inside the
//! routine. Because the table is total, [`resolve`] cannot fail and the
//! dispatcher always has a fallback.

mod comp;
mod fetch;
mod fill;

use crate::dispatch::{DispatchData, FillFunc};
use comp::{Clear, Plus, SrcCopy, SrcOver};
use fill::fill_any;
use gesso_common::format::PixelFormat;
use gesso_common::pixel::{PackedAlpha, PackedRgba, io};
use gesso_common::signature::{CompOp, Signature};

/// Resolve a signature to a one-stage reference pipeline.
///
/// Total over the enumerated signature space.
pub fn resolve(signature: Signature) -> DispatchData {
    DispatchData::one_stage(fill_func(signature))
}

/// Resolve a signature to a reference pipeline with its fetch stage split
/// out.
///
/// Behaves identically to [`resolve`]; useful for exercising the two-stage
/// driver and as a template for code-generation backends that only compile
/// one of the two stages.
pub fn resolve_two_stage(signature: Signature) -> DispatchData {
    DispatchData::two_stage(fill_func(signature), fetch::fetch_span)
}

fn fill_func(signature: Signature) -> FillFunc {
    FILL_FUNCS[signature.dst_format() as usize][signature.comp_op() as usize]
}

static FILL_FUNCS: [[FillFunc; CompOp::COUNT]; PixelFormat::COUNT] = [
    [
        fill_any::<PackedRgba, io::Prgb32, SrcOver>,
        fill_any::<PackedRgba, io::Prgb32, SrcCopy>,
        fill_any::<PackedRgba, io::Prgb32, Plus>,
        fill_any::<PackedRgba, io::Prgb32, Clear>,
    ],
    [
        fill_any::<PackedRgba, io::Xrgb32, SrcOver>,
        fill_any::<PackedRgba, io::Xrgb32, SrcCopy>,
        fill_any::<PackedRgba, io::Xrgb32, Plus>,
        fill_any::<PackedRgba, io::Xrgb32, Clear>,
    ],
    [
        fill_any::<PackedAlpha, io::A8, SrcOver>,
        fill_any::<PackedAlpha, io::A8, SrcCopy>,
        fill_any::<PackedAlpha, io::A8, Plus>,
        fill_any::<PackedAlpha, io::A8, Clear>,
    ],
];
