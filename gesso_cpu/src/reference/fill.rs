// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reference fill routine.
//!
//! One generic routine covers all three fill types: the shared walker
//! reduces any geometry to scanline segments, and the segment loop
//! composites one pixel at a time through the pixel I/O layer. Slow, but
//! correct for every point of the configuration space — which is its job.

use crate::driver::{Coverage, walk_fill};
use crate::reference::comp::CompositeOp;
use crate::reference::fetch::Fetcher;
use gesso_common::color::PremulRgba8;
use gesso_common::fetch::FetchData;
use gesso_common::fill::FillData;
use gesso_common::pixel::{Pixel, PixelIo, Unpacked};
use gesso_common::surface::Surface;

pub(crate) fn fill_any<P, Io, C>(
    surface: &mut Surface<'_>,
    fill: &FillData<'_>,
    fetch: &FetchData<'_>,
) where
    P: Pixel,
    Io: PixelIo<P>,
    C: CompositeOp,
{
    debug_assert_eq!(
        surface.format(),
        Io::FORMAT,
        "surface format does not match the resolved pipeline"
    );

    const TRANSPARENT: PremulRgba8 = PremulRgba8 { r: 0, g: 0, b: 0, a: 0 };

    let fetcher = Fetcher::new(fetch);
    let mut scratch = Vec::new();

    walk_fill(fill, &mut scratch, |y, x0, x1, coverage| {
        let row = surface.row_mut(y);

        for (i, x) in (x0..x1).enumerate() {
            let mask = match coverage {
                Coverage::Const(c) => u32::from(c),
                Coverage::Mask(m) => u32::from(m[i]),
            };
            if mask == 0 {
                continue;
            }

            let src = if C::NEEDS_SRC {
                P::from_premul(fetcher.fetch(x, y))
            } else {
                P::from_premul(TRANSPARENT)
            };

            let offset = x as usize * Io::BPP;
            let dst = Io::fetch(&row[offset..]);
            let out = C::composite(dst.unpack(), src.unpack(), mask);
            Io::store(&mut row[offset..], out.pack());
        }
    });
}
