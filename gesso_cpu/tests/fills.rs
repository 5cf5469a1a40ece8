// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end reference fills: pixels in, pixels out.

use gesso_common::color::PremulRgba8;
use gesso_common::fetch::{
    ExtendMode, FetchData, GradientQuality, PatternQuality, PatternSource,
};
use gesso_common::fill::{BoxUScratch, FillData, FillRule, MaskCmd};
use gesso_common::format::PixelFormat;
use gesso_common::kurbo::{Affine, Point};
use gesso_common::rect::IntBox;
use gesso_common::signature::{CompOp, FetchType, Signature};
use gesso_common::surface::Surface;
use gesso_cpu::dispatch::PipelineRegistry;

fn premul(r: u8, g: u8, b: u8, a: u8) -> PremulRgba8 {
    PremulRgba8 { r, g, b, a }
}

/// Resolve and run one fill against a Prgb32 buffer, returning its pixels.
fn run_prgb32(
    width: u32,
    height: u32,
    background: [u8; 4],
    comp_op: CompOp,
    fill: &FillData<'_>,
    fetch: &FetchData<'_>,
    fetch_type: FetchType,
) -> Vec<[u8; 4]> {
    let mut data = Vec::new();
    for _ in 0..width * height {
        data.extend_from_slice(&background);
    }

    let sig = Signature::from_dst_format(PixelFormat::Prgb32)
        | Signature::from_src_format(PixelFormat::Prgb32)
        | Signature::from_comp_op(comp_op)
        | Signature::from_fill_type(fill.fill_type())
        | Signature::from_fetch_type(fetch_type);
    let entry = PipelineRegistry::global().resolve(sig);

    let mut surface = Surface::new(&mut data, width, height, PixelFormat::Prgb32);
    entry.run(&mut surface, fill, fetch);

    data.chunks_exact(4)
        .map(|px| [px[0], px[1], px[2], px[3]])
        .collect()
}

#[test]
fn solid_box_src_over() {
    let fill = FillData::box_a(255, 1, 1, 3, 3);
    let (fetch, fetch_type) = FetchData::solid(premul(200, 30, 40, 255));
    let pixels = run_prgb32(4, 4, [0, 0, 0, 0], CompOp::SrcOver, &fill, &fetch, fetch_type);

    for y in 0..4 {
        for x in 0..4 {
            let expected = if (1..3).contains(&x) && (1..3).contains(&y) {
                [200, 30, 40, 255]
            } else {
                [0, 0, 0, 0]
            };
            assert_eq!(pixels[y * 4 + x], expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn constant_coverage_blends_src_over() {
    let fill = FillData::box_a(128, 0, 0, 1, 1);
    let (fetch, fetch_type) = FetchData::solid(premul(255, 0, 0, 255));
    let pixels = run_prgb32(1, 1, [0, 0, 0, 255], CompOp::SrcOver, &fill, &fetch, fetch_type);

    assert_eq!(pixels[0], [128, 0, 0, 255]);
}

#[test]
fn src_copy_replaces_under_full_coverage() {
    let fill = FillData::box_a(255, 0, 0, 1, 1);
    let (fetch, fetch_type) = FetchData::solid(premul(0, 0, 0, 0));
    let pixels = run_prgb32(1, 1, [9, 9, 9, 255], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    // An all-transparent source erases the destination, unlike SrcOver.
    assert_eq!(pixels[0], [0, 0, 0, 0]);
}

#[test]
fn plus_saturates_channels() {
    let fill = FillData::box_a(255, 0, 0, 1, 1);
    let (fetch, fetch_type) = FetchData::solid(premul(100, 56, 1, 255));
    let pixels = run_prgb32(1, 1, [200, 200, 10, 255], CompOp::Plus, &fill, &fetch, fetch_type);

    assert_eq!(pixels[0], [255, 255, 11, 255]);
}

#[test]
fn clear_attenuates_by_coverage() {
    let fill = FillData::box_a(128, 0, 0, 1, 1);
    let (fetch, fetch_type) = FetchData::solid(premul(0, 0, 0, 0));
    let pixels = run_prgb32(1, 1, [255, 100, 0, 255], CompOp::Clear, &fill, &fetch, fetch_type);

    // dst * (255 - 128) / 255, rounded.
    assert_eq!(pixels[0], [127, 50, 0, 127]);
}

#[test]
fn a8_destination_stores_alpha_only() {
    let mut data = [0_u8; 4];
    let sig = Signature::from_dst_format(PixelFormat::A8)
        | Signature::from_src_format(PixelFormat::Prgb32)
        | Signature::from_comp_op(CompOp::SrcOver)
        | Signature::from_fill_type(gesso_common::signature::FillType::BoxA)
        | Signature::from_fetch_type(FetchType::Solid);
    let entry = PipelineRegistry::global().resolve(sig);

    let mut surface = Surface::new(&mut data, 4, 1, PixelFormat::A8);
    let fill = FillData::box_a(255, 1, 0, 3, 1);
    let (fetch, _) = FetchData::solid(premul(90, 90, 90, 200));
    entry.run(&mut surface, &fill, &fetch);
    drop(surface);

    assert_eq!(data, [0, 200, 200, 0]);
}

#[test]
fn xrgb_destination_stays_opaque() {
    let mut data = [0, 0, 0, 7, 0, 0, 0, 7];
    let sig = Signature::from_dst_format(PixelFormat::Xrgb32)
        | Signature::from_src_format(PixelFormat::Prgb32)
        | Signature::from_comp_op(CompOp::SrcOver)
        | Signature::from_fill_type(gesso_common::signature::FillType::BoxA)
        | Signature::from_fetch_type(FetchType::Solid);
    let entry = PipelineRegistry::global().resolve(sig);

    let mut surface = Surface::new(&mut data, 2, 1, PixelFormat::Xrgb32);
    let fill = FillData::box_a(255, 0, 0, 1, 1);
    let (fetch, _) = FetchData::solid(premul(100, 0, 0, 100));
    entry.run(&mut surface, &fill, &fetch);
    drop(surface);

    // src + dst * (255 - 100) / 255 on the color channels; the stored
    // fourth byte is opaque regardless of the source alpha.
    assert_eq!(data, [100, 0, 0, 255, 0, 0, 0, 7]);
}

#[test]
fn sub_pixel_box_blends_partial_coverage() {
    let mut scratch = BoxUScratch::new();
    let fill = FillData::box_u(255, 0.0, 0.0, 0.5, 0.5, &mut scratch).unwrap();
    let (fetch, fetch_type) = FetchData::solid(premul(255, 0, 0, 255));
    let pixels = run_prgb32(2, 2, [0, 0, 0, 255], CompOp::SrcOver, &fill, &fetch, fetch_type);

    // A quarter-covered pixel at full alpha: coverage 64.
    assert_eq!(pixels[0], [64, 0, 0, 255]);
    assert_eq!(pixels[1], [0, 0, 0, 255]);
    assert_eq!(pixels[2], [0, 0, 0, 255]);
    assert_eq!(pixels[3], [0, 0, 0, 255]);
}

#[test]
fn external_mask_with_row_advance() {
    // A 2x2 mask whose bytes step one row per repeat, multiplied by the
    // fill's global alpha at composition time.
    let cmds = [
        MaskCmd::VMask { x0: 1, x1: 3, offset: 0, advance: 2, has_global_alpha: false },
        MaskCmd::Repeat { count: 2 },
    ];
    let bytes = [255, 128, 64, 32];
    let fill = FillData::mask(255, IntBox::new(1, 0, 3, 2), &cmds, &bytes);
    let (fetch, fetch_type) = FetchData::solid(premul(255, 255, 255, 255));
    let pixels = run_prgb32(4, 2, [0, 0, 0, 0], CompOp::SrcOver, &fill, &fetch, fetch_type);

    let v = |m: u8| [m, m, m, m];
    assert_eq!(pixels[0], v(0));
    assert_eq!(pixels[1], v(255));
    assert_eq!(pixels[2], v(128));
    assert_eq!(pixels[3], v(0));
    assert_eq!(pixels[4], v(0));
    assert_eq!(pixels[5], v(64));
    assert_eq!(pixels[6], v(32));
    assert_eq!(pixels[7], v(0));
}

#[test]
fn analytic_fill_composites_folded_coverage() {
    // One scanline of 8 pixels with full winding entering at x=2 and
    // leaving at x=6; deltas are 8.9 fixed point.
    let full = 256 << 9;
    let mut cells = [0_i32; 8];
    cells[2] = full;
    cells[6] = -full;
    let bits = [0b11_u32 << 30];
    let fill = FillData::analytic(
        255,
        FillRule::NonZero,
        IntBox::new(0, 0, 8, 1),
        &bits,
        1,
        &cells,
        8,
    );

    let (fetch, fetch_type) = FetchData::solid(premul(255, 255, 255, 255));
    let pixels = run_prgb32(8, 1, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    let expected: Vec<[u8; 4]> = [0, 0, 255, 255, 255, 255, 0, 0]
        .iter()
        .map(|&m| [m, m, m, m])
        .collect();
    assert_eq!(pixels, expected);
}

#[test]
fn repeated_pattern_tiles_the_surface() {
    // A 2x2 checkerboard blitted over 4x4 with repeat.
    let r = [255_u8, 0, 0, 255];
    let g = [0_u8, 255, 0, 255];
    let b = [0_u8, 0, 255, 255];
    let w = [255_u8, 255, 255, 255];
    let mut pattern = Vec::new();
    for px in [r, g, b, w] {
        pattern.extend_from_slice(&px);
    }
    let src = PatternSource {
        pixels: &pattern,
        stride: 8,
        width: 2,
        height: 2,
        format: PixelFormat::Prgb32,
    };

    let (fetch, fetch_type) = FetchData::pattern_aligned(src, ExtendMode::Repeat, 0, 0);
    assert_eq!(fetch_type, FetchType::PatternAlignedRepeat);

    let fill = FillData::box_a(255, 0, 0, 4, 4);
    let pixels = run_prgb32(4, 4, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    for y in 0..4_usize {
        for x in 0..4_usize {
            let expected = match (x % 2, y % 2) {
                (0, 0) => r,
                (1, 0) => g,
                (0, 1) => b,
                _ => w,
            };
            assert_eq!(pixels[y * 4 + x], expected, "pixel ({x}, {y})");
        }
    }
}

#[test]
fn translated_pattern_pads_at_the_edge() {
    // A 1x1 red pattern placed at x=2 with pad extend covers everything.
    let pattern = [255_u8, 0, 0, 255];
    let src = PatternSource {
        pixels: &pattern,
        stride: 4,
        width: 1,
        height: 1,
        format: PixelFormat::Prgb32,
    };
    let (fetch, fetch_type) = FetchData::pattern_aligned(src, ExtendMode::Pad, 2, 0);

    let fill = FillData::box_a(255, 0, 0, 4, 1);
    let pixels = run_prgb32(4, 1, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    assert!(pixels.iter().all(|&px| px == [255, 0, 0, 255]));
}

#[test]
fn fractional_pattern_interpolates() {
    // Black and white side by side, shifted half a pixel: the seam pixel
    // reads the average.
    let pattern = [0_u8, 0, 0, 255, 255, 255, 255, 255];
    let src = PatternSource {
        pixels: &pattern,
        stride: 8,
        width: 2,
        height: 1,
        format: PixelFormat::Prgb32,
    };
    let (fetch, fetch_type) = FetchData::pattern_frac(
        src,
        ExtendMode::Pad,
        PatternQuality::Bilinear,
        -0x80,
        0,
    );
    assert_eq!(fetch_type, FetchType::PatternFxPad);

    let fill = FillData::box_a(255, 0, 0, 2, 1);
    let pixels = run_prgb32(2, 1, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    assert_eq!(pixels[0], [128, 128, 128, 255]);
    assert_eq!(pixels[1], [255, 255, 255, 255]);
}

#[test]
fn linear_gradient_walks_the_table() {
    let lut: Vec<PremulRgba8> = (0..8).map(|i| premul(i * 30, 0, 0, 255)).collect();
    let (fetch, fetch_type) = FetchData::gradient_linear(
        &lut,
        ExtendMode::Pad,
        GradientQuality::Nearest,
        Point::new(0.0, 0.0),
        Point::new(4.0, 0.0),
        Affine::IDENTITY,
    )
    .unwrap();
    assert_eq!(fetch_type, FetchType::GradientLinearNNPad);

    let fill = FillData::box_a(255, 0, 0, 4, 1);
    let pixels = run_prgb32(4, 1, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    // Index at pixel centers: 1, 3, 5, 7.
    assert_eq!(pixels[0], [30, 0, 0, 255]);
    assert_eq!(pixels[1], [90, 0, 0, 255]);
    assert_eq!(pixels[2], [150, 0, 0, 255]);
    assert_eq!(pixels[3], [210, 0, 0, 255]);
}

#[test]
fn radial_gradient_is_radially_ordered() {
    let lut: Vec<PremulRgba8> = (0..4).map(|i| premul(i * 60, 0, 0, 255)).collect();
    let (fetch, fetch_type) = FetchData::gradient_radial(
        &lut,
        ExtendMode::Pad,
        GradientQuality::Nearest,
        Point::new(2.0, 2.0),
        2.0,
        Affine::IDENTITY,
    )
    .unwrap();

    let fill = FillData::box_a(255, 0, 0, 4, 4);
    let pixels = run_prgb32(4, 4, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    // Distance from the center at the pixel nearest it vs. a corner.
    assert_eq!(pixels[2 * 4 + 2], [60, 0, 0, 255]);
    assert_eq!(pixels[0], [180, 0, 0, 255]);
}

#[test]
fn conic_gradient_sweeps_by_angle() {
    let lut: Vec<PremulRgba8> = (0..4).map(|i| premul(i * 60, 0, 0, 255)).collect();
    let (fetch, fetch_type) = FetchData::gradient_conic(
        &lut,
        GradientQuality::Nearest,
        Point::new(1.0, 1.0),
        0.0,
        Affine::IDENTITY,
    )
    .unwrap();

    let fill = FillData::box_a(255, 0, 0, 2, 2);
    let pixels = run_prgb32(2, 2, [0, 0, 0, 0], CompOp::SrcCopy, &fill, &fetch, fetch_type);

    // Pixel centers sit at 45°, 135°, 225° and 315° around the center:
    // one table quarter each, in sweep order.
    assert_eq!(pixels[3], [0, 0, 0, 255]);
    assert_eq!(pixels[2], [60, 0, 0, 255]);
    assert_eq!(pixels[0], [120, 0, 0, 255]);
    assert_eq!(pixels[1], [180, 0, 0, 255]);
}
