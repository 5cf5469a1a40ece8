// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The destination surface descriptor.

use crate::format::PixelFormat;
use peniko::color::PremulRgba8;

/// A mutable view of the destination pixels a pipeline composites into.
///
/// The surface does not own its pixels; the context layer hands one in per
/// draw call. Fill routines assume the geometry they receive has already
/// been clipped to the surface bounds — out-of-bounds coordinates are a
/// caller bug, not a run-time error.
#[derive(Debug)]
pub struct Surface<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
}

impl<'a> Surface<'a> {
    /// Create a surface over a tightly packed pixel buffer.
    pub fn new(data: &'a mut [u8], width: u32, height: u32, format: PixelFormat) -> Self {
        let stride = width as usize * format.bytes_per_pixel();
        Self::from_parts(data, width, height, stride, format)
    }

    /// Create a surface over a pixel buffer with an explicit row stride in
    /// bytes.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is too small for the given dimensions.
    pub fn from_parts(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: usize,
        format: PixelFormat,
    ) -> Self {
        let row_bytes = width as usize * format.bytes_per_pixel();
        assert!(stride >= row_bytes, "stride smaller than a pixel row");
        if height > 0 {
            let required = stride * (height as usize - 1) + row_bytes;
            assert!(data.len() >= required, "pixel buffer too small for surface");
        }

        Self {
            data,
            width,
            height,
            stride,
            format,
        }
    }

    /// Create a tightly packed premultiplied RGBA surface over typed pixels.
    pub fn from_premul_pixels(pixels: &'a mut [PremulRgba8], width: u32, height: u32) -> Self {
        Self::new(
            bytemuck::cast_slice_mut(pixels),
            width,
            height,
            PixelFormat::Prgb32,
        )
    }

    /// The width of the surface in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the surface in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The row stride in bytes.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The stored pixel format.
    #[inline]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// The raw bytes of one pixel row.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        debug_assert!(y < self.height, "row outside the surface");
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.format.bytes_per_pixel()]
    }

    /// Mutable access to the raw bytes of one pixel row.
    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        debug_assert!(y < self.height, "row outside the surface");
        let start = y as usize * self.stride;
        &mut self.data[start..start + self.width as usize * self.format.bytes_per_pixel()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_respect_stride() {
        let mut data = vec![0_u8; 3 * 10];
        let mut surface = Surface::from_parts(&mut data, 2, 3, 10, PixelFormat::Prgb32);

        surface.row_mut(1)[0] = 7;
        assert_eq!(surface.row(1)[0], 7);
        assert_eq!(surface.row(1).len(), 8);

        drop(surface);
        assert_eq!(data[10], 7);
    }

    #[test]
    fn premul_pixels_view() {
        let mut pixels = vec![PremulRgba8 { r: 0, g: 0, b: 0, a: 0 }; 4];
        let mut surface = Surface::from_premul_pixels(&mut pixels, 2, 2);
        surface.row_mut(0)[..4].copy_from_slice(&[1, 2, 3, 4]);
        drop(surface);

        assert_eq!(pixels[0], PremulRgba8 { r: 1, g: 2, b: 3, a: 4 });
    }

    #[test]
    #[should_panic(expected = "pixel buffer too small")]
    fn undersized_buffer_is_rejected() {
        let mut data = vec![0_u8; 15];
        let _ = Surface::new(&mut data, 2, 2, PixelFormat::Prgb32);
    }
}
