// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stored pixel formats.

/// The in-memory format of a pixel buffer.
///
/// The enumeration is closed: every format a surface or pattern source can
/// have is listed here, and every pipeline backend has to support all of
/// them. Adding a new format means extending the reference backend and the
/// pixel I/O table for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum PixelFormat {
    /// 32-bit premultiplied RGBA, bytes in `[r, g, b, a]` memory order.
    Prgb32 = 0,
    /// 32-bit opaque RGB, bytes in `[r, g, b, x]` memory order.
    ///
    /// The fourth byte carries no information; it reads as fully opaque and
    /// is written as `0xFF`.
    Xrgb32 = 1,
    /// 8-bit alpha-only.
    A8 = 2,
}

impl PixelFormat {
    /// Number of pixel formats.
    pub const COUNT: usize = 3;

    /// All pixel formats, indexable by discriminant.
    pub const ALL: [Self; Self::COUNT] = [Self::Prgb32, Self::Xrgb32, Self::A8];

    /// Convert a raw field value back into a format.
    ///
    /// Out-of-range values are a caller bug.
    #[inline]
    pub fn from_u32(value: u32) -> Self {
        debug_assert!((value as usize) < Self::COUNT, "invalid pixel format {value}");
        Self::ALL[value as usize]
    }

    /// Bytes per stored pixel.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Prgb32 | Self::Xrgb32 => 4,
            Self::A8 => 1,
        }
    }

    /// Whether the format stores an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::Prgb32 | Self::A8)
    }

    /// Whether the format stores color channels.
    #[inline]
    pub const fn has_rgb(self) -> bool {
        matches!(self, Self::Prgb32 | Self::Xrgb32)
    }
}
