// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use crate::color::Color;
use crate::geometry::Rect;

/// A CPU-side image in straight RGBA8, rows top to bottom.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Creates a transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Wraps existing RGBA8 data.
    ///
    /// Returns `None` if `data` does not hold exactly `width * height` pixels.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == byte_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the buffer holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The raw RGBA8 bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The raw RGBA8 bytes, mutably.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the buffer, returning its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y as usize * self.width as usize + x as usize) * 4)
    }

    /// The pixel at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let i = self.offset(x, y)?;
        let p = &self.data[i..i + 4];
        Some(Color::from_rgba8(p[0], p[1], p[2], p[3]))
    }

    /// Writes the pixel at `(x, y)`. Writes outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if let Some(i) = self.offset(x, y) {
            self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Sets every pixel to `color`.
    pub fn fill(&mut self, color: Color) {
        for pixel in self.data.chunks_exact_mut(4) {
            pixel.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Changes the dimensions, keeping the overlapping top-left region.
    ///
    /// New pixels are transparent.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        let mut resized = Self::new(width, height);
        let copy_w = self.width.min(width) as usize * 4;
        for y in 0..self.height.min(height) as usize {
            let src = y * self.width as usize * 4;
            let dst = y * width as usize * 4;
            resized.data[dst..dst + copy_w].copy_from_slice(&self.data[src..src + copy_w]);
        }
        *self = resized;
    }

    /// Copies out the pixels within `rect`.
    ///
    /// The result has the size of `rect`; parts outside the buffer are transparent.
    pub fn read_pixels(&self, rect: Rect<i32>) -> Self {
        let width = u32::try_from(rect.width).unwrap_or(0);
        let height = u32::try_from(rect.height).unwrap_or(0);
        let mut out = Self::new(width, height);
        for dy in 0..height {
            for dx in 0..width {
                let sx = i64::from(rect.x) + i64::from(dx);
                let sy = i64::from(rect.y) + i64::from(dy);
                let (Ok(sx), Ok(sy)) = (u32::try_from(sx), u32::try_from(sy)) else {
                    continue;
                };
                if let Some(color) = self.pixel(sx, sy) {
                    out.set_pixel(dx, dy, color);
                }
            }
        }
        out
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 4
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_keeps_top_left() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.set_pixel(1, 1, Color::RED);
        buffer.set_pixel(3, 3, Color::BLUE);
        buffer.resize(2, 3);
        assert_eq!(buffer.width(), 2);
        assert_eq!(buffer.as_bytes().len(), 2 * 3 * 4);
        assert_eq!(buffer.pixel(1, 1), Some(Color::RED));
        assert_eq!(buffer.pixel(3, 3), None);

        buffer.resize(5, 5);
        assert_eq!(buffer.pixel(1, 1), Some(Color::RED));
        assert_eq!(buffer.pixel(4, 4), Some(Color::TRANSPARENT));
    }

    #[test]
    fn read_pixels_clips_to_buffer() {
        let mut buffer = PixelBuffer::new(3, 3);
        buffer.fill(Color::GREEN);
        let region = buffer.read_pixels(Rect::new(-1, 2, 3, 2));
        assert_eq!((region.width(), region.height()), (3, 2));
        assert_eq!(region.pixel(0, 0), Some(Color::TRANSPARENT));
        assert_eq!(region.pixel(1, 0), Some(Color::GREEN));
        assert_eq!(region.pixel(1, 1), Some(Color::TRANSPARENT));
    }

    #[test]
    fn from_rgba8_checks_length() {
        assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 16]).is_some());
        assert!(PixelBuffer::from_rgba8(2, 2, vec![0; 15]).is_none());
    }
}
