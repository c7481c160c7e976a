// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Moving pixels between [`PixelBuffer`]s, tiny-skia pixmaps and image files.

use std::path::Path;

use image::{ImageFormat, ImageReader, RgbaImage};
use tiny_skia::{ColorU8, IntSize, Pixmap};
use trellis_core::color::Color;
use trellis_core::error::BackendError;
use trellis_core::geometry::Rect;
use trellis_core::render::PixelBuffer;

fn load_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::ImageLoad {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Loads and decodes an image file, guessing its format from the content.
pub fn load_image(path: &Path) -> Result<PixelBuffer, BackendError> {
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|err| load_error(path, err))?
        .decode()
        .map_err(|err| load_error(path, err))?
        .to_rgba8();
    let (width, height) = image.dimensions();
    PixelBuffer::from_rgba8(width, height, image.into_raw())
        .ok_or_else(|| load_error(path, "decoded image has an unexpected length"))
}

/// Converts a buffer into an [`RgbaImage`].
pub fn to_rgba_image(buffer: &PixelBuffer) -> RgbaImage {
    RgbaImage::from_raw(buffer.width(), buffer.height(), buffer.as_bytes().to_vec())
        .unwrap_or_else(|| RgbaImage::new(buffer.width(), buffer.height()))
}

/// Writes a buffer to `path` as a PNG file.
pub fn save_png(buffer: &PixelBuffer, path: &Path) -> Result<(), BackendError> {
    to_rgba_image(buffer)
        .save_with_format(path, ImageFormat::Png)
        .map_err(|err| BackendError::Other(format!("cannot save {}: {err}", path.display())))
}

/// Premultiplies a straight RGBA buffer into a pixmap.
///
/// Returns `None` for empty buffers, which tiny-skia cannot represent.
pub(crate) fn to_pixmap(buffer: &PixelBuffer) -> Option<Pixmap> {
    let size = IntSize::from_wh(buffer.width(), buffer.height())?;
    let data = buffer
        .as_bytes()
        .chunks_exact(4)
        .flat_map(|p| {
            let c = ColorU8::from_rgba(p[0], p[1], p[2], p[3]).premultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    Pixmap::from_vec(data, size)
}

/// Copies the pixels of `pixmap` within `rect` into a straight RGBA buffer.
///
/// Parts of `rect` outside the pixmap are transparent.
pub(crate) fn read_pixmap(pixmap: &Pixmap, rect: Rect<i32>) -> PixelBuffer {
    let width = u32::try_from(rect.width).unwrap_or(0);
    let height = u32::try_from(rect.height).unwrap_or(0);
    let mut out = PixelBuffer::new(width, height);
    for dy in 0..height {
        let Ok(sy) = u32::try_from(i64::from(rect.y) + i64::from(dy)) else {
            continue;
        };
        for dx in 0..width {
            let Ok(sx) = u32::try_from(i64::from(rect.x) + i64::from(dx)) else {
                continue;
            };
            if let Some(p) = pixmap.pixel(sx, sy) {
                let c = p.demultiply();
                out.set_pixel(dx, dy, Color::from_rgba8(c.red(), c.green(), c.blue(), c.alpha()));
            }
        }
    }
    out
}

/// The whole pixmap as a straight RGBA buffer.
pub(crate) fn pixmap_to_buffer(pixmap: &Pixmap) -> PixelBuffer {
    let width = i32::try_from(pixmap.width()).unwrap_or(i32::MAX);
    let height = i32::try_from(pixmap.height()).unwrap_or(i32::MAX);
    read_pixmap(pixmap, Rect::new(0, 0, width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixmap_round_trip_keeps_straight_alpha() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.set_pixel(0, 0, Color::from_rgba8(255, 0, 0, 255));
        buffer.set_pixel(1, 0, Color::from_rgba8(0, 0, 255, 0));
        let pixmap = to_pixmap(&buffer).unwrap();
        let back = pixmap_to_buffer(&pixmap);
        assert_eq!(back.pixel(0, 0), Some(Color::RED), "opaque pixels survive");
        // Fully transparent pixels lose their color when premultiplied.
        assert_eq!(back.pixel(1, 0), Some(Color::TRANSPARENT), "transparent pixel");
    }

    #[test]
    fn empty_buffers_have_no_pixmap() {
        assert!(to_pixmap(&PixelBuffer::new(0, 4)).is_none(), "zero width");
    }

    #[test]
    fn missing_file_is_an_image_load_error() {
        let err = load_image(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(
            matches!(err, BackendError::ImageLoad { ref path, .. } if path.ends_with("here.png")),
            "unexpected error: {err}"
        );
    }
}
