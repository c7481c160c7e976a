// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::path::Path;

use kurbo::BezPath;
use tiny_skia::{FilterQuality, Mask, Pixmap, Shader, SpreadMode, Transform};
use tracing::{debug, trace};
use trellis_core::color::Color;
use trellis_core::error::BackendError;
use trellis_core::geometry::{Point, Rect, Size};
use trellis_core::render::{
    ClipRegion, DoubleBuffer, DrawParams, FillRule, FixedMetrics, PixelBuffer, RenderBackend,
    TextMetrics, TextStyle,
};

use crate::{convert, pixels, text};

/// A [`RenderBackend`] which rasterizes into memory with tiny-skia.
///
/// Draw calls go to a back buffer. [`DoubleBuffer::swap_buffers`] presents it, after
/// which the new back buffer starts as a copy of the presented frame.
///
/// Text is drawn as one box per character, placed with [`FixedMetrics`].
pub struct RasterBackend {
    size: Size<i32>,
    back: Pixmap,
    front: Pixmap,
    swaps: usize,
    /// The mask of the last clip seen, reused while the clip does not change.
    mask: Option<(ClipRegion, Mask)>,
}

fn allocate(size: Size<i32>) -> Result<Pixmap, BackendError> {
    // tiny-skia has no empty pixmaps; a zero-sized surface keeps one unreachable pixel.
    let width = u32::try_from(size.width.max(1)).unwrap_or(1);
    let height = u32::try_from(size.height.max(1)).unwrap_or(1);
    Pixmap::new(width, height).ok_or(BackendError::Surface { width, height })
}

fn sk_paint<'a>(shader: Shader<'a>, params: &DrawParams<'_>) -> tiny_skia::Paint<'a> {
    tiny_skia::Paint {
        shader,
        blend_mode: convert::blend_mode(params.blend),
        anti_alias: true,
        ..tiny_skia::Paint::default()
    }
}

impl RasterBackend {
    /// Creates a transparent surface of `size`.
    pub fn new(size: Size<i32>) -> Result<Self, BackendError> {
        let back = allocate(size)?;
        let front = back.clone();
        Ok(Self {
            size,
            back,
            front,
            swaps: 0,
            mask: None,
        })
    }

    /// The back buffer, which draw calls write to.
    pub fn pixmap(&self) -> &Pixmap {
        &self.back
    }

    /// How many times the buffers were swapped.
    pub fn swap_count(&self) -> usize {
        self.swaps
    }

    /// Builds the mask for `clip`, or reuses the previous one.
    ///
    /// Returns `false` if the clip is empty, meaning nothing can be drawn.
    fn prepare_mask(&mut self, clip: Option<&ClipRegion>) -> bool {
        let Some(clip) = clip else {
            return true;
        };
        if clip.is_empty() {
            return false;
        }
        if self.mask.as_ref().is_some_and(|(cached, _)| cached == clip) {
            return true;
        }
        let Some(mut mask) = Mask::new(self.back.width(), self.back.height()) else {
            return false;
        };
        let mut first = true;
        for shape in clip.shapes() {
            let Some(path) = convert::path(shape) else {
                // A shape with no area leaves nothing visible.
                return false;
            };
            if first {
                mask.fill_path(
                    &path,
                    tiny_skia::FillRule::Winding,
                    true,
                    Transform::identity(),
                );
                first = false;
            } else {
                mask.intersect_path(
                    &path,
                    tiny_skia::FillRule::Winding,
                    true,
                    Transform::identity(),
                );
            }
        }
        self.mask = Some((clip.clone(), mask));
        true
    }

    fn fill(
        &mut self,
        path: &BezPath,
        fill_rule: FillRule,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        let paint = params.paint.with_alpha_factor(params.alpha);
        let Some(shader) = convert::shader(&paint) else {
            return Ok(());
        };
        let Some(path) = convert::path(path) else {
            return Ok(());
        };
        if !self.prepare_mask(params.clip) {
            return Ok(());
        }
        let mask = params.clip.and(self.mask.as_ref().map(|(_, mask)| mask));
        self.back.fill_path(
            &path,
            &sk_paint(shader, params),
            convert::fill_rule(fill_rule),
            convert::transform(params.transform),
            mask,
        );
        Ok(())
    }
}

impl RenderBackend for RasterBackend {
    fn size(&self) -> Size<i32> {
        self.size
    }

    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        self.back.fill(convert::color(color));
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        fill_rule: FillRule,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        self.fill(path, fill_rule, params)
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &kurbo::Stroke,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        if stroke.width <= 0. {
            return Ok(());
        }
        let paint = params.paint.with_alpha_factor(params.alpha);
        let Some(shader) = convert::shader(&paint) else {
            return Ok(());
        };
        let Some(path) = convert::path(path) else {
            return Ok(());
        };
        if !self.prepare_mask(params.clip) {
            return Ok(());
        }
        let mask = params.clip.and(self.mask.as_ref().map(|(_, mask)| mask));
        self.back.stroke_path(
            &path,
            &sk_paint(shader, params),
            &convert::stroke(stroke),
            convert::transform(params.transform),
            mask,
        );
        Ok(())
    }

    fn has_font_family(&self, family: &str) -> bool {
        text::has_family(family)
    }

    fn measure_text(&self, text: &str, style: &TextStyle) -> TextMetrics {
        FixedMetrics::measure(text, style)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point<f64>,
        style: &TextStyle,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        let boxes = text::glyph_boxes(text, origin.into(), style);
        self.fill(&boxes, FillRule::NonZero, params)
    }

    fn load_image(&mut self, path: &Path) -> Result<PixelBuffer, BackendError> {
        pixels::load_image(path)
    }

    fn draw_image(
        &mut self,
        image: &PixelBuffer,
        dst: Rect<f64>,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        if params.alpha <= 0. || dst.is_empty() {
            return Ok(());
        }
        let Some(source) = pixels::to_pixmap(image) else {
            return Ok(());
        };
        let Some(rect) = tiny_skia::Rect::from_xywh(
            convert::to_f32(dst.x),
            convert::to_f32(dst.y),
            convert::to_f32(dst.width),
            convert::to_f32(dst.height),
        ) else {
            return Err(BackendError::InvalidGeometry(format!(
                "image destination {dst:?}"
            )));
        };
        if !self.prepare_mask(params.clip) {
            return Ok(());
        }
        // Maps image pixels onto the destination, in user space.
        let placement = Transform::from_row(
            rect.width() / source.width() as f32,
            0.,
            0.,
            rect.height() / source.height() as f32,
            rect.x(),
            rect.y(),
        );
        let shader = tiny_skia::Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            params.alpha.clamp(0., 1.),
            placement,
        );
        let mask = params.clip.and(self.mask.as_ref().map(|(_, mask)| mask));
        self.back.fill_rect(
            rect,
            &sk_paint(shader, params),
            convert::transform(params.transform),
            mask,
        );
        Ok(())
    }

    fn read_pixels(&self, rect: Rect<i32>) -> Result<PixelBuffer, BackendError> {
        // Pixels beyond the logical size are not part of the surface.
        let visible = rect.intersect(&Rect::new(0, 0, self.size.width, self.size.height));
        let mut out = PixelBuffer::new(
            u32::try_from(rect.width).unwrap_or(0),
            u32::try_from(rect.height).unwrap_or(0),
        );
        if visible.is_empty() {
            return Ok(out);
        }
        let region = pixels::read_pixmap(&self.back, visible);
        let offset_x = u32::try_from(visible.x - rect.x).unwrap_or(0);
        let offset_y = u32::try_from(visible.y - rect.y).unwrap_or(0);
        for y in 0..region.height() {
            for x in 0..region.width() {
                if let Some(color) = region.pixel(x, y) {
                    out.set_pixel(x + offset_x, y + offset_y, color);
                }
            }
        }
        Ok(out)
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn double_buffer(&mut self) -> Option<&mut dyn DoubleBuffer> {
        Some(self)
    }

    fn resize(&mut self, size: Size<i32>) -> Result<(), BackendError> {
        if size == self.size {
            return Ok(());
        }
        debug!("Resizing raster surface from {:?} to {size:?}", self.size);
        self.back = allocate(size)?;
        self.front = self.back.clone();
        self.size = size;
        self.mask = None;
        Ok(())
    }
}

impl DoubleBuffer for RasterBackend {
    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.back, &mut self.front);
        self.back.data_mut().copy_from_slice(self.front.data());
        self.swaps += 1;
        trace!(swaps = self.swaps, "Presented raster frame");
    }

    fn front_buffer(&self) -> PixelBuffer {
        let rect = Rect::new(0, 0, self.size.width, self.size.height);
        pixels::read_pixmap(&self.front, rect)
    }
}

impl fmt::Debug for RasterBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterBackend")
            .field("size", &self.size)
            .field("swaps", &self.swaps)
            .finish_non_exhaustive()
    }
}
