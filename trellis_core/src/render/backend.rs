// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use kurbo::{Affine, BezPath, Stroke};

use crate::color::{BlendMode, Color, Paint};
use crate::error::BackendError;
use crate::geometry::{Point, Rect, Size};
use crate::render::{ClipRegion, FillRule, PixelBuffer, TextMetrics, TextStyle};

/// Everything a backend needs to composite one draw call.
#[derive(Clone, Copy, Debug)]
pub struct DrawParams<'a> {
    /// Maps the call's user-space geometry to device space.
    pub transform: Affine,
    /// The device-space clip, or `None` when unclipped.
    pub clip: Option<&'a ClipRegion>,
    /// The paint, in user space.
    pub paint: &'a Paint,
    /// Global alpha. Backends multiply it into the paint.
    pub alpha: f32,
    /// How the result is composited.
    pub blend: BlendMode,
}

/// The drawing operations a backend provides to a [`RenderContext`](super::RenderContext).
///
/// Geometry arrives in user space along with the transform to apply, so that stroke
/// widths scale with the transform. Clips arrive already in device space.
///
/// Drawing outside the surface or the clip must be a silent no-op.
pub trait RenderBackend {
    /// The surface size in device pixels.
    fn size(&self) -> Size<i32>;

    /// Fills the whole surface with `color`, ignoring clip and blend mode.
    fn clear(&mut self, color: Color) -> Result<(), BackendError>;

    /// Fills `path`.
    fn fill_path(
        &mut self,
        path: &BezPath,
        fill_rule: FillRule,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError>;

    /// Strokes `path`.
    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError>;

    /// Whether the backend can render `family` without falling back.
    fn has_font_family(&self, family: &str) -> bool;

    /// Measures one line of `text`.
    fn measure_text(&self, text: &str, style: &TextStyle) -> TextMetrics;

    /// Draws one line of `text` with its baseline starting at `origin`.
    ///
    /// Glyphs the backend cannot render use its default glyph.
    fn draw_text(
        &mut self,
        text: &str,
        origin: Point<f64>,
        style: &TextStyle,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError>;

    /// Loads and decodes an image file.
    fn load_image(&mut self, path: &Path) -> Result<PixelBuffer, BackendError>;

    /// Draws `image` scaled into the user-space rectangle `dst`.
    ///
    /// The paint in `params` is ignored.
    fn draw_image(
        &mut self,
        image: &PixelBuffer,
        dst: Rect<f64>,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError>;

    /// Reads back the pixels of the surface being drawn into.
    fn read_pixels(&self, rect: Rect<i32>) -> Result<PixelBuffer, BackendError>;

    /// Commits pending operations.
    fn flush(&mut self) -> Result<(), BackendError>;

    /// The double buffering capability, if the backend has one.
    fn double_buffer(&mut self) -> Option<&mut dyn DoubleBuffer> {
        None
    }

    /// Resizes the surface, discarding its content.
    fn resize(&mut self, size: Size<i32>) -> Result<(), BackendError>;
}

/// A surface which draws into a hidden staging buffer and presents it on swap.
pub trait DoubleBuffer {
    /// Makes the staging buffer visible.
    ///
    /// The new staging buffer starts with a copy of what was just presented.
    fn swap_buffers(&mut self);

    /// A copy of the visible buffer.
    fn front_buffer(&self) -> PixelBuffer;
}
