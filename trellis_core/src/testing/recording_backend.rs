// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use kurbo::{BezPath, Shape, Stroke};

use crate::color::{BlendMode, Color, Paint};
use crate::error::BackendError;
use crate::geometry::{Point, Rect, Size};
use crate::render::{
    DoubleBuffer, DrawParams, FillRule, FixedMetrics, PixelBuffer, RenderBackend, TextMetrics,
    TextStyle,
};

/// The font families a [`RecordingBackend`] pretends to have.
pub const RECORDING_FONT_FAMILIES: [&str; 3] = ["sans-serif", "serif", "monospace"];

/// One call received by a [`RecordingBackend`], in device space.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// The surface was cleared.
    Clear(Color),
    /// A path was filled.
    Fill {
        /// The device-space bounding box of the path.
        bounds: kurbo::Rect,
        /// The paint.
        paint: Paint,
        /// The global alpha.
        alpha: f32,
        /// The blend mode.
        blend: BlendMode,
        /// The device-space bounding box of the clip.
        clip: Option<kurbo::Rect>,
    },
    /// A path was stroked.
    Stroke {
        /// The device-space bounding box of the path, ignoring the stroke width.
        bounds: kurbo::Rect,
        /// The stroke width, in user space.
        width: f64,
        /// The paint.
        paint: Paint,
        /// The global alpha.
        alpha: f32,
    },
    /// A line of text was drawn.
    Text {
        /// The text.
        text: String,
        /// The device-space baseline origin.
        origin: kurbo::Point,
        /// The family the backend was asked for.
        family: String,
        /// The font size.
        size: f64,
    },
    /// An image was drawn.
    Image {
        /// The device-space bounding box of the destination.
        dst: kurbo::Rect,
        /// The source width.
        width: u32,
        /// The source height.
        height: u32,
    },
    /// The buffers were swapped.
    SwapBuffers,
}

#[derive(Debug, Default)]
struct RecordingState {
    size: Size<i32>,
    commands: Vec<DrawCommand>,
    presented: Vec<DrawCommand>,
    swaps: usize,
}

/// A [`RenderBackend`] which draws nothing and records every call.
///
/// Clones share the same recording, so a test can keep one clone and hand the other
/// to a [`RenderContext`](crate::render::RenderContext).
///
/// The backend is double buffered: [`DrawCommand::SwapBuffers`] moves the commands
/// recorded since the previous swap to [`presented`](Self::presented).
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    state: Rc<RefCell<RecordingState>>,
}

impl RecordingBackend {
    /// Creates a backend with a surface of `size`.
    pub fn new(size: Size<i32>) -> Self {
        let backend = Self::default();
        backend.state.borrow_mut().size = size;
        backend
    }

    /// The commands recorded since the last swap.
    pub fn commands(&self) -> Vec<DrawCommand> {
        self.state.borrow().commands.clone()
    }

    /// The commands of the last presented frame.
    pub fn presented(&self) -> Vec<DrawCommand> {
        self.state.borrow().presented.clone()
    }

    /// How many times the buffers were swapped.
    pub fn swap_count(&self) -> usize {
        self.state.borrow().swaps
    }

    /// Forgets every recorded command.
    pub fn clear_commands(&self) {
        let mut state = self.state.borrow_mut();
        state.commands.clear();
        state.presented.clear();
    }

    fn push(&self, command: DrawCommand) {
        self.state.borrow_mut().commands.push(command);
    }
}

fn device_bounds(path: &BezPath, params: &DrawParams<'_>) -> kurbo::Rect {
    (params.transform * path.clone()).bounding_box()
}

impl RenderBackend for RecordingBackend {
    fn size(&self) -> Size<i32> {
        self.state.borrow().size
    }

    fn clear(&mut self, color: Color) -> Result<(), BackendError> {
        self.push(DrawCommand::Clear(color));
        Ok(())
    }

    fn fill_path(
        &mut self,
        path: &BezPath,
        _fill_rule: FillRule,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        self.push(DrawCommand::Fill {
            bounds: device_bounds(path, params),
            paint: params.paint.clone(),
            alpha: params.alpha,
            blend: params.blend,
            clip: params.clip.map(|clip| clip.bounds()),
        });
        Ok(())
    }

    fn stroke_path(
        &mut self,
        path: &BezPath,
        stroke: &Stroke,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        self.push(DrawCommand::Stroke {
            bounds: device_bounds(path, params),
            width: stroke.width,
            paint: params.paint.clone(),
            alpha: params.alpha,
        });
        Ok(())
    }

    fn has_font_family(&self, family: &str) -> bool {
        RECORDING_FONT_FAMILIES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(family))
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
        self.push(DrawCommand::Text {
            text: text.to_string(),
            origin: params.transform * kurbo::Point::from(origin),
            family: style.family.clone(),
            size: style.size,
        });
        Ok(())
    }

    fn load_image(&mut self, path: &Path) -> Result<PixelBuffer, BackendError> {
        Err(BackendError::ImageLoad {
            path: path.display().to_string(),
            reason: "the recording backend has no file system".into(),
        })
    }

    fn draw_image(
        &mut self,
        image: &PixelBuffer,
        dst: Rect<f64>,
        params: &DrawParams<'_>,
    ) -> Result<(), BackendError> {
        let dst = params.transform.transform_rect_bbox(dst.into());
        self.push(DrawCommand::Image {
            dst,
            width: image.width(),
            height: image.height(),
        });
        Ok(())
    }

    fn read_pixels(&self, _rect: Rect<i32>) -> Result<PixelBuffer, BackendError> {
        Err(BackendError::Other("the recording backend has no pixels".into()))
    }

    fn flush(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    fn double_buffer(&mut self) -> Option<&mut dyn DoubleBuffer> {
        Some(self)
    }

    fn resize(&mut self, size: Size<i32>) -> Result<(), BackendError> {
        self.state.borrow_mut().size = size;
        Ok(())
    }
}

impl DoubleBuffer for RecordingBackend {
    fn swap_buffers(&mut self) {
        let mut state = self.state.borrow_mut();
        state.presented = std::mem::take(&mut state.commands);
        state.presented.push(DrawCommand::SwapBuffers);
        state.swaps += 1;
    }

    fn front_buffer(&self) -> PixelBuffer {
        let size = self.state.borrow().size;
        PixelBuffer::new(
            u32::try_from(size.width).unwrap_or_default(),
            u32::try_from(size.height).unwrap_or_default(),
        )
    }
}
