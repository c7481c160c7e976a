// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;

use hashbrown::{HashMap, HashSet};
use kurbo::{Affine, BezPath, Cap, Join, PathEl, Shape, Vec2};
use tracing::trace;

use crate::color::{BlendMode, Color, Paint};
use crate::core::WindowId;
use crate::error::{ErrorKind, ErrorRecord, ErrorSink, RenderError};
use crate::geometry::{Rect, Size};
use crate::render::text::DEFAULT_FONT_FAMILY;
use crate::render::{
    ClipRegion, DrawParams, FillRule, FitMode, HorizontalAlignment, ImageSource, PixelBuffer,
    RenderBackend, RenderState, TextAlignment, TextStyle, VerticalAlignment, fit_image,
};

const ARC_TOLERANCE: f64 = 0.1;

/// The drawing surface handed to elements while they paint.
///
/// A context owns a [`RenderBackend`] and a stack of [`RenderState`]s. The current
/// state is always on top of the stack, and the bottom entry can never be popped.
///
/// Paths are recorded in user space and only transformed when they are filled or
/// stroked, so `fill_path` and `stroke_path` on the same path ink the same geometry.
///
/// Failures never propagate out of drawing calls: a draw which cannot happen is
/// skipped and reported through the context's [`ErrorSink`].
pub struct RenderContext {
    backend: Box<dyn RenderBackend>,
    current: RenderState,
    saved: Vec<RenderState>,
    path: BezPath,
    current_point: Option<kurbo::Point>,
    subpath_start: Option<kurbo::Point>,
    needs_move: bool,
    errors: ErrorSink,
    window: Option<WindowId>,
    images: HashMap<PathBuf, PixelBuffer>,
    reported: HashSet<String>,
    frame_depth: Option<usize>,
}

// --- MARK: CONSTRUCTION
impl RenderContext {
    /// Creates a context drawing into `backend` and reporting to `errors`.
    pub fn new(backend: Box<dyn RenderBackend>, errors: ErrorSink) -> Self {
        Self {
            backend,
            current: RenderState::default(),
            saved: Vec::new(),
            path: BezPath::new(),
            current_point: None,
            subpath_start: None,
            needs_move: false,
            errors,
            window: None,
            images: HashMap::new(),
            reported: HashSet::new(),
            frame_depth: None,
        }
    }

    /// Attaches the window whose surface this context draws into, for error reports.
    pub fn set_window(&mut self, window: WindowId) {
        self.window = Some(window);
    }

    /// The surface size in device pixels.
    pub fn size(&self) -> Size<i32> {
        self.backend.size()
    }

    /// Resizes the surface. Its content is discarded.
    pub fn resize(&mut self, size: Size<i32>) {
        if let Err(err) = self.backend.resize(size) {
            self.report(ErrorKind::BackendFault, format!("resize: {err}"));
        }
    }

    /// The backend this context draws into.
    pub fn backend(&self) -> &dyn RenderBackend {
        &*self.backend
    }

    /// The backend this context draws into.
    pub fn backend_mut(&mut self) -> &mut dyn RenderBackend {
        &mut *self.backend
    }

    fn report(&self, kind: ErrorKind, message: String) {
        let mut record = ErrorRecord::new(kind, message);
        record.window = self.window;
        self.errors.report(record);
    }

    fn report_once(&mut self, key: String, kind: ErrorKind, message: String) {
        if self.reported.insert(key) {
            self.report(kind, message);
        }
    }
}

// --- MARK: FRAME
impl RenderContext {
    /// Starts a frame from the defined initial state.
    ///
    /// A context left with pushed states by a previous frame is reported and reset.
    pub fn begin_frame(&mut self) {
        if !self.saved.is_empty() {
            self.report(
                ErrorKind::InvariantBreach,
                format!("frame started at state depth {}", self.depth()),
            );
        }
        self.saved.clear();
        self.current = RenderState::default();
        self.begin_path();
        self.frame_depth = Some(self.depth());
    }

    /// Ends a frame and flushes the backend.
    ///
    /// If the state stack is deeper than at [`begin_frame`](Self::begin_frame), the
    /// imbalance is reported, the extra states are discarded and an error is returned.
    pub fn end_frame(&mut self) -> Result<(), RenderError> {
        let expected = self.frame_depth.take().unwrap_or(1);
        let found = self.depth();
        self.flush();
        if found != expected {
            self.report(
                ErrorKind::InvariantBreach,
                format!("frame ended at state depth {found}, expected {expected}"),
            );
            self.restore_depth(expected);
            return Err(RenderError::UnbalancedFrame { expected, found });
        }
        Ok(())
    }

    /// Commits pending operations.
    pub fn flush(&mut self) {
        if let Err(err) = self.backend.flush() {
            self.report(ErrorKind::BackendFault, format!("flush: {err}"));
        }
    }

    /// Fills the whole surface, ignoring clip, transform and blend mode.
    ///
    /// `None` clears to transparent.
    pub fn clear(&mut self, color: Option<Color>) {
        if let Err(err) = self.backend.clear(color.unwrap_or(Color::TRANSPARENT)) {
            self.report(ErrorKind::BackendFault, format!("clear: {err}"));
        }
    }

    /// Reads back a device-space region of the surface being drawn into.
    pub fn capture_buffer(&self, rect: Rect<i32>) -> Result<PixelBuffer, RenderError> {
        Ok(self.backend.read_pixels(rect)?)
    }

    /// Presents the staging buffer, if the backend is double buffered.
    pub fn swap_buffers(&mut self) -> Result<(), RenderError> {
        let buffer = self
            .backend
            .double_buffer()
            .ok_or(RenderError::Unsupported("double buffering"))?;
        buffer.swap_buffers();
        Ok(())
    }

    /// A copy of the presented buffer, if the backend is double buffered.
    pub fn front_buffer(&mut self) -> Result<PixelBuffer, RenderError> {
        let buffer = self
            .backend
            .double_buffer()
            .ok_or(RenderError::Unsupported("double buffering"))?;
        Ok(buffer.front_buffer())
    }
}

// --- MARK: STATE
impl RenderContext {
    /// The number of states on the stack, including the current one.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    /// The current state.
    pub fn state(&self) -> &RenderState {
        &self.current
    }

    /// Saves a copy of the current state.
    pub fn push_state(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Restores the most recently pushed state.
    ///
    /// Popping the bottom of the stack is refused and reported.
    pub fn pop_state(&mut self) -> Result<(), RenderError> {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                Ok(())
            }
            None => {
                self.report(
                    ErrorKind::InvariantBreach,
                    "pop_state called on the bottom of the state stack".into(),
                );
                Err(RenderError::StackUnderflow)
            }
        }
    }

    /// Resets the current state to the initial state, without touching the stack.
    pub fn reset_state(&mut self) {
        self.current = RenderState::default();
    }

    /// Pushes a state which is popped when the returned guard is dropped.
    ///
    /// The guard dereferences to the context.
    pub fn save(&mut self) -> StateGuard<'_> {
        self.push_state();
        let depth = self.depth();
        StateGuard { ctx: self, depth }
    }

    fn restore_depth(&mut self, depth: usize) {
        let keep = depth.max(1) - 1;
        if self.saved.len() > keep {
            self.saved.truncate(keep + 1);
            if let Some(state) = self.saved.pop() {
                self.current = state;
            }
        }
    }

    /// Sets the paint used by fills.
    pub fn set_fill(&mut self, paint: impl Into<Paint>) {
        self.current.fill = paint.into();
    }

    /// Sets the paint used by strokes.
    pub fn set_stroke(&mut self, paint: impl Into<Paint>) {
        self.current.stroke = paint.into();
    }

    /// Sets the global alpha, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f32) {
        self.current.alpha = alpha.clamp(0., 1.);
    }

    /// Sets the blend mode of later draw calls.
    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.current.blend = blend;
    }

    /// Sets the stroke width in user units.
    pub fn set_line_width(&mut self, width: f64) {
        self.current.line_width = width.max(0.);
    }

    /// Sets the stroke cap.
    pub fn set_line_cap(&mut self, cap: Cap) {
        self.current.line_cap = cap;
    }

    /// Sets the stroke join.
    pub fn set_line_join(&mut self, join: Join) {
        self.current.line_join = join;
    }

    /// Sets the dash pattern. An empty pattern draws solid lines.
    pub fn set_dash(&mut self, pattern: &[f64], offset: f64) {
        self.current.dash = pattern.to_vec();
        self.current.dash_offset = offset;
    }

    /// Sets the miter limit.
    pub fn set_miter_limit(&mut self, limit: f64) {
        self.current.miter_limit = limit;
    }

    /// Sets the fill rule used by `fill_path`.
    pub fn set_fill_rule(&mut self, rule: FillRule) {
        self.current.fill_rule = rule;
    }

    /// Sets the text style.
    pub fn set_text_style(&mut self, style: TextStyle) {
        self.current.text_style = style;
    }
}

// --- MARK: TRANSFORM
impl RenderContext {
    /// The current user-to-device transform.
    pub fn transform(&self) -> Affine {
        self.current.transform
    }

    /// Moves the user space origin.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.current.transform *= Affine::translate((dx, dy));
    }

    /// Rotates user space clockwise (y-down) by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.current.transform *= Affine::rotate(radians);
    }

    /// Scales user space.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.current.transform *= Affine::scale_non_uniform(sx, sy);
    }

    /// Replaces the transform with the matrix `[a c e; b d f]`.
    pub fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) {
        self.current.transform = Affine::new([a, b, c, d, e, f]);
    }

    /// Restores the identity transform.
    pub fn reset_transform(&mut self) {
        self.current.transform = Affine::IDENTITY;
    }
}

// --- MARK: CLIP
impl RenderContext {
    /// Replaces the clip with `rect` in current user space.
    pub fn set_clip_rect(&mut self, rect: Rect<f64>) {
        self.current.clip = Some(ClipRegion::new(
            &kurbo::Rect::from(rect),
            self.current.transform,
        ));
    }

    /// Intersects the clip with `rect` in current user space.
    pub fn clip_rect(&mut self, rect: Rect<f64>) {
        let transform = self.current.transform;
        let rect = kurbo::Rect::from(rect);
        match &mut self.current.clip {
            Some(clip) => clip.intersect(&rect, transform),
            None => self.current.clip = Some(ClipRegion::new(&rect, transform)),
        }
    }

    /// Intersects the clip with the current path.
    pub fn clip_to_path(&mut self) {
        let transform = self.current.transform;
        match &mut self.current.clip {
            Some(clip) => clip.intersect(&self.path, transform),
            None => self.current.clip = Some(ClipRegion::new(&self.path, transform)),
        }
    }

    /// Restores the clip of the enclosing state.
    pub fn clear_clip_rect(&mut self) {
        self.current.clip = self.saved.last().and_then(|state| state.clip.clone());
    }

    fn clipped_out(&self) -> bool {
        self.current.clip.as_ref().is_some_and(ClipRegion::is_empty)
    }
}

// --- MARK: PATHS
impl RenderContext {
    /// The path being built, in user space.
    pub fn path(&self) -> &BezPath {
        &self.path
    }

    /// Discards the current path.
    pub fn begin_path(&mut self) {
        self.path = BezPath::new();
        self.current_point = None;
        self.subpath_start = None;
        self.needs_move = false;
    }

    /// Starts a new subpath at `p`.
    pub fn move_to(&mut self, p: impl Into<kurbo::Point>) {
        let p = p.into();
        self.path.move_to(p);
        self.current_point = Some(p);
        self.subpath_start = Some(p);
        self.needs_move = false;
    }

    /// Makes sure a subpath is open, starting one at `p` if there is none.
    ///
    /// Returns `false` if a new subpath was started at `p`.
    fn ensure_subpath(&mut self, p: kurbo::Point) -> bool {
        if self.needs_move
            && let Some(start) = self.subpath_start
        {
            self.path.move_to(start);
            self.needs_move = false;
        }
        if self.current_point.is_none() {
            self.move_to(p);
            return false;
        }
        true
    }

    /// Adds a straight line to `p`.
    pub fn line_to(&mut self, p: impl Into<kurbo::Point>) {
        let p = p.into();
        if self.ensure_subpath(p) {
            self.path.line_to(p);
            self.current_point = Some(p);
        }
    }

    /// Adds a cubic Bézier curve.
    pub fn curve_to(
        &mut self,
        c1: impl Into<kurbo::Point>,
        c2: impl Into<kurbo::Point>,
        p: impl Into<kurbo::Point>,
    ) {
        let (c1, c2, p) = (c1.into(), c2.into(), p.into());
        self.ensure_subpath(c1);
        self.path.curve_to(c1, c2, p);
        self.current_point = Some(p);
    }

    /// Adds a quadratic Bézier curve.
    pub fn quad_to(&mut self, c: impl Into<kurbo::Point>, p: impl Into<kurbo::Point>) {
        let (c, p) = (c.into(), p.into());
        self.ensure_subpath(c);
        self.path.quad_to(c, p);
        self.current_point = Some(p);
    }

    /// Closes the current subpath.
    ///
    /// The next segment starts at the closed subpath's start point.
    pub fn close_path(&mut self) {
        if self.current_point.is_none() || self.needs_move {
            return;
        }
        self.path.close_path();
        self.current_point = self.subpath_start;
        self.needs_move = true;
    }

    /// Adds a closed rectangle subpath.
    pub fn add_rect(&mut self, rect: Rect<f64>) {
        self.move_to((rect.x, rect.y));
        self.line_to((rect.right(), rect.y));
        self.line_to((rect.right(), rect.bottom()));
        self.line_to((rect.x, rect.bottom()));
        self.close_path();
    }

    /// Adds a closed subpath following any `kurbo` shape.
    pub fn add_shape(&mut self, shape: &impl Shape) {
        for el in shape.path_elements(ARC_TOLERANCE) {
            match el {
                PathEl::MoveTo(p) => self.move_to(p),
                PathEl::LineTo(p) => self.line_to(p),
                PathEl::QuadTo(c, p) => self.quad_to(c, p),
                PathEl::CurveTo(c1, c2, p) => self.curve_to(c1, c2, p),
                PathEl::ClosePath => self.close_path(),
            }
        }
    }

    /// Adds a circular arc around `center`, from `start_angle` to `end_angle`.
    ///
    /// A line connects the current point to the start of the arc. Angles are in
    /// radians, measured clockwise from the positive x axis (y-down).
    pub fn arc(
        &mut self,
        center: impl Into<kurbo::Point>,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counter_clockwise: bool,
    ) {
        let center = center.into();
        let radius = radius.abs();
        let sweep = arc_sweep(start_angle, end_angle, counter_clockwise);
        let start = center + Vec2::from_angle(start_angle) * radius;
        if self.current_point.is_some() {
            self.line_to(start);
        } else {
            self.move_to(start);
        }
        self.append_arc(center, radius, start_angle, sweep);
    }

    /// Adds an arc of `radius` tangent to the lines from the current point to `p1`
    /// and from `p1` to `p2`, connected to the current point by a line.
    pub fn arc_to(&mut self, p1: impl Into<kurbo::Point>, p2: impl Into<kurbo::Point>, radius: f64) {
        let (p1, p2) = (p1.into(), p2.into());
        if !self.ensure_subpath(p1) {
            return;
        }
        let Some(p0) = self.current_point else {
            return;
        };
        let v1 = p0 - p1;
        let v2 = p2 - p1;
        let cross = v1.cross(v2);
        if radius <= 0. || v1.hypot2() == 0. || v2.hypot2() == 0. || cross.abs() < 1e-9 {
            self.line_to(p1);
            return;
        }
        let (n1, n2) = (v1.normalize(), v2.normalize());
        let theta = n1.dot(n2).clamp(-1., 1.).acos();
        let tangent_len = radius / (theta / 2.).tan();
        let center_len = radius / (theta / 2.).sin();
        let t1 = p1 + n1 * tangent_len;
        let center = p1 + (n1 + n2).normalize() * center_len;
        let start_angle = (t1 - center).atan2();
        let end_angle = (p1 + n2 * tangent_len - center).atan2();
        let mut sweep = end_angle - start_angle;
        if sweep > PI {
            sweep -= TAU;
        } else if sweep < -PI {
            sweep += TAU;
        }
        self.line_to(t1);
        self.append_arc(center, radius, start_angle, sweep);
    }

    fn append_arc(&mut self, center: kurbo::Point, radius: f64, start_angle: f64, sweep: f64) {
        let arc = kurbo::Arc {
            center,
            radii: Vec2::new(radius, radius),
            start_angle,
            sweep_angle: sweep,
            x_rotation: 0.,
        };
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.path.push(el);
        }
        self.current_point = Some(center + Vec2::from_angle(start_angle + sweep) * radius);
    }

    /// Fills the current path with the fill paint.
    ///
    /// The path is kept, so it can be stroked afterwards.
    pub fn fill_path(&mut self) {
        let state = &self.current;
        if self.path.elements().is_empty() || state.fill.is_invisible() || state.alpha <= 0. {
            return;
        }
        if let Some(clip) = &state.clip {
            let bounds = state.transform.transform_rect_bbox(self.path.bounding_box());
            if clip.is_empty() || !clip.may_intersect(bounds) {
                trace!("fill_path skipped: outside clip");
                return;
            }
        }
        let params = DrawParams {
            transform: state.transform,
            clip: state.clip.as_ref(),
            paint: &state.fill,
            alpha: state.alpha,
            blend: state.blend,
        };
        let result = self.backend.fill_path(&self.path, state.fill_rule, &params);
        if let Err(err) = result {
            self.report(ErrorKind::BackendFault, format!("fill_path: {err}"));
        }
    }

    /// Strokes the current path with the stroke paint and line settings.
    ///
    /// The path is kept, so it can be filled afterwards.
    pub fn stroke_path(&mut self) {
        let state = &self.current;
        if self.path.elements().is_empty()
            || state.stroke.is_invisible()
            || state.alpha <= 0.
            || state.line_width <= 0.
            || self.clipped_out()
        {
            return;
        }
        let stroke = state.stroke_style();
        let params = DrawParams {
            transform: state.transform,
            clip: state.clip.as_ref(),
            paint: &state.stroke,
            alpha: state.alpha,
            blend: state.blend,
        };
        let result = self.backend.stroke_path(&self.path, &stroke, &params);
        if let Err(err) = result {
            self.report(ErrorKind::BackendFault, format!("stroke_path: {err}"));
        }
    }
}

fn arc_sweep(start: f64, end: f64, counter_clockwise: bool) -> f64 {
    let delta = end - start;
    if counter_clockwise {
        if delta <= -TAU {
            -TAU
        } else {
            let sweep = delta.rem_euclid(TAU);
            if sweep == 0. { 0. } else { sweep - TAU }
        }
    } else if delta >= TAU {
        TAU
    } else {
        delta.rem_euclid(TAU)
    }
}

// --- MARK: TEXT
impl RenderContext {
    fn check_font(&mut self) {
        let family = &self.current.text_style.family;
        if family != DEFAULT_FONT_FAMILY && !self.backend.has_font_family(family) {
            let family = family.clone();
            self.report_once(
                format!("font:{family}"),
                ErrorKind::ResourceMiss,
                format!("font family '{family}' is not available, using the default font"),
            );
        }
    }

    /// The ink bounds of `text` in the current style, relative to its baseline origin.
    ///
    /// Multi-line text stacks lines downwards from the first baseline.
    pub fn measure_text(&mut self, text: &str) -> Rect<f64> {
        self.check_font();
        let style = &self.current.text_style;
        let mut bounds: Option<Rect<f64>> = None;
        let mut baseline = 0.;
        for line in text.split('\n') {
            let metrics = self.backend.measure_text(line, style);
            let line_bounds = metrics.bounds().translate(crate::geometry::Point::new(0., baseline));
            bounds = Some(bounds.map_or(line_bounds, |b| b.union(&line_bounds)));
            baseline += metrics.line_height();
        }
        bounds.unwrap_or_default()
    }

    /// Draws `text` with its first baseline starting at `origin`.
    pub fn draw_text(&mut self, text: &str, origin: impl Into<kurbo::Point>) {
        let origin = origin.into();
        self.check_font();
        let mut baseline = origin.y;
        for line in text.split('\n') {
            let metrics = self.backend.measure_text(line, &self.current.text_style);
            self.draw_text_line(line, kurbo::Point::new(origin.x, baseline), metrics.width);
            baseline += metrics.line_height();
        }
    }

    /// Draws `text` aligned inside `rect`.
    pub fn draw_text_in_rect(&mut self, text: &str, rect: Rect<f64>, alignment: TextAlignment) {
        self.check_font();
        let lines: Vec<_> = text
            .split('\n')
            .map(|line| (line, self.backend.measure_text(line, &self.current.text_style)))
            .collect();
        let block_height: f64 = lines.iter().map(|(_, m)| m.line_height()).sum();
        let mut top = match alignment.vertical {
            VerticalAlignment::Top => rect.y,
            VerticalAlignment::Center => rect.y + (rect.height - block_height) / 2.,
            VerticalAlignment::Bottom => rect.bottom() - block_height,
        };
        for (line, metrics) in lines {
            let x = match alignment.horizontal {
                HorizontalAlignment::Start => rect.x,
                HorizontalAlignment::Center => rect.x + (rect.width - metrics.width) / 2.,
                HorizontalAlignment::End => rect.right() - metrics.width,
            };
            self.draw_text_line(line, kurbo::Point::new(x, top + metrics.ascent), metrics.width);
            top += metrics.line_height();
        }
    }

    fn draw_text_line(&mut self, line: &str, baseline: kurbo::Point, width: f64) {
        let state = &self.current;
        if line.is_empty() || state.alpha <= 0. || self.clipped_out() {
            return;
        }
        let style = &state.text_style;
        let paint = Paint::Solid(style.color);
        let params = DrawParams {
            transform: state.transform,
            clip: state.clip.as_ref(),
            paint: &paint,
            alpha: state.alpha,
            blend: state.blend,
        };
        let mut result = self.backend.draw_text(line, baseline.into(), style, &params);

        let thickness = style.decoration_thickness();
        let mut decorations = Vec::new();
        if style.underline {
            decorations.push(baseline.y + thickness);
        }
        if style.strikethrough {
            decorations.push(baseline.y - style.size * 0.3);
        }
        for y in decorations {
            let line_rect = kurbo::Rect::new(baseline.x, y, baseline.x + width, y + thickness);
            if result.is_ok() {
                result = self
                    .backend
                    .fill_path(&line_rect.to_path(0.1), FillRule::NonZero, &params);
            }
        }
        if let Err(err) = result {
            self.report(ErrorKind::BackendFault, format!("draw_text: {err}"));
        }
    }
}

// --- MARK: IMAGES
impl RenderContext {
    /// Draws an image into `dst`, placed according to `fit`.
    ///
    /// An image file which cannot be loaded is reported once and skipped.
    pub fn draw_image(&mut self, source: ImageSource<'_>, dst: Rect<f64>, fit: FitMode) {
        let buffer = match source {
            ImageSource::Buffer(buffer) => buffer.clone(),
            ImageSource::Path(path) => {
                if let Some(buffer) = self.images.get(path) {
                    buffer.clone()
                } else {
                    match self.backend.load_image(path) {
                        Ok(buffer) => {
                            self.images.insert(path.to_path_buf(), buffer.clone());
                            buffer
                        }
                        Err(err) => {
                            self.report_once(
                                format!("image:{}", path.display()),
                                ErrorKind::ResourceMiss,
                                err.to_string(),
                            );
                            return;
                        }
                    }
                }
            }
        };
        self.draw_buffer(&buffer, dst, fit);
    }

    fn draw_buffer(&mut self, buffer: &PixelBuffer, dst: Rect<f64>, fit: FitMode) {
        let size = Size::new(f64::from(buffer.width()), f64::from(buffer.height()));
        let placement = fit_image(size, dst, fit);
        if placement.rect.is_empty() || self.current.alpha <= 0. {
            return;
        }
        let mut ctx = self.save();
        if placement.needs_clip {
            ctx.clip_rect(dst);
        }
        if ctx.clipped_out() {
            return;
        }
        let this: &mut Self = &mut ctx;
        let state = &this.current;
        let paint = Paint::default();
        let params = DrawParams {
            transform: state.transform,
            clip: state.clip.as_ref(),
            paint: &paint,
            alpha: state.alpha,
            blend: state.blend,
        };
        let result = this.backend.draw_image(buffer, placement.rect, &params);
        if let Err(err) = result {
            this.report(ErrorKind::BackendFault, format!("draw_image: {err}"));
        }
    }

    /// Forgets every cached image and every "reported once" resource.
    pub fn clear_resource_cache(&mut self) {
        self.images.clear();
        self.reported.clear();
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("size", &self.backend.size())
            .field("depth", &self.depth())
            .field("window", &self.window)
            .field("cached_images", &self.images.len())
            .finish_non_exhaustive()
    }
}

// --- MARK: GUARD
/// A pushed render state, popped when the guard is dropped.
///
/// Created by [`RenderContext::save`].
pub struct StateGuard<'a> {
    ctx: &'a mut RenderContext,
    depth: usize,
}

impl Deref for StateGuard<'_> {
    type Target = RenderContext;

    fn deref(&self) -> &RenderContext {
        self.ctx
    }
}

impl DerefMut for StateGuard<'_> {
    fn deref_mut(&mut self) -> &mut RenderContext {
        self.ctx
    }
}

impl Drop for StateGuard<'_> {
    fn drop(&mut self) {
        let depth = self.ctx.depth();
        if depth != self.depth {
            self.ctx.report(
                ErrorKind::InvariantBreach,
                format!(
                    "state depth changed from {} to {depth} inside a saved scope",
                    self.depth
                ),
            );
        }
        if depth >= self.depth {
            self.ctx.restore_depth(self.depth - 1);
        }
    }
}

impl fmt::Debug for StateGuard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGuard")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::testing::{DrawCommand, RecordingBackend};

    fn context() -> (RenderContext, RecordingBackend, Rc<RefCell<Vec<ErrorRecord>>>) {
        let backend = RecordingBackend::new(Size::new(200, 200));
        let errors = ErrorSink::new();
        let records = Rc::new(RefCell::new(Vec::new()));
        let records_clone = records.clone();
        errors.set(move |record| records_clone.borrow_mut().push(record.clone()));
        let ctx = RenderContext::new(Box::new(backend.clone()), errors);
        (ctx, backend, records)
    }

    #[test]
    fn push_pop_restores_state() {
        let (mut ctx, _, _) = context();
        let before = ctx.state().clone();
        ctx.push_state();
        ctx.translate(10., 10.);
        ctx.set_fill(Color::RED);
        ctx.set_alpha(0.5);
        ctx.clip_rect(Rect::new(0., 0., 5., 5.));
        ctx.pop_state().unwrap();
        assert_eq!(ctx.state(), &before);
    }

    #[test]
    fn bottom_pop_is_refused_and_reported() {
        let (mut ctx, _, records) = context();
        assert_eq!(ctx.pop_state(), Err(RenderError::StackUnderflow));
        assert_eq!(ctx.depth(), 1);
        assert_eq!(records.borrow()[0].kind, ErrorKind::InvariantBreach);
    }

    #[test]
    fn unbalanced_frame_is_reported() {
        let (mut ctx, _, records) = context();
        ctx.begin_frame();
        ctx.push_state();
        ctx.push_state();
        assert_eq!(
            ctx.end_frame(),
            Err(RenderError::UnbalancedFrame {
                expected: 1,
                found: 3
            })
        );
        assert_eq!(ctx.depth(), 1);
        assert_eq!(records.borrow().len(), 1);

        ctx.begin_frame();
        {
            let mut guard = ctx.save();
            guard.translate(1., 1.);
            assert_eq!(guard.depth(), 2);
        }
        assert_eq!(ctx.end_frame(), Ok(()));
    }

    #[test]
    fn transforms_compose_right_multiplied() {
        let (mut ctx, _, _) = context();
        ctx.translate(50., 50.);
        ctx.scale(2., 2.);
        let device = ctx.transform() * kurbo::Point::new(1., 1.);
        assert_eq!(device, kurbo::Point::new(52., 52.));
    }

    #[test]
    fn clear_clip_restores_enclosing_clip() {
        let (mut ctx, _, _) = context();
        ctx.set_clip_rect(Rect::new(0., 0., 100., 100.));
        ctx.push_state();
        ctx.clip_rect(Rect::new(50., 50., 100., 100.));
        assert_eq!(
            ctx.state().clip.as_ref().map(ClipRegion::bounds),
            Some(kurbo::Rect::new(50., 50., 100., 100.))
        );
        ctx.clear_clip_rect();
        assert_eq!(
            ctx.state().clip.as_ref().map(ClipRegion::bounds),
            Some(kurbo::Rect::new(0., 0., 100., 100.))
        );
    }

    #[test]
    fn fully_clipped_draw_is_a_no_op() {
        let (mut ctx, backend, records) = context();
        ctx.set_clip_rect(Rect::new(0., 0., 10., 10.));
        ctx.set_fill(Color::RED);
        ctx.begin_path();
        ctx.add_rect(Rect::new(100., 100., 10., 10.));
        ctx.fill_path();
        assert!(backend.commands().is_empty());
        assert!(records.borrow().is_empty());
    }

    #[test]
    fn path_survives_fill_for_stroke() {
        let (mut ctx, backend, _) = context();
        ctx.set_fill(Color::RED);
        ctx.begin_path();
        ctx.add_rect(Rect::new(0., 0., 10., 10.));
        ctx.fill_path();
        ctx.stroke_path();
        let commands = backend.commands();
        assert_eq!(commands.len(), 2);
        let (DrawCommand::Fill { bounds: a, .. }, DrawCommand::Stroke { bounds: b, .. }) =
            (&commands[0], &commands[1])
        else {
            panic!("unexpected commands {commands:?}");
        };
        assert_eq!(a, b);
    }

    #[test]
    fn arc_sweeps() {
        assert_eq!(arc_sweep(0., PI, false), PI);
        assert_eq!(arc_sweep(0., PI, true), -PI);
        assert_eq!(arc_sweep(0., 3. * TAU, false), TAU);
        assert_eq!(arc_sweep(0., -3. * TAU, true), -TAU);
        assert_eq!(arc_sweep(0., -PI / 2., false), 1.5 * PI);
    }

    #[test]
    fn arc_to_ends_on_second_tangent() {
        let (mut ctx, _, _) = context();
        ctx.begin_path();
        ctx.move_to((0., 0.));
        ctx.arc_to((100., 0.), (100., 100.), 20.);
        let end = ctx.path().elements().last().and_then(|el| el.end_point());
        let end = end.unwrap();
        assert!((end.x - 100.).abs() < 1e-6, "{end:?}");
        assert!((end.y - 20.).abs() < 1e-6, "{end:?}");
    }

    #[test]
    fn missing_font_and_image_are_reported_once() {
        let (mut ctx, backend, records) = context();
        ctx.set_text_style(TextStyle::new("No Such Font", 12.));
        ctx.draw_text("hi", (0., 20.));
        ctx.draw_text("hi", (0., 40.));
        let missing = std::path::Path::new("/does/not/exist.png");
        ctx.draw_image(ImageSource::Path(missing), Rect::new(0., 0., 10., 10.), FitMode::Fit);
        ctx.draw_image(ImageSource::Path(missing), Rect::new(0., 0., 10., 10.), FitMode::Fit);

        let records = records.borrow();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.kind == ErrorKind::ResourceMiss));
        // The text still draws, with the fallback font.
        assert_eq!(backend.commands().len(), 2);
    }
}
