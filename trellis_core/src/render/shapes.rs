// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Convenience drawing functions built on the path operations of [`RenderContext`].
//!
//! Each helper replaces the context's current path and then fills or strokes it
//! with the current state; nothing else about the state is read or changed.

use kurbo::{Ellipse, RoundedRect, Shape};

use crate::geometry::{Point, Rect};
use crate::render::RenderContext;

fn with_shape(ctx: &mut RenderContext, shape: &impl Shape, fill: bool) {
    ctx.begin_path();
    ctx.add_shape(shape);
    if fill {
        ctx.fill_path();
    } else {
        ctx.stroke_path();
    }
}

/// Fills `rect` with the fill paint.
pub fn fill_rect(ctx: &mut RenderContext, rect: Rect<f64>) {
    ctx.begin_path();
    ctx.add_rect(rect);
    ctx.fill_path();
}

/// Strokes the outline of `rect` with the stroke paint.
pub fn stroke_rect(ctx: &mut RenderContext, rect: Rect<f64>) {
    ctx.begin_path();
    ctx.add_rect(rect);
    ctx.stroke_path();
}

/// Strokes a straight line from `from` to `to`.
pub fn stroke_line(ctx: &mut RenderContext, from: Point<f64>, to: Point<f64>) {
    ctx.begin_path();
    ctx.move_to(from);
    ctx.line_to(to);
    ctx.stroke_path();
}

/// Fills a circle.
pub fn fill_circle(ctx: &mut RenderContext, center: Point<f64>, radius: f64) {
    fill_ellipse(ctx, center, radius, radius);
}

/// Strokes a circle.
pub fn stroke_circle(ctx: &mut RenderContext, center: Point<f64>, radius: f64) {
    stroke_ellipse(ctx, center, radius, radius);
}

/// Fills an axis-aligned ellipse.
pub fn fill_ellipse(ctx: &mut RenderContext, center: Point<f64>, rx: f64, ry: f64) {
    let ellipse = Ellipse::new(kurbo::Point::from(center), (rx, ry), 0.);
    with_shape(ctx, &ellipse, true);
}

/// Strokes an axis-aligned ellipse.
pub fn stroke_ellipse(ctx: &mut RenderContext, center: Point<f64>, rx: f64, ry: f64) {
    let ellipse = Ellipse::new(kurbo::Point::from(center), (rx, ry), 0.);
    with_shape(ctx, &ellipse, false);
}

/// Fills `rect` with rounded corners of `radius`.
pub fn fill_rounded_rect(ctx: &mut RenderContext, rect: Rect<f64>, radius: f64) {
    let rounded = RoundedRect::from_rect(kurbo::Rect::from(rect), radius);
    with_shape(ctx, &rounded, true);
}

/// Strokes the outline of `rect` with rounded corners of `radius`.
pub fn stroke_rounded_rect(ctx: &mut RenderContext, rect: Rect<f64>, radius: f64) {
    let rounded = RoundedRect::from_rect(kurbo::Rect::from(rect), radius);
    with_shape(ctx, &rounded, false);
}
