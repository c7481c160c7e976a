// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Conversions from Trellis and kurbo types to their tiny-skia counterparts.

use kurbo::{Affine, BezPath, Cap, Join, PathEl};
use tiny_skia::{
    FillRule as SkFillRule, GradientStop as SkGradientStop, LineCap, LineJoin, PathBuilder,
    Shader, SpreadMode, StrokeDash, Transform,
};
use trellis_core::color::{BlendMode, Color, GradientStop, Paint};
use trellis_core::render::FillRule;

#[expect(
    clippy::cast_possible_truncation,
    reason = "tiny-skia works in f32; surface coordinates fit comfortably"
)]
pub(crate) fn to_f32(value: f64) -> f32 {
    value as f32
}

pub(crate) fn transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs().map(to_f32);
    Transform::from_row(a, b, c, d, e, f)
}

/// Converts a path, or returns `None` if it has nothing to draw.
pub(crate) fn path(path: &BezPath) -> Option<tiny_skia::Path> {
    let mut builder = PathBuilder::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => builder.move_to(to_f32(p.x), to_f32(p.y)),
            PathEl::LineTo(p) => builder.line_to(to_f32(p.x), to_f32(p.y)),
            PathEl::QuadTo(p1, p) => {
                builder.quad_to(to_f32(p1.x), to_f32(p1.y), to_f32(p.x), to_f32(p.y));
            }
            PathEl::CurveTo(p1, p2, p) => builder.cubic_to(
                to_f32(p1.x),
                to_f32(p1.y),
                to_f32(p2.x),
                to_f32(p2.y),
                to_f32(p.x),
                to_f32(p.y),
            ),
            PathEl::ClosePath => builder.close(),
        }
    }
    builder.finish()
}

pub(crate) fn fill_rule(rule: FillRule) -> SkFillRule {
    match rule {
        FillRule::NonZero => SkFillRule::Winding,
        FillRule::EvenOdd => SkFillRule::EvenOdd,
    }
}

pub(crate) fn color(color: Color) -> tiny_skia::Color {
    tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
}

pub(crate) fn blend_mode(blend: BlendMode) -> tiny_skia::BlendMode {
    match blend {
        BlendMode::Normal => tiny_skia::BlendMode::SourceOver,
        BlendMode::Multiply => tiny_skia::BlendMode::Multiply,
        BlendMode::Screen => tiny_skia::BlendMode::Screen,
        BlendMode::Overlay => tiny_skia::BlendMode::Overlay,
        BlendMode::Darken => tiny_skia::BlendMode::Darken,
        BlendMode::Lighten => tiny_skia::BlendMode::Lighten,
        BlendMode::ColorDodge => tiny_skia::BlendMode::ColorDodge,
        BlendMode::ColorBurn => tiny_skia::BlendMode::ColorBurn,
        BlendMode::HardLight => tiny_skia::BlendMode::HardLight,
        BlendMode::SoftLight => tiny_skia::BlendMode::SoftLight,
        BlendMode::Difference => tiny_skia::BlendMode::Difference,
        BlendMode::Exclusion => tiny_skia::BlendMode::Exclusion,
    }
}

pub(crate) fn stroke(stroke: &kurbo::Stroke) -> tiny_skia::Stroke {
    let line_cap = match stroke.start_cap {
        Cap::Butt => LineCap::Butt,
        Cap::Round => LineCap::Round,
        Cap::Square => LineCap::Square,
    };
    let line_join = match stroke.join {
        Join::Bevel => LineJoin::Bevel,
        Join::Miter => LineJoin::Miter,
        Join::Round => LineJoin::Round,
    };
    // An invalid pattern (odd length, negative or all-zero) draws a solid line.
    let dash = (!stroke.dash_pattern.is_empty())
        .then(|| {
            let mut pattern: Vec<f32> = stroke.dash_pattern.iter().copied().map(to_f32).collect();
            if pattern.len() % 2 == 1 {
                pattern.extend_from_within(..);
            }
            StrokeDash::new(pattern, to_f32(stroke.dash_offset))
        })
        .flatten();
    tiny_skia::Stroke {
        width: to_f32(stroke.width),
        miter_limit: to_f32(stroke.miter_limit),
        line_cap,
        line_join,
        dash,
    }
}

fn stops(stops: &[GradientStop]) -> Vec<SkGradientStop> {
    stops
        .iter()
        .map(|stop| SkGradientStop::new(stop.offset, color(stop.color)))
        .collect()
}

/// Builds the shader for `paint`, in user space.
///
/// Returns `None` when nothing would be drawn.
pub(crate) fn shader(paint: &Paint) -> Option<Shader<'static>> {
    if paint.is_invisible() {
        return None;
    }
    match paint {
        Paint::Solid(c) => Some(Shader::SolidColor(color(*c))),
        Paint::Linear(gradient) => {
            let start = tiny_skia::Point::from_xy(
                to_f32(gradient.start.x),
                to_f32(gradient.start.y),
            );
            let end = tiny_skia::Point::from_xy(to_f32(gradient.end.x), to_f32(gradient.end.y));
            tiny_skia::LinearGradient::new(
                start,
                end,
                stops(gradient.stops()),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .or_else(|| degenerate(gradient.stops()))
        }
        Paint::Radial(gradient) => {
            let center = tiny_skia::Point::from_xy(
                to_f32(gradient.center.x),
                to_f32(gradient.center.y),
            );
            tiny_skia::RadialGradient::new(
                center,
                center,
                to_f32(gradient.radius),
                stops(gradient.stops()),
                SpreadMode::Pad,
                Transform::identity(),
            )
            .or_else(|| degenerate(gradient.stops()))
        }
    }
}

/// A gradient of zero length is painted with its last color.
fn degenerate(stops: &[GradientStop]) -> Option<Shader<'static>> {
    stops.last().map(|stop| Shader::SolidColor(color(stop.color)))
}
