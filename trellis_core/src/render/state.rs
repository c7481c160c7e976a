// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Affine, Cap, Join, Stroke};

use crate::color::{BlendMode, Color, Paint};
use crate::render::ClipRegion;
use crate::render::text::TextStyle;

/// How the interior of a self-intersecting path is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillRule {
    /// A point is inside if the winding number is non-zero.
    #[default]
    NonZero,
    /// A point is inside if it is enclosed an odd number of times.
    EvenOdd,
}

/// One entry of the render context's state stack.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState {
    /// Maps user space to device space.
    pub transform: Affine,
    /// The clip in device space. `None` means unclipped.
    pub clip: Option<ClipRegion>,
    /// Paint used by fills and text decorations.
    pub fill: Paint,
    /// Paint used by strokes.
    pub stroke: Paint,
    /// Style used for text.
    pub text_style: TextStyle,
    /// Global alpha, multiplied into every paint.
    pub alpha: f32,
    /// Compositing mode for each draw call.
    pub blend: BlendMode,
    /// Stroke width in user units.
    pub line_width: f64,
    /// Cap applied to both ends of open subpaths.
    pub line_cap: Cap,
    /// Join between stroke segments.
    pub line_join: Join,
    /// Alternating dash and gap lengths. Empty means solid.
    pub dash: Vec<f64>,
    /// Offset into the dash pattern.
    pub dash_offset: f64,
    /// Limit for miter joins, as a ratio to the line width.
    pub miter_limit: f64,
    /// Fill rule for `fill_path`.
    pub fill_rule: FillRule,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clip: None,
            fill: Paint::Solid(Color::TRANSPARENT),
            stroke: Paint::Solid(Color::BLACK),
            text_style: TextStyle::default(),
            alpha: 1.0,
            blend: BlendMode::Normal,
            line_width: 1.0,
            line_cap: Cap::Butt,
            line_join: Join::Miter,
            dash: Vec::new(),
            dash_offset: 0.0,
            miter_limit: 10.0,
            fill_rule: FillRule::NonZero,
        }
    }
}

impl RenderState {
    /// The stroke style described by this state.
    pub fn stroke_style(&self) -> Stroke {
        let stroke = Stroke::new(self.line_width)
            .with_caps(self.line_cap)
            .with_join(self.line_join)
            .with_miter_limit(self.miter_limit);
        if self.dash.is_empty() {
            stroke
        } else {
            stroke.with_dashes(self.dash_offset, self.dash.iter().copied())
        }
    }
}
