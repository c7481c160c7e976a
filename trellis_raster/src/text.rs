// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{BezPath, Shape};
use trellis_core::render::{FixedMetrics, TextStyle};

/// The font families the raster backend renders.
///
/// Every family draws the same boxes; the names only decide whether a style falls back.
pub const RASTER_FONT_FAMILIES: [&str; 3] = ["sans-serif", "serif", "monospace"];

pub(crate) fn has_family(family: &str) -> bool {
    RASTER_FONT_FAMILIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(family))
}

/// The outline of one line of text, with its baseline starting at `origin`.
///
/// The backend has no shaping engine, so every visible character is drawn as a
/// filled box placed with [`FixedMetrics`].
pub(crate) fn glyph_boxes(text: &str, origin: kurbo::Point, style: &TextStyle) -> BezPath {
    let advance = FixedMetrics::advance(style.size);
    let glyph = kurbo::Rect::from(FixedMetrics::glyph_box(style));
    let mut path = BezPath::new();
    let mut x = origin.x;
    for c in text.chars().filter(|c| !c.is_control()) {
        if !c.is_whitespace() {
            let placed = glyph + kurbo::Vec2::new(x, origin.y);
            path.extend(placed.path_elements(0.1));
        }
        x += advance;
    }
    path
}
