// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::color::Color;
use crate::geometry::Rect;

/// The family used when a style names none, and the fallback for missing families.
pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// A font weight on the usual 1-1000 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Regular text.
    pub const NORMAL: Self = Self(400);
    /// Bold text.
    pub const BOLD: Self = Self(700);
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Upright or slanted glyphs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontSlant {
    /// Upright.
    #[default]
    Normal,
    /// A designed italic face.
    Italic,
    /// A mechanically slanted face.
    Oblique,
}

/// How text is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// The font family name.
    pub family: String,
    /// The font size in user units.
    pub size: f64,
    /// The font weight.
    pub weight: FontWeight,
    /// The font slant.
    pub slant: FontSlant,
    /// Draw a line under the text.
    pub underline: bool,
    /// Draw a line through the text.
    pub strikethrough: bool,
    /// The text color. Global alpha still applies.
    pub color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            size: 14.,
            weight: FontWeight::NORMAL,
            slant: FontSlant::Normal,
            underline: false,
            strikethrough: false,
            color: Color::BLACK,
        }
    }
}

impl TextStyle {
    /// A style with the given family and size, other fields defaulted.
    pub fn new(family: impl Into<String>, size: f64) -> Self {
        Self {
            family: family.into(),
            size,
            ..Default::default()
        }
    }

    /// Builder-style method for setting the color.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Thickness of underline and strikethrough lines.
    pub fn decoration_thickness(&self) -> f64 {
        (self.size / 14.).max(1.)
    }
}

/// Horizontal placement of text inside a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Flush left.
    #[default]
    Start,
    /// Centered.
    Center,
    /// Flush right.
    End,
}

/// Vertical placement of text inside a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// The first line's ascent touches the top.
    #[default]
    Top,
    /// The block of lines is centered.
    Center,
    /// The last line's descent touches the bottom.
    Bottom,
}

/// Placement of text for `draw_text_in_rect`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TextAlignment {
    /// Horizontal placement.
    pub horizontal: HorizontalAlignment,
    /// Vertical placement.
    pub vertical: VerticalAlignment,
}

impl TextAlignment {
    /// Centered on both axes.
    pub const CENTER: Self = Self {
        horizontal: HorizontalAlignment::Center,
        vertical: VerticalAlignment::Center,
    };

    /// Creates an alignment.
    pub const fn new(horizontal: HorizontalAlignment, vertical: VerticalAlignment) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// Measurements of a single line of text, relative to the start of its baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance of the whole line.
    pub width: f64,
    /// Distance from the baseline up to the top of the ink.
    pub ascent: f64,
    /// Distance from the baseline down to the bottom of the ink.
    pub descent: f64,
}

impl TextMetrics {
    /// The ink bounds, with the baseline origin at `(0, 0)`.
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(0., -self.ascent, self.width, self.ascent + self.descent)
    }

    /// The height of one line.
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Deterministic metrics for backends without a shaping engine.
///
/// Every character advances by `0.6 * size`; ascent is `0.8 * size` and descent `0.2 * size`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedMetrics;

impl FixedMetrics {
    /// Horizontal advance of one glyph.
    pub fn advance(size: f64) -> f64 {
        0.6 * size
    }

    /// Measures one line of text.
    pub fn measure(text: &str, style: &TextStyle) -> TextMetrics {
        let glyphs = text.chars().filter(|c| !c.is_control()).count();
        let width = glyphs as f64 * Self::advance(style.size);
        TextMetrics {
            width,
            ascent: 0.8 * style.size,
            descent: 0.2 * style.size,
        }
    }

    /// The box a tofu glyph occupies, relative to the glyph's baseline origin.
    pub fn glyph_box(style: &TextStyle) -> Rect<f64> {
        let advance = Self::advance(style.size);
        let inset = advance * 0.1;
        let ascent = 0.7 * style.size;
        Rect::new(inset, -ascent, advance - 2. * inset, ascent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_metrics() {
        let style = TextStyle::new("Mono", 10.);
        let metrics = FixedMetrics::measure("abcd", &style);
        assert_eq!(metrics.width, 24.);
        assert_eq!(metrics.bounds(), Rect::new(0., -8., 24., 10.));
        assert_eq!(FixedMetrics::measure("", &style).width, 0.);
    }
}
