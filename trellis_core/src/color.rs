// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Colors, blend modes and gradients.
//!
//! Colors on the public surface are straight (non-premultiplied) 8-bit RGBA.
//! Drawing backends premultiply when they composite.

use crate::geometry::Point;

/// A straight RGBA color with 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, where 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::from_rgba8(0, 0, 0, 0);
    /// Opaque black.
    pub const BLACK: Self = Self::from_rgb8(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::from_rgb8(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::from_rgb8(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::from_rgb8(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::from_rgb8(0, 0, 255);
    /// A neutral light grey, used as the default window background.
    pub const LIGHT_GRAY: Self = Self::from_rgb8(0xdd, 0xdd, 0xdd);
    /// A neutral dark grey.
    pub const DARK_GRAY: Self = Self::from_rgb8(0x44, 0x44, 0x44);

    /// Creates an opaque color.
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Creates a color with an explicit alpha channel.
    pub const fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Returns the same color with its alpha replaced.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Returns the same color with its alpha multiplied by `factor`.
    ///
    /// `factor` is clamped to `[0, 1]`.
    pub fn multiply_alpha(self, factor: f32) -> Self {
        let factor = factor.clamp(0., 1.);
        Self {
            a: unit_to_u8(f32::from(self.a) / 255. * factor),
            ..self
        }
    }

    /// Whether the color is fully transparent.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// The premultiplied channels `[r, g, b, a]`.
    ///
    /// Only drawing backends should need this.
    pub fn premultiplied(self) -> [u8; 4] {
        let a = u16::from(self.a);
        let mul = |c: u8| -> u8 {
            let v = (u16::from(c) * a + 127) / 255;
            u8::try_from(v).unwrap_or(u8::MAX)
        };
        [mul(self.r), mul(self.g), mul(self.b), self.a]
    }

    /// Linear interpolation between two colors, with `t` in `[0, 1]`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0., 1.);
        let mix = |a: u8, b: u8| unit_to_u8((f32::from(a) + (f32::from(b) - f32::from(a)) * t) / 255.);
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Value is clamped to the u8 range before the cast"
)]
fn unit_to_u8(value: f32) -> u8 {
    (value.clamp(0., 1.) * 255.).round() as u8
}

/// How a draw call composites with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Source over destination.
    #[default]
    Normal,
    /// Multiplies source and destination.
    Multiply,
    /// Inverse multiply of the inverses.
    Screen,
    /// Multiply or screen, depending on the destination.
    Overlay,
    /// The darker of source and destination.
    Darken,
    /// The lighter of source and destination.
    Lighten,
    /// Brightens the destination towards the source.
    ColorDodge,
    /// Darkens the destination towards the source.
    ColorBurn,
    /// Multiply or screen, depending on the source.
    HardLight,
    /// A softer version of hard light.
    SoftLight,
    /// Absolute difference of source and destination.
    Difference,
    /// Like difference, with lower contrast.
    Exclusion,
}

/// A color at a position along a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f32,
    /// The color at that position.
    pub color: Color,
}

impl GradientStop {
    /// Creates a new stop. The offset is clamped when the stop is added to a gradient.
    pub const fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Clamps offsets into `[0, 1]` and makes them non-decreasing, keeping declaration order.
fn normalize_stops(stops: impl IntoIterator<Item = GradientStop>) -> Vec<GradientStop> {
    let mut last = 0_f32;
    stops
        .into_iter()
        .map(|stop| {
            let offset = if stop.offset.is_nan() {
                last
            } else {
                stop.offset.clamp(0., 1.).max(last)
            };
            last = offset;
            GradientStop::new(offset, stop.color)
        })
        .collect()
}

/// A gradient along the line from `start` to `end`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearGradient {
    /// Where offset 0 lies, in user space.
    pub start: Point<f64>,
    /// Where offset 1 lies, in user space.
    pub end: Point<f64>,
    stops: Vec<GradientStop>,
}

impl LinearGradient {
    /// Creates a linear gradient. Stop offsets are clamped into `[0, 1]`.
    pub fn new(
        start: Point<f64>,
        end: Point<f64>,
        stops: impl IntoIterator<Item = GradientStop>,
    ) -> Self {
        Self {
            start,
            end,
            stops: normalize_stops(stops),
        }
    }

    /// The normalized stops.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// A gradient radiating from `center` out to `radius`.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    /// Where offset 0 lies, in user space.
    pub center: Point<f64>,
    /// The distance at which offset 1 lies.
    pub radius: f64,
    stops: Vec<GradientStop>,
}

impl RadialGradient {
    /// Creates a radial gradient. Stop offsets are clamped into `[0, 1]`.
    pub fn new(
        center: Point<f64>,
        radius: f64,
        stops: impl IntoIterator<Item = GradientStop>,
    ) -> Self {
        Self {
            center,
            radius: radius.max(0.),
            stops: normalize_stops(stops),
        }
    }

    /// The normalized stops.
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }
}

/// What a fill or stroke is painted with.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// A single color.
    Solid(Color),
    /// A linear gradient.
    Linear(LinearGradient),
    /// A radial gradient.
    Radial(RadialGradient),
}

impl Paint {
    /// Whether nothing would be drawn with this paint.
    pub fn is_invisible(&self) -> bool {
        match self {
            Self::Solid(color) => color.is_transparent(),
            Self::Linear(g) => g.stops().iter().all(|s| s.color.is_transparent()),
            Self::Radial(g) => g.stops().iter().all(|s| s.color.is_transparent()),
        }
    }

    /// Returns the paint with every color's alpha multiplied by `alpha`.
    pub fn with_alpha_factor(&self, alpha: f32) -> Self {
        let scale = |stops: &[GradientStop]| -> Vec<GradientStop> {
            stops
                .iter()
                .map(|s| GradientStop::new(s.offset, s.color.multiply_alpha(alpha)))
                .collect()
        };
        match self {
            Self::Solid(color) => Self::Solid(color.multiply_alpha(alpha)),
            Self::Linear(g) => Self::Linear(LinearGradient {
                stops: scale(&g.stops),
                ..g.clone()
            }),
            Self::Radial(g) => Self::Radial(RadialGradient {
                stops: scale(&g.stops),
                ..g.clone()
            }),
        }
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::Solid(Color::TRANSPARENT)
    }
}

impl From<Color> for Paint {
    fn from(color: Color) -> Self {
        Self::Solid(color)
    }
}

impl From<LinearGradient> for Paint {
    fn from(gradient: LinearGradient) -> Self {
        Self::Linear(gradient)
    }
}

impl From<RadialGradient> for Paint {
    fn from(gradient: RadialGradient) -> Self {
        Self::Radial(gradient)
    }
}
