// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::geometry::{Insets, Point, Rect, Size};

/// An axis in visual space.
///
/// Used by the layout engine to describe the direction in which a container
/// places its children. Has some methods for manipulating geometry with respect to the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The x axis
    Horizontal,
    /// The y axis
    Vertical,
}

impl Axis {
    /// Get the axis perpendicular to this one.
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }

    /// Extract from the argument the magnitude along this axis
    pub fn major<T>(self, size: Size<T>) -> T {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// Extract from the argument the magnitude along the perpendicular axis
    pub fn minor<T>(self, size: Size<T>) -> T {
        self.cross().major(size)
    }

    /// Extract the coordinate locating the argument with respect to this axis.
    pub fn major_pos<T>(self, pos: Point<T>) -> T {
        match self {
            Self::Horizontal => pos.x,
            Self::Vertical => pos.y,
        }
    }

    /// Extract the start and length of the argument along this axis.
    pub fn major_span<T: Copy>(self, rect: Rect<T>) -> (T, T) {
        match self {
            Self::Horizontal => (rect.x, rect.width),
            Self::Vertical => (rect.y, rect.height),
        }
    }

    /// Extract the start and length of the argument along the perpendicular axis.
    pub fn minor_span<T: Copy>(self, rect: Rect<T>) -> (T, T) {
        self.cross().major_span(rect)
    }

    /// The insets at the start and end of this axis.
    pub fn major_insets(self, insets: Insets) -> (i32, i32) {
        match self {
            Self::Horizontal => (insets.left, insets.right),
            Self::Vertical => (insets.top, insets.bottom),
        }
    }

    /// The insets at the start and end of the perpendicular axis.
    pub fn minor_insets(self, insets: Insets) -> (i32, i32) {
        self.cross().major_insets(insets)
    }

    /// Arrange the major and minor measurements with respect to this axis such that it forms
    /// an (x, y) pair.
    pub fn pack<T>(self, major: T, minor: T) -> (T, T) {
        match self {
            Self::Horizontal => (major, minor),
            Self::Vertical => (minor, major),
        }
    }

    /// Build a size from major and minor lengths.
    pub fn pack_size<T>(self, major: T, minor: T) -> Size<T> {
        let (width, height) = self.pack(major, minor);
        Size::new(width, height)
    }

    /// Build a rectangle from a major span and a minor span.
    pub fn pack_rect(self, major: (i32, i32), minor: (i32, i32)) -> Rect<i32> {
        let (x, y) = self.pack(major.0, minor.0);
        let (width, height) = self.pack(major.1, minor.1);
        Rect::new(x, y, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_round_trips_through_major_minor() {
        let rect = Axis::Vertical.pack_rect((10, 40), (5, 100));
        assert_eq!(rect, Rect::new(5, 10, 100, 40));
        assert_eq!(Axis::Vertical.major_span(rect), (10, 40));
        assert_eq!(Axis::Vertical.minor_span(rect), (5, 100));
        assert_eq!(Axis::Horizontal.major(rect.size()), 100);
    }
}
