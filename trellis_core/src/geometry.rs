// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Value types for positions, sizes and rectangles.
//!
//! Axes are y-down, with the origin at the top-left corner of a window's content area.
//! Element bounds use `i32` coordinates; the render context works in `f64`.
//!
//! Conversions to and from [`kurbo`] types are provided for the `f64` variants, since
//! transforms and paths are expressed with `kurbo`.

use std::fmt;
use std::ops::{Add, Sub};

/// The arithmetic needed by the generic geometry types.
///
/// Implemented for `i32` and `f64`, the two coordinate types used by the crate.
pub trait Scalar:
    Copy + PartialOrd + Default + Add<Output = Self> + Sub<Output = Self> + fmt::Debug
{
}

impl Scalar for i32 {}
impl Scalar for f64 {}

fn min_of<T: Scalar>(a: T, b: T) -> T {
    if b < a { b } else { a }
}

fn max_of<T: Scalar>(a: T, b: T) -> T {
    if b > a { b } else { a }
}

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point<T> {
    /// The x coordinate.
    pub x: T,
    /// The y coordinate.
    pub y: T,
}

impl<T> Point<T> {
    /// Creates a new point.
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl Point<f64> {
    /// The origin.
    pub const ZERO: Self = Self::new(0., 0.);

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl Point<i32> {
    /// Converts to a floating point position.
    pub fn to_f64(self) -> Point<f64> {
        Point::new(f64::from(self.x), f64::from(self.y))
    }
}

impl<T: Scalar> Add for Point<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Scalar> Sub for Point<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<(f64, f64)> for Point<f64> {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(i32, i32)> for Point<i32> {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<Point<f64>> for kurbo::Point {
    fn from(p: Point<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<kurbo::Point> for Point<f64> {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x, p.y)
    }
}

/// A 2D size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size<T> {
    /// The width.
    pub width: T,
    /// The height.
    pub height: T,
}

impl<T> Size<T> {
    /// Creates a new size.
    pub const fn new(width: T, height: T) -> Self {
        Self { width, height }
    }
}

impl Size<f64> {
    /// A size with zero width and height.
    pub const ZERO: Self = Self::new(0., 0.);
}

impl Size<i32> {
    /// Converts to a floating point size.
    pub fn to_f64(self) -> Size<f64> {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}

impl From<Size<f64>> for kurbo::Size {
    fn from(s: Size<f64>) -> Self {
        Self::new(s.width, s.height)
    }
}

/// An axis-aligned rectangle described by its top-left corner and its size.
///
/// [`Rect::contains`] treats the low edges as inside and the high edges as outside,
/// so that adjacent rectangles never both claim a point.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect<T> {
    /// The left edge.
    pub x: T,
    /// The top edge.
    pub y: T,
    /// The width.
    pub width: T,
    /// The height.
    pub height: T,
}

impl<T: Scalar> Rect<T> {
    /// Creates a new rectangle.
    pub const fn new(x: T, y: T, width: T, height: T) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from an origin and a size.
    pub fn from_origin_size(origin: Point<T>, size: Size<T>) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The right edge, `x + width`.
    pub fn right(&self) -> T {
        self.x + self.width
    }

    /// The bottom edge, `y + height`.
    pub fn bottom(&self) -> T {
        self.y + self.height
    }

    /// The top-left corner.
    pub fn origin(&self) -> Point<T> {
        Point::new(self.x, self.y)
    }

    /// The size of the rectangle.
    pub fn size(&self) -> Size<T> {
        Size::new(self.width, self.height)
    }

    /// Whether the rectangle encloses no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > T::default() && self.height > T::default())
    }

    /// Whether `point` lies inside the rectangle.
    ///
    /// Low edges are inclusive and high edges exclusive.
    pub fn contains(&self, point: Point<T>) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Whether `other` lies completely inside this rectangle.
    pub fn contains_rect(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The overlap of both rectangles.
    ///
    /// Disjoint rectangles produce an empty rectangle.
    pub fn intersect(&self, other: &Self) -> Self {
        let x = max_of(self.x, other.x);
        let y = max_of(self.y, other.y);
        let right = max_of(x, min_of(self.right(), other.right()));
        let bottom = max_of(y, min_of(self.bottom(), other.bottom()));
        Self::new(x, y, right - x, bottom - y)
    }

    /// The smallest rectangle containing both rectangles.
    ///
    /// Empty rectangles are ignored.
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = min_of(self.x, other.x);
        let y = min_of(self.y, other.y);
        let right = max_of(self.right(), other.right());
        let bottom = max_of(self.bottom(), other.bottom());
        Self::new(x, y, right - x, bottom - y)
    }

    /// The same rectangle moved by `offset`.
    pub fn translate(&self, offset: Point<T>) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// The same rectangle with its size replaced.
    pub fn with_size(&self, size: Size<T>) -> Self {
        Self::new(self.x, self.y, size.width, size.height)
    }

    /// The same rectangle with its origin replaced.
    pub fn with_origin(&self, origin: Point<T>) -> Self {
        Self::new(origin.x, origin.y, self.width, self.height)
    }
}

impl Rect<i32> {
    /// Shrinks the rectangle by `insets`, never producing a negative size.
    pub fn inset(&self, insets: Insets) -> Self {
        let width = (self.width - insets.horizontal()).max(0);
        let height = (self.height - insets.vertical()).max(0);
        Self::new(self.x + insets.left, self.y + insets.top, width, height)
    }

    /// Grows the rectangle by `insets`.
    pub fn outset(&self, insets: Insets) -> Self {
        Self::new(
            self.x - insets.left,
            self.y - insets.top,
            self.width + insets.horizontal(),
            self.height + insets.vertical(),
        )
    }

    /// Converts to a floating point rectangle.
    pub fn to_f64(self) -> Rect<f64> {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.width),
            f64::from(self.height),
        )
    }
}

impl Rect<f64> {
    /// Rounds every edge to the nearest integer.
    ///
    /// Edges are rounded independently, so rectangles which share an edge
    /// keep sharing it after rounding.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Layout coordinates are well within i32 range"
    )]
    pub fn round_edges(&self) -> Rect<i32> {
        let x = self.x.round() as i32;
        let y = self.y.round() as i32;
        let right = self.right().round() as i32;
        let bottom = self.bottom().round() as i32;
        Rect::new(x, y, right - x, bottom - y)
    }
}

impl From<Rect<f64>> for kurbo::Rect {
    fn from(r: Rect<f64>) -> Self {
        Self::new(r.x, r.y, r.right(), r.bottom())
    }
}

impl From<kurbo::Rect> for Rect<f64> {
    fn from(r: kurbo::Rect) -> Self {
        let r = r.abs();
        Self::new(r.x0, r.y0, r.width(), r.height())
    }
}

impl<T: fmt::Display> fmt::Display for Rect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}

/// Distances from each edge of a rectangle, used for padding and margins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Insets {
    /// Distance from the left edge.
    pub left: i32,
    /// Distance from the top edge.
    pub top: i32,
    /// Distance from the right edge.
    pub right: i32,
    /// Distance from the bottom edge.
    pub bottom: i32,
}

impl Insets {
    /// Zero insets.
    pub const ZERO: Self = Self::uniform(0);

    /// The same inset on all four edges.
    pub const fn uniform(value: i32) -> Self {
        Self {
            left: value,
            top: value,
            right: value,
            bottom: value,
        }
    }

    /// Insets with a horizontal and a vertical value.
    pub const fn symmetric(horizontal: i32, vertical: i32) -> Self {
        Self {
            left: horizontal,
            top: vertical,
            right: horizontal,
            bottom: vertical,
        }
    }

    /// Insets with individual values.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Sum of the left and right insets.
    pub const fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub const fn vertical(&self) -> i32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_low_exclusive_high() {
        let rect = Rect::new(10, 10, 20, 20);
        assert!(rect.contains(Point::new(10, 10)));
        assert!(rect.contains(Point::new(29, 29)));
        assert!(!rect.contains(Point::new(30, 10)));
        assert!(!rect.contains(Point::new(10, 30)));
        assert!(!rect.contains(Point::new(9, 15)));

        let rect = Rect::new(0., 0., 10., 10.);
        assert!(rect.contains(Point::new(0., 0.)));
        assert!(rect.contains(Point::new(9.999, 9.999)));
        assert!(!rect.contains(Point::new(10., 5.)));
    }

    #[test]
    fn adjacent_rects_never_share_a_point() {
        let left = Rect::new(0, 0, 10, 10);
        let right = Rect::new(10, 0, 10, 10);
        let edge = Point::new(10, 5);
        assert!(!left.contains(edge));
        assert!(right.contains(edge));
    }

    #[test]
    fn intersect_and_union() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Rect::new(5, 5, 5, 5));
        assert_eq!(a.union(&b), Rect::new(0, 0, 15, 15));

        let far = Rect::new(50, 50, 1, 1);
        assert!(a.intersect(&far).is_empty());
        assert_eq!(Rect::default().union(&far), far);
    }

    #[test]
    fn insets() {
        let rect = Rect::new(0, 0, 100, 50);
        assert_eq!(rect.inset(Insets::uniform(10)), Rect::new(10, 10, 80, 30));
        assert_eq!(rect.inset(Insets::uniform(40)), Rect::new(40, 40, 20, 0));
        assert_eq!(
            Rect::new(10, 10, 80, 30).outset(Insets::uniform(10)),
            rect
        );
    }

    #[test]
    fn round_edges_keeps_shared_edges() {
        let a = Rect::new(0., 0., 33.4, 10.);
        let b = Rect::new(33.4, 0., 33.4, 10.);
        let (a, b) = (a.round_edges(), b.round_edges());
        assert_eq!(a.right(), b.x);
    }

    #[test]
    fn kurbo_round_trip_preserves_edges() {
        let rect = Rect::new(1.5, 2., 3., 4.);
        let k: kurbo::Rect = rect.into();
        assert_eq!(k, kurbo::Rect::new(1.5, 2., 4.5, 6.));
        assert_eq!(Rect::from(k), rect);
    }
}
