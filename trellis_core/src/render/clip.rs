// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use kurbo::{Affine, BezPath, Point, Rect, Shape};

/// A clip in device space: the intersection of every shape it holds.
///
/// The bounding box of the intersection is tracked so that backends and the render
/// context can reject draws cheaply. An empty clip turns every draw into a no-op.
#[derive(Clone, Debug, PartialEq)]
pub struct ClipRegion {
    shapes: Vec<BezPath>,
    bounds: Rect,
}

impl ClipRegion {
    /// A clip region covering `shape` transformed by `transform`.
    pub fn new(shape: &impl Shape, transform: Affine) -> Self {
        let path = transform * shape.to_path(0.1);
        let bounds = path.bounding_box();
        Self {
            shapes: vec![path],
            bounds,
        }
    }

    /// A clip region covering a device-space rectangle.
    pub fn from_device_rect(rect: Rect) -> Self {
        Self::new(&rect, Affine::IDENTITY)
    }

    /// Narrows the region to its intersection with `shape` transformed by `transform`.
    pub fn intersect(&mut self, shape: &impl Shape, transform: Affine) {
        let path = transform * shape.to_path(0.1);
        self.bounds = self.bounds.intersect(path.bounding_box());
        self.shapes.push(path);
    }

    /// The shapes whose intersection forms the region.
    pub fn shapes(&self) -> &[BezPath] {
        &self.shapes
    }

    /// The device-space bounding box of the region.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Whether the region contains no pixels.
    pub fn is_empty(&self) -> bool {
        self.bounds.width() <= 0. || self.bounds.height() <= 0.
    }

    /// Whether a device-space point lies inside every shape.
    pub fn contains(&self, point: Point) -> bool {
        self.bounds.contains(point) && self.shapes.iter().all(|shape| shape.contains(point))
    }

    /// Whether the device-space `rect` could touch the region.
    pub fn may_intersect(&self, rect: Rect) -> bool {
        let overlap = self.bounds.intersect(rect);
        overlap.width() > 0. && overlap.height() > 0.
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_shrinks_bounds() {
        let mut clip = ClipRegion::new(&Rect::new(0., 0., 100., 100.), Affine::translate((10., 10.)));
        assert_eq!(clip.bounds(), Rect::new(10., 10., 110., 110.));

        clip.intersect(&Rect::new(50., 50., 200., 200.), Affine::IDENTITY);
        assert_eq!(clip.bounds(), Rect::new(50., 50., 110., 110.));
        assert!(clip.contains(Point::new(60., 60.)));
        assert!(!clip.contains(Point::new(20., 20.)));
    }

    #[test]
    fn disjoint_clip_is_empty() {
        let mut clip = ClipRegion::from_device_rect(Rect::new(0., 0., 10., 10.));
        clip.intersect(&Rect::new(20., 20., 30., 30.), Affine::IDENTITY);
        assert!(clip.is_empty());
        assert!(!clip.may_intersect(Rect::new(0., 0., 100., 100.)));
    }
}
