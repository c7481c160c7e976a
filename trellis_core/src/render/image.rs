// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use crate::geometry::{Rect, Size};
use crate::render::PixelBuffer;

/// Where the pixels of a `draw_image` call come from.
#[derive(Clone, Copy, Debug)]
pub enum ImageSource<'a> {
    /// An image file, loaded through the backend and cached by the render context.
    Path(&'a Path),
    /// Pixels already in memory.
    Buffer(&'a PixelBuffer),
}

/// How an image is placed in its destination rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FitMode {
    /// Natural size at the destination's origin, cropped to the destination.
    None,
    /// Uniformly scaled to fit entirely inside the destination, centered.
    #[default]
    Fit,
    /// Uniformly scaled to cover the destination, centered and cropped.
    Fill,
    /// Scaled non-uniformly to exactly the destination.
    Stretch,
    /// Uniformly scaled to the destination's width, centered vertically and cropped.
    FitWidth,
    /// Uniformly scaled to the destination's height, centered horizontally and cropped.
    FitHeight,
}

/// The result of [`fit_image`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Where the whole image is drawn.
    pub rect: Rect<f64>,
    /// Whether the draw must be clipped to the destination.
    pub needs_clip: bool,
}

/// Computes where an image of `image_size` lands in `dst` for `mode`.
pub fn fit_image(image_size: Size<f64>, dst: Rect<f64>, mode: FitMode) -> ImagePlacement {
    let Size { width, height } = image_size;
    if width <= 0. || height <= 0. {
        return ImagePlacement {
            rect: Rect::new(dst.x, dst.y, 0., 0.),
            needs_clip: false,
        };
    }
    let scale_x = dst.width / width;
    let scale_y = dst.height / height;
    let centered = |scale: f64| {
        let w = width * scale;
        let h = height * scale;
        Rect::new(
            dst.x + (dst.width - w) / 2.,
            dst.y + (dst.height - h) / 2.,
            w,
            h,
        )
    };
    let rect = match mode {
        FitMode::None => Rect::new(dst.x, dst.y, width, height),
        FitMode::Stretch => dst,
        FitMode::Fit => centered(scale_x.min(scale_y)),
        FitMode::Fill => centered(scale_x.max(scale_y)),
        FitMode::FitWidth => centered(scale_x),
        FitMode::FitHeight => centered(scale_y),
    };
    ImagePlacement {
        rect,
        needs_clip: !dst.contains_rect(&rect),
    }
}
