// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The immediate-mode drawing surface elements paint into.
//!
//! A [`RenderContext`] wraps a [`RenderBackend`] and adds everything that is independent
//! of how pixels are produced: the state stack, transforms, clipping, path building,
//! text layout, image fitting and caching, and error reporting.
//!
//! Backends only ever see device-space clips, paths in user space with the transform
//! to apply, and fully resolved paints.

mod backend;
mod clip;
mod context;
mod image;
mod pixel_buffer;
mod state;
mod text;

pub mod shapes;

pub use backend::{DoubleBuffer, DrawParams, RenderBackend};
pub use clip::ClipRegion;
pub use context::{RenderContext, StateGuard};
pub use image::{FitMode, ImagePlacement, ImageSource, fit_image};
pub use pixel_buffer::PixelBuffer;
pub use state::{FillRule, RenderState};
pub use text::{
    FixedMetrics, FontSlant, FontWeight, HorizontalAlignment, TextAlignment, TextMetrics,
    TextStyle, VerticalAlignment,
};

pub use kurbo::{Affine, BezPath, Cap, Join, Stroke};
