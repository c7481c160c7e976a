// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! A CPU drawing backend for [Trellis](trellis_core), built on [`tiny_skia`].
//!
//! [`RasterBackend`] implements [`RenderBackend`](trellis_core::render::RenderBackend)
//! with double buffering, so a [`RenderContext`](trellis_core::render::RenderContext)
//! can draw into memory and read the pixels back. Images are decoded with the
//! [`image`](::image) crate.
//!
//! # Example
//!
//! ```
//! use trellis_core::color::Color;
//! use trellis_core::error::ErrorSink;
//! use trellis_core::geometry::{Rect, Size};
//! use trellis_core::render::{RenderContext, shapes};
//! use trellis_raster::RasterBackend;
//!
//! let backend = RasterBackend::new(Size::new(64, 64)).unwrap();
//! let mut render = RenderContext::new(Box::new(backend), ErrorSink::new());
//!
//! render.begin_frame();
//! render.clear(Some(Color::WHITE));
//! render.set_fill(Color::RED);
//! shapes::fill_rect(&mut render, Rect::new(8., 8., 16., 16.));
//! render.end_frame().unwrap();
//!
//! let pixels = render.capture_buffer(Rect::new(0, 0, 64, 64)).unwrap();
//! assert_eq!(pixels.pixel(10, 10), Some(Color::RED));
//! assert_eq!(pixels.pixel(30, 30), Some(Color::WHITE));
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

mod backend;
mod convert;
mod pixels;
mod text;

pub use backend::RasterBackend;
pub use pixels::{load_image, save_png, to_rgba_image};
pub use text::RASTER_FONT_FAMILIES;

pub use tiny_skia;
