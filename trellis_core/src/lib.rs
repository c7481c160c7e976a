// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Trellis Core is the engine of the Trellis retained-mode GUI toolkit.
//!
//! It provides:
//!
//! - [`ElementTree`][core::ElementTree], an arena of [`Element`][core::Element]s with
//!   parent/child links, per-element state, and validated structural edits.
//! - Event dispatch with capture, target and bubble legs, hover tracking,
//!   mouse capture, keyboard focus and double-click synthesis.
//! - [`RenderContext`][render::RenderContext], an immediate-mode drawing surface with
//!   a state stack, clipping, paths, text and images, over a pluggable
//!   [`RenderBackend`][render::RenderBackend].
//! - A pure [layout engine][layout] with stack, linear, grid and dock strategies.
//! - [`Application`][app::Application], which owns the windows and runs the
//!   event, layout and paint passes against a [`Platform`][app::Platform].
//!
//! A software rasterizing backend lives in the `trellis_raster` crate.
//!
//! # Headless use
//!
//! The [`testing`] module has a [`HeadlessPlatform`][testing::HeadlessPlatform],
//! a [`RecordingBackend`][testing::RecordingBackend] which records draw commands,
//! and a [`TestHarness`][testing::TestHarness] to drive an application from tests.
//!
//! # Example
//!
//! ```
//! use trellis_core::app::{AppOptions, Application};
//! use trellis_core::core::{Container, WindowAttributes};
//! use trellis_core::geometry::Size;
//! use trellis_core::testing::HeadlessPlatform;
//!
//! let platform = HeadlessPlatform::new();
//! let mut app = Application::new(platform.clone(), AppOptions::default());
//! let window = app
//!     .create_window(WindowAttributes::new("Hello", Size::new(320, 240)))
//!     .unwrap();
//!
//! let root = app.root(window).unwrap();
//! let panel = app.tree_mut().insert(Container::new());
//! app.tree_mut().add_child(root, panel).unwrap();
//!
//! app.run_layout();
//! app.render();
//! assert_eq!(platform.redraw_count(window), 1);
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
#![cfg_attr(
    test,
    expect(
        unused_crate_dependencies,
        reason = "False-positive with dev-dependencies only used in some test modules"
    )
)]
// TODO: Remove any items listed as "Deferred"
#![expect(missing_debug_implementations, reason = "Deferred: Noisy")]

pub use kurbo;

#[macro_use]
pub mod util;

pub mod app;
/// Axis helpers for linear layouts.
pub mod axis;
pub mod color;
pub mod core;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod testing;

mod passes;

#[cfg(test)]
mod tests;
