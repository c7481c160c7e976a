// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Headless tools for testing elements and applications.
//!
//! The primary type is [`TestHarness`], which runs an [`Application`](crate::app::Application)
//! with one window on a [`HeadlessPlatform`]. The harness can:
//!
//! - Simulate the events a platform would send, including mouse movement, key presses and text input.
//! - Control the flow of time, for double clicks.
//! - Record what was painted, through a [`RecordingBackend`].
//!
//! Throwaway elements are easiest to build with [`ModularElement`], and calls to
//! any element can be observed by wrapping it in a [`Recorder`].

mod harness;
mod headless;
mod modular_element;
mod recorder;
mod recording_backend;

pub use harness::{TestHarness, TestHarnessParams};
pub use headless::HeadlessPlatform;
pub use modular_element::ModularElement;
pub use recorder::{Record, Recorder, Recording, TestElementExt};
pub use recording_backend::{DrawCommand, RECORDING_FONT_FAMILIES, RecordingBackend};
