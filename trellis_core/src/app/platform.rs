// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;
use std::time::Duration;

use crate::core::{Event, NativeHandle, WindowAttributes, WindowId};
use crate::error::PlatformError;
use crate::geometry::{Point, Size};
use crate::render::RenderBackend;

/// Wakes a main loop blocked in [`Platform::pump_event`]. Callable from any thread.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// What a single call to [`Platform::pump_event`] produced.
#[derive(Clone, Debug)]
pub enum PumpResult {
    /// A native event, already converted.
    ///
    /// Window events carry the id given to [`Platform::open_window`].
    Event(Event),
    /// The timeout elapsed, or the loop was woken, without a native event.
    Idle,
    /// The platform is shutting down.
    Quit,
}

/// The native windowing system, as seen by the core.
///
/// A shim converts native events to [`Event`]s, positions in window-local logical pixels,
/// and native keys to [`Key`](crate::core::Key)s. Everything else stays on the platform side.
pub trait Platform {
    /// Connects to the display. Called once, before any window is opened.
    fn init(&mut self) -> Result<(), PlatformError>;

    /// Opens a native window.
    fn open_window(
        &mut self,
        id: WindowId,
        attributes: &WindowAttributes,
    ) -> Result<NativeHandle, PlatformError>;

    /// Closes a native window. Unknown handles are ignored.
    fn close_window(&mut self, handle: NativeHandle);

    /// Changes the title bar text.
    fn set_title(&mut self, handle: NativeHandle, title: &str);

    /// Moves and resizes the window. `None` keeps the current position.
    fn set_bounds(&mut self, handle: NativeHandle, position: Option<Point<i32>>, size: Size<i32>);

    /// Shows or hides the window.
    fn set_visible(&mut self, handle: NativeHandle, visible: bool);

    /// Asks the platform to schedule a repaint of the window.
    fn request_redraw(&mut self, handle: NativeHandle);

    /// Creates the drawing backend bound to the window's surface.
    fn create_backend(
        &mut self,
        handle: NativeHandle,
        size: Size<i32>,
    ) -> Result<Box<dyn RenderBackend>, PlatformError>;

    /// Waits up to `timeout` for the next native event.
    fn pump_event(&mut self, timeout: Option<Duration>) -> PumpResult;

    /// The plain text on the clipboard.
    fn clipboard_text(&mut self) -> Option<String>;

    /// Replaces the clipboard content with plain text.
    fn set_clipboard_text(&mut self, text: &str);

    /// A handle waking [`pump_event`](Self::pump_event) from another thread, if the platform has one.
    fn waker(&self) -> Option<Waker> {
        None
    }
}
