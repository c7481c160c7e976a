// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use hashbrown::HashMap;

use crate::app::{Platform, PumpResult};
use crate::core::{Event, NativeHandle, WindowAttributes, WindowId};
use crate::error::PlatformError;
use crate::geometry::{Point, Size};
use crate::render::RenderBackend;
use crate::testing::RecordingBackend;

#[derive(Debug)]
struct HeadlessWindow {
    id: WindowId,
    title: String,
    position: Option<Point<i32>>,
    size: Size<i32>,
    visible: bool,
    redraws: usize,
    backend: Option<RecordingBackend>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    no_display: bool,
    quit_when_idle: bool,
    events: VecDeque<Event>,
    windows: HashMap<NativeHandle, HeadlessWindow>,
    next_handle: u64,
    clipboard: Option<String>,
}

impl HeadlessState {
    fn window(&self, id: WindowId) -> Option<&HeadlessWindow> {
        self.windows.values().find(|window| window.id == id)
    }
}

/// A [`Platform`] without a display, for tests.
///
/// Events are queued with [`push_event`](Self::push_event) and handed out one per
/// [`pump_event`](Platform::pump_event). Windows get [`RecordingBackend`]s.
///
/// Clones share the same state, so a test keeps one clone to inspect what the
/// application did with the other.
#[derive(Clone, Debug, Default)]
pub struct HeadlessPlatform {
    state: Rc<RefCell<HeadlessState>>,
}

impl HeadlessPlatform {
    /// Creates a platform with an empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a platform whose initialisation fails as if no display were available.
    pub fn without_display() -> Self {
        let platform = Self::default();
        platform.state.borrow_mut().no_display = true;
        platform
    }

    /// Builder-style method making [`pump_event`](Platform::pump_event) quit once the
    /// queue is empty, instead of reporting an idle iteration.
    pub fn with_quit_when_idle(self, quit: bool) -> Self {
        self.state.borrow_mut().quit_when_idle = quit;
        self
    }

    /// Queues a native event.
    pub fn push_event(&self, event: Event) {
        self.state.borrow_mut().events.push_back(event);
    }

    /// The number of queued events.
    pub fn pending_events(&self) -> usize {
        self.state.borrow().events.len()
    }

    /// The backend created for `window`.
    pub fn backend(&self, window: WindowId) -> Option<RecordingBackend> {
        self.state.borrow().window(window)?.backend.clone()
    }

    /// Whether `window` is open on the platform side.
    pub fn is_open(&self, window: WindowId) -> bool {
        self.state.borrow().window(window).is_some()
    }

    /// The number of open windows.
    pub fn window_count(&self) -> usize {
        self.state.borrow().windows.len()
    }

    /// The native title of `window`.
    pub fn title(&self, window: WindowId) -> Option<String> {
        Some(self.state.borrow().window(window)?.title.clone())
    }

    /// The native position and size of `window`.
    pub fn bounds(&self, window: WindowId) -> Option<(Option<Point<i32>>, Size<i32>)> {
        let state = self.state.borrow();
        let window = state.window(window)?;
        Some((window.position, window.size))
    }

    /// Whether `window` is shown.
    pub fn is_visible(&self, window: WindowId) -> Option<bool> {
        Some(self.state.borrow().window(window)?.visible)
    }

    /// How many times the application asked to redraw `window`.
    pub fn redraw_count(&self, window: WindowId) -> usize {
        self.state
            .borrow()
            .window(window)
            .map_or(0, |window| window.redraws)
    }

    /// The clipboard content.
    pub fn clipboard(&self) -> Option<String> {
        self.state.borrow().clipboard.clone()
    }
}

impl Platform for HeadlessPlatform {
    fn init(&mut self) -> Result<(), PlatformError> {
        if self.state.borrow().no_display {
            return Err(PlatformError::NoDisplay("headless platform without display".into()));
        }
        Ok(())
    }

    fn open_window(
        &mut self,
        id: WindowId,
        attributes: &WindowAttributes,
    ) -> Result<NativeHandle, PlatformError> {
        if attributes.size.width < 0 || attributes.size.height < 0 {
            return Err(PlatformError::WindowCreation(format!(
                "negative size {}x{}",
                attributes.size.width, attributes.size.height
            )));
        }
        let mut state = self.state.borrow_mut();
        state.next_handle += 1;
        let handle = NativeHandle(state.next_handle);
        state.windows.insert(
            handle,
            HeadlessWindow {
                id,
                title: attributes.title.clone(),
                position: attributes.position,
                size: attributes.size,
                visible: attributes.visible,
                redraws: 0,
                backend: None,
            },
        );
        Ok(handle)
    }

    fn close_window(&mut self, handle: NativeHandle) {
        self.state.borrow_mut().windows.remove(&handle);
    }

    fn set_title(&mut self, handle: NativeHandle, title: &str) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            window.title = title.to_string();
        }
    }

    fn set_bounds(&mut self, handle: NativeHandle, position: Option<Point<i32>>, size: Size<i32>) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            if position.is_some() {
                window.position = position;
            }
            window.size = size;
        }
    }

    fn set_visible(&mut self, handle: NativeHandle, visible: bool) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            window.visible = visible;
        }
    }

    fn request_redraw(&mut self, handle: NativeHandle) {
        if let Some(window) = self.state.borrow_mut().windows.get_mut(&handle) {
            window.redraws += 1;
        }
    }

    fn create_backend(
        &mut self,
        handle: NativeHandle,
        size: Size<i32>,
    ) -> Result<Box<dyn RenderBackend>, PlatformError> {
        let mut state = self.state.borrow_mut();
        let Some(window) = state.windows.get_mut(&handle) else {
            return Err(PlatformError::Other(format!("no window with handle {}", handle.0)));
        };
        let backend = RecordingBackend::new(size);
        window.backend = Some(backend.clone());
        Ok(Box::new(backend))
    }

    fn pump_event(&mut self, _timeout: Option<Duration>) -> PumpResult {
        let mut state = self.state.borrow_mut();
        match state.events.pop_front() {
            Some(event) => PumpResult::Event(event),
            None if state.quit_when_idle => PumpResult::Quit,
            None => PumpResult::Idle,
        }
    }

    fn clipboard_text(&mut self) -> Option<String> {
        self.state.borrow().clipboard.clone()
    }

    fn set_clipboard_text(&mut self, text: &str) {
        self.state.borrow_mut().clipboard = Some(text.to_string());
    }
}
