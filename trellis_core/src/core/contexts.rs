// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The context types that are passed into various element methods.

use crate::app::{AppSignal, Platform};
use crate::core::{
    ElementFlags, ElementId, ElementState, ElementTree, Event, EventKind, Phase, WindowId,
};
use crate::geometry::{Point, Size};

/// Work a handler asks for, applied by the application once the handler returns.
#[derive(Debug)]
pub(crate) enum Request {
    Focus(ElementId),
    ClearFocus(WindowId),
    CaptureMouse(ElementId),
    ReleaseMouse(ElementId),
    CloseWindow(WindowId),
    Exit,
    PostEvent(Event),
    Signal(AppSignal),
}

/// A context provided to event handling methods of elements.
///
/// Tree mutations made through [`tree_mut`](Self::tree_mut) take effect immediately,
/// but the event currently being dispatched keeps walking the path it computed
/// before the first handler ran. Focus, capture, window and application requests
/// are applied after the handler returns.
pub struct EventCtx<'a> {
    pub(crate) tree: &'a mut ElementTree,
    pub(crate) requests: &'a mut Vec<Request>,
    pub(crate) platform: &'a mut dyn Platform,
    pub(crate) id: ElementId,
    pub(crate) target: Option<ElementId>,
    pub(crate) phase: Phase,
    pub(crate) window: WindowId,
    pub(crate) position: Point<f64>,
}

/// A context passed to paint methods of elements.
pub struct PaintCtx<'a> {
    pub(crate) tree: &'a ElementTree,
    pub(crate) id: ElementId,
    pub(crate) window: WindowId,
}

// --- MARK: GETTERS
impl EventCtx<'_> {
    /// The id of the element being called.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The target of the event, or `None` for pointer events with nothing under the cursor.
    pub fn target(&self) -> Option<ElementId> {
        self.target
    }

    /// Whether the element being called is the target.
    pub fn is_target(&self) -> bool {
        self.target == Some(self.id)
    }

    /// The leg of dispatch being walked.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The window the event is dispatched in.
    pub fn window_id(&self) -> WindowId {
        self.window
    }

    /// The element's generic state.
    ///
    /// # Panics
    ///
    /// If the element was destroyed by an earlier call in the same handler.
    #[track_caller]
    pub fn state(&self) -> &ElementState {
        match self.tree.state(self.id) {
            Some(state) => state,
            None => panic!("{} was destroyed during its own handler", self.id),
        }
    }

    /// The element's size.
    pub fn size(&self) -> Size<i32> {
        self.tree.state(self.id).map_or_else(Size::default, ElementState::size)
    }

    /// The cursor position in the element's coordinates.
    pub fn local_position(&self) -> Point<f64> {
        let origin = self
            .tree
            .window_rect(self.id)
            .map_or(Point::ZERO, |rect| rect.origin().to_f64());
        self.position - origin
    }

    /// The cursor position in window coordinates.
    pub fn window_position(&self) -> Point<f64> {
        self.position
    }

    /// Whether the element has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.has_flag(ElementFlags::FOCUSED)
    }

    /// Whether the cursor is over the element.
    pub fn is_hovered(&self) -> bool {
        self.has_flag(ElementFlags::HOVERED)
    }

    /// Whether the element holds mouse capture.
    pub fn has_mouse_capture(&self) -> bool {
        self.has_flag(ElementFlags::CAPTURED)
    }

    fn has_flag(&self, flag: ElementFlags) -> bool {
        self.tree
            .state(self.id)
            .is_some_and(|state| state.flags.contains(flag))
    }

    /// The element tree.
    pub fn tree(&self) -> &ElementTree {
        self.tree
    }

    /// The element tree, for mutation.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        self.tree
    }
}

// --- MARK: REQUESTS
impl EventCtx<'_> {
    /// Repaints the element.
    pub fn request_paint(&mut self) {
        self.tree.mark_dirty(self.id);
    }

    /// Lays out the element's children again, and repaints it.
    pub fn request_layout(&mut self) {
        self.tree.request_layout(self.id);
    }

    /// Gives keyboard focus to the element.
    pub fn request_focus(&mut self) {
        self.requests.push(Request::Focus(self.id));
    }

    /// Gives keyboard focus to another element of the same window.
    pub fn set_focus(&mut self, id: ElementId) {
        self.requests.push(Request::Focus(id));
    }

    /// Removes keyboard focus from whichever element has it in this window.
    pub fn resign_focus(&mut self) {
        self.requests.push(Request::ClearFocus(self.window));
    }

    /// Routes every mouse event to the element until it is released.
    pub fn capture_mouse(&mut self) {
        self.requests.push(Request::CaptureMouse(self.id));
    }

    /// Releases mouse capture, if the element holds it.
    pub fn release_mouse(&mut self) {
        self.requests.push(Request::ReleaseMouse(self.id));
    }

    /// Closes the window. The rest of the current dispatch is cancelled.
    pub fn close_window(&mut self) {
        self.requests.push(Request::CloseWindow(self.window));
    }

    /// Stops the application's main loop.
    pub fn exit(&mut self) {
        self.requests.push(Request::Exit);
    }

    /// Queues an event for this window, dispatched after the current one.
    pub fn post_event(&mut self, kind: EventKind) {
        let mut event = Event::new(kind).in_window(self.window);
        event.position = self.position;
        self.requests.push(Request::PostEvent(event));
    }

    /// Sends a signal to the embedder, read with
    /// [`Application::pop_signal`](crate::app::Application::pop_signal).
    pub fn submit_signal(&mut self, signal: AppSignal) {
        self.requests.push(Request::Signal(signal));
    }

    /// The plain text on the clipboard.
    pub fn clipboard_text(&mut self) -> Option<String> {
        self.platform.clipboard_text()
    }

    /// Replaces the clipboard content with plain text.
    pub fn set_clipboard_text(&mut self, text: &str) {
        self.platform.set_clipboard_text(text);
    }
}

// --- MARK: PAINT
impl PaintCtx<'_> {
    /// The id of the element being painted.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The window being painted.
    pub fn window_id(&self) -> WindowId {
        self.window
    }

    /// The element's generic state.
    ///
    /// # Panics
    ///
    /// Never during a paint pass; the element is alive while it paints.
    #[track_caller]
    pub fn state(&self) -> &ElementState {
        match self.tree.state(self.id) {
            Some(state) => state,
            None => panic!("{} painted after being destroyed", self.id),
        }
    }

    /// The element's size. Paint within `(0, 0)` and this size.
    pub fn size(&self) -> Size<i32> {
        self.tree.state(self.id).map_or_else(Size::default, ElementState::size)
    }

    /// Whether the element has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.state_flag(ElementFlags::FOCUSED)
    }

    /// Whether the cursor is over the element.
    pub fn is_hovered(&self) -> bool {
        self.state_flag(ElementFlags::HOVERED)
    }

    /// Whether the element and all its ancestors are enabled.
    pub fn is_enabled(&self) -> bool {
        self.tree.effective_enabled(self.id)
    }

    fn state_flag(&self, flag: ElementFlags) -> bool {
        self.tree
            .state(self.id)
            .is_some_and(|state| state.flags.contains(flag))
    }

    /// The element tree.
    pub fn tree(&self) -> &ElementTree {
        self.tree
    }
}
