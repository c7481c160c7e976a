// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use tracing::{debug, info, info_span, trace, warn};

use crate::app::{AppOptions, AppProxy, Platform, PumpResult};
use crate::core::{
    AcceleratorTable, CustomPayload, Element, ElementFlags, ElementId, ElementTree, Event,
    EventKind, Handled, Modifiers, Window, WindowAttributes, WindowId, WindowRoot,
};
use crate::error::{
    AppError, ErrorKind, ErrorRecord, ErrorSink, FocusError, PlatformError, TreeError,
};
use crate::geometry::{Point, Rect, Size};
use crate::layout::ContainerLayout;
use crate::passes::PassTracing;
use crate::passes::event::{ClickTracker, deliver_direct, run_dispatch, validate_interaction};
use crate::passes::{focus, layout, paint};
use crate::render::RenderContext;

/// The most events posted by handlers that one call to [`Application::dispatch`]
/// or [`Application::pump_once`] drains.
///
/// The rest wait for the next pump.
const MAX_POSTED_PER_DISPATCH: usize = 64;

/// Something the application reports to its embedder.
///
/// Signals are queued; read them with [`Application::pop_signal`].
#[derive(Clone, Debug)]
pub enum AppSignal {
    /// An unhandled key press matched a window's accelerator table.
    Accelerator {
        /// The window the key was pressed in.
        window: WindowId,
        /// The command bound to the chord.
        command: u32,
    },
    /// A window was closed and its elements destroyed.
    WindowClosed(WindowId),
    /// A [`Custom`](EventKind::Custom) event without a window, or a signal submitted by a handler.
    Custom {
        /// The application-defined discriminant.
        tag: u32,
        /// Optional data.
        payload: Option<CustomPayload>,
    },
    /// [`Application::exit`] was called.
    Exit,
}

/// Interaction state shared by every window of an application.
#[derive(Debug, Default)]
pub(crate) struct InteractionState {
    /// The hovered element first, then its ancestors up to the window root.
    pub(crate) hovered_path: Vec<ElementId>,
    pub(crate) hover_window: Option<WindowId>,
    pub(crate) captured: Option<ElementId>,
    pub(crate) modifiers: Modifiers,
    pub(crate) clicks: ClickTracker,
    pub(crate) focused_window: Option<WindowId>,
}

/// The application context object.
///
/// An `Application` owns the platform shim, the element tree shared by all its windows,
/// and the interaction state: hover, mouse capture, modifiers, click tracking and which
/// window has focus. Everything here runs on one thread; other threads talk to the
/// application through an [`AppProxy`].
///
/// Applications are plain values, so tests can run several side by side.
pub struct Application {
    pub(crate) platform: Box<dyn Platform>,
    pub(crate) tree: ElementTree,
    pub(crate) windows: Vec<Window>,
    pub(crate) interaction: InteractionState,
    pub(crate) options: AppOptions,
    pub(crate) errors: ErrorSink,
    pub(crate) signals: VecDeque<AppSignal>,
    pub(crate) posted: VecDeque<Event>,
    pub(crate) proxy: AppProxy,
    pub(crate) proxy_queue: Receiver<Event>,
    pub(crate) exit_requested: bool,
    pub(crate) initialized: bool,
    pub(crate) trace: PassTracing,
}

// --- MARK: CONSTRUCTION
impl Application {
    /// Creates an application driving `platform`.
    ///
    /// The platform is initialised lazily, by the first window creation or by [`run`](Self::run).
    pub fn new(platform: impl Platform + 'static, options: AppOptions) -> Self {
        let errors = ErrorSink::new();
        let (proxy, proxy_queue) = AppProxy::new(platform.waker());
        Self {
            platform: Box::new(platform),
            tree: ElementTree::new(errors.clone()),
            windows: Vec::new(),
            interaction: InteractionState::default(),
            options,
            errors,
            signals: VecDeque::new(),
            posted: VecDeque::new(),
            proxy,
            proxy_queue,
            exit_requested: false,
            initialized: false,
            trace: PassTracing::from_env(),
        }
    }

    fn ensure_initialized(&mut self) -> Result<(), AppError> {
        if self.initialized {
            return Ok(());
        }
        self.platform.init().map_err(|err| match err {
            PlatformError::NoDisplay(reason) => AppError::NoDisplay(reason),
            err => AppError::Platform(err),
        })?;
        self.initialized = true;
        Ok(())
    }

    fn report_fatal(&self, error: &AppError) {
        self.errors
            .report(ErrorRecord::new(ErrorKind::Fatal, error.to_string()));
    }
}

// --- MARK: WINDOWS
impl Application {
    /// Opens a window, with an empty root element laid out as a stack.
    pub fn create_window(&mut self, attributes: WindowAttributes) -> Result<WindowId, AppError> {
        let root = Box::new(WindowRoot::new(attributes.background));
        self.create_window_with_root(attributes, root)
    }

    /// Opens a window whose root element is `root` instead of a plain [`WindowRoot`].
    ///
    /// The root is laid out as a stack, like the default one.
    pub fn create_window_with_root(
        &mut self,
        attributes: WindowAttributes,
        root: Box<dyn Element>,
    ) -> Result<WindowId, AppError> {
        let result = self.open_window(attributes, root);
        if let Err(err) = &result {
            self.report_fatal(err);
        }
        result
    }

    fn open_window(
        &mut self,
        attributes: WindowAttributes,
        root: Box<dyn Element>,
    ) -> Result<WindowId, AppError> {
        self.ensure_initialized()?;
        let id = WindowId::next();
        let handle = self
            .platform
            .open_window(id, &attributes)
            .map_err(|err| AppError::WindowCreation(err.to_string()))?;
        let backend = match self.platform.create_backend(handle, attributes.size) {
            Ok(backend) => backend,
            Err(err) => {
                self.platform.close_window(handle);
                return Err(AppError::WindowCreation(err.to_string()));
            }
        };
        let mut render = RenderContext::new(backend, self.errors.clone());
        render.set_window(id);

        let layout = ContainerLayout::stack();
        let root = self
            .tree
            .insert_window_root(id, root, attributes.size, layout);
        info!(
            "Created {id} '{}' ({}x{})",
            attributes.title, attributes.size.width, attributes.size.height
        );
        self.windows.push(Window {
            id,
            attributes,
            handle,
            root,
            render,
            focused: None,
            has_native_focus: false,
            accelerators: AcceleratorTable::default(),
        });
        self.interaction.focused_window.get_or_insert(id);
        Ok(id)
    }

    /// Closes a window and destroys its elements.
    ///
    /// With [`AppOptions::exit_on_last_window_closed`], closing the last window also exits.
    pub fn close_window(&mut self, id: WindowId) -> Result<(), AppError> {
        let Some(index) = self.windows.iter().position(|w| w.id == id) else {
            return Err(AppError::UnknownWindow(id));
        };
        let window = self.windows.remove(index);
        let interaction = &mut self.interaction;
        if interaction.hover_window == Some(id) {
            interaction.hovered_path.clear();
            interaction.hover_window = None;
        }
        if interaction
            .captured
            .is_some_and(|captured| self.tree.window_of(captured) == Some(id))
        {
            interaction.captured = None;
        }
        interaction.clicks.forget_window(id);
        if interaction.focused_window == Some(id) {
            interaction.focused_window = self.windows.first().map(|w| w.id);
        }

        let destroyed = self.tree.destroy_subtree(window.root);
        self.platform.close_window(window.handle);
        info!("Closed {id}, destroying {} elements", destroyed.len());
        self.signals.push_back(AppSignal::WindowClosed(id));

        if self.windows.is_empty() && self.options.exit_on_last_window_closed {
            debug!("Last window closed, exiting");
            self.exit_requested = true;
        }
        Ok(())
    }

    /// The window `id`.
    pub fn window(&self, id: WindowId) -> Option<&Window> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// The window `id`, for changes to its render context or accelerators.
    pub fn window_mut(&mut self, id: WindowId) -> Option<&mut Window> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// All open windows, in creation order.
    pub fn windows(&self) -> impl Iterator<Item = &Window> {
        self.windows.iter()
    }

    /// The root element of window `id`.
    pub fn root(&self, id: WindowId) -> Option<ElementId> {
        self.window(id).map(Window::root)
    }

    /// The window which receives keyboard events without an explicit window.
    pub fn focused_window(&self) -> Option<WindowId> {
        self.interaction.focused_window
    }

    /// Changes a window's title.
    pub fn set_window_title(&mut self, id: WindowId, title: impl Into<String>) -> Result<(), AppError> {
        let window = self
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(AppError::UnknownWindow(id))?;
        window.attributes.title = title.into();
        self.platform.set_title(window.handle, &window.attributes.title);
        Ok(())
    }

    /// Shows or hides a window.
    pub fn set_window_visible(&mut self, id: WindowId, visible: bool) -> Result<(), AppError> {
        let window = self
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(AppError::UnknownWindow(id))?;
        window.attributes.visible = visible;
        self.platform.set_visible(window.handle, visible);
        Ok(())
    }

    /// Moves and resizes a window.
    ///
    /// The new size takes effect immediately, as if the platform had reported a resize.
    pub fn set_window_bounds(
        &mut self,
        id: WindowId,
        position: Option<Point<i32>>,
        size: Size<i32>,
    ) -> Result<(), AppError> {
        let window = self
            .windows
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(AppError::UnknownWindow(id))?;
        if position.is_some() {
            window.attributes.position = position;
        }
        self.platform.set_bounds(window.handle, position, size);
        self.resize_window(id, size);
        Ok(())
    }

    pub(crate) fn resize_window(&mut self, id: WindowId, size: Size<i32>) {
        let Some(window) = self.windows.iter_mut().find(|w| w.id == id) else {
            return;
        };
        if window.attributes.size == size {
            return;
        }
        debug!("Resizing {id} to {}x{}", size.width, size.height);
        window.attributes.size = size;
        window.render.resize(size);
        let root = window.root;
        self.tree
            .set_layout_bounds(root, Rect::new(0, 0, size.width, size.height));
        self.tree.request_layout(root);
    }
}

// --- MARK: TREE
impl Application {
    /// The element tree of every window.
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// The element tree, for mutation.
    ///
    /// Focus, capture and hover which point at elements removed here are cleared
    /// before the next event is dispatched.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    /// Installs the error callback shared by the tree, the windows and the passes.
    pub fn set_error_sink(&mut self, callback: impl FnMut(&ErrorRecord) + 'static) {
        self.errors.set(callback);
    }

    /// The error sink.
    pub fn error_sink(&self) -> &ErrorSink {
        &self.errors
    }

    /// The options the application was created with, updated by the setters.
    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    /// Changes the longest delay between the presses of a double click.
    pub fn set_double_click_time(&mut self, time: Duration) {
        self.options.double_click_time = time;
    }

    /// Changes the furthest distance between the presses of a double click.
    pub fn set_double_click_distance(&mut self, distance: f64) {
        self.options.double_click_distance = distance.max(0.);
    }
}

// --- MARK: INTERACTION
impl Application {
    /// Delivers an event, then the events its handlers posted.
    ///
    /// Returns whether an element consumed the event.
    pub fn dispatch(&mut self, event: Event) -> Handled {
        let handled = run_dispatch(self, event);
        self.drain_posted();
        handled
    }

    fn drain_posted(&mut self) {
        let mut budget = MAX_POSTED_PER_DISPATCH;
        while budget > 0
            && let Some(event) = self.posted.pop_front()
        {
            run_dispatch(self, event);
            budget -= 1;
        }
        if !self.posted.is_empty() {
            trace!(left = self.posted.len(), "Posted events deferred to the next pump");
        }
    }

    /// Gives keyboard focus to `id` in its window.
    ///
    /// Focusing the element which already has focus does nothing and sends no events.
    pub fn set_focus(&mut self, id: ElementId) -> Result<(), FocusError> {
        let result = self.check_focusable(id);
        match result {
            Ok(window) => {
                focus::change_focus(self, window, Some(id));
                Ok(())
            }
            Err(err) => {
                let mut record = ErrorRecord::new(ErrorKind::InvariantBreach, err.to_string())
                    .with_element(id);
                record.window = self.tree.window_of(id);
                self.errors.report(record);
                Err(err)
            }
        }
    }

    fn check_focusable(&self, id: ElementId) -> Result<WindowId, FocusError> {
        let state = self.tree.state(id).ok_or(FocusError::UnknownElement(id))?;
        let window = state.window.ok_or(FocusError::Detached(id))?;
        if !state.is_focusable()
            || !self.tree.effective_visible(id)
            || !self.tree.effective_enabled(id)
        {
            return Err(FocusError::NotFocusable(id));
        }
        Ok(window)
    }

    /// Removes keyboard focus from the element focused in `window`.
    pub fn clear_focus(&mut self, window: WindowId) {
        focus::change_focus(self, window, None);
    }

    /// Moves focus to the next, or previous, focusable element of `window`, wrapping around.
    ///
    /// Returns the newly focused element.
    pub fn focus_next(&mut self, window: WindowId, forward: bool) -> Option<ElementId> {
        focus::focus_next(self, window, forward)
    }

    /// The focused element of `window`.
    pub fn focused(&self, window: WindowId) -> Option<ElementId> {
        self.window(window)?.focused
    }

    /// Routes every mouse event to `id`, regardless of the cursor, until released.
    ///
    /// A previous holder loses capture, and receives a [`MouseLeave`](EventKind::MouseLeave)
    /// if the cursor is not over it.
    pub fn capture_mouse(&mut self, id: ElementId) -> Result<(), TreeError> {
        let Some(window) = self.tree.state(id).map(|state| state.window) else {
            return self.tree.refuse(TreeError::UnknownElement(id));
        };
        let Some(window) = window else {
            return self.tree.refuse(TreeError::Detached(id));
        };
        let previous = self.interaction.captured.replace(id);
        if previous == Some(id) {
            return Ok(());
        }
        if let Some(previous) = previous {
            self.tree
                .set_interaction_flag(previous, ElementFlags::CAPTURED, false);
            if !self.interaction.hovered_path.contains(&previous)
                && let Some(previous_window) = self.tree.window_of(previous)
            {
                let event = Event::new(EventKind::MouseLeave).in_window(previous_window);
                deliver_direct(self, previous_window, previous, &event);
            }
        }
        self.tree
            .set_interaction_flag(id, ElementFlags::CAPTURED, true);
        debug!("{id} captured the mouse in {window}");
        Ok(())
    }

    /// Releases mouse capture if `id` holds it. Returns whether it did.
    pub fn release_mouse(&mut self, id: ElementId) -> bool {
        if self.interaction.captured != Some(id) {
            return false;
        }
        self.interaction.captured = None;
        self.tree
            .set_interaction_flag(id, ElementFlags::CAPTURED, false);
        debug!("{id} released the mouse");
        true
    }

    /// The element holding mouse capture.
    pub fn captured(&self) -> Option<ElementId> {
        self.interaction.captured
    }

    /// The element under the cursor, as of the last mouse event.
    pub fn hovered(&self) -> Option<ElementId> {
        self.interaction.hovered_path.first().copied()
    }

    /// The modifiers held, as of the last event.
    pub fn modifiers(&self) -> Modifiers {
        self.interaction.modifiers
    }

    /// A handle for posting events from other threads.
    pub fn proxy(&self) -> AppProxy {
        self.proxy.clone()
    }

    /// Takes the oldest signal for the embedder.
    pub fn pop_signal(&mut self) -> Option<AppSignal> {
        self.signals.pop_front()
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

// --- MARK: MAIN LOOP
impl Application {
    /// Lays out every window whose root or descendants asked for it.
    pub fn run_layout(&mut self) {
        validate_interaction(self);
        let windows: Vec<WindowId> = self.windows.iter().map(|w| w.id).collect();
        for window in windows {
            layout::run_layout_pass(self, window);
        }
    }

    /// Paints and presents every window with something to repaint.
    pub fn render(&mut self) {
        let windows: Vec<WindowId> = self.windows.iter().map(|w| w.id).collect();
        for window in windows {
            let needs_paint = self
                .root(window)
                .and_then(|root| self.tree.state(root))
                .is_some_and(|state| state.needs_paint());
            if needs_paint {
                self.render_window(window);
            }
        }
    }

    /// Paints and presents `window` whether or not anything changed.
    pub fn render_window(&mut self, window: WindowId) {
        paint::run_paint_pass(self, window);
        if let Some(handle) = self.window(window).map(Window::handle) {
            self.platform.request_redraw(handle);
        }
    }

    /// Runs one iteration of the main loop.
    ///
    /// Drains events posted through the proxy and by handlers, dispatches at most one
    /// native event, then lays out and renders what changed. Returns `false` once the
    /// loop should stop.
    ///
    /// While posted events are still queued, the platform is polled without waiting.
    pub fn pump_once(&mut self) -> bool {
        let _span = info_span!("pump").entered();
        while let Ok(event) = self.proxy_queue.try_recv() {
            self.dispatch(event);
        }
        self.drain_posted();
        let timeout = if self.posted.is_empty() {
            self.options.idle_timeout
        } else {
            Some(Duration::ZERO)
        };
        match self.platform.pump_event(timeout) {
            PumpResult::Event(event) => {
                self.dispatch(event);
            }
            PumpResult::Idle => {}
            PumpResult::Quit => {
                debug!("Platform quit");
                self.exit_requested = true;
            }
        }
        self.run_layout();
        self.render();
        !self.exit_requested
    }

    /// Runs the main loop until [`exit`](Self::exit) is called, the platform quits, or
    /// (by default) the last window closes.
    ///
    /// Fails without entering the loop if the platform has no display.
    pub fn run(&mut self) -> Result<(), AppError> {
        if let Err(err) = self.ensure_initialized() {
            self.report_fatal(&err);
            return Err(err);
        }
        if self.windows.is_empty() && self.options.exit_on_last_window_closed {
            warn!("Running an application without windows");
        }
        info!("Entering main loop");
        while self.pump_once() {}
        info!("Main loop exited");
        Ok(())
    }

    /// Stops the main loop at the next iteration.
    pub fn exit(&mut self) {
        if !self.exit_requested {
            self.exit_requested = true;
            self.signals.push_back(AppSignal::Exit);
        }
    }

    /// Whether [`exit`](Self::exit) was called, or the loop otherwise decided to stop.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("tree", &self.tree)
            .field("windows", &self.windows.len())
            .field("interaction", &self.interaction)
            .field("exit_requested", &self.exit_requested)
            .finish_non_exhaustive()
    }
}
