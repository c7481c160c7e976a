// Copyright 2020 the Xilem Authors and the Druid Authors
// SPDX-License-Identifier: Apache-2.0

//! Tools and infrastructure for testing elements.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::app::{AppOptions, AppSignal, Application, try_init_test_tracing};
use crate::core::{
    Element, ElementId, ElementTree, Event, EventKind, Handled, Key, Modifiers, MouseButton,
    WindowAttributes, WindowId, WindowRoot,
};
use crate::error::ErrorRecord;
use crate::geometry::{Point, Size};
use crate::testing::{DrawCommand, HeadlessPlatform, RecordingBackend};

/// Parameters for creating a [`TestHarness`].
#[derive(Clone, Debug)]
pub struct TestHarnessParams {
    /// The size of the window.
    pub window_size: Size<i32>,
    /// The application options.
    pub options: AppOptions,
}

impl Default for TestHarnessParams {
    fn default() -> Self {
        Self {
            window_size: Size::new(800, 600),
            options: AppOptions::default(),
        }
    }
}

/// A safe headless environment to test elements in.
///
/// `TestHarness` owns an [`Application`] running on a [`HeadlessPlatform`], with one
/// window.
///
/// ## Workflow
///
/// - Create a harness, and build an element tree under its root.
/// - Send events to the window as if you were a user interacting with it.
///   (Layout runs automatically after each event.)
/// - Check that the state of the tree matches what you expect.
///
/// The harness has its own clock, which only moves with [`advance_time`](Self::advance_time),
/// so timing dependent behavior such as double clicks is deterministic.
///
/// Errors reported to the application's sink are collected instead of being printed;
/// read them with [`errors`](Self::errors).
pub struct TestHarness {
    app: Application,
    platform: HeadlessPlatform,
    window: WindowId,
    clock: Duration,
    cursor: Point<f64>,
    errors: Rc<RefCell<Vec<ErrorRecord>>>,
}

// --- MARK: CREATE
impl TestHarness {
    /// Builds harness with an 800x600 window and a plain root.
    pub fn create() -> Self {
        Self::create_with(TestHarnessParams::default(), None)
    }

    /// Builds harness with a window of `size` and a plain root.
    pub fn create_with_size(size: Size<i32>) -> Self {
        let params = TestHarnessParams {
            window_size: size,
            ..TestHarnessParams::default()
        };
        Self::create_with(params, None)
    }

    /// Builds harness with a window whose root element is `root`.
    pub fn create_with_root(size: Size<i32>, root: impl Element) -> Self {
        let params = TestHarnessParams {
            window_size: size,
            ..TestHarnessParams::default()
        };
        Self::create_with(params, Some(Box::new(root)))
    }

    /// Builds harness with the given parameters, and optionally a custom root element.
    ///
    /// # Panics
    ///
    /// If the headless window cannot be created.
    pub fn create_with(params: TestHarnessParams, root: Option<Box<dyn Element>>) -> Self {
        let _ = try_init_test_tracing();

        let platform = HeadlessPlatform::new();
        let mut app = Application::new(platform.clone(), params.options);
        let errors = Rc::new(RefCell::new(Vec::new()));
        let errors_clone = errors.clone();
        app.set_error_sink(move |record| errors_clone.borrow_mut().push(record.clone()));

        let attributes = WindowAttributes::new("Test harness", params.window_size);
        let root = root.unwrap_or_else(|| Box::new(WindowRoot::new(attributes.background)));
        let window = app
            .create_window_with_root(attributes, root)
            .expect("headless window creation should not fail");

        let mut harness = Self {
            app,
            platform,
            window,
            clock: Duration::ZERO,
            cursor: Point::ZERO,
            errors,
        };
        harness.app.run_layout();
        harness
    }
}

// --- MARK: EVENTS
impl TestHarness {
    /// Sends an event to the window, at the current cursor position and time,
    /// then runs layout.
    pub fn process_event(&mut self, kind: EventKind) -> Handled {
        let event = Event::new(kind)
            .at(self.cursor)
            .in_window(self.window)
            .with_timestamp(self.clock);
        let handled = self.app.dispatch(event);
        self.app.run_layout();
        handled
    }

    /// Moves the cursor to `position`, in window coordinates.
    pub fn mouse_move(&mut self, position: impl Into<Point<f64>>) -> Handled {
        self.cursor = position.into();
        self.process_event(EventKind::MouseMove)
    }

    /// Presses `button` at the cursor.
    pub fn mouse_down(&mut self, button: MouseButton) -> Handled {
        self.process_event(EventKind::MouseDown {
            button,
            click_count: 1,
        })
    }

    /// Releases `button` at the cursor.
    pub fn mouse_up(&mut self, button: MouseButton) -> Handled {
        self.process_event(EventKind::MouseUp {
            button,
            click_count: 1,
        })
    }

    /// Moves to `position`, then presses and releases the left button.
    ///
    /// Returns whether the release was handled.
    pub fn click(&mut self, position: impl Into<Point<f64>>) -> Handled {
        self.mouse_move(position);
        self.mouse_down(MouseButton::Left);
        self.mouse_up(MouseButton::Left)
    }

    /// Moves the cursor onto the center of element `id`, then clicks.
    ///
    /// # Panics
    ///
    /// If the element is not attached.
    #[track_caller]
    pub fn click_on(&mut self, id: ElementId) -> Handled {
        let rect = self
            .app
            .tree()
            .window_rect(id)
            .expect("element should be in the tree")
            .to_f64();
        let center = Point::new(rect.x + rect.width / 2., rect.y + rect.height / 2.);
        self.click(center)
    }

    /// Scrolls the wheel at the cursor.
    pub fn wheel(&mut self, dx: f64, dy: f64) -> Handled {
        self.process_event(EventKind::MouseWheel { dx, dy })
    }

    /// Presses `key`.
    pub fn key_down(&mut self, key: Key) -> Handled {
        self.process_event(EventKind::KeyDown {
            key,
            scan_code: 0,
            repeat: false,
        })
    }

    /// Releases `key`.
    pub fn key_up(&mut self, key: Key) -> Handled {
        self.process_event(EventKind::KeyUp { key, scan_code: 0 })
    }

    /// Presses and releases `key`. Returns whether the press was handled.
    pub fn press_key(&mut self, key: Key) -> Handled {
        let handled = self.key_down(key);
        self.key_up(key);
        handled
    }

    /// Presses `key` while holding `modifiers`.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Handled {
        let keys = [
            (Modifiers::SHIFT, Key::Shift),
            (Modifiers::CTRL, Key::Control),
            (Modifiers::ALT, Key::Alt),
            (Modifiers::META, Key::Meta),
        ];
        for (modifier, modifier_key) in keys {
            if modifiers.contains(modifier) {
                self.key_down(modifier_key);
            }
        }
        let handled = self.press_key(key);
        for (modifier, modifier_key) in keys.into_iter().rev() {
            if modifiers.contains(modifier) {
                self.key_up(modifier_key);
            }
        }
        handled
    }

    /// Sends `text` as one text input event.
    pub fn type_text(&mut self, text: &str) -> Handled {
        self.process_event(EventKind::TextInput {
            text: text.to_string(),
        })
    }

    /// Resizes the window, as if the user dragged its border.
    pub fn resize(&mut self, size: Size<i32>) -> Handled {
        self.process_event(EventKind::WindowResize { size })
    }

    /// Moves the harness clock forward.
    pub fn advance_time(&mut self, duration: Duration) {
        self.clock += duration;
    }

    /// Lays out and paints the window, and returns the commands of the presented frame.
    pub fn render(&mut self) -> Vec<DrawCommand> {
        self.app.run_layout();
        self.app.render_window(self.window);
        self.backend().presented()
    }
}

// --- MARK: GETTERS
impl TestHarness {
    /// The application.
    pub fn app(&self) -> &Application {
        &self.app
    }

    /// The application, for direct calls.
    pub fn app_mut(&mut self) -> &mut Application {
        &mut self.app
    }

    /// The headless platform the application runs on.
    pub fn platform(&self) -> &HeadlessPlatform {
        &self.platform
    }

    /// The harness window.
    pub fn window_id(&self) -> WindowId {
        self.window
    }

    /// The root element of the harness window.
    ///
    /// # Panics
    ///
    /// If the window was closed.
    #[track_caller]
    pub fn root(&self) -> ElementId {
        self.app
            .root(self.window)
            .expect("harness window should be open")
    }

    /// The element tree.
    pub fn tree(&self) -> &ElementTree {
        self.app.tree()
    }

    /// The element tree, for mutation.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        self.app.tree_mut()
    }

    /// Inserts `element` as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// If `parent` is not in the tree.
    #[track_caller]
    pub fn add_child(&mut self, parent: ElementId, element: impl Element) -> ElementId {
        let tree = self.app.tree_mut();
        let id = tree.insert(element);
        tree.add_child(parent, id).expect("parent should be in the tree");
        id
    }

    /// The focused element of the harness window.
    pub fn focused(&self) -> Option<ElementId> {
        self.app.focused(self.window)
    }

    /// The recording backend of the harness window.
    ///
    /// # Panics
    ///
    /// If the window was closed.
    #[track_caller]
    pub fn backend(&self) -> RecordingBackend {
        self.platform
            .backend(self.window)
            .expect("harness window should be open")
    }

    /// The current harness time.
    pub fn now(&self) -> Duration {
        self.clock
    }

    /// The cursor position.
    pub fn cursor(&self) -> Point<f64> {
        self.cursor
    }

    /// Takes the oldest signal for the embedder.
    pub fn pop_signal(&mut self) -> Option<AppSignal> {
        self.app.pop_signal()
    }

    /// The errors reported so far.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.errors.borrow().clone()
    }

    /// Drains the errors reported so far.
    pub fn take_errors(&self) -> Vec<ErrorRecord> {
        std::mem::take(&mut *self.errors.borrow_mut())
    }
}
