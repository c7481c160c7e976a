// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt::Display;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;

use crate::color::Color;
use crate::core::{ElementId, Key, Modifiers};
use crate::geometry::{Point, Size};
use crate::render::RenderContext;

/// A unique identifier for a window.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WindowId(NonZeroU64);

impl WindowId {
    /// Allocates a new, unique `WindowId`.
    pub fn next() -> Self {
        static WINDOW_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = WINDOW_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(id) {
            Some(id) => Self(id),
            // panic safety: the counter starts at 1 and would take centuries to wrap
            None => unreachable!(),
        }
    }

    /// Returns the integer value of the `WindowId`.
    pub fn to_raw(self) -> u64 {
        self.0.into()
    }
}

impl Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// The platform's handle for a native window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NativeHandle(pub u64);

/// Everything needed to open a window.
#[derive(Clone, Debug, PartialEq)]
pub struct WindowAttributes {
    /// The title.
    pub title: String,
    /// The content size in pixels.
    pub size: Size<i32>,
    /// The outer position on screen, or `None` to let the platform decide.
    pub position: Option<Point<i32>>,
    /// The color painted by the window root behind every element.
    pub background: Color,
    /// Whether the user can resize the window.
    pub resizable: bool,
    /// Whether the window is shown once created.
    pub visible: bool,
}

impl Default for WindowAttributes {
    fn default() -> Self {
        Self {
            title: String::from("Trellis"),
            size: Size::new(800, 600),
            position: None,
            background: Color::WHITE,
            resizable: true,
            visible: true,
        }
    }
}

impl WindowAttributes {
    /// Attributes with the given title and content size.
    pub fn new(title: impl Into<String>, size: Size<i32>) -> Self {
        Self {
            title: title.into(),
            size,
            ..Self::default()
        }
    }

    /// Builder-style method for setting the background.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Builder-style method for setting the position.
    pub fn with_position(mut self, position: Point<i32>) -> Self {
        self.position = Some(position);
        self
    }

    /// Builder-style method for setting resizability.
    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Builder-style method for setting initial visibility.
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Key chords a window turns into application commands.
///
/// Accelerators only see key presses that no element consumed.
#[derive(Clone, Debug, Default)]
pub struct AcceleratorTable {
    entries: HashMap<(Key, Modifiers), u32>,
}

impl AcceleratorTable {
    /// Binds `key` with exactly `modifiers` to `command`, replacing any previous binding.
    pub fn insert(&mut self, key: Key, modifiers: Modifiers, command: u32) -> Option<u32> {
        self.entries.insert((key, modifiers), command)
    }

    /// Removes a binding.
    pub fn remove(&mut self, key: Key, modifiers: Modifiers) -> Option<u32> {
        self.entries.remove(&(key, modifiers))
    }

    /// The command bound to `key` with `modifiers`.
    pub fn get(&self, key: Key, modifiers: Modifiers) -> Option<u32> {
        self.entries.get(&(key, modifiers)).copied()
    }

    /// The number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no bindings.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A top-level window: a native surface, its render context, and the root of an element subtree.
#[derive(Debug)]
pub struct Window {
    pub(crate) id: WindowId,
    pub(crate) attributes: WindowAttributes,
    pub(crate) handle: NativeHandle,
    pub(crate) root: ElementId,
    pub(crate) render: RenderContext,
    pub(crate) focused: Option<ElementId>,
    pub(crate) has_native_focus: bool,
    pub(crate) accelerators: AcceleratorTable,
}

impl Window {
    /// The window's id.
    pub fn id(&self) -> WindowId {
        self.id
    }

    /// The attributes the window was created with, updated by later changes.
    pub fn attributes(&self) -> &WindowAttributes {
        &self.attributes
    }

    /// The title.
    pub fn title(&self) -> &str {
        &self.attributes.title
    }

    /// The content size.
    pub fn size(&self) -> Size<i32> {
        self.attributes.size
    }

    /// The platform handle.
    pub fn handle(&self) -> NativeHandle {
        self.handle
    }

    /// The root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// The focused element, if any.
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Whether the platform reports the window as focused.
    pub fn has_native_focus(&self) -> bool {
        self.has_native_focus
    }

    /// The render context bound to the window's surface.
    pub fn render_context(&mut self) -> &mut RenderContext {
        &mut self.render
    }

    /// The accelerator table.
    pub fn accelerators(&self) -> &AcceleratorTable {
        &self.accelerators
    }

    /// The accelerator table, for changes.
    pub fn accelerators_mut(&mut self) -> &mut AcceleratorTable {
        &mut self.accelerators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accelerators_match_exact_modifiers() {
        let mut table = AcceleratorTable::default();
        table.insert(Key::S, Modifiers::CTRL, 1);
        assert_eq!(table.get(Key::S, Modifiers::CTRL), Some(1));
        assert_eq!(table.get(Key::S, Modifiers::CTRL | Modifiers::SHIFT), None);
        assert_eq!(table.remove(Key::S, Modifiers::CTRL), Some(1));
        assert!(table.is_empty());
    }
}
