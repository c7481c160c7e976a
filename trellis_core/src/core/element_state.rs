// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use bitflags::bitflags;

use crate::core::{ElementId, WindowId};
use crate::geometry::{Rect, Size};
use crate::layout::{Constraints, ContainerLayout};

bitflags! {
    /// The boolean state of an element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ElementFlags: u16 {
        /// The element is painted and hit-tested, if its ancestors are too.
        const VISIBLE = 1 << 0;
        /// The element receives events, if its ancestors do too.
        const ENABLED = 1 << 1;
        /// The element takes part in keyboard focus traversal.
        const FOCUSABLE = 1 << 2;
        /// The element has keyboard focus in its window.
        const FOCUSED = 1 << 3;
        /// The cursor is over the element or one of its descendants.
        const HOVERED = 1 << 4;
        /// The element holds the application's mouse capture.
        const CAPTURED = 1 << 5;
    }
}

/// Generic state for every element in the tree.
///
/// The tree owns this state; elements read it through the contexts and
/// [`ElementTree::state`](crate::core::ElementTree::state).
#[derive(Clone, Debug)]
pub struct ElementState {
    pub(crate) id: ElementId,
    pub(crate) name: Option<String>,
    /// Relative to the parent's top-left corner.
    pub(crate) bounds: Rect<i32>,
    pub(crate) z_order: i32,
    pub(crate) flags: ElementFlags,
    pub(crate) window: Option<WindowId>,
    pub(crate) is_window_root: bool,

    // --- PAINT ---
    /// This element must be repainted.
    pub(crate) dirty: bool,
    /// A descendant must be repainted.
    pub(crate) child_dirty: bool,

    // --- LAYOUT ---
    pub(crate) needs_layout: bool,
    pub(crate) child_needs_layout: bool,
    /// The size the children were last laid out for.
    pub(crate) laid_out_size: Option<Size<i32>>,
    pub(crate) constraints: Constraints,
    pub(crate) layout: Option<ContainerLayout>,
}

impl ElementState {
    pub(crate) fn new(id: ElementId, name: Option<String>, focusable: bool) -> Self {
        let mut flags = ElementFlags::VISIBLE | ElementFlags::ENABLED;
        flags.set(ElementFlags::FOCUSABLE, focusable);
        Self {
            id,
            name,
            bounds: Rect::default(),
            z_order: 0,
            flags,
            window: None,
            is_window_root: false,
            dirty: true,
            child_dirty: false,
            needs_layout: true,
            child_needs_layout: false,
            laid_out_size: None,
            constraints: Constraints::default(),
            layout: None,
        }
    }

    /// The element's id.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// The element's name, if it was given one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The element's bounds, relative to its parent's top-left corner.
    pub fn bounds(&self) -> Rect<i32> {
        self.bounds
    }

    /// The element's size.
    pub fn size(&self) -> Size<i32> {
        self.bounds.size()
    }

    /// The paint order key among siblings.
    pub fn z_order(&self) -> i32 {
        self.z_order
    }

    /// All flags.
    pub fn flags(&self) -> ElementFlags {
        self.flags
    }

    /// The element's own visibility, ignoring its ancestors.
    pub fn is_visible(&self) -> bool {
        self.flags.contains(ElementFlags::VISIBLE)
    }

    /// The element's own enabled flag, ignoring its ancestors.
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(ElementFlags::ENABLED)
    }

    /// Whether the element takes part in focus traversal.
    pub fn is_focusable(&self) -> bool {
        self.flags.contains(ElementFlags::FOCUSABLE)
    }

    /// Whether the element has keyboard focus.
    pub fn is_focused(&self) -> bool {
        self.flags.contains(ElementFlags::FOCUSED)
    }

    /// Whether the cursor is over the element.
    pub fn is_hovered(&self) -> bool {
        self.flags.contains(ElementFlags::HOVERED)
    }

    /// Whether the element holds mouse capture.
    pub fn has_mouse_capture(&self) -> bool {
        self.flags.contains(ElementFlags::CAPTURED)
    }

    /// The window the element is attached to, or `None` when detached.
    pub fn window(&self) -> Option<WindowId> {
        self.window
    }

    /// Whether this is the root element of a window.
    pub fn is_window_root(&self) -> bool {
        self.is_window_root
    }

    /// Whether the element must be repainted.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the element or one of its descendants must be repainted.
    pub fn needs_paint(&self) -> bool {
        self.dirty || self.child_dirty
    }

    /// Whether the element or one of its descendants must be laid out.
    pub fn needs_layout(&self) -> bool {
        self.needs_layout || self.child_needs_layout
    }

    /// How the element wants to be sized by its parent.
    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    /// How the element arranges its children, if it is a container.
    pub fn layout(&self) -> Option<&ContainerLayout> {
        self.layout.as_ref()
    }
}
