// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;

use hashbrown::HashMap;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{Element, ElementFlags, ElementId, ElementState, WindowId};
use crate::error::{ErrorKind, ErrorRecord, ErrorSink, TreeError};
use crate::geometry::{Point, Rect, Size};
use crate::layout::{Constraints, ContainerLayout};

/// An array of child ids.
///
/// Internally, this uses a small vector optimisation, but you should treat it as an ordered `Vec<ElementId>`.
pub type ChildrenIds = SmallVec<[ElementId; 8]>;

/// Flags which only make sense while an element is attached to a window.
const INTERACTION_FLAGS: ElementFlags = ElementFlags::FOCUSED
    .union(ElementFlags::HOVERED)
    .union(ElementFlags::CAPTURED);

pub(crate) struct ElementNode {
    /// `None` while a handler or paint method of this element is running.
    pub(crate) element: Option<Box<dyn Element>>,
    pub(crate) state: ElementState,
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: ChildrenIds,
}

/// The arena holding every element of an application.
///
/// Children are owned by the tree, in the order the user gave them. Parent links
/// and window links are plain ids, resolved through the tree when needed, so a
/// stale id is detected rather than followed.
///
/// Elements start detached. They are attached to a window by adding them, directly
/// or through their ancestors, to that window's root element.
///
/// Refused operations return a [`TreeError`] and are also reported to the error sink
/// as invariant breaches.
pub struct ElementTree {
    nodes: HashMap<ElementId, ElementNode>,
    errors: ErrorSink,
}

// --- MARK: INSERT
impl ElementTree {
    /// Creates an empty tree reporting to `errors`.
    pub fn new(errors: ErrorSink) -> Self {
        Self {
            nodes: HashMap::new(),
            errors,
        }
    }

    /// The sink refused operations are reported to.
    pub fn error_sink(&self) -> &ErrorSink {
        &self.errors
    }

    /// The number of live elements, window roots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds no elements.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Inserts a detached element.
    pub fn insert(&mut self, element: impl Element) -> ElementId {
        self.insert_boxed(None, Box::new(element))
    }

    /// Inserts a detached element with a name, for lookups with [`find_by_name`](Self::find_by_name).
    pub fn insert_named(&mut self, name: impl Into<String>, element: impl Element) -> ElementId {
        self.insert_boxed(Some(name.into()), Box::new(element))
    }

    /// Inserts a detached, already boxed element.
    pub fn insert_boxed(&mut self, name: Option<String>, element: Box<dyn Element>) -> ElementId {
        let id = ElementId::next();
        let state = ElementState::new(id, name, element.accepts_focus());
        trace!("Inserting {} {}", element.short_type_name(), id);
        self.nodes.insert(
            id,
            ElementNode {
                element: Some(element),
                state,
                parent: None,
                children: ChildrenIds::new(),
            },
        );
        id
    }

    pub(crate) fn insert_window_root(
        &mut self,
        window: WindowId,
        element: Box<dyn Element>,
        size: Size<i32>,
        layout: ContainerLayout,
    ) -> ElementId {
        let id = self.insert_boxed(None, element);
        if let Some(node) = self.nodes.get_mut(&id) {
            node.state.window = Some(window);
            node.state.is_window_root = true;
            node.state.bounds = Rect::new(0, 0, size.width, size.height);
            node.state.layout = Some(layout);
        }
        id
    }

    pub(crate) fn refuse<T>(&self, error: TreeError) -> Result<T, TreeError> {
        let element = match &error {
            TreeError::UnknownElement(id)
            | TreeError::ReparentWindowRoot(id)
            | TreeError::DestroyWindowRoot(id)
            | TreeError::WrongType(id)
            | TreeError::Detached(id) => *id,
            TreeError::Cycle { child, .. } | TreeError::NotAChild { child, .. } => *child,
        };
        let mut record =
            ErrorRecord::new(ErrorKind::InvariantBreach, error.to_string()).with_element(element);
        record.window = self.window_of(element);
        self.errors.report(record);
        Err(error)
    }

    fn check(&self, id: ElementId) -> Result<(), TreeError> {
        if self.nodes.contains_key(&id) {
            Ok(())
        } else {
            self.refuse(TreeError::UnknownElement(id))
        }
    }
}

// --- MARK: STRUCTURE
impl ElementTree {
    /// Whether `id` refers to a live element.
    pub fn contains(&self, id: ElementId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// The parent of `id`, or `None` for detached elements and window roots.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.nodes.get(&id)?.parent
    }

    /// The children of `id` in insertion order. Empty for unknown ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.nodes.get(&id).map_or(&[], |node| &node.children)
    }

    /// The ancestors of `id`, from its parent up to the top of its chain.
    pub fn ancestors(&self, id: ElementId) -> Vec<ElementId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent(parent);
        }
        ancestors
    }

    /// `id` and all its descendants, parents before children.
    pub fn subtree(&self, id: ElementId) -> Vec<ElementId> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.nodes.get(&current) else {
                continue;
            };
            ids.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        ids
    }

    /// Appends `child` to the children of `parent`.
    ///
    /// A child which already has a parent is moved.
    pub fn add_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Inserts `child` among the children of `parent` at `index`, or last if `index` is past the end.
    ///
    /// A child which already has a parent is moved. Window roots cannot be moved,
    /// and an element cannot become its own ancestor.
    pub fn insert_child(
        &mut self,
        parent: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[&child].state.is_window_root {
            return self.refuse(TreeError::ReparentWindowRoot(child));
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return self.refuse(TreeError::Cycle { parent, child });
        }

        self.detach(child);
        let window = self.nodes[&parent].state.window;
        if let Some(node) = self.nodes.get_mut(&parent) {
            let index = index.min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        self.set_subtree_window(child, window);
        debug!("Attached {} to {}", child, parent);
        self.request_layout(parent);
        self.mark_subtree_dirty(child);
        Ok(())
    }

    /// Detaches `child` from `parent`. The child and its subtree stay alive, detached.
    pub fn remove_child(&mut self, parent: ElementId, child: ElementId) -> Result<(), TreeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.nodes[&child].parent != Some(parent) {
            return self.refuse(TreeError::NotAChild { parent, child });
        }
        self.detach(child);
        self.set_subtree_window(child, None);
        debug!("Detached {} from {}", child, parent);
        Ok(())
    }

    /// Destroys `id` and its whole subtree, returning the destroyed ids.
    ///
    /// Window roots are destroyed by closing their window.
    pub fn destroy(&mut self, id: ElementId) -> Result<Vec<ElementId>, TreeError> {
        self.check(id)?;
        if self.nodes[&id].state.is_window_root {
            return self.refuse(TreeError::DestroyWindowRoot(id));
        }
        Ok(self.destroy_subtree(id))
    }

    pub(crate) fn destroy_subtree(&mut self, id: ElementId) -> Vec<ElementId> {
        self.detach(id);
        let ids = self.subtree(id);
        for id in &ids {
            self.nodes.remove(id);
        }
        debug!("Destroyed {} elements under {}", ids.len(), id);
        ids
    }

    /// Unlinks `id` from its parent, if any.
    fn detach(&mut self, id: ElementId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|c| *c != id);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = None;
        }
        self.request_layout(parent);
    }

    fn set_subtree_window(&mut self, id: ElementId, window: Option<WindowId>) {
        for id in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(&id)
                && node.state.window != window
            {
                node.state.window = window;
                node.state.flags.remove(INTERACTION_FLAGS);
            }
        }
    }
}

// --- MARK: SETTERS
impl ElementTree {
    fn state_mut(&mut self, id: ElementId) -> Result<&mut ElementState, TreeError> {
        self.check(id)?;
        match self.nodes.get_mut(&id) {
            Some(node) => Ok(&mut node.state),
            None => Err(TreeError::UnknownElement(id)),
        }
    }

    /// Changes a flag, returning whether it changed.
    fn set_flag(&mut self, id: ElementId, flag: ElementFlags, value: bool) -> Result<bool, TreeError> {
        let state = self.state_mut(id)?;
        let changed = state.flags.contains(flag) != value;
        state.flags.set(flag, value);
        Ok(changed)
    }

    /// Shows or hides an element. Hidden elements take no space in layouts.
    pub fn set_visible(&mut self, id: ElementId, visible: bool) -> Result<(), TreeError> {
        if self.set_flag(id, ElementFlags::VISIBLE, visible)? {
            self.mark_dirty(id);
            if let Some(parent) = self.parent(id) {
                self.request_layout(parent);
            }
        }
        Ok(())
    }

    /// Enables or disables an element. Disabled elements consume events without handling them.
    pub fn set_enabled(&mut self, id: ElementId, enabled: bool) -> Result<(), TreeError> {
        if self.set_flag(id, ElementFlags::ENABLED, enabled)? {
            self.mark_dirty(id);
        }
        Ok(())
    }

    /// Includes an element in, or removes it from, keyboard focus traversal.
    pub fn set_focusable(&mut self, id: ElementId, focusable: bool) -> Result<(), TreeError> {
        self.set_flag(id, ElementFlags::FOCUSABLE, focusable)?;
        Ok(())
    }

    pub(crate) fn set_interaction_flag(&mut self, id: ElementId, flag: ElementFlags, value: bool) {
        if let Some(node) = self.nodes.get_mut(&id)
            && node.state.flags.contains(flag) != value
        {
            node.state.flags.set(flag, value);
            self.mark_dirty(id);
        }
    }

    /// Moves and resizes an element, relative to its parent's top-left corner.
    ///
    /// The next layout pass of a laid-out parent overwrites this.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect<i32>) -> Result<(), TreeError> {
        let state = self.state_mut(id)?;
        if state.bounds != bounds {
            let resized = state.bounds.size() != bounds.size();
            state.bounds = bounds;
            self.mark_dirty(id);
            if let Some(parent) = self.parent(id) {
                self.mark_dirty(parent);
            }
            if resized {
                self.request_layout(id);
            }
        }
        Ok(())
    }

    pub(crate) fn set_layout_bounds(&mut self, id: ElementId, bounds: Rect<i32>) {
        if let Some(node) = self.nodes.get_mut(&id)
            && node.state.bounds != bounds
        {
            node.state.bounds = bounds;
            node.state.dirty = true;
        }
    }

    /// Changes the paint order of an element among its siblings.
    pub fn set_z_order(&mut self, id: ElementId, z_order: i32) -> Result<(), TreeError> {
        let state = self.state_mut(id)?;
        if state.z_order != z_order {
            state.z_order = z_order;
            if let Some(parent) = self.parent(id) {
                self.mark_dirty(parent);
            }
        }
        Ok(())
    }

    /// Renames an element.
    pub fn set_name(&mut self, id: ElementId, name: Option<String>) -> Result<(), TreeError> {
        self.state_mut(id)?.name = name;
        Ok(())
    }

    /// Changes how an element wants to be sized by its parent's layout.
    pub fn set_constraints(
        &mut self,
        id: ElementId,
        constraints: Constraints,
    ) -> Result<(), TreeError> {
        self.state_mut(id)?.constraints = constraints;
        match self.parent(id) {
            Some(parent) => self.request_layout(parent),
            None => self.request_layout(id),
        }
        Ok(())
    }

    /// Makes an element a container laid out with `layout`, or stops laying out its children.
    pub fn set_layout(
        &mut self,
        id: ElementId,
        layout: Option<ContainerLayout>,
    ) -> Result<(), TreeError> {
        self.state_mut(id)?.layout = layout;
        self.request_layout(id);
        if let Some(parent) = self.parent(id) {
            self.request_layout(parent);
        }
        Ok(())
    }
}

// --- MARK: QUERIES
impl ElementTree {
    /// The generic state of `id`.
    pub fn state(&self, id: ElementId) -> Option<&ElementState> {
        self.nodes.get(&id).map(|node| &node.state)
    }

    /// The element behaviour of `id`.
    ///
    /// Returns `None` while the element's own handler is running.
    pub fn element(&self, id: ElementId) -> Option<&dyn Element> {
        self.nodes.get(&id)?.element.as_deref()
    }

    /// The element `id`, downcast to its concrete type.
    pub fn get<T: Element>(&self, id: ElementId) -> Result<&T, TreeError> {
        let node = self.nodes.get(&id).ok_or(TreeError::UnknownElement(id))?;
        let element: &dyn Any = node
            .element
            .as_deref()
            .ok_or(TreeError::UnknownElement(id))?;
        element.downcast_ref::<T>().ok_or(TreeError::WrongType(id))
    }

    /// The element `id`, downcast to its concrete type, for mutation.
    ///
    /// The element is marked for repaint.
    pub fn get_mut<T: Element>(&mut self, id: ElementId) -> Result<&mut T, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownElement(id));
        }
        self.mark_dirty(id);
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(TreeError::UnknownElement(id))?;
        let element: &mut dyn Any = node
            .element
            .as_deref_mut()
            .ok_or(TreeError::UnknownElement(id))?;
        element.downcast_mut::<T>().ok_or(TreeError::WrongType(id))
    }

    /// The window `id` is attached to.
    pub fn window_of(&self, id: ElementId) -> Option<WindowId> {
        self.state(id)?.window
    }

    /// Whether `id` and all its ancestors are visible.
    pub fn effective_visible(&self, id: ElementId) -> bool {
        self.all_in_chain(id, ElementFlags::VISIBLE)
    }

    /// Whether `id` and all its ancestors are enabled.
    pub fn effective_enabled(&self, id: ElementId) -> bool {
        self.all_in_chain(id, ElementFlags::ENABLED)
    }

    fn all_in_chain(&self, id: ElementId, flag: ElementFlags) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            let Some(node) = self.nodes.get(&id) else {
                return false;
            };
            if !node.state.flags.contains(flag) {
                return false;
            }
            current = node.parent;
        }
        true
    }

    /// The bounds of `id` in the coordinates of the top of its chain, usually its window.
    pub fn window_rect(&self, id: ElementId) -> Option<Rect<i32>> {
        let mut rect = self.state(id)?.bounds;
        for ancestor in self.ancestors(id) {
            let state = self.state(ancestor)?;
            if !state.is_window_root {
                rect = rect.translate(state.bounds.origin());
            }
        }
        Some(rect)
    }

    /// Whether the window-local `point` is inside the visible bounds of `id`.
    pub fn contains_point(&self, id: ElementId, point: Point<f64>) -> bool {
        self.effective_visible(id)
            && self
                .window_rect(id)
                .is_some_and(|rect| rect.to_f64().contains(point))
    }

    /// The children of `id` in paint order: ascending z-order, then insertion order.
    pub fn paint_order(&self, id: ElementId) -> Vec<ElementId> {
        let mut children: Vec<ElementId> = self.children(id).to_vec();
        children.sort_by_key(|child| self.state(*child).map_or(0, |s| s.z_order));
        children
    }

    /// The topmost visible direct child of `parent` whose bounds contain `local`,
    /// given in `parent`'s coordinates.
    pub fn child_at(&self, parent: ElementId, local: Point<f64>) -> Option<ElementId> {
        self.paint_order(parent).into_iter().rev().find(|child| {
            self.state(*child)
                .is_some_and(|s| s.is_visible() && s.bounds.to_f64().contains(local))
        })
    }

    /// Finds the element under the window-local `point`, starting from `root`.
    ///
    /// Children are tried in reverse paint order before their parent, and only inside
    /// their parent's bounds. Hidden subtrees are skipped; with `enabled_only`, so are
    /// disabled ones.
    pub fn hit_test(
        &self,
        root: ElementId,
        point: Point<f64>,
        enabled_only: bool,
    ) -> Option<ElementId> {
        let state = self.state(root)?;
        // The window root's bounds are its window's size; its origin is the window's.
        let local = if state.is_window_root {
            point
        } else {
            point - state.bounds.origin().to_f64()
        };
        let size = state.bounds.size();
        if !Rect::from_origin_size(Point::ZERO, size.to_f64()).contains(local) {
            return None;
        }
        self.hit_test_inner(root, local, enabled_only)
    }

    fn hit_test_inner(&self, id: ElementId, local: Point<f64>, enabled_only: bool) -> Option<ElementId> {
        let node = self.nodes.get(&id)?;
        let state = &node.state;
        if !state.is_visible() || (enabled_only && !state.is_enabled()) {
            return None;
        }
        for child in self.paint_order(id).into_iter().rev() {
            let Some(child_state) = self.state(child) else {
                continue;
            };
            let bounds = child_state.bounds.to_f64();
            if !bounds.contains(local) {
                continue;
            }
            if let Some(hit) = self.hit_test_inner(child, local - bounds.origin(), enabled_only) {
                return Some(hit);
            }
        }
        let accepts = node
            .element
            .as_deref()
            .is_none_or(|element| element.hit_test(local, state.bounds.size()));
        accepts.then_some(id)
    }

    /// The first element named `name`. With duplicates, the oldest one wins.
    pub fn find_by_name(&self, name: &str) -> Option<ElementId> {
        self.nodes
            .values()
            .filter(|node| node.state.name.as_deref() == Some(name))
            .map(|node| node.state.id)
            .min()
    }

    /// The focusable elements under `root` in traversal order.
    ///
    /// Traversal is depth-first in insertion order, ignoring z-order, and skips hidden
    /// or disabled subtrees. `root` itself is not included.
    pub fn focus_order(&self, root: ElementId) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack: Vec<ElementId> = self.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(state) = self.state(id) else {
                continue;
            };
            if !state.is_visible() || !state.is_enabled() {
                continue;
            }
            if state.is_focusable() {
                order.push(id);
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }
}

// --- MARK: INVALIDATION
impl ElementTree {
    /// Marks `id` for repaint, and its ancestors as having a dirty descendant.
    pub fn mark_dirty(&mut self, id: ElementId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.state.dirty = true;
        let mut current = node.parent;
        while let Some(parent) = current {
            let Some(node) = self.nodes.get_mut(&parent) else {
                break;
            };
            node.state.child_dirty = true;
            current = node.parent;
        }
    }

    fn mark_subtree_dirty(&mut self, id: ElementId) {
        for id in self.subtree(id) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.state.dirty = true;
            }
        }
        self.mark_dirty(id);
    }

    /// Schedules a layout of `id`'s children, and repaints it.
    pub fn request_layout(&mut self, id: ElementId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        node.state.needs_layout = true;
        let mut current = node.parent;
        while let Some(parent) = current {
            let Some(node) = self.nodes.get_mut(&parent) else {
                break;
            };
            node.state.child_needs_layout = true;
            current = node.parent;
        }
        self.mark_dirty(id);
    }

    pub(crate) fn clear_paint_flags(&mut self, root: ElementId) {
        for id in self.subtree(root) {
            if let Some(node) = self.nodes.get_mut(&id) {
                node.state.dirty = false;
                node.state.child_dirty = false;
            }
        }
    }
}

// --- MARK: INTERNALS
impl ElementTree {
    pub(crate) fn node_mut(&mut self, id: ElementId) -> Option<&mut ElementNode> {
        self.nodes.get_mut(&id)
    }

    /// Takes the element out of its node while one of its methods runs.
    pub(crate) fn take_element(&mut self, id: ElementId) -> Option<Box<dyn Element>> {
        self.nodes.get_mut(&id)?.element.take()
    }

    /// Puts back an element taken with [`take_element`](Self::take_element).
    ///
    /// If the node was destroyed in the meantime, the element is dropped.
    pub(crate) fn put_element(&mut self, id: ElementId, element: Box<dyn Element>) {
        match self.nodes.get_mut(&id) {
            Some(node) => node.element = Some(element),
            None => trace!("{} was destroyed while in use", id),
        }
    }
}

impl std::fmt::Debug for ElementTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementTree")
            .field("len", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use assert_matches::assert_matches;

    use super::*;
    use crate::color::Color;
    use crate::core::Container;
    use crate::testing::ModularElement;

    fn tree() -> (ElementTree, Rc<RefCell<Vec<ErrorRecord>>>) {
        let errors = ErrorSink::new();
        let records = Rc::new(RefCell::new(Vec::new()));
        let records_clone = records.clone();
        errors.set(move |record| records_clone.borrow_mut().push(record.clone()));
        (ElementTree::new(errors), records)
    }

    fn window_root(tree: &mut ElementTree, size: Size<i32>) -> ElementId {
        tree.insert_window_root(
            WindowId::next(),
            Box::new(Container::new()),
            size,
            ContainerLayout::stack(),
        )
    }

    #[test]
    fn add_then_remove_restores_children() {
        let (mut tree, _) = tree();
        let parent = tree.insert(Container::new());
        let a = tree.insert(Container::new());
        let b = tree.insert(Container::new());
        tree.add_child(parent, a).unwrap();
        let before = tree.children(parent).to_vec();

        tree.add_child(parent, b).unwrap();
        tree.remove_child(parent, b).unwrap();

        assert_eq!(tree.children(parent), before.as_slice());
        assert_eq!(tree.parent(b), None);
        assert!(tree.contains(b));
    }

    #[test]
    fn attaching_under_a_root_sets_the_window() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let parent = tree.insert(Container::new());
        let child = tree.insert(Container::new());
        tree.add_child(parent, child).unwrap();
        assert_eq!(tree.window_of(child), None);

        tree.add_child(root, parent).unwrap();
        let window = tree.window_of(root);
        assert!(window.is_some());
        assert_eq!(tree.window_of(child), window);

        tree.remove_child(root, parent).unwrap();
        assert_eq!(tree.window_of(child), None);
    }

    #[test]
    fn cycles_and_window_roots_are_refused() {
        let (mut tree, records) = tree();
        let root = window_root(&mut tree, Size::new(10, 10));
        let a = tree.insert(Container::new());
        let b = tree.insert(Container::new());
        tree.add_child(a, b).unwrap();

        assert_matches!(tree.add_child(b, a), Err(TreeError::Cycle { .. }));
        assert_matches!(tree.add_child(a, a), Err(TreeError::Cycle { .. }));
        assert_matches!(tree.add_child(a, root), Err(TreeError::ReparentWindowRoot(_)));
        assert_matches!(tree.destroy(root), Err(TreeError::DestroyWindowRoot(_)));
        assert_matches!(tree.remove_child(b, a), Err(TreeError::NotAChild { .. }));

        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(records.borrow().len(), 5);
        assert!(
            records
                .borrow()
                .iter()
                .all(|r| r.kind == ErrorKind::InvariantBreach)
        );
    }

    #[test]
    fn reparenting_moves_the_child() {
        let (mut tree, _) = tree();
        let first = tree.insert(Container::new());
        let second = tree.insert(Container::new());
        let child = tree.insert(Container::new());
        tree.add_child(first, child).unwrap();
        tree.insert_child(second, 0, child).unwrap();
        assert!(tree.children(first).is_empty());
        assert_eq!(tree.children(second), &[child]);
        assert_eq!(tree.parent(child), Some(second));
    }

    #[test]
    fn destroy_removes_subtree() {
        let (mut tree, _) = tree();
        let parent = tree.insert(Container::new());
        let child = tree.insert(Container::new());
        let grandchild = tree.insert(Container::new());
        tree.add_child(parent, child).unwrap();
        tree.add_child(child, grandchild).unwrap();

        let destroyed = tree.destroy(child).unwrap();
        assert_eq!(destroyed, [child, grandchild]);
        assert!(!tree.contains(grandchild));
        assert!(tree.children(parent).is_empty());
        assert_matches!(tree.set_visible(child, false), Err(TreeError::UnknownElement(_)));
    }

    #[test]
    fn effective_flags_follow_ancestors() {
        let (mut tree, _) = tree();
        let parent = tree.insert(Container::new());
        let child = tree.insert(Container::new());
        tree.add_child(parent, child).unwrap();
        tree.set_visible(parent, false).unwrap();
        tree.set_enabled(parent, false).unwrap();
        assert!(tree.state(child).unwrap().is_visible());
        assert!(!tree.effective_visible(child));
        assert!(!tree.effective_enabled(child));
    }

    #[test]
    fn paint_order_sorts_by_z_then_insertion() {
        let (mut tree, _) = tree();
        let parent = tree.insert(Container::new());
        let ids: Vec<_> = (0..4).map(|_| tree.insert(Container::new())).collect();
        for id in &ids {
            tree.add_child(parent, *id).unwrap();
        }
        tree.set_z_order(ids[0], 1).unwrap();
        tree.set_z_order(ids[2], -1).unwrap();
        assert_eq!(tree.paint_order(parent), [ids[2], ids[1], ids[3], ids[0]]);
    }

    #[test]
    fn hit_test_prefers_topmost_and_respects_edges() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let below = tree.insert(Container::new());
        let above = tree.insert(Container::new());
        tree.add_child(root, below).unwrap();
        tree.add_child(root, above).unwrap();
        tree.set_bounds(below, Rect::new(0, 0, 50, 50)).unwrap();
        tree.set_bounds(above, Rect::new(25, 25, 50, 50)).unwrap();

        assert_eq!(tree.hit_test(root, Point::new(30., 30.), false), Some(above));
        assert_eq!(tree.hit_test(root, Point::new(10., 10.), false), Some(below));
        // Low edges are inside, high edges are outside.
        assert_eq!(tree.hit_test(root, Point::new(25., 25.), false), Some(above));
        assert_eq!(tree.hit_test(root, Point::new(75., 75.), false), Some(root));
        assert_eq!(tree.hit_test(root, Point::new(100., 50.), false), None);

        tree.set_z_order(below, 1).unwrap();
        assert_eq!(tree.hit_test(root, Point::new(30., 30.), false), Some(below));
    }

    #[test]
    fn hit_test_skips_hidden_and_optionally_disabled() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let child = tree.insert(Container::new());
        tree.add_child(root, child).unwrap();
        tree.set_bounds(child, Rect::new(0, 0, 50, 50)).unwrap();
        let point = Point::new(10., 10.);

        tree.set_enabled(child, false).unwrap();
        assert_eq!(tree.hit_test(root, point, false), Some(child));
        assert_eq!(tree.hit_test(root, point, true), Some(root));

        tree.set_visible(child, false).unwrap();
        assert_eq!(tree.hit_test(root, point, false), Some(root));
    }

    #[test]
    fn custom_hit_test_lets_points_fall_through() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let hole = tree.insert(ModularElement::new(()).hit_test_fn(|_, local, _| local.x < 10.));
        tree.add_child(root, hole).unwrap();
        tree.set_bounds(hole, Rect::new(0, 0, 50, 50)).unwrap();
        assert_eq!(tree.hit_test(root, Point::new(5., 5.), false), Some(hole));
        assert_eq!(tree.hit_test(root, Point::new(20., 5.), false), Some(root));
    }

    #[test]
    fn focus_order_is_depth_first_and_skips_disabled() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let group = tree.insert(Container::new());
        let a = tree.insert(Container::new());
        let b = tree.insert(Container::new());
        let c = tree.insert(Container::new());
        tree.add_child(root, group).unwrap();
        tree.add_child(group, a).unwrap();
        tree.add_child(group, b).unwrap();
        tree.add_child(root, c).unwrap();
        for id in [group, a, b, c] {
            tree.set_focusable(id, true).unwrap();
        }
        tree.set_z_order(a, 5).unwrap();
        assert_eq!(tree.focus_order(root), [group, a, b, c]);

        tree.set_enabled(group, false).unwrap();
        assert_eq!(tree.focus_order(root), [c]);
    }

    #[test]
    fn window_rect_accumulates_origins() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let parent = tree.insert(Container::new());
        let child = tree.insert(Container::new());
        tree.add_child(root, parent).unwrap();
        tree.add_child(parent, child).unwrap();
        tree.set_bounds(parent, Rect::new(10, 20, 50, 50)).unwrap();
        tree.set_bounds(child, Rect::new(5, 5, 10, 10)).unwrap();
        assert_eq!(tree.window_rect(child), Some(Rect::new(15, 25, 10, 10)));
        assert!(tree.contains_point(child, Point::new(15., 25.)));
        assert!(!tree.contains_point(child, Point::new(25., 35.)));
        assert_eq!(tree.child_at(parent, Point::new(6., 6.)), Some(child));
    }

    #[test]
    fn find_by_name_and_downcast() {
        let (mut tree, _) = tree();
        let id = tree.insert_named("panel", Container::with_background(Color::RED));
        assert_eq!(tree.find_by_name("panel"), Some(id));
        assert_eq!(tree.find_by_name("missing"), None);
        assert_eq!(tree.get::<Container>(id).unwrap().background, Some(Color::RED));
        assert_matches!(
            tree.get::<ModularElement<()>>(id),
            Err(TreeError::WrongType(_))
        );
        tree.get_mut::<Container>(id).unwrap().background = None;
        assert_eq!(tree.get::<Container>(id).unwrap().background, None);
    }

    #[test]
    fn dirty_flags_propagate_upward() {
        let (mut tree, _) = tree();
        let root = window_root(&mut tree, Size::new(100, 100));
        let child = tree.insert(Container::new());
        tree.add_child(root, child).unwrap();
        tree.clear_paint_flags(root);
        assert!(!tree.state(root).unwrap().needs_paint());

        tree.mark_dirty(child);
        let root_state = tree.state(root).unwrap();
        assert!(!root_state.is_dirty());
        assert!(root_state.needs_paint());
    }
}
