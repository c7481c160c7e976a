// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use tracing::debug;

use crate::app::Application;
use crate::core::{ElementFlags, ElementId, ElementTree, Event, EventKind, WindowId};
use crate::passes::event::deliver_direct;

/// Moves the focus of `window` to `new`, sending `FocusOut` then `FocusIn`.
///
/// The window root stands in for "no element" on either side. Focusing the element
/// which already has focus does nothing.
pub(crate) fn change_focus(app: &mut Application, window: WindowId, new: Option<ElementId>) {
    let Some(win) = app.windows.iter_mut().find(|w| w.id == window) else {
        return;
    };
    let old = win.focused;
    if old == new {
        return;
    }
    win.focused = new;
    let root = win.root;
    debug!("Focus in {window} moves from {old:?} to {new:?}");

    if let Some(old) = old {
        app.tree
            .set_interaction_flag(old, ElementFlags::FOCUSED, false);
    }
    if let Some(new) = new {
        app.tree
            .set_interaction_flag(new, ElementFlags::FOCUSED, true);
    }

    let focus_out = Event::new(EventKind::FocusOut).in_window(window);
    deliver_direct(app, window, old.unwrap_or(root), &focus_out);
    // A FocusOut handler may have moved focus again, or closed the window.
    if app.focused(window) != new || app.window(window).is_none() {
        return;
    }
    let focus_in = Event::new(EventKind::FocusIn).in_window(window);
    deliver_direct(app, window, new.unwrap_or(root), &focus_in);
}

/// Focuses the element after (or before) the focused one in traversal order.
pub(crate) fn focus_next(
    app: &mut Application,
    window: WindowId,
    forward: bool,
) -> Option<ElementId> {
    let root = app.root(window)?;
    let next = next_focusable(&app.tree, root, app.focused(window), forward)?;
    change_focus(app, window, Some(next));
    Some(next)
}

/// The element following `current` in the focus order of `root`, wrapping around.
///
/// Without a current element (or one outside the order), this is the first element
/// going forward and the last going backward.
pub(crate) fn next_focusable(
    tree: &ElementTree,
    root: ElementId,
    current: Option<ElementId>,
    forward: bool,
) -> Option<ElementId> {
    let order = tree.focus_order(root);
    let len = order.len();
    if len == 0 {
        return None;
    }
    let index = current.and_then(|current| order.iter().position(|id| *id == current));
    let next = match (index, forward) {
        (Some(index), true) => (index + 1) % len,
        (Some(index), false) => (index + len - 1) % len,
        (None, true) => 0,
        (None, false) => len - 1,
    };
    Some(order[next])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Container;
    use crate::error::ErrorSink;
    use crate::geometry::Size;
    use crate::layout::ContainerLayout;

    #[test]
    fn traversal_wraps_both_ways() {
        let mut tree = ElementTree::new(ErrorSink::new());
        let root = tree.insert_window_root(
            WindowId::next(),
            Box::new(Container::new()),
            Size::new(100, 100),
            ContainerLayout::stack(),
        );
        let ids: Vec<_> = (0..3).map(|_| tree.insert(Container::new())).collect();
        for id in &ids {
            tree.add_child(root, *id).unwrap();
            tree.set_focusable(*id, true).unwrap();
        }

        assert_eq!(next_focusable(&tree, root, None, true), Some(ids[0]));
        assert_eq!(next_focusable(&tree, root, None, false), Some(ids[2]));
        assert_eq!(next_focusable(&tree, root, Some(ids[2]), true), Some(ids[0]));
        assert_eq!(next_focusable(&tree, root, Some(ids[0]), false), Some(ids[2]));

        tree.set_visible(ids[1], false).unwrap();
        assert_eq!(next_focusable(&tree, root, Some(ids[0]), true), Some(ids[2]));
    }

    #[test]
    fn no_focusable_elements() {
        let mut tree = ElementTree::new(ErrorSink::new());
        let root = tree.insert_window_root(
            WindowId::next(),
            Box::new(Container::new()),
            Size::new(100, 100),
            ContainerLayout::stack(),
        );
        let child = tree.insert(Container::new());
        tree.add_child(root, child).unwrap();
        assert_eq!(next_focusable(&tree, root, None, true), None);
    }
}
