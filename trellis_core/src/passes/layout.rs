// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The layout pass: runs the layout engine on every container whose children
//! asked for it, top-down, and writes the results back into the tree.

use tracing::{info_span, trace};

use crate::app::Application;
use crate::core::{ElementId, ElementTree, WindowId};
use crate::geometry::Size;
use crate::layout::{LayoutItem, compute, required_size};

pub(crate) fn run_layout_pass(app: &mut Application, window: WindowId) {
    let Some(root) = app.root(window) else {
        return;
    };
    let needs_layout = app
        .tree
        .state(root)
        .is_some_and(|state| state.needs_layout() || state.laid_out_size != Some(state.size()));
    if !needs_layout {
        return;
    }
    let _span = info_span!("layout", %window).entered();
    layout_element(&mut app.tree, root, app.trace.layout);
}

fn layout_element(tree: &mut ElementTree, id: ElementId, trace: bool) {
    let Some(state) = tree.state(id) else {
        return;
    };
    let size = state.size();
    let layout = state.layout;
    let relayout = layout.is_some() && (state.needs_layout || state.laid_out_size != Some(size));
    let descend = relayout || state.child_needs_layout;

    let _span = trace
        .then(|| tree.element(id).map(|element| element.make_trace_span(id).entered()))
        .flatten();

    let children = tree.children(id).to_vec();
    if relayout && let Some(layout) = layout {
        let items: Vec<LayoutItem> = children
            .iter()
            .map(|child| layout_item(tree, *child))
            .collect();
        let rects = compute(&layout, layout.content_rect(size), &items);
        for (child, rect) in children.iter().zip(rects) {
            if let Some(rect) = rect {
                tree.set_layout_bounds(*child, rect);
            }
        }
        trace!("Laid out {} children of {id} in {size:?}", children.len());
        if let Some(node) = tree.node_mut(id) {
            node.state.laid_out_size = Some(size);
        }
        tree.mark_dirty(id);
    }
    if let Some(node) = tree.node_mut(id) {
        node.state.needs_layout = false;
        node.state.child_needs_layout = false;
    }

    if descend {
        for child in children {
            layout_element(tree, child, trace);
        }
    }
}

fn layout_item(tree: &ElementTree, id: ElementId) -> LayoutItem {
    let Some(state) = tree.state(id) else {
        return LayoutItem::default();
    };
    LayoutItem {
        constraints: state.constraints,
        visible: state.is_visible(),
        preferred: measure(tree, id),
        current: state.bounds,
    }
}

/// The size an element asks for when its constraints are automatic.
///
/// Containers need at least what their children require at their natural sizes.
fn measure(tree: &ElementTree, id: ElementId) -> Size<i32> {
    let own = tree
        .element(id)
        .map_or_else(Size::default, |element| element.preferred_size());
    let Some(layout) = tree.state(id).and_then(|state| state.layout) else {
        return own;
    };
    let items: Vec<LayoutItem> = tree
        .children(id)
        .iter()
        .map(|child| layout_item(tree, *child))
        .collect();
    let required = required_size(&layout, &items);
    Size::new(own.width.max(required.width), own.height.max(required.height))
}
