// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The paint pass: paints one window into its render context and presents it.

use tracing::{debug, info_span};

use crate::app::Application;
use crate::core::{ElementId, ElementTree, PaintCtx, WindowId};
use crate::error::{ErrorKind, ErrorRecord, ErrorSink, RenderError};
use crate::geometry::Rect;
use crate::passes::{enter_span_if, run_guarded};
use crate::render::RenderContext;

pub(crate) fn run_paint_pass(app: &mut Application, window: WindowId) {
    let Application {
        tree,
        windows,
        errors,
        trace,
        ..
    } = app;
    let Some(win) = windows.iter_mut().find(|w| w.id == window) else {
        return;
    };
    let _span = info_span!("paint", %window).entered();
    let root = win.root;
    let render = &mut win.render;

    render.begin_frame();
    render.clear(None);
    paint_element(tree, render, errors, window, root, trace.paint);
    if let Err(err) = render.end_frame() {
        // Already reported by the context.
        debug!("Unbalanced frame in {window}: {err}");
    }
    match render.swap_buffers() {
        Ok(()) | Err(RenderError::Unsupported(_)) => {}
        Err(err) => {
            let mut record = ErrorRecord::new(ErrorKind::BackendFault, err.to_string());
            record.window = Some(window);
            errors.report(record);
        }
    }
    tree.clear_paint_flags(root);
}

fn paint_element(
    tree: &mut ElementTree,
    render: &mut RenderContext,
    errors: &ErrorSink,
    window: WindowId,
    id: ElementId,
    trace: bool,
) {
    let Some(state) = tree.state(id) else {
        return;
    };
    if !state.is_visible() {
        return;
    }
    let bounds = state.bounds.to_f64();
    let is_window_root = state.is_window_root;
    let Some(mut element) = tree.take_element(id) else {
        debug_panic!("{} is already in use while painting", id);
        return;
    };
    let type_name = element.short_type_name();
    let _span = enter_span_if(trace, &*element, id);

    let mut render = render.save();
    if !is_window_root {
        render.translate(bounds.x, bounds.y);
    }
    render.clip_rect(Rect::new(0., 0., bounds.width, bounds.height));

    {
        let mut ctx = PaintCtx {
            tree: &*tree,
            id,
            window,
        };
        run_guarded(errors, type_name, id, "paint", || {
            element.paint(&mut ctx, &mut render);
            Ok(())
        });
    }
    for child in tree.paint_order(id) {
        paint_element(tree, &mut render, errors, window, child, trace);
    }
    {
        let mut ctx = PaintCtx {
            tree: &*tree,
            id,
            window,
        };
        run_guarded(errors, type_name, id, "post_paint", || {
            element.post_paint(&mut ctx, &mut render);
            Ok(())
        });
    }
    drop(render);
    tree.put_element(id, element);
}
