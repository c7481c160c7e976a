// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::Cell;
use std::rc::Rc;

use assert_matches::assert_matches;

use crate::core::{Container, EventType, Handled, MouseButton, Phase, WindowAttributes};
use crate::error::{ErrorKind, TreeError};
use crate::geometry::Size;
use crate::testing::Recording;
use crate::tests::{ThreeButtons, button, three_buttons, three_buttons_with};

#[test]
fn handler_destroys_its_own_parent() {
    let finished = Rc::new(Cell::new(false));
    let finished_clone = finished.clone();
    let destroyer = button().event_fn(move |_, ctx, event| {
        if event.event_type() == EventType::MouseUp {
            let parent = ctx.tree().parent(ctx.id()).unwrap();
            ctx.tree_mut().destroy(parent)?;
            finished_clone.set(true);
        }
        Ok(Handled::No)
    });
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        column,
        buttons,
    } = three_buttons_with(&recording, [button(), destroyer, button()]);

    harness.mouse_move((400., 74.));
    harness.mouse_down(MouseButton::Left);
    recording.clear();
    harness.mouse_up(MouseButton::Left);

    assert!(finished.get());
    assert!(harness.take_errors().is_empty());
    // The path was computed before the handler ran; the destroyed column is skipped.
    let events: Vec<_> = recording
        .drain_events()
        .into_iter()
        .filter(|(_, _, ty)| *ty == EventType::MouseUp)
        .map(|(id, phase, _)| (id, phase))
        .collect();
    assert_eq!(
        events,
        vec![
            (root, Phase::Capture),
            (column, Phase::Capture),
            (buttons[1], Phase::Target),
            (root, Phase::Bubble),
        ]
    );

    assert!(!harness.tree().contains(column));
    for button in buttons {
        assert!(!harness.tree().contains(button));
    }
    assert!(harness.tree().children(root).is_empty());
    assert_eq!(harness.app().hovered(), Some(root));

    // Dispatching at the same spot only reaches the root now.
    recording.clear();
    harness.click((400., 74.));
    let events = recording.drain_events();
    assert!(!events.is_empty());
    assert!(events.iter().all(|(id, _, _)| *id == root));
}

#[test]
fn handler_adds_a_child_which_gets_laid_out() {
    let adder = button().event_fn(|_, ctx, event| {
        if event.event_type() == EventType::MouseDown {
            let parent = ctx.tree().parent(ctx.id()).unwrap();
            let tree = ctx.tree_mut();
            let child = tree.insert_named("added", Container::new());
            tree.add_child(parent, child)?;
        }
        Ok(Handled::No)
    });
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        column,
        ..
    } = three_buttons_with(&recording, [adder, button(), button()]);

    harness.click((400., 30.));
    let added = harness.tree().find_by_name("added").unwrap();
    assert_eq!(harness.tree().children(column).len(), 4);
    assert_eq!(harness.tree().parent(added), Some(column));
    let bounds = harness.tree().state(added).unwrap().bounds();
    assert_eq!((bounds.x, bounds.y, bounds.width), (10, 142, 780));
}

#[test]
fn removing_an_element_drops_its_interaction_state() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        column,
        buttons,
        ..
    } = three_buttons(&recording);

    harness.mouse_move((400., 30.));
    harness.app_mut().set_focus(buttons[0]).unwrap();
    harness.app_mut().capture_mouse(buttons[0]).unwrap();

    harness.tree_mut().remove_child(column, buttons[0]).unwrap();
    assert_eq!(harness.tree().parent(buttons[0]), None);
    assert_eq!(harness.tree().window_of(buttons[0]), None);
    let state = harness.tree().state(buttons[0]).unwrap();
    assert!(!state.is_focused() && !state.is_hovered() && !state.has_mouse_capture());

    harness.app_mut().run_layout();
    assert_eq!(harness.focused(), None);
    assert_eq!(harness.app().captured(), None);
    assert_eq!(harness.app().hovered(), Some(column));

    // Put back where it was, it works as before.
    harness.tree_mut().insert_child(column, 0, buttons[0]).unwrap();
    assert_eq!(harness.tree().children(column), &buttons);
    harness.app_mut().set_focus(buttons[0]).unwrap();
    assert_eq!(harness.focused(), Some(buttons[0]));
}

#[test]
fn moving_an_element_to_another_window() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);
    let first = harness.window_id();
    let second = harness
        .app_mut()
        .create_window(WindowAttributes::new("Second", Size::new(100, 100)))
        .unwrap();
    let second_root = harness.app().root(second).unwrap();

    harness.app_mut().set_focus(buttons[2]).unwrap();
    harness.tree_mut().add_child(second_root, buttons[2]).unwrap();
    harness.app_mut().run_layout();

    assert_eq!(harness.tree().window_of(buttons[2]), Some(second));
    assert_eq!(harness.app().focused(first), None);
    assert_eq!(harness.app().focused(second), None);
    harness.app_mut().set_focus(buttons[2]).unwrap();
    assert_eq!(harness.app().focused(second), Some(buttons[2]));
}

#[test]
fn window_roots_cannot_be_moved_or_destroyed() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        column,
        ..
    } = three_buttons(&recording);

    assert_matches!(
        harness.tree_mut().destroy(root),
        Err(TreeError::DestroyWindowRoot(id)) if id == root
    );
    assert_matches!(
        harness.tree_mut().add_child(column, root),
        Err(TreeError::ReparentWindowRoot(_))
    );
    assert_matches!(
        harness.tree_mut().add_child(column, column),
        Err(TreeError::Cycle { .. })
    );
    let errors = harness.take_errors();
    assert_eq!(errors.len(), 3);
    assert!(errors.iter().all(|e| e.kind == ErrorKind::InvariantBreach));
    assert!(harness.tree().contains(root));
}
