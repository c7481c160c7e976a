// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::core::{ElementId, Event, EventKind, EventType, Handled, Key, Modifiers, Phase};
use crate::error::{ErrorKind, FocusError};
use crate::testing::{Recording, TestHarness};
use crate::tests::{ThreeButtons, button, three_buttons, three_buttons_with};

fn focus_events(recording: &Recording) -> Vec<(ElementId, EventType)> {
    recording
        .drain_events()
        .into_iter()
        .filter(|(_, _, ty)| matches!(ty, EventType::FocusIn | EventType::FocusOut))
        .map(|(id, phase, ty)| {
            assert_eq!(phase, Phase::Direct, "focus changes are direct deliveries");
            (id, ty)
        })
        .collect()
}

#[test]
fn tab_and_shift_tab_move_focus() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        buttons,
        ..
    } = three_buttons(&recording);
    assert_eq!(harness.focused(), None);

    assert_eq!(harness.press_key(Key::Tab), Handled::Yes);
    assert_eq!(harness.focused(), Some(buttons[0]));
    assert_eq!(
        focus_events(&recording),
        vec![(root, EventType::FocusOut), (buttons[0], EventType::FocusIn)]
    );

    harness.press_key(Key::Tab);
    assert_eq!(harness.focused(), Some(buttons[1]));
    assert_eq!(
        focus_events(&recording),
        vec![
            (buttons[0], EventType::FocusOut),
            (buttons[1], EventType::FocusIn)
        ]
    );

    harness.press_key_with(Key::Tab, Modifiers::SHIFT);
    assert_eq!(harness.focused(), Some(buttons[0]));
    assert_eq!(
        focus_events(&recording),
        vec![
            (buttons[1], EventType::FocusOut),
            (buttons[0], EventType::FocusIn)
        ]
    );

    let state = harness.tree().state(buttons[0]).unwrap();
    assert!(state.is_focused());
    assert!(!harness.tree().state(buttons[1]).unwrap().is_focused());
}

#[test]
fn tab_wraps_around() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);

    for _ in 0..4 {
        harness.press_key(Key::Tab);
    }
    assert_eq!(harness.focused(), Some(buttons[0]));

    harness.press_key_with(Key::Tab, Modifiers::SHIFT);
    assert_eq!(harness.focused(), Some(buttons[2]));
}

#[test]
fn tab_with_other_modifiers_is_not_traversal() {
    let recording = Recording::default();
    let ThreeButtons { mut harness, .. } = three_buttons(&recording);

    assert_eq!(harness.press_key_with(Key::Tab, Modifiers::CTRL), Handled::No);
    assert_eq!(harness.focused(), None);
}

#[test]
fn tab_skips_hidden_and_disabled_elements() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);
    harness.tree_mut().set_visible(buttons[0], false).unwrap();
    harness.tree_mut().set_enabled(buttons[1], false).unwrap();

    harness.press_key(Key::Tab);
    assert_eq!(harness.focused(), Some(buttons[2]));
    harness.press_key(Key::Tab);
    assert_eq!(harness.focused(), Some(buttons[2]));
}

#[test]
fn tab_without_focusable_elements_is_not_handled() {
    let mut harness = TestHarness::create();
    assert_eq!(harness.press_key(Key::Tab), Handled::No);
    assert_eq!(harness.focused(), None);
}

#[test]
fn focusing_the_focused_element_is_a_no_op() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);

    harness.app_mut().set_focus(buttons[1]).unwrap();
    assert_eq!(focus_events(&recording).len(), 2);

    harness.app_mut().set_focus(buttons[1]).unwrap();
    assert_eq!(focus_events(&recording), vec![]);
    assert_eq!(harness.focused(), Some(buttons[1]));
}

#[test]
fn clearing_focus_returns_it_to_the_root() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        buttons,
        ..
    } = three_buttons(&recording);
    let window = harness.window_id();

    harness.app_mut().set_focus(buttons[2]).unwrap();
    recording.clear();
    harness.app_mut().clear_focus(window);
    assert_eq!(harness.focused(), None);
    assert_eq!(
        focus_events(&recording),
        vec![(buttons[2], EventType::FocusOut), (root, EventType::FocusIn)]
    );
}

#[test]
fn unfocusable_element_is_refused() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        column,
        ..
    } = three_buttons(&recording);

    assert_matches!(
        harness.app_mut().set_focus(column),
        Err(FocusError::NotFocusable(id)) if id == column
    );
    assert_eq!(harness.focused(), None);
    assert_matches!(&harness.take_errors()[..], [record] if record.kind == ErrorKind::InvariantBreach);

    let detached = harness.tree_mut().insert(button());
    assert_matches!(
        harness.app_mut().set_focus(detached),
        Err(FocusError::Detached(_))
    );
}

#[test]
fn handler_can_request_focus() {
    let grabber = button().event_fn(|_, ctx, event| {
        if event.event_type() == EventType::MouseDown {
            ctx.request_focus();
        }
        Ok(Handled::No)
    });
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons_with(&recording, [button(), grabber, button()]);

    harness.click((400., 74.));
    assert_eq!(harness.focused(), Some(buttons[1]));
}

#[test]
fn hiding_the_focused_element_drops_focus_silently() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);

    harness.app_mut().set_focus(buttons[0]).unwrap();
    recording.clear();
    harness.tree_mut().set_visible(buttons[0], false).unwrap();
    harness.app_mut().run_layout();

    assert_eq!(harness.focused(), None);
    assert!(!harness.tree().state(buttons[0]).unwrap().is_focused());
    assert_eq!(focus_events(&recording), vec![]);
}

#[test]
fn destroying_the_focused_element_drops_focus() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);

    harness.app_mut().set_focus(buttons[1]).unwrap();
    harness.tree_mut().destroy(buttons[1]).unwrap();
    harness.press_key(Key::Tab);
    // Traversal starts over, as if nothing had been focused.
    assert_eq!(harness.focused(), Some(buttons[0]));
}

#[test]
fn native_window_focus_is_tracked() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness, root, ..
    } = three_buttons(&recording);
    let window = harness.window_id();

    harness.process_event(EventKind::FocusIn);
    assert!(harness.app().window(window).unwrap().has_native_focus());
    assert_eq!(
        recording.drain_events(),
        vec![(root, Phase::Target, EventType::FocusIn)]
    );

    harness.process_event(EventKind::FocusOut);
    assert!(!harness.app().window(window).unwrap().has_native_focus());
}

#[test]
fn losing_window_focus_releases_modifiers() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);
    harness.press_key(Key::Tab);
    harness.press_key(Key::Tab);
    assert_eq!(harness.focused(), Some(buttons[1]));

    // Shift is released while another window has focus.
    harness.key_down(Key::Shift);
    assert_eq!(harness.app().modifiers(), Modifiers::SHIFT);
    harness.process_event(EventKind::FocusOut);
    harness.process_event(EventKind::FocusIn);
    assert_eq!(harness.app().modifiers(), Modifiers::empty());

    harness.press_key(Key::Tab);
    assert_eq!(harness.focused(), Some(buttons[2]), "plain Tab moves forwards");
}

#[test]
fn platform_modifiers_replace_tracked_ones() {
    let recording = Recording::default();
    let ThreeButtons { mut harness, .. } = three_buttons(&recording);
    let window = harness.window_id();

    harness.key_down(Key::Shift);
    assert_eq!(harness.app().modifiers(), Modifiers::SHIFT);
    harness.app_mut().dispatch(
        Event::new(EventKind::MouseMove)
            .in_window(window)
            .with_modifiers(Modifiers::CTRL),
    );
    assert_eq!(harness.app().modifiers(), Modifiers::CTRL);
}
