// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use assert_matches::assert_matches;

use crate::color::{Color, Paint};
use crate::core::Container;
use crate::error::ErrorKind;
use crate::geometry::{Insets, Point, Rect, Size};
use crate::layout::{Constraints, ContainerLayout, SizeSpec};
use crate::render::shapes;
use crate::testing::{DrawCommand, ModularElement, Record, Recording, TestHarness};
use crate::tests::{ThreeButtons, button, three_buttons, three_buttons_with};

fn red_button() -> ModularElement<()> {
    button().paint_fn(|_, ctx, render| {
        render.set_fill(Color::RED);
        shapes::fill_rect(render, Rect::from_origin_size(Point::ZERO, ctx.size().to_f64()));
    })
}

fn fills(commands: &[DrawCommand]) -> Vec<(kurbo::Rect, Option<kurbo::Rect>)> {
    commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Fill { bounds, clip, .. } => Some((*bounds, *clip)),
            _ => None,
        })
        .collect()
}

#[test]
fn parents_paint_before_their_children() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        column,
        buttons,
    } = three_buttons(&recording);

    harness.render();
    assert_eq!(
        recording.drain_paints(),
        vec![root, column, buttons[0], buttons[1], buttons[2]]
    );
}

#[test]
fn post_paint_runs_after_the_children() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        column,
        buttons,
        ..
    } = three_buttons(&recording);

    harness.render();
    let records = recording.drain();
    let paint = |id| {
        records
            .iter()
            .position(|r| matches!(r, Record::Paint(p) if *p == id))
            .unwrap()
    };
    let post_paint = |id| {
        records
            .iter()
            .position(|r| matches!(r, Record::PostPaint(p) if *p == id))
            .unwrap()
    };
    for button in buttons {
        assert!(paint(column) < paint(button));
        assert!(post_paint(button) < post_paint(column));
    }
}

#[test]
fn z_order_changes_sibling_paint_order() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        column,
        buttons,
    } = three_buttons(&recording);

    harness.tree_mut().set_z_order(buttons[0], 1).unwrap();
    harness.tree_mut().set_z_order(buttons[2], -1).unwrap();
    harness.render();
    assert_eq!(
        recording.drain_paints(),
        vec![root, column, buttons[2], buttons[1], buttons[0]]
    );
    // Tree order is untouched.
    assert_eq!(harness.tree().children(column), &buttons);
}

#[test]
fn hidden_subtrees_are_not_painted() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        root,
        column,
        ..
    } = three_buttons(&recording);

    harness.tree_mut().set_visible(column, false).unwrap();
    harness.render();
    assert_eq!(recording.drain_paints(), vec![root]);
}

#[test]
fn frame_clears_then_paints_the_window_background() {
    let mut harness = TestHarness::create();
    let commands = harness.render();

    assert_eq!(commands.first(), Some(&DrawCommand::Clear(Color::TRANSPARENT)));
    assert_matches!(
        &commands[1],
        DrawCommand::Fill { bounds, paint: Paint::Solid(color), .. }
            if *bounds == kurbo::Rect::new(0., 0., 800., 600.) && *color == Color::WHITE
    );
    assert_eq!(commands.last(), Some(&DrawCommand::SwapBuffers));
    assert_eq!(commands.len(), 3);
    assert_eq!(harness.backend().swap_count(), 1);
}

#[test]
fn elements_paint_in_their_own_coordinates() {
    let recording = Recording::default();
    let ThreeButtons { mut harness, .. } =
        three_buttons_with(&recording, [button(), red_button(), button()]);

    let commands = harness.render();
    let button_rect = kurbo::Rect::new(10., 54., 790., 94.);
    assert_eq!(fills(&commands), vec![(button_rect, Some(button_rect))]);
    assert_matches!(
        commands.iter().find(|c| matches!(c, DrawCommand::Fill { .. })),
        Some(DrawCommand::Fill { paint: Paint::Solid(color), .. }) if *color == Color::RED
    );
}

#[test]
fn painting_outside_the_bounds_is_clipped() {
    let overdraw = button().paint_fn(|_, _, render| {
        render.set_fill(Color::BLUE);
        shapes::fill_rect(render, Rect::new(-5., -5., 200., 200.));
    });
    let recording = Recording::default();
    let ThreeButtons { mut harness, .. } =
        three_buttons_with(&recording, [overdraw, button(), button()]);

    let commands = harness.render();
    assert_eq!(
        fills(&commands),
        vec![(
            kurbo::Rect::new(5., 5., 205., 205.),
            Some(kurbo::Rect::new(10., 10., 790., 50.))
        )]
    );
}

#[test]
fn container_background_is_painted() {
    let mut harness = TestHarness::create_with_size(Size::new(200, 100));
    let root = harness.root();
    let column = harness.add_child(root, Container::new());
    let panel = harness.add_child(column, Container::with_background(Color::GREEN));
    let tree = harness.tree_mut();
    tree.set_layout(
        column,
        Some(ContainerLayout::vertical().with_padding(Insets::uniform(10))),
    )
    .unwrap();
    tree.set_constraints(panel, Constraints::sized(SizeSpec::FILL, SizeSpec::fixed(30.)))
        .unwrap();

    let commands = harness.render();
    let fills: Vec<_> = commands
        .iter()
        .filter_map(|command| match command {
            DrawCommand::Fill { bounds, paint, .. } => Some((*bounds, paint.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        fills,
        vec![
            (
                kurbo::Rect::new(0., 0., 200., 100.),
                Paint::Solid(Color::WHITE)
            ),
            (
                kurbo::Rect::new(10., 10., 190., 40.),
                Paint::Solid(Color::GREEN)
            ),
        ]
    );
}

#[test]
fn only_changed_windows_are_repainted() {
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons(&recording);
    let window = harness.window_id();

    harness.render();
    let swaps = harness.backend().swap_count();
    let redraws = harness.platform().redraw_count(window);

    harness.app_mut().render();
    assert_eq!(harness.backend().swap_count(), swaps);
    assert_eq!(harness.platform().redraw_count(window), redraws);

    harness.tree_mut().set_z_order(buttons[1], 3).unwrap();
    harness.app_mut().render();
    assert_eq!(harness.backend().swap_count(), swaps + 1);
    assert_eq!(harness.platform().redraw_count(window), redraws + 1);
    assert!(!harness.tree().state(harness.root()).unwrap().needs_paint());
}

#[test]
fn panicking_paint_is_contained() {
    let faulty = button().paint_fn(|_, _, _| panic!("paint exploded"));
    let recording = Recording::default();
    let ThreeButtons {
        mut harness,
        buttons,
        ..
    } = three_buttons_with(&recording, [button(), faulty, button()]);

    let commands = harness.render();
    assert_eq!(commands.last(), Some(&DrawCommand::SwapBuffers));
    let paints = recording.drain_paints();
    assert!(paints.contains(&buttons[2]));

    let errors = harness.take_errors();
    assert_matches!(
        &errors[..],
        [record] if record.kind == ErrorKind::HandlerFault
            && record.element == Some(buttons[1])
            && record.message.contains("paint exploded")
    );
}

#[test]
fn leaked_render_state_is_reported_and_restored() {
    let leaky = button().paint_fn(|_, _, render| {
        render.push_state();
        render.translate(1000., 1000.);
    });
    let recording = Recording::default();
    let ThreeButtons { mut harness, .. } =
        three_buttons_with(&recording, [leaky, button(), red_button()]);

    let commands = harness.render();
    let button_rect = kurbo::Rect::new(10., 98., 790., 138.);
    assert_eq!(fills(&commands), vec![(button_rect, Some(button_rect))]);

    let errors = harness.take_errors();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.kind == ErrorKind::InvariantBreach));
}
