// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! We test the passes here, through the public API of the application, instead of
//! in each pass module.

use crate::core::{Container, ElementId};
use crate::geometry::{Insets, Size};
use crate::layout::{Constraints, ContainerLayout, SizeSpec};
use crate::testing::{ModularElement, Recording, TestElementExt, TestHarness};

mod focus;
mod mutate;
mod paint;

/// An 800x600 window holding a padded column with three 40px tall buttons.
///
/// Every element, the window root included, records into `recording`.
pub(super) struct ThreeButtons {
    pub(super) harness: TestHarness,
    pub(super) root: ElementId,
    pub(super) column: ElementId,
    pub(super) buttons: [ElementId; 3],
}

pub(super) fn button() -> ModularElement<()> {
    ModularElement::new(()).accepts_focus(true)
}

pub(super) fn three_buttons(recording: &Recording) -> ThreeButtons {
    three_buttons_with(recording, [button(), button(), button()])
}

pub(super) fn three_buttons_with(
    recording: &Recording,
    buttons: [ModularElement<()>; 3],
) -> ThreeButtons {
    let root_element = ModularElement::new(()).record(recording);
    let mut harness = TestHarness::create_with_root(Size::new(800, 600), root_element);
    let root = harness.root();

    let column = harness.add_child(root, Container::new().record(recording));
    let tree = harness.tree_mut();
    tree.set_constraints(column, Constraints::fill()).unwrap();
    tree.set_layout(
        column,
        Some(
            ContainerLayout::vertical()
                .with_padding(Insets::uniform(10))
                .with_spacing(4),
        ),
    )
    .unwrap();

    let buttons = buttons.map(|button| {
        let id = harness.add_child(column, button.record(recording));
        harness
            .tree_mut()
            .set_constraints(id, Constraints::sized(SizeSpec::FILL, SizeSpec::fixed(40.)))
            .unwrap();
        id
    });
    harness.app_mut().run_layout();
    recording.clear();

    ThreeButtons {
        harness,
        root,
        column,
        buttons,
    }
}
