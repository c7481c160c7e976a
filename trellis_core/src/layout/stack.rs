// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Overlaid and absolutely positioned children.

use crate::axis::Axis;
use crate::geometry::{Rect, Size};
use crate::layout::{Alignment, ContainerLayout, LayoutItem, SizeMode, align_in, ceil_len};

fn place_axis(item: &LayoutItem, axis: Axis, align: Alignment, content: Rect<i32>) -> (f64, f64) {
    let (start, len) = axis.major_span(content);
    let (margin_start, margin_end) = axis.major_insets(item.constraints.margin);
    let available = f64::from((len - margin_start - margin_end).max(0));
    let size = item.resolve(axis, available, f64::from(len), align == Alignment::Stretch);
    let pos = align_in(align, f64::from(start + margin_start), available, size);
    (pos, size)
}

pub(super) fn compute_stack(
    layout: &ContainerLayout,
    content: Rect<i32>,
    items: &[LayoutItem],
) -> Vec<Option<Rect<i32>>> {
    items
        .iter()
        .map(|item| {
            if !item.visible {
                return None;
            }
            let horizontal = item.constraints.align_self.unwrap_or(layout.main_align);
            let vertical = item.constraints.align_self.unwrap_or(layout.cross_align);
            let (x, width) = place_axis(item, Axis::Horizontal, horizontal, content);
            let (y, height) = place_axis(item, Axis::Vertical, vertical, content);
            Some(Rect::new(x, y, width, height).round_edges())
        })
        .collect()
}

/// The size an absolutely positioned item keeps along `axis`.
fn absolute_len(item: &LayoutItem, axis: Axis) -> i32 {
    let spec = item.constraints.spec(axis);
    let current = axis.major(item.current.size());
    let len = if spec.mode == SizeMode::Fixed {
        ceil_len(spec.value)
    } else if current > 0 {
        current
    } else {
        axis.major(item.preferred)
    };
    let (min, max) = item.constraints.limits(axis);
    len.clamp(min, max)
}

pub(super) fn compute_absolute(items: &[LayoutItem]) -> Vec<Option<Rect<i32>>> {
    items
        .iter()
        .map(|item| {
            item.visible.then(|| {
                Rect::new(
                    item.current.x,
                    item.current.y,
                    absolute_len(item, Axis::Horizontal),
                    absolute_len(item, Axis::Vertical),
                )
            })
        })
        .collect()
}

pub(super) fn required_stack(items: &[LayoutItem]) -> Size<i32> {
    let (width, height) = items
        .iter()
        .filter(|i| i.visible)
        .fold((0_f64, 0_f64), |(w, h), item| {
            (
                w.max(item.natural_outer(Axis::Horizontal)),
                h.max(item.natural_outer(Axis::Vertical)),
            )
        });
    Size::new(ceil_len(width), ceil_len(height))
}

pub(super) fn required_absolute(items: &[LayoutItem]) -> Size<i32> {
    compute_absolute(items)
        .into_iter()
        .flatten()
        .fold(Size::new(0, 0), |size, rect| {
            Size::new(size.width.max(rect.right()), size.height.max(rect.bottom()))
        })
}
