// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Horizontal and vertical box layout, with optional line wrapping.

use crate::axis::Axis;
use crate::geometry::{Rect, Size};
use crate::layout::{
    Alignment, ContainerLayout, LayoutItem, SizeMode, Wrap, align_in, ceil_len, snap,
};

/// The main-axis size of `item` before free space is distributed.
fn base_main(item: &LayoutItem, axis: Axis, main_len: f64) -> f64 {
    let constraints = &item.constraints;
    let value = match constraints.flex_basis {
        Some(basis) => f64::from(basis),
        None => {
            let spec = constraints.spec(axis);
            match spec.mode {
                SizeMode::Fixed => spec.value,
                SizeMode::Percent => spec.value / 100. * main_len,
                SizeMode::Auto => f64::from(axis.major(item.preferred)),
                SizeMode::Fill => 0.,
            }
        }
    };
    constraints.clamp(axis, value.max(0.))
}

fn grow_factor(item: &LayoutItem, axis: Axis) -> f64 {
    let grow = item.constraints.flex_grow.max(0.);
    if item.constraints.spec(axis).mode == SizeMode::Fill {
        grow.max(1.)
    } else {
        grow
    }
}

fn margin_sum(item: &LayoutItem, axis: Axis) -> f64 {
    let (start, end) = axis.major_insets(item.constraints.margin);
    f64::from(start + end)
}

fn gaps(spacing: i32, count: usize) -> f64 {
    f64::from(spacing) * count.saturating_sub(1) as f64
}

/// Distributes `free` space over `sizes` in proportion to `weights`.
///
/// Items which reach a limit are frozen and the rest of the space is shared
/// between the others.
fn distribute(
    sizes: &mut [f64],
    weights: &[f64],
    mut free: f64,
    limit: impl Fn(usize, f64) -> f64,
) {
    let mut frozen: Vec<bool> = weights.iter().map(|w| *w <= 0.).collect();
    loop {
        let total: f64 = weights
            .iter()
            .zip(&frozen)
            .filter(|(_, f)| !**f)
            .map(|(w, _)| w)
            .sum();
        if total <= 0. || free.abs() < 1e-9 {
            return;
        }
        let mut used = 0.;
        let mut violated = false;
        for (i, (size, weight)) in sizes.iter_mut().zip(weights).enumerate() {
            if frozen[i] {
                continue;
            }
            let target = *size + free * weight / total;
            let clamped = limit(i, target);
            if clamped != target {
                used += clamped - *size;
                *size = clamped;
                frozen[i] = true;
                violated = true;
            }
        }
        if !violated {
            for ((size, weight), frozen) in sizes.iter_mut().zip(weights).zip(&frozen) {
                if !frozen {
                    *size += free * weight / total;
                }
            }
            return;
        }
        free -= used;
    }
}

/// Resolves the main-axis sizes, margins excluded, of one line of items.
fn main_sizes(axis: Axis, line: &[&LayoutItem], main_len: f64, spacing: i32) -> Vec<f64> {
    let mut sizes: Vec<f64> = line
        .iter()
        .map(|item| base_main(item, axis, main_len))
        .collect();
    let margins: f64 = line.iter().map(|item| margin_sum(item, axis)).sum();
    let available = main_len - gaps(spacing, line.len()) - margins;
    let free = available - sizes.iter().sum::<f64>();

    if free > 0. {
        let weights: Vec<f64> = line.iter().map(|item| grow_factor(item, axis)).collect();
        distribute(&mut sizes, &weights, free, |i, target| {
            line[i].constraints.clamp(axis, target)
        });
    } else if free < 0. {
        // Without shrink weights, items keep their size and overflow in order.
        let weights: Vec<f64> = line
            .iter()
            .map(|item| item.constraints.flex_shrink.max(0.))
            .collect();
        distribute(&mut sizes, &weights, free, |i, target| {
            let (min, _) = line[i].constraints.limits(axis);
            target.max(f64::from(min))
        });
    }
    sizes
}

/// Splits the visible items into lines which fit `main_len`.
fn break_lines<'a>(
    axis: Axis,
    wrap: Wrap,
    items: &[(usize, &'a LayoutItem)],
    main_len: f64,
    spacing: i32,
) -> Vec<Vec<(usize, &'a LayoutItem)>> {
    if wrap == Wrap::NoWrap {
        return vec![items.to_vec()];
    }
    let mut lines: Vec<Vec<(usize, &LayoutItem)>> = Vec::new();
    let mut current = Vec::new();
    let mut cursor = 0.;
    for &(index, item) in items {
        let outer = base_main(item, axis, main_len) + margin_sum(item, axis);
        if !current.is_empty() && cursor + f64::from(spacing) + outer > main_len {
            lines.push(std::mem::take(&mut current));
            cursor = 0.;
        }
        if !current.is_empty() {
            cursor += f64::from(spacing);
        }
        cursor += outer;
        current.push((index, item));
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Space before the first item and between items, for `extra` free space.
fn get_spacing(alignment: Alignment, extra: f64, child_count: usize) -> (f64, f64) {
    let space_before;
    let space_between;
    match alignment {
        _ if child_count == 0 || extra <= 0. => {
            space_before = 0.;
            space_between = 0.;
        }
        Alignment::Start | Alignment::Stretch => {
            space_before = 0.;
            space_between = 0.;
        }
        Alignment::End => {
            space_before = extra;
            space_between = 0.;
        }
        Alignment::Center => {
            space_before = extra / 2.;
            space_between = 0.;
        }
        Alignment::SpaceBetween => {
            let equal_space = extra / (child_count - 1).max(1) as f64;
            space_before = 0.;
            space_between = equal_space;
        }
        Alignment::SpaceEvenly => {
            let equal_space = extra / (child_count + 1) as f64;
            space_before = equal_space;
            space_between = equal_space;
        }
        Alignment::SpaceAround => {
            let equal_space = extra / (2 * child_count) as f64;
            space_before = equal_space;
            space_between = equal_space * 2.;
        }
    }
    (space_before, space_between)
}

/// The cross size of `item` inside a line of `line_cross`, margins excluded.
fn cross_size(item: &LayoutItem, axis: Axis, align: Alignment, available: f64, base: f64) -> f64 {
    let cross = axis.cross();
    item.resolve(cross, available, base, align == Alignment::Stretch)
}

pub(super) fn compute(
    axis: Axis,
    layout: &ContainerLayout,
    wrap: Wrap,
    content: Rect<i32>,
    items: &[LayoutItem],
) -> Vec<Option<Rect<i32>>> {
    let mut result = vec![None; items.len()];
    let visible: Vec<(usize, &LayoutItem)> =
        items.iter().enumerate().filter(|(_, i)| i.visible).collect();
    if visible.is_empty() {
        return result;
    }

    let cross = axis.cross();
    let (main_start, main_len) = axis.major_span(content);
    let (cross_start, cross_len) = axis.minor_span(content);
    let (main_start, main_len) = (f64::from(main_start), f64::from(main_len.max(0)));
    let (cross_start, cross_len) = (f64::from(cross_start), f64::from(cross_len.max(0)));

    let lines = break_lines(axis, wrap, &visible, main_len, layout.spacing);
    let single_line = wrap == Wrap::NoWrap;

    let mut line_offset = 0.;
    for line in &lines {
        let line_items: Vec<&LayoutItem> = line.iter().map(|(_, item)| *item).collect();
        let sizes = main_sizes(axis, &line_items, main_len, layout.spacing);

        let line_cross = if single_line {
            cross_len
        } else {
            line_items
                .iter()
                .map(|item| {
                    let (start, end) = cross.major_insets(item.constraints.margin);
                    item.resolve(cross, cross_len, cross_len, false) + f64::from(start + end)
                })
                .fold(0., f64::max)
        };
        let line_start = match wrap {
            Wrap::WrapReverse => cross_start + cross_len - line_offset - line_cross,
            _ => cross_start + line_offset,
        };

        let used: f64 = sizes.iter().sum::<f64>()
            + line_items.iter().map(|i| margin_sum(i, axis)).sum::<f64>()
            + gaps(layout.spacing, line.len());
        let (before, between) = get_spacing(layout.main_align, main_len - used, line.len());

        let mut cursor = main_start + before;
        for (&(index, item), &size) in line.iter().zip(&sizes) {
            let (margin_start, margin_end) = axis.major_insets(item.constraints.margin);
            let (cross_margin_start, cross_margin_end) =
                cross.major_insets(item.constraints.margin);
            let align = item.constraints.align_self.unwrap_or(layout.cross_align);
            let available = (line_cross - f64::from(cross_margin_start + cross_margin_end)).max(0.);
            let cross_extent = cross_size(item, axis, align, available, cross_len);
            let cross_pos = align_in(
                align,
                line_start + f64::from(cross_margin_start),
                available,
                cross_extent,
            );

            cursor += f64::from(margin_start);
            result[index] = Some(axis.pack_rect(snap(cursor, size), snap(cross_pos, cross_extent)));
            cursor += size + f64::from(margin_end) + f64::from(layout.spacing) + between;
        }

        line_offset += line_cross + f64::from(layout.line_spacing);
    }
    result
}

pub(super) fn required(axis: Axis, layout: &ContainerLayout, items: &[LayoutItem]) -> Size<i32> {
    let visible: Vec<&LayoutItem> = items.iter().filter(|i| i.visible).collect();
    let main: f64 = visible
        .iter()
        .map(|item| {
            let basis = item.constraints.flex_basis.map(f64::from);
            basis.unwrap_or_else(|| item.natural(axis)) + margin_sum(item, axis)
        })
        .sum::<f64>()
        + gaps(layout.spacing, visible.len());
    let cross = visible
        .iter()
        .map(|item| item.natural_outer(axis.cross()))
        .fold(0., f64::max);
    axis.pack_size(ceil_len(main), ceil_len(cross))
}
