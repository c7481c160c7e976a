// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::axis::Axis;
use crate::geometry::{Rect, Size};
use crate::layout::{ContainerLayout, DockSide, LayoutItem, ceil_len};

/// Whether the item at `index` claims whatever space is left.
fn fills(layout: &ContainerLayout, items: &[LayoutItem], index: usize, has_explicit_fill: bool) -> bool {
    let item = &items[index];
    if item.constraints.dock == DockSide::Fill {
        return true;
    }
    let is_last = items[index + 1..].iter().all(|i| !i.visible);
    layout.last_child_fill && !has_explicit_fill && is_last
}

/// Places `item` in `area`, taking the whole of it where the size rule allows.
fn place_in(item: &LayoutItem, area: Rect<f64>, base: Rect<f64>) -> Rect<f64> {
    let margin = item.constraints.margin;
    let inner_width = (area.width - f64::from(margin.horizontal())).max(0.);
    let inner_height = (area.height - f64::from(margin.vertical())).max(0.);
    let width = item.resolve(Axis::Horizontal, inner_width, base.width, true);
    let height = item.resolve(Axis::Vertical, inner_height, base.height, true);
    Rect::new(
        area.x + f64::from(margin.left),
        area.y + f64::from(margin.top),
        width,
        height,
    )
}

pub(super) fn compute(
    layout: &ContainerLayout,
    content: Rect<i32>,
    items: &[LayoutItem],
) -> Vec<Option<Rect<i32>>> {
    let mut result = vec![None; items.len()];
    let base = content.to_f64();
    let mut remaining = base;
    let has_explicit_fill = items
        .iter()
        .any(|i| i.visible && i.constraints.dock == DockSide::Fill);
    let mut deferred = Vec::new();

    for (index, item) in items.iter().enumerate() {
        if !item.visible {
            continue;
        }
        if fills(layout, items, index, has_explicit_fill) {
            deferred.push(index);
            continue;
        }
        let axis = match item.constraints.dock {
            DockSide::Left | DockSide::Right => Axis::Horizontal,
            _ => Axis::Vertical,
        };
        let (margin_start, margin_end) = axis.major_insets(item.constraints.margin);
        let margins = f64::from(margin_start + margin_end);
        let (_, remaining_len) = axis.major_span(remaining);
        let (_, base_len) = axis.major_span(base);

        // The strip is sized by the item's main-axis rule and capped by what is left.
        let len = item
            .resolve(axis, (remaining_len - margins).max(0.), base_len, false)
            .min((remaining_len - margins).max(0.));
        let outer = len + margins;
        let strip = match item.constraints.dock {
            DockSide::Left => {
                let strip = remaining.with_size(Size::new(outer, remaining.height));
                remaining.x += outer;
                remaining.width -= outer;
                strip
            }
            DockSide::Right => {
                remaining.width -= outer;
                Rect::new(remaining.right(), remaining.y, outer, remaining.height)
            }
            DockSide::Top => {
                let strip = remaining.with_size(Size::new(remaining.width, outer));
                remaining.y += outer;
                remaining.height -= outer;
                strip
            }
            DockSide::Bottom | DockSide::Fill => {
                remaining.height -= outer;
                Rect::new(remaining.x, remaining.bottom(), remaining.width, outer)
            }
        };
        let mut rect = place_in(item, strip, base);
        match axis {
            Axis::Horizontal => rect.width = len,
            Axis::Vertical => rect.height = len,
        }
        result[index] = Some(rect.round_edges());
    }

    for index in deferred {
        result[index] = Some(place_in(&items[index], remaining, base).round_edges());
    }
    result
}

pub(super) fn required(layout: &ContainerLayout, items: &[LayoutItem]) -> Size<i32> {
    let has_explicit_fill = items
        .iter()
        .any(|i| i.visible && i.constraints.dock == DockSide::Fill);
    let mut width: f64 = 0.;
    let mut height: f64 = 0.;

    for (index, item) in items.iter().enumerate() {
        if item.visible && fills(layout, items, index, has_explicit_fill) {
            width = width.max(item.natural_outer(Axis::Horizontal));
            height = height.max(item.natural_outer(Axis::Vertical));
        }
    }
    // Docked strips wrap around what comes after them, so accumulate backwards.
    for (index, item) in items.iter().enumerate().rev() {
        if !item.visible || fills(layout, items, index, has_explicit_fill) {
            continue;
        }
        let item_width = item.natural_outer(Axis::Horizontal);
        let item_height = item.natural_outer(Axis::Vertical);
        match item.constraints.dock {
            DockSide::Left | DockSide::Right => {
                width += item_width;
                height = height.max(item_height);
            }
            _ => {
                width = width.max(item_width);
                height += item_height;
            }
        }
    }
    Size::new(ceil_len(width), ceil_len(height))
}

#[cfg(test)]
mod tests {
    use crate::layout::{Constraints, Direction, SizeSpec, compute, required_size};

    use super::*;

    fn docked(side: DockSide, width: f64, height: f64) -> LayoutItem {
        LayoutItem::new(
            Constraints::sized(SizeSpec::fixed(width), SizeSpec::fixed(height)).with_dock(side),
            Size::default(),
        )
    }

    fn strip(side: DockSide, len: i32) -> LayoutItem {
        LayoutItem::new(Constraints::default().with_dock(side), Size::new(len, len))
    }

    #[test]
    fn strips_consume_remaining_space_and_last_fills() {
        let layout = ContainerLayout::new(Direction::Dock);
        let items = [
            strip(DockSide::Top, 20),
            strip(DockSide::Left, 30),
            strip(DockSide::Bottom, 10),
            strip(DockSide::Right, 40),
            strip(DockSide::Left, 5),
        ];
        let rects = compute(&layout, Rect::new(0, 0, 200, 100), &items);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 200, 20)));
        assert_eq!(rects[1], Some(Rect::new(0, 20, 30, 80)));
        assert_eq!(rects[2], Some(Rect::new(30, 90, 170, 10)));
        assert_eq!(rects[3], Some(Rect::new(160, 20, 40, 70)));
        assert_eq!(rects[4], Some(Rect::new(30, 20, 130, 70)));
    }

    #[test]
    fn explicit_fill_is_placed_after_the_strips() {
        let layout = ContainerLayout::new(Direction::Dock);
        let items = [
            LayoutItem::new(Constraints::fill().with_dock(DockSide::Fill), Size::default()),
            strip(DockSide::Left, 30),
            strip(DockSide::Right, 30),
        ];
        let rects = compute(&layout, Rect::new(0, 0, 100, 50), &items);
        assert_eq!(rects[0], Some(Rect::new(30, 0, 40, 50)));
        assert_eq!(rects[2], Some(Rect::new(70, 0, 30, 50)));
    }

    #[test]
    fn without_last_child_fill_every_item_docks() {
        let layout = ContainerLayout::new(Direction::Dock).with_last_child_fill(false);
        let items = [docked(DockSide::Left, 10., 10.), docked(DockSide::Top, 10., 10.)];
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &items);
        assert_eq!(rects[1], Some(Rect::new(10, 0, 10, 10)));
    }

    #[test]
    fn required_size_wraps_strips_around_the_fill() {
        let layout = ContainerLayout::new(Direction::Dock);
        let items = [
            strip(DockSide::Top, 20),
            strip(DockSide::Left, 30),
            LayoutItem::new(Constraints::default(), Size::new(50, 40)),
        ];
        assert_eq!(required_size(&layout, &items), Size::new(80, 60));
    }
}
