// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use hashbrown::HashSet;

use crate::axis::Axis;
use crate::geometry::{Rect, Size};
use crate::layout::{Alignment, ContainerLayout, LayoutItem, align_in, ceil_len};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    row: u32,
    column: u32,
    row_span: u32,
    column_span: u32,
}

/// Rows and columns beyond this many are clamped away.
const MAX_TRACKS: u32 = 1024;

fn columns(layout: &ContainerLayout) -> u32 {
    layout.grid_columns.clamp(1, MAX_TRACKS)
}

/// The number of row tracks, given the rows used by placed items.
fn rows(layout: &ContainerLayout, used_rows: u32) -> u32 {
    used_rows.max(layout.grid_rows.min(MAX_TRACKS))
}

/// Assigns every visible item a cell, row-major.
///
/// Explicitly placed items are put first; the others flow into the free cells.
/// Returns the cells and the number of rows in use.
fn place(layout: &ContainerLayout, items: &[LayoutItem]) -> (Vec<Option<Cell>>, u32) {
    let columns = columns(layout);
    let mut occupied: HashSet<(u32, u32)> = HashSet::new();
    let mut cells = vec![None; items.len()];
    let mut rows = 0;

    let mut occupy = |cell: Cell, occupied: &mut HashSet<(u32, u32)>| {
        for row in cell.row..cell.row.saturating_add(cell.row_span) {
            for column in cell.column..cell.column + cell.column_span {
                occupied.insert((row, column));
            }
        }
        rows = rows.max(cell.row.saturating_add(cell.row_span));
    };

    for (index, item) in items.iter().enumerate() {
        let placement = item.constraints.grid;
        if !item.visible || (placement.row.is_none() && placement.column.is_none()) {
            continue;
        }
        let column = placement.column.unwrap_or(0).min(columns - 1);
        let row = placement.row.unwrap_or(0).min(MAX_TRACKS - 1);
        let cell = Cell {
            row,
            column,
            row_span: placement.row_span.clamp(1, MAX_TRACKS - row),
            column_span: placement.column_span.clamp(1, columns - column),
        };
        occupy(cell, &mut occupied);
        cells[index] = Some(cell);
    }

    let mut cursor = 0_u32;
    for (index, item) in items.iter().enumerate() {
        let placement = item.constraints.grid;
        if !item.visible || placement.row.is_some() || placement.column.is_some() {
            continue;
        }
        let column_span = placement.column_span.clamp(1, columns);
        let row_span = placement.row_span.clamp(1, MAX_TRACKS);
        let fits = |row: u32, column: u32, occupied: &HashSet<(u32, u32)>| {
            column + column_span <= columns
                && (row..row.saturating_add(row_span))
                    .all(|r| (column..column + column_span).all(|c| !occupied.contains(&(r, c))))
        };
        while !fits(cursor / columns, cursor % columns, &occupied) {
            cursor += 1;
        }
        let cell = Cell {
            row: cursor / columns,
            column: cursor % columns,
            row_span,
            column_span,
        };
        occupy(cell, &mut occupied);
        cells[index] = Some(cell);
        cursor += column_span;
    }

    (cells, rows)
}

/// Splits `total` into `count` tracks separated by `spacing`.
///
/// The remainder pixels go to the first tracks, one each.
fn split_evenly(start: i32, total: i32, count: u32, spacing: i32) -> Vec<(i32, i32)> {
    let count_i = i32::try_from(count).unwrap_or(i32::MAX).max(1);
    let available = (total - spacing * (count_i - 1)).max(0);
    let base = available / count_i;
    let remainder = available % count_i;
    let mut tracks = Vec::with_capacity(count as usize);
    let mut cursor = start;
    for index in 0..count_i {
        let len = base + i32::from(index < remainder);
        tracks.push((cursor, len));
        cursor += len + spacing;
    }
    tracks
}

/// The span covering `count` tracks from `first`.
fn span(tracks: &[(i32, i32)], first: u32, count: u32) -> (i32, i32) {
    let first = first as usize;
    let last = (first + count as usize - 1).min(tracks.len() - 1);
    let (start, _) = tracks[first];
    let (end_start, end_len) = tracks[last];
    (start, end_start + end_len - start)
}

/// Places one item inside its cell along `axis`.
fn fit_in_cell(
    item: &LayoutItem,
    axis: Axis,
    align: Alignment,
    cell: (i32, i32),
) -> (f64, f64) {
    let (margin_start, margin_end) = axis.major_insets(item.constraints.margin);
    let start = f64::from(cell.0 + margin_start);
    let available = f64::from((cell.1 - margin_start - margin_end).max(0));
    let len = item.resolve(axis, available, available, align == Alignment::Stretch);
    (align_in(align, start, available, len), len)
}

pub(super) fn compute(
    layout: &ContainerLayout,
    content: Rect<i32>,
    items: &[LayoutItem],
) -> Vec<Option<Rect<i32>>> {
    let (cells, used_rows) = place(layout, items);
    let rows = rows(layout, used_rows);
    if rows == 0 {
        return vec![None; items.len()];
    }
    let column_tracks = split_evenly(content.x, content.width, columns(layout), layout.spacing);
    let row_tracks = split_evenly(content.y, content.height, rows, layout.spacing);
    let default_align = if layout.center_when_smaller {
        Alignment::Center
    } else {
        Alignment::Start
    };

    cells
        .iter()
        .zip(items)
        .map(|(cell, item)| {
            let cell = (*cell)?;
            let align = item.constraints.align_self.unwrap_or(default_align);
            let columns = span(&column_tracks, cell.column, cell.column_span);
            let rows = span(&row_tracks, cell.row, cell.row_span);
            let (x, width) = fit_in_cell(item, Axis::Horizontal, align, columns);
            let (y, height) = fit_in_cell(item, Axis::Vertical, align, rows);
            Some(Rect::new(x, y, width, height).round_edges())
        })
        .collect()
}

pub(super) fn required(layout: &ContainerLayout, items: &[LayoutItem]) -> Size<i32> {
    let (cells, used_rows) = place(layout, items);
    if cells.iter().all(Option::is_none) {
        return Size::new(0, 0);
    }
    let columns = columns(layout);
    let rows = rows(layout, used_rows);
    let mut cell_width: f64 = 0.;
    let mut cell_height: f64 = 0.;
    for (cell, item) in cells.iter().zip(items) {
        let Some(cell) = cell else { continue };
        cell_width = cell_width.max(
            (item.natural_outer(Axis::Horizontal) - gap_total(layout, cell.column_span))
                / f64::from(cell.column_span),
        );
        cell_height = cell_height.max(
            (item.natural_outer(Axis::Vertical) - gap_total(layout, cell.row_span))
                / f64::from(cell.row_span),
        );
    }
    Size::new(
        ceil_len(cell_width * f64::from(columns) + gap_total(layout, columns)),
        ceil_len(cell_height * f64::from(rows) + gap_total(layout, rows)),
    )
}

fn gap_total(layout: &ContainerLayout, tracks: u32) -> f64 {
    f64::from(layout.spacing) * f64::from(tracks.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use crate::layout::{Constraints, GridPlacement, SizeSpec, compute, required_size};

    use super::*;

    #[test]
    fn remainder_goes_to_first_tracks() {
        assert_eq!(
            split_evenly(0, 400, 3, 10),
            [(0, 127), (137, 127), (274, 126)]
        );
        assert_eq!(split_evenly(5, 10, 1, 10), [(5, 10)]);
    }

    #[test]
    fn zero_columns_is_one_column() {
        let layout = ContainerLayout::grid(0);
        let items = [LayoutItem::new(Constraints::fill(), Size::default()); 2];
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &items);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 100, 50)));
        assert_eq!(rects[1], Some(Rect::new(0, 50, 100, 50)));
    }

    #[test]
    fn spans_cover_spacing_between_cells() {
        let layout = ContainerLayout::grid(3).with_spacing(10);
        let wide = Constraints::fill().with_grid(GridPlacement::default().with_span(1, 2));
        let items = [
            LayoutItem::new(wide, Size::default()),
            LayoutItem::new(Constraints::fill(), Size::default()),
            LayoutItem::new(Constraints::fill(), Size::default()),
        ];
        let rects = compute(&layout, Rect::new(0, 0, 320, 210), &items);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 210, 100)));
        assert_eq!(rects[1], Some(Rect::new(220, 0, 100, 100)));
        assert_eq!(rects[2], Some(Rect::new(0, 110, 100, 100)));
    }

    #[test]
    fn huge_cells_and_spans_are_clamped() {
        let layout = ContainerLayout::grid(2);
        let far = LayoutItem::new(
            Constraints::fill().with_grid(GridPlacement::at(u32::MAX, 0)),
            Size::default(),
        );
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &[far]);
        let rect = rects[0].expect("a far row is clamped, not dropped");
        assert_eq!((rect.x, rect.width), (0, 50));
        assert!(rect.y <= 100, "the last row is inside the content");

        let tall = LayoutItem::new(
            Constraints::fill().with_grid(GridPlacement::default().with_span(u32::MAX, 1)),
            Size::default(),
        );
        let everything = LayoutItem::new(
            Constraints::fill().with_grid(GridPlacement::at(0, 0).with_span(u32::MAX, u32::MAX)),
            Size::default(),
        );
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &[tall]);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 50, 100)));
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &[everything]);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 100, 100)));

        let huge = ContainerLayout::grid(u32::MAX).with_grid_rows(u32::MAX);
        let item = LayoutItem::new(Constraints::fill(), Size::default());
        let rects = compute(&huge, Rect::new(0, 0, 2048, 2048), &[item]);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 2, 2)));
    }

    #[test]
    fn explicit_cells_are_skipped_by_flowing_items() {
        let layout = ContainerLayout::grid(2);
        let items = [
            LayoutItem::new(
                Constraints::fill().with_grid(GridPlacement::at(0, 0)),
                Size::default(),
            ),
            LayoutItem::new(Constraints::fill(), Size::default()),
            LayoutItem::new(
                Constraints::fill().with_grid(GridPlacement::at(1, 1)),
                Size::default(),
            ),
            LayoutItem::new(Constraints::fill(), Size::default()),
        ];
        let rects = compute(&layout, Rect::new(0, 0, 100, 100), &items);
        assert_eq!(rects[1].map(|r| (r.x, r.y)), Some((50, 0)));
        assert_eq!(rects[3].map(|r| (r.x, r.y)), Some((0, 50)));
    }

    #[test]
    fn small_items_center_when_asked() {
        let layout = ContainerLayout::grid(2).with_center_when_smaller(true);
        let item = LayoutItem::new(Constraints::default(), Size::new(20, 10));
        let rects = compute(&layout, Rect::new(0, 0, 100, 50), &[item]);
        assert_eq!(rects[0], Some(Rect::new(15, 20, 20, 10)));

        let fixed = LayoutItem::new(
            Constraints::sized(SizeSpec::fixed(10.), SizeSpec::fixed(10.)),
            Size::default(),
        );
        let layout = ContainerLayout::grid(2);
        let rects = compute(&layout, Rect::new(0, 0, 100, 50), &[fixed]);
        assert_eq!(rects[0], Some(Rect::new(0, 0, 10, 10)));
    }

    #[test]
    fn required_size_uses_largest_cell() {
        let layout = ContainerLayout::grid(2).with_spacing(4);
        let items = [
            LayoutItem::new(Constraints::default(), Size::new(30, 10)),
            LayoutItem::new(Constraints::default(), Size::new(10, 20)),
            LayoutItem::new(Constraints::default(), Size::new(10, 10)),
        ];
        assert_eq!(required_size(&layout, &items), Size::new(64, 44));
    }
}
