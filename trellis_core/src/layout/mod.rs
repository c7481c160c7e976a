// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The layout engine.
//!
//! A container describes how it places its children with a [`ContainerLayout`];
//! each child describes how it wants to be sized with its [`Constraints`].
//! [`compute`] turns both into child rectangles, and [`required_size`] reports how
//! much space a container needs when its parent sizes it automatically.
//!
//! Both functions are pure: the layout pass feeds them from the element tree and
//! writes the results back.

mod dock;
mod grid;
mod linear;
mod stack;

use crate::axis::Axis;
use crate::geometry::{Insets, Rect, Size};

/// How a container arranges its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// A single row, left to right.
    Horizontal,
    /// A single column, top to bottom.
    #[default]
    Vertical,
    /// Cells of a grid, filled row by row.
    Grid,
    /// Every child shares the whole content rectangle.
    Stack,
    /// Children take strips from the sides of the remaining space.
    Dock,
    /// Rows which wrap when they run out of width.
    Flow,
    /// Children keep their own positions.
    Absolute,
}

/// Placement along an axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// At the start of the axis.
    #[default]
    Start,
    /// Centered.
    Center,
    /// At the end of the axis.
    End,
    /// Filling the axis.
    Stretch,
    /// Free space only between items.
    SpaceBetween,
    /// Equal free space around each item, halved at the edges.
    SpaceAround,
    /// Equal free space between items and at the edges.
    SpaceEvenly,
}

/// Line breaking for box and flow layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Wrap {
    /// A single line.
    #[default]
    NoWrap,
    /// New lines go after the previous one.
    Wrap,
    /// New lines go before the previous one.
    WrapReverse,
}

/// How the size along one axis is decided.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SizeMode {
    /// Exactly `value` pixels.
    Fixed,
    /// The element's preferred size.
    #[default]
    Auto,
    /// As much space as the container gives.
    Fill,
    /// `value` percent of the container's content size.
    Percent,
}

/// A size mode with its value.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SizeSpec {
    /// How to size.
    pub mode: SizeMode,
    /// Pixels for [`SizeMode::Fixed`], percent for [`SizeMode::Percent`], otherwise unused.
    pub value: f64,
}

impl SizeSpec {
    /// The preferred size.
    pub const AUTO: Self = Self {
        mode: SizeMode::Auto,
        value: 0.,
    };

    /// All available space.
    pub const FILL: Self = Self {
        mode: SizeMode::Fill,
        value: 0.,
    };

    /// A fixed number of pixels.
    pub const fn fixed(value: f64) -> Self {
        Self {
            mode: SizeMode::Fixed,
            value,
        }
    }

    /// A percentage of the content size.
    pub const fn percent(value: f64) -> Self {
        Self {
            mode: SizeMode::Percent,
            value,
        }
    }
}

/// The side of the remaining space a docked child takes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DockSide {
    /// A strip on the left.
    #[default]
    Left,
    /// A strip at the top.
    Top,
    /// A strip on the right.
    Right,
    /// A strip at the bottom.
    Bottom,
    /// Whatever is left once every side is placed.
    Fill,
}

/// Where a child goes in a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GridPlacement {
    /// Explicit row, or `None` to flow.
    pub row: Option<u32>,
    /// Explicit column, or `None` to flow.
    pub column: Option<u32>,
    /// Number of rows covered.
    pub row_span: u32,
    /// Number of columns covered.
    pub column_span: u32,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            row: None,
            column: None,
            row_span: 1,
            column_span: 1,
        }
    }
}

impl GridPlacement {
    /// A placement at an explicit cell.
    pub fn at(row: u32, column: u32) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
            ..Default::default()
        }
    }

    /// Builder-style method for setting the spans.
    pub fn with_span(mut self, rows: u32, columns: u32) -> Self {
        self.row_span = rows.max(1);
        self.column_span = columns.max(1);
        self
    }
}

/// How a child wants to be sized and placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    /// Width rule.
    pub width: SizeSpec,
    /// Height rule.
    pub height: SizeSpec,
    /// Smallest width.
    pub min_width: i32,
    /// Largest width.
    pub max_width: i32,
    /// Smallest height.
    pub min_height: i32,
    /// Largest height.
    pub max_height: i32,
    /// Share of free main-axis space given to this child.
    pub flex_grow: f64,
    /// Share of missing main-axis space taken from this child.
    pub flex_shrink: f64,
    /// Main-axis size before growing or shrinking, overriding the size rule.
    pub flex_basis: Option<i32>,
    /// Space kept around the child.
    pub margin: Insets,
    /// Side used by dock layouts.
    pub dock: DockSide,
    /// Cell used by grid layouts.
    pub grid: GridPlacement,
    /// Cross-axis alignment overriding the container's.
    pub align_self: Option<Alignment>,
}

impl Default for Constraints {
    fn default() -> Self {
        Self {
            width: SizeSpec::AUTO,
            height: SizeSpec::AUTO,
            min_width: 0,
            max_width: i32::MAX,
            min_height: 0,
            max_height: i32::MAX,
            flex_grow: 0.,
            flex_shrink: 0.,
            flex_basis: None,
            margin: Insets::ZERO,
            dock: DockSide::Left,
            grid: GridPlacement::default(),
            align_self: None,
        }
    }
}

impl Constraints {
    /// Constraints with both size rules given.
    pub fn sized(width: SizeSpec, height: SizeSpec) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Constraints filling the container on both axes.
    pub fn fill() -> Self {
        Self::sized(SizeSpec::FILL, SizeSpec::FILL)
    }

    /// Builder-style method for setting the margin.
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    /// Builder-style method for setting the dock side.
    pub fn with_dock(mut self, side: DockSide) -> Self {
        self.dock = side;
        self
    }

    /// Builder-style method for setting the grid placement.
    pub fn with_grid(mut self, placement: GridPlacement) -> Self {
        self.grid = placement;
        self
    }

    /// Builder-style method for setting the grow and shrink factors.
    pub fn with_flex(mut self, grow: f64, shrink: f64) -> Self {
        self.flex_grow = grow;
        self.flex_shrink = shrink;
        self
    }

    /// Builder-style method for setting the width limits.
    pub fn with_width_range(mut self, min: i32, max: i32) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    /// Builder-style method for setting the height limits.
    pub fn with_height_range(mut self, min: i32, max: i32) -> Self {
        self.min_height = min;
        self.max_height = max;
        self
    }

    /// The size rule along `axis`.
    pub fn spec(&self, axis: Axis) -> SizeSpec {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// The `(min, max)` limits along `axis`. A minimum above the maximum wins.
    pub fn limits(&self, axis: Axis) -> (i32, i32) {
        let (min, max) = match axis {
            Axis::Horizontal => (self.min_width, self.max_width),
            Axis::Vertical => (self.min_height, self.max_height),
        };
        let min = min.max(0);
        (min, max.max(min))
    }

    /// Clamps a length along `axis` into the limits.
    pub fn clamp(&self, axis: Axis, value: f64) -> f64 {
        let (min, max) = self.limits(axis);
        value.clamp(f64::from(min), f64::from(max))
    }
}

/// How a container arranges its children.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerLayout {
    /// The arrangement.
    pub direction: Direction,
    /// Placement along the main axis.
    pub main_align: Alignment,
    /// Placement along the cross axis.
    pub cross_align: Alignment,
    /// Line breaking for box and flow layouts.
    pub wrap: Wrap,
    /// Gap between neighbouring children.
    pub spacing: i32,
    /// Gap between wrapped lines.
    pub line_spacing: i32,
    /// Space between the container's bounds and its content rectangle.
    pub padding: Insets,
    /// Column count for grids. Zero is treated as one.
    pub grid_columns: u32,
    /// Minimum row count for grids.
    pub grid_rows: u32,
    /// Center grid children which are smaller than their cell.
    pub center_when_smaller: bool,
    /// In dock layouts, the last child takes the remaining space.
    pub last_child_fill: bool,
}

impl Default for ContainerLayout {
    fn default() -> Self {
        Self {
            direction: Direction::Vertical,
            main_align: Alignment::Start,
            cross_align: Alignment::Stretch,
            wrap: Wrap::NoWrap,
            spacing: 0,
            line_spacing: 0,
            padding: Insets::ZERO,
            grid_columns: 1,
            grid_rows: 0,
            center_when_smaller: false,
            last_child_fill: true,
        }
    }
}

impl ContainerLayout {
    /// A layout with the given direction and default settings.
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// A single row.
    pub fn horizontal() -> Self {
        Self::new(Direction::Horizontal)
    }

    /// A single column.
    pub fn vertical() -> Self {
        Self::new(Direction::Vertical)
    }

    /// A grid with `columns` columns.
    pub fn grid(columns: u32) -> Self {
        Self {
            grid_columns: columns,
            ..Self::new(Direction::Grid)
        }
    }

    /// Children overlaid on the whole content rectangle.
    pub fn stack() -> Self {
        Self {
            main_align: Alignment::Stretch,
            cross_align: Alignment::Stretch,
            ..Self::new(Direction::Stack)
        }
    }

    /// Builder-style method for setting the spacing.
    pub fn with_spacing(mut self, spacing: i32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Builder-style method for setting the line spacing.
    pub fn with_line_spacing(mut self, spacing: i32) -> Self {
        self.line_spacing = spacing;
        self
    }

    /// Builder-style method for setting the padding.
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Builder-style method for setting main-axis alignment.
    pub fn with_main_align(mut self, align: Alignment) -> Self {
        self.main_align = align;
        self
    }

    /// Builder-style method for setting cross-axis alignment.
    pub fn with_cross_align(mut self, align: Alignment) -> Self {
        self.cross_align = align;
        self
    }

    /// Builder-style method for setting wrapping.
    pub fn with_wrap(mut self, wrap: Wrap) -> Self {
        self.wrap = wrap;
        self
    }

    /// Builder-style method for setting the grid row count.
    pub fn with_grid_rows(mut self, rows: u32) -> Self {
        self.grid_rows = rows;
        self
    }

    /// Builder-style method for centering small grid children.
    pub fn with_center_when_smaller(mut self, center: bool) -> Self {
        self.center_when_smaller = center;
        self
    }

    /// Builder-style method for the dock fill behaviour.
    pub fn with_last_child_fill(mut self, fill: bool) -> Self {
        self.last_child_fill = fill;
        self
    }

    /// The content rectangle for a container of `size`.
    pub fn content_rect(&self, size: Size<i32>) -> Rect<i32> {
        Rect::new(0, 0, size.width, size.height).inset(self.padding)
    }
}

/// One child as seen by the layout engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutItem {
    /// The child's constraints.
    pub constraints: Constraints,
    /// Invisible children are skipped and take no space.
    pub visible: bool,
    /// The child's own measurement, used by [`SizeMode::Auto`].
    pub preferred: Size<i32>,
    /// The child's bounds before this layout run.
    pub current: Rect<i32>,
}

impl LayoutItem {
    /// A visible item.
    pub fn new(constraints: Constraints, preferred: Size<i32>) -> Self {
        Self {
            constraints,
            visible: true,
            preferred,
            current: Rect::default(),
        }
    }

    /// The size this item asks for along `axis` when nothing constrains it.
    ///
    /// Percent sizes cannot be resolved without a container and count as zero.
    fn natural(&self, axis: Axis) -> f64 {
        let spec = self.constraints.spec(axis);
        let value = match spec.mode {
            SizeMode::Fixed => spec.value,
            SizeMode::Auto | SizeMode::Fill => f64::from(axis.major(self.preferred)),
            SizeMode::Percent => 0.,
        };
        self.constraints.clamp(axis, value)
    }

    /// The natural size plus margins along `axis`.
    fn natural_outer(&self, axis: Axis) -> f64 {
        let (start, end) = axis.major_insets(self.constraints.margin);
        self.natural(axis) + f64::from(start + end)
    }

    /// Resolves the size along `axis` inside `available` space, which excludes margins.
    ///
    /// `stretch` makes automatic sizes take the available space.
    fn resolve(&self, axis: Axis, available: f64, percent_base: f64, stretch: bool) -> f64 {
        let spec = self.constraints.spec(axis);
        let value = match spec.mode {
            SizeMode::Fixed => spec.value,
            SizeMode::Fill => available,
            SizeMode::Percent => spec.value / 100. * percent_base,
            SizeMode::Auto if stretch => available,
            SizeMode::Auto => f64::from(axis.major(self.preferred)),
        };
        self.constraints.clamp(axis, value.max(0.))
    }
}

/// Rounds a `[start, start + len)` span so that shared edges stay shared.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Layout coordinates are well within i32 range"
)]
fn snap(start: f64, len: f64) -> (i32, i32) {
    let a = start.round() as i32;
    let b = (start + len).round() as i32;
    (a, b - a)
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "Layout sizes are well within i32 range"
)]
fn ceil_len(value: f64) -> i32 {
    value.ceil() as i32
}

/// Places `len` inside `[start, start + available)` according to `align`.
fn align_in(align: Alignment, start: f64, available: f64, len: f64) -> f64 {
    match align {
        Alignment::Center => start + (available - len) / 2.,
        Alignment::End => start + available - len,
        _ => start,
    }
}

/// Computes the bounds of every item inside `content`.
///
/// The result has one entry per item; invisible items get `None`.
/// Rectangles are in the same coordinate space as `content`.
pub fn compute(
    layout: &ContainerLayout,
    content: Rect<i32>,
    items: &[LayoutItem],
) -> Vec<Option<Rect<i32>>> {
    match layout.direction {
        Direction::Horizontal => linear::compute(Axis::Horizontal, layout, layout.wrap, content, items),
        Direction::Vertical => linear::compute(Axis::Vertical, layout, layout.wrap, content, items),
        Direction::Flow => {
            let wrap = match layout.wrap {
                Wrap::WrapReverse => Wrap::WrapReverse,
                _ => Wrap::Wrap,
            };
            linear::compute(Axis::Horizontal, layout, wrap, content, items)
        }
        Direction::Grid => grid::compute(layout, content, items),
        Direction::Dock => dock::compute(layout, content, items),
        Direction::Stack => stack::compute_stack(layout, content, items),
        Direction::Absolute => stack::compute_absolute(items),
    }
}

/// The size a container with `layout` needs to show `items` at their natural sizes,
/// padding included.
pub fn required_size(layout: &ContainerLayout, items: &[LayoutItem]) -> Size<i32> {
    let content = match layout.direction {
        Direction::Horizontal | Direction::Flow => linear::required(Axis::Horizontal, layout, items),
        Direction::Vertical => linear::required(Axis::Vertical, layout, items),
        Direction::Grid => grid::required(layout, items),
        Direction::Dock => dock::required(layout, items),
        Direction::Stack => stack::required_stack(items),
        Direction::Absolute => stack::required_absolute(items),
    };
    Size::new(
        content.width + layout.padding.horizontal(),
        content.height + layout.padding.vertical(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_items(count: usize) -> Vec<LayoutItem> {
        vec![LayoutItem::new(Constraints::fill(), Size::default()); count]
    }

    #[test]
    fn vertical_box_with_padding_and_spacing() {
        let layout = ContainerLayout::vertical()
            .with_padding(Insets::uniform(10))
            .with_spacing(4);
        let item = LayoutItem::new(
            Constraints::sized(SizeSpec::FILL, SizeSpec::fixed(40.)),
            Size::new(10, 10),
        );
        let content = layout.content_rect(Size::new(800, 600));
        let rects = compute(&layout, content, &[item; 3]);
        assert_eq!(
            rects,
            [
                Some(Rect::new(10, 10, 780, 40)),
                Some(Rect::new(10, 54, 780, 40)),
                Some(Rect::new(10, 98, 780, 40)),
            ]
        );
    }

    #[test]
    fn grid_distributes_remainder_left_to_right() {
        let layout = ContainerLayout::grid(3).with_spacing(10);
        let rects = compute(&layout, Rect::new(0, 0, 600, 400), &fill_items(7));
        let widths: Vec<i32> = rects[..3].iter().map(|r| r.unwrap().width).collect();
        assert_eq!(widths, [194, 193, 193]);
        let xs: Vec<i32> = rects[..3].iter().map(|r| r.unwrap().x).collect();
        assert_eq!(xs, [0, 204, 407]);
        assert_eq!(rects[6], Some(Rect::new(0, 274, 194, 126)));
    }

    #[test]
    fn empty_container_requires_only_padding() {
        let padding = Insets::new(1, 2, 3, 4);
        for direction in [
            Direction::Horizontal,
            Direction::Vertical,
            Direction::Grid,
            Direction::Stack,
            Direction::Dock,
            Direction::Flow,
            Direction::Absolute,
        ] {
            let layout = ContainerLayout::new(direction)
                .with_padding(padding)
                .with_spacing(8);
            assert_eq!(required_size(&layout, &[]), Size::new(4, 6), "{direction:?}");
        }
    }

    #[test]
    fn invisible_items_take_no_space() {
        let layout = ContainerLayout::horizontal().with_spacing(5);
        let mut items = vec![
            LayoutItem::new(Constraints::default(), Size::new(20, 10));
            3
        ];
        items[1].visible = false;
        let rects = compute(&layout, Rect::new(0, 0, 100, 10), &items);
        assert_eq!(rects[1], None);
        assert_eq!(rects[2].map(|r| r.x), Some(25));
        assert_eq!(required_size(&layout, &items), Size::new(45, 10));
    }

    #[test]
    fn min_above_max_collapses_to_min() {
        let constraints = Constraints::default().with_width_range(50, 10);
        assert_eq!(constraints.limits(Axis::Horizontal), (50, 50));
        assert_eq!(constraints.clamp(Axis::Horizontal, 200.), 50.);
    }
}
