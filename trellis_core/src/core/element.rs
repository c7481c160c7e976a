// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;
use std::fmt::Display;
use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::field::DisplayValue;
use tracing::{Span, trace_span};

use crate::color::Color;
use crate::core::{Event, EventCtx, PaintCtx};
use crate::geometry::{Point, Rect, Size};
use crate::render::{RenderContext, shapes};

/// A unique identifier for a single [`Element`].
///
/// Ids are allocated when an element is inserted into an [`ElementTree`](crate::core::ElementTree)
/// and are never reused within a process, so a stale id can always be detected.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElementId(NonZeroU64);

impl ElementId {
    /// Allocates a new, unique `ElementId`.
    pub(crate) fn next() -> Self {
        static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
        let id = ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        match NonZeroU64::new(id) {
            Some(id) => Self(id),
            // panic safety: the counter starts at 1 and would take centuries to wrap
            None => unreachable!(),
        }
    }

    /// A serialized representation of the `ElementId` for debugging purposes.
    pub fn trace(self) -> DisplayValue<Self> {
        tracing::field::display(self)
    }

    /// Returns the integer value of the `ElementId`.
    pub fn to_raw(self) -> u64 {
        self.0.into()
    }
}

impl From<ElementId> for u64 {
    fn from(id: ElementId) -> Self {
        id.0.into()
    }
}

impl Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether an event was consumed by a handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handled {
    /// The event was consumed; the current leg stops.
    Yes,
    /// The event continues to the next handler.
    No,
}

impl Handled {
    /// Has the event been handled yet?
    pub fn is_handled(self) -> bool {
        self == Self::Yes
    }
}

impl From<bool> for Handled {
    /// Returns `Handled::Yes` if `handled` is true, and `Handled::No` otherwise.
    fn from(handled: bool) -> Self {
        if handled { Self::Yes } else { Self::No }
    }
}

/// The behaviour of a node in the element tree.
///
/// Structural state (bounds, flags, parent and children) lives in the tree,
/// not in the element. An element only decides how it reacts to events, how it
/// paints itself, and which parts of its bounds it owns for hit testing.
///
/// Every method has a default, so simple elements only implement what they need.
pub trait Element: Any {
    /// Handles an event on the target and bubble legs, and direct deliveries.
    ///
    /// Returning an error reports a handler fault and counts as [`Handled::No`].
    #[expect(unused_variables, reason = "Default impl doesn't use arguments")]
    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> anyhow::Result<Handled> {
        Ok(Handled::No)
    }

    /// Handles an event on the capture leg, before it reaches its target.
    #[expect(unused_variables, reason = "Default impl doesn't use arguments")]
    fn on_capture_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        event: &Event,
    ) -> anyhow::Result<Handled> {
        Ok(Handled::No)
    }

    /// Paints the element, before its children.
    ///
    /// The render context is translated so that `(0, 0)` is the element's top-left
    /// corner, and clipped to its bounds.
    #[expect(unused_variables, reason = "Default impl doesn't use arguments")]
    fn paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {}

    /// Paints over the element's children.
    #[expect(unused_variables, reason = "Default impl doesn't use arguments")]
    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {}

    /// Whether the element owns the local point `local`.
    ///
    /// Only called for points inside the element's bounds. Elements with
    /// non-rectangular shapes override this to let events fall through.
    #[expect(unused_variables, reason = "Default impl doesn't use arguments")]
    fn hit_test(&self, local: Point<f64>, size: Size<i32>) -> bool {
        true
    }

    /// Whether the element takes part in keyboard focus when it is inserted.
    ///
    /// The tree copies this into the element's focusable flag, which can be changed later.
    fn accepts_focus(&self) -> bool {
        false
    }

    /// The size the element would like when its constraints are automatic.
    fn preferred_size(&self) -> Size<i32> {
        Size::default()
    }

    /// Gets the element's type name, for debugging.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Gets the element's type name without its module path, for debugging.
    fn short_type_name(&self) -> &'static str {
        crate::util::short_type_name(self.type_name())
    }

    /// Returns a span for tracing.
    fn make_trace_span(&self, id: ElementId) -> Span {
        trace_span!("Element", r#type = self.short_type_name(), id = id.trace())
    }
}

// --- MARK: BUILT-IN ELEMENTS

/// A plain element which groups its children, with an optional background.
///
/// Containers are laid out by the [`ContainerLayout`](crate::layout::ContainerLayout)
/// set on them in the tree.
#[derive(Clone, Debug, Default)]
pub struct Container {
    /// Fills the bounds before the children are painted.
    pub background: Option<Color>,
}

impl Container {
    /// A container without background.
    pub fn new() -> Self {
        Self::default()
    }

    /// A container filled with `color`.
    pub fn with_background(color: Color) -> Self {
        Self {
            background: Some(color),
        }
    }
}

fn paint_background(color: Option<Color>, size: Size<i32>, render: &mut RenderContext) {
    let Some(color) = color else { return };
    if color.is_transparent() {
        return;
    }
    render.set_fill(color);
    shapes::fill_rect(render, Rect::from_origin_size(Point::ZERO, size.to_f64()));
}

impl Element for Container {
    fn paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        paint_background(self.background, ctx.size(), render);
    }
}

/// The root element of a window.
///
/// Created by the application together with the window; it cannot be reparented
/// or destroyed on its own.
#[derive(Clone, Debug)]
pub struct WindowRoot {
    /// The window's background colour.
    pub background: Color,
}

impl WindowRoot {
    pub(crate) fn new(background: Color) -> Self {
        Self { background }
    }
}

impl Element for WindowRoot {
    fn paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        paint_background(Some(self.background), ctx.size(), render);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_display_with_hash() {
        let a = ElementId::next();
        let b = ElementId::next();
        assert_ne!(a, b);
        assert!(b.to_raw() > a.to_raw());
        assert_eq!(a.to_string(), format!("#{}", a.to_raw()));
    }

    #[test]
    fn handled_from_bool() {
        assert_eq!(Handled::from(true), Handled::Yes);
        assert!(!Handled::from(false).is_handled());
    }

    #[test]
    fn short_type_name_strips_path() {
        assert_eq!(Container::new().short_type_name(), "Container");
    }
}
