// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use crate::core::{Element, Event, EventCtx, Handled, PaintCtx};
use crate::geometry::{Point, Size};
use crate::render::RenderContext;

pub(crate) type EventFn<S> =
    dyn FnMut(&mut S, &mut EventCtx<'_>, &Event) -> anyhow::Result<Handled>;
pub(crate) type PaintFn<S> = dyn FnMut(&mut S, &mut PaintCtx<'_>, &mut RenderContext);
pub(crate) type HitTestFn<S> = dyn Fn(&S, Point<f64>, Size<i32>) -> bool;

/// An element that can be constructed from individual functions, builder-style.
///
/// This element is generic over its state, which is passed in at construction time.
pub struct ModularElement<S> {
    /// The state passed to all the callbacks of this element.
    pub state: S,
    accepts_focus: bool,
    preferred_size: Size<i32>,
    on_event: Option<Box<EventFn<S>>>,
    on_capture_event: Option<Box<EventFn<S>>>,
    paint: Option<Box<PaintFn<S>>>,
    post_paint: Option<Box<PaintFn<S>>>,
    hit_test: Option<Box<HitTestFn<S>>>,
}

impl<S> ModularElement<S> {
    /// Creates a new `ModularElement`.
    ///
    /// By default none of its methods do anything, it does not accept focus, and it
    /// prefers a zero size.
    pub fn new(state: S) -> Self {
        Self {
            state,
            accepts_focus: false,
            preferred_size: Size::default(),
            on_event: None,
            on_capture_event: None,
            paint: None,
            post_paint: None,
            hit_test: None,
        }
    }

    /// See [`Element::accepts_focus`].
    pub fn accepts_focus(mut self, accepts_focus: bool) -> Self {
        self.accepts_focus = accepts_focus;
        self
    }

    /// See [`Element::preferred_size`].
    pub fn preferred_size(mut self, size: Size<i32>) -> Self {
        self.preferred_size = size;
        self
    }

    /// See [`Element::on_event`].
    pub fn event_fn(
        mut self,
        f: impl FnMut(&mut S, &mut EventCtx<'_>, &Event) -> anyhow::Result<Handled> + 'static,
    ) -> Self {
        self.on_event = Some(Box::new(f));
        self
    }

    /// See [`Element::on_capture_event`].
    pub fn capture_event_fn(
        mut self,
        f: impl FnMut(&mut S, &mut EventCtx<'_>, &Event) -> anyhow::Result<Handled> + 'static,
    ) -> Self {
        self.on_capture_event = Some(Box::new(f));
        self
    }

    /// See [`Element::paint`].
    pub fn paint_fn(
        mut self,
        f: impl FnMut(&mut S, &mut PaintCtx<'_>, &mut RenderContext) + 'static,
    ) -> Self {
        self.paint = Some(Box::new(f));
        self
    }

    /// See [`Element::post_paint`].
    pub fn post_paint_fn(
        mut self,
        f: impl FnMut(&mut S, &mut PaintCtx<'_>, &mut RenderContext) + 'static,
    ) -> Self {
        self.post_paint = Some(Box::new(f));
        self
    }

    /// See [`Element::hit_test`].
    pub fn hit_test_fn(mut self, f: impl Fn(&S, Point<f64>, Size<i32>) -> bool + 'static) -> Self {
        self.hit_test = Some(Box::new(f));
        self
    }
}

impl<S: 'static> Element for ModularElement<S> {
    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> anyhow::Result<Handled> {
        match self.on_event.as_mut() {
            Some(f) => f(&mut self.state, ctx, event),
            None => Ok(Handled::No),
        }
    }

    fn on_capture_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        event: &Event,
    ) -> anyhow::Result<Handled> {
        match self.on_capture_event.as_mut() {
            Some(f) => f(&mut self.state, ctx, event),
            None => Ok(Handled::No),
        }
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        if let Some(f) = self.paint.as_mut() {
            f(&mut self.state, ctx, render);
        }
    }

    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        if let Some(f) = self.post_paint.as_mut() {
            f(&mut self.state, ctx, render);
        }
    }

    fn hit_test(&self, local: Point<f64>, size: Size<i32>) -> bool {
        self.hit_test
            .as_ref()
            .is_none_or(|f| f(&self.state, local, size))
    }

    fn accepts_focus(&self) -> bool {
        self.accepts_focus
    }

    fn preferred_size(&self) -> Size<i32> {
        self.preferred_size
    }
}

impl<S> std::fmt::Debug for ModularElement<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModularElement")
            .field("accepts_focus", &self.accepts_focus)
            .field("preferred_size", &self.preferred_size)
            .finish_non_exhaustive()
    }
}
