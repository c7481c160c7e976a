// Copyright 2025 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::core::{Element, ElementId, Event, EventCtx, EventType, Handled, PaintCtx, Phase};
use crate::geometry::{Point, Size};
use crate::render::RenderContext;

/// A wrapper element that records each time one of its methods is called.
///
/// Its intent is to let you observe the methods called on an element in a test.
/// Several recorders can share one [`Recording`], which then shows the order in
/// which the elements were called.
pub struct Recorder<E> {
    recording: Recording,
    child: E,
}

/// A recording of element method calls.
///
/// Internally stores a queue of [`Records`](Record).
#[derive(Debug, Clone, Default)]
pub struct Recording(Rc<RefCell<VecDeque<Record>>>);

/// A recording of a method call on an element.
#[derive(Debug, Clone)]
pub enum Record {
    /// `on_event` or `on_capture_event` was called.
    Event {
        /// The element called.
        id: ElementId,
        /// The leg of dispatch.
        phase: Phase,
        /// The event.
        event: Event,
    },
    /// `paint` was called.
    Paint(ElementId),
    /// `post_paint` was called.
    PostPaint(ElementId),
}

impl Recording {
    /// True if no calls have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// The number of calls in the recording.
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Clear recorded calls.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Returns the next call in the recording, if one exists.
    ///
    /// This consumes the call.
    pub fn next(&self) -> Option<Record> {
        self.0.borrow_mut().pop_front()
    }

    /// Returns a vec of calls drained from the recording.
    pub fn drain(&self) -> Vec<Record> {
        self.0.borrow_mut().drain(..).collect::<Vec<_>>()
    }

    /// Drains the recording, keeping the event calls as `(element, phase, type)`.
    pub fn drain_events(&self) -> Vec<(ElementId, Phase, EventType)> {
        self.drain()
            .into_iter()
            .filter_map(|record| match record {
                Record::Event { id, phase, event } => Some((id, phase, event.event_type())),
                _ => None,
            })
            .collect()
    }

    /// Drains the recording, keeping the ids of the painted elements in paint order.
    pub fn drain_paints(&self) -> Vec<ElementId> {
        self.drain()
            .into_iter()
            .filter_map(|record| match record {
                Record::Paint(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn push(&self, record: Record) {
        self.0.borrow_mut().push_back(record);
    }
}

impl<E: Element> Recorder<E> {
    /// Wraps `child` in a `Recorder` that records all method calls.
    pub fn new(child: E, recording: &Recording) -> Self {
        Self {
            child,
            recording: recording.clone(),
        }
    }
}

impl<E: Element> Element for Recorder<E> {
    fn on_event(&mut self, ctx: &mut EventCtx<'_>, event: &Event) -> anyhow::Result<Handled> {
        self.recording.push(Record::Event {
            id: ctx.id(),
            phase: ctx.phase(),
            event: event.clone(),
        });
        self.child.on_event(ctx, event)
    }

    fn on_capture_event(
        &mut self,
        ctx: &mut EventCtx<'_>,
        event: &Event,
    ) -> anyhow::Result<Handled> {
        self.recording.push(Record::Event {
            id: ctx.id(),
            phase: ctx.phase(),
            event: event.clone(),
        });
        self.child.on_capture_event(ctx, event)
    }

    fn paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        self.recording.push(Record::Paint(ctx.id()));
        self.child.paint(ctx, render);
    }

    fn post_paint(&mut self, ctx: &mut PaintCtx<'_>, render: &mut RenderContext) {
        self.recording.push(Record::PostPaint(ctx.id()));
        self.child.post_paint(ctx, render);
    }

    fn hit_test(&self, local: Point<f64>, size: Size<i32>) -> bool {
        self.child.hit_test(local, size)
    }

    fn accepts_focus(&self) -> bool {
        self.child.accepts_focus()
    }

    fn preferred_size(&self) -> Size<i32> {
        self.child.preferred_size()
    }
}

impl<E> std::fmt::Debug for Recorder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("recording", &self.recording)
            .finish_non_exhaustive()
    }
}

/// External trait implemented for all elements.
///
/// Implements helper methods useful for writing tests.
pub trait TestElementExt: Element + Sized {
    /// Wraps this element in a [`Recorder`] whose recordings will be stored in the given [`Recording`].
    fn record(self, recording: &Recording) -> Recorder<Self> {
        Recorder::new(self, recording)
    }
}

impl<E: Element> TestElementExt for E {}
