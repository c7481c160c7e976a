// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::mpsc::{Receiver, Sender, channel};

use crate::app::Waker;
use crate::core::{CustomPayload, Event, EventKind, WindowId};

/// The application was dropped; the event was not delivered.
#[derive(Debug, thiserror::Error)]
#[error("the application is gone")]
pub struct ProxyClosed;

/// A handle for sending events to an application from other threads.
///
/// Events are queued and dispatched on the UI thread at the start of the next loop
/// iteration, in the order they were sent.
#[derive(Clone)]
pub struct AppProxy {
    sender: Sender<Event>,
    waker: Option<Waker>,
}

impl AppProxy {
    pub(crate) fn new(waker: Option<Waker>) -> (Self, Receiver<Event>) {
        let (sender, receiver) = channel();
        (Self { sender, waker }, receiver)
    }

    /// Posts a [`Custom`](EventKind::Custom) event, to the root of `window`.
    pub fn post_custom(
        &self,
        window: Option<WindowId>,
        tag: u32,
        payload: Option<CustomPayload>,
    ) -> Result<(), ProxyClosed> {
        let mut event = Event::new(EventKind::Custom { tag, payload });
        event.window = window;
        self.post_event(event)
    }

    /// Posts any event.
    pub fn post_event(&self, event: Event) -> Result<(), ProxyClosed> {
        self.sender.send(event).map_err(|_| ProxyClosed)?;
        if let Some(waker) = &self.waker {
            waker();
        }
        Ok(())
    }
}

impl fmt::Debug for AppProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppProxy")
            .field("has_waker", &self.waker.is_some())
            .finish_non_exhaustive()
    }
}
