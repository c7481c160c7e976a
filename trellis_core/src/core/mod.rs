// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Basic types and traits Trellis is built on.

mod contexts;
mod element;
mod element_state;
mod events;
mod keyboard;
mod tree;
mod window;

pub use contexts::{EventCtx, PaintCtx};
pub use element::{Container, Element, ElementId, Handled, WindowRoot};
pub use element_state::{ElementFlags, ElementState};
pub use events::{CustomPayload, Event, EventKind, EventType, Modifiers, MouseButton, Phase};
pub use keyboard::Key;
pub use tree::{ChildrenIds, ElementTree};
pub use window::{AcceleratorTable, NativeHandle, Window, WindowAttributes, WindowId};

pub(crate) use contexts::Request;
