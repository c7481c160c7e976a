// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The portable event vocabulary.

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use bitflags::bitflags;

use crate::core::{Key, WindowId};
use crate::geometry::{Point, Size};

/// The numeric type of an event.
///
/// This is part of the API: values never change, and new types are only appended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
#[expect(missing_docs, reason = "Each variant names the EventKind it tags")]
pub enum EventType {
    MouseDown = 1,
    MouseUp = 2,
    MouseMove = 3,
    MouseWheel = 4,
    MouseEnter = 5,
    MouseLeave = 6,
    MouseDoubleClick = 7,
    KeyDown = 8,
    KeyUp = 9,
    TextInput = 10,
    WindowClose = 11,
    WindowResize = 12,
    FocusIn = 13,
    FocusOut = 14,
    Custom = 15,
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseButton {
    /// Usually the primary button.
    Left = 1,
    /// Usually the wheel button.
    Middle = 2,
    /// Usually the secondary button.
    Right = 3,
    /// The first extra button, often "back".
    X1 = 4,
    /// The second extra button, often "forward".
    X2 = 5,
}

bitflags! {
    /// The modifier keys held when an event happened.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1;
        /// Control.
        const CTRL = 2;
        /// Alt, or Option on macOS.
        const ALT = 4;
        /// The "Windows" or Command key.
        const META = 8;
    }
}

impl Modifiers {
    /// The modifier corresponding to a modifier key, or empty for other keys.
    pub fn from_key(key: Key) -> Self {
        match key {
            Key::Shift => Self::SHIFT,
            Key::Control => Self::CTRL,
            Key::Alt => Self::ALT,
            Key::Meta => Self::META,
            _ => Self::empty(),
        }
    }
}

/// A payload attached to a [`EventKind::Custom`] event.
pub type CustomPayload = Arc<dyn Any + Send + Sync>;

/// The type-specific part of an [`Event`].
#[derive(Clone, Debug)]
pub enum EventKind {
    /// A button was pressed.
    MouseDown {
        /// The button.
        button: MouseButton,
        /// 1 for a single click, 2 for the second press of a double click, and so on.
        click_count: u32,
    },
    /// A button was released.
    MouseUp {
        /// The button.
        button: MouseButton,
        /// The click count of the matching press.
        click_count: u32,
    },
    /// The cursor moved.
    MouseMove,
    /// The wheel or touchpad scrolled, in pixels.
    MouseWheel {
        /// Horizontal delta; positive scrolls right.
        dx: f64,
        /// Vertical delta; positive scrolls down.
        dy: f64,
    },
    /// The cursor entered the element.
    MouseEnter,
    /// The cursor left the element, or left the window.
    MouseLeave,
    /// A second click close in time and space to the previous one.
    MouseDoubleClick {
        /// The button.
        button: MouseButton,
    },
    /// A key was pressed.
    KeyDown {
        /// The virtual key.
        key: Key,
        /// The platform's raw scan code.
        scan_code: u32,
        /// Whether this is an auto-repeat.
        repeat: bool,
    },
    /// A key was released.
    KeyUp {
        /// The virtual key.
        key: Key,
        /// The platform's raw scan code.
        scan_code: u32,
    },
    /// Text was entered.
    TextInput {
        /// A UTF-8 fragment.
        text: String,
    },
    /// The user asked to close the window.
    WindowClose,
    /// The window's content area changed size.
    WindowResize {
        /// The new size.
        size: Size<i32>,
    },
    /// The window, or the element, gained keyboard focus.
    FocusIn,
    /// The window, or the element, lost keyboard focus.
    FocusOut,
    /// An application-defined event, often posted from another thread.
    Custom {
        /// An application-defined discriminant.
        tag: u32,
        /// Optional data.
        payload: Option<CustomPayload>,
    },
}

impl EventKind {
    /// The numeric type of this kind.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::MouseDown { .. } => EventType::MouseDown,
            Self::MouseUp { .. } => EventType::MouseUp,
            Self::MouseMove => EventType::MouseMove,
            Self::MouseWheel { .. } => EventType::MouseWheel,
            Self::MouseEnter => EventType::MouseEnter,
            Self::MouseLeave => EventType::MouseLeave,
            Self::MouseDoubleClick { .. } => EventType::MouseDoubleClick,
            Self::KeyDown { .. } => EventType::KeyDown,
            Self::KeyUp { .. } => EventType::KeyUp,
            Self::TextInput { .. } => EventType::TextInput,
            Self::WindowClose => EventType::WindowClose,
            Self::WindowResize { .. } => EventType::WindowResize,
            Self::FocusIn => EventType::FocusIn,
            Self::FocusOut => EventType::FocusOut,
            Self::Custom { .. } => EventType::Custom,
        }
    }
}

/// One portable event.
///
/// Positions are local to `window`, in pixels, with y pointing down.
#[derive(Clone, Debug)]
pub struct Event {
    /// The type-specific payload.
    pub kind: EventKind,
    /// When the platform saw the event, on a monotonic clock with an arbitrary origin.
    pub timestamp: Duration,
    /// The cursor position, in window coordinates.
    pub position: Point<f64>,
    /// The modifiers held.
    pub modifiers: Modifiers,
    /// The window the event belongs to. `None` for application-wide events.
    pub window: Option<WindowId>,
}

impl Event {
    /// An event of `kind` with every other field zeroed.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            timestamp: Duration::ZERO,
            position: Point::ZERO,
            modifiers: Modifiers::empty(),
            window: None,
        }
    }

    /// Builder-style method for setting the position.
    pub fn at(mut self, position: impl Into<Point<f64>>) -> Self {
        self.position = position.into();
        self
    }

    /// Builder-style method for setting the window.
    pub fn in_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }

    /// Builder-style method for setting the modifiers.
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Builder-style method for setting the timestamp.
    pub fn with_timestamp(mut self, timestamp: Duration) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// The numeric type of the event.
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Whether the event is routed by cursor position.
    pub fn is_pointer(&self) -> bool {
        matches!(
            self.kind,
            EventKind::MouseDown { .. }
                | EventKind::MouseUp { .. }
                | EventKind::MouseMove
                | EventKind::MouseWheel { .. }
                | EventKind::MouseDoubleClick { .. }
        )
    }

    /// Whether the event is routed to the focused element.
    pub fn is_keyboard(&self) -> bool {
        matches!(
            self.kind,
            EventKind::KeyDown { .. } | EventKind::KeyUp { .. } | EventKind::TextInput { .. }
        )
    }

    /// The button of a press, release or double click.
    pub fn button(&self) -> Option<MouseButton> {
        match self.kind {
            EventKind::MouseDown { button, .. }
            | EventKind::MouseUp { button, .. }
            | EventKind::MouseDoubleClick { button } => Some(button),
            _ => None,
        }
    }

    /// The key of a press or release.
    pub fn key(&self) -> Option<Key> {
        match self.kind {
            EventKind::KeyDown { key, .. } | EventKind::KeyUp { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// The leg of dispatch a handler is called on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Walking from the window root down to the target's parent.
    Capture,
    /// On the target itself.
    Target,
    /// Walking from the target's parent up to the window root.
    Bubble,
    /// An informational delivery to one element, such as enter, leave or focus changes.
    Direct,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_values_are_stable() {
        assert_eq!(EventType::MouseDown as u16, 1);
        assert_eq!(EventType::KeyDown as u16, 8);
        assert_eq!(EventType::Custom as u16, 15);
        assert_eq!(MouseButton::X2 as u8, 5);
        assert_eq!(Modifiers::META.bits(), 8);
        assert_eq!((Modifiers::SHIFT | Modifiers::ALT).bits(), 5);
    }

    #[test]
    fn custom_payload_downcasts() {
        let event = Event::new(EventKind::Custom {
            tag: 7,
            payload: Some(Arc::new(String::from("done"))),
        });
        let EventKind::Custom { tag, payload } = &event.kind else {
            panic!("not a custom event");
        };
        assert_eq!(*tag, 7);
        let text = payload.as_ref().and_then(|p| p.downcast_ref::<String>());
        assert_eq!(text.map(String::as_str), Some("done"));
    }
}
