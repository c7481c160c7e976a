// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types and the application-scoped error sink.
//!
//! Operations which can be refused return one of the error enums below.
//! Problems which are not returned to a caller (handler faults, missing resources,
//! backend rejections) are reported as an [`ErrorRecord`] through the [`ErrorSink`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::{ElementId, WindowId};

/// The semantic category of a reported error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A programming error which was refused, such as an unbalanced state pop or
    /// reparenting a window root.
    InvariantBreach,
    /// A missing font, image or key. The system fell back or skipped the draw.
    ResourceMiss,
    /// A user handler returned an error or panicked.
    HandlerFault,
    /// The drawing backend rejected a call.
    BackendFault,
    /// The application cannot continue.
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InvariantBreach => "invariant breach",
            Self::ResourceMiss => "resource miss",
            Self::HandlerFault => "handler fault",
            Self::BackendFault => "backend fault",
            Self::Fatal => "fatal",
        };
        f.pad(name)
    }
}

/// A structured report delivered to the [`ErrorSink`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorRecord {
    /// What went wrong.
    pub kind: ErrorKind,
    /// The element involved, if any.
    pub element: Option<ElementId>,
    /// The window involved, if any.
    pub window: Option<WindowId>,
    /// A human-readable description.
    pub message: String,
}

impl ErrorRecord {
    /// Creates a record with no element or window attached.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            element: None,
            window: None,
            message: message.into(),
        }
    }

    /// Attaches an element id.
    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    /// Attaches a window id.
    pub fn with_window(mut self, window: WindowId) -> Self {
        self.window = Some(window);
        self
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(window) = self.window {
            write!(f, " {window}")?;
        }
        if let Some(element) = self.element {
            write!(f, " {element}")?;
        }
        write!(f, ": {}", self.message)
    }
}

type SinkFn = Box<dyn FnMut(&ErrorRecord)>;

/// The single callback every part of an application reports errors through.
///
/// Cloning the sink produces a handle to the same callback, so the tree, the
/// application and the render contexts all report to whatever the embedder installs
/// with [`ErrorSink::set`]. Without an installed callback, records are written to stderr.
///
/// Records are also logged with [`tracing`].
#[derive(Clone, Default)]
pub struct ErrorSink {
    callback: Rc<RefCell<Option<SinkFn>>>,
}

impl ErrorSink {
    /// Creates a sink which writes to stderr.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the callback for every handle sharing this sink.
    pub fn set(&self, callback: impl FnMut(&ErrorRecord) + 'static) {
        *self.callback.borrow_mut() = Some(Box::new(callback));
    }

    /// Restores the default stderr behavior.
    pub fn reset(&self) {
        *self.callback.borrow_mut() = None;
    }

    /// Delivers a record.
    ///
    /// A callback which reports from inside itself has the nested record written to stderr.
    pub fn report(&self, record: ErrorRecord) {
        match record.kind {
            ErrorKind::ResourceMiss => tracing::warn!(%record, "Resource miss"),
            _ => tracing::error!(%record, "Error reported"),
        }
        let Ok(mut callback) = self.callback.try_borrow_mut() else {
            write_to_stderr(&record);
            return;
        };
        match callback.as_mut() {
            Some(callback) => callback(&record),
            None => write_to_stderr(&record),
        }
    }

    /// Shorthand for reporting an invariant breach.
    pub fn invariant_breach(&self, message: impl Into<String>) {
        self.report(ErrorRecord::new(ErrorKind::InvariantBreach, message));
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed = self
            .callback
            .try_borrow()
            .map(|callback| callback.is_some())
            .unwrap_or(true);
        f.debug_struct("ErrorSink")
            .field("installed", &installed)
            .finish()
    }
}

#[allow(clippy::print_stderr, reason = "The default sink writes to stderr")]
fn write_to_stderr(record: &ErrorRecord) {
    eprintln!("trellis: {record}");
}

/// Errors returned by element tree mutations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not refer to a live element.
    #[error("{0} does not exist")]
    UnknownElement(ElementId),
    /// The child is an ancestor of (or the same as) the new parent.
    #[error("attaching {child} to {parent} would create a cycle")]
    Cycle {
        /// The would-be parent.
        parent: ElementId,
        /// The element being attached.
        child: ElementId,
    },
    /// Window roots cannot be attached to another element.
    #[error("{0} is a window root and cannot be reparented")]
    ReparentWindowRoot(ElementId),
    /// Window roots are destroyed with their window.
    #[error("{0} is a window root and can only be destroyed by closing its window")]
    DestroyWindowRoot(ElementId),
    /// The element is not a child of the given parent.
    #[error("{child} is not a child of {parent}")]
    NotAChild {
        /// The parent which was named.
        parent: ElementId,
        /// The element which was named.
        child: ElementId,
    },
    /// The element exists, but is not of the requested type.
    #[error("{0} is not of the requested type")]
    WrongType(ElementId),
    /// The operation needs an element attached to a window.
    #[error("{0} is not attached to a window")]
    Detached(ElementId),
}

/// Errors returned when focus cannot move to an element.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FocusError {
    /// The element was destroyed.
    #[error("{0} does not exist")]
    UnknownElement(ElementId),
    /// The element is not attached to a window.
    #[error("{0} is not attached to a window")]
    Detached(ElementId),
    /// The element is hidden, disabled, or does not accept focus.
    #[error("{0} cannot take focus")]
    NotFocusable(ElementId),
}

/// Errors returned by render context operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// `pop_state` was called on the bottom of the stack.
    #[error("cannot pop the bottom render state")]
    StackUnderflow,
    /// A frame ended with a different stack depth than it started with.
    #[error("frame ended at state depth {found}, expected {expected}")]
    UnbalancedFrame {
        /// The depth at `begin_frame`.
        expected: usize,
        /// The depth at `end_frame`.
        found: usize,
    },
    /// The backend does not provide the capability.
    #[error("the backend does not support {0}")]
    Unsupported(&'static str),
    /// The backend rejected the call.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors returned by a drawing backend.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// An image could not be loaded or decoded.
    #[error("cannot load image {path}: {reason}")]
    ImageLoad {
        /// The image path.
        path: String,
        /// Why it failed.
        reason: String,
    },
    /// Geometry which the backend cannot draw, such as a degenerate transform.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),
    /// The target surface could not be allocated.
    #[error("cannot allocate a {width}x{height} surface")]
    Surface {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Any other backend specific failure.
    #[error("{0}")]
    Other(String),
}

/// Errors returned by a platform shim.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// No native display is available.
    #[error("no display available: {0}")]
    NoDisplay(String),
    /// The window does not exist on the platform side.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
    /// A window could not be created.
    #[error("cannot create window: {0}")]
    WindowCreation(String),
    /// Any other platform failure.
    #[error("{0}")]
    Other(String),
}

/// Errors which prevent the application from running.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AppError {
    /// No native display is available at startup.
    #[error("no display available: {0}")]
    NoDisplay(String),
    /// A window could not be created.
    #[error("cannot create window: {0}")]
    WindowCreation(String),
    /// The window does not exist.
    #[error("unknown window {0}")]
    UnknownWindow(WindowId),
    /// A platform failure.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl AppError {
    /// The process exit code an embedder should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoDisplay(_) => 1,
            Self::WindowCreation(_) => 2,
            Self::UnknownWindow(_) | Self::Platform(_) => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_is_shared_between_clones() {
        let sink = ErrorSink::new();
        let other = sink.clone();
        let records = Rc::new(RefCell::new(Vec::new()));
        let records_clone = records.clone();
        sink.set(move |record| records_clone.borrow_mut().push(record.clone()));

        other.invariant_breach("unbalanced");
        other.report(ErrorRecord::new(ErrorKind::ResourceMiss, "font"));

        let records = records.borrow();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ErrorKind::InvariantBreach);
        assert_eq!(records[1].message, "font");
    }

    #[test]
    fn nested_report_does_not_panic() {
        let sink = ErrorSink::new();
        let inner = sink.clone();
        sink.set(move |record| {
            if record.kind == ErrorKind::Fatal {
                inner.invariant_breach("nested");
            }
        });
        sink.report(ErrorRecord::new(ErrorKind::Fatal, "outer"));
    }

    #[test]
    fn record_display() {
        let record = ErrorRecord::new(ErrorKind::HandlerFault, "boom");
        assert_eq!(record.to_string(), "[handler fault]: boom");
        assert_eq!(AppError::NoDisplay("x".into()).exit_code(), 1);
    }
}
