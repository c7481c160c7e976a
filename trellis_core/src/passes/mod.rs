// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Internal passes run by the application: event dispatch, focus changes, layout and paint.
//!
//! This file includes utility functions used by multiple passes.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::span::EnteredSpan;

use crate::core::{Element, ElementId};
use crate::error::{ErrorKind, ErrorRecord, ErrorSink};
use crate::util::panic_message;

pub(crate) mod event;
pub(crate) mod focus;
pub(crate) mod layout;
pub(crate) mod paint;

#[must_use = "Span will be immediately closed if dropped"]
pub(crate) fn enter_span_if(
    enabled: bool,
    element: &dyn Element,
    id: ElementId,
) -> Option<EnteredSpan> {
    enabled.then(|| element.make_trace_span(id).entered())
}

/// Runs one element method, turning an error or a panic into a handler fault report.
///
/// Returns `None` if the method failed.
pub(crate) fn run_guarded<R>(
    errors: &ErrorSink,
    type_name: &str,
    id: ElementId,
    what: &str,
    f: impl FnOnce() -> anyhow::Result<R>,
) -> Option<R> {
    let message = match catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => return Some(value),
        Ok(Err(err)) => format!("{type_name} {what} failed: {err:#}"),
        Err(payload) => format!("{type_name} {what} panicked: {}", panic_message(&*payload)),
    };
    errors.report(ErrorRecord::new(ErrorKind::HandlerFault, message).with_element(id));
    None
}

/// The application runs a handful of passes which may visit every element of a window.
///
/// Including every element in traces adds noise and makes operations extremely slow,
/// so per-element spans default to off. They can be enabled using the
/// `TRELLIS_TRACE_PASSES` environment variable, a comma-separated list of pass names,
/// or `all`.
///
/// The spans of the passes themselves are always recorded.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PassTracing {
    pub(crate) dispatch: bool,
    pub(crate) layout: bool,
    pub(crate) paint: bool,
}

impl PassTracing {
    pub(crate) fn from_env() -> Self {
        match std::env::var("TRELLIS_TRACE_PASSES") {
            Ok(value) => Self::parse(&value),
            Err(std::env::VarError::NotPresent) => Self::unit(false),
            Err(std::env::VarError::NotUnicode(value)) => {
                tracing::error!(
                    ?value,
                    "Couldn't parse `TRELLIS_TRACE_PASSES` environment variable: Not valid UTF-8",
                );
                Self::unit(false)
            }
        }
    }

    fn parse(value: &str) -> Self {
        let mut result = Self::unit(false);
        let mut show_help = false;
        for input_name in value.split(',').map(str::trim) {
            if input_name.eq_ignore_ascii_case("all") {
                return Self::unit(true);
            }
            let flag = match input_name.to_ascii_lowercase().as_str() {
                "dispatch" => &mut result.dispatch,
                "layout" => &mut result.layout,
                "paint" => &mut result.paint,
                "" => continue,
                _ => {
                    tracing::warn!(pass = input_name, "TRELLIS_TRACE_PASSES: Unknown pass");
                    show_help = true;
                    continue;
                }
            };
            *flag = true;
        }
        if show_help {
            tracing::warn!(
                "Supported passes for the `TRELLIS_TRACE_PASSES` environment variable are dispatch, layout, paint"
            );
        }
        result
    }

    /// A `PassTracing` where all the fields have the same `value`.
    const fn unit(value: bool) -> Self {
        Self {
            dispatch: value,
            layout: value,
            paint: value,
        }
    }
}
