// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

/// Options for creating an [`Application`](crate::app::Application).
#[derive(Clone, Debug)]
pub struct AppOptions {
    /// The longest delay between a press and the next one for them to count as a double click.
    pub double_click_time: Duration,

    /// The furthest the cursor may move between two presses of a double click, in pixels.
    pub double_click_distance: f64,

    /// How long the main loop waits for a native event before running an idle iteration.
    ///
    /// `None` waits until the platform has something to report.
    pub idle_timeout: Option<Duration>,

    /// If true, disabled elements are transparent to hit testing instead of swallowing
    /// the events aimed at them.
    pub enabled_only_hit_test: bool,

    /// If true, [`Application::run`](crate::app::Application::run) returns once no window is left.
    pub exit_on_last_window_closed: bool,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            double_click_time: Duration::from_millis(500),
            double_click_distance: 4.,
            idle_timeout: Some(Duration::from_millis(16)),
            enabled_only_hit_test: false,
            exit_on_last_window_closed: true,
        }
    }
}
