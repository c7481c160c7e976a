// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The dispatch pass: routes one portable event through the element tree.

use std::time::Duration;

use tracing::{debug, info_span, trace};

use crate::app::{AppOptions, AppSignal, Application};
use crate::core::{
    ElementFlags, ElementId, Event, EventCtx, EventKind, Handled, Key, Modifiers, MouseButton,
    Phase, Request, WindowId,
};
use crate::geometry::Point;
use crate::passes::{enter_span_if, focus, run_guarded};

// --- MARK: CLICKS

#[derive(Clone, Copy, Debug)]
struct Press {
    window: WindowId,
    button: MouseButton,
    timestamp: Duration,
    position: Point<f64>,
    count: u32,
}

impl Press {
    fn is_near(&self, timestamp: Duration, position: Point<f64>, options: &AppOptions) -> bool {
        timestamp.saturating_sub(self.timestamp) <= options.double_click_time
            && self.position.distance(position) <= options.double_click_distance
    }
}

/// Counts consecutive presses of the same button, for click counts and double clicks.
#[derive(Clone, Debug, Default)]
pub(crate) struct ClickTracker {
    last: Option<Press>,
}

impl ClickTracker {
    /// Records a press and returns its click count.
    pub(crate) fn press(
        &mut self,
        window: WindowId,
        button: MouseButton,
        timestamp: Duration,
        position: Point<f64>,
        options: &AppOptions,
    ) -> u32 {
        let count = match self.last {
            Some(last)
                if last.window == window
                    && last.button == button
                    && last.is_near(timestamp, position, options) =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.last = Some(Press {
            window,
            button,
            timestamp,
            position,
            count,
        });
        count
    }

    /// Returns the click count of the matching press, and whether the release completes
    /// a double click.
    pub(crate) fn release(
        &self,
        window: WindowId,
        button: MouseButton,
        timestamp: Duration,
        position: Point<f64>,
        options: &AppOptions,
    ) -> (u32, bool) {
        match self.last {
            Some(last) if last.window == window && last.button == button => {
                let double = last.count >= 2 && last.is_near(timestamp, position, options);
                (last.count, double)
            }
            _ => (1, false),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.last = None;
    }

    pub(crate) fn forget_window(&mut self, window: WindowId) {
        if self.last.is_some_and(|last| last.window == window) {
            self.last = None;
        }
    }
}

// --- MARK: DISPATCH

/// Dispatches one event, without draining posted events.
pub(crate) fn run_dispatch(app: &mut Application, mut event: Event) -> Handled {
    let _span = info_span!("dispatch", kind = ?event.event_type()).entered();
    validate_interaction(app);
    track_modifiers(app, &mut event);

    let handled = if event.window.is_none()
        && let EventKind::Custom { tag, payload } = event.kind
    {
        debug!(tag, "Custom event without window, forwarding to the embedder");
        app.signals.push_back(AppSignal::Custom { tag, payload });
        Handled::Yes
    } else {
        match resolve_window(app, &event) {
            Some(window) => {
                event.window = Some(window);
                dispatch_in_window(app, window, event)
            }
            None => {
                debug!("Dropping event for a window which is not open");
                Handled::No
            }
        }
    };

    validate_interaction(app);
    handled
}

/// Keeps the held modifiers in sync with key presses and window focus.
///
/// Modifiers reported by the platform replace the tracked ones.
fn track_modifiers(app: &mut Application, event: &mut Event) {
    if !event.modifiers.is_empty() {
        app.interaction.modifiers = event.modifiers;
    }
    match event.kind {
        EventKind::KeyDown { key, .. } => {
            app.interaction.modifiers |= Modifiers::from_key(key);
        }
        EventKind::KeyUp { key, .. } => {
            app.interaction.modifiers.remove(Modifiers::from_key(key));
        }
        // Releases made in another window are never seen.
        EventKind::FocusOut => {
            app.interaction.modifiers = Modifiers::empty();
        }
        _ => {}
    }
    event.modifiers = app.interaction.modifiers;
}

/// The window named by the event, else the focused window, else the oldest one.
fn resolve_window(app: &Application, event: &Event) -> Option<WindowId> {
    match event.window {
        Some(window) => app.window(window).map(|_| window),
        None => app
            .interaction
            .focused_window
            .or_else(|| app.windows.first().map(|w| w.id)),
    }
}

fn dispatch_in_window(app: &mut Application, window: WindowId, event: Event) -> Handled {
    match event.kind {
        EventKind::MouseDown { .. }
        | EventKind::MouseUp { .. }
        | EventKind::MouseMove
        | EventKind::MouseWheel { .. }
        | EventKind::MouseDoubleClick { .. } => dispatch_pointer(app, window, event),
        EventKind::MouseEnter => {
            let hit = hit_test(app, window, event.position);
            let captured = live_capture(app, window);
            update_hover(app, window, hit, captured, &event);
            Handled::No
        }
        EventKind::MouseLeave => {
            clear_hover(app, &event);
            Handled::No
        }
        EventKind::KeyDown { .. } | EventKind::KeyUp { .. } | EventKind::TextInput { .. } => {
            dispatch_keyboard(app, window, &event)
        }
        EventKind::WindowClose => {
            let handled = deliver_to_root(app, window, &event);
            if !handled.is_handled() && app.window(window).is_some() {
                debug!("WindowClose not consumed, closing {window}");
                if app.close_window(window).is_err() {
                    trace!("{window} was already closed");
                }
            }
            handled
        }
        EventKind::WindowResize { size } => {
            app.resize_window(window, size);
            deliver_to_root(app, window, &event)
        }
        EventKind::FocusIn | EventKind::FocusOut => {
            let focused = matches!(event.kind, EventKind::FocusIn);
            if let Some(win) = app.window_mut(window) {
                win.has_native_focus = focused;
            }
            if focused {
                app.interaction.focused_window = Some(window);
            }
            deliver_to_root(app, window, &event)
        }
        EventKind::Custom { .. } => deliver_to_root(app, window, &event),
    }
}

// --- MARK: POINTER

fn hit_test(app: &Application, window: WindowId, position: Point<f64>) -> Option<ElementId> {
    let root = app.root(window)?;
    app.tree
        .hit_test(root, position, app.options.enabled_only_hit_test)
}

/// The capture holder, if it is alive and attached to `window`.
fn live_capture(app: &Application, window: WindowId) -> Option<ElementId> {
    app.interaction
        .captured
        .filter(|captured| app.tree.window_of(*captured) == Some(window))
}

fn dispatch_pointer(app: &mut Application, window: WindowId, mut event: Event) -> Handled {
    let position = event.position;
    let mut double_click = None;
    match &mut event.kind {
        EventKind::MouseDown {
            button,
            click_count,
        } => {
            *click_count = app.interaction.clicks.press(
                window,
                *button,
                event.timestamp,
                position,
                &app.options,
            );
        }
        EventKind::MouseUp {
            button,
            click_count,
        } => {
            let (count, double) = app.interaction.clicks.release(
                window,
                *button,
                event.timestamp,
                position,
                &app.options,
            );
            *click_count = count;
            if double {
                double_click = Some(*button);
            }
        }
        EventKind::MouseMove => trace!("MouseMove at {position:?}"),
        _ => {}
    }

    let hit = hit_test(app, window, position);
    let captured = live_capture(app, window);
    update_hover(app, window, hit, captured, &event);

    let handled = match captured.or(hit) {
        Some(target) => route(app, window, target, &event, captured.is_none()),
        None => Handled::No,
    };

    if let Some(button) = double_click
        && app.window(window).is_some()
    {
        let double_click = Event::new(EventKind::MouseDoubleClick { button })
            .at(position)
            .in_window(window)
            .with_modifiers(event.modifiers)
            .with_timestamp(event.timestamp);
        debug!("Synthesizing double click of {button:?}");
        dispatch_pointer(app, window, double_click);
        app.interaction.clicks.reset();
    }
    handled
}

/// Updates the hovered path, sending leave events deepest first, then enter events
/// from the root down.
///
/// While the mouse is captured, only the capture holder can be hovered.
fn update_hover(
    app: &mut Application,
    window: WindowId,
    hit: Option<ElementId>,
    captured: Option<ElementId>,
    event: &Event,
) {
    let hovered = match captured {
        Some(captured) => hit
            .filter(|hit| *hit == captured || app.tree.ancestors(*hit).contains(&captured))
            .map(|_| captured),
        None => hit,
    };
    let mut new_path = Vec::new();
    if let Some(hovered) = hovered {
        new_path.push(hovered);
        new_path.extend(app.tree.ancestors(hovered));
    }

    let old_window = app.interaction.hover_window;
    let old_path = std::mem::take(&mut app.interaction.hovered_path);
    if old_window == Some(window) && old_path == new_path {
        app.interaction.hovered_path = old_path;
        return;
    }
    app.interaction.hovered_path.clone_from(&new_path);
    app.interaction.hover_window = (!new_path.is_empty()).then_some(window);

    if let Some(old_window) = old_window {
        let leave = Event::new(EventKind::MouseLeave)
            .at(event.position)
            .in_window(old_window)
            .with_modifiers(event.modifiers);
        for id in old_path.iter().copied() {
            if old_window == window && new_path.contains(&id) {
                continue;
            }
            app.tree
                .set_interaction_flag(id, ElementFlags::HOVERED, false);
            deliver_direct(app, old_window, id, &leave);
        }
    }

    let enter = Event::new(EventKind::MouseEnter)
        .at(event.position)
        .in_window(window)
        .with_modifiers(event.modifiers);
    for id in new_path.iter().rev().copied() {
        if old_window == Some(window) && old_path.contains(&id) {
            continue;
        }
        app.tree
            .set_interaction_flag(id, ElementFlags::HOVERED, true);
        deliver_direct(app, window, id, &enter);
    }
}

fn clear_hover(app: &mut Application, event: &Event) {
    let Some(window) = app.interaction.hover_window.take() else {
        return;
    };
    let old_path = std::mem::take(&mut app.interaction.hovered_path);
    let leave = Event::new(EventKind::MouseLeave)
        .at(event.position)
        .in_window(window)
        .with_modifiers(event.modifiers);
    for id in old_path {
        app.tree
            .set_interaction_flag(id, ElementFlags::HOVERED, false);
        deliver_direct(app, window, id, &leave);
    }
}

// --- MARK: KEYBOARD

fn dispatch_keyboard(app: &mut Application, window: WindowId, event: &Event) -> Handled {
    let Some(root) = app.root(window) else {
        return Handled::No;
    };
    let target = app
        .focused(window)
        .filter(|focused| app.tree.window_of(*focused) == Some(window))
        .unwrap_or(root);
    let handled = route(app, window, target, event, false);
    if handled.is_handled() || app.window(window).is_none() {
        return handled;
    }

    let EventKind::KeyDown { key, .. } = event.kind else {
        return Handled::No;
    };
    let modifiers = event.modifiers;
    if key == Key::Tab && (modifiers - Modifiers::SHIFT).is_empty() {
        let forward = !modifiers.contains(Modifiers::SHIFT);
        return focus::focus_next(app, window, forward).is_some().into();
    }
    let command = app
        .window(window)
        .and_then(|w| w.accelerators.get(key, modifiers));
    if let Some(command) = command {
        debug!("Accelerator {command} in {window}");
        app.signals
            .push_back(AppSignal::Accelerator { window, command });
        return Handled::Yes;
    }
    Handled::No
}

// --- MARK: ROUTING

enum Flow {
    Continue,
    Stop(Handled),
}

/// Walks the capture leg (optionally), the target, then the bubble leg.
///
/// The path is computed once, before the first handler runs. Elements which were
/// destroyed or moved out of the window since are skipped.
fn route(
    app: &mut Application,
    window: WindowId,
    target: ElementId,
    event: &Event,
    capture_leg: bool,
) -> Handled {
    if !app.tree.effective_enabled(target) {
        trace!("{target} is disabled, swallowing event");
        return Handled::Yes;
    }
    let ancestors = app.tree.ancestors(target);

    if capture_leg {
        for id in ancestors.iter().rev().copied() {
            if let Flow::Stop(handled) = step(app, window, id, target, Phase::Capture, event) {
                return handled;
            }
        }
    }
    if let Flow::Stop(handled) = step(app, window, target, target, Phase::Target, event) {
        return handled;
    }
    for id in ancestors {
        if let Flow::Stop(handled) = step(app, window, id, target, Phase::Bubble, event) {
            return handled;
        }
    }
    Handled::No
}

fn step(
    app: &mut Application,
    window: WindowId,
    id: ElementId,
    target: ElementId,
    phase: Phase,
    event: &Event,
) -> Flow {
    if app.tree.window_of(id) != Some(window) {
        trace!("Skipping {id}, no longer in {window}");
        return Flow::Continue;
    }
    let handled = call_handler(app, window, id, Some(target), phase, event);
    if app.window(window).is_none() {
        debug!("{window} closed during dispatch, cancelling");
        return Flow::Stop(handled);
    }
    if handled.is_handled() {
        trace!("{id} consumed the event on the {phase:?} leg");
        return Flow::Stop(Handled::Yes);
    }
    Flow::Continue
}

fn deliver_to_root(app: &mut Application, window: WindowId, event: &Event) -> Handled {
    let Some(root) = app.root(window) else {
        return Handled::No;
    };
    match step(app, window, root, root, Phase::Target, event) {
        Flow::Continue => Handled::No,
        Flow::Stop(handled) => handled,
    }
}

/// Sends an informational event to one element, if it is alive and in `window`.
pub(crate) fn deliver_direct(
    app: &mut Application,
    window: WindowId,
    id: ElementId,
    event: &Event,
) -> Handled {
    if app.tree.window_of(id) != Some(window) {
        return Handled::No;
    }
    call_handler(app, window, id, Some(id), Phase::Direct, event)
}

fn call_handler(
    app: &mut Application,
    window: WindowId,
    id: ElementId,
    target: Option<ElementId>,
    phase: Phase,
    event: &Event,
) -> Handled {
    let Some(mut element) = app.tree.take_element(id) else {
        trace!("{id} is already running a handler");
        return Handled::No;
    };
    let type_name = element.short_type_name();
    let mut requests = Vec::new();
    let handled = {
        let _span = enter_span_if(app.trace.dispatch, &*element, id);
        let mut ctx = EventCtx {
            tree: &mut app.tree,
            requests: &mut requests,
            platform: &mut *app.platform,
            id,
            target,
            phase,
            window,
            position: event.position,
        };
        run_guarded(&app.errors, type_name, id, "event handler", || match phase {
            Phase::Capture => element.on_capture_event(&mut ctx, event),
            _ => element.on_event(&mut ctx, event),
        })
        .unwrap_or(Handled::No)
    };
    app.tree.put_element(id, element);
    apply_requests(app, requests);
    handled
}

fn apply_requests(app: &mut Application, requests: Vec<Request>) {
    for request in requests {
        match request {
            // Refusals are reported to the error sink by the application.
            Request::Focus(id) => {
                let _ = app.set_focus(id);
            }
            Request::ClearFocus(window) => app.clear_focus(window),
            Request::CaptureMouse(id) => {
                let _ = app.capture_mouse(id);
            }
            Request::ReleaseMouse(id) => {
                app.release_mouse(id);
            }
            Request::CloseWindow(window) => {
                if app.close_window(window).is_err() {
                    trace!("{window} was already closed");
                }
            }
            Request::Exit => app.exit(),
            Request::PostEvent(event) => app.posted.push_back(event),
            Request::Signal(signal) => app.signals.push_back(signal),
        }
    }
}

// --- MARK: VALIDATION

/// Drops focus, capture and hover which point at elements that can no longer hold them.
pub(crate) fn validate_interaction(app: &mut Application) {
    let tree = &mut app.tree;
    for window in &mut app.windows {
        let Some(focused) = window.focused else {
            continue;
        };
        let valid = tree.window_of(focused) == Some(window.id)
            && tree.state(focused).is_some_and(|s| s.is_focusable())
            && tree.effective_visible(focused)
            && tree.effective_enabled(focused);
        if !valid {
            debug!("{focused} can no longer hold focus in {}", window.id);
            window.focused = None;
            tree.set_interaction_flag(focused, ElementFlags::FOCUSED, false);
        }
    }

    let interaction = &mut app.interaction;
    if let Some(captured) = interaction.captured
        && (tree.window_of(captured).is_none() || !tree.effective_enabled(captured))
    {
        debug!("{captured} can no longer hold mouse capture");
        interaction.captured = None;
        tree.set_interaction_flag(captured, ElementFlags::CAPTURED, false);
    }

    let hover_window = interaction.hover_window;
    interaction.hovered_path.retain(|id| {
        let keep = tree.window_of(*id) == hover_window;
        if !keep {
            tree.set_interaction_flag(*id, ElementFlags::HOVERED, false);
        }
        keep
    });
    if interaction.hovered_path.is_empty() {
        interaction.hover_window = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> AppOptions {
        AppOptions::default()
    }

    #[test]
    fn presses_close_together_count_up() {
        let window = WindowId::next();
        let mut clicks = ClickTracker::default();
        let at = Point::new(10., 10.);
        let first = clicks.press(window, MouseButton::Left, Duration::ZERO, at, &options());
        assert_eq!(first, 1);
        assert_eq!(
            clicks.release(window, MouseButton::Left, Duration::from_millis(50), at, &options()),
            (1, false)
        );
        let second = clicks.press(
            window,
            MouseButton::Left,
            Duration::from_millis(200),
            Point::new(12., 11.),
            &options(),
        );
        assert_eq!(second, 2);
        assert_eq!(
            clicks.release(window, MouseButton::Left, Duration::from_millis(250), at, &options()),
            (2, true)
        );
    }

    #[test]
    fn slow_far_or_different_presses_start_over() {
        let window = WindowId::next();
        let other = WindowId::next();
        let mut clicks = ClickTracker::default();
        let at = Point::new(10., 10.);
        clicks.press(window, MouseButton::Left, Duration::ZERO, at, &options());
        let slow = Duration::from_millis(600);
        assert_eq!(clicks.press(window, MouseButton::Left, slow, at, &options()), 1);
        let far = Point::new(20., 10.);
        assert_eq!(clicks.press(window, MouseButton::Left, slow, far, &options()), 1);
        assert_eq!(clicks.press(window, MouseButton::Right, slow, far, &options()), 1);
        assert_eq!(clicks.press(other, MouseButton::Right, slow, far, &options()), 1);

        clicks.forget_window(other);
        assert_eq!(
            clicks.release(other, MouseButton::Right, slow, far, &options()),
            (1, false)
        );
    }
}
