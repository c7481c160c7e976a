// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Configures a suitable default [`tracing`] implementation for a Trellis application.
//!
//! This uses a compact log format meant for GUI applications,
//! and will write all logs to a temporary file in debug mode.
//! The default filter can be overwritten using `RUST_LOG`.
//! This will include all [`DEBUG`](tracing::Level::DEBUG) messages in debug mode,
//! and all [`INFO`](tracing::Level::INFO) level messages in release mode.
//!
//! If a `tracing` backend is already configured, this will not overwrite that.

use std::fs::File;
use std::time::UNIX_EPOCH;

use time::macros::format_description;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::prelude::*;

/// Builds the subscriber used by [`try_init_tracing`], with the given `default_level`.
///
/// Returns the subscriber, and a description of any recoverable setup problem.
pub fn default_tracing_subscriber(default_level: LevelFilter) -> (impl Subscriber, Option<String>) {
    let env_filter_builder = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("RUST_LOG");
    let mut problem = env_filter_builder
        .from_env()
        .err()
        .map(|err| format!("failed to parse RUST_LOG environment variable: {err:#}"));
    let env_filter = env_filter_builder.from_env_lossy();

    // Time without the date, with millisecond precision, and no target.
    let timer = UtcTime::new(format_description!(
        "[hour repr:24]:[minute]:[second].[subsecond digits:3]Z"
    ));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_timer(timer.clone())
        .with_target(false)
        .with_filter(env_filter);

    // The file layer logs everything, and is skipped in release mode.
    let log_file_layer = if cfg!(debug_assertions) {
        let id = std::time::SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis())
            .unwrap_or_default();
        let tmp_path = std::env::temp_dir().join(format!("trellis-{id:016}-dense.log"));
        match File::create(&tmp_path) {
            Ok(file) => {
                #[allow(clippy::print_stderr, reason = "Tracing is not set up yet")]
                {
                    eprintln!("---");
                    eprintln!("Writing full logs to {}", tmp_path.display());
                    eprintln!("---");
                }
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_timer(timer)
                        .with_writer(file)
                        .with_ansi(false),
                )
            }
            Err(err) => {
                if problem.is_none() {
                    problem = Some(format!(
                        "cannot create log file {}: {err}",
                        tmp_path.display()
                    ));
                }
                None
            }
        }
    } else {
        None
    };

    let registry = tracing_subscriber::registry()
        .with(console_layer)
        .with(log_file_layer);
    (registry, problem)
}

/// A tracing subscriber was already installed.
#[derive(Debug, thiserror::Error)]
#[error("A tracing subscriber has been set before.")]
pub struct TracingSubscriberHasBeenSetError;

fn verify_subscriber_has_not_been_set() -> Result<(), TracingSubscriberHasBeenSetError> {
    // `has_been_set` is doc(hidden), but `tracing` itself depends on it for the 0.1 series.
    if tracing_core::dispatcher::has_been_set() {
        return Err(TracingSubscriberHasBeenSetError);
    }
    Ok(())
}

fn init_with_level(default_level: LevelFilter) -> Result<(), TracingSubscriberHasBeenSetError> {
    verify_subscriber_has_not_been_set()?;
    let (subscriber, problem) = default_tracing_subscriber(default_level);
    // Cannot fail: no subscriber has been set.
    let _ = tracing::subscriber::set_global_default(subscriber);
    if let Some(problem) = problem {
        tracing::error!("Initialising logging encountered recoverable error: {problem}");
    }
    Ok(())
}

/// Initialises tracing with a default subscriber for a unit test.
///
/// Only warnings and errors reach the console, but everything is still written to the log file.
pub fn try_init_test_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    init_with_level(LevelFilter::WARN)
}

/// Initialises tracing with a default subscriber for an end-user application.
pub fn try_init_tracing() -> Result<(), TracingSubscriberHasBeenSetError> {
    // DEBUG should print a few logs per low-density event.
    // INFO should only print logs for noteworthy things.
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    init_with_level(default_level)
}
