// Copyright 2026 the Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The application context object, the platform contract, and process-wide setup.

mod application;
mod options;
mod platform;
mod proxy;
mod tracing_backend;

pub use application::{AppSignal, Application};
pub use options::AppOptions;
pub use platform::{Platform, PumpResult, Waker};
pub use proxy::{AppProxy, ProxyClosed};
pub use tracing_backend::{
    TracingSubscriberHasBeenSetError, default_tracing_subscriber, try_init_test_tracing,
    try_init_tracing,
};
