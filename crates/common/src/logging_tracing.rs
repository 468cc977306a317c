// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! # Tracing configuration setup.
//!
//! The routers are instrumented with Rust's `tracing` framework. Calling [`init`] installs a
//! global subscriber that logs to the console, filtered by the `GQL_LOG` environment variable
//! (same conventions as `RUST_LOG`, for example `GQL_LOG=graphql_router=debug`).
//!
//! Hosts call this once at startup. Libraries never install a subscriber themselves.

use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

const GQL_LOG: &str = "GQL_LOG";

/// Initialize the tracing subscriber.
///
/// Returns an error if a global subscriber has already been installed.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let fmt_layer = tracing_subscriber::fmt::layer().compact();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .with_env_var(GQL_LOG)
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
}
