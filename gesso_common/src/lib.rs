// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data structures shared across the Gesso rendering pipeline.
//!
//! This crate defines the pure-data half of the pixel composition pipeline:
//!
//! - [`signature`]: the packed pipeline signature and its closed field
//!   enumerations, used as the key for pipeline caches.
//! - [`pixel`]: packed/unpacked pixel representations and the arithmetic the
//!   portable reference pipelines are built on.
//! - [`fill`]: fill geometry — aligned boxes, sub-pixel box decomposition
//!   into coverage-command programs, external masks, and the analytic
//!   cell-buffer carrier.
//! - [`fetch`]: source-fetch descriptors for solid colors, patterns and
//!   gradients, including fetch-type classification.
//! - [`surface`]: the destination surface descriptor pipelines composite
//!   into.
//!
//! This crate should not be used on its own; it exists as the foundation for
//! `gesso_cpu`, which executes pipelines resolved from these types.
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![forbid(unsafe_code)]

pub mod fetch;
pub mod fill;
pub mod format;
pub mod pixel;
pub mod rect;
pub mod signature;
pub mod surface;

pub use peniko;
pub use peniko::color;
pub use peniko::kurbo;
