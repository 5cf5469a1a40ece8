// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The CPU execution layer of the Gesso rendering pipeline.
//!
//! This crate turns the data types of [`gesso_common`] into executed
//! pipelines:
//!
//! - [`dispatch`]: the process-wide [`PipelineRegistry`] mapping signatures
//!   to routine pairs, with a pluggable code-generation backend and a
//!   guaranteed reference fallback.
//! - [`reference`]: the portable reference backend, statically compiled over
//!   the whole configuration space.
//!
//! A draw call resolves its paint state into a [`Signature`] and a
//! [`FillData`] plus [`FetchData`], asks the registry for a
//! [`DispatchData`], and runs it against the destination [`Surface`].
//!
//! [`Signature`]: gesso_common::signature::Signature
//! [`FillData`]: gesso_common::fill::FillData
//! [`FetchData`]: gesso_common::fetch::FetchData
//! [`Surface`]: gesso_common::surface::Surface
//! [`PipelineRegistry`]: dispatch::PipelineRegistry
//! [`DispatchData`]: dispatch::DispatchData
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![forbid(unsafe_code)]

pub mod dispatch;
mod driver;
pub mod reference;

pub use gesso_common::{color, kurbo, peniko};
