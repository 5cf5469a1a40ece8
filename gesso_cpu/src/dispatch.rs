// Copyright 2026 the Gesso Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Resolving signatures to executable pipelines.
//!
//! The [`PipelineRegistry`] maps a [`Signature`] to a [`DispatchData`] — a
//! pair of routine references. Resolution tries a pluggable
//! [`CodegenBackend`] first and falls back to the statically compiled
//! reference backend, which covers the whole enumerated signature space, so
//! resolution never fails for an in-range signature.

use crate::driver;
use crate::reference;
use gesso_common::fetch::FetchData;
use gesso_common::fill::FillData;
use gesso_common::color::PremulRgba8;
use gesso_common::signature::Signature;
use gesso_common::surface::Surface;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{OnceLock, RwLock};

/// A fill routine: walks its geometry and composites source pixels into the
/// surface.
pub type FillFunc = fn(&mut Surface<'_>, &FillData<'_>, &FetchData<'_>);

/// A fetch routine: produces the source pixels for one scanline segment
/// starting at `(x, y)`.
pub type FetchFunc = fn(&FetchData<'_>, x: u32, y: u32, out: &mut [PremulRgba8]);

/// An immutable pair of routine references resolved for one signature.
///
/// A one-stage pipeline has its fetch logic inlined into the fill routine.
/// A two-stage pipeline carries a separate fetch routine; [`Self::run`]
/// then drives the two stages per scanline segment, handing the fill
/// routine a prefetched-span descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchData {
    fill_func: FillFunc,
    fetch_func: Option<FetchFunc>,
}

impl DispatchData {
    /// A self-contained pipeline.
    pub fn one_stage(fill_func: FillFunc) -> Self {
        Self { fill_func, fetch_func: None }
    }

    /// A pipeline with a separate fetch stage.
    pub fn two_stage(fill_func: FillFunc, fetch_func: FetchFunc) -> Self {
        Self { fill_func, fetch_func: Some(fetch_func) }
    }

    /// Whether the fetch logic is inlined into the fill routine.
    #[inline]
    pub fn is_one_stage(&self) -> bool {
        self.fetch_func.is_none()
    }

    /// The fill routine.
    #[inline]
    pub fn fill_func(&self) -> FillFunc {
        self.fill_func
    }

    /// The fetch routine of a two-stage pipeline.
    #[inline]
    pub fn fetch_func(&self) -> Option<FetchFunc> {
        self.fetch_func
    }

    /// Execute the pipeline for one fill call.
    pub fn run(&self, surface: &mut Surface<'_>, fill: &FillData<'_>, fetch: &FetchData<'_>) {
        match self.fetch_func {
            None => (self.fill_func)(surface, fill, fetch),
            Some(fetch_func) => {
                driver::run_two_stage(self.fill_func, fetch_func, surface, fill, fetch);
            }
        }
    }
}

/// Why a code-generation backend did not produce a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The backend has no specialized routine for this signature.
    ///
    /// This is an expected outcome, not a failure: resolution falls back to
    /// the reference backend and the caller never observes it.
    #[error("no specialized routine for {0:?}")]
    Unsupported(Signature),
}

/// A backend that synthesizes specialized pipelines for signatures.
///
/// Compilation may take non-trivial CPU time; it is never cancelled
/// mid-flight and always completes before the result is published.
pub trait CodegenBackend: Send + Sync {
    /// Compile a pipeline for `signature`, or report it unsupported.
    fn compile(&self, signature: Signature) -> Result<DispatchData, CodegenError>;
}

/// The process-wide pipeline cache.
///
/// Lifecycle: populated lazily on first resolution of each signature;
/// entries are never mutated or evicted once published. Any number of
/// worker threads may resolve concurrently; when several race on the same
/// new signature, exactly one entry wins publication and the losers discard
/// their redundant work — a reader can never observe a partially
/// constructed entry.
pub struct PipelineRegistry {
    codegen: Option<Box<dyn CodegenBackend>>,
    cache: RwLock<HashMap<Signature, DispatchData>>,
}

impl PipelineRegistry {
    /// A registry backed by the reference backend only.
    pub fn new() -> Self {
        Self {
            codegen: None,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// A registry that tries `codegen` before the reference fallback.
    pub fn with_codegen(codegen: Box<dyn CodegenBackend>) -> Self {
        Self {
            codegen: Some(codegen),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The registry shared by the whole process.
    ///
    /// Backed by the reference backend; renderers that bring their own
    /// code-generation backend hold their own registry instead.
    pub fn global() -> &'static Self {
        static GLOBAL: OnceLock<PipelineRegistry> = OnceLock::new();
        GLOBAL.get_or_init(Self::new)
    }

    /// Resolve a signature to an executable pipeline.
    ///
    /// Never fails for in-range signatures: the reference backend is
    /// statically compiled for the full enumerated configuration space.
    pub fn resolve(&self, signature: Signature) -> DispatchData {
        debug_assert!(
            !signature.has_pending_flag(),
            "pending signatures must be completed before resolution"
        );

        if let Some(entry) = self.cache.read().unwrap().get(&signature) {
            return *entry;
        }

        // Build outside the write lock; racing resolvers may do the same
        // work in parallel, and all but one discard it below.
        let entry = match &self.codegen {
            Some(backend) => backend.compile(signature).unwrap_or_else(|err| {
                log::trace!("{err}, using the reference backend");
                reference::resolve(signature)
            }),
            None => reference::resolve(signature),
        };

        match self.cache.write().unwrap().entry(signature) {
            Entry::Occupied(published) => *published.get(),
            Entry::Vacant(slot) => {
                log::debug!("publishing pipeline for {signature:?}");
                *slot.insert(entry)
            }
        }
    }

    /// Number of pipelines published so far.
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }

    /// Whether no pipeline has been published yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PipelineRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PipelineRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PipelineRegistry")
            .field("has_codegen", &self.codegen.is_some())
            .field("published", &self.len())
            .finish()
    }
}
