// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pass pipeline plumbing.
//!
//! ## Overview
//!
//! The compiler is an explicit ordered list of [`Pass`] objects assembled
//! from [`CompileOptions`](crate::CompileOptions) before anything runs — the
//! configuration decides the pass list in one place, and execution is a plain
//! fold over it. Each pass is tagged with the capability it provides so the
//! assembled pipeline can be inspected (and asserted on in tests).

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use bitflags::bitflags;
use cascara_css::Stylesheet;

use crate::ConditionalClass;

bitflags! {
    /// Capability tags carried by each pipeline pass.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct PassTags: u8 {
        /// Declaration-level normalization (shorthands, dedup, pruning).
        const NORMALIZE = 0b0000_0001;
        /// Structural rewrites (nesting, grouping).
        const STRUCTURE = 0b0000_0010;
        /// Atomic splitting and class naming.
        const ATOMIZE   = 0b0000_0100;
        /// Cascade-safety rewrites (specificity, ordering).
        const CASCADE   = 0b0000_1000;
        /// Vendor/whitespace finishing.
        const FINISH    = 0b0001_0000;
    }
}

/// The mutable state threaded through the pipeline.
#[derive(Clone, Debug, Default)]
pub struct Compilation {
    /// The structural tree being transformed.
    pub sheet: Stylesheet,
    /// Class names emitted by the splitter, in first-appearance order.
    pub class_names: Vec<String>,
    /// Condition-gated class names from the conditional path.
    pub conditional_classes: Vec<ConditionalClass>,
}

/// One step of the compile pipeline.
pub trait Pass {
    /// Stable name, used by logs and pipeline assertions.
    fn name(&self) -> &'static str;

    /// The capability this pass provides.
    fn tags(&self) -> PassTags;

    /// Transform the compilation in place. Passes cannot fail: parsing has
    /// already happened, and every transform is total over the tree.
    fn run(&self, comp: &mut Compilation);
}

/// An assembled, ordered pass list.
pub struct Pipeline<'a> {
    passes: Vec<Box<dyn Pass + 'a>>,
}

impl core::fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.passes.iter().map(|p| p.name()))
            .finish()
    }
}

impl<'a> Pipeline<'a> {
    /// Build a pipeline from an ordered pass list.
    pub fn new(passes: Vec<Box<dyn Pass + 'a>>) -> Self {
        Self { passes }
    }

    /// Pass names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass in order.
    pub fn run(&self, comp: &mut Compilation) {
        for pass in &self.passes {
            pass.run(comp);
        }
    }
}
