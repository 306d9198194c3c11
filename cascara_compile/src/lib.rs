// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cascara_compile --heading-base-level=0

//! Cascara Compile: the build-time half of the Cascara atomizer.
//!
//! ## Overview
//!
//! [`compile`] takes an author-written CSS fragment and produces a minimal
//! set of deduplicated, independently insertable rule strings ("sheets")
//! plus the class names that reference them. The runtime half
//! (`cascara_runtime`) re-inserts those sheets in cascade-correct order,
//! whatever order they physically arrive in.
//!
//! ## Pipeline
//!
//! Compilation is an explicit ordered list of capability-tagged passes
//! assembled from [`CompileOptions`] (see [`pipeline`]):
//!
//! 1. [`normalize::Normalize`] — shorthand expansion, last-wins dedup,
//!    empty-rule pruning.
//! 2. [`structural::UnwrapNesting`] — nesting resolution.
//! 3. Branch: [`atomic::AtomicSplit`] for component CSS, or
//!    [`structural::GroupGlobal`] for page-global CSS
//!    (via [`compile_global`]), which preserves author order.
//! 4. [`cascade::IncreaseSpecificity`] (opt-in) and [`cascade::SortRules`].
//! 5. [`finish::TargetFinisher`] (when `optimize_css` is set).
//! 6. [`extract::extract_sheets`] — one string per insertable rule.
//!
//! ## Example
//!
//! ```
//! use cascara_compile::{CompileOptions, compile};
//!
//! let out = compile("color: red; background-color: #000;", &CompileOptions::default()).unwrap();
//! assert_eq!(out.sheets.len(), 2);
//! assert_eq!(out.class_names.len(), 2);
//! assert_eq!(out.sheets[0], format!(".{}{{color:red}}", out.class_names[0]));
//! ```
//!
//! Compilation is pure and synchronous: no shared state beyond the
//! caller-supplied (and caller-synchronized) compression map, no blocking,
//! no cancellation. A call either completes or fails with [`ParseError`];
//! malformed input never yields partial output.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod atomic;
pub mod cascade;
pub mod extract;
pub mod finish;
pub mod hash;
pub mod normalize;
pub mod pipeline;
pub mod structural;

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use cascara_css::parse;

use crate::atomic::AtomicSplit;
use crate::cascade::{IncreaseSpecificity, SortRules};
use crate::extract::extract_sheets;
use crate::finish::{Finish, TargetFinisher};
use crate::hash::short_hash;
use crate::normalize::Normalize;
use crate::pipeline::{Compilation, Pipeline};
use crate::structural::{GroupGlobal, UnwrapNesting};

pub use crate::pipeline::{Pass, PassTags};
pub use crate::structural::open_selector_context;
pub use cascara_css::{ParseDiagnostic, ParseError};

/// Options accepted by [`compile`] and friends.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompileOptions<'a> {
    /// Run the vendor/whitespace finishing passes.
    pub optimize_css: bool,
    /// Repeat class selectors to out-rank third-party rules without
    /// `!important`.
    pub increase_specificity: bool,
    /// Sub-sort at-rules by the fixed at-rule-type precedence.
    pub sort_at_rules: bool,
    /// Order shorthand properties ahead of their longhands.
    pub sort_shorthand: bool,
    /// Namespacing prefix folded into class hashes, for collision avoidance
    /// across independently compiled sources.
    pub class_hash_prefix: Option<&'a str>,
    /// Bijective remap applied to generated class names for smaller
    /// production output. Externally synchronized by the caller.
    pub class_name_compression_map: Option<&'a BTreeMap<String, String>>,
}

/// A condition-gated CSS fragment passed to [`compile_with_conditionals`].
#[derive(Clone, Copy, Debug)]
pub struct Conditional<'a> {
    /// The originating boolean expression, carried through verbatim.
    pub condition: &'a str,
    /// The fragment to compile when the condition holds.
    pub css: &'a str,
}

/// A class name gated behind its originating condition.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConditionalClass {
    /// The originating boolean expression.
    pub condition: String,
    /// The class to apply when the condition holds.
    pub class_name: String,
}

/// The product of one compilation.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CompileOutput {
    /// Independently insertable rule strings, in cascade-safe order.
    pub sheets: Vec<String>,
    /// Class names to apply unconditionally, in first-appearance order.
    pub class_names: Vec<String>,
    /// Class names to apply when their condition holds.
    pub conditional_classes: Vec<ConditionalClass>,
}

/// Compile component-scoped CSS through the atomic branch.
///
/// Equivalent to [`compile_with_conditionals`] with no conditionals.
pub fn compile(css: &str, options: &CompileOptions<'_>) -> Result<CompileOutput, ParseError> {
    compile_with_conditionals(css, &[], options)
}

/// Compile component-scoped CSS plus condition-gated fragments.
///
/// Conditional fragments are not deduplicated against unconditional rules;
/// their class names are reported separately, gated by the originating
/// condition. When the unconditional CSS leaves a selector block open (its
/// body is the conditionals), [`open_selector_context`] recovers that
/// selector and the fragments compile nested under it.
///
/// # Example
///
/// ```
/// use cascara_compile::{CompileOptions, Conditional, compile_with_conditionals};
///
/// let out = compile_with_conditionals(
///     "color: red; :hover {",
///     &[Conditional { condition: "is_on", css: "color: blue" }],
///     &CompileOptions::default(),
/// )
/// .unwrap();
///
/// assert_eq!(out.class_names.len(), 1);
/// assert_eq!(out.conditional_classes[0].condition, "is_on");
/// assert!(out.sheets[1].ends_with(":hover{color:blue}"));
/// ```
pub fn compile_with_conditionals(
    css: &str,
    conditionals: &[Conditional<'_>],
    options: &CompileOptions<'_>,
) -> Result<CompileOutput, ParseError> {
    let (base, open_context) = if conditionals.is_empty() {
        (css, None)
    } else {
        match open_selector_context(css) {
            Some((selector, offset)) => (&css[..offset], Some(selector)),
            None => (css, None),
        }
    };

    let pipeline = atomic_pipeline(options);
    let mut comp = Compilation {
        sheet: parse(base)?,
        ..Default::default()
    };
    pipeline.run(&mut comp);

    let mut output = CompileOutput {
        sheets: extract_sheets(&comp.sheet),
        class_names: comp.class_names,
        conditional_classes: Vec::new(),
    };

    for conditional in conditionals {
        let fragment = match &open_context {
            Some(selector) => format!("{selector}{{{}}}", conditional.css),
            None => conditional.css.to_string(),
        };
        let mut cond_comp = Compilation {
            sheet: parse(&fragment).map_err(|e| ParseError {
                input: conditional.css.to_string(),
                cause: e.cause,
            })?,
            ..Default::default()
        };
        pipeline.run(&mut cond_comp);
        output.sheets.extend(extract_sheets(&cond_comp.sheet));
        output
            .conditional_classes
            .extend(cond_comp.class_names.into_iter().map(|class_name| {
                ConditionalClass {
                    condition: conditional.condition.to_string(),
                    class_name,
                }
            }));
    }

    Ok(output)
}

/// Compile page-global CSS: no atomic splitting, author order preserved.
///
/// The whole input is content-hashed into a synthetic wrapper class; bare
/// declarations are scoped to it and every other selector is prefixed with
/// it. The wrapper class is the single entry of `class_names`.
///
/// # Example
///
/// ```
/// use cascara_compile::{CompileOptions, compile_global};
///
/// let out = compile_global("color:red;.x{color:blue}", &CompileOptions::default()).unwrap();
/// let wrapper = &out.class_names[0];
///
/// assert_eq!(out.sheets[0], format!(".{wrapper}{{color:red}}"));
/// assert_eq!(out.sheets[1], format!(".{wrapper} .x{{color:blue}}"));
/// ```
pub fn compile_global(css: &str, options: &CompileOptions<'_>) -> Result<CompileOutput, ParseError> {
    let mut wrapper = String::with_capacity(9);
    wrapper.push('_');
    wrapper.push_str(&short_hash(&[
        options.class_hash_prefix.unwrap_or(""),
        css,
    ]));
    if let Some(map) = options.class_name_compression_map {
        if let Some(compressed) = map.get(&wrapper) {
            wrapper = compressed.clone();
        }
    }

    let mut comp = Compilation {
        sheet: parse(css)?,
        ..Default::default()
    };
    global_pipeline(options, wrapper).run(&mut comp);

    Ok(CompileOutput {
        sheets: extract_sheets(&comp.sheet),
        class_names: comp.class_names,
        conditional_classes: Vec::new(),
    })
}

/// Assemble the atomic-branch pipeline from the options.
fn atomic_pipeline<'a>(options: &CompileOptions<'a>) -> Pipeline<'a> {
    let mut passes: Vec<Box<dyn Pass + 'a>> = alloc::vec![
        Box::new(Normalize),
        Box::new(UnwrapNesting),
        Box::new(AtomicSplit {
            prefix: options.class_hash_prefix,
            compression: options.class_name_compression_map,
        }),
    ];
    if options.increase_specificity {
        passes.push(Box::new(IncreaseSpecificity));
    }
    passes.push(Box::new(SortRules {
        at_rules: options.sort_at_rules,
        shorthand: options.sort_shorthand,
    }));
    if options.optimize_css {
        passes.push(Box::new(Finish {
            finisher: TargetFinisher,
        }));
    }
    Pipeline::new(passes)
}

/// Assemble the global-branch pipeline. Global CSS is never re-sorted:
/// author order is part of the intent there, unlike the atomic path.
fn global_pipeline<'a>(options: &CompileOptions<'a>, wrapper: String) -> Pipeline<'a> {
    let mut passes: Vec<Box<dyn Pass + 'a>> = alloc::vec![
        Box::new(Normalize),
        Box::new(UnwrapNesting),
        Box::new(GroupGlobal { wrapper }),
    ];
    if options.optimize_css {
        passes.push(Box::new(Finish {
            finisher: TargetFinisher,
        }));
    }
    Pipeline::new(passes)
}
