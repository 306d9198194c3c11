// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Vendor and whitespace finishing.
//!
//! This stage is an external-collaborator contract: given a finished rule
//! tree, produce an equivalent tree with vendor-prefixed declarations
//! inserted adjacent to their unprefixed source and insignificant whitespace
//! collapsed. The algorithm behind the default [`TargetFinisher`] is not part
//! of the core's contract; alternative finishers can be swapped in through
//! the [`Finisher`] trait.

use alloc::string::String;
use alloc::vec::Vec;

use cascara_css::{Declaration, Rule, Stylesheet, property_prefixes, value_prefixes};

use crate::pipeline::{Compilation, Pass, PassTags};

/// The finishing contract.
pub trait Finisher {
    /// Rewrite the tree in place to an equivalent, finished form.
    fn finish(&self, sheet: &mut Stylesheet);
}

/// Default finisher for the fixed browser-target tables in
/// [`cascara_css::property`].
///
/// Prefixed declarations are inserted immediately before their unprefixed
/// source so the unprefixed form wins wherever both are understood.
#[derive(Clone, Copy, Debug, Default)]
pub struct TargetFinisher;

impl Finisher for TargetFinisher {
    fn finish(&self, sheet: &mut Stylesheet) {
        for rule in &mut sheet.rules {
            finish_rule(rule);
        }
    }
}

/// Pipeline adapter running a [`Finisher`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Finish<F: Finisher> {
    /// The finisher to run.
    pub finisher: F,
}

impl<F: Finisher> Pass for Finish<F> {
    fn name(&self) -> &'static str {
        "finish"
    }

    fn tags(&self) -> PassTags {
        PassTags::FINISH
    }

    fn run(&self, comp: &mut Compilation) {
        self.finisher.finish(&mut comp.sheet);
    }
}

fn finish_rule(rule: &mut Rule) {
    let declarations = core::mem::take(&mut rule.declarations);
    let mut out = Vec::with_capacity(declarations.len());
    for mut decl in declarations {
        decl.value = collapse_value_ws(&decl.value);
        for prefix in property_prefixes(&decl.property) {
            let mut property = String::with_capacity(prefix.len() + decl.property.len());
            property.push_str(prefix);
            property.push_str(&decl.property);
            out.push(Declaration {
                property,
                value: decl.value.clone(),
                important: decl.important,
            });
        }
        for prefix in value_prefixes(&decl.property, &decl.value) {
            let mut value = String::with_capacity(prefix.len() + decl.value.len());
            value.push_str(prefix);
            value.push_str(&decl.value);
            out.push(Declaration {
                property: decl.property.clone(),
                value,
                important: decl.important,
            });
        }
        out.push(decl);
    }
    rule.declarations = out;
    for nested in &mut rule.nested {
        finish_rule(nested);
    }
}

/// Collapse whitespace runs in a value to single spaces, leaving quoted
/// strings untouched.
fn collapse_value_ws(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut quote: Option<char> = None;
    let mut pending_space = false;
    for ch in value.chars() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                quote = Some(ch);
                out.push(ch);
            }
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }
    out
}
