// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Atomic rule splitting and class naming.
//!
//! ## Overview
//!
//! Every `(selector-context, declaration)` pair becomes its own
//! single-declaration rule keyed by a deterministic class name. Two textually
//! identical `(selector-context, property, value)` triples anywhere in one
//! compilation collapse to one rule and one class name — the dedup guarantee
//! the rest of the system relies on for bundle-size minimization.
//!
//! Emission order is first-appearance order; the cascade sort downstream is
//! what makes the output order-safe, not this pass.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use cascara_css::{Declaration, Rule};

use crate::hash::class_name;
use crate::pipeline::{Compilation, Pass, PassTags};

/// The atomic splitter pass.
///
/// The compression map, when supplied, must be a bijection over the set of
/// names it covers; two distinct generated names collapsing to one compressed
/// name would merge unrelated rules. Debug builds assert this; release builds
/// trust the caller.
#[derive(Clone, Copy, Debug, Default)]
pub struct AtomicSplit<'a> {
    /// Namespacing prefix folded into every class hash.
    pub prefix: Option<&'a str>,
    /// Optional bijective remap applied to generated class names.
    pub compression: Option<&'a BTreeMap<String, String>>,
}

impl Pass for AtomicSplit<'_> {
    fn name(&self) -> &'static str {
        "atomic-split"
    }

    fn tags(&self) -> PassTags {
        PassTags::ATOMIZE
    }

    fn run(&self, comp: &mut Compilation) {
        let rules = core::mem::take(&mut comp.sheet.rules);
        let mut splitter = Splitter {
            pass: self,
            seen: BTreeSet::new(),
            #[cfg(debug_assertions)]
            compressed_from: BTreeMap::new(),
            out: Vec::new(),
            class_names: Vec::new(),
        };
        splitter.split_rules(rules, &mut Vec::new());
        comp.sheet.rules = splitter.out;
        comp.class_names.extend(splitter.class_names);
    }
}

struct Splitter<'a, 'b> {
    pass: &'b AtomicSplit<'a>,
    /// Generated (pre-compression) names already emitted.
    seen: BTreeSet<String>,
    /// Reverse compression mapping, used to assert the bijection invariant.
    #[cfg(debug_assertions)]
    compressed_from: BTreeMap<String, String>,
    out: Vec<Rule>,
    class_names: Vec<String>,
}

impl Splitter<'_, '_> {
    fn split_rules(&mut self, rules: Vec<Rule>, at_chain: &mut Vec<String>) {
        for rule in rules {
            if rule.is_at_rule() {
                at_chain.push(rule.selector);
                self.split_rules(rule.nested, at_chain);
                at_chain.pop();
            } else {
                let context = rule.selector;
                for decl in rule.declarations {
                    self.split_declaration(&context, decl, at_chain);
                }
            }
        }
    }

    fn split_declaration(&mut self, context: &str, decl: Declaration, at_chain: &[String]) {
        let at_context = at_chain.join(" ");
        let generated = class_name(
            self.pass.prefix,
            &at_context,
            context,
            &decl.property,
            &decl.value,
            decl.important,
        );
        if !self.seen.insert(generated.clone()) {
            return;
        }

        let visible = self.compress(&generated);
        self.class_names.push(visible.clone());

        let atomic = Rule {
            selector: atomic_selector(&visible, context),
            declarations: alloc::vec![decl],
            nested: Vec::new(),
        };
        self.out.push(wrap_in_at_chain(atomic, at_chain));
    }

    fn compress(&mut self, generated: &str) -> String {
        let Some(map) = self.pass.compression else {
            return generated.to_string();
        };
        let Some(compressed) = map.get(generated) else {
            return generated.to_string();
        };
        #[cfg(debug_assertions)]
        {
            let prior = self
                .compressed_from
                .insert(compressed.clone(), generated.to_string());
            debug_assert!(
                prior.as_deref().is_none_or(|p| p == generated),
                "compression map is not a bijection: {compressed:?} has two sources"
            );
        }
        compressed.clone()
    }
}

/// Build the emitted selector for an atomic rule.
///
/// An empty context names the class alone; a pseudo suffix attaches without a
/// combinator; `&` (left in place by nesting resolution at component scope)
/// splices the class; anything else is a descendant of the class.
fn atomic_selector(class: &str, context: &str) -> String {
    if context.contains('&') {
        let mut dotted = String::with_capacity(class.len() + 1);
        dotted.push('.');
        dotted.push_str(class);
        return context.replace('&', &dotted);
    }
    let mut s = String::with_capacity(class.len() + context.len() + 2);
    s.push('.');
    s.push_str(class);
    if context.is_empty() {
        return s;
    }
    if !context.starts_with(':') {
        s.push(' ');
    }
    s.push_str(context);
    s
}

/// Re-wrap an atomic rule in its enclosing at-rule preludes, innermost last.
fn wrap_in_at_chain(rule: Rule, at_chain: &[String]) -> Rule {
    let mut wrapped = rule;
    for prelude in at_chain.iter().rev() {
        wrapped = Rule {
            selector: prelude.clone(),
            declarations: Vec::new(),
            nested: alloc::vec![wrapped],
        };
    }
    wrapped
}
