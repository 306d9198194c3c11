// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declaration normalization.
//!
//! Expands shorthands into longhands so later dedup operates per-longhand,
//! keeps only the winning declaration per property within a rule, and prunes
//! rules left empty.

use alloc::vec::Vec;

use cascara_css::{Declaration, Rule, expand_shorthand};

use crate::pipeline::{Compilation, Pass, PassTags};

/// The declaration normalizer pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Normalize;

impl Pass for Normalize {
    fn name(&self) -> &'static str {
        "normalize"
    }

    fn tags(&self) -> PassTags {
        PassTags::NORMALIZE
    }

    fn run(&self, comp: &mut Compilation) {
        for rule in &mut comp.sheet.rules {
            normalize_rule(rule);
        }
        comp.sheet.retain_non_empty();
    }
}

fn normalize_rule(rule: &mut Rule) {
    expand_shorthands(&mut rule.declarations);
    dedup_last_wins(&mut rule.declarations);
    for nested in &mut rule.nested {
        normalize_rule(nested);
    }
}

fn expand_shorthands(declarations: &mut Vec<Declaration>) {
    let mut out = Vec::with_capacity(declarations.len());
    for decl in declarations.drain(..) {
        match expand_shorthand(&decl) {
            Some(longhands) => out.extend(longhands),
            None => out.push(decl),
        }
    }
    *declarations = out;
}

/// Within one rule, a later declaration of the same property shadows an
/// earlier one and takes its position at the end — except that an earlier
/// `!important` survives a later non-important duplicate.
fn dedup_last_wins(declarations: &mut Vec<Declaration>) {
    let mut out: Vec<Declaration> = Vec::with_capacity(declarations.len());
    for decl in declarations.drain(..) {
        if let Some(i) = out.iter().position(|d| d.property == decl.property) {
            if out[i].important && !decl.important {
                continue;
            }
            out.remove(i);
        }
        out.push(decl);
    }
    *declarations = out;
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascara_css::parse;

    fn run(css: &str) -> Compilation {
        let mut comp = Compilation {
            sheet: parse(css).unwrap(),
            ..Default::default()
        };
        Normalize.run(&mut comp);
        comp
    }

    #[test]
    fn later_declaration_shadows_earlier() {
        let comp = run(".a { color: red; color: blue; }");
        let decls = &comp.sheet.rules[0].declarations;
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, "blue");
    }

    #[test]
    fn important_survives_later_plain_duplicate() {
        let comp = run(".a { color: red !important; color: blue; }");
        let decls = &comp.sheet.rules[0].declarations;
        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
    }

    #[test]
    fn shorthand_expansion_enables_longhand_dedup() {
        let comp = run(".a { margin: 8px; margin-top: 0; }");
        let decls = &comp.sheet.rules[0].declarations;
        assert_eq!(decls.len(), 4);
        // margin-top was re-declared, so it wins and moves last.
        assert_eq!(decls[3].property, "margin-top");
        assert_eq!(decls[3].value, "0");
        assert!(decls[..3].iter().all(|d| d.value == "8px"));
    }

    #[test]
    fn empty_rules_are_pruned() {
        let comp = run(".a { } .b { color: red } @media x { .c { } }");
        assert_eq!(comp.sheet.rules.len(), 1);
        assert_eq!(comp.sheet.rules[0].selector, ".b");
    }

    #[test]
    fn nested_rules_are_normalized_too() {
        let comp = run(".a { :hover { color: red; color: blue } }");
        let hover = &comp.sheet.rules[0].nested[0];
        assert_eq!(hover.declarations.len(), 1);
        assert_eq!(hover.declarations[0].value, "blue");
    }
}
