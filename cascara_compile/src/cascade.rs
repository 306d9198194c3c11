// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade-safety passes: specificity boosting and the final ordering sort.
//!
//! The splitter emits rules in source-appearance order, which is not
//! cascade-safe by construction. The sort here establishes an order that
//! survives arbitrary recombination: at-rules last, pseudo buckets in LVFHA
//! precedence, and (optionally) shorthands ahead of the longhands that may
//! override them. Within a sort key the splitter's emission order is kept.

use alloc::string::String;

use cascara_css::{Bucket, Rule, shorthand_depth};

use crate::pipeline::{Compilation, Pass, PassTags};

/// Repeat the leading class selector to raise specificity without
/// `!important`.
///
/// `.a{…}` becomes `.a.a{…}`, out-ranking single-class third-party rules.
/// At-rule preludes are never touched (their children are rewritten instead),
/// and selectors containing pseudo-elements are skipped, where repetition
/// would change matching semantics.
#[derive(Clone, Copy, Debug, Default)]
pub struct IncreaseSpecificity;

impl Pass for IncreaseSpecificity {
    fn name(&self) -> &'static str {
        "increase-specificity"
    }

    fn tags(&self) -> PassTags {
        PassTags::CASCADE
    }

    fn run(&self, comp: &mut Compilation) {
        boost_rules(&mut comp.sheet.rules);
    }
}

fn boost_rules(rules: &mut [Rule]) {
    for rule in rules {
        if rule.is_at_rule() {
            boost_rules(&mut rule.nested);
        } else if let Some(boosted) = boost_selector(&rule.selector) {
            rule.selector = boosted;
        }
    }
}

/// `.a:hover` → `.a.a:hover`; `None` when boosting does not apply.
fn boost_selector(selector: &str) -> Option<String> {
    if !selector.starts_with('.') || selector.contains("::") {
        return None;
    }
    let token_len = 1 + selector[1..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_'))
        .count();
    if token_len == 1 {
        return None;
    }
    let (token, rest) = selector.split_at(token_len);
    let mut out = String::with_capacity(selector.len() + token_len);
    out.push_str(token);
    out.push_str(token);
    out.push_str(rest);
    Some(out)
}

/// The final cascade-order sort.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortRules {
    /// Sub-sort at-rules by the fixed at-rule-type precedence.
    pub at_rules: bool,
    /// Order shorthand properties ahead of their longhands.
    pub shorthand: bool,
}

impl Pass for SortRules {
    fn name(&self) -> &'static str {
        "sort-rules"
    }

    fn tags(&self) -> PassTags {
        PassTags::CASCADE
    }

    fn run(&self, comp: &mut Compilation) {
        let at_rules = self.at_rules;
        let shorthand = self.shorthand;
        comp.sheet
            .rules
            .sort_by_key(|rule| sort_key(rule, at_rules, shorthand));
    }
}

/// (at-rule group, at-rule type rank, pseudo bucket, shorthand depth).
fn sort_key(rule: &Rule, at_rules: bool, shorthand: bool) -> (u8, u8, Bucket, u8) {
    if rule.is_at_rule() {
        let rank = if at_rules {
            at_rule_rank(&rule.selector)
        } else {
            0
        };
        // Children classify by their own selector so hover rules inside a
        // media query still land after base rules inside the same rank.
        let bucket = rule
            .nested
            .first()
            .map_or(Bucket::CatchAll, |r| Bucket::for_selector(&r.selector));
        return (1, rank, bucket, depth_of(rule.nested.first(), shorthand));
    }
    (
        0,
        0,
        Bucket::for_selector(&rule.selector),
        depth_of(Some(rule), shorthand),
    )
}

fn depth_of(rule: Option<&Rule>, enabled: bool) -> u8 {
    if !enabled {
        return 0;
    }
    rule.and_then(|r| r.declarations.first())
        .map_or(1, |d| shorthand_depth(&d.property))
}

/// Fixed at-rule-type precedence used when `sort_at_rules` is enabled.
fn at_rule_rank(prelude: &str) -> u8 {
    let name = prelude
        .trim_start_matches('@')
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    match name {
        "media" => 0,
        "supports" => 1,
        "container" => 2,
        _ => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use cascara_css::parse;

    #[test]
    fn leading_class_token_is_doubled() {
        assert_eq!(boost_selector("._a1b2c3d4"), Some("._a1b2c3d4._a1b2c3d4".into()));
        assert_eq!(
            boost_selector("._x:hover"),
            Some("._x._x:hover".into())
        );
        assert_eq!(boost_selector("._x .a"), Some("._x._x .a".into()));
    }

    #[test]
    fn pseudo_elements_and_non_class_selectors_are_skipped() {
        assert_eq!(boost_selector("._x::before"), None);
        assert_eq!(boost_selector("div"), None);
    }

    #[test]
    fn at_rule_children_are_boosted_in_place() {
        let mut comp = Compilation {
            sheet: parse("@media x { ._y { color: red } }").unwrap(),
            ..Default::default()
        };
        IncreaseSpecificity.run(&mut comp);
        let media = &comp.sheet.rules[0];
        assert_eq!(media.selector, "@media x");
        assert_eq!(media.nested[0].selector, "._y._y");
    }

    fn selectors(comp: &Compilation) -> Vec<String> {
        comp.sheet
            .rules
            .iter()
            .map(|r| r.selector.clone())
            .collect()
    }

    #[test]
    fn unconditional_rules_precede_pseudo_buckets() {
        let mut comp = Compilation {
            sheet: parse("._b:hover{color:blue}._a{color:red}").unwrap(),
            ..Default::default()
        };
        SortRules::default().run(&mut comp);
        assert_eq!(selectors(&comp), ["._a", "._b:hover"]);
    }

    #[test]
    fn lvfha_order_is_established() {
        let mut comp = Compilation {
            sheet: parse("._a:active{color:red}._a:hover{color:red}._a:focus{color:red}._a:link{color:red}")
                .unwrap(),
            ..Default::default()
        };
        SortRules::default().run(&mut comp);
        assert_eq!(
            selectors(&comp),
            ["._a:link", "._a:focus", "._a:hover", "._a:active"]
        );
    }

    #[test]
    fn at_rules_sort_last_with_optional_type_rank() {
        let mut comp = Compilation {
            sheet: parse("@supports (a:b){._s{color:red}}._a{color:red}@media x{._m{color:red}}")
                .unwrap(),
            ..Default::default()
        };
        SortRules {
            at_rules: true,
            shorthand: false,
        }
        .run(&mut comp);
        assert_eq!(selectors(&comp), ["._a", "@media x", "@supports (a:b)"]);
    }

    #[test]
    fn shorthands_sort_ahead_of_their_longhands() {
        let mut comp = Compilation {
            sheet: parse("._t{margin-top:0}._m{margin:8px}._c{color:red}").unwrap(),
            ..Default::default()
        };
        SortRules {
            at_rules: false,
            shorthand: true,
        }
        .run(&mut comp);
        assert_eq!(selectors(&comp), ["._m", "._t", "._c"]);
    }

    #[test]
    fn sort_is_stable_within_a_bucket() {
        let mut comp = Compilation {
            sheet: parse("._1{color:red}._2{background-color:blue}").unwrap(),
            ..Default::default()
        };
        SortRules::default().run(&mut comp);
        assert_eq!(selectors(&comp), ["._1", "._2"]);
    }
}
