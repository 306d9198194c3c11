// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sheet extraction: serialize the finished tree into independent rule
//! strings.
//!
//! Each top-level rule becomes one sheet; each child of an at-rule becomes
//! its own sheet re-wrapped in the full prelude chain, so every sheet is
//! independently parseable and insertable (and removable) without touching
//! the others. The order established by the cascade sort is preserved.

use alloc::string::String;
use alloc::vec::Vec;

use cascara_css::{Rule, Stylesheet, rule_to_string};

/// Serialize every rule into its own insertable sheet string.
pub fn extract_sheets(sheet: &Stylesheet) -> Vec<String> {
    let mut out = Vec::with_capacity(sheet.rules.len());
    for rule in &sheet.rules {
        emit(rule, &mut Vec::new(), &mut out);
    }
    out
}

fn emit<'a>(rule: &'a Rule, preludes: &mut Vec<&'a str>, out: &mut Vec<String>) {
    if rule.is_at_rule() && rule.declarations.is_empty() {
        preludes.push(&rule.selector);
        for child in &rule.nested {
            emit(child, preludes, out);
        }
        preludes.pop();
        return;
    }

    let mut text = rule_to_string(rule);
    for prelude in preludes.iter().rev() {
        let mut wrapped = String::with_capacity(prelude.len() + text.len() + 2);
        wrapped.push_str(prelude);
        wrapped.push('{');
        wrapped.push_str(&text);
        wrapped.push('}');
        text = wrapped;
    }
    out.push(text);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascara_css::parse;

    #[test]
    fn one_sheet_per_top_level_rule() {
        let sheet = parse("._a{color:red}._b:hover{color:blue}").unwrap();
        let sheets = extract_sheets(&sheet);
        assert_eq!(sheets, ["._a{color:red}", "._b:hover{color:blue}"]);
    }

    #[test]
    fn at_rule_children_split_into_wrapped_sheets() {
        let sheet = parse("@media x{._a{color:red}._b{color:blue}}").unwrap();
        let sheets = extract_sheets(&sheet);
        assert_eq!(
            sheets,
            ["@media x{._a{color:red}}", "@media x{._b{color:blue}}"]
        );
    }

    #[test]
    fn nested_at_rules_keep_the_full_prelude_chain() {
        let sheet = parse("@media x{@supports (a:b){._a{color:red}}}").unwrap();
        let sheets = extract_sheets(&sheet);
        assert_eq!(sheets, ["@media x{@supports (a:b){._a{color:red}}}"]);
    }

    #[test]
    fn every_sheet_reparses_independently() {
        let sheet = parse("@media x{._a{color:red}._b{color:blue}}._c{color:green}").unwrap();
        for text in extract_sheets(&sheet) {
            assert!(parse(&text).is_ok(), "sheet must be self-contained");
        }
    }
}
