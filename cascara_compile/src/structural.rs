// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural passes: nesting resolution, orphaned-selector detection for the
//! conditional path, and global grouping.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use cascara_css::Rule;

use crate::pipeline::{Compilation, Pass, PassTags};

/// Lift nested rules to the top level, resolving selectors against their
/// ancestors.
///
/// Resolution follows standard nesting rules for the shapes the authoring
/// API produces: `&` splices the parent selector, a bare pseudo suffix
/// (`:hover`) concatenates without a combinator, and anything else becomes a
/// descendant selector. At-rule blocks stay wrapping; their children resolve
/// against the selector context in force outside the at-rule.
#[derive(Clone, Copy, Debug, Default)]
pub struct UnwrapNesting;

impl Pass for UnwrapNesting {
    fn name(&self) -> &'static str {
        "unwrap-nesting"
    }

    fn tags(&self) -> PassTags {
        PassTags::STRUCTURE
    }

    fn run(&self, comp: &mut Compilation) {
        let rules = core::mem::take(&mut comp.sheet.rules);
        let mut out = Vec::with_capacity(rules.len());
        for rule in rules {
            lift(rule, "", &mut out);
        }
        comp.sheet.rules = out;
    }
}

fn lift(rule: Rule, parent: &str, out: &mut Vec<Rule>) {
    if rule.is_at_rule() {
        let mut inner = Vec::with_capacity(rule.nested.len());
        if !rule.declarations.is_empty() {
            // Bare declarations inside an at-rule bind to the enclosing
            // selector context (the synthetic root when at top level).
            inner.push(Rule {
                selector: parent.to_string(),
                declarations: rule.declarations,
                nested: Vec::new(),
            });
        }
        for child in rule.nested {
            lift(child, parent, &mut inner);
        }
        out.push(Rule {
            selector: rule.selector,
            declarations: Vec::new(),
            nested: inner,
        });
        return;
    }

    let resolved = resolve_selector(parent, &rule.selector);
    if !rule.declarations.is_empty() {
        out.push(Rule {
            selector: resolved.clone(),
            declarations: rule.declarations,
            nested: Vec::new(),
        });
    }
    for child in rule.nested {
        lift(child, &resolved, out);
    }
}

/// Resolve a nested selector against its parent context.
fn resolve_selector(parent: &str, child: &str) -> String {
    if child.is_empty() {
        return parent.to_string();
    }
    if child.contains('&') {
        if parent.is_empty() {
            // At component scope `&` stands for the not-yet-named atomic
            // class; the splitter substitutes it when naming the rule.
            return child.to_string();
        }
        return child.replace('&', parent);
    }
    if child.starts_with(':') || parent.is_empty() {
        let mut s = String::with_capacity(parent.len() + child.len());
        s.push_str(parent);
        s.push_str(child);
        return s;
    }
    let mut s = String::with_capacity(parent.len() + child.len() + 1);
    s.push_str(parent);
    s.push(' ');
    s.push_str(child);
    s
}

/// Detect a selector block left open by the tail of unconditional CSS.
///
/// Returns the selector text preceding the last unmatched `{` in the tail
/// following the last complete top-level `}`, plus the byte offset where that
/// selector starts (so callers can truncate the input to its balanced
/// prefix). Quoted strings and comments are blanked first, so a brace inside
/// `content: "{"` never registers.
///
/// # Example
///
/// ```
/// use cascara_compile::open_selector_context;
///
/// let (ctx, at) = open_selector_context("color: red; :hover {").unwrap();
/// assert_eq!(ctx, ":hover");
/// assert_eq!(&"color: red; :hover {"[..at], "color: red; ");
/// assert!(open_selector_context(".a { color: red }").is_none());
/// ```
pub fn open_selector_context(css: &str) -> Option<(String, usize)> {
    let blanked = blank_opaque_regions(css);
    let bytes = blanked.as_bytes();

    // Tail after the last `}` that closes back to depth zero.
    let mut depth = 0_usize;
    let mut tail_start = 0_usize;
    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    tail_start = i + 1;
                }
            }
            _ => {}
        }
    }

    // Last unmatched `{` within the tail.
    let mut opens: Vec<usize> = Vec::new();
    for (i, &b) in bytes[tail_start..].iter().enumerate() {
        match b {
            b'{' => opens.push(tail_start + i),
            b'}' => {
                opens.pop();
            }
            _ => {}
        }
    }
    let open = *opens.last()?;

    // Selector text runs from the previous structural delimiter to the `{`.
    let seg_start = bytes[tail_start..open]
        .iter()
        .rposition(|b| matches!(b, b';' | b'{' | b'}'))
        .map_or(tail_start, |p| tail_start + p + 1);
    let raw = &css[seg_start..open];
    let selector = raw.trim();
    if selector.is_empty() {
        return None;
    }
    let offset = seg_start + (raw.len() - raw.trim_start().len());
    Some((selector.to_string(), offset))
}

/// Replace string and comment contents with spaces, preserving length.
fn blank_opaque_regions(css: &str) -> String {
    let bytes = css.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            q @ (b'"' | b'\'') => {
                i += 1;
                while i < bytes.len() && bytes[i] != q {
                    i += if bytes[i] == b'\\' { 2 } else { 1 };
                }
                if i < bytes.len() {
                    i += 1;
                }
                out.resize(i.min(bytes.len()), b' ');
                i = i.min(bytes.len());
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = find_comment_end(bytes, i);
                out.resize(end, b' ');
                i = end;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out.resize(bytes.len(), b' ');
    String::from_utf8_lossy(&out).into_owned()
}

fn find_comment_end(bytes: &[u8], start: usize) -> usize {
    let mut i = start + 2;
    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Group page-global CSS under one synthetic wrapper class.
///
/// Bare declarations wrap in a `.{wrapper}` rule; every other selector is
/// prefixed with `.{wrapper} `; at-rule children are rewritten in place.
/// Relative order is untouched — global CSS is never reordered, because order
/// is part of author intent there.
#[derive(Clone, Debug)]
pub struct GroupGlobal {
    /// The wrapper class token (without the leading `.`).
    pub wrapper: String,
}

impl Pass for GroupGlobal {
    fn name(&self) -> &'static str {
        "group-global"
    }

    fn tags(&self) -> PassTags {
        PassTags::STRUCTURE
    }

    fn run(&self, comp: &mut Compilation) {
        group_rules(&mut comp.sheet.rules, &self.wrapper);
        comp.class_names.push(self.wrapper.clone());
    }
}

fn group_rules(rules: &mut [Rule], wrapper: &str) {
    for rule in rules {
        if rule.is_at_rule() {
            group_rules(&mut rule.nested, wrapper);
        } else if rule.is_root() {
            let mut s = String::with_capacity(wrapper.len() + 1);
            s.push('.');
            s.push_str(wrapper);
            rule.selector = s;
        } else {
            let mut s = String::with_capacity(wrapper.len() + rule.selector.len() + 2);
            s.push('.');
            s.push_str(wrapper);
            s.push(' ');
            s.push_str(&rule.selector);
            rule.selector = s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cascara_css::parse;

    fn unwrap(css: &str) -> Vec<(String, usize)> {
        let mut comp = Compilation {
            sheet: parse(css).unwrap(),
            ..Default::default()
        };
        UnwrapNesting.run(&mut comp);
        comp.sheet
            .rules
            .iter()
            .map(|r| (r.selector.clone(), r.declarations.len()))
            .collect()
    }

    #[test]
    fn nested_selectors_become_descendants() {
        let out = unwrap(".a { color: red; .b { color: blue } }");
        assert_eq!(out[0].0, ".a");
        assert_eq!(out[1].0, ".a .b");
    }

    #[test]
    fn pseudo_suffix_concatenates() {
        let out = unwrap(".a { :hover { color: blue } }");
        assert_eq!(out[0].0, ".a:hover");
    }

    #[test]
    fn ampersand_splices_parent() {
        let out = unwrap(".a { &.on { color: blue } }");
        assert_eq!(out[0].0, ".a.on");
    }

    #[test]
    fn root_scoped_pseudo_keeps_empty_context() {
        let out = unwrap(":hover { color: blue }");
        assert_eq!(out[0].0, ":hover");
    }

    #[test]
    fn at_rules_stay_wrapping() {
        let mut comp = Compilation {
            sheet: parse(".a { @media (min-width: 400px) { color: red } }").unwrap(),
            ..Default::default()
        };
        UnwrapNesting.run(&mut comp);
        let media = &comp.sheet.rules[0];
        assert_eq!(media.selector, "@media (min-width: 400px)");
        assert_eq!(media.nested[0].selector, ".a");
        assert_eq!(media.nested[0].declarations[0].property, "color");
    }

    #[test]
    fn open_context_detection() {
        let (ctx, at) = open_selector_context("color: red; :hover {").unwrap();
        assert_eq!(ctx, ":hover");
        assert_eq!(at, 12);

        // A completed block ahead of the orphan does not confuse the tail scan.
        let (ctx, _) = open_selector_context(".x { color: red } :focus-within {").unwrap();
        assert_eq!(ctx, ":focus-within");

        assert!(open_selector_context("color: red;").is_none());
        assert!(open_selector_context(".a { color: red }").is_none());
    }

    #[test]
    fn open_context_ignores_braces_in_strings_and_comments() {
        let css = r#"content: "{"; /* { */ :active {"#;
        let (ctx, _) = open_selector_context(css).unwrap();
        assert_eq!(ctx, ":active");

        assert!(open_selector_context(r#"content: "{";"#).is_none());
    }

    #[test]
    fn global_grouping_wraps_and_prefixes_in_order() {
        let mut comp = Compilation {
            sheet: parse("color:red;.x{color:blue}").unwrap(),
            ..Default::default()
        };
        UnwrapNesting.run(&mut comp);
        GroupGlobal {
            wrapper: "_g0h1i2j3".into(),
        }
        .run(&mut comp);

        let sels: Vec<_> = comp
            .sheet
            .rules
            .iter()
            .map(|r| r.selector.clone())
            .collect();
        assert_eq!(sels, ["._g0h1i2j3", "._g0h1i2j3 .x"]);
        assert_eq!(comp.class_names, ["_g0h1i2j3"]);
    }

    #[test]
    fn global_grouping_reaches_into_at_rules() {
        let mut comp = Compilation {
            sheet: parse("@media x { .y { color: red } }").unwrap(),
            ..Default::default()
        };
        UnwrapNesting.run(&mut comp);
        GroupGlobal {
            wrapper: "_w".into(),
        }
        .run(&mut comp);
        assert_eq!(comp.sheet.rules[0].nested[0].selector, "._w .y");
    }
}
