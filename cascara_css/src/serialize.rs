// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal-whitespace serialization of the structural tree.
//!
//! Output carries no insignificant whitespace: `._a{color:red}` rather than
//! the author's formatting. Each serialized rule round-trips through
//! [`parse`](crate::parse::parse), which the sheet extractor relies on to
//! guarantee independently parseable sheets.

use alloc::string::String;

use crate::types::{Declaration, Rule};

/// Serialize one rule (and its nested rules) to compact form.
pub fn rule_to_string(rule: &Rule) -> String {
    let mut out = String::new();
    write_rule(rule, &mut out);
    out
}

/// Serialize a declaration as `property:value` with an `!important` suffix
/// when set.
pub fn declaration_to_string(decl: &Declaration) -> String {
    let mut out = String::new();
    write_declaration(decl, &mut out);
    out
}

fn write_rule(rule: &Rule, out: &mut String) {
    if rule.is_root() {
        // Root-scoped declarations serialize bare; callers wrap them first.
        write_declarations(rule, out);
        return;
    }
    out.push_str(&rule.selector);
    out.push('{');
    write_declarations(rule, out);
    let mut first = rule.declarations.is_empty();
    for nested in &rule.nested {
        if !first {
            // A declaration block followed by nested rules needs the
            // separator the compact form otherwise omits.
            out.push(';');
        }
        first = false;
        write_rule(nested, out);
    }
    out.push('}');
}

fn write_declarations(rule: &Rule, out: &mut String) {
    for (i, decl) in rule.declarations.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        write_declaration(decl, out);
    }
}

fn write_declaration(decl: &Declaration, out: &mut String) {
    out.push_str(&decl.property);
    out.push(':');
    out.push_str(&decl.value);
    if decl.important {
        out.push_str("!important");
    }
}
