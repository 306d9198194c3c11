// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property knowledge tables: shorthand expansion, shorthand ordering depth,
//! and vendor-prefix requirements.
//!
//! Only the property shapes the authoring API produces are covered; unknown
//! properties pass through every table untouched.

use alloc::string::String;
use alloc::vec::Vec;

use crate::types::Declaration;

/// Shorthand roots recognized by [`shorthand_depth`]. Sorted for readability,
/// not searched by order.
const SHORTHAND_ROOTS: &[&str] = &[
    "animation",
    "background",
    "border",
    "border-radius",
    "columns",
    "flex",
    "font",
    "gap",
    "grid",
    "inset",
    "list-style",
    "margin",
    "outline",
    "overflow",
    "padding",
    "place-content",
    "place-items",
    "text-decoration",
    "transition",
];

/// Expand a shorthand declaration into its longhand equivalents.
///
/// Returns `None` when the property is not an expandable shorthand (or the
/// value has a shape the expansion tables do not cover), in which case the
/// declaration is kept as-is. `!important` propagates to every longhand.
///
/// # Example
///
/// ```
/// use cascara_css::{Declaration, expand_shorthand};
///
/// let out = expand_shorthand(&Declaration::new("margin", "0 auto")).unwrap();
/// assert_eq!(out.len(), 4);
/// assert_eq!(out[0].property, "margin-top");
/// assert_eq!(out[1].value, "auto");
/// ```
pub fn expand_shorthand(decl: &Declaration) -> Option<Vec<Declaration>> {
    if is_css_wide_keyword(&decl.value) {
        return None;
    }
    let parts = split_components(&decl.value);
    let expanded: Vec<(String, String)> = match decl.property.as_str() {
        "margin" | "padding" => {
            let sides = box_sides(&parts)?;
            ["top", "right", "bottom", "left"]
                .iter()
                .zip(sides)
                .map(|(side, value)| {
                    let mut p = decl.property.clone();
                    p.push('-');
                    p.push_str(side);
                    (p, value)
                })
                .collect()
        }
        "inset" => {
            let sides = box_sides(&parts)?;
            ["top", "right", "bottom", "left"]
                .iter()
                .zip(sides)
                .map(|(side, value)| (String::from(*side), value))
                .collect()
        }
        "overflow" => two_axis("overflow-x", "overflow-y", &parts)?,
        "gap" => two_axis("row-gap", "column-gap", &parts)?,
        "flex" => flex_longhands(&parts)?,
        _ => return None,
    };

    Some(
        expanded
            .into_iter()
            .map(|(property, value)| Declaration {
                property,
                value,
                important: decl.important,
            })
            .collect(),
    )
}

/// Ordering depth for the shorthand-before-longhand sort.
///
/// A shorthand root sorts at depth 0, its longhands at 1, two-level longhands
/// (`border-top-color`) at 2. Properties unrelated to any shorthand sit at 1
/// so the sort is a no-op among them.
pub fn shorthand_depth(property: &str) -> u8 {
    if SHORTHAND_ROOTS.contains(&property) {
        return 0;
    }
    for root in SHORTHAND_ROOTS {
        if let Some(rest) = property.strip_prefix(root) {
            if let Some(rest) = rest.strip_prefix('-') {
                // `border-top-color` refines `border-top` refines `border`.
                return if rest.contains('-') { 2 } else { 1 };
            }
        }
    }
    1
}

/// Vendor prefixes required for a property by the fixed browser-target table.
pub fn property_prefixes(property: &str) -> &'static [&'static str] {
    match property {
        "user-select" => &["-webkit-", "-ms-"],
        "appearance" => &["-webkit-", "-moz-"],
        "backdrop-filter" => &["-webkit-"],
        "text-size-adjust" => &["-webkit-", "-moz-", "-ms-"],
        "tab-size" => &["-moz-"],
        "mask-image" => &["-webkit-"],
        "box-decoration-break" => &["-webkit-"],
        _ => &[],
    }
}

/// Vendor prefixes required for a value in the context of its property.
pub fn value_prefixes(property: &str, value: &str) -> &'static [&'static str] {
    const SIZING: &[&str] = &[
        "width",
        "height",
        "min-width",
        "min-height",
        "max-width",
        "max-height",
        "inline-size",
        "block-size",
    ];
    if property == "position" && value == "sticky" {
        return &["-webkit-"];
    }
    if SIZING.contains(&property)
        && matches!(value, "fit-content" | "max-content" | "min-content")
    {
        return &["-webkit-", "-moz-"];
    }
    &[]
}

fn is_css_wide_keyword(value: &str) -> bool {
    matches!(value, "inherit" | "initial" | "unset" | "revert")
}

/// Top/right/bottom/left values from a 1-4 component box shorthand.
fn box_sides(parts: &[&str]) -> Option<[String; 4]> {
    let get = |i: usize| String::from(parts[i]);
    match parts.len() {
        1 => Some([get(0), get(0), get(0), get(0)]),
        2 => Some([get(0), get(1), get(0), get(1)]),
        3 => Some([get(0), get(1), get(2), get(1)]),
        4 => Some([get(0), get(1), get(2), get(3)]),
        _ => None,
    }
}

fn two_axis(x: &str, y: &str, parts: &[&str]) -> Option<Vec<(String, String)>> {
    match parts.len() {
        1 => Some(alloc::vec![
            (String::from(x), String::from(parts[0])),
            (String::from(y), String::from(parts[0])),
        ]),
        2 => Some(alloc::vec![
            (String::from(x), String::from(parts[0])),
            (String::from(y), String::from(parts[1])),
        ]),
        _ => None,
    }
}

/// `flex` per the CSS flexbox shorthand resolution.
fn flex_longhands(parts: &[&str]) -> Option<Vec<(String, String)>> {
    let make = |grow: &str, shrink: &str, basis: &str| {
        Some(alloc::vec![
            (String::from("flex-grow"), String::from(grow)),
            (String::from("flex-shrink"), String::from(shrink)),
            (String::from("flex-basis"), String::from(basis)),
        ])
    };
    match parts {
        ["none"] => make("0", "0", "auto"),
        ["auto"] => make("1", "1", "auto"),
        [a] if is_number(a) => make(a, "1", "0%"),
        [a] => make("1", "1", a),
        [a, b] if is_number(a) && is_number(b) => make(a, b, "0%"),
        [a, b] if is_number(a) => make(a, "1", b),
        [a, b, c] if is_number(a) && is_number(b) => make(a, b, c),
        _ => None,
    }
}

fn is_number(s: &str) -> bool {
    s.parse::<f64>().is_ok()
}

/// Split a value into whitespace-separated components, treating parenthesized
/// groups (`calc(100% - 8px)`) and quoted strings as single components.
fn split_components(value: &str) -> Vec<&str> {
    let bytes = value.as_bytes();
    let mut out = Vec::new();
    let mut start = None;
    let mut parens = 0_usize;
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
        } else {
            match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => parens += 1,
                b')' => parens = parens.saturating_sub(1),
                _ if b.is_ascii_whitespace() && parens == 0 => {
                    if let Some(s) = start.take() {
                        out.push(&value[s..i]);
                    }
                    i += 1;
                    continue;
                }
                _ => {}
            }
        }
        if start.is_none() {
            start = Some(i);
        }
        i += 1;
    }
    if let Some(s) = start {
        out.push(&value[s..]);
    }
    out
}
