// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cascade buckets: the fixed precedence order that keeps independently
//! inserted rules cascade-correct.
//!
//! ## Overview
//!
//! The order encodes the CSS LVFHA rule (link, visited, focus, hover,
//! active) plus a catch-all bucket first and at-rules last. It is shared by
//! the compile-time final sort and the runtime router so both stages agree on
//! precedence, whatever order sheets physically arrive in.
//!
//! Classification works over selector structure, not raw byte offsets: the
//! selector is scanned for pseudo-class idents, so the class-name token
//! format and the classifier stay decoupled.

/// A cascade precedence bucket.
///
/// Variant order is load-bearing: `Ord` on this enum *is* the precedence
/// (earlier buckets must end up earlier in the live style context).
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Bucket {
    /// Rules with no recognized pseudo-class, and anything unclassifiable.
    CatchAll,
    /// `:link`
    Link,
    /// `:visited`
    Visited,
    /// `:focus-within`
    FocusWithin,
    /// `:focus`
    Focus,
    /// `:focus-visible`
    FocusVisible,
    /// `:hover`
    Hover,
    /// `:active`
    Active,
    /// `@media`, `@supports`, and every other at-rule.
    AtRule,
}

impl Bucket {
    /// All buckets in precedence order.
    pub const ALL: [Self; 9] = [
        Self::CatchAll,
        Self::Link,
        Self::Visited,
        Self::FocusWithin,
        Self::Focus,
        Self::FocusVisible,
        Self::Hover,
        Self::Active,
        Self::AtRule,
    ];

    /// Map a pseudo-class ident (without the leading `:`) to its bucket.
    pub fn from_pseudo(name: &str) -> Option<Self> {
        match name {
            "link" => Some(Self::Link),
            "visited" => Some(Self::Visited),
            "focus-within" => Some(Self::FocusWithin),
            "focus" => Some(Self::Focus),
            "focus-visible" => Some(Self::FocusVisible),
            "hover" => Some(Self::Hover),
            "active" => Some(Self::Active),
            _ => None,
        }
    }

    /// Classify a selector (or at-rule prelude).
    ///
    /// An at-rule prelude maps to [`Bucket::AtRule`]. Otherwise the selector
    /// is scanned for pseudo-class idents; the last recognized one wins, so
    /// `.a:hover` and `.a .b:focus` classify by their trailing pseudo.
    /// Pseudo-elements (`::before`) and unrecognized pseudo-classes
    /// (`:not(...)`, `:nth-child(2)`) fall through to [`Bucket::CatchAll`].
    ///
    /// # Example
    ///
    /// ```
    /// use cascara_css::Bucket;
    ///
    /// assert_eq!(Bucket::for_selector("._a1b2c3d4:hover"), Bucket::Hover);
    /// assert_eq!(Bucket::for_selector("._a1b2c3d4"), Bucket::CatchAll);
    /// assert_eq!(Bucket::for_selector("@media screen"), Bucket::AtRule);
    /// ```
    pub fn for_selector(selector: &str) -> Self {
        if selector.starts_with('@') {
            return Self::AtRule;
        }
        let bytes = selector.as_bytes();
        let mut bucket = Self::CatchAll;
        let mut quote: Option<u8> = None;
        let mut i = 0;
        while i < bytes.len() {
            let b = bytes[i];
            if let Some(q) = quote {
                if b == q {
                    quote = None;
                }
                i += 1;
                continue;
            }
            match b {
                b'"' | b'\'' => {
                    quote = Some(b);
                    i += 1;
                }
                b':' => {
                    if bytes.get(i + 1) == Some(&b':') {
                        // Pseudo-element; skip both colons and the ident.
                        i += 2;
                        i += ident_len(&bytes[i..]);
                    } else {
                        i += 1;
                        let len = ident_len(&bytes[i..]);
                        if let Some(found) =
                            core::str::from_utf8(&bytes[i..i + len])
                                .ok()
                                .and_then(Self::from_pseudo)
                        {
                            bucket = found;
                        }
                        i += len;
                    }
                }
                _ => i += 1,
            }
        }
        bucket
    }
}

/// Length of a pseudo ident: ASCII letters and hyphens.
fn ident_len(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .take_while(|b| b.is_ascii_alphabetic() || **b == b'-')
        .count()
}
