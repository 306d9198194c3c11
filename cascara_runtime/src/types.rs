// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host abstraction for the live style context, plus an in-memory
//! implementation for tests and headless use.
//!
//! ## Overview
//!
//! The registry does not talk to a document directly; it drives a
//! [`StyleHost`], which owns the ordered sequence of insertion anchors (style
//! elements, in a browser-like host) and the two insertion flavors. Hosts are
//! infallible by contract: a missing style is a worse user-visible outcome
//! than a mis-ordered one, so nothing here returns a `Result`.

use alloc::string::String;
use alloc::vec::Vec;

/// How rule text is written into an anchor.
///
/// Both modes must produce equivalent cascade behavior; they differ only in
/// inspectability.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum InsertMode {
    /// Append through the host's parsed rule-list API. Fast, but invisible
    /// to developer-facing source views in some hosts.
    #[default]
    Speedy,
    /// Append raw text so inserted rules stay visible to inspection tools.
    Debug,
}

/// The live style context the registry inserts into.
///
/// Implementations own an ordered sequence of anchors. Anchor identity must
/// be stable for the host's lifetime; the registry caches anchors and never
/// removes one.
pub trait StyleHost {
    /// Stable identifier of one insertion point.
    type Anchor: Copy + Eq + core::fmt::Debug;

    /// Create a new anchor placed immediately before `before`, or at the end
    /// of the document order when `before` is `None`.
    fn create_anchor(&mut self, before: Option<Self::Anchor>) -> Self::Anchor;

    /// Append one rule through the parsed rule-list API.
    fn insert_rule(&mut self, anchor: Self::Anchor, rule: &str);

    /// Append one rule as raw text.
    fn append_text(&mut self, anchor: Self::Anchor, rule: &str);
}

/// An in-memory [`StyleHost`].
///
/// Keeps anchors in document order with both the parsed rule list and the
/// raw text each anchor accumulated, so tests can assert on either insertion
/// flavor.
#[derive(Clone, Debug, Default)]
pub struct MemoryHost {
    next_id: u32,
    anchors: Vec<MemoryAnchor>,
}

#[derive(Clone, Debug)]
struct MemoryAnchor {
    id: u32,
    rules: Vec<String>,
    text: String,
}

impl MemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor identifiers in document order.
    pub fn order(&self) -> Vec<u32> {
        self.anchors.iter().map(|a| a.id).collect()
    }

    /// Rules inserted into an anchor via the rule-list API.
    pub fn rules(&self, anchor: u32) -> &[String] {
        self.find(anchor).map_or(&[], |a| &a.rules)
    }

    /// Raw text accumulated by an anchor.
    pub fn text(&self, anchor: u32) -> &str {
        self.find(anchor).map_or("", |a| &a.text)
    }

    /// All rules in document order, whichever flavor inserted them.
    pub fn all_rules(&self) -> Vec<String> {
        self.anchors
            .iter()
            .flat_map(|a| {
                a.rules
                    .iter()
                    .cloned()
                    .chain((!a.text.is_empty()).then(|| a.text.clone()))
            })
            .collect()
    }

    fn find(&self, anchor: u32) -> Option<&MemoryAnchor> {
        self.anchors.iter().find(|a| a.id == anchor)
    }
}

impl StyleHost for MemoryHost {
    type Anchor = u32;

    fn create_anchor(&mut self, before: Option<u32>) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        let anchor = MemoryAnchor {
            id,
            rules: Vec::new(),
            text: String::new(),
        };
        let at = before
            .and_then(|b| self.anchors.iter().position(|a| a.id == b))
            .unwrap_or(self.anchors.len());
        self.anchors.insert(at, anchor);
        id
    }

    fn insert_rule(&mut self, anchor: u32, rule: &str) {
        if let Some(a) = self.anchors.iter_mut().find(|a| a.id == anchor) {
            a.rules.push(String::from(rule));
        }
    }

    fn append_text(&mut self, anchor: u32, rule: &str) {
        if let Some(a) = self.anchors.iter_mut().find(|a| a.id == anchor) {
            a.text.push_str(rule);
        }
    }
}
