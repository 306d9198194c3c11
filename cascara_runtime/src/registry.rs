// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The bucket-ordering style registry.
//!
//! ## Overview
//!
//! [`StyleRegistry::apply_sheet`] classifies an arriving sheet into a cascade
//! [`Bucket`] and inserts its rule text into that bucket's anchor, creating
//! the anchor lazily in precedence position. The end state is the same
//! whatever order sheets arrive in: every bucket's anchor sits before the
//! anchors of all higher-precedence buckets that exist.
//!
//! ## Lifecycle and threading
//!
//! A registry is an explicit instance, constructed once by the host
//! integration layer and handed by reference to every `apply_sheet` call.
//! It is append-only for its lifetime and performs no locking: calls must be
//! serialized by the host's single rendering context.
//!
//! ## No error path
//!
//! `apply_sheet` never fails. A sheet the classifier cannot place degrades to
//! the catch-all bucket; a missing style would be worse than a mis-ordered
//! one.

use alloc::collections::BTreeSet;
use alloc::string::String;

use cascara_css::{Bucket, parse};
use log::debug;

use crate::types::{InsertMode, StyleHost};

/// Classify a serialized sheet into its cascade bucket.
///
/// A sheet opening an at-rule is [`Bucket::AtRule`]; otherwise the sheet is
/// parsed and its first selector classified structurally, so classification
/// never depends on the class-name token length. Unparseable input degrades
/// to [`Bucket::CatchAll`].
///
/// # Example
///
/// ```
/// use cascara_css::Bucket;
/// use cascara_runtime::classify_sheet;
///
/// assert_eq!(classify_sheet("._a1b2c3d4:hover{color:red}"), Bucket::Hover);
/// assert_eq!(classify_sheet("._a1b2c3d4{color:red}"), Bucket::CatchAll);
/// assert_eq!(classify_sheet("@media x{._a{color:red}}"), Bucket::AtRule);
/// ```
pub fn classify_sheet(sheet: &str) -> Bucket {
    let trimmed = sheet.trim_start();
    if trimmed.starts_with('@') {
        return Bucket::AtRule;
    }
    match parse(trimmed) {
        Ok(parsed) => parsed
            .rules
            .first()
            .map_or(Bucket::CatchAll, |r| Bucket::for_selector(&r.selector)),
        Err(_) => Bucket::CatchAll,
    }
}

/// Bucket-ordered insertion of independently shipped sheets.
pub struct StyleRegistry<H: StyleHost> {
    host: H,
    mode: InsertMode,
    anchors: [Option<H::Anchor>; Bucket::ALL.len()],
    applied: BTreeSet<String>,
}

impl<H: StyleHost> core::fmt::Debug for StyleRegistry<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StyleRegistry")
            .field("mode", &self.mode)
            .field("applied", &self.applied.len())
            .finish_non_exhaustive()
    }
}

impl<H: StyleHost> StyleRegistry<H> {
    /// Create a registry inserting through the fast rule-list API.
    pub fn new(host: H) -> Self {
        Self::with_mode(host, InsertMode::Speedy)
    }

    /// Create a registry with an explicit insertion mode.
    pub fn with_mode(host: H, mode: InsertMode) -> Self {
        Self {
            host,
            mode,
            anchors: [None; Bucket::ALL.len()],
            applied: BTreeSet::new(),
        }
    }

    /// The underlying host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Consume the registry, returning the host.
    pub fn into_host(self) -> H {
        self.host
    }

    /// Insert a sheet into the live style context.
    ///
    /// Insertion is idempotent per sheet string: re-applying an
    /// already-applied sheet is a no-op. Never fails.
    pub fn apply_sheet(&mut self, sheet: &str) {
        if self.applied.contains(sheet) {
            return;
        }
        self.applied.insert(String::from(sheet));

        let bucket = classify_sheet(sheet);
        let anchor = self.bucket_anchor(bucket);
        debug!("inserting sheet into {bucket:?}: {sheet}");
        match self.mode {
            InsertMode::Speedy => self.host.insert_rule(anchor, sheet),
            InsertMode::Debug => self.host.append_text(anchor, sheet),
        }
    }

    /// The anchor for a bucket, created lazily in precedence position:
    /// immediately before the nearest higher-precedence bucket that already
    /// exists, else at the end of the document order.
    fn bucket_anchor(&mut self, bucket: Bucket) -> H::Anchor {
        let index = bucket as usize;
        if let Some(anchor) = self.anchors[index] {
            return anchor;
        }
        let before = self.anchors[index + 1..].iter().find_map(|a| *a);
        let anchor = self.host.create_anchor(before);
        debug!("created {bucket:?} anchor (before higher bucket: {})", before.is_some());
        self.anchors[index] = Some(anchor);
        anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MemoryHost;
    use alloc::vec::Vec;

    fn registry() -> StyleRegistry<MemoryHost> {
        StyleRegistry::new(MemoryHost::new())
    }

    #[test]
    fn catch_all_anchor_precedes_hover_whatever_the_call_order() {
        // Hover first, then catch-all: the catch-all anchor must still land
        // ahead of the hover anchor in document order.
        let mut reg = registry();
        reg.apply_sheet("._aaa111:hover{color:red}");
        reg.apply_sheet("._bbb222{color:blue}");

        let host = reg.into_host();
        let order = host.order();
        assert_eq!(order.len(), 2);
        assert_eq!(host.rules(order[0]), ["._bbb222{color:blue}"]);
        assert_eq!(host.rules(order[1]), ["._aaa111:hover{color:red}"]);
    }

    #[test]
    fn anchor_order_matches_precedence_for_any_arrival_order() {
        let sheets = [
            ("@media x{._m{color:red}}", Bucket::AtRule),
            ("._a:active{color:red}", Bucket::Active),
            ("._h:hover{color:red}", Bucket::Hover),
            ("._f:focus{color:red}", Bucket::Focus),
            ("._v:visited{color:red}", Bucket::Visited),
            ("._l:link{color:red}", Bucket::Link),
            ("._c{color:red}", Bucket::CatchAll),
        ];

        // A few deliberately different arrival orders, including repeats.
        let arrival_orders: [&[usize]; 3] = [
            &[0, 1, 2, 3, 4, 5, 6],
            &[6, 5, 4, 3, 2, 1, 0],
            &[3, 0, 6, 2, 2, 5, 1, 4, 0],
        ];

        for arrivals in arrival_orders {
            let mut reg = registry();
            for &i in arrivals {
                reg.apply_sheet(sheets[i].0);
            }
            let host = reg.into_host();
            let order = host.order();
            let buckets: Vec<Bucket> = order
                .iter()
                .map(|&a| classify_sheet(&host.rules(a)[0]))
                .collect();
            let mut sorted = buckets.clone();
            sorted.sort();
            assert_eq!(buckets, sorted, "anchors must follow bucket precedence");
        }
    }

    #[test]
    fn reapplying_a_sheet_is_a_no_op() {
        let mut reg = registry();
        reg.apply_sheet("._x{color:red}");
        reg.apply_sheet("._x{color:red}");
        reg.apply_sheet("._x{color:red}");

        let host = reg.into_host();
        let order = host.order();
        assert_eq!(order.len(), 1);
        assert_eq!(host.rules(order[0]).len(), 1);
    }

    #[test]
    fn same_bucket_sheets_share_an_anchor_in_arrival_order() {
        let mut reg = registry();
        reg.apply_sheet("._1{color:red}");
        reg.apply_sheet("._2{color:blue}");

        let host = reg.into_host();
        let order = host.order();
        assert_eq!(order.len(), 1);
        assert_eq!(
            host.rules(order[0]),
            ["._1{color:red}", "._2{color:blue}"]
        );
    }

    #[test]
    fn debug_mode_appends_text_with_identical_ordering() {
        let mut speedy = registry();
        let mut debug = StyleRegistry::with_mode(MemoryHost::new(), InsertMode::Debug);
        for sheet in ["._a:hover{color:red}", "._b{color:blue}"] {
            speedy.apply_sheet(sheet);
            debug.apply_sheet(sheet);
        }
        assert_eq!(
            speedy.into_host().all_rules(),
            debug.into_host().all_rules()
        );
    }

    #[test]
    fn focus_variants_route_to_distinct_buckets() {
        assert_eq!(classify_sheet("._x:focus{a:b}"), Bucket::Focus);
        assert_eq!(classify_sheet("._x:focus-within{a:b}"), Bucket::FocusWithin);
        assert_eq!(classify_sheet("._x:focus-visible{a:b}"), Bucket::FocusVisible);
    }

    #[test]
    fn unclassifiable_input_degrades_to_catch_all() {
        let mut reg = registry();
        reg.apply_sheet("not even css {{{");
        reg.apply_sheet("._x{color:red}");

        let host = reg.into_host();
        // Both landed in the single catch-all anchor rather than erroring.
        assert_eq!(host.order().len(), 1);
        assert_eq!(host.rules(host.order()[0]).len(), 2);
    }

    #[test]
    fn applied_sheets_count_is_tracked_for_debug() {
        let mut reg = registry();
        reg.apply_sheet("._x{color:red}");
        let repr = alloc::format!("{reg:?}");
        assert!(repr.contains("applied: 1"), "{repr}");
    }

    #[test]
    fn leading_whitespace_does_not_confuse_at_rule_detection() {
        assert_eq!(
            classify_sheet("  @supports (a:b){._x{color:red}}"),
            Bucket::AtRule
        );
    }

    #[test]
    fn registry_instances_are_isolated() {
        let mut a = registry();
        let mut b = registry();
        a.apply_sheet("._x{color:red}");
        b.apply_sheet("._y:hover{color:blue}");
        assert_eq!(a.into_host().order().len(), 1);
        assert_eq!(b.into_host().order().len(), 1);
    }
}
