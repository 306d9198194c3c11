// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cascara_css --heading-base-level=0

//! Cascara CSS: the data model and text layer of the Cascara atomizer.
//!
//! This crate is the shared foundation for both halves of the engine.
//!
//! - Parse an author-written CSS fragment into a [`Stylesheet`] tree with
//!   [`parse`]; malformed input fails whole with a [`ParseError`].
//! - Serialize rules back to minimal-whitespace strings with
//!   [`rule_to_string`].
//! - Look up property knowledge: shorthand expansion
//!   ([`expand_shorthand`]), shorthand ordering depth ([`shorthand_depth`]),
//!   and vendor-prefix requirements ([`property_prefixes`],
//!   [`value_prefixes`]).
//! - Classify selectors into cascade [`Bucket`]s, the fixed precedence order
//!   the compile-time sort and the runtime router both honor.
//!
//! Only the declaration and rule shapes the authoring API can produce are
//! handled; this is not a general-purpose CSS implementation.
//!
//! # Example
//!
//! ```rust
//! use cascara_css::{Bucket, parse, rule_to_string};
//!
//! let sheet = parse(".a:hover { color: blue; }").unwrap();
//! let rule = &sheet.rules[0];
//!
//! assert_eq!(rule_to_string(rule), ".a:hover{color:blue}");
//! assert_eq!(Bucket::for_selector(&rule.selector), Bucket::Hover);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod bucket;
pub mod parse;
pub mod property;
pub mod serialize;
pub mod types;

pub use bucket::Bucket;
pub use parse::{ParseDiagnostic, ParseError, parse};
pub use property::{expand_shorthand, property_prefixes, shorthand_depth, value_prefixes};
pub use serialize::{declaration_to_string, rule_to_string};
pub use types::{Declaration, Rule, Stylesheet};
