// Copyright 2026 the Cascara Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=cascara_runtime --heading-base-level=0

//! Cascara Runtime: cascade-correct insertion of independently shipped
//! sheets.
//!
//! ## Overview
//!
//! Code-splitting, lazy loading, and re-renders deliver compiled sheets in
//! arbitrary order. This crate's [`StyleRegistry`] re-establishes cascade
//! order at insertion time: every sheet is classified into one of a fixed set
//! of precedence buckets ([`cascara_css::Bucket`], the LVFHA order plus a
//! catch-all first and at-rules last), and each bucket owns one insertion
//! anchor kept in precedence position however late it is created.
//!
//! ## Inputs
//!
//! Sheets are the serialized rule strings produced by `cascara_compile`.
//! Classification is structural — the sheet's first selector is parsed and
//! scanned for its pseudo-classes — so nothing here depends on the length or
//! shape of generated class-name tokens. Anything unclassifiable lands in the
//! catch-all bucket; [`StyleRegistry::apply_sheet`] has no error path.
//!
//! ## Hosts
//!
//! The live style context is abstracted behind [`StyleHost`]: an ordered
//! sequence of anchors supporting insert-before plus two insertion flavors
//! ([`InsertMode::Speedy`] for the parsed rule-list API,
//! [`InsertMode::Debug`] for inspectable raw text). [`MemoryHost`] is an
//! in-memory implementation for tests, benches, and headless rendering.
//!
//! ## Example
//!
//! ```
//! use cascara_runtime::{MemoryHost, StyleRegistry};
//!
//! let mut registry = StyleRegistry::new(MemoryHost::new());
//!
//! // Hover sheet arrives first; base sheet second.
//! registry.apply_sheet("._aaa111:hover{color:red}");
//! registry.apply_sheet("._bbb222{color:blue}");
//! registry.apply_sheet("._bbb222{color:blue}"); // idempotent
//!
//! // The catch-all anchor still precedes the hover anchor.
//! let host = registry.into_host();
//! let order = host.order();
//! assert_eq!(host.rules(order[0]), ["._bbb222{color:blue}"]);
//! assert_eq!(host.rules(order[1]), ["._aaa111:hover{color:red}"]);
//! ```
//!
//! ## Threading
//!
//! A registry is an explicit instance with no interior locking; calls must be
//! serialized by the host's single rendering context. Multiple isolated
//! registries may coexist in one process (for tests or multiple documents).
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod registry;
pub mod types;

pub use registry::{StyleRegistry, classify_sheet};
pub use types::{InsertMode, MemoryHost, StyleHost};
