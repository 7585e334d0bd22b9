// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range bookkeeping for styled text runs.
//!
//! A text run in a rich-text document carries three independent lists of ranges over its text:
//!
//! - [`AttributeSpans`]: style attributes over byte ranges, overlapping allowed, last applied
//!   wins.
//! - [`LinkList`]: hyperlinks, sorted and non-overlapping, indexed by both byte and character.
//! - [`SpellErrors`]: misspelled-word marks over characters, sorted, non-overlapping and never
//!   shorter than [`MIN_SPELL_ERROR_LEN`].
//!
//! Every list supports the same edit vocabulary so a run can keep them consistent while its
//! text changes: `insert_gap`, `remove_range`, `split_off`, `append` and `slice`. Splitting and
//! then appending at the same point restores the original list.
//!
//! ## Features
//!
//! - `std` (enabled by default): This is currently unused and is provided for forward compatibility.
// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

extern crate alloc;

mod attribute_spans;
mod error;
mod links;
mod spell_errors;
mod text_range;

pub use crate::attribute_spans::AttributeSpans;
pub use crate::error::{BoundaryInfo, Endpoint, Error, ErrorKind};
pub use crate::links::{Link, LinkList};
pub use crate::spell_errors::{MIN_SPELL_ERROR_LEN, SpellErrors};
pub use crate::text_range::{TextPos, TextRange};
