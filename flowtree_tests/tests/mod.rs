// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests for Flowtree.
//!
//! The tests are organized by the part of the engine they drive: cursor motion, text editing,
//! the clipboard, tables, and text attributes. Regressions for specific bugs go in `issues`.

#![allow(missing_docs, reason = "we don't need docs for testing")]
#![allow(clippy::cast_possible_truncation, reason = "not critical for testing")]

mod clipboard;
mod issues;
mod text;
#[macro_use]
mod util;
