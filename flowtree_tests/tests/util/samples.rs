// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text shared by several tests.

pub(crate) const TWO_LINES: &str = "hello\nworld";

pub(crate) const PANGRAM: &str = "The quick brown fox";

pub(crate) const MISSPELLED: &str = "the qick brown fxo";

pub(crate) const DICTIONARY: [&str; 4] = ["the", "quick", "brown", "fox"];
