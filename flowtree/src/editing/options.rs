// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::layout::LayoutOptions;

/// Configuration of an [`Engine`](crate::Engine).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineOptions {
    /// Parameters of the relayout run after every edit.
    pub layout: LayoutOptions,
    /// Move the cursor by characters rather than clusters.
    pub exact_navigation: bool,
}

