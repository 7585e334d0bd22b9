// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

pub(crate) mod samples;

use flowtree::Engine;

/// Returns the current function name (for use in test naming).
#[macro_export]
macro_rules! test_name {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        let name = &name[..name.len() - 3];
        let name = &name[name.rfind(':').map(|x| x + 1).unwrap_or(0)..];

        name
    }};
}

/// Assert that the document is well-formed and that the cursor's stored position matches
/// the one computed from the tree.
pub(crate) fn assert_consistent(engine: &Engine, case: &str) {
    let doc = engine.document();
    if let Err(err) = doc.check_invariants() {
        panic!("malformed tree with {case}: {err:?}");
    }
    let cursor = engine.cursor();
    assert!(cursor.is_valid(doc), "invalid cursor with {case}");
    assert_eq!(
        cursor.compute_position(doc),
        Some(cursor.position()),
        "position drift with {case}"
    );
}

/// The plain text of a document made only of paragraphs, with `|` at the cursor.
pub(crate) fn caret_text(engine: &Engine) -> String {
    let text = engine.document().plain_text();
    let at = engine.cursor().position();
    let mut out: String = text.chars().take(at).collect();
    out.push('|');
    out.extend(text.chars().skip(at));
    out
}
