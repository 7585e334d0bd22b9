// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use crate::tree::{Document, NodeId};

/// Decides whether words are spelled correctly.
pub trait SpellChecker {
    /// Returns `true` if `word` is spelled correctly.
    fn check_word(&mut self, word: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> SpellChecker for F {
    fn check_word(&mut self, word: &str) -> bool {
        self(word)
    }
}

impl Document {
    /// Mark `len` characters at `offset` of the text node `id` as misspelled.
    pub fn spell_errors_add(&mut self, id: NodeId, offset: usize, len: usize) {
        if let Some(run) = self.text_mut(id) {
            run.spell_errors_add(offset, len);
        }
    }

    /// Clear the spell-error marks intersecting `len` characters at `offset` of `id`.
    pub fn spell_errors_clear_range(&mut self, id: NodeId, offset: usize, len: usize) {
        if let Some(run) = self.text_mut(id) {
            run.spell_errors_clear_range(offset, len);
        }
    }

    /// Re-check every word of the text node `id`, replacing its spell-error marks.
    ///
    /// Returns the number of words found misspelled.
    pub fn check_spelling(&mut self, id: NodeId, checker: &mut impl SpellChecker) -> usize {
        let Some(run) = self.text(id) else {
            return 0;
        };
        let text: Vec<char> = run.text().chars().collect();
        let attrs = self.log_attrs(run.text());
        let mut misspelled = Vec::new();
        let mut start = None;
        for (pos, attr) in attrs.iter().enumerate() {
            if let Some(s) = start {
                if attr.is_word_end() {
                    let word: String = text[s..pos].iter().collect();
                    if !checker.check_word(&word) {
                        misspelled.push((s, pos - s));
                    }
                    start = None;
                }
            }
            if attr.is_word_start() && start.is_none() {
                start = Some(pos);
            }
        }
        let Some(run) = self.text_mut(id) else {
            return 0;
        };
        run.spell_errors_clear();
        for &(offset, len) in &misspelled {
            run.spell_errors_add(offset, len);
        }
        misspelled.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::DocumentBuilder;
    use alloc::vec::Vec;

    #[test]
    fn misspelled_words_are_marked() {
        let mut b = DocumentBuilder::new();
        b.text("the qick brown fxo");
        let mut doc = b.build();
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let mut known = |w: &str| ["the", "quick", "brown", "fox"].contains(&w);
        assert_eq!(doc.check_spelling(leaf, &mut known), 2);
        let marks: Vec<_> = doc.text(leaf).unwrap().spell_errors().iter().cloned().collect();
        assert_eq!(marks, [4..8, 15..18]);
    }
}
