// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Flowtree Dev
//!
//! This crate provides utilities for developing Flowtree: text samples in several scripts,
//! ready-made documents, and a headless engine setup.

use flowtree::tree::{CellSpan, DocumentBuilder, SpellChecker, Table};
use flowtree::{Document, Engine, EngineOptions, FixedPainter, LayoutOptions};

/// A sample to be used for development.
#[derive(Debug)]
pub struct Sample {
    /// The name of the sample.
    pub name: &'static str,
    /// The text of the sample.
    pub text: &'static str,
}

/// A collection of text samples.
#[derive(Debug)]
pub struct TextSamples {
    /// The Latin text sample.
    pub latin: Sample,
    /// The Hebrew text sample.
    pub hebrew: Sample,
    /// The Arabic text sample.
    pub arabic: Sample,
    /// Latin text with an embedded Hebrew phrase.
    pub mixed: Sample,
}

impl TextSamples {
    /// Creates a new collection of text samples.
    pub const fn new() -> Self {
        Self {
            latin: Sample {
                name: "latin",
                text: "The quick brown fox jumps over the lazy dog.",
            },
            hebrew: Sample {
                name: "hebrew",
                text: "שלום עולם",
            },
            arabic: Sample {
                name: "arabic",
                text: "مرحبا بالعالم",
            },
            mixed: Sample {
                name: "mixed",
                text: "Say שלום to everyone",
            },
        }
    }

    /// All samples, in a fixed order.
    pub fn all(&self) -> [&Sample; 4] {
        [&self.latin, &self.hebrew, &self.arabic, &self.mixed]
    }
}

impl Default for TextSamples {
    fn default() -> Self {
        Self::new()
    }
}

/// A document with one paragraph per line of `text`.
pub fn paragraphs(text: &str) -> Document {
    let mut builder = DocumentBuilder::new();
    builder.text(text);
    builder.build()
}

/// A paragraph `before`, a `rows` by `cols` table holding `cells` in row-major order, and a
/// paragraph `after`.
///
/// Missing cells are left empty.
pub fn table(before: &str, rows: usize, cols: usize, cells: &[&str], after: &str) -> Document {
    let mut builder = DocumentBuilder::new();
    builder.text(before).paragraph_break();
    builder.begin_table(Table::new(rows, cols));
    for (i, text) in cells.iter().enumerate().take(rows * cols) {
        builder
            .begin_cell(CellSpan::at(i / cols, i % cols))
            .text(text)
            .end_cell();
    }
    builder.end_table();
    builder.text(after);
    builder.build()
}

/// An engine over `doc` with a [`FixedPainter`] attached, laying out to `width`.
pub fn headless_engine(doc: Document, width: f32) -> Engine {
    let options = EngineOptions {
        layout: LayoutOptions {
            width,
            ..LayoutOptions::default()
        },
        ..EngineOptions::default()
    };
    let mut engine = Engine::new(doc, options);
    engine.set_painter(FixedPainter::default());
    engine
}

/// A spell checker accepting a fixed list of words, case-insensitively.
#[derive(Clone, Debug, Default)]
pub struct WordList {
    words: Vec<String>,
    /// Number of words checked so far.
    pub checked: usize,
}

impl WordList {
    /// Creates a checker accepting `words`.
    pub fn new<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            words: words.into_iter().map(str::to_lowercase).collect(),
            checked: 0,
        }
    }
}

impl SpellChecker for WordList {
    fn check_word(&mut self, word: &str) -> bool {
        self.checked += 1;
        let word = word.to_lowercase();
        self.words.iter().any(|known| *known == word)
    }
}
