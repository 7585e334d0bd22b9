// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line filling of paragraphs.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;

use crate::layout::{LayoutCx, LayoutError, layout_block, table};
use crate::style::{Alignment, Direction};
use crate::text::Slave;
use crate::tree::{Document, NodeId, NodeKind};

/// A measured piece of a line that is never broken further.
#[derive(Clone, Debug)]
struct Piece {
    node: NodeId,
    chars: Range<usize>,
    width: f32,
    ascent: f32,
    descent: f32,
    /// A line may break before this piece.
    breakable: bool,
}

#[derive(Clone, Debug)]
enum Item {
    Piece(Piece),
    /// A leaf laid out on lines of its own: a rule, a table or a frame.
    Block(NodeId),
}

/// Direction of the first strongly directional text of the paragraph `flow`.
pub(crate) fn content_direction(doc: &Document, flow: NodeId) -> Direction {
    doc.children(flow)
        .filter_map(|child| doc.text(child))
        .map(|run| doc.base_direction(run.text()))
        .find(|dir| *dir != Direction::Inherit)
        .unwrap_or(Direction::Inherit)
}

fn collect_items(
    doc: &Document,
    cx: &LayoutCx<'_>,
    flow: NodeId,
    preformatted: bool,
) -> Result<Vec<Item>, LayoutError> {
    let mut items = Vec::new();
    let mut after_text = false;
    let mut after_white = true;
    for child in doc.children(flow) {
        match doc.kind(child) {
            NodeKind::Text(run) => {
                let chars: Vec<char> = run.text().chars().collect();
                let attrs = cx.painter.cursor_position_attrs(run.text());
                let mut bounds = alloc::vec![0];
                if !preformatted {
                    bounds.extend(
                        (1..chars.len()).filter(|&i| attrs.get(i).is_some_and(|a| a.is_line_break())),
                    );
                }
                bounds.push(chars.len());
                for pair in bounds.windows(2) {
                    let (start, end) = (pair[0], pair[1]);
                    let segment: String = chars[start..end].iter().collect();
                    let metrics = cx.painter.measure(&segment, run.style())?;
                    let breakable = start > 0
                        || !after_text
                        || after_white
                        || chars.first().is_some_and(|c| c.is_whitespace());
                    items.push(Item::Piece(Piece {
                        node: child,
                        chars: start..end,
                        width: metrics.width,
                        ascent: metrics.ascent,
                        descent: metrics.descent,
                        breakable,
                    }));
                }
                if let Some(last) = chars.last() {
                    after_text = true;
                    after_white = last.is_whitespace();
                }
            }
            NodeKind::Image(image) => {
                let (default_width, default_height) = cx.options.image_size;
                items.push(Item::Piece(Piece {
                    node: child,
                    chars: 0..1,
                    width: image.width.unwrap_or(default_width),
                    ascent: image.height.unwrap_or(default_height),
                    descent: 0.0,
                    breakable: true,
                }));
                after_text = false;
            }
            NodeKind::Embedded(widget) => {
                items.push(Item::Piece(Piece {
                    node: child,
                    chars: 0..1,
                    width: widget.width,
                    ascent: widget.height,
                    descent: 0.0,
                    breakable: true,
                }));
                after_text = false;
            }
            NodeKind::Rule(_) | NodeKind::Table(_) | NodeKind::Frame(_) => {
                items.push(Item::Block(child));
                after_text = false;
            }
            _ => {}
        }
    }
    Ok(items)
}

struct Line {
    pieces: Vec<Piece>,
    width: f32,
}

impl Line {
    fn new() -> Self {
        Self {
            pieces: Vec::new(),
            width: 0.0,
        }
    }
}

/// Lay out the paragraph `flow` with its top-left corner at `(x, top)`. Returns its height.
pub(crate) fn layout_flow(
    doc: &mut Document,
    cx: &LayoutCx<'_>,
    flow: NodeId,
    x: f32,
    top: f32,
    width: f32,
    inherited: Direction,
) -> Result<f32, LayoutError> {
    let style = doc.flow_style(flow).cloned().unwrap_or_default();
    let dir = match style.dir.or(inherited) {
        Direction::Inherit => content_direction(doc, flow).or(Direction::Ltr),
        dir => dir,
    };
    let rtl = dir.is_rtl();
    let indent = cx.options.indent_step * f32::from(style.indent);
    let (x, width) = if rtl {
        (x, (width - indent).max(0.0))
    } else {
        (x + indent, (width - indent).max(0.0))
    };
    let preformatted = style.is_preformatted();

    let children: Vec<NodeId> = doc.children(flow).collect();
    for &child in &children {
        if let NodeKind::Text(run) = &mut doc.node_mut(child).kind {
            run.slaves.clear();
        }
    }
    let items = collect_items(doc, cx, flow, preformatted)?;

    let mut y = top;
    let mut line = Line::new();
    let mut min_width: f32 = 0.0;
    let mut max_width: f32 = 0.0;
    let mut natural: f32 = 0.0;
    let mut i = 0;
    while i < items.len() {
        match &items[i] {
            Item::Block(id) => {
                y += flush_line(doc, &mut line, x, y, width, style.alignment, rtl);
                max_width = max_width.max(natural);
                natural = 0.0;
                y += layout_block_leaf(doc, cx, *id, x, y, width, dir)?;
                let g = doc.node(*id).geometry();
                min_width = min_width.max(g.min_width);
                max_width = max_width.max(g.max_width);
                i += 1;
            }
            Item::Piece(_) => {
                let mut j = i + 1;
                while matches!(items.get(j), Some(Item::Piece(p)) if !p.breakable) {
                    j += 1;
                }
                let word = &items[i..j];
                let word_width: f32 = word
                    .iter()
                    .map(|item| match item {
                        Item::Piece(p) => p.width,
                        Item::Block(_) => 0.0,
                    })
                    .sum();
                if !preformatted && !line.pieces.is_empty() && line.width + word_width > width {
                    y += flush_line(doc, &mut line, x, y, width, style.alignment, rtl);
                }
                for item in word {
                    if let Item::Piece(p) = item {
                        line.width += p.width;
                        line.pieces.push(p.clone());
                    }
                }
                min_width = min_width.max(word_width);
                natural += word_width;
                i = j;
            }
        }
    }
    y += flush_line(doc, &mut line, x, y, width, style.alignment, rtl);
    max_width = max_width.max(natural);

    let height = y - top;
    let g = &mut doc.node_mut(flow).geometry;
    g.x = x;
    g.y = top + height;
    g.ascent = height;
    g.descent = 0.0;
    g.width = width;
    g.min_width = min_width + indent;
    g.max_width = max_width + indent;
    g.pref_width = g.max_width;
    Ok(height)
}

/// Place the pieces of `line` at `top`, emitting one slave per text run. Returns the line
/// height, zero for an empty line.
fn flush_line(
    doc: &mut Document,
    line: &mut Line,
    x: f32,
    top: f32,
    width: f32,
    alignment: Alignment,
    rtl: bool,
) -> f32 {
    if line.pieces.is_empty() {
        return 0.0;
    }
    let ascent = line.pieces.iter().map(|p| p.ascent).fold(0.0, f32::max);
    let descent = line.pieces.iter().map(|p| p.descent).fold(0.0, f32::max);
    let baseline = top + ascent;
    let free = (width - line.width).max(0.0);
    let shift = match alignment {
        Alignment::Left => 0.0,
        Alignment::Right => free,
        Alignment::Center => free / 2.0,
        Alignment::Start if rtl => free,
        Alignment::Start => 0.0,
    };
    let mut pen = if rtl { x + shift + line.width } else { x + shift };
    let pieces = core::mem::take(&mut line.pieces);
    let mut k = 0;
    while k < pieces.len() {
        let node = pieces[k].node;
        let start = pieces[k].chars.start;
        let mut end = pieces[k].chars.end;
        let mut run_width = pieces[k].width;
        let mut m = k + 1;
        while m < pieces.len() && pieces[m].node == node {
            end = pieces[m].chars.end;
            run_width += pieces[m].width;
            m += 1;
        }
        let left = if rtl {
            pen -= run_width;
            pen
        } else {
            pen += run_width;
            pen - run_width
        };
        let n = doc.node_mut(node);
        let first = match &mut n.kind {
            NodeKind::Text(run) => {
                run.slaves.push(Slave {
                    start,
                    len: end - start,
                    x: left,
                    y: baseline,
                    width: run_width,
                    ascent,
                    descent,
                    rtl,
                });
                run.slaves.len() == 1
            }
            _ => true,
        };
        if first {
            n.geometry.x = left;
            n.geometry.y = baseline;
            n.geometry.ascent = ascent;
            n.geometry.descent = descent;
            n.geometry.width = run_width;
        } else {
            n.geometry.width += run_width;
        }
        k = m;
    }
    line.width = 0.0;
    ascent + descent
}

/// Lay out a rule, table or frame across the whole width at `top`. Returns its height.
fn layout_block_leaf(
    doc: &mut Document,
    cx: &LayoutCx<'_>,
    id: NodeId,
    x: f32,
    top: f32,
    width: f32,
    dir: Direction,
) -> Result<f32, LayoutError> {
    match doc.kind(id) {
        NodeKind::Table(_) => table::layout_table(doc, cx, id, x, top, width, dir),
        NodeKind::Frame(frame) => {
            let frame_width = if frame.width > 0.0 {
                frame.width.min(width)
            } else {
                width
            };
            let frame_height = frame.height;
            let left = if dir.is_rtl() {
                x + width - frame_width
            } else {
                x
            };
            let content = layout_block(doc, cx, id, left, top, frame_width, dir)?;
            let height = content.max(frame_height);
            let g = &mut doc.node_mut(id).geometry;
            g.y = top + height;
            g.ascent = height;
            g.min_width = g.min_width.max(frame_width);
            g.max_width = g.max_width.max(frame_width);
            g.pref_width = frame_width;
            Ok(height)
        }
        NodeKind::Rule(rule) => {
            let height = cx.options.rule_height + f32::from(rule.size);
            let length = rule.length.map_or(width, |l| l.min(width));
            let left = if dir.is_rtl() { x + width - length } else { x };
            let min_width = rule.length.unwrap_or(0.0);
            let g = &mut doc.node_mut(id).geometry;
            g.x = left;
            g.y = top + height;
            g.ascent = height;
            g.descent = 0.0;
            g.width = length;
            g.min_width = min_width;
            g.max_width = g.min_width;
            g.pref_width = length;
            Ok(height)
        }
        _ => Ok(0.0),
    }
}

#[cfg(test)]
mod tests {
    use crate::layout::LayoutOptions;
    use crate::measure::FixedPainter;
    use crate::style::{Alignment, FlowStyle, FontFlags, TextStyle};
    use crate::tree::{Document, DocumentBuilder, Rule};

    fn laid_out(mut doc: Document, width: f32) -> Document {
        doc.set_painter(FixedPainter::default());
        doc.set_layout_options(LayoutOptions {
            width,
            ..LayoutOptions::default()
        });
        doc.relayout().unwrap();
        doc
    }

    #[test]
    fn words_wrap_at_break_opportunities() {
        let mut b = DocumentBuilder::new();
        b.text("hello world again");
        // Ten characters of eight pixels fit a line.
        let doc = laid_out(b.build(), 80.0);
        let leaf = doc.first_leaf(doc.root()).unwrap();
        let slaves = doc.text(leaf).unwrap().slaves();
        assert_eq!(slaves.len(), 3);
        assert_eq!((slaves[0].start, slaves[0].len), (0, 6));
        assert_eq!((slaves[1].start, slaves[1].len), (6, 6));
        assert_eq!(slaves[1].y, 28.0);
        assert_eq!(slaves[2].x, 0.0);
    }

    #[test]
    fn runs_without_break_between_stay_together() {
        let mut b = DocumentBuilder::new();
        let bold = TextStyle {
            flags: FontFlags::BOLD,
            ..TextStyle::default()
        };
        b.text("aaaa aaa").text_styled("bb", bold);
        let doc = laid_out(b.build(), 80.0);
        let leaves = doc.leaves(doc.root());
        let tail = doc.text(leaves[1]).unwrap().slaves();
        let head = doc.text(leaves[0]).unwrap().slaves();
        assert_eq!(head.len(), 2);
        // "aaa" moved down with the bold run glued to it.
        assert_eq!(head[1].y, tail[0].y);
        assert_eq!(head[1].x, 0.0);
    }

    #[test]
    fn alignment_shifts_lines() {
        let mut b = DocumentBuilder::new();
        b.set_flow_style(FlowStyle {
            alignment: Alignment::Center,
            ..FlowStyle::default()
        });
        b.text("ab");
        let doc = laid_out(b.build(), 100.0);
        let leaf = doc.first_leaf(doc.root()).unwrap();
        assert_eq!(doc.text(leaf).unwrap().slaves()[0].x, 42.0);
    }

    #[test]
    fn rules_take_a_line_of_their_own() {
        let mut b = DocumentBuilder::new();
        b.text("a").rule(Rule::default()).text("b");
        let doc = laid_out(b.build(), 100.0);
        let leaves = doc.leaves(doc.root());
        assert_eq!(leaves.len(), 3);
        let rule = doc.node(leaves[1]).geometry();
        assert_eq!(rule.top(), 16.0);
        assert_eq!(rule.width, 100.0);
        let after = doc.text(leaves[2]).unwrap().slaves()[0];
        assert_eq!(after.top(), 24.0);
    }

    #[test]
    fn fixed_length_rules_keep_their_length() {
        let mut b = DocumentBuilder::new();
        b.rule(Rule {
            length: Some(40.0),
            ..Rule::default()
        });
        let doc = laid_out(b.build(), 100.0);
        let rule = doc.node(doc.leaves(doc.root())[0]).geometry();
        assert_eq!(rule.width, 40.0);
        assert_eq!(rule.min_width, 40.0);
        assert_eq!(rule.max_width, 40.0);
    }
}
