// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::editing::{Cursor, EditKind, Engine, Interval, next_unit, prev_unit, unit_of};
use crate::style::TextStyle;
use crate::tree::{Document, NodeId, NodeType};

type Location = (NodeId, usize);

impl Document {
    /// Remove everything between the cursor locations `start` and `end`, which must lie in the
    /// same isolating container, `start` first.
    ///
    /// Text runs are trimmed, whole leaves and nested tables or frames are destroyed, and if
    /// the range crosses paragraph boundaries the paragraphs around it are joined: what is left
    /// of the first one moves to the front of the last one, which takes its style. References
    /// to destroyed leaves are redirected to the seam.
    ///
    /// Returns the location of the seam.
    pub(crate) fn delete_range(&mut self, start: Location, end: Location) -> Location {
        let (s_obj, s_off) = start;
        let iso = self.isolating_ancestor(s_obj);
        let (mut e_obj, mut e_off) = end;
        let unit = unit_of(self, iso, e_obj);
        if unit != e_obj {
            (e_obj, e_off) = (unit, 1);
        }
        let fs = self.enclosing_flow(s_obj).expect("leaves live in flows");
        let fe = self.enclosing_flow(e_obj).expect("units live in flows");
        let style = self.text_style_near(s_obj);

        if self.node_type(e_obj) == NodeType::Text && 0 < e_off && e_off < self.length(e_obj) {
            self.split_text(e_obj, e_off);
        }
        let split = (self.node_type(s_obj) == NodeType::Text
            && 0 < s_off
            && s_off < self.length(s_obj))
        .then(|| self.split_text(s_obj, s_off));

        let first = match split {
            Some(right) => Some(right),
            None if s_off == 0 => Some(s_obj),
            None => next_unit(self, iso, s_obj),
        };
        let last = if e_off == 0 {
            prev_unit(self, iso, e_obj)
        } else if e_obj == s_obj {
            split.or(Some(e_obj))
        } else {
            Some(e_obj)
        };
        let before = if s_off > 0 {
            Some(s_obj)
        } else {
            self.prev(s_obj)
        };
        let after = if e_off == 0 {
            Some(e_obj)
        } else {
            last.and_then(|l| self.next(l))
        };
        let before_len = before.map_or(0, |id| self.length(id));

        let doomed = self.units_between(iso, first, last);
        let anchor = match (self.live_leaf(before), self.live_leaf(after)) {
            (Some(p), _) => (p, before_len),
            (None, Some(n)) => (n, 0),
            (None, None) => {
                // Nothing survives at the seam. A placeholder goes in before anything is
                // destroyed.
                let lone = match doomed[..] {
                    [unit] if self.fills_flow(unit) => self.remove_subtree(unit),
                    _ => None,
                };
                lone.unwrap_or_else(|| (self.seam_placeholder(before, fs, &style), 0))
            }
        };
        for &unit in &doomed {
            if self.contains(unit) {
                self.destroy_with(unit, Some(anchor));
            }
        }
        if fs != fe {
            self.join_flows(fs, fe, anchor);
        }
        self.drop_redundant_placeholders(fe);
        if let (Some(p), Some(n)) = (self.live_leaf(before), self.live_leaf(after)) {
            self.merge(p, n);
        }
        log::debug!(
            "deleted {} units between {s_obj:?}:{s_off} and {e_obj:?}:{e_off}",
            doomed.len()
        );

        let before = before.filter(|&id| self.contains(id));
        if let Some(p) = self.live_leaf(before) {
            return (p, before_len);
        }
        let candidate = match before {
            Some(p) => self.next(p),
            None => self.head(fe),
        };
        if let Some(c) = self.live_leaf(candidate) {
            return (c, 0);
        }
        let placeholder = self.new_text("", style);
        match (candidate, before) {
            (Some(c), _) => self.insert_before(c, placeholder),
            (None, Some(p)) => self.insert_after(p, placeholder),
            (None, None) => self.append_child(fe, placeholder),
        }
        (placeholder, 0)
    }

    /// Insert a zero-length run at the seam of a deletion: right after `before`, or at the
    /// front of `flow` when nothing precedes the deleted range.
    fn seam_placeholder(
        &mut self,
        before: Option<NodeId>,
        flow: NodeId,
        style: &TextStyle,
    ) -> NodeId {
        let placeholder = self.new_text("", style.clone());
        match before {
            Some(p) => self.insert_after(p, placeholder),
            None => self.prepend_child(flow, placeholder),
        }
        placeholder
    }

    fn fills_flow(&self, id: NodeId) -> bool {
        self.parent(id).is_some_and(|flow| {
            self.node_type(flow) == NodeType::Flow
                && self.head(flow) == Some(id)
                && self.tail(flow) == Some(id)
        })
    }

    fn live_leaf(&self, id: Option<NodeId>) -> Option<NodeId> {
        id.filter(|&id| self.contains(id) && !self.is_container(id))
    }

    fn units_between(&self, iso: NodeId, first: Option<NodeId>, last: Option<NodeId>) -> Vec<NodeId> {
        let mut out = Vec::new();
        let (Some(first), Some(last)) = (first, last) else {
            return out;
        };
        if self.precedes(last, first) {
            return out;
        }
        let mut cur = Some(first);
        while let Some(unit) = cur {
            out.push(unit);
            if unit == last {
                break;
            }
            cur = next_unit(self, iso, unit);
        }
        out
    }

    /// Join the paragraph `fs` to the later paragraph `fe`, removing every container between
    /// them.
    ///
    /// References to destroyed leaves go to `anchor`.
    fn join_flows(&mut self, fs: NodeId, fe: NodeId, anchor: Location) {
        let top = self.common_ancestor(fs, fe);
        let below_top = |doc: &Self, id: NodeId| {
            let mut chain = alloc::vec![id];
            chain.extend(doc.ancestors(id).take_while(|&a| a != top));
            chain
        };
        let chain_s = below_top(self, fs);
        let chain_e = below_top(self, fe);
        let (top_s, top_e) = (chain_s[chain_s.len() - 1], chain_e[chain_e.len() - 1]);

        for &level in &chain_s[..chain_s.len() - 1] {
            while let Some(next) = self.next(level) {
                self.destroy_with(next, Some(anchor));
            }
        }
        while let Some(next) = self.next(top_s).filter(|&n| n != top_e) {
            self.destroy_with(next, Some(anchor));
        }
        for &level in &chain_e[..chain_e.len() - 1] {
            while let Some(prev) = self.prev(level) {
                self.destroy_with(prev, Some(anchor));
            }
        }

        let remainder = self.head(fs).is_some();
        while let Some(child) = self.tail(fs) {
            self.detach(child);
            self.prepend_child(fe, child);
        }
        if remainder {
            if let Some(style) = self.flow_style(fs).cloned() {
                self.set_flow_style(fe, style);
            }
        }
        let mut up = self.parent(fs);
        self.destroy(fs);
        while let Some(id) = up {
            if id == top || self.head(id).is_some() {
                break;
            }
            up = self.parent(id);
            self.destroy(id);
        }
    }
}

impl Engine {
    /// Delete `count` steps forward from the cursor.
    ///
    /// Deletion stays inside the cell or frame holding the cursor, and stops in front of a
    /// nested table. Returns `false` if nothing was deleted.
    pub fn delete(&mut self, count: usize) -> bool {
        self.cursor.normalize(&self.doc);
        let iso = self.doc.isolating_ancestor(self.cursor.object());
        let mut end = self.cursor;
        let mut steps = 0;
        while steps < count {
            let saved = end;
            if !end.step_forward(&self.doc, true) {
                break;
            }
            if self.doc.isolating_ancestor(end.object()) != iso {
                log::warn!("delete stops at the boundary of {iso:?}");
                end = saved;
                break;
            }
            steps += 1;
        }
        if steps == 0 {
            return false;
        }
        let kind = EditKind::Delete { count };
        self.begin_edit(kind);
        self.remove_between(end);
        self.finish_edit(kind);
        true
    }

    /// Delete `count` steps backward from the cursor.
    pub fn delete_backward(&mut self, count: usize) -> bool {
        self.cursor.normalize(&self.doc);
        let iso = self.doc.isolating_ancestor(self.cursor.object());
        let mut start = self.cursor;
        let mut steps = 0;
        while steps < count {
            let saved = start;
            if !start.step_backward(&self.doc, true) {
                break;
            }
            if self.doc.isolating_ancestor(start.object()) != iso {
                start = saved;
                break;
            }
            steps += 1;
        }
        if steps == 0 {
            return false;
        }
        self.cursor = start;
        self.delete(steps)
    }

    /// Delete the selection and drop the mark. Returns `false` if nothing was selected.
    pub fn delete_selection(&mut self) -> bool {
        let Some(interval) = self.selection() else {
            return false;
        };
        let count = interval.len();
        let kind = EditKind::Delete { count };
        self.begin_edit(kind);
        self.delete_interval(&interval);
        self.finish_edit(kind);
        true
    }

    /// Move the selection to the clipboard.
    pub fn cut(&mut self) -> bool {
        if !self.copy() {
            return false;
        }
        let Some(interval) = self.selection() else {
            return false;
        };
        self.begin_edit(EditKind::Cut);
        self.delete_interval(&interval);
        self.finish_edit(EditKind::Cut);
        true
    }

    fn delete_interval(&mut self, interval: &Interval) {
        self.mark = None;
        self.cursor = *interval.start();
        self.remove_between(*interval.end());
    }

    fn remove_between(&mut self, end: Cursor) {
        let (object, offset) = self
            .doc
            .delete_range(self.cursor.location(), end.location());
        let position = self.cursor.position();
        self.cursor.set(object, offset, position);
    }
}
