// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::tree::NodeId;

/// A structural change that can move a cursor location.
///
/// The document journals these as it edits itself; holders of locations replay the journal to
/// keep them pointing at the same content (see [`Cursor::relocate`](crate::Cursor::relocate)).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Relocation {
    /// The characters of `from` at and after `at` moved to the new node `into`.
    Split {
        /// The node that was split.
        from: NodeId,
        /// Split offset.
        at: usize,
        /// The node holding the right part.
        into: NodeId,
    },
    /// `from` was appended to `into` and destroyed.
    Merged {
        /// The absorbed node.
        from: NodeId,
        /// The surviving node.
        into: NodeId,
        /// Length of `into` before the merge.
        shift: usize,
    },
    /// `node` was destroyed.
    Removed {
        /// The destroyed node.
        node: NodeId,
        /// Where references to it should go, if anywhere.
        replacement: Option<(NodeId, usize)>,
    },
    /// `len` characters were inserted into `node` at `at`.
    Inserted {
        /// The edited node.
        node: NodeId,
        /// Insertion offset.
        at: usize,
        /// Number of characters inserted.
        len: usize,
    },
    /// Characters `start..end` were removed from `node`.
    Deleted {
        /// The edited node.
        node: NodeId,
        /// First removed character.
        start: usize,
        /// One past the last removed character.
        end: usize,
    },
}

impl Relocation {
    /// Map the location `(object, offset)` through this change.
    pub fn apply(&self, object: NodeId, offset: usize) -> (NodeId, usize) {
        match *self {
            Self::Split { from, at, into } if object == from && offset > at => {
                (into, offset - at)
            }
            Self::Merged { from, into, shift } if object == from => (into, offset + shift),
            Self::Removed {
                node,
                replacement: Some(to),
            } if object == node => to,
            Self::Inserted { node, at, len } if object == node && offset > at => {
                (object, offset + len)
            }
            Self::Deleted { node, start, end } if object == node && offset > start => {
                (object, offset.saturating_sub(end - start).max(start))
            }
            _ => (object, offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Relocation;
    use crate::Document;

    #[test]
    fn locations_follow_changes() {
        let mut doc = Document::new();
        let a = doc.first_leaf(doc.root()).unwrap();
        let b = doc.new_text("b", Default::default());
        let split = Relocation::Split {
            from: a,
            at: 3,
            into: b,
        };
        assert_eq!(split.apply(a, 5), (b, 2));
        assert_eq!(split.apply(a, 3), (a, 3));
        let merged = Relocation::Merged {
            from: b,
            into: a,
            shift: 3,
        };
        assert_eq!(merged.apply(b, 2), (a, 5));
        let deleted = Relocation::Deleted {
            node: a,
            start: 2,
            end: 4,
        };
        assert_eq!(deleted.apply(a, 3), (a, 2));
        assert_eq!(deleted.apply(a, 6), (a, 4));
        assert_eq!(deleted.apply(a, 1), (a, 1));
        let removed = Relocation::Removed {
            node: b,
            replacement: None,
        };
        assert_eq!(removed.apply(b, 1), (b, 1));
    }
}
