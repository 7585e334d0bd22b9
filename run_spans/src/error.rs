// Copyright 2026 the Flowtree Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Error returned when a range handed to a run's range lists is unusable.
///
/// Carries a non-exhaustive [`ErrorKind`] together with the attempted range, the length of the
/// run's text and, for UTF-8 boundary failures, the character span enclosing the bad index.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    kind: ErrorKind,
    start: usize,
    end: usize,
    len: usize,
    boundary: Option<BoundaryInfo>,
}

#[expect(
    clippy::len_without_is_empty,
    reason = "`Error::len` reports the run length at the time of failure, not a collection length."
)]
impl Error {
    /// The machine-readable category for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Start of the range provided by the caller.
    pub fn start(&self) -> usize {
        self.start
    }

    /// End (exclusive) of the range provided by the caller.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Length of the run's text when the error was raised.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Boundary details for [`ErrorKind::NotOnCharBoundary`].
    pub fn boundary(&self) -> Option<BoundaryInfo> {
        self.boundary
    }

    pub(crate) fn invalid_bounds(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidBounds,
            start,
            end,
            len,
            boundary: None,
        }
    }

    pub(crate) fn invalid_range(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::InvalidRange,
            start,
            end,
            len,
            boundary: None,
        }
    }

    pub(crate) fn overlapping_link(start: usize, end: usize, len: usize) -> Self {
        Self {
            kind: ErrorKind::OverlappingLink,
            start,
            end,
            len,
            boundary: None,
        }
    }

    pub(crate) fn not_on_char_boundary(
        text: &str,
        start: usize,
        end: usize,
        which: Endpoint,
        index: usize,
    ) -> Self {
        let (char_start, char_end) = enclosing_char_span(text, index);
        Self {
            kind: ErrorKind::NotOnCharBoundary,
            start,
            end,
            len: text.len(),
            boundary: Some(BoundaryInfo {
                which,
                index,
                char_start,
                char_end,
            }),
        }
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.kind {
            ErrorKind::InvalidBounds => write!(
                f,
                "range {}..{} out of bounds for run of len {}",
                self.start, self.end, self.len
            ),
            ErrorKind::InvalidRange => {
                write!(f, "invalid range {}..{}: start > end", self.start, self.end)
            }
            ErrorKind::OverlappingLink => write!(
                f,
                "link {}..{} overlaps an existing link",
                self.start, self.end
            ),
            ErrorKind::NotOnCharBoundary => match self.boundary {
                Some(b) => {
                    let which = match b.which {
                        Endpoint::Start => "start",
                        Endpoint::End => "end",
                    };
                    write!(
                        f,
                        "range {}..{}: {} index {} not on UTF-8 boundary (char {}..{})",
                        self.start, self.end, which, b.index, b.char_start, b.char_end
                    )
                }
                None => write!(
                    f,
                    "range {}..{} not on UTF-8 boundary",
                    self.start, self.end
                ),
            },
        }
    }
}

impl core::error::Error for Error {}

/// The non-exhaustive category of an [`Error`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An index lies past the end of the run.
    InvalidBounds,

    /// The range had `start > end`.
    InvalidRange,

    /// An endpoint splits a UTF-8 encoded character.
    NotOnCharBoundary,

    /// A hyperlink would overlap a link already present in the run.
    OverlappingLink,
}

/// Which endpoint of a range failed boundary validation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// The `start` endpoint.
    Start,

    /// The `end` endpoint.
    End,
}

/// The offending index of a [`ErrorKind::NotOnCharBoundary`] error and the character around it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BoundaryInfo {
    /// Which endpoint was invalid.
    pub which: Endpoint,

    /// The offending byte index.
    pub index: usize,

    /// Start byte of the enclosing character.
    pub char_start: usize,

    /// End byte (exclusive) of the enclosing character.
    pub char_end: usize,
}

fn enclosing_char_span(text: &str, index: usize) -> (usize, usize) {
    if index > text.len() || text.is_char_boundary(index) {
        return (index, index);
    }
    let start = (0..index)
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    let end = (index + 1..=text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len());
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::{Endpoint, Error, ErrorKind};
    use alloc::format;

    #[test]
    fn boundary_error_reports_enclosing_char() {
        // "é" is two bytes, so index 1 sits inside it.
        let err = Error::not_on_char_boundary("éclair", 1, 3, Endpoint::Start, 1);
        assert_eq!(err.kind(), ErrorKind::NotOnCharBoundary);
        let b = err.boundary().expect("boundary info");
        assert_eq!((b.char_start, b.char_end), (0, 2));
        let msg = format!("{err}");
        assert!(msg.contains("start index 1"));
        assert!(msg.contains("char 0..2"));
    }

    #[test]
    fn overlap_message_names_range() {
        let err = Error::overlapping_link(2, 5, 9);
        assert_eq!(err.kind(), ErrorKind::OverlappingLink);
        assert!(format!("{err}").contains("link 2..5"));
    }
}
