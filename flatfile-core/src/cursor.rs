//! Byte scanning primitives for flat-file decoding.
//!
//! [`Cursor`] wraps an input byte slice with a position and provides the
//! three primitives everything else is built on: exact-sequence
//! match-and-consume, exact-sequence peek with rewind, and a scan against
//! a candidate set of terminating sequences.

use crate::error::{FormatError, Result};

/// A terminator candidate: a byte sequence, or `None` for end-of-input.
pub type Terminator = Option<Vec<u8>>;

/// Forward cursor over an input byte slice with bounded lookahead.
///
/// Peeks never move the position; scans consume value bytes but leave a
/// matched terminator unconsumed for the caller's next delimiter match.
#[derive(Debug)]
pub struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes remaining after the current position.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when all input has been consumed.
    #[inline]
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Peeks whether the input continues with `expected`, without consuming.
    ///
    /// End-of-input before the sequence completes counts as not found.
    #[must_use]
    pub fn starts_with(&self, expected: &[u8]) -> bool {
        !expected.is_empty() && self.data[self.pos..].starts_with(expected)
    }

    /// Peeks whether any candidate terminator comes next, without consuming.
    ///
    /// Candidates are tested in order; `None` stands for end-of-input.
    /// Running off the end of the input while scanning a candidate counts
    /// as found — the decoder's next-element tests rely on end-of-input
    /// terminating whatever repetition is in progress.
    #[must_use]
    pub fn starts_with_any(&self, candidates: &[Terminator]) -> bool {
        for candidate in candidates {
            match candidate {
                None => {
                    if self.is_at_end() {
                        return true;
                    }
                }
                Some(bytes) => {
                    let mut i = 0;
                    loop {
                        let Some(&b) = self.data.get(self.pos + i) else {
                            return true;
                        };
                        if i + 1 == bytes.len() && b == bytes[i] {
                            return true;
                        }
                        if bytes.get(i) != Some(&b) {
                            break;
                        }
                        i += 1;
                    }
                }
            }
        }
        false
    }

    /// Consumes `expected` exactly, or fails.
    ///
    /// On a mismatch the error carries the bytes read up to and including
    /// the first differing byte.
    pub fn expect(&mut self, expected: &[u8]) -> Result<()> {
        for (i, &want) in expected.iter().enumerate() {
            match self.data.get(self.pos + i) {
                None => {
                    return Err(FormatError::UnexpectedEof {
                        expected: lossy(expected),
                    });
                }
                Some(&got) if got != want => {
                    return Err(FormatError::BytesMismatch {
                        expected: lossy(expected),
                        found: lossy(&self.data[self.pos..=self.pos + i]),
                    });
                }
                Some(_) => {}
            }
        }
        self.pos += expected.len();
        Ok(())
    }

    /// Consumes exactly `len` bytes, or returns `None` when fewer remain.
    pub fn read_exact(&mut self, len: usize) -> Option<&'a [u8]> {
        if self.remaining() < len {
            return None;
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Some(slice)
    }

    /// Scans forward accumulating value bytes until one of the candidate
    /// terminators is matched in full.
    ///
    /// Matching is single-pass with one shared match index: bytes are
    /// tentatively buffered while they extend at least one candidate's
    /// prefix; the first candidate to match in full — in candidate-set
    /// order — stops the scan, and exactly its bytes are rewound so the
    /// caller can match the delimiter itself. A byte that extends no
    /// candidate flushes the tentative buffer and itself into the value.
    ///
    /// A `None` candidate permits the value to run to end-of-input; any
    /// partially matched terminator bytes are dropped in that case, not
    /// appended to the value. End-of-input without a `None` candidate is
    /// a [`FormatError::UnexpectedEof`].
    pub fn scan_until(&mut self, candidates: &[Terminator]) -> Result<Vec<u8>> {
        let mut value = Vec::new();
        let mut pending = Vec::new();
        let mut i = 0usize;

        loop {
            let Some(&b) = self.data.get(self.pos) else {
                if candidates.iter().any(Option::is_none) {
                    break;
                }
                return Err(FormatError::UnexpectedEof {
                    expected: describe_terminators(candidates),
                });
            };
            self.pos += 1;

            let mut extends = false;
            let mut full_match = None;
            for candidate in candidates {
                let Some(bytes) = candidate else { continue };
                if i + 1 == bytes.len() && bytes.get(i) == Some(&b) {
                    full_match = Some(bytes.len());
                    break;
                }
                if bytes.get(i) == Some(&b) {
                    extends = true;
                }
            }

            if let Some(len) = full_match {
                // Leave the terminator in the stream for the caller.
                self.pos -= len;
                break;
            }

            if extends {
                pending.push(b);
                i += 1;
                continue;
            }

            value.append(&mut pending);
            value.push(b);
            i = 0;
        }

        Ok(value)
    }
}

/// Renders bytes for error messages.
fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Renders a candidate set for error messages, e.g. `'|' or end-of-input`.
fn describe_terminators(candidates: &[Terminator]) -> String {
    let parts: Vec<String> = candidates
        .iter()
        .map(|c| match c {
            Some(bytes) => format!("'{}'", lossy(bytes)),
            None => "end-of-input".to_string(),
        })
        .collect();
    parts.join(" or ")
}
