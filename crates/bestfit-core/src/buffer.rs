//! Pull-based fallback buffers.
//!
//! An encoder that meets an unmappable character hands it to a
//! [`FallbackBuffer`], then pulls the substitute one character at a time
//! with [`next_char`](FallbackBuffer::next_char). Because the encoder writes
//! into a bounded destination, it can un-read a character with
//! [`move_previous`](FallbackBuffer::move_previous) when it runs out of room,
//! or drop everything with [`reset`](FallbackBuffer::reset) when it abandons
//! the conversion attempt.

use crate::error::{FallbackError, check_surrogate_pair};
use crate::table::MappingTable;

/// Substitute emitted when no best-fit mapping exists.
pub const PLACEHOLDER: char = '?';

/// The protocol between an encoder and a fallback buffer.
///
/// A buffer is owned by one encoding operation and is not synchronized.
pub trait FallbackBuffer {
    /// Begin a fallback for a single unmappable UTF-16 code unit.
    ///
    /// Returns the substitute, which is also queued for
    /// [`next_char`](Self::next_char).
    ///
    /// # Panics
    ///
    /// Panics if characters from a previous fallback are still pending. That
    /// only happens when a substitute was itself unmappable, which means the
    /// best-fit table is broken.
    fn fallback(&mut self, unknown: u16) -> char;

    /// Begin a fallback for an unmappable surrogate pair.
    ///
    /// # Errors
    ///
    /// Returns [`FallbackError::SurrogateOutOfRange`] if `high` is not a high
    /// surrogate or `low` is not a low surrogate.
    ///
    /// # Panics
    ///
    /// Panics under the same condition as [`fallback`](Self::fallback).
    fn fallback_pair(&mut self, high: u16, low: u16) -> Result<[char; 2], FallbackError>;

    /// Take the next pending substitute character, or `None` once drained.
    fn next_char(&mut self) -> Option<char>;

    /// Un-read the last character taken by [`next_char`](Self::next_char).
    ///
    /// Returns false if there is nothing to back up over.
    fn move_previous(&mut self) -> bool;

    /// Number of substitute characters still pending.
    fn remaining(&self) -> usize;

    /// Drop any pending substitution.
    fn reset(&mut self);

    /// Begin a fallback for a whole character, splitting characters outside
    /// the Basic Multilingual Plane into their surrogate halves.
    ///
    /// Returns the number of substitute characters queued.
    fn fallback_char(&mut self, ch: char) -> Result<usize, FallbackError> {
        let mut units = [0u16; 2];
        let encoded = ch.encode_utf16(&mut units);
        if encoded.len() == 1 {
            self.fallback(encoded[0]);
            Ok(1)
        } else {
            self.fallback_pair(encoded[0], encoded[1]).map(|pair| pair.len())
        }
    }
}

/// Where a [`BestFitBuffer`] is in its fallback episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No substitution pending.
    Idle,
    /// A substitution of `size` copies of `substitute`, `remaining` of which
    /// have not been taken yet.
    Active {
        /// The character being emitted.
        substitute: char,
        /// Characters not yet taken, in `0..=size`.
        remaining: usize,
        /// Length of the substitution: 1 for a single code unit, 2 for a pair.
        size: usize,
    },
}

/// A [`FallbackBuffer`] that substitutes best-fit characters from a
/// [`MappingTable`].
#[derive(Debug, Clone)]
pub struct BestFitBuffer<'a> {
    table: &'a MappingTable,
    state: BufferState,
}

impl<'a> BestFitBuffer<'a> {
    /// Create an idle buffer over `table`.
    pub fn new(table: &'a MappingTable) -> Self {
        Self {
            table,
            state: BufferState::Idle,
        }
    }

    /// The current state.
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// The table substitutes come from.
    pub fn table(&self) -> &'a MappingTable {
        self.table
    }

    fn begin(&mut self, substitute: char, size: usize) {
        if let BufferState::Active {
            substitute: pending,
            remaining,
            ..
        } = self.state
        {
            assert!(
                remaining == 0,
                "recursive fallback: substitute U+{:04X} has {remaining} character(s) pending",
                u32::from(pending)
            );
        }
        self.state = BufferState::Active {
            substitute,
            remaining: size,
            size,
        };
    }
}

impl FallbackBuffer for BestFitBuffer<'_> {
    fn fallback(&mut self, unknown: u16) -> char {
        let substitute = match self.table.lookup(unknown) {
            Some(ch) if ch != '\0' => ch,
            _ => PLACEHOLDER,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(source = unknown, %substitute, "best-fit substitution");
        self.begin(substitute, 1);
        substitute
    }

    fn fallback_pair(&mut self, high: u16, low: u16) -> Result<[char; 2], FallbackError> {
        check_surrogate_pair(high, low)?;
        // supplementary characters never have a best fit
        self.begin(PLACEHOLDER, 2);
        Ok([PLACEHOLDER; 2])
    }

    fn next_char(&mut self) -> Option<char> {
        match self.state {
            BufferState::Idle => None,
            BufferState::Active {
                substitute,
                remaining,
                size,
            } => match remaining.checked_sub(1) {
                Some(remaining) => {
                    self.state = BufferState::Active {
                        substitute,
                        remaining,
                        size,
                    };
                    Some(substitute)
                }
                None => {
                    self.state = BufferState::Idle;
                    None
                }
            },
        }
    }

    fn move_previous(&mut self) -> bool {
        match &mut self.state {
            BufferState::Active {
                remaining, size, ..
            } if *remaining < *size => {
                *remaining += 1;
                true
            }
            _ => false,
        }
    }

    fn remaining(&self) -> usize {
        match self.state {
            BufferState::Idle => 0,
            BufferState::Active { remaining, .. } => remaining,
        }
    }

    fn reset(&mut self) {
        self.state = BufferState::Idle;
    }
}
