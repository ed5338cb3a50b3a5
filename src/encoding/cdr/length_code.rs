// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! XCDR2 EMHEADER length-code table.
//!
//! An XCDR2 member header encodes the member's size either implicitly
//! (derived from the member's own primitive width, codes 0-3) or
//! explicitly via a trailing inline `uint32` (codes 4-7). Codes 6 and 7
//! additionally scale that inline value by 4 or 8, letting a single
//! `uint32` address member bodies too large to size directly.

use crate::core::CdrError;

/// How an XCDR2 EMHEADER's `object_size` field should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthCode {
    /// Size is implied to be 1 byte; no inline length follows.
    Implied1,
    /// Size is implied to be 2 bytes; no inline length follows.
    Implied2,
    /// Size is implied to be 4 bytes; no inline length follows.
    Implied4,
    /// Size is implied to be 8 bytes; no inline length follows.
    Implied8,
    /// An inline `uint32` gives the size in bytes. Used when the member
    /// body itself supplies its own length (e.g. a nested DHEADER);
    /// writers may elide the redundant inline word for this code.
    Nested,
    /// An inline `uint32` gives the size in bytes. The writer's default
    /// explicit code when no implied width matches.
    Explicit,
    /// An inline `uint32` gives the size in 4-byte units (size = value * 4).
    ExplicitTimes4,
    /// An inline `uint32` gives the size in 8-byte units (size = value * 8).
    ExplicitTimes8,
}

impl LengthCode {
    /// Decode the 3-bit length code (0-7) found in an EMHEADER.
    pub fn from_code(code: u8) -> Result<Self, CdrError> {
        use LengthCode::*;
        Ok(match code {
            0 => Implied1,
            1 => Implied2,
            2 => Implied4,
            3 => Implied8,
            4 => Nested,
            5 => Explicit,
            6 => ExplicitTimes4,
            7 => ExplicitTimes8,
            other => {
                return Err(CdrError::MalformedHeader {
                    offset: 0,
                    reason: format!("length code {other} out of range 0..=7"),
                })
            }
        })
    }

    /// The 3-bit code this variant serializes to.
    #[must_use]
    pub const fn as_code(self) -> u8 {
        use LengthCode::*;
        match self {
            Implied1 => 0,
            Implied2 => 1,
            Implied4 => 2,
            Implied8 => 3,
            Nested => 4,
            Explicit => 5,
            ExplicitTimes4 => 6,
            ExplicitTimes8 => 7,
        }
    }

    /// Whether a reader must consume a trailing inline `uint32` for this code.
    #[must_use]
    pub const fn has_inline_length(self) -> bool {
        self.as_code() >= 4
    }

    /// The implied member size in bytes, for codes 0-3. `None` for explicit codes.
    #[must_use]
    pub const fn implied_size(self) -> Option<usize> {
        use LengthCode::*;
        match self {
            Implied1 => Some(1),
            Implied2 => Some(2),
            Implied4 => Some(4),
            Implied8 => Some(8),
            _ => None,
        }
    }

    /// Resolve an `object_size` in bytes from this code's inline `uint32` value.
    #[must_use]
    pub const fn resolve_object_size(self, inline_value: u32) -> u32 {
        use LengthCode::*;
        match self {
            ExplicitTimes4 => inline_value.saturating_mul(4),
            ExplicitTimes8 => inline_value.saturating_mul(8),
            _ => inline_value,
        }
    }

    /// Resolve the code that implies a primitive of the given width, if any.
    #[must_use]
    pub const fn for_primitive_width(width: usize) -> Option<Self> {
        match width {
            1 => Some(LengthCode::Implied1),
            2 => Some(LengthCode::Implied2),
            4 => Some(LengthCode::Implied4),
            8 => Some(LengthCode::Implied8),
            _ => None,
        }
    }

    /// Pick the smallest valid code for an explicit `object_size`, per
    /// the writer's default selection rule: an implied code if the size
    /// matches one exactly, otherwise the general explicit code 5.
    #[must_use]
    pub const fn infer(object_size: u32) -> Self {
        match Self::for_primitive_width(object_size as usize) {
            Some(code) => code,
            None => LengthCode::Explicit,
        }
    }

    /// Validate that `object_size` is representable by this code's
    /// inline-value encoding (only meaningful for codes 0..=3 and 6..=7,
    /// which constrain the value; codes 4 and 5 accept any size).
    #[must_use]
    pub const fn validates(self, object_size: u32) -> bool {
        use LengthCode::*;
        match self {
            Implied1 => object_size == 1,
            Implied2 => object_size == 2,
            Implied4 => object_size == 4,
            Implied8 => object_size == 8,
            ExplicitTimes4 => object_size % 4 == 0,
            ExplicitTimes8 => object_size % 8 == 0,
            Nested | Explicit => true,
        }
    }
}
