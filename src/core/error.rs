// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Error types for the CDR wire codec.

use thiserror::Error;

/// Errors produced while parsing or emitting CDR-family wire data.
///
/// Every variant carries the byte offset at which the failure was
/// detected so a caller can correlate it with a hex dump of the buffer
/// without a second decoding pass.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CdrError {
    /// Fewer than 4 bytes were available to parse the encapsulation header.
    #[error("buffer too short for CDR header: need 4 bytes, got {available}")]
    ShortHeader {
        /// Number of bytes actually available.
        available: usize,
    },

    /// The encapsulation kind byte did not match any known tag.
    #[error("unsupported encapsulation kind 0x{kind:02x}")]
    UnsupportedEncapsulation {
        /// The offending kind byte.
        kind: u8,
    },

    /// A read, seek, or limit target fell outside the visible buffer.
    #[error(
        "out of bounds: requested {requested} byte(s) at offset {offset}, {available} available"
    )]
    OutOfBounds {
        /// Bytes requested by the operation.
        requested: usize,
        /// Bytes actually available from `offset`.
        available: usize,
        /// Offset at which the operation was attempted.
        offset: usize,
    },

    /// `limit()` was asked to grow the visible range instead of shrinking it.
    #[error("limit can only shrink: current limit is {current}, requested {requested}")]
    LimitExceeded {
        /// The limit currently in effect.
        current: usize,
        /// The limit that was requested.
        requested: usize,
    },

    /// A string's payload bytes were not valid UTF-8.
    #[error("invalid UTF-8 in string at offset {offset}")]
    Encoding {
        /// Offset of the string's first content byte.
        offset: usize,
    },

    /// An XCDR1 PID was reserved or marked implementation-specific.
    #[error("reserved or implementation-specific PID 0x{pid:04x} at offset {offset}")]
    ReservedPid {
        /// The offending 14-bit PID value.
        pid: u32,
        /// Offset of the member header.
        offset: usize,
    },

    /// `sentinel_header()` did not find a sentinel PID.
    #[error("expected PL_CDR sentinel at offset {offset}, found PID 0x{found:04x}")]
    ExpectedSentinel {
        /// Offset of the header that should have been a sentinel.
        offset: usize,
        /// The PID that was actually read.
        found: u32,
    },

    /// An XCDR2 EMHEADER carried an invalid length code, or a length
    /// code was combined with an `object_size` it cannot represent.
    #[error("malformed XCDR2 header at offset {offset}: {reason}")]
    MalformedHeader {
        /// Offset of the malformed header.
        offset: usize,
        /// Human-readable explanation.
        reason: String,
    },
}

/// Result type alias used throughout the codec.
pub type Result<T> = std::result::Result<T, CdrError>;
