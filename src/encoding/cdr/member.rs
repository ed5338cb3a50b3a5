// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Member header types shared by the XCDR1 parameter-list format and
//! the XCDR2 EMHEADER/DHEADER format.

use crate::encoding::cdr::length_code::LengthCode;

/// Marks the end of an XCDR1 parameter list.
pub const SENTINEL_PID: u16 = 0x3F02;

/// Marks that the following bytes carry a 32-bit PID and a 32-bit
/// length, instead of the short 2+2 byte form.
pub const EXTENDED_PID: u16 = 0x3F01;

/// Low-14-bit value of [`SENTINEL_PID`], used once flags are masked off.
pub const SENTINEL_PID_LOW14: u32 = (SENTINEL_PID & 0x3FFF) as u32;

/// Low-14-bit value of [`EXTENDED_PID`], used once flags are masked off.
pub const EXTENDED_PID_LOW14: u32 = (EXTENDED_PID & 0x3FFF) as u32;

/// A decoded XCDR1 parameter-list member header (short or extended form),
/// or the sentinel that terminates the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pid {
    /// The 14-bit (short form) or 32-bit (extended form) parameter id.
    pub id: u32,
    /// Declared length of the member payload, in bytes.
    pub object_size: u32,
    /// Whether readers must understand this member or may skip it.
    pub must_understand: bool,
    /// Whether this header was the end-of-list sentinel rather than a real member.
    pub read_sentinel_header: bool,
}

impl Pid {
    /// Whether this header is the end-of-list sentinel.
    #[must_use]
    pub fn is_sentinel(self) -> bool {
        self.read_sentinel_header
    }
}

/// A parsed XCDR2 EMHEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmHeader {
    /// Member id (28 bits).
    pub member_id: u32,
    /// Whether readers must understand this member or may skip it.
    pub must_understand: bool,
    /// How to interpret `object_size` below.
    pub length_code: LengthCode,
    /// Member payload size in bytes, fully resolved from `length_code`
    /// and any inline length word.
    pub object_size: u32,
}

impl EmHeader {
    /// The member's resolved payload size, as an `Option` for symmetry
    /// with call sites that also handle the XCDR1 [`Pid`] form.
    #[must_use]
    pub fn resolved_size(&self) -> Option<u32> {
        Some(self.object_size)
    }
}

/// A decoded member header in the form common to both XCDR1 PL_CDR
/// (short/extended PID) and XCDR2 EMHEADER, as produced by
/// [`crate::encoding::cdr::reader::CdrReader::em_header`].
///
/// `length_code` and `read_sentinel_header` are only meaningful for
/// the form that produced them: XCDR2 headers never set a sentinel
/// flag, and XCDR1 headers never carry a length code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberHeader {
    /// Parameter id (XCDR1) or member id (XCDR2).
    pub id: u32,
    /// Resolved payload size in bytes.
    pub object_size: u32,
    /// Whether readers must understand this member or may skip it.
    pub must_understand: bool,
    /// The XCDR2 length code, if this header came from an EMHEADER.
    pub length_code: Option<u8>,
    /// Whether this header was the XCDR1 sentinel rather than a real member.
    pub read_sentinel_header: Option<bool>,
}

impl MemberHeader {
    /// Whether this header is the XCDR1 end-of-list sentinel.
    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        self.read_sentinel_header.unwrap_or(false)
    }
}

impl From<Pid> for MemberHeader {
    fn from(pid: Pid) -> Self {
        MemberHeader {
            id: pid.id,
            object_size: pid.object_size,
            must_understand: pid.must_understand,
            length_code: None,
            read_sentinel_header: Some(pid.read_sentinel_header),
        }
    }
}

impl From<EmHeader> for MemberHeader {
    fn from(em: EmHeader) -> Self {
        MemberHeader {
            id: em.member_id,
            object_size: em.object_size,
            must_understand: em.must_understand,
            length_code: Some(em.length_code.as_code()),
            read_sentinel_header: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_pid_detected() {
        let sentinel = Pid {
            id: SENTINEL_PID_LOW14,
            object_size: 0,
            must_understand: false,
            read_sentinel_header: true,
        };
        assert!(sentinel.is_sentinel());
    }

    #[test]
    fn non_sentinel_pid_not_detected() {
        let member = Pid {
            id: 7,
            object_size: 4,
            must_understand: true,
            read_sentinel_header: false,
        };
        assert!(!member.is_sentinel());
    }

    #[test]
    fn em_header_carries_resolved_size() {
        let header = EmHeader {
            member_id: 5,
            must_understand: true,
            length_code: LengthCode::ExplicitTimes4,
            object_size: 20,
        };
        assert_eq!(header.object_size, 20);
    }

    #[test]
    fn member_header_from_pid_carries_sentinel_flag() {
        let sentinel = Pid {
            id: SENTINEL_PID_LOW14,
            object_size: 0,
            must_understand: false,
            read_sentinel_header: true,
        };
        let member: MemberHeader = sentinel.into();
        assert!(member.is_sentinel());
        assert_eq!(member.length_code, None);
    }

    #[test]
    fn member_header_from_em_header_carries_length_code() {
        let em = EmHeader {
            member_id: 9,
            must_understand: false,
            length_code: LengthCode::Implied4,
            object_size: 4,
        };
        let member: MemberHeader = em.into();
        assert!(!member.is_sentinel());
        assert_eq!(member.length_code, Some(LengthCode::Implied4.as_code()));
        assert_eq!(member.object_size, 4);
    }
}
