// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Encapsulation kind table.
//!
//! Maps the one-byte encapsulation tag that prefixes every CDR-family
//! message to the four capability flags the rest of the codec needs:
//! byte order, XCDR1-vs-XCDR2 alignment rules, and whether a delimiter
//! or member header precedes the payload.

use crate::core::CdrError;

/// The encapsulation kind recorded in byte 1 of the 4-byte CDR header.
///
/// Ten logical kinds are representable twice: once as a "plain" DDS
/// encapsulation tag, and once with RTPS framing (the same semantics,
/// offset by 16). The RTPS range skips 20 and 21, mirroring the
/// reserved 4/5 gap in the plain range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EncapsulationKind {
    /// Classic CDR v1, big-endian.
    CdrBe = 0,
    /// Classic CDR v1, little-endian.
    CdrLe = 1,
    /// Parameter-list CDR v1, big-endian.
    PlCdrBe = 2,
    /// Parameter-list CDR v1, little-endian.
    PlCdrLe = 3,
    /// Plain XCDR2, big-endian.
    Cdr2Be = 6,
    /// Plain XCDR2, little-endian.
    Cdr2Le = 7,
    /// Parameter-list XCDR2, big-endian.
    PlCdr2Be = 8,
    /// Parameter-list XCDR2, little-endian.
    PlCdr2Le = 9,
    /// Delimited XCDR2, big-endian.
    DelimitedCdr2Be = 10,
    /// Delimited XCDR2, little-endian.
    DelimitedCdr2Le = 11,
    /// RTPS-framed classic CDR v1, big-endian.
    RtpsCdrBe = 16,
    /// RTPS-framed classic CDR v1, little-endian.
    RtpsCdrLe = 17,
    /// RTPS-framed parameter-list CDR v1, big-endian.
    RtpsPlCdrBe = 18,
    /// RTPS-framed parameter-list CDR v1, little-endian.
    RtpsPlCdrLe = 19,
    /// RTPS-framed plain XCDR2, big-endian.
    RtpsCdr2Be = 22,
    /// RTPS-framed plain XCDR2, little-endian.
    RtpsCdr2Le = 23,
    /// RTPS-framed parameter-list XCDR2, big-endian.
    RtpsPlCdr2Be = 24,
    /// RTPS-framed parameter-list XCDR2, little-endian.
    RtpsPlCdr2Le = 25,
    /// RTPS-framed delimited XCDR2, big-endian.
    RtpsDelimitedCdr2Be = 26,
    /// RTPS-framed delimited XCDR2, little-endian.
    RtpsDelimitedCdr2Le = 27,
}

/// Capability flags resolved from an [`EncapsulationKind`].
///
/// Frozen at reader/writer construction time and never re-derived from
/// a schema — every method that needs one of these consults the
/// cached copy instead of re-matching the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncapsulationInfo {
    /// Whether multi-byte primitives are little-endian.
    pub little_endian: bool,
    /// Whether this is an XCDR2 (as opposed to XCDR1/classic CDR) encapsulation.
    pub is_cdr2: bool,
    /// Whether the payload opens with an XCDR2 DHEADER.
    pub uses_delimiter_header: bool,
    /// Whether members are prefixed by a PID/EMHEADER and terminated by a sentinel (XCDR1) or EMHEADER (XCDR2).
    pub uses_member_header: bool,
}

impl EncapsulationKind {
    /// Parse a raw encapsulation kind byte.
    pub fn from_u8(kind: u8) -> Result<Self, CdrError> {
        use EncapsulationKind::*;
        Ok(match kind {
            0 => CdrBe,
            1 => CdrLe,
            2 => PlCdrBe,
            3 => PlCdrLe,
            6 => Cdr2Be,
            7 => Cdr2Le,
            8 => PlCdr2Be,
            9 => PlCdr2Le,
            10 => DelimitedCdr2Be,
            11 => DelimitedCdr2Le,
            16 => RtpsCdrBe,
            17 => RtpsCdrLe,
            18 => RtpsPlCdrBe,
            19 => RtpsPlCdrLe,
            22 => RtpsCdr2Be,
            23 => RtpsCdr2Le,
            24 => RtpsPlCdr2Be,
            25 => RtpsPlCdr2Le,
            26 => RtpsDelimitedCdr2Be,
            27 => RtpsDelimitedCdr2Le,
            other => return Err(CdrError::UnsupportedEncapsulation { kind: other }),
        })
    }

    /// The raw one-byte tag for this kind.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Resolve the four capability flags for this kind.
    #[must_use]
    pub const fn info(self) -> EncapsulationInfo {
        use EncapsulationKind::*;
        let little_endian = matches!(
            self,
            CdrLe | PlCdrLe
                | Cdr2Le
                | PlCdr2Le
                | DelimitedCdr2Le
                | RtpsCdrLe
                | RtpsPlCdrLe
                | RtpsCdr2Le
                | RtpsPlCdr2Le
                | RtpsDelimitedCdr2Le
        );
        let is_cdr2 = matches!(
            self,
            Cdr2Be
                | Cdr2Le
                | PlCdr2Be
                | PlCdr2Le
                | DelimitedCdr2Be
                | DelimitedCdr2Le
                | RtpsCdr2Be
                | RtpsCdr2Le
                | RtpsPlCdr2Be
                | RtpsPlCdr2Le
                | RtpsDelimitedCdr2Be
                | RtpsDelimitedCdr2Le
        );
        let uses_delimiter_header = matches!(
            self,
            DelimitedCdr2Be | DelimitedCdr2Le | RtpsDelimitedCdr2Be | RtpsDelimitedCdr2Le
        );
        let uses_member_header = matches!(
            self,
            PlCdrBe
                | PlCdrLe
                | PlCdr2Be
                | PlCdr2Le
                | RtpsPlCdrBe
                | RtpsPlCdrLe
                | RtpsPlCdr2Be
                | RtpsPlCdr2Le
        );
        EncapsulationInfo {
            little_endian,
            is_cdr2,
            uses_delimiter_header,
            uses_member_header,
        }
    }

    /// 8-byte alignment unit: 8 for classic/XCDR1, 4 for XCDR2.
    #[must_use]
    pub const fn eight_byte_alignment(self) -> usize {
        if self.info().is_cdr2 {
            4
        } else {
            8
        }
    }
}

impl Default for EncapsulationKind {
    fn default() -> Self {
        EncapsulationKind::CdrLe
    }
}
