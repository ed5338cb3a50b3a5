// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Wire codec implementations.
//!
//! - [`cdr`] - CDR/XCDR1/XCDR2 encoding, decoding, and size calculation

pub mod cdr;

pub use cdr::{
    CdrReader, CdrSizeCalculator, CdrWriter, CowArray, EmHeader, EncapsulationInfo,
    EncapsulationKind, LengthCode, MemberHeader, Pid,
};
