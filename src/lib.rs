// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # cdr-wire
//!
//! A CDR/XCDR1/XCDR2 wire codec for DDS and ROS 2 messages.
//!
//! This crate implements the OMG Common Data Representation family of
//! wire formats used by RTPS, DDS, and ROS 2: classic CDR v1, XCDR1
//! parameter-list encoding (PL_CDR), and XCDR2 (plain, delimited, and
//! PL_CDR2), including their RTPS-tagged encapsulation variants.
//!
//! Three cooperating engines share one alignment-and-encapsulation model:
//! - **[`CdrReader`]** - decodes CDR-family data from a borrowed buffer,
//!   returning zero-copy array views where the wire byte order and
//!   element alignment allow it
//! - **[`CdrWriter`]** - encodes CDR-family data into a growable buffer
//! - **[`CdrSizeCalculator`]** - mirrors the writer's bookkeeping to
//!   pre-size a buffer without allocating or writing any bytes
//!
//! ## Example: decoding a CDR message
//!
//! ```rust
//! use cdr_wire::CdrReader;
//!
//! let data = [0x00, 0x01, 0x00, 0x00, 0x2A, 0x00, 0x00, 0x00];
//! let mut reader = CdrReader::new(&data)?;
//! assert_eq!(reader.u32()?, 42);
//! # Ok::<(), cdr_wire::CdrError>(())
//! ```
//!
//! ## Example: encoding a CDR message
//!
//! ```rust
//! use cdr_wire::CdrWriter;
//!
//! let mut writer = CdrWriter::new();
//! writer.u32(42).string("hello");
//! let data = writer.finish();
//! ```

pub mod core;
pub mod encoding;

pub use core::{CdrError, Result};
pub use encoding::{
    CdrReader, CdrSizeCalculator, CdrWriter, CowArray, EmHeader, EncapsulationInfo,
    EncapsulationKind, LengthCode, MemberHeader, Pid,
};
