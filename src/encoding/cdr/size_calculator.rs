// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR size calculator: mirrors [`crate::encoding::cdr::writer::CdrWriter`]'s
//! alignment and header bookkeeping without allocating or writing any
//! bytes, for pre-sizing a buffer before encoding.

use crate::core::CdrError;
use crate::encoding::cdr::align::padding;
use crate::encoding::cdr::encapsulation::EncapsulationKind;
use crate::encoding::cdr::length_code::LengthCode;
use crate::encoding::cdr::member::{EXTENDED_PID, SENTINEL_PID};
use crate::encoding::cdr::reader::CDR_HEADER_SIZE;

/// Offset-only mirror of [`crate::encoding::cdr::writer::CdrWriter`].
///
/// Every method name and alignment rule matches the writer's; a caller
/// that walks the same sequence of calls on both will get back a
/// calculator size equal to the writer's final `size()`.
#[derive(Debug, Clone)]
pub struct CdrSizeCalculator {
    offset: usize,
    origin: usize,
    /// The origin a top-level XCDR1 sentinel restores, i.e. the origin
    /// this calculator was constructed with.
    base_origin: usize,
    kind: EncapsulationKind,
}

impl Default for CdrSizeCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl CdrSizeCalculator {
    /// Create a calculator for the default encapsulation (classic CDR, little-endian).
    #[must_use]
    pub fn new() -> Self {
        Self::with_kind(EncapsulationKind::default())
    }

    /// Create a calculator that accounts for the given encapsulation's
    /// alignment rules, starting past the 4-byte header.
    #[must_use]
    pub fn with_kind(kind: EncapsulationKind) -> Self {
        Self {
            offset: CDR_HEADER_SIZE,
            origin: CDR_HEADER_SIZE,
            base_origin: CDR_HEADER_SIZE,
            kind,
        }
    }

    /// Create a calculator with no encapsulation header counted.
    #[must_use]
    pub fn new_headerless(kind: EncapsulationKind) -> Self {
        Self {
            offset: 0,
            origin: 0,
            base_origin: 0,
            kind,
        }
    }

    /// The current calculated size, in bytes.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.offset
    }

    /// Reset to the initial state for this calculator's encapsulation.
    pub fn reset(&mut self) {
        let header = if self.base_origin == 0 { 0 } else { CDR_HEADER_SIZE };
        self.offset = header;
        self.origin = header;
        self.base_origin = header;
    }

    /// Reset the origin to the current offset, as a PL_CDR member
    /// header or sentinel would.
    pub fn reset_origin(&mut self) {
        self.origin = self.offset;
    }

    fn align(&mut self, unit: usize) {
        self.offset += padding(self.offset, self.origin, unit);
    }

    /// Account for a single byte.
    pub fn u8(&mut self) -> usize {
        self.offset += 1;
        self.offset
    }

    /// Account for a signed byte.
    pub fn i8(&mut self) -> usize {
        self.u8()
    }

    /// Account for a u16, aligned to a 2-byte boundary.
    pub fn u16(&mut self) -> usize {
        self.align(2);
        self.offset += 2;
        self.offset
    }

    /// Account for an i16, aligned to a 2-byte boundary.
    pub fn i16(&mut self) -> usize {
        self.u16()
    }

    /// Account for a u32, aligned to a 4-byte boundary.
    pub fn u32(&mut self) -> usize {
        self.align(4);
        self.offset += 4;
        self.offset
    }

    /// Account for an i32, aligned to a 4-byte boundary.
    pub fn i32(&mut self) -> usize {
        self.u32()
    }

    /// Account for a u64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn u64(&mut self) -> usize {
        self.align(self.kind.eight_byte_alignment());
        self.offset += 8;
        self.offset
    }

    /// Account for an i64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn i64(&mut self) -> usize {
        self.u64()
    }

    /// Account for an f32, aligned to a 4-byte boundary.
    pub fn f32(&mut self) -> usize {
        self.align(4);
        self.offset += 4;
        self.offset
    }

    /// Account for an f64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn f64(&mut self) -> usize {
        self.align(self.kind.eight_byte_alignment());
        self.offset += 8;
        self.offset
    }

    /// Account for a bool (one byte).
    pub fn bool(&mut self) -> usize {
        self.u8()
    }

    /// Account for `count` raw bytes, with no alignment.
    pub fn raw_bytes(&mut self, count: usize) -> usize {
        self.offset += count;
        self.offset
    }

    /// Account for a length-prefixed string of `length` content bytes
    /// (not including the null terminator).
    pub fn string(&mut self, length: usize) -> usize {
        self.u32();
        self.offset += length + 1;
        self.offset
    }

    /// Account for a `uint32` sequence length prefix.
    pub fn sequence_length(&mut self) -> usize {
        self.u32()
    }

    /// Account for a sequence of `count` raw `u8` bytes, with no
    /// per-element alignment. Mirrors [`crate::encoding::cdr::writer::CdrWriter::u8_array`].
    pub fn u8_array(&mut self, count: usize) -> usize {
        self.raw_bytes(count)
    }

    /// Account for a sequence of `count` `u32` elements, each individually
    /// aligned. Alignment is emitted even when `count` is zero, mirroring
    /// [`crate::encoding::cdr::writer::CdrWriter::u32_array`].
    pub fn u32_array(&mut self, count: usize) -> usize {
        self.align(4);
        for _ in 0..count {
            self.u32();
        }
        self.offset
    }

    /// Account for a sequence of `count` `f32` elements, each individually
    /// aligned. Alignment is emitted even when `count` is zero, mirroring
    /// [`crate::encoding::cdr::writer::CdrWriter::f32_array`].
    pub fn f32_array(&mut self, count: usize) -> usize {
        self.align(4);
        for _ in 0..count {
            self.f32();
        }
        self.offset
    }

    /// Account for a sequence of `count` `f64` elements, each individually
    /// aligned. Alignment is emitted even when `count` is zero, mirroring
    /// [`crate::encoding::cdr::writer::CdrWriter::f64_array`].
    pub fn f64_array(&mut self, count: usize) -> usize {
        self.align(self.kind.eight_byte_alignment());
        for _ in 0..count {
            self.f64();
        }
        self.offset
    }

    /// Account for a sequence of length-prefixed strings, given each
    /// string's content length (not including the null terminator).
    /// Mirrors [`crate::encoding::cdr::writer::CdrWriter::string_array`].
    pub fn string_array(&mut self, lengths: &[usize]) -> usize {
        for &length in lengths {
            self.string(length);
        }
        self.offset
    }

    /// Account for a `uint32` sequence length, then `count` raw `u8` bytes.
    pub fn u8_sequence(&mut self, count: usize) -> usize {
        self.sequence_length();
        self.u8_array(count)
    }

    /// Account for a `uint32` sequence length, then `count` `u32` elements.
    pub fn u32_sequence(&mut self, count: usize) -> usize {
        self.sequence_length();
        self.u32_array(count)
    }

    /// Account for a `uint32` sequence length, then `count` `f32` elements.
    pub fn f32_sequence(&mut self, count: usize) -> usize {
        self.sequence_length();
        self.f32_array(count)
    }

    /// Account for a `uint32` sequence length, then `count` `f64` elements.
    pub fn f64_sequence(&mut self, count: usize) -> usize {
        self.sequence_length();
        self.f64_array(count)
    }

    /// Account for a `uint32` sequence length, then `lengths.len()`
    /// length-prefixed strings with the given content lengths.
    pub fn string_sequence(&mut self, lengths: &[usize]) -> usize {
        self.sequence_length();
        self.string_array(lengths)
    }

    /// Account for a fixed-size array: a length prefix followed by
    /// `count` elements of `element_size` bytes, each aligned to
    /// `element_alignment`.
    pub fn array(&mut self, count: usize, element_size: usize, element_alignment: usize) -> usize {
        self.sequence_length();
        for _ in 0..count {
            self.align(element_alignment);
            self.offset += element_size;
        }
        self.offset
    }

    /// Account for an XCDR2 DHEADER (a plain `uint32`).
    pub fn d_header(&mut self) -> usize {
        self.u32()
    }

    /// Account for an XCDR1 parameter-list short-form member header.
    pub fn pid_header(&mut self) -> usize {
        self.align(4);
        self.u16();
        self.u16();
        self.reset_origin();
        self.offset
    }

    /// Account for an XCDR1 extended-form member header.
    pub fn extended_pid_header(&mut self) -> usize {
        self.align(4);
        self.u16();
        self.u16();
        self.u32();
        self.u32();
        self.reset_origin();
        self.offset
    }

    /// Account for the XCDR1 sentinel header. A no-op under XCDR2, which
    /// has no sentinel concept.
    pub fn sentinel_header(&mut self) -> usize {
        if self.kind.info().is_cdr2 {
            return self.offset;
        }
        self.align(4);
        self.u16();
        self.u16();
        self.origin = self.base_origin;
        self.offset
    }

    /// Account for an XCDR2 EMHEADER, including its inline length when
    /// `length_code` carries one.
    pub fn em_header_sized(&mut self, length_code: LengthCode) -> usize {
        self.u32();
        if length_code.has_inline_length() {
            self.u32();
        }
        self.offset
    }

    /// Account for a member header, dispatching on this calculator's
    /// encapsulation the same way
    /// [`crate::encoding::cdr::writer::CdrWriter::em_header`] dispatches
    /// when it writes one: XCDR1 short or extended PID form, or an
    /// XCDR2 EMHEADER with the smallest length code that represents
    /// `object_size` unless the caller pins one explicitly.
    pub fn em_header(
        &mut self,
        pid: u32,
        object_size: u32,
        length_code: Option<LengthCode>,
    ) -> Result<usize, CdrError> {
        if self.kind.info().is_cdr2 {
            let code = length_code.unwrap_or_else(|| LengthCode::infer(object_size));
            if !code.validates(object_size) {
                tracing::debug!(offset = self.offset, ?code, object_size, "rejecting malformed XCDR2 EMHEADER");
                return Err(CdrError::MalformedHeader {
                    offset: self.offset,
                    reason: format!(
                        "length code {code:?} cannot represent object_size {object_size}"
                    ),
                });
            }
            Ok(self.em_header_sized(code))
        } else {
            let fits_short = pid <= 0x3FFF
                && object_size <= 0xFFFF
                && pid != u32::from(EXTENDED_PID)
                && pid != u32::from(SENTINEL_PID);
            if fits_short {
                Ok(self.pid_header())
            } else {
                Ok(self.extended_pid_header())
            }
        }
    }
}
