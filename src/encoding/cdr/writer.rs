// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR writer for encoding CDR/XCDR1/XCDR2 data with proper alignment.

use crate::core::CdrError;
use crate::encoding::cdr::align::padding;
use crate::encoding::cdr::encapsulation::EncapsulationKind;
use crate::encoding::cdr::length_code::LengthCode;
use crate::encoding::cdr::member::{EXTENDED_PID, SENTINEL_PID};
use crate::encoding::cdr::reader::CDR_HEADER_SIZE;

/// Default initial capacity for the writer buffer.
const DEFAULT_CAPACITY: usize = 16;

/// CDR writer that emits CDR/XCDR1/XCDR2-encoded data with proper alignment.
///
/// Mirrors [`crate::encoding::cdr::reader::CdrReader`]'s alignment model:
/// offsets are tracked relative to a movable origin, and the origin
/// resets whenever a PL_CDR member header or sentinel is emitted. The
/// underlying buffer grows by doubling, the same amortized strategy
/// the reader's sibling encoder used.
pub struct CdrWriter {
    buffer: Vec<u8>,
    offset: usize,
    origin: usize,
    /// The origin a top-level XCDR1 sentinel restores, i.e. the origin
    /// this writer was constructed with.
    base_origin: usize,
    kind: EncapsulationKind,
}

impl Default for CdrWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CdrWriter {
    /// Create a new writer with the default encapsulation (classic CDR, little-endian).
    #[must_use]
    pub fn new() -> Self {
        Self::with_kind(EncapsulationKind::default())
    }

    /// Create a new writer that emits the given encapsulation kind,
    /// writing its 4-byte header immediately.
    #[must_use]
    pub fn with_kind(kind: EncapsulationKind) -> Self {
        Self::with_capacity(kind, DEFAULT_CAPACITY)
    }

    /// Create a writer that emits the given encapsulation kind, with the
    /// buffer pre-allocated to `capacity` bytes up front. Use this when the
    /// final size is already known (e.g. from a [`crate::encoding::cdr::size_calculator::CdrSizeCalculator`]
    /// pass) to avoid the buffer's amortized-doubling growth entirely.
    #[must_use]
    pub fn with_capacity(kind: EncapsulationKind, capacity: usize) -> Self {
        let mut buffer = Vec::with_capacity(DEFAULT_CAPACITY);
        buffer.push(0);
        buffer.push(kind.as_u8());
        buffer.push(0);
        buffer.push(0);
        buffer.reserve(capacity.saturating_sub(DEFAULT_CAPACITY));
        tracing::trace!(kind = ?kind, capacity, "constructed CDR writer");
        Self {
            buffer,
            offset: CDR_HEADER_SIZE,
            origin: CDR_HEADER_SIZE,
            base_origin: CDR_HEADER_SIZE,
            kind,
        }
    }

    /// Create a writer with no encapsulation header at all, for
    /// embedding CDR payloads inside an outer framing format.
    #[must_use]
    pub fn new_headerless(kind: EncapsulationKind) -> Self {
        Self {
            buffer: Vec::with_capacity(DEFAULT_CAPACITY),
            offset: 0,
            origin: 0,
            base_origin: 0,
            kind,
        }
    }

    /// The encapsulation kind this writer emits.
    #[must_use]
    pub fn kind(&self) -> EncapsulationKind {
        self.kind
    }

    /// Current size of the encoded data, in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.offset
    }

    /// View of the bytes written so far.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.buffer[..self.offset]
    }

    /// Consume the writer and return the encoded buffer.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        let mut buffer = self.buffer;
        buffer.truncate(self.offset);
        buffer
    }

    /// Reset the origin to the current offset. Called when entering a
    /// PL_CDR member's payload, so nested alignment is relative to the
    /// member's own start.
    pub fn reset_origin(&mut self) {
        self.origin = self.offset;
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.offset + additional;
        if needed > self.buffer.len() {
            self.buffer.resize(needed.max(self.buffer.len() * 2).max(1), 0);
        }
    }

    fn align(&mut self, unit: usize) {
        let pad = padding(self.offset, self.origin, unit);
        if pad > 0 {
            self.reserve(pad);
            self.offset += pad;
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.buffer[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    /// Write a single byte (no alignment).
    pub fn u8(&mut self, value: u8) -> &mut Self {
        self.reserve(1);
        self.buffer[self.offset] = value;
        self.offset += 1;
        self
    }

    /// Write a signed byte (no alignment).
    pub fn i8(&mut self, value: i8) -> &mut Self {
        self.u8(value as u8)
    }

    /// Write a u16, aligned to a 2-byte boundary.
    pub fn u16(&mut self, value: u16) -> &mut Self {
        self.align(2);
        let bytes = if self.kind.info().little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes(&bytes);
        self
    }

    /// Write an i16, aligned to a 2-byte boundary.
    pub fn i16(&mut self, value: i16) -> &mut Self {
        self.u16(value as u16)
    }

    /// Write a u32, aligned to a 4-byte boundary.
    pub fn u32(&mut self, value: u32) -> &mut Self {
        self.align(4);
        let bytes = if self.kind.info().little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes(&bytes);
        self
    }

    /// Write an i32, aligned to a 4-byte boundary.
    pub fn i32(&mut self, value: i32) -> &mut Self {
        self.u32(value as u32)
    }

    /// Write a u32 in big-endian byte order regardless of encapsulation
    /// byte order, for RTPS PID/EMHEADER fields fixed to network order.
    pub fn u32_be(&mut self, value: u32) -> &mut Self {
        self.align(4);
        self.write_bytes(&value.to_be_bytes());
        self
    }

    /// Write a u64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn u64(&mut self, value: u64) -> &mut Self {
        self.align(self.kind.eight_byte_alignment());
        let bytes = if self.kind.info().little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes(&bytes);
        self
    }

    /// Write an i64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn i64(&mut self, value: i64) -> &mut Self {
        self.u64(value as u64)
    }

    /// Write an f32, aligned to a 4-byte boundary.
    pub fn f32(&mut self, value: f32) -> &mut Self {
        self.align(4);
        let bytes = if self.kind.info().little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes(&bytes);
        self
    }

    /// Write an f64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn f64(&mut self, value: f64) -> &mut Self {
        self.align(self.kind.eight_byte_alignment());
        let bytes = if self.kind.info().little_endian {
            value.to_le_bytes()
        } else {
            value.to_be_bytes()
        };
        self.write_bytes(&bytes);
        self
    }

    /// Write a bool as a single byte, 1 for true and 0 for false.
    pub fn bool(&mut self, value: bool) -> &mut Self {
        self.u8(u8::from(value))
    }

    /// Write a raw byte slice with no alignment and no length prefix.
    pub fn raw_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_bytes(bytes);
        self
    }

    /// Write a length-prefixed UTF-8 string: `uint32(N+1)` followed by
    /// the string's bytes and a trailing NUL.
    pub fn string(&mut self, value: &str) -> &mut Self {
        let len = value.len() as u32 + 1;
        self.u32(len);
        self.write_bytes(value.as_bytes());
        self.u8(0);
        self
    }

    /// Write a `uint32` sequence length prefix.
    pub fn sequence_length(&mut self, count: u32) -> &mut Self {
        self.u32(count)
    }

    /// Write a sequence of length-prefixed strings.
    pub fn string_array<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        for value in values {
            self.string(value.as_ref());
        }
        self
    }

    /// Write a sequence of raw `u8` bytes with no per-element alignment.
    pub fn u8_array(&mut self, values: &[u8]) -> &mut Self {
        self.write_bytes(values);
        self
    }

    /// Write a sequence of `u32` elements, each individually aligned.
    /// Alignment is emitted even when `values` is empty, so a reader's
    /// `u32_array(0)` over the same buffer consumes the same padding.
    pub fn u32_array(&mut self, values: &[u32]) -> &mut Self {
        self.align(4);
        for &value in values {
            self.u32(value);
        }
        self
    }

    /// Write a sequence of `f32` elements, each individually aligned.
    /// Alignment is emitted even when `values` is empty, so a reader's
    /// `f32_array(0)` over the same buffer consumes the same padding.
    pub fn f32_array(&mut self, values: &[f32]) -> &mut Self {
        self.align(4);
        for &value in values {
            self.f32(value);
        }
        self
    }

    /// Write a sequence of `f64` elements, each individually aligned.
    /// Alignment is emitted even when `values` is empty, so a reader's
    /// `f64_array(0)` over the same buffer consumes the same padding.
    pub fn f64_array(&mut self, values: &[f64]) -> &mut Self {
        self.align(self.kind.eight_byte_alignment());
        for &value in values {
            self.f64(value);
        }
        self
    }

    /// Write a `uint32` sequence length, then `values` as a `u8` array.
    pub fn u8_sequence(&mut self, values: &[u8]) -> &mut Self {
        self.sequence_length(values.len() as u32);
        self.u8_array(values)
    }

    /// Write a `uint32` sequence length, then `values` as a `u32` array.
    pub fn u32_sequence(&mut self, values: &[u32]) -> &mut Self {
        self.sequence_length(values.len() as u32);
        self.u32_array(values)
    }

    /// Write a `uint32` sequence length, then `values` as an `f32` array.
    pub fn f32_sequence(&mut self, values: &[f32]) -> &mut Self {
        self.sequence_length(values.len() as u32);
        self.f32_array(values)
    }

    /// Write a `uint32` sequence length, then `values` as an `f64` array.
    pub fn f64_sequence(&mut self, values: &[f64]) -> &mut Self {
        self.sequence_length(values.len() as u32);
        self.f64_array(values)
    }

    /// Write a `uint32` sequence length, then `values` as a string array.
    pub fn string_sequence<S: AsRef<str>>(&mut self, values: &[S]) -> &mut Self {
        self.sequence_length(values.len() as u32);
        self.string_array(values)
    }

    /// Emit an XCDR2 DHEADER placeholder, run `body`, then backpatch the
    /// DHEADER with the number of bytes `body` wrote. Used for every
    /// delimited and PL_CDR2 aggregated-type payload.
    pub fn with_delimited_header<F>(&mut self, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let header_offset = self.offset;
        self.u32(0);
        let body_start = self.offset;
        body(self);
        let body_len = (self.offset - body_start) as u32;
        let bytes = if self.kind.info().little_endian {
            body_len.to_le_bytes()
        } else {
            body_len.to_be_bytes()
        };
        self.buffer[header_offset..header_offset + 4].copy_from_slice(&bytes);
        self
    }

    /// Write an XCDR1 parameter-list short-form member header (PID +
    /// length), resetting the origin so the member's payload aligns
    /// relative to its own start.
    pub fn pid_header(&mut self, id: u16, must_understand: bool, length: u16) -> &mut Self {
        self.align(4);
        let flags = if must_understand { 0x4000 } else { 0 };
        self.u16(id | flags);
        self.u16(length);
        self.reset_origin();
        self
    }

    /// Write an XCDR1 extended-form member header (32-bit PID + 32-bit
    /// length), for PIDs that don't fit the 14-bit short form.
    pub fn extended_pid_header(&mut self, id: u32, must_understand: bool, length: u32) -> &mut Self {
        self.align(4);
        let flags = if must_understand { 0x4000 } else { 0 };
        self.u16(EXTENDED_PID | flags);
        // The extended form's own header payload (the trailing pid+size
        // words) is always 8 bytes.
        self.u16(8);
        self.u32(id);
        self.u32(length);
        self.reset_origin();
        self
    }

    /// Write the XCDR1 parameter-list sentinel that terminates a PL_CDR
    /// member list. A no-op under XCDR2, which has no sentinel concept.
    pub fn sentinel_header(&mut self) -> &mut Self {
        if self.kind.info().is_cdr2 {
            return self;
        }
        self.align(4);
        self.u16(SENTINEL_PID);
        self.u16(0);
        self.origin = self.base_origin;
        self
    }

    /// Write a member header, dispatching on this writer's encapsulation
    /// the way [`crate::encoding::cdr::reader::CdrReader::em_header`]
    /// decodes it back: XCDR1 short or extended PID form, or an XCDR2
    /// EMHEADER with the smallest length code that represents
    /// `object_size` unless the caller pins one explicitly.
    ///
    /// Fails with [`CdrError::MalformedHeader`] if an explicit XCDR2
    /// `length_code` cannot represent `object_size` (e.g. `Implied4`
    /// requested for a 3-byte member, or `ExplicitTimes8` for a size
    /// that isn't a multiple of 8).
    pub fn em_header(
        &mut self,
        must_understand: bool,
        pid: u32,
        object_size: u32,
        length_code: Option<LengthCode>,
    ) -> Result<&mut Self, CdrError> {
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
            let inline_value = match code {
                LengthCode::ExplicitTimes4 => object_size / 4,
                LengthCode::ExplicitTimes8 => object_size / 8,
                _ => object_size,
            };
            self.write_em_header_word(pid, must_understand, code, inline_value);
        } else {
            let fits_short = pid <= 0x3FFF
                && object_size <= 0xFFFF
                && pid != u32::from(EXTENDED_PID)
                && pid != u32::from(SENTINEL_PID);
            if fits_short {
                self.pid_header(pid as u16, must_understand, object_size as u16);
            } else {
                self.extended_pid_header(pid, must_understand, object_size);
            }
        }
        Ok(self)
    }

    /// Emit an XCDR2 EMHEADER with an implied (non-inline) length code,
    /// for members whose size equals a fixed primitive width.
    pub fn em_header_implied(&mut self, member_id: u32, must_understand: bool, width: usize) -> &mut Self {
        let code = LengthCode::for_primitive_width(width).unwrap_or(LengthCode::Implied4);
        self.write_em_header_word(member_id, must_understand, code, 0)
    }

    /// Emit an XCDR2 EMHEADER with an explicit inline length, run
    /// `body`, then backpatch the inline length with the number of
    /// bytes `body` wrote.
    pub fn em_header_explicit<F>(&mut self, member_id: u32, must_understand: bool, nested: bool, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let code = if nested {
            LengthCode::Nested
        } else {
            LengthCode::Explicit
        };
        self.write_em_header_word(member_id, must_understand, code, 0);
        let length_offset = self.offset - 4;
        let body_start = self.offset;
        body(self);
        let body_len = (self.offset - body_start) as u32;
        let bytes = if self.kind.info().little_endian {
            body_len.to_le_bytes()
        } else {
            body_len.to_be_bytes()
        };
        self.buffer[length_offset..length_offset + 4].copy_from_slice(&bytes);
        self
    }

    fn write_em_header_word(
        &mut self,
        member_id: u32,
        must_understand: bool,
        code: LengthCode,
        object_size: u32,
    ) -> &mut Self {
        let mu_bit = if must_understand { 0x8000_0000 } else { 0 };
        let raw = mu_bit | (u32::from(code.as_code()) << 28) | (member_id & 0x0FFF_FFFF);
        self.u32(raw);
        if code.has_inline_length() {
            self.u32(object_size);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_written_on_construction() {
        let w = CdrWriter::with_kind(EncapsulationKind::CdrLe);
        assert_eq!(w.data(), &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(w.size(), 4);
    }

    #[test]
    fn with_capacity_writes_identically_to_with_kind() {
        let mut w = CdrWriter::with_capacity(EncapsulationKind::CdrLe, 128);
        assert!(w.buffer.capacity() >= 100);
        w.u32(7).string("hello");
        assert_eq!(w.finish(), {
            let mut w2 = CdrWriter::with_kind(EncapsulationKind::CdrLe);
            w2.u32(7).string("hello");
            w2.finish()
        });
    }

    #[test]
    fn array_writers_emit_alignment_padding_even_when_empty() {
        use crate::encoding::cdr::reader::CdrReader;

        let mut w = CdrWriter::new();
        w.u8(1);
        w.u32_array(&[]);
        let data = w.finish();
        assert_eq!(data.len(), 4 + 1 + 3); // u8 + align(4) padding, no elements

        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.u8().unwrap(), 1);
        let arr = r.u32_array(0).unwrap();
        assert!(arr.as_slice().is_empty());
        assert!(r.is_at_end());
    }

    #[test]
    fn primitive_round_trip_little_endian() {
        let mut w = CdrWriter::new();
        w.u8(0x01).u16(0x0302).u32(0x07060504).u64(0x0F0E0D0C0B0A0908);
        let data = w.finish();
        assert_eq!(
            data,
            vec![
                0x00, 0x01, 0x00, 0x00, // header
                0x01, 0x00, // u8 + pad
                0x02, 0x03, // u16 LE
                0x04, 0x05, 0x06, 0x07, // u32 LE
                0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, // u64 LE
            ]
        );
    }

    #[test]
    fn big_endian_encoding() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::CdrBe);
        w.u32(0x12345678);
        assert_eq!(&w.data()[4..], &[0x12, 0x34, 0x56, 0x78]);
    }

    #[test]
    fn eight_byte_alignment_differs_for_cdr2() {
        let mut w1 = CdrWriter::with_kind(EncapsulationKind::CdrLe);
        w1.u8(0xFF);
        w1.f64(1.0);
        assert_eq!(w1.size(), 20); // 4 + 1 + 7 pad + 8

        let mut w2 = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
        w2.u8(0xFF);
        w2.f64(1.0);
        assert_eq!(w2.size(), 16); // 4 + 1 + 3 pad + 8
    }

    #[test]
    fn string_matches_wire_format() {
        let mut w = CdrWriter::new();
        w.string("hello");
        let data = w.finish();
        assert_eq!(&data[4..8], &6u32.to_le_bytes());
        assert_eq!(&data[8..13], b"hello");
        assert_eq!(data[13], 0);
    }

    #[test]
    fn empty_string_writes_zero_length() {
        let mut w = CdrWriter::new();
        w.string("");
        let data = w.finish();
        assert_eq!(&data[4..8], &1u32.to_le_bytes());
        assert_eq!(data[8], 0);
    }

    #[test]
    fn delimited_header_backpatches_body_length() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::DelimitedCdr2Le);
        w.with_delimited_header(|w| {
            w.u32(1);
            w.u32(2);
        });
        let data = w.finish();
        let dheader = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(dheader, 8);
    }

    #[test]
    fn pid_header_then_sentinel() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
        w.pid_header(7, false, 4);
        w.u32(42);
        w.sentinel_header();
        let data = w.finish();
        assert_eq!(&data[4..6], &7u16.to_le_bytes());
        assert_eq!(&data[6..8], &4u16.to_le_bytes());
        assert_eq!(&data[8..12], &42u32.to_le_bytes());
        assert_eq!(&data[12..14], &SENTINEL_PID.to_le_bytes());
    }

    #[test]
    fn em_header_explicit_backpatches_inline_length() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
        w.em_header_explicit(5, true, false, |w| {
            w.u8(1);
            w.u8(2);
            w.u8(3);
        });
        let data = w.finish();
        let raw = u32::from_le_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(raw & 0x8000_0000, 0x8000_0000);
        assert_eq!((raw >> 28) & 0x7, LengthCode::Explicit.as_code() as u32);
        assert_eq!(raw & 0x0FFF_FFFF, 5);
        let inline_len = u32::from_le_bytes([data[8], data[9], data[10], data[11]]);
        assert_eq!(inline_len, 3);
    }

    #[test]
    fn em_header_implied_has_no_inline_length() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::Cdr2Le);
        w.em_header_implied(3, false, 4);
        w.u32(99);
        let data = w.finish();
        assert_eq!(data.len(), 4 + 4 + 4);
    }

    #[test]
    fn array_writers_match_manual_loop() {
        let mut w = CdrWriter::new();
        w.u32_array(&[1, 2, 3]);
        let data = w.finish();
        assert_eq!(data.len(), 4 + 12);
    }

    #[test]
    fn headerless_writer_has_no_four_byte_prefix() {
        let mut w = CdrWriter::new_headerless(EncapsulationKind::CdrLe);
        w.u32(7);
        assert_eq!(w.finish(), 7u32.to_le_bytes().to_vec());
    }

    #[test]
    fn unified_em_header_round_trips_xcdr1_short_form() {
        use crate::encoding::cdr::reader::CdrReader;

        let mut w = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
        w.em_header(true, 7, 4, None).unwrap();
        w.u32(42);
        w.sentinel_header();
        let data = w.finish();

        let mut r = CdrReader::new(&data).unwrap();
        let header = r.em_header().unwrap();
        assert_eq!(header.id, 7);
        assert_eq!(header.object_size, 4);
        assert!(header.must_understand);
        assert_eq!(r.u32().unwrap(), 42);
        r.sentinel_header().unwrap();
    }

    #[test]
    fn unified_em_header_round_trips_xcdr1_extended_form() {
        use crate::encoding::cdr::reader::CdrReader;

        let mut w = CdrWriter::with_kind(EncapsulationKind::PlCdrLe);
        // pid 100 fits 14 bits, but object_size 0x10000 exceeds the
        // short form's u16, forcing the extended encoding.
        w.em_header(true, 100, 0x1_0000, None).unwrap();
        let data = w.finish();

        let mut r = CdrReader::new(&data).unwrap();
        let header = r.em_header().unwrap();
        assert_eq!(header.id, 100);
        assert_eq!(header.object_size, 0x1_0000);
        assert!(header.must_understand);
    }

    #[test]
    fn unified_em_header_picks_smallest_xcdr2_code() {
        use crate::encoding::cdr::reader::CdrReader;

        let mut w = CdrWriter::with_kind(EncapsulationKind::PlCdr2Le);
        w.em_header(false, 9, 4, None).unwrap();
        let data = w.finish();
        // implied code leaves no inline length word.
        assert_eq!(data.len(), 4 + 4);

        let mut r = CdrReader::new(&data).unwrap();
        let header = r.em_header().unwrap();
        assert_eq!(header.id, 9);
        assert_eq!(header.object_size, 4);
        assert_eq!(header.length_code, Some(LengthCode::Implied4.as_code()));
    }

    #[test]
    fn u32_sequence_round_trips_through_reader() {
        use crate::encoding::cdr::reader::CdrReader;

        let mut w = CdrWriter::new();
        w.u32_sequence(&[1, 2, 3]);
        let data = w.finish();

        let mut r = CdrReader::new(&data).unwrap();
        let arr = r.u32_sequence().unwrap();
        assert_eq!(arr.as_slice(), &[1, 2, 3]);
        assert!(r.is_at_end());
    }

    #[test]
    fn unified_em_header_rejects_mismatched_explicit_code() {
        let mut w = CdrWriter::with_kind(EncapsulationKind::PlCdr2Le);
        let result = w.em_header(false, 1, 7, Some(LengthCode::ExplicitTimes4));
        assert!(matches!(result, Err(CdrError::MalformedHeader { .. })));
    }
}
