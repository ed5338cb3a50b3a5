// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CDR reader for decoding CDR/XCDR1/XCDR2-encoded data with proper alignment.

use crate::core::CdrError;
use crate::encoding::cdr::align::padding;
use crate::encoding::cdr::encapsulation::EncapsulationKind;
use crate::encoding::cdr::length_code::LengthCode;
use crate::encoding::cdr::member::{
    EmHeader, MemberHeader, Pid, EXTENDED_PID_LOW14, SENTINEL_PID_LOW14,
};

/// Size of the CDR encapsulation header (4 bytes).
pub const CDR_HEADER_SIZE: usize = 4;

/// A slice of primitive values read directly from the wire buffer
/// where possible, and only copied into an owned `Vec` when the
/// host's native representation cannot be reinterpreted in place.
///
/// Borrowing requires both the wire byte order to match the host's
/// and the slice's start offset to already satisfy `T`'s natural
/// alignment; a mismatch on either axis falls back to `Owned`.
#[derive(Debug, Clone, PartialEq)]
pub enum CowArray<'a, T> {
    /// Reinterpreted directly from the buffer, no copy.
    Borrowed(&'a [T]),
    /// Byte-swapped or realigned into a freshly allocated vector.
    Owned(Vec<T>),
}

impl<'a, T> CowArray<'a, T> {
    /// View the contents regardless of which variant is active.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            CowArray::Borrowed(s) => s,
            CowArray::Owned(v) => v,
        }
    }

    /// Whether this array avoided allocation.
    #[must_use]
    pub fn is_borrowed(&self) -> bool {
        matches!(self, CowArray::Borrowed(_))
    }
}

/// CDR reader that tracks position and origin for proper alignment.
///
/// The reader is used for decoding CDR/XCDR1/XCDR2-encoded data. It tracks:
/// - `offset`: current read position in the buffer
/// - `origin`: alignment reference point, reset when a PL_CDR member header
///   or sentinel is consumed
/// - `limit`: an optional soft end-of-buffer shorter than the physical data,
///   used to fence a DHEADER-delimited or EMHEADER-sized nested region
///
/// Key concept: alignment is calculated as `(offset - origin) % size`, not
/// `offset % size`, and the alignment unit itself depends on the
/// encapsulation's [`EncapsulationKind::eight_byte_alignment`]: 8 for
/// classic CDR v1, 4 for XCDR2.
#[derive(Debug, Clone)]
pub struct CdrReader<'a> {
    data: &'a [u8],
    offset: usize,
    origin: usize,
    /// The origin a top-level XCDR1 sentinel restores, i.e. the origin
    /// this reader was constructed with.
    base_origin: usize,
    limit: usize,
    kind: EncapsulationKind,
}

impl<'a> CdrReader<'a> {
    /// Create a new CDR reader from data that begins with the 4-byte
    /// encapsulation header.
    pub fn new(data: &'a [u8]) -> Result<Self, CdrError> {
        if data.len() < CDR_HEADER_SIZE {
            return Err(CdrError::ShortHeader {
                available: data.len(),
            });
        }
        let kind = EncapsulationKind::from_u8(data[1])?;
        tracing::trace!(kind = ?kind, len = data.len(), "parsed CDR encapsulation header");
        Ok(Self {
            data,
            offset: CDR_HEADER_SIZE,
            origin: CDR_HEADER_SIZE,
            base_origin: CDR_HEADER_SIZE,
            limit: data.len(),
            kind,
        })
    }

    /// Create a reader over data that has no encapsulation header,
    /// with an explicit encapsulation kind supplied by the caller.
    #[must_use]
    pub fn new_headerless(data: &'a [u8], kind: EncapsulationKind) -> Self {
        Self {
            data,
            offset: 0,
            origin: 0,
            base_origin: 0,
            limit: data.len(),
            kind,
        }
    }

    /// The encapsulation kind this reader was constructed with.
    #[must_use]
    pub fn kind(&self) -> EncapsulationKind {
        self.kind
    }

    /// Current read position relative to the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// Bytes remaining before `limit`.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.offset)
    }

    /// Whether the reader has reached its limit.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.limit
    }

    /// Shrink the visible end of the buffer to `offset + len`. Used to
    /// fence a DHEADER/EMHEADER-delimited region so a caller can't read
    /// past a nested member's declared size. The limit can only shrink;
    /// a `len` that would grow it past the current limit is rejected so
    /// a nested reader can't escape its parent's fence.
    pub fn limit(&mut self, len: usize) -> Result<(), CdrError> {
        let new_limit = self.offset + len;
        if new_limit > self.limit {
            return Err(CdrError::LimitExceeded {
                current: self.limit,
                requested: new_limit,
            });
        }
        self.limit = new_limit;
        Ok(())
    }

    /// Move the read position to an absolute offset without changing origin.
    /// Fails if `offset` falls before the encapsulation header or past the
    /// visible end of the buffer.
    pub fn seek_to(&mut self, offset: usize) -> Result<(), CdrError> {
        if offset < self.base_origin || offset >= self.limit {
            return Err(CdrError::OutOfBounds {
                requested: offset,
                available: self.limit,
                offset: self.offset,
            });
        }
        self.offset = offset;
        Ok(())
    }

    /// Move the read position by `delta` bytes, forward or backward (no
    /// alignment applied). Fails with [`CdrError::OutOfBounds`] if the
    /// resulting position would fall before the encapsulation header or
    /// past the visible end of the buffer.
    pub fn seek(&mut self, delta: isize) -> Result<(), CdrError> {
        let target = self.offset as isize + delta;
        if target < 0 {
            return Err(CdrError::OutOfBounds {
                requested: delta.unsigned_abs(),
                available: self.remaining(),
                offset: self.offset,
            });
        }
        self.seek_to(target as usize)
    }

    /// Reset the origin to the current offset. XCDR1 member headers and
    /// the top-level sentinel do this so nested alignment is computed
    /// relative to the member's own start, not the outer message's.
    pub fn reset_origin(&mut self) {
        self.origin = self.offset;
    }

    fn require(&self, count: usize) -> Result<(), CdrError> {
        if self.offset + count > self.limit {
            return Err(CdrError::OutOfBounds {
                requested: count,
                available: self.remaining(),
                offset: self.offset,
            });
        }
        Ok(())
    }

    fn align(&mut self, unit: usize) -> Result<(), CdrError> {
        let pad = padding(self.offset, self.origin, unit);
        if pad > 0 {
            self.require(pad)?;
            self.offset += pad;
        }
        Ok(())
    }

    /// Read a single byte (no alignment).
    pub fn u8(&mut self) -> Result<u8, CdrError> {
        self.require(1)?;
        let value = self.data[self.offset];
        self.offset += 1;
        Ok(value)
    }

    /// Read a signed byte (no alignment).
    pub fn i8(&mut self) -> Result<i8, CdrError> {
        Ok(self.u8()? as i8)
    }

    fn bytes<const N: usize>(&mut self, unit: usize) -> Result<[u8; N], CdrError> {
        self.align(unit)?;
        self.require(N)?;
        let mut buf = [0u8; N];
        buf.copy_from_slice(&self.data[self.offset..self.offset + N]);
        self.offset += N;
        Ok(buf)
    }

    /// Read a u16, aligned to a 2-byte boundary.
    pub fn u16(&mut self) -> Result<u16, CdrError> {
        let bytes = self.bytes::<2>(2)?;
        Ok(if self.kind.info().little_endian {
            u16::from_le_bytes(bytes)
        } else {
            u16::from_be_bytes(bytes)
        })
    }

    /// Read an i16, aligned to a 2-byte boundary.
    pub fn i16(&mut self) -> Result<i16, CdrError> {
        Ok(self.u16()? as i16)
    }

    /// Read a u16 as big-endian regardless of encapsulation byte order.
    pub fn u16_be(&mut self) -> Result<u16, CdrError> {
        let bytes = self.bytes::<2>(2)?;
        Ok(u16::from_be_bytes(bytes))
    }

    /// Read a u32, aligned to a 4-byte boundary.
    pub fn u32(&mut self) -> Result<u32, CdrError> {
        let bytes = self.bytes::<4>(4)?;
        Ok(if self.kind.info().little_endian {
            u32::from_le_bytes(bytes)
        } else {
            u32::from_be_bytes(bytes)
        })
    }

    /// Read an i32, aligned to a 4-byte boundary.
    pub fn i32(&mut self) -> Result<i32, CdrError> {
        Ok(self.u32()? as i32)
    }

    /// Read a u32 as big-endian regardless of encapsulation byte order.
    /// Used for RTPS PID/EMHEADER fields, which the format fixes to network order.
    pub fn u32_be(&mut self) -> Result<u32, CdrError> {
        self.align(4)?;
        self.require(4)?;
        let bytes = [
            self.data[self.offset],
            self.data[self.offset + 1],
            self.data[self.offset + 2],
            self.data[self.offset + 3],
        ];
        self.offset += 4;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Read a u64, aligned to the encapsulation's [`EncapsulationKind::eight_byte_alignment`] unit.
    pub fn u64(&mut self) -> Result<u64, CdrError> {
        let unit = self.kind.eight_byte_alignment();
        let bytes = self.bytes::<8>(unit)?;
        Ok(if self.kind.info().little_endian {
            u64::from_le_bytes(bytes)
        } else {
            u64::from_be_bytes(bytes)
        })
    }

    /// Read an i64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn i64(&mut self) -> Result<i64, CdrError> {
        Ok(self.u64()? as i64)
    }

    /// Read a u64 as big-endian regardless of encapsulation byte order,
    /// aligned to the encapsulation's eight-byte alignment unit.
    pub fn u64_be(&mut self) -> Result<u64, CdrError> {
        let unit = self.kind.eight_byte_alignment();
        let bytes = self.bytes::<8>(unit)?;
        Ok(u64::from_be_bytes(bytes))
    }

    /// Read an f32, aligned to a 4-byte boundary.
    pub fn f32(&mut self) -> Result<f32, CdrError> {
        let bytes = self.bytes::<4>(4)?;
        Ok(if self.kind.info().little_endian {
            f32::from_le_bytes(bytes)
        } else {
            f32::from_be_bytes(bytes)
        })
    }

    /// Read an f64, aligned to the encapsulation's eight-byte alignment unit.
    pub fn f64(&mut self) -> Result<f64, CdrError> {
        let unit = self.kind.eight_byte_alignment();
        let bytes = self.bytes::<8>(unit)?;
        Ok(if self.kind.info().little_endian {
            f64::from_le_bytes(bytes)
        } else {
            f64::from_be_bytes(bytes)
        })
    }

    /// Read a bool as a single byte; any nonzero byte is `true`.
    pub fn bool(&mut self) -> Result<bool, CdrError> {
        Ok(self.u8()? != 0)
    }

    /// Read a raw byte slice with no alignment and no length prefix.
    pub fn raw_bytes(&mut self, count: usize) -> Result<&'a [u8], CdrError> {
        self.require(count)?;
        let start = self.offset;
        self.offset += count;
        Ok(&self.data[start..self.offset])
    }

    /// Read a length-prefixed UTF-8 string: `uint32(N+1)` followed by
    /// `N` content bytes and a trailing NUL.
    pub fn string(&mut self) -> Result<String, CdrError> {
        let len_with_nul = self.u32()? as usize;
        self.decode_string(len_with_nul)
    }

    /// Read a UTF-8 string whose length prefix was already consumed by
    /// the caller (e.g. taken from a PID's `object_size`), reading only
    /// the `len_with_nul` content+NUL bytes that follow.
    pub fn string_with_len(&mut self, len_with_nul: u32) -> Result<String, CdrError> {
        self.decode_string(len_with_nul as usize)
    }

    fn decode_string(&mut self, len_with_nul: usize) -> Result<String, CdrError> {
        if len_with_nul <= 1 {
            // A content-less string may legitimately end exactly at the
            // buffer's visible end, which `seek`/`seek_to` reject as a
            // caller-facing reposition target; advance directly instead.
            self.require(len_with_nul)?;
            self.offset += len_with_nul;
            return Ok(String::new());
        }
        let content_len = len_with_nul - 1;
        let start = self.offset;
        let bytes = self.raw_bytes(len_with_nul)?;
        let content = &bytes[..content_len];
        std::str::from_utf8(content)
            .map(str::to_owned)
            .map_err(|_| CdrError::Encoding { offset: start })
    }

    /// Read a `uint32` sequence length prefix.
    pub fn sequence_length(&mut self) -> Result<u32, CdrError> {
        self.u32()
    }

    /// Read the XCDR2 DHEADER: a plain `uint32` giving the byte length
    /// of the delimited member that follows (not including the header
    /// itself).
    pub fn d_header(&mut self) -> Result<u32, CdrError> {
        self.u32()
    }

    /// Parse an XCDR1 parameter-list member header (short or extended
    /// form), or recognize the sentinel, at the current position.
    /// Aligns to 4 first; resets origin after a real (non-sentinel)
    /// header so the member body aligns relative to its own start.
    pub fn pid_header(&mut self) -> Result<Pid, CdrError> {
        let header_offset = self.offset;
        self.align(4)?;
        let id_header = self.u16()?;
        let must_understand = id_header & 0x4000 != 0;
        let implementation_specific = id_header & 0x8000 != 0;
        let low14 = u32::from(id_header & 0x3FFF);

        if low14 == SENTINEL_PID_LOW14 {
            return Ok(Pid {
                id: low14,
                object_size: 0,
                must_understand: false,
                read_sentinel_header: true,
            });
        }

        if implementation_specific || low14 > SENTINEL_PID_LOW14 {
            tracing::debug!(pid = low14, offset = header_offset, "rejecting reserved or implementation-specific PID");
            return Err(CdrError::ReservedPid {
                pid: low14,
                offset: header_offset,
            });
        }

        if low14 == EXTENDED_PID_LOW14 {
            let _reserved = self.u16()?;
            let id = self.u32()?;
            let object_size = self.u32()?;
            self.reset_origin();
            return Ok(Pid {
                id,
                object_size,
                must_understand,
                read_sentinel_header: false,
            });
        }

        let object_size = u32::from(self.u16()?);
        self.reset_origin();
        Ok(Pid {
            id: low14,
            object_size,
            must_understand,
            read_sentinel_header: false,
        })
    }

    /// Consume the XCDR1 sentinel header, erroring if the next header
    /// isn't one. A no-op under XCDR2, which has no sentinel concept.
    pub fn sentinel_header(&mut self) -> Result<(), CdrError> {
        if self.kind.info().is_cdr2 {
            return Ok(());
        }
        let offset = self.offset;
        self.align(4)?;
        let id_header = self.u16()?;
        let low14 = u32::from(id_header & 0x3FFF);
        if low14 != SENTINEL_PID_LOW14 {
            tracing::debug!(offset, found = low14, "expected PL_CDR sentinel, found different PID");
            return Err(CdrError::ExpectedSentinel {
                offset,
                found: low14,
            });
        }
        let _reserved = self.u16()?;
        self.origin = self.base_origin;
        Ok(())
    }

    /// Parse a member header at the current position, dispatching to
    /// the XCDR1 PID form or the XCDR2 EMHEADER form based on this
    /// reader's encapsulation.
    pub fn em_header(&mut self) -> Result<MemberHeader, CdrError> {
        if self.kind.info().is_cdr2 {
            Ok(self.em_header_xcdr2()?.into())
        } else {
            Ok(self.pid_header()?.into())
        }
    }

    /// Parse an XCDR2 EMHEADER at the current position.
    pub fn em_header_xcdr2(&mut self) -> Result<EmHeader, CdrError> {
        let offset = self.offset;
        let raw = self.u32()?;
        let must_understand = raw & 0x8000_0000 != 0;
        let length_code_bits = ((raw >> 28) & 0x7) as u8;
        let member_id = raw & 0x0FFF_FFFF;
        let length_code = LengthCode::from_code(length_code_bits).map_err(|_| {
            tracing::debug!(offset, length_code_bits, "rejecting malformed XCDR2 EMHEADER");
            CdrError::MalformedHeader {
                offset,
                reason: format!("invalid length code {length_code_bits}"),
            }
        })?;
        let object_size = if let Some(implied) = length_code.implied_size() {
            implied as u32
        } else {
            let inline = self.u32()?;
            length_code.resolve_object_size(inline)
        };
        Ok(EmHeader {
            member_id,
            must_understand,
            length_code,
            object_size,
        })
    }

    /// Zero-copy read of `count` big-endian-agnostic `u8` elements.
    /// Bytes have no alignment or endianness concerns, so this never
    /// needs to fall back to an owned copy.
    pub fn u8_array(&mut self, count: usize) -> Result<CowArray<'a, u8>, CdrError> {
        Ok(CowArray::Borrowed(self.raw_bytes(count)?))
    }

    /// Read `count` `f32` elements, borrowing directly from the buffer
    /// when the host is little-endian (matching the common wire byte
    /// order) and the slice start is 4-byte aligned; otherwise returns
    /// an owned, byte-swapped copy.
    pub fn f32_array(&mut self, count: usize) -> Result<CowArray<'a, f32>, CdrError> {
        self.align(4)?;
        self.require(count * 4)?;
        let start = self.offset;
        let can_borrow = self.kind.info().little_endian == cfg!(target_endian = "little")
            && start % std::mem::align_of::<f32>() == 0;
        self.offset += count * 4;
        let slice = &self.data[start..self.offset];
        if can_borrow {
            // SAFETY: length, alignment, and endianness were just checked above.
            let (_, body, _) = unsafe { slice.align_to::<f32>() };
            if body.len() == count {
                return Ok(CowArray::Borrowed(body));
            }
        }
        let little_endian = self.kind.info().little_endian;
        let values = slice
            .chunks_exact(4)
            .map(|c| {
                let b = [c[0], c[1], c[2], c[3]];
                if little_endian {
                    f32::from_le_bytes(b)
                } else {
                    f32::from_be_bytes(b)
                }
            })
            .collect();
        Ok(CowArray::Owned(values))
    }

    /// Read `count` `f64` elements, with the same borrow-vs-copy logic
    /// as [`Self::f32_array`], aligned to the encapsulation's eight-byte
    /// alignment unit.
    pub fn f64_array(&mut self, count: usize) -> Result<CowArray<'a, f64>, CdrError> {
        let unit = self.kind.eight_byte_alignment();
        self.align(unit)?;
        self.require(count * 8)?;
        let start = self.offset;
        let can_borrow = self.kind.info().little_endian == cfg!(target_endian = "little")
            && start % std::mem::align_of::<f64>() == 0;
        self.offset += count * 8;
        let slice = &self.data[start..self.offset];
        if can_borrow {
            // SAFETY: length, alignment, and endianness were just checked above.
            let (_, body, _) = unsafe { slice.align_to::<f64>() };
            if body.len() == count {
                return Ok(CowArray::Borrowed(body));
            }
        }
        let little_endian = self.kind.info().little_endian;
        let values = slice
            .chunks_exact(8)
            .map(|c| {
                let b = [c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]];
                if little_endian {
                    f64::from_le_bytes(b)
                } else {
                    f64::from_be_bytes(b)
                }
            })
            .collect();
        Ok(CowArray::Owned(values))
    }

    /// Read `count` `u32` elements, with the same borrow-vs-copy logic
    /// as [`Self::f32_array`].
    pub fn u32_array(&mut self, count: usize) -> Result<CowArray<'a, u32>, CdrError> {
        self.align(4)?;
        self.require(count * 4)?;
        let start = self.offset;
        let can_borrow = self.kind.info().little_endian == cfg!(target_endian = "little")
            && start % std::mem::align_of::<u32>() == 0;
        self.offset += count * 4;
        let slice = &self.data[start..self.offset];
        if can_borrow {
            // SAFETY: length, alignment, and endianness were just checked above.
            let (_, body, _) = unsafe { slice.align_to::<u32>() };
            if body.len() == count {
                return Ok(CowArray::Borrowed(body));
            }
        }
        let little_endian = self.kind.info().little_endian;
        let values = slice
            .chunks_exact(4)
            .map(|c| {
                let b = [c[0], c[1], c[2], c[3]];
                if little_endian {
                    u32::from_le_bytes(b)
                } else {
                    u32::from_be_bytes(b)
                }
            })
            .collect();
        Ok(CowArray::Owned(values))
    }

    /// Read `count` length-prefixed strings in sequence.
    pub fn string_array(&mut self, count: usize) -> Result<Vec<String>, CdrError> {
        (0..count).map(|_| self.string()).collect()
    }

    /// Read a `uint32` sequence length, then that many `u8` elements,
    /// for callers whose schema marks the array's length as on-the-wire
    /// rather than known in advance.
    pub fn u8_sequence(&mut self) -> Result<CowArray<'a, u8>, CdrError> {
        let count = self.sequence_length()? as usize;
        self.u8_array(count)
    }

    /// Read a `uint32` sequence length, then that many `u32` elements.
    pub fn u32_sequence(&mut self) -> Result<CowArray<'a, u32>, CdrError> {
        let count = self.sequence_length()? as usize;
        self.u32_array(count)
    }

    /// Read a `uint32` sequence length, then that many `f32` elements.
    pub fn f32_sequence(&mut self) -> Result<CowArray<'a, f32>, CdrError> {
        let count = self.sequence_length()? as usize;
        self.f32_array(count)
    }

    /// Read a `uint32` sequence length, then that many `f64` elements.
    pub fn f64_sequence(&mut self) -> Result<CowArray<'a, f64>, CdrError> {
        let count = self.sequence_length()? as usize;
        self.f64_array(count)
    }

    /// Read a `uint32` sequence length, then that many length-prefixed strings.
    pub fn string_sequence(&mut self) -> Result<Vec<String>, CdrError> {
        let count = self.sequence_length()? as usize;
        self.string_array(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_le() -> Vec<u8> {
        vec![0x00, 0x01, 0x00, 0x00]
    }

    fn header_be() -> Vec<u8> {
        vec![0x00, 0x00, 0x00, 0x00]
    }

    #[test]
    fn construction_requires_four_bytes() {
        assert!(CdrReader::new(&[0x00, 0x01, 0x00]).is_err());
        assert!(CdrReader::new(&header_le()).is_ok());
    }

    #[test]
    fn rejects_unknown_kind_byte() {
        let data = vec![0x00, 0xEE, 0x00, 0x00];
        assert!(matches!(
            CdrReader::new(&data),
            Err(CdrError::UnsupportedEncapsulation { kind: 0xEE })
        ));
    }

    #[test]
    fn reads_primitives_little_endian() {
        let mut data = header_le();
        data.push(0x01); // u8
        data.push(0x00); // pad to 2
        data.extend_from_slice(&[0x02, 0x03]); // u16 = 0x0302
        data.extend_from_slice(&[0x04, 0x05, 0x06, 0x07]); // u32
        data.extend_from_slice(&[0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F]); // u64

        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.u8().unwrap(), 0x01);
        assert_eq!(r.u16().unwrap(), 0x0302);
        assert_eq!(r.u32().unwrap(), 0x07060504);
        assert_eq!(r.u64().unwrap(), 0x0F0E0D0C0B0A0908);
    }

    #[test]
    fn reads_big_endian() {
        let mut data = header_be();
        data.extend_from_slice(&0x12345678u32.to_be_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.u32().unwrap(), 0x12345678);
    }

    #[test]
    fn eight_byte_alignment_differs_for_cdr2() {
        // Classic CDR v1 little endian: align(8) relative to origin=4.
        let mut data = header_le();
        data.push(0xFF); // offset 5
        data.extend_from_slice(&[0x00; 6]); // pad to 11, then one more to 12 below
        data.extend_from_slice(&1.0f64.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        r.u8().unwrap();
        assert_eq!(r.f64().unwrap(), 1.0);
        assert_eq!(r.position(), 20); // 4 + 1 + 7 pad + 8

        // XCDR2 little endian: align(4) relative to origin=4 instead of 8.
        let mut data2 = vec![0x00, 0x07, 0x00, 0x00];
        data2.push(0xFF); // offset 5
        data2.extend_from_slice(&[0x00; 3]); // pad to 8
        data2.extend_from_slice(&1.0f64.to_le_bytes());
        let mut r2 = CdrReader::new(&data2).unwrap();
        r2.u8().unwrap();
        assert_eq!(r2.f64().unwrap(), 1.0);
        assert_eq!(r2.position(), 16); // 4 + 1 + 3 pad + 8
    }

    #[test]
    fn reads_string_with_null_terminator() {
        let mut data = header_le();
        data.extend_from_slice(&6u32.to_le_bytes()); // "hello" + NUL = 6
        data.extend_from_slice(b"hello\0");
        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.string().unwrap(), "hello");
    }

    #[test]
    fn reads_empty_string() {
        let mut data = header_le();
        data.extend_from_slice(&0u32.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.string().unwrap(), "");
    }

    #[test]
    fn rejects_invalid_utf8_string() {
        let mut data = header_le();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&[0xFF, 0x00]);
        let mut r = CdrReader::new(&data).unwrap();
        assert!(matches!(r.string(), Err(CdrError::Encoding { .. })));
    }

    #[test]
    fn limit_can_only_shrink() {
        let mut data = header_le();
        data.extend_from_slice(&[0u8; 8]);
        let mut r = CdrReader::new(&data).unwrap();
        assert!(r.limit(20).is_err());
        assert!(r.limit(4).is_ok());
        assert!(r.limit(8).is_err());
    }

    #[test]
    fn reset_origin_changes_alignment_reference() {
        let mut data = header_le();
        data.extend_from_slice(&1u32.to_le_bytes()); // offset 8
        data.push(0x01); // offset 9
        data.extend_from_slice(&[0x00; 3]); // pad to 12
        let mut r = CdrReader::new(&data).unwrap();
        r.u32().unwrap();
        r.reset_origin();
        r.u8().unwrap();
        assert_eq!(r.position(), 9);
        // align(4) relative to new origin=8: (9-8)%4=1, needs 3 bytes.
        let before = r.position();
        let pad = padding(before, 8, 4);
        assert_eq!(pad, 3);
    }

    #[test]
    fn em_header_decodes_member_id_and_length_code() {
        let mut data = vec![0x00, 0x07, 0x00, 0x00]; // CDR2 LE
        // must_understand=1, length_code=5 (Explicit), member_id=5
        let raw: u32 = (1 << 31) | (5 << 28) | 5;
        data.extend_from_slice(&raw.to_le_bytes());
        data.extend_from_slice(&12u32.to_le_bytes()); // inline length
        let mut r = CdrReader::new(&data).unwrap();
        let header = r.em_header_xcdr2().unwrap();
        assert_eq!(header.member_id, 5);
        assert!(header.must_understand);
        assert_eq!(header.length_code, LengthCode::Explicit);
        assert_eq!(header.resolved_size(), Some(12));
    }

    #[test]
    fn unified_em_header_dispatches_to_xcdr2_form() {
        let mut data = vec![0x00, 0x07, 0x00, 0x00]; // CDR2 LE
        let raw: u32 = (5 << 28) | 3;
        data.extend_from_slice(&raw.to_le_bytes());
        data.extend_from_slice(&7u32.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        let header = r.em_header().unwrap();
        assert_eq!(header.id, 3);
        assert_eq!(header.object_size, 7);
        assert_eq!(header.length_code, Some(LengthCode::Explicit.as_code()));
        assert!(!header.is_sentinel());
    }

    #[test]
    fn pid_header_short_form_and_sentinel() {
        let mut data = header_le();
        data.extend_from_slice(&0x0007u16.to_le_bytes()); // pid=7, no flags
        data.extend_from_slice(&4u16.to_le_bytes()); // length=4
        data.extend_from_slice(&42u32.to_le_bytes());
        data.extend_from_slice(&SENTINEL_PID.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());

        let mut r = CdrReader::new(&data).unwrap();
        let pid = r.pid_header().unwrap();
        assert_eq!(pid.id, 7);
        assert_eq!(pid.object_size, 4);
        assert_eq!(r.u32().unwrap(), 42);
        r.sentinel_header().unwrap();
    }

    #[test]
    fn sentinel_header_rejects_non_sentinel() {
        let mut data = header_le();
        data.extend_from_slice(&0x0007u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        assert!(matches!(
            r.sentinel_header(),
            Err(CdrError::ExpectedSentinel { .. })
        ));
    }

    #[test]
    fn d_header_reads_plain_length() {
        let mut data = vec![0x00, 0x0A, 0x00, 0x00]; // DelimitedCdr2Be... actually Le tag 11
        data[1] = 11;
        data.extend_from_slice(&16u32.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        assert_eq!(r.d_header().unwrap(), 16);
    }

    #[test]
    fn f32_array_borrows_on_matching_endianness() {
        let mut data = header_le();
        data.extend_from_slice(&1.0f32.to_le_bytes());
        data.extend_from_slice(&2.0f32.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        let arr = r.f32_array(2).unwrap();
        assert_eq!(arr.as_slice(), &[1.0f32, 2.0f32]);
        if cfg!(target_endian = "little") {
            assert!(arr.is_borrowed());
        }
    }

    #[test]
    fn f32_array_copies_on_mismatched_endianness() {
        let mut data = header_be();
        data.extend_from_slice(&1.0f32.to_be_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        let arr = r.f32_array(1).unwrap();
        assert_eq!(arr.as_slice(), &[1.0f32]);
        assert!(!arr.is_borrowed());
    }

    #[test]
    fn u8_array_is_always_borrowed() {
        let mut data = header_le();
        data.extend_from_slice(&[1, 2, 3, 4]);
        let mut r = CdrReader::new(&data).unwrap();
        let arr = r.u8_array(4).unwrap();
        assert!(arr.is_borrowed());
        assert_eq!(arr.as_slice(), &[1, 2, 3, 4]);
    }

    #[test]
    fn string_array_reads_sequentially() {
        let mut data = header_le();
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"abc\0");
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(b"x\0");
        let mut r = CdrReader::new(&data).unwrap();
        let strings = r.string_array(2).unwrap();
        assert_eq!(strings, vec!["abc".to_string(), "x".to_string()]);
    }

    #[test]
    fn u32_sequence_reads_own_length_prefix() {
        let mut data = header_le();
        data.extend_from_slice(&3u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&3u32.to_le_bytes());
        let mut r = CdrReader::new(&data).unwrap();
        let arr = r.u32_sequence().unwrap();
        assert_eq!(arr.as_slice(), &[1, 2, 3]);
        assert!(r.is_at_end());
    }

    #[test]
    fn string_sequence_reads_own_length_prefix() {
        let mut data = header_le();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(b"abc\0");
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(b"x\0");
        let mut r = CdrReader::new(&data).unwrap();
        let strings = r.string_sequence().unwrap();
        assert_eq!(strings, vec!["abc".to_string(), "x".to_string()]);
    }

    #[test]
    fn out_of_bounds_read_errors() {
        let data = header_le();
        let mut r = CdrReader::new(&data).unwrap();
        assert!(matches!(r.u32(), Err(CdrError::OutOfBounds { .. })));
    }

    #[test]
    fn seek_and_seek_to() {
        let mut data = header_le();
        data.extend_from_slice(&[1, 2, 3, 4]);
        let mut r = CdrReader::new(&data).unwrap();
        r.seek(2).unwrap();
        assert_eq!(r.position(), 6);
        r.seek_to(4).unwrap();
        assert_eq!(r.position(), 4);
        assert!(r.seek_to(100).is_err());
    }

    #[test]
    fn seek_to_rejects_exact_buffer_length() {
        let mut data = header_le();
        data.extend_from_slice(&[1, 2, 3, 4]);
        let mut r = CdrReader::new(&data).unwrap();
        assert!(matches!(
            r.seek_to(data.len()),
            Err(CdrError::OutOfBounds { .. })
        ));
        r.seek_to(data.len() - 1).unwrap();
        assert_eq!(r.position(), data.len() - 1);
    }

    #[test]
    fn seek_can_move_backward() {
        let mut data = header_le();
        data.extend_from_slice(&[1, 2, 3, 4, 5]);
        let mut r = CdrReader::new(&data).unwrap();
        r.seek(4).unwrap();
        assert_eq!(r.position(), 8);
        r.seek(-4).unwrap();
        assert_eq!(r.position(), 4);
        assert!(r.seek(-1).is_err());
    }

    #[test]
    fn is_at_end_tracks_limit() {
        let data = header_le();
        let r = CdrReader::new(&data).unwrap();
        assert!(r.is_at_end());
    }
}
