// Copyright 2026 Anapaya Systems
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Writing fields into header buffers

use crate::core::{
    field::{FieldDescriptor, FieldError, HeaderField, QUADLET_BYTES, checked_descriptor},
    read::unchecked_quadlet_be_read,
};

/// Writes the quadlet with the given index in network byte order.
///
/// SAFETY:
/// The caller must ensure that the buffer holds at least `(index + 1) * 4` bytes.
#[inline(always)]
pub unsafe fn unchecked_quadlet_be_write(buf: &mut [u8], index: usize, quadlet: u32) {
    let start = index * QUADLET_BYTES;
    debug_assert!(start + QUADLET_BYTES <= buf.len(), "write exceeds buffer");

    // SAFETY: length is guaranteed by the caller
    unsafe { buf.get_unchecked_mut(start..start + QUADLET_BYTES) }
        .copy_from_slice(&quadlet.to_be_bytes());
}

/// Writes a field, preserving all other bits of its quadlet.
///
/// If the value exceeds the field width, it will be truncated to fit.
///
/// SAFETY:
/// The caller must ensure that the buffer contains the quadlet of the field, i.e. that it is at
/// least [FieldDescriptor::required_bytes] long.
///
/// Performs a read-modify-write of the containing quadlet.
#[inline(always)]
pub unsafe fn unchecked_field_be_write(buf: &mut [u8], desc: FieldDescriptor, value: u64) {
    // SAFETY: length is guaranteed by the caller
    unsafe {
        let quadlet = unchecked_quadlet_be_read(buf, desc.quadlet());
        unchecked_quadlet_be_write(buf, desc.quadlet(), desc.insert(quadlet, value));
    }
}

/// Writes the field with index `field` of the descriptor table into the buffer.
///
/// Fails without touching the buffer if the index is not part of the table, the buffer does not
/// contain the field, or the value does not fit into the field width. On success only the bits of
/// the field are changed.
#[inline]
pub fn set_field(
    table: &[FieldDescriptor],
    buf: &mut [u8],
    field: usize,
    value: u64,
) -> Result<(), FieldError> {
    let desc = checked_descriptor(table, field, buf.len())?;

    if !desc.fits(value) {
        return Err(FieldError::ValueOutOfRange {
            value,
            bits: desc.bits(),
        });
    }

    // SAFETY: buffer length is checked above
    unsafe { unchecked_field_be_write(buf, desc, value) };
    Ok(())
}

/// Writes a typed field into the buffer.
///
/// See [set_field].
#[inline]
pub fn set<F: HeaderField>(buf: &mut [u8], field: F, value: u64) -> Result<(), FieldError> {
    set_field(F::TABLE, buf, field.index(), value)
}
