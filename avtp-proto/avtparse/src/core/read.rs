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

//! Reading fields from header buffers

use crate::core::field::{
    FieldDescriptor, FieldError, HeaderField, QUADLET_BYTES, checked_descriptor,
};

/// Reads the quadlet with the given index in network byte order.
///
/// SAFETY:
/// The caller must ensure that the buffer holds at least `(index + 1) * 4` bytes.
#[inline(always)]
pub unsafe fn unchecked_quadlet_be_read(buf: &[u8], index: usize) -> u32 {
    let start = index * QUADLET_BYTES;
    debug_assert!(start + QUADLET_BYTES <= buf.len(), "read exceeds buffer");

    let mut quadlet = [0u8; QUADLET_BYTES];
    // SAFETY: length is guaranteed by the caller
    quadlet.copy_from_slice(unsafe { buf.get_unchecked(start..start + QUADLET_BYTES) });
    u32::from_be_bytes(quadlet)
}

/// Reads a field and returns its value right-justified.
///
/// SAFETY:
/// The caller must ensure that the buffer contains the quadlet of the field, i.e. that it is at
/// least [FieldDescriptor::required_bytes] long.
#[inline(always)]
pub unsafe fn unchecked_field_be_read(buf: &[u8], desc: FieldDescriptor) -> u64 {
    // SAFETY: length is guaranteed by the caller
    let quadlet = unsafe { unchecked_quadlet_be_read(buf, desc.quadlet()) };
    desc.extract(quadlet)
}

/// Reads the field with index `field` of the descriptor table from the buffer.
///
/// Fails if the index is not part of the table or the buffer does not contain the field. Never
/// modifies or reads past the buffer.
#[inline]
pub fn get_field(table: &[FieldDescriptor], buf: &[u8], field: usize) -> Result<u64, FieldError> {
    let desc = checked_descriptor(table, field, buf.len())?;

    // SAFETY: buffer length is checked above
    Ok(unsafe { unchecked_field_be_read(buf, desc) })
}

/// Reads a typed field from the buffer.
///
/// See [get_field].
#[inline]
pub fn get<F: HeaderField>(buf: &[u8], field: F) -> Result<u64, FieldError> {
    get_field(F::TABLE, buf, field.index())
}
