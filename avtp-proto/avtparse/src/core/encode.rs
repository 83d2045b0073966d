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

//! Utilities for encoding model representations into byte buffers
//!
//! All model structures intended for encoding should implement the `WireEncode` trait.
//!
//! This trait has three main responsibilities:
//!
//! 1. Calculating the required size for the wire encoding
//! 2. Validating that the structure is in a valid state for encoding
//! 3. Writing the wire format into a provided byte buffer
//!
//! ### Validation
//!
//! Validation does not mean comprehensive semantic validation of all fields. It only ensures that
//! every value fits into the field it is written to, so the unchecked field writes used during
//! encoding never truncate.

use crate::core::field::HeaderField;

/// Allows encoding to wire format.
pub trait WireEncode {
    /// Returns the size required for the wire encoding.
    ///
    /// ## Safety
    /// This size must be correct, it is used to validate buffer sizes in `encode`.
    /// If this size is smaller than the actual encoded size, undefined behavior will occur.
    fn required_size(&self) -> usize;

    /// Validates that all fields in the structure are valid for encoding.
    ///
    /// Note: This only checks the minimal set of fields required for encoding, do not expect
    /// comprehensive validation.
    fn wire_valid(&self) -> Result<(), InvalidStructureError>;

    /// Writes the wire encoding into the provided buffer.
    ///
    /// Returns the number of bytes written.
    ///
    /// ## SAFETY
    /// 1. The buffer must be at least `self.required_size()` bytes long
    /// 2. The structure must be valid for encoding, i.e., `self.wire_valid()` must return `Ok(())`
    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize;

    /// Writes the wire encoding into the provided buffer.
    ///
    /// Returns the number of bytes written on success.
    ///
    /// The buffer must be at least `self.required_size()` bytes long.
    fn encode(&self, buf: &mut [u8]) -> Result<usize, EncodeError> {
        self.wire_valid()?;

        let required_size = self.required_size();
        if buf.len() < required_size {
            return Err(EncodeError::BufferTooSmall(required_size));
        }

        // SAFETY: buffer length and structure are checked above
        unsafe { Ok(self.encode_unchecked(buf)) }
    }

    /// Encodes into a newly allocated buffer of exactly `self.required_size()` bytes.
    fn encode_to_vec(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = vec![0u8; self.required_size()];
        self.encode(&mut buf)?;
        Ok(buf)
    }
}

/// Errors that can occur during encoding.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// The structure which was attempted to be encoded is invalid.
    #[error(transparent)]
    InvalidStructure(#[from] InvalidStructureError),
    /// The provided buffer is too small.
    #[error("buffer too small: required {0}")]
    BufferTooSmall(usize),
}

/// Given Structure has invalid fields to encode correctly.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStructureError {
    /// A value does not fit into its header field
    #[error("cannot encode structure: {header}.{field} value {value} exceeds {bits} bits")]
    FieldOutOfRange {
        /// Header of the field
        header: &'static str,
        /// Name of the field
        field: &'static str,
        /// Rejected value
        value: u64,
        /// Width of the field
        bits: u32,
    },
    /// Any other inconsistency
    #[error("cannot encode structure: {0}")]
    Invalid(&'static str),
}
impl InvalidStructureError {
    /// Checks that the value fits into the given header field
    pub fn check_fits<F: HeaderField>(field: F, value: u64) -> Result<(), InvalidStructureError> {
        let desc = field.descriptor();
        if desc.fits(value) {
            return Ok(());
        }

        Err(InvalidStructureError::FieldOutOfRange {
            header: F::HEADER,
            field: field.name(),
            value,
            bits: desc.bits(),
        })
    }
}
impl From<&'static str> for InvalidStructureError {
    fn from(s: &'static str) -> Self {
        InvalidStructureError::Invalid(s)
    }
}
