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

//! Utilities for describing the size of headers and PDUs
//!
//! Layouts are the source of truth for the structure of a PDU: the fixed header size given by the
//! descriptor table, plus whatever variable part (payload, ACF message) the header advertises.
//!
//! Views use layouts to check buffer sizes once on construction, after which all field accesses
//! are unchecked.

use crate::core::field::QUADLET_BYTES;

/// Trait representing the layout of a protocol header or message
pub trait Layout {
    /// Returns the expected size of the layout in bytes
    fn size_bytes(&self) -> usize;

    /// Returns the expected size of the layout in bits
    #[inline(always)]
    fn size_bits(&self) -> usize {
        self.size_bytes() * 8
    }

    /// Returns the expected size of the layout in quadlets, rounded up
    #[inline]
    fn size_quadlets(&self) -> usize {
        self.size_bytes().div_ceil(QUADLET_BYTES)
    }

    /// Attempts to Split the buffer into two at the size of the layout
    /// Returns None if the buffer is too small
    #[inline]
    fn split_off_checked<'a>(&self, buf: &'a [u8]) -> Option<(&'a [u8], &'a [u8])> {
        buf.split_at_checked(self.size_bytes())
    }
}

/// Errors that can occur when reading a layout from a byte slice
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum LayoutParseError {
    /// The AVTP version is unsupported
    #[error("Unsupported version at {at}: {version}")]
    UnsupportedVersion {
        /// Header carrying the version
        at: &'static str,
        /// Advertised version
        version: u8,
    },
    /// The header belongs to a different subtype or message type
    #[error("Unexpected type at {at}: expected {expected:#04x}, actual {actual:#04x}")]
    UnexpectedType {
        /// Header carrying the type
        at: &'static str,
        /// Expected type
        expected: u8,
        /// Advertised type
        actual: u8,
    },
    /// The buffer is too small to contain the expected layout
    #[error("Buffer too small at {at}: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Location where the buffer was too small
        at: &'static str,
        /// Number of bytes required
        required: usize,
        /// Number of bytes actually available
        actual: usize,
    },
    /// The advertised length is smaller than the fixed header
    #[error("Invalid length at {at}: advertised {advertised}, minimum {minimum}")]
    InvalidLength {
        /// Location of the length field
        at: &'static str,
        /// Advertised length in bytes
        advertised: usize,
        /// Minimal valid length in bytes
        minimum: usize,
    },
}

/// Returns a [LayoutParseError::BufferTooSmall] if the buffer is shorter than `required`
#[inline]
pub(crate) fn ensure_len(
    at: &'static str,
    buf: &[u8],
    required: usize,
) -> Result<(), LayoutParseError> {
    if buf.len() < required {
        return Err(LayoutParseError::BufferTooSmall {
            at,
            required,
            actual: buf.len(),
        });
    }
    Ok(())
}
