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

//! Common header access with the older get/set signature
//!
//! Callers that still pass an out parameter and compare integer status codes can keep doing so
//! through [LegacyError::errno]. New code should use
//! [CommonHeaderView](crate::header::view::CommonHeaderView) instead.

use crate::{
    core::{field::FieldError, read, write},
    header::layout::CommonHeaderField,
};

const EINVAL: i32 = 22;
const ERANGE: i32 = 34;

/// Errors returned by [pdu_get] and [pdu_set]
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum LegacyError {
    /// No output location was given
    #[error("Missing output value")]
    InvalidArgument,
    /// The field value does not fit into 32 bits
    #[error("Value {0} of field {1:?} does not fit into 32 bits")]
    Truncated(u64, CommonHeaderField),
    /// The codec rejected the access
    #[error(transparent)]
    Field(#[from] FieldError),
}
impl LegacyError {
    /// Returns the negative errno code used by the older interface
    pub fn errno(&self) -> i32 {
        match self {
            LegacyError::InvalidArgument => -EINVAL,
            LegacyError::Truncated(..) => -ERANGE,
            LegacyError::Field(FieldError::ValueOutOfRange { .. }) => -ERANGE,
            LegacyError::Field(_) => -EINVAL,
        }
    }
}

/// Reads a common header field into `val`.
pub fn pdu_get(
    pdu: &[u8],
    field: CommonHeaderField,
    val: Option<&mut u32>,
) -> Result<(), LegacyError> {
    let val = val.ok_or(LegacyError::InvalidArgument)?;
    let value = read::get(pdu, field)?;
    *val = u32::try_from(value).map_err(|_| LegacyError::Truncated(value, field))?;
    Ok(())
}

/// Writes a common header field.
///
/// The buffer is left unchanged on error.
pub fn pdu_set(pdu: &mut [u8], field: CommonHeaderField, value: u32) -> Result<(), LegacyError> {
    write::set(pdu, field, value.into())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_get_and_set_common_header() {
        let mut pdu = [0x80, 0x03, 0x00, 0x00];
        let mut val = 0;

        pdu_get(&pdu, CommonHeaderField::Subtype, Some(&mut val)).unwrap();
        assert_eq!(val, 0x80);

        pdu_set(&mut pdu, CommonHeaderField::Version, 5).unwrap();
        pdu_get(&pdu, CommonHeaderField::Version, Some(&mut val)).unwrap();
        assert_eq!(val, 5);
        assert_eq!(pdu, [0x80, 0x53, 0x00, 0x00]);
    }

    #[test]
    fn should_reject_missing_output() {
        let err = pdu_get(&[0; 4], CommonHeaderField::H, None).unwrap_err();
        assert_eq!(err, LegacyError::InvalidArgument);
        assert_eq!(err.errno(), -22);
    }

    #[test]
    fn should_forward_codec_errors() {
        let mut pdu = [0u8; 4];
        let err = pdu_set(&mut pdu, CommonHeaderField::H, 2).unwrap_err();
        assert_eq!(err.errno(), -34);
        assert_eq!(pdu, [0; 4]);

        let mut val = 7;
        let err = pdu_get(&[0x80], CommonHeaderField::Subtype, Some(&mut val)).unwrap_err();
        assert!(matches!(
            err,
            LegacyError::Field(FieldError::BufferTooSmall { .. })
        ));
        assert_eq!(err.errno(), -22);
        assert_eq!(val, 7);
    }
}
