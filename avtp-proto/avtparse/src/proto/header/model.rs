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

//! Owned representations of the AVTP common header and UDP encapsulation header

use crate::{
    core::{
        encode::{InvalidStructureError, WireEncode},
        view::{View, ViewConversionError},
        write::unchecked_field_be_write,
    },
    header::{
        layout::{
            CommonHeaderField, CommonHeaderLayout, UdpEncapsulationField, UdpEncapsulationLayout,
        },
        view::{CommonHeaderView, UdpEncapsulationView},
    },
    types::{AVTP_VERSION, Subtype},
};

/// Represents the AVTP common header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonHeader {
    /// AVTP subtype
    pub subtype: Subtype,
    /// Header specific flag
    pub h: bool,
    /// AVTP version
    pub version: u8,
}
impl CommonHeader {
    /// Creates a common header for the given subtype with the current AVTP version
    pub fn new(subtype: Subtype) -> Self {
        Self {
            subtype,
            h: false,
            version: AVTP_VERSION,
        }
    }

    /// Constructs a `CommonHeader` from a `CommonHeaderView`
    pub fn from_view(view: &CommonHeaderView) -> Self {
        CommonHeader {
            subtype: view.subtype(),
            h: view.h(),
            version: view.version(),
        }
    }

    /// Attempts to construct a `CommonHeader` from a byte slice
    ///
    /// Returns the header and the remaining slice after it.
    pub fn from_slice(buf: &[u8]) -> Result<(Self, &[u8]), ViewConversionError> {
        let (view, rest) = CommonHeaderView::from_slice(buf)?;
        Ok((Self::from_view(view), rest))
    }
}
impl WireEncode for CommonHeader {
    fn required_size(&self) -> usize {
        CommonHeaderLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        InvalidStructureError::check_fits(CommonHeaderField::Version, self.version.into())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        use CommonHeaderField as F;
        // SAFETY: caller guarantees buffer size and field ranges
        unsafe {
            unchecked_field_be_write(buf, F::Subtype.desc(), u8::from(self.subtype).into());
            unchecked_field_be_write(buf, F::H.desc(), self.h.into());
            unchecked_field_be_write(buf, F::Version.desc(), self.version.into());
        }

        CommonHeaderLayout::SIZE_BYTES
    }
}

/// Represents the UDP encapsulation header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UdpEncapsulation {
    /// Encapsulation sequence number
    pub seq_no: u32,
}
impl UdpEncapsulation {
    /// Constructs a `UdpEncapsulation` from a `UdpEncapsulationView`
    pub fn from_view(view: &UdpEncapsulationView) -> Self {
        UdpEncapsulation {
            seq_no: view.encapsulation_seq_no(),
        }
    }
}
impl WireEncode for UdpEncapsulation {
    fn required_size(&self) -> usize {
        UdpEncapsulationLayout::SIZE_BYTES
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        // Sequence number is a u32, so all values are valid
        Ok(())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        // SAFETY: caller guarantees buffer size
        unsafe {
            unchecked_field_be_write(
                buf,
                UdpEncapsulationField::EncapsulationSeqNo.desc(),
                self.seq_no.into(),
            );
        }

        UdpEncapsulationLayout::SIZE_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encode::EncodeError;

    #[test]
    fn should_encode_and_decode_common_header() {
        let header = CommonHeader {
            subtype: Subtype::Ntscf,
            h: true,
            version: 0,
        };
        let buf = header.encode_to_vec().unwrap();
        assert_eq!(buf, [0x82, 0x80, 0x00, 0x00]);

        let (decoded, rest) = CommonHeader::from_slice(&buf).unwrap();
        assert_eq!(decoded, header);
        assert!(rest.is_empty());
    }

    #[test]
    fn should_preserve_format_specific_bits_on_encode() {
        let mut buf = [0xFF; 4];
        CommonHeader::new(Subtype::Tscf).encode(&mut buf).unwrap();
        assert_eq!(buf, [0x05, 0x0F, 0xFF, 0xFF]);
    }

    #[test]
    fn should_reject_invalid_version() {
        let header = CommonHeader {
            version: 9,
            ..CommonHeader::new(Subtype::Aaf)
        };
        assert!(matches!(
            header.encode_to_vec(),
            Err(EncodeError::InvalidStructure(
                InvalidStructureError::FieldOutOfRange {
                    field: "version",
                    value: 9,
                    ..
                }
            ))
        ));
    }

    #[test]
    fn should_reject_small_buffer() {
        let mut buf = [0u8; 3];
        assert_eq!(
            UdpEncapsulation { seq_no: 1 }.encode(&mut buf),
            Err(EncodeError::BufferTooSmall(4))
        );
    }
}
