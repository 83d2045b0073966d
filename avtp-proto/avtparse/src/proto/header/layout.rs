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

//! AVTP common header and UDP encapsulation layouts
//!
//! See [`Layout`](crate::core::layout) for more information about layouts in general.

use crate::core::{
    debug::Annotations, field::macros::gen_field_table, layout::Layout,
};

/// Layout of the AVTP common header
///
/// The common header is the leading part of every AVTPDU, all stream and control headers start
/// with it.
pub struct CommonHeaderLayout;
impl CommonHeaderLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |    subtype    |H|version|          format specific             |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Total size in bytes
    pub const SIZE_BYTES: usize = 4;

    /// Returns annotations for the common header fields
    pub fn annotations(&self) -> Annotations {
        Annotations::for_header::<CommonHeaderField>()
    }
}
impl Layout for CommonHeaderLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

gen_field_table! {
    /// Fields of the AVTP common header
    pub enum CommonHeaderField("CommonHeader", CommonHeaderLayout::SIZE_BYTES) {
        /// AVTP subtype, see [Subtype](crate::types::Subtype)
        Subtype = (0, 0, 8) => "subtype",
        /// Header specific flag, stream valid for stream formats
        H = (0, 8, 1) => "h",
        /// AVTP version
        Version = (0, 9, 3) => "version",
    }
}

/// Layout of the UDP encapsulation header
///
/// AVTPDUs carried over UDP/IP (IEEE 1722-2016, Annex J) are prefixed with a sequence number.
pub struct UdpEncapsulationLayout;
impl UdpEncapsulationLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                   encapsulation_seq_no                        |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Total size in bytes
    pub const SIZE_BYTES: usize = 4;

    /// Returns annotations for the encapsulation header fields
    pub fn annotations(&self) -> Annotations {
        Annotations::for_header::<UdpEncapsulationField>()
    }
}
impl Layout for UdpEncapsulationLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        Self::SIZE_BYTES
    }
}

gen_field_table! {
    /// Fields of the UDP encapsulation header
    pub enum UdpEncapsulationField("UdpEncapsulation", UdpEncapsulationLayout::SIZE_BYTES) {
        /// Encapsulation sequence number
        EncapsulationSeqNo = (0, 0, 32) => "encapsulation_seq_no",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::{FieldDescriptor, HeaderField};

    #[test]
    fn common_header_table_should_match_wire_layout() {
        assert_eq!(
            CommonHeaderField::Subtype.descriptor(),
            FieldDescriptor::new(0, 0, 8)
        );
        assert_eq!(
            CommonHeaderField::H.descriptor(),
            FieldDescriptor::new(0, 8, 1)
        );
        assert_eq!(
            CommonHeaderField::Version.descriptor(),
            FieldDescriptor::new(0, 9, 3)
        );
        assert_eq!(CommonHeaderField::ALL.len(), 3);
        assert_eq!(CommonHeaderLayout.size_bytes(), 4);
        assert_eq!(CommonHeaderLayout.size_quadlets(), 1);
    }

    #[test]
    fn encapsulation_header_should_be_one_quadlet() {
        assert_eq!(UdpEncapsulationLayout.size_bits(), 32);
        assert_eq!(
            UdpEncapsulationField::EncapsulationSeqNo.descriptor(),
            FieldDescriptor::new(0, 0, 32)
        );
    }
}
