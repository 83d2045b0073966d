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

//! AVTP common header and UDP encapsulation views
//!
//! See [`View`](crate::core::view) for more information about views in general.

use std::fmt::Debug;

use crate::{
    core::{
        layout::{Layout, ensure_len},
        view::{
            HeaderView, View, ViewConversionError,
            macros::{
                gen_exact_field_write, gen_field_read, gen_field_write, gen_flag_read,
                gen_flag_write, gen_view_casts,
            },
        },
    },
    header::layout::{
        CommonHeaderField, CommonHeaderLayout, UdpEncapsulationField, UdpEncapsulationLayout,
    },
    types::Subtype,
};

/// A view over the AVTP common header
///
/// Every AVTPDU starts with the common header, so this view can be placed over any PDU to find
/// out which format it carries. The view covers exactly the first quadlet and does not validate
/// any field.
#[repr(transparent)]
pub struct CommonHeaderView([u8]);
impl View for CommonHeaderView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        ensure_len("CommonHeader", buf, CommonHeaderLayout.size_bytes())?;
        Ok(CommonHeaderLayout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: has_required_size rejects buffers shorter than the common header
unsafe impl HeaderView for CommonHeaderView {
    type Field = CommonHeaderField;
}
impl CommonHeaderView {
    gen_field_read!(raw_subtype, CommonHeaderField::Subtype, u8);
    gen_flag_read!(h, CommonHeaderField::H);
    gen_field_read!(version, CommonHeaderField::Version, u8);

    /// Returns the AVTP subtype
    #[inline]
    pub fn subtype(&self) -> Subtype {
        self.raw_subtype().into()
    }
}
// Mut
impl CommonHeaderView {
    gen_exact_field_write!(set_raw_subtype, CommonHeaderField::Subtype, u8);
    gen_flag_write!(set_h, CommonHeaderField::H);
    gen_field_write!(set_version, CommonHeaderField::Version, u8);

    /// Sets the AVTP subtype
    ///
    /// Only the subtype field is changed, the format specific part of the PDU is left as is.
    #[inline]
    pub fn set_subtype(&mut self, subtype: Subtype) {
        self.set_raw_subtype(subtype.into());
    }
}
impl Debug for CommonHeaderView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommonHeaderView")
            .field("subtype", &self.subtype())
            .field("h", &self.h())
            .field("version", &self.version())
            .finish()
    }
}

/// A view over the UDP encapsulation header preceding AVTPDUs carried over IP
#[repr(transparent)]
pub struct UdpEncapsulationView([u8]);
impl View for UdpEncapsulationView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        ensure_len("UdpEncapsulation", buf, UdpEncapsulationLayout.size_bytes())?;
        Ok(UdpEncapsulationLayout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: has_required_size rejects buffers shorter than the encapsulation header
unsafe impl HeaderView for UdpEncapsulationView {
    type Field = UdpEncapsulationField;
}
impl UdpEncapsulationView {
    gen_field_read!(
        encapsulation_seq_no,
        UdpEncapsulationField::EncapsulationSeqNo,
        u32
    );
    gen_exact_field_write!(
        set_encapsulation_seq_no,
        UdpEncapsulationField::EncapsulationSeqNo,
        u32
    );
}
impl Debug for UdpEncapsulationView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpEncapsulationView")
            .field("encapsulation_seq_no", &self.encapsulation_seq_no())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::FieldError;

    #[test]
    fn should_read_common_header() {
        let buf = [0x82, 0x80, 0xAA, 0xBB, 0xCC];
        let (view, rest) = CommonHeaderView::from_slice(&buf).unwrap();

        assert_eq!(view.subtype(), Subtype::Ntscf);
        assert!(view.h());
        assert_eq!(view.version(), 0);
        assert_eq!(rest, &[0xCC]);
    }

    #[test]
    fn should_keep_subtype_when_setting_version() {
        let mut buf = [0x80, 0x03, 0x00, 0x00];
        let (view, _) = CommonHeaderView::from_mut_slice(&mut buf).unwrap();

        assert_eq!(view.raw_subtype(), 0x80);
        assert_eq!(view.version(), 0);

        view.set_version(5).unwrap();
        assert_eq!(view.raw_subtype(), 0x80);
        assert_eq!(view.version(), 5);
        assert!(!view.h());
        assert_eq!(buf, [0x80, 0x53, 0x00, 0x00]);
    }

    #[test]
    fn should_reject_out_of_range_values() {
        let mut buf = [0x05, 0x00, 0x12, 0x34];
        let (view, _) = CommonHeaderView::from_mut_slice(&mut buf).unwrap();

        assert_eq!(
            view.set_version(8),
            Err(FieldError::ValueOutOfRange { value: 8, bits: 3 })
        );
        assert_eq!(
            view.set_field(CommonHeaderField::H, 2),
            Err(FieldError::ValueOutOfRange { value: 2, bits: 1 })
        );
        assert_eq!(buf, [0x05, 0x00, 0x12, 0x34]);
    }

    #[test]
    fn should_write_through_generic_accessor() {
        let mut buf = [0u8; 4];
        let (view, _) = CommonHeaderView::from_mut_slice(&mut buf).unwrap();

        view.set_subtype(Subtype::Tscf);
        view.set_field(CommonHeaderField::H, 1).unwrap();
        assert_eq!(view.field(CommonHeaderField::Subtype), 0x05);
        assert_eq!(view.field(CommonHeaderField::H), 1);
        assert_eq!(buf, [0x05, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn should_reject_short_buffer() {
        let buf = [0x82, 0x80, 0x00];
        assert_eq!(
            CommonHeaderView::from_slice(&buf).unwrap_err(),
            ViewConversionError::BufferTooSmall {
                at: "CommonHeader",
                required: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn should_read_and_write_encapsulation_seq_no() {
        let mut buf = [0u8; 8];
        let (view, rest) = UdpEncapsulationView::from_mut_slice(&mut buf).unwrap();
        view.set_encapsulation_seq_no(0xDEAD_BEEF);

        assert_eq!(view.encapsulation_seq_no(), 0xDEAD_BEEF);
        assert_eq!(rest.len(), 4);
        assert_eq!(buf[..4], [0xDE, 0xAD, 0xBE, 0xEF]);
    }
}
