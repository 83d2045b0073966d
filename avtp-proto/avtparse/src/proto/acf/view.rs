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

//! ACF message views
//!
//! Every view covers exactly one message, as advertised by its length field. The payload is
//! derived from the extent of the view, so changing the length or pad fields through a view never
//! makes the view reach past its buffer.
//!
//! See [`View`](crate::core::view) for more information about views in general.

use std::fmt::Debug;

use crate::{
    acf::layout::{
        AcfCanBriefField, AcfCanBriefLayout, AcfCanField, AcfCanLayout, AcfCommonField,
        AcfCommonLayout, AcfLinField, AcfLinLayout, AcfMessageLayout,
    },
    core::{
        layout::Layout,
        view::{
            HeaderView, View, ViewConversionError,
            macros::{
                gen_exact_field_write, gen_field_read, gen_field_write, gen_flag_read,
                gen_flag_write, gen_split_u64_read, gen_split_u64_write, gen_view_casts,
            },
        },
    },
    types::{AcfMsgType, CanFlags},
};

/// Returns the payload of a message, dropping `pad` trailing bytes but never any header byte
#[inline]
fn payload_range(msg_len: usize, header_len: usize, pad: usize) -> std::ops::Range<usize> {
    header_len..msg_len.saturating_sub(pad).max(header_len)
}

/// A view over any ACF message, exposing only the common header
#[repr(transparent)]
pub struct AcfCommonView([u8]);
impl View for AcfCommonView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = AcfMessageLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the message layout covers at least the common header
unsafe impl HeaderView for AcfCommonView {
    type Field = AcfCommonField;
}
impl AcfCommonView {
    gen_field_read!(raw_msg_type, AcfCommonField::MsgType, u8);
    gen_field_read!(msg_length, AcfCommonField::MsgLength, u16);

    /// Returns the message type
    #[inline]
    pub fn msg_type(&self) -> AcfMsgType {
        self.raw_msg_type().into()
    }

    /// Returns everything behind the message type and length fields
    #[inline]
    pub fn body(&self) -> &[u8] {
        &self.0[AcfCommonLayout::TYPE_LENGTH_BYTES..]
    }
}
// Mut
impl AcfCommonView {
    gen_field_write!(set_raw_msg_type, AcfCommonField::MsgType, u8);
    gen_field_write!(set_msg_length, AcfCommonField::MsgLength, u16);

    /// Returns everything behind the message type and length fields
    #[inline]
    pub fn body_mut(&mut self) -> &mut [u8] {
        &mut self.0[AcfCommonLayout::TYPE_LENGTH_BYTES..]
    }
}
impl Debug for AcfCommonView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcfCommonView")
            .field("msg_type", &self.msg_type())
            .field("msg_length", &self.msg_length())
            .field("body_len", &self.body().len())
            .finish()
    }
}

/// A view over an ACF CAN message
#[repr(transparent)]
pub struct AcfCanView([u8]);
impl View for AcfCanView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = AcfCanLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the CAN layout rejects messages shorter than the CAN header
unsafe impl HeaderView for AcfCanView {
    type Field = AcfCanField;
}
impl AcfCanView {
    gen_field_read!(msg_length, AcfCanField::MsgLength, u16);
    gen_field_read!(pad, AcfCanField::Pad, u8);
    gen_flag_read!(mtv, AcfCanField::Mtv);
    gen_flag_read!(rtr, AcfCanField::Rtr);
    gen_flag_read!(eff, AcfCanField::Eff);
    gen_flag_read!(brs, AcfCanField::Brs);
    gen_flag_read!(fdf, AcfCanField::Fdf);
    gen_flag_read!(esi, AcfCanField::Esi);
    gen_field_read!(can_bus_id, AcfCanField::CanBusId, u8);
    gen_split_u64_read!(
        message_timestamp,
        AcfCanField::MessageTimestampHi,
        AcfCanField::MessageTimestampLo
    );
    gen_field_read!(can_identifier, AcfCanField::CanIdentifier, u32);

    /// Returns all flags of the message
    pub fn flags(&self) -> CanFlags {
        let mut flags = CanFlags::empty();
        flags.set(CanFlags::MTV, self.mtv());
        flags.set(CanFlags::RTR, self.rtr());
        flags.set(CanFlags::EFF, self.eff());
        flags.set(CanFlags::BRS, self.brs());
        flags.set(CanFlags::FDF, self.fdf());
        flags.set(CanFlags::ESI, self.esi());
        flags
    }

    /// Returns the CAN frame payload, without padding
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let range = payload_range(self.0.len(), AcfCanLayout::HEADER_BYTES, self.pad().into());
        &self.0[range]
    }
}
// Mut
impl AcfCanView {
    gen_field_write!(set_pad, AcfCanField::Pad, u8);
    gen_flag_write!(set_mtv, AcfCanField::Mtv);
    gen_flag_write!(set_rtr, AcfCanField::Rtr);
    gen_flag_write!(set_eff, AcfCanField::Eff);
    gen_flag_write!(set_brs, AcfCanField::Brs);
    gen_flag_write!(set_fdf, AcfCanField::Fdf);
    gen_flag_write!(set_esi, AcfCanField::Esi);
    gen_field_write!(set_can_bus_id, AcfCanField::CanBusId, u8);
    gen_split_u64_write!(
        set_message_timestamp,
        AcfCanField::MessageTimestampHi,
        AcfCanField::MessageTimestampLo
    );
    gen_field_write!(set_can_identifier, AcfCanField::CanIdentifier, u32);

    /// Sets all flags of the message at once
    pub fn set_flags(&mut self, flags: CanFlags) {
        self.set_mtv(flags.contains(CanFlags::MTV));
        self.set_rtr(flags.contains(CanFlags::RTR));
        self.set_eff(flags.contains(CanFlags::EFF));
        self.set_brs(flags.contains(CanFlags::BRS));
        self.set_fdf(flags.contains(CanFlags::FDF));
        self.set_esi(flags.contains(CanFlags::ESI));
    }

    /// Returns the CAN frame payload, without padding
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = payload_range(self.0.len(), AcfCanLayout::HEADER_BYTES, self.pad().into());
        &mut self.0[range]
    }
}
impl Debug for AcfCanView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcfCanView")
            .field("msg_length", &self.msg_length())
            .field("pad", &self.pad())
            .field("flags", &self.flags())
            .field("can_bus_id", &self.can_bus_id())
            .field("message_timestamp", &self.message_timestamp())
            .field("can_identifier", &self.can_identifier())
            .field("payload", &self.payload())
            .finish()
    }
}

/// A view over an abbreviated ACF CAN message
///
/// Brief messages carry no timestamp, the MTV flag is expected to be zero.
#[repr(transparent)]
pub struct AcfCanBriefView([u8]);
impl View for AcfCanBriefView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = AcfCanBriefLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the CAN brief layout rejects messages shorter than its header
unsafe impl HeaderView for AcfCanBriefView {
    type Field = AcfCanBriefField;
}
impl AcfCanBriefView {
    gen_field_read!(msg_length, AcfCanBriefField::MsgLength, u16);
    gen_field_read!(pad, AcfCanBriefField::Pad, u8);
    gen_flag_read!(mtv, AcfCanBriefField::Mtv);
    gen_flag_read!(rtr, AcfCanBriefField::Rtr);
    gen_flag_read!(eff, AcfCanBriefField::Eff);
    gen_flag_read!(brs, AcfCanBriefField::Brs);
    gen_flag_read!(fdf, AcfCanBriefField::Fdf);
    gen_flag_read!(esi, AcfCanBriefField::Esi);
    gen_field_read!(can_bus_id, AcfCanBriefField::CanBusId, u8);
    gen_field_read!(can_identifier, AcfCanBriefField::CanIdentifier, u32);

    /// Returns all flags of the message
    pub fn flags(&self) -> CanFlags {
        let mut flags = CanFlags::empty();
        flags.set(CanFlags::MTV, self.mtv());
        flags.set(CanFlags::RTR, self.rtr());
        flags.set(CanFlags::EFF, self.eff());
        flags.set(CanFlags::BRS, self.brs());
        flags.set(CanFlags::FDF, self.fdf());
        flags.set(CanFlags::ESI, self.esi());
        flags
    }

    /// Returns the CAN frame payload, without padding
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let range = payload_range(
            self.0.len(),
            AcfCanBriefLayout::HEADER_BYTES,
            self.pad().into(),
        );
        &self.0[range]
    }
}
// Mut
impl AcfCanBriefView {
    gen_field_write!(set_pad, AcfCanBriefField::Pad, u8);
    gen_flag_write!(set_rtr, AcfCanBriefField::Rtr);
    gen_flag_write!(set_eff, AcfCanBriefField::Eff);
    gen_flag_write!(set_brs, AcfCanBriefField::Brs);
    gen_flag_write!(set_fdf, AcfCanBriefField::Fdf);
    gen_flag_write!(set_esi, AcfCanBriefField::Esi);
    gen_field_write!(set_can_bus_id, AcfCanBriefField::CanBusId, u8);
    gen_field_write!(set_can_identifier, AcfCanBriefField::CanIdentifier, u32);

    /// Returns the CAN frame payload, without padding
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = payload_range(
            self.0.len(),
            AcfCanBriefLayout::HEADER_BYTES,
            self.pad().into(),
        );
        &mut self.0[range]
    }
}
impl Debug for AcfCanBriefView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcfCanBriefView")
            .field("msg_length", &self.msg_length())
            .field("pad", &self.pad())
            .field("flags", &self.flags())
            .field("can_bus_id", &self.can_bus_id())
            .field("can_identifier", &self.can_identifier())
            .field("payload", &self.payload())
            .finish()
    }
}

/// A view over an ACF LIN message
#[repr(transparent)]
pub struct AcfLinView([u8]);
impl View for AcfLinView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = AcfLinLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the LIN layout rejects messages shorter than the LIN header
unsafe impl HeaderView for AcfLinView {
    type Field = AcfLinField;
}
impl AcfLinView {
    gen_field_read!(msg_length, AcfLinField::MsgLength, u16);
    gen_field_read!(pad, AcfLinField::Pad, u8);
    gen_flag_read!(mtv, AcfLinField::Mtv);
    gen_field_read!(lin_bus_id, AcfLinField::LinBusId, u8);
    gen_field_read!(lin_identifier, AcfLinField::LinIdentifier, u8);
    gen_split_u64_read!(
        message_timestamp,
        AcfLinField::MessageTimestampHi,
        AcfLinField::MessageTimestampLo
    );

    /// Returns the LIN frame payload, without padding
    #[inline]
    pub fn payload(&self) -> &[u8] {
        let range = payload_range(self.0.len(), AcfLinLayout::HEADER_BYTES, self.pad().into());
        &self.0[range]
    }
}
// Mut
impl AcfLinView {
    gen_field_write!(set_pad, AcfLinField::Pad, u8);
    gen_flag_write!(set_mtv, AcfLinField::Mtv);
    gen_field_write!(set_lin_bus_id, AcfLinField::LinBusId, u8);
    gen_exact_field_write!(set_lin_identifier, AcfLinField::LinIdentifier, u8);
    gen_split_u64_write!(
        set_message_timestamp,
        AcfLinField::MessageTimestampHi,
        AcfLinField::MessageTimestampLo
    );

    /// Returns the LIN frame payload, without padding
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        let range = payload_range(self.0.len(), AcfLinLayout::HEADER_BYTES, self.pad().into());
        &mut self.0[range]
    }
}
impl Debug for AcfLinView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcfLinView")
            .field("msg_length", &self.msg_length())
            .field("pad", &self.pad())
            .field("mtv", &self.mtv())
            .field("lin_bus_id", &self.lin_bus_id())
            .field("lin_identifier", &self.lin_identifier())
            .field("message_timestamp", &self.message_timestamp())
            .field("payload", &self.payload())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{field::FieldError, layout::LayoutParseError};

    // CAN message, 6 quadlets, 3 bytes padding, EFF + FDF, bus 5
    const CAN_MSG: [u8; 24] = [
        0x02, 0x06, 0b1100_1010, 0x05, // type, length, pad, flags, bus id
        0x00, 0x00, 0x00, 0x01, // message timestamp hi
        0x00, 0x00, 0x00, 0x02, // message timestamp lo
        0x12, 0x34, 0x56, 0x78, // can identifier
        0xAA, 0xBB, 0xCC, 0xDD, // payload
        0xEE, 0x00, 0x00, 0x00, // payload + pad
    ];

    #[test]
    fn should_read_can_message() {
        let (view, rest) = AcfCanView::from_slice(&CAN_MSG).unwrap();
        println!("{view:?}");

        assert!(rest.is_empty());
        assert_eq!(view.msg_length(), 6);
        assert_eq!(view.pad(), 3);
        assert_eq!(view.flags(), CanFlags::EFF | CanFlags::FDF);
        assert_eq!(view.can_bus_id(), 5);
        assert_eq!(view.message_timestamp(), (1 << 32) | 2);
        assert_eq!(view.can_identifier(), 0x1234_5678);
        assert_eq!(view.payload(), &[0xAA, 0xBB, 0xCC, 0xDD, 0xEE]);
    }

    #[test]
    fn should_only_cover_advertised_length() {
        let buf = [CAN_MSG.as_slice(), &[0x01, 0x02]].concat();
        let (view, rest) = AcfCommonView::from_slice(&buf).unwrap();

        assert_eq!(view.msg_type(), AcfMsgType::Can);
        assert_eq!(view.body().len(), 22);
        assert_eq!(rest, &[0x01, 0x02]);
    }

    #[test]
    fn should_write_can_fields_without_touching_siblings() {
        let mut buf = CAN_MSG;
        let (view, _) = AcfCanView::from_mut_slice(&mut buf).unwrap();

        view.set_flags(CanFlags::MTV | CanFlags::RTR);
        view.set_can_bus_id(31).unwrap();
        view.set_message_timestamp(u64::MAX);
        assert_eq!(
            view.set_can_identifier(1 << 29),
            Err(FieldError::ValueOutOfRange {
                value: 1 << 29,
                bits: 29
            })
        );

        assert_eq!(view.flags(), CanFlags::MTV | CanFlags::RTR);
        assert_eq!(view.pad(), 3);
        assert_eq!(view.can_bus_id(), 31);
        assert_eq!(view.message_timestamp(), u64::MAX);
        assert_eq!(view.can_identifier(), 0x1234_5678);
        assert_eq!(view.msg_length(), 6);
    }

    #[test]
    fn payload_should_follow_pad() {
        let mut buf = CAN_MSG;
        let (view, _) = AcfCanView::from_mut_slice(&mut buf).unwrap();
        view.set_pad(0).unwrap();
        assert_eq!(view.payload().len(), 8);
    }

    #[test]
    fn should_reject_other_message_types() {
        assert_eq!(
            AcfLinView::from_slice(&CAN_MSG).unwrap_err(),
            ViewConversionError::InvalidLayout(LayoutParseError::UnexpectedType {
                at: "AcfLin",
                expected: 0x03,
                actual: 0x01
            })
        );
    }

    #[test]
    fn should_read_and_write_lin_message() {
        let mut buf = [0u8; 16];
        buf[0] = 0x06;
        buf[1] = 0x04;
        let (view, _) = AcfLinView::from_mut_slice(&mut buf).unwrap();

        view.set_mtv(true);
        view.set_lin_bus_id(17).unwrap();
        view.set_lin_identifier(0x3C);
        view.set_message_timestamp(0x0102_0304_0506_0708);
        view.set_pad(2).unwrap();
        view.payload_mut().copy_from_slice(&[0x55, 0x66]);

        assert!(view.mtv());
        assert_eq!(view.lin_bus_id(), 17);
        assert_eq!(view.lin_identifier(), 0x3C);
        assert_eq!(view.payload(), &[0x55, 0x66]);
        assert_eq!(
            buf,
            [
                0x06, 0x04, 0b1011_0001, 0x3C, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
                0x55, 0x66, 0x00, 0x00
            ]
        );
    }

    #[test]
    fn should_read_can_brief_message() {
        let buf = [0x04, 0x03, 0b0100_0000, 0x02, 0x00, 0x00, 0x01, 0x23, 0x11, 0x22, 0x33, 0x00];
        let (view, _) = AcfCanBriefView::from_slice(&buf).unwrap();

        assert_eq!(view.can_identifier(), 0x123);
        assert_eq!(view.can_bus_id(), 2);
        assert!(!view.mtv());
        assert_eq!(view.payload(), &[0x11, 0x22, 0x33]);
    }
}
