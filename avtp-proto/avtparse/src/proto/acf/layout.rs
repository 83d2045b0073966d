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

//! ACF message layouts
//!
//! Every ACF message starts with the same quadlet holding its type and its length in quadlets,
//! including the header itself. Message formats with a payload additionally advertise how many
//! bytes at the end of the message are padding.

use std::ops::Range;

use crate::{
    core::{
        debug::Annotations,
        field::{QUADLET_BYTES, macros::gen_field_table},
        layout::{Layout, LayoutParseError, ensure_len},
        read::unchecked_field_be_read,
    },
    types::AcfMsgType,
};

/// Layout of a single ACF message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcfMessageLayout {
    /// Message type
    pub msg_type: AcfMsgType,
    /// Total message length in bytes, header included
    pub msg_len: usize,
    /// Length of the fixed message header in bytes
    pub header_len: usize,
    /// Number of padding bytes at the end of the message
    pub pad: usize,
}
impl AcfMessageLayout {
    /// Reads the generic message layout from the start of the buffer
    ///
    /// Validates:
    /// - Advertised length covers at least the common header
    /// - Buffer is large enough for the whole message
    ///
    /// The message type is not checked, the header is assumed to be the common header only.
    pub fn from_slice(buf: &[u8]) -> Result<Self, LayoutParseError> {
        ensure_len("AcfCommon", buf, AcfCommonLayout::SIZE_BYTES)?;

        // SAFETY: buffer length checked above
        let (msg_type, msg_len) = unsafe {
            (
                unchecked_field_be_read(buf, AcfCommonField::MsgType.desc()) as u8,
                unchecked_field_be_read(buf, AcfCommonField::MsgLength.desc()) as usize
                    * QUADLET_BYTES,
            )
        };

        if msg_len < AcfCommonLayout::SIZE_BYTES {
            return Err(LayoutParseError::InvalidLength {
                at: "AcfCommon",
                advertised: msg_len,
                minimum: AcfCommonLayout::SIZE_BYTES,
            });
        }
        ensure_len("AcfMessage", buf, msg_len)?;

        Ok(Self {
            msg_type: msg_type.into(),
            msg_len,
            header_len: AcfCommonLayout::SIZE_BYTES,
            pad: 0,
        })
    }

    /// Narrows a generic layout to a specific message format
    ///
    /// Validates the message type, that the message covers the fixed header of the format, and
    /// that the padding fits into the payload.
    ///
    /// # Safety
    /// The buffer must hold at least `self.msg_len` bytes, i.e. it must be the buffer this layout
    /// was read from.
    unsafe fn narrow(
        self,
        buf: &[u8],
        at: &'static str,
        expected: AcfMsgType,
        header_len: usize,
    ) -> Result<Self, LayoutParseError> {
        if self.msg_type != expected {
            return Err(LayoutParseError::UnexpectedType {
                at,
                expected: expected.into(),
                actual: self.msg_type.into(),
            });
        }

        if self.msg_len < header_len {
            return Err(LayoutParseError::InvalidLength {
                at,
                advertised: self.msg_len,
                minimum: header_len,
            });
        }

        // All formats with a payload share the position of the pad field
        // SAFETY: the message holds at least the common header, guaranteed by the caller
        let pad = unsafe { unchecked_field_be_read(buf, AcfCanField::Pad.desc()) } as usize;
        if self.msg_len < header_len + pad {
            return Err(LayoutParseError::InvalidLength {
                at,
                advertised: self.msg_len,
                minimum: header_len + pad,
            });
        }

        Ok(Self {
            header_len,
            pad,
            ..self
        })
    }

    /// Byte range of the payload, relative to the start of the message
    #[inline]
    pub fn payload_range(&self) -> Range<usize> {
        self.header_len..self.msg_len - self.pad
    }

    /// Returns annotations for the message header, with the remaining quadlets as payload
    ///
    /// Messages too short for the header of their type are annotated with the common header
    /// only, so the annotations never cover more than `msg_len` bytes.
    pub fn annotations(&self) -> Annotations {
        let header_fits = |header_len: usize| self.msg_len >= header_len;
        let mut ann = match self.msg_type {
            AcfMsgType::Can if header_fits(AcfCanLayout::HEADER_BYTES) => {
                Annotations::for_header::<AcfCanField>()
            }
            AcfMsgType::CanBrief if header_fits(AcfCanBriefLayout::HEADER_BYTES) => {
                Annotations::for_header::<AcfCanBriefField>()
            }
            AcfMsgType::Lin if header_fits(AcfLinLayout::HEADER_BYTES) => {
                Annotations::for_header::<AcfLinField>()
            }
            _ => Annotations::for_header::<AcfCommonField>(),
        };

        let remaining = self.size_quadlets().saturating_sub(ann.quadlets());
        if remaining > 0 {
            ann.push_opaque("AcfPayload", remaining);
        }
        ann
    }
}
impl Layout for AcfMessageLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        self.msg_len
    }
}

/// Layout of the ACF common header
pub struct AcfCommonLayout;
impl AcfCommonLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | acf_msg_type|  acf_msg_length |       message specific        |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Total size in bytes
    pub const SIZE_BYTES: usize = 4;

    /// Bytes taken by the type and length fields, the rest of the quadlet is message specific
    pub const TYPE_LENGTH_BYTES: usize = 2;
}

gen_field_table! {
    /// Fields of the ACF common header
    pub enum AcfCommonField("AcfCommon", AcfCommonLayout::SIZE_BYTES) {
        /// Message type, see [AcfMsgType]
        MsgType = (0, 0, 7) => "acf_msg_type",
        /// Message length in quadlets, header included
        MsgLength = (0, 7, 9) => "acf_msg_length",
    }
}

/// Layout of the ACF CAN message header
pub struct AcfCanLayout;
impl AcfCanLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | acf_msg_type|  acf_msg_length |pad|M|R|E|B|F|E| rsv1|can_bus_id|
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                       message_timestamp                       |
    // +                                                               +
    // |                                                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | rsv2|                  can_identifier                         |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                         payload ...                           |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Size of the fixed header in bytes
    pub const HEADER_BYTES: usize = 16;

    /// Reads and validates the layout of a CAN message
    pub fn from_slice(buf: &[u8]) -> Result<AcfMessageLayout, LayoutParseError> {
        let layout = AcfMessageLayout::from_slice(buf)?;
        // SAFETY: layout was read from this buffer
        unsafe { layout.narrow(buf, "AcfCan", AcfMsgType::Can, Self::HEADER_BYTES) }
    }
}

gen_field_table! {
    /// Fields of the ACF CAN message header
    pub enum AcfCanField("AcfCan", AcfCanLayout::HEADER_BYTES) {
        /// Message type
        MsgType = (0, 0, 7) => "acf_msg_type",
        /// Message length in quadlets
        MsgLength = (0, 7, 9) => "acf_msg_length",
        /// Number of padding bytes behind the payload
        Pad = (0, 16, 2) => "pad",
        /// Message timestamp valid
        Mtv = (0, 18, 1) => "mtv",
        /// Remote transmission request
        Rtr = (0, 19, 1) => "rtr",
        /// Extended frame format
        Eff = (0, 20, 1) => "eff",
        /// Bit rate switch
        Brs = (0, 21, 1) => "brs",
        /// FD format indicator
        Fdf = (0, 22, 1) => "fdf",
        /// Error state indicator
        Esi = (0, 23, 1) => "esi",
        /// Reserved
        Rsv1 = (0, 24, 3) => "rsv1",
        /// CAN bus identifier
        CanBusId = (0, 27, 5) => "can_bus_id",
        /// Upper half of the message timestamp
        MessageTimestampHi = (1, 0, 32) => "message_timestamp_hi",
        /// Lower half of the message timestamp
        MessageTimestampLo = (2, 0, 32) => "message_timestamp_lo",
        /// Reserved
        Rsv2 = (3, 0, 3) => "rsv2",
        /// CAN frame identifier
        CanIdentifier = (3, 3, 29) => "can_identifier",
    }
}

/// Layout of the abbreviated ACF CAN message header
pub struct AcfCanBriefLayout;
impl AcfCanBriefLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | acf_msg_type|  acf_msg_length |pad|M|R|E|B|F|E| rsv1|can_bus_id|
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | rsv2|                  can_identifier                         |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                         payload ...                           |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Size of the fixed header in bytes
    pub const HEADER_BYTES: usize = 8;

    /// Reads and validates the layout of an abbreviated CAN message
    pub fn from_slice(buf: &[u8]) -> Result<AcfMessageLayout, LayoutParseError> {
        let layout = AcfMessageLayout::from_slice(buf)?;
        // SAFETY: layout was read from this buffer
        unsafe { layout.narrow(buf, "AcfCanBrief", AcfMsgType::CanBrief, Self::HEADER_BYTES) }
    }
}

gen_field_table! {
    /// Fields of the abbreviated ACF CAN message header
    pub enum AcfCanBriefField("AcfCanBrief", AcfCanBriefLayout::HEADER_BYTES) {
        /// Message type
        MsgType = (0, 0, 7) => "acf_msg_type",
        /// Message length in quadlets
        MsgLength = (0, 7, 9) => "acf_msg_length",
        /// Number of padding bytes behind the payload
        Pad = (0, 16, 2) => "pad",
        /// Message timestamp valid, always zero for brief messages
        Mtv = (0, 18, 1) => "mtv",
        /// Remote transmission request
        Rtr = (0, 19, 1) => "rtr",
        /// Extended frame format
        Eff = (0, 20, 1) => "eff",
        /// Bit rate switch
        Brs = (0, 21, 1) => "brs",
        /// FD format indicator
        Fdf = (0, 22, 1) => "fdf",
        /// Error state indicator
        Esi = (0, 23, 1) => "esi",
        /// Reserved
        Rsv1 = (0, 24, 3) => "rsv1",
        /// CAN bus identifier
        CanBusId = (0, 27, 5) => "can_bus_id",
        /// Reserved
        Rsv2 = (1, 0, 3) => "rsv2",
        /// CAN frame identifier
        CanIdentifier = (1, 3, 29) => "can_identifier",
    }
}

/// Layout of the ACF LIN message header
pub struct AcfLinLayout;
impl AcfLinLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // | acf_msg_type|  acf_msg_length |pad|M|lin_bus_id|lin_identifier|
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                       message_timestamp                       |
    // +                                                               +
    // |                                                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                         payload ...                           |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Size of the fixed header in bytes
    pub const HEADER_BYTES: usize = 12;

    /// Reads and validates the layout of a LIN message
    pub fn from_slice(buf: &[u8]) -> Result<AcfMessageLayout, LayoutParseError> {
        let layout = AcfMessageLayout::from_slice(buf)?;
        // SAFETY: layout was read from this buffer
        unsafe { layout.narrow(buf, "AcfLin", AcfMsgType::Lin, Self::HEADER_BYTES) }
    }
}

gen_field_table! {
    /// Fields of the ACF LIN message header
    pub enum AcfLinField("AcfLin", AcfLinLayout::HEADER_BYTES) {
        /// Message type
        MsgType = (0, 0, 7) => "acf_msg_type",
        /// Message length in quadlets
        MsgLength = (0, 7, 9) => "acf_msg_length",
        /// Number of padding bytes behind the payload
        Pad = (0, 16, 2) => "pad",
        /// Message timestamp valid
        Mtv = (0, 18, 1) => "mtv",
        /// LIN bus identifier
        LinBusId = (0, 19, 5) => "lin_bus_id",
        /// LIN frame identifier
        LinIdentifier = (0, 24, 8) => "lin_identifier",
        /// Upper half of the message timestamp
        MessageTimestampHi = (1, 0, 32) => "message_timestamp_hi",
        /// Lower half of the message timestamp
        MessageTimestampLo = (2, 0, 32) => "message_timestamp_lo",
    }
}

// The pad field is read through the CAN table for every format
const _: () = {
    assert!(AcfCanField::Pad.desc().quadlet() == AcfCanBriefField::Pad.desc().quadlet());
    assert!(AcfCanField::Pad.desc().offset() == AcfCanBriefField::Pad.desc().offset());
    assert!(AcfCanField::Pad.desc().offset() == AcfLinField::Pad.desc().offset());
};
