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

//! Owned representations of ACF messages

use crate::{
    acf::{
        layout::{
            AcfCanBriefField, AcfCanBriefLayout, AcfCanField, AcfCanLayout, AcfCommonField,
            AcfCommonLayout, AcfLinField, AcfLinLayout,
        },
        messages::{AcfMessage, AcfMessageKind},
        view::{AcfCanBriefView, AcfCanView, AcfLinView},
    },
    core::{
        encode::{InvalidStructureError, WireEncode},
        field::QUADLET_BYTES,
        view::ViewConversionError,
        write::unchecked_field_be_write,
    },
    types::{AcfMsgType, CanFlags},
};

/// Size of a message with the given header size and payload, padded to whole quadlets
#[inline]
fn padded_len(header_len: usize, payload_len: usize) -> usize {
    (header_len + payload_len).next_multiple_of(QUADLET_BYTES)
}

/// Checks that a message of `len` bytes can be advertised in the length field
fn check_msg_len(len: usize) -> Result<(), InvalidStructureError> {
    InvalidStructureError::check_fits(AcfCommonField::MsgLength, (len / QUADLET_BYTES) as u64)
}

/// A CAN message carried in ACF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanMessage {
    /// Frame flags
    ///
    /// The MTV flag is derived from `message_timestamp` and ignored here.
    pub flags: CanFlags,
    /// CAN bus identifier, 5 bits
    pub bus_id: u8,
    /// CAN frame identifier, 11 or 29 bits
    pub identifier: u32,
    /// Message timestamp, if valid
    pub message_timestamp: Option<u64>,
    /// Encode as abbreviated CAN message, which cannot carry a timestamp
    pub brief: bool,
    /// Frame payload
    pub payload: Vec<u8>,
}
impl CanMessage {
    /// Constructs a `CanMessage` from an `AcfCanView`
    pub fn from_view(view: &AcfCanView) -> Self {
        CanMessage {
            flags: view.flags() - CanFlags::MTV,
            bus_id: view.can_bus_id(),
            identifier: view.can_identifier(),
            message_timestamp: view.mtv().then(|| view.message_timestamp()),
            brief: false,
            payload: view.payload().to_vec(),
        }
    }

    /// Constructs a `CanMessage` from an `AcfCanBriefView`
    pub fn from_brief_view(view: &AcfCanBriefView) -> Self {
        CanMessage {
            flags: view.flags() - CanFlags::MTV,
            bus_id: view.can_bus_id(),
            identifier: view.can_identifier(),
            message_timestamp: None,
            brief: true,
            payload: view.payload().to_vec(),
        }
    }

    fn header_len(&self) -> usize {
        if self.brief {
            AcfCanBriefLayout::HEADER_BYTES
        } else {
            AcfCanLayout::HEADER_BYTES
        }
    }
}
impl WireEncode for CanMessage {
    fn required_size(&self) -> usize {
        padded_len(self.header_len(), self.payload.len())
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        if self.brief && self.message_timestamp.is_some() {
            return Err("abbreviated CAN message cannot carry a timestamp".into());
        }
        if !self.flags.contains(CanFlags::EFF) && self.identifier > 0x7FF {
            return Err("standard CAN identifier exceeds 11 bits".into());
        }
        InvalidStructureError::check_fits(AcfCanField::CanBusId, self.bus_id.into())?;
        InvalidStructureError::check_fits(AcfCanField::CanIdentifier, self.identifier.into())?;
        check_msg_len(self.required_size())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        let size = self.required_size();
        let header_len = self.header_len();
        let pad = size - header_len - self.payload.len();

        buf[..size].fill(0);
        buf[header_len..header_len + self.payload.len()].copy_from_slice(&self.payload);

        let msg_type = if self.brief {
            AcfMsgType::CanBrief
        } else {
            AcfMsgType::Can
        };
        let flags = self.flags - CanFlags::MTV;

        // SAFETY: caller guarantees buffer size and field ranges
        unsafe {
            use AcfCanField as F;
            // Quadlet 0 is shared by both formats
            unchecked_field_be_write(buf, F::MsgType.desc(), u8::from(msg_type).into());
            unchecked_field_be_write(buf, F::MsgLength.desc(), (size / QUADLET_BYTES) as u64);
            unchecked_field_be_write(buf, F::Pad.desc(), pad as u64);
            unchecked_field_be_write(buf, F::Rtr.desc(), flags.contains(CanFlags::RTR).into());
            unchecked_field_be_write(buf, F::Eff.desc(), flags.contains(CanFlags::EFF).into());
            unchecked_field_be_write(buf, F::Brs.desc(), flags.contains(CanFlags::BRS).into());
            unchecked_field_be_write(buf, F::Fdf.desc(), flags.contains(CanFlags::FDF).into());
            unchecked_field_be_write(buf, F::Esi.desc(), flags.contains(CanFlags::ESI).into());
            unchecked_field_be_write(buf, F::CanBusId.desc(), self.bus_id.into());

            if self.brief {
                unchecked_field_be_write(
                    buf,
                    AcfCanBriefField::CanIdentifier.desc(),
                    self.identifier.into(),
                );
            } else {
                if let Some(ts) = self.message_timestamp {
                    unchecked_field_be_write(buf, F::Mtv.desc(), 1);
                    unchecked_field_be_write(buf, F::MessageTimestampHi.desc(), ts >> 32);
                    unchecked_field_be_write(buf, F::MessageTimestampLo.desc(), ts & 0xFFFF_FFFF);
                }
                unchecked_field_be_write(buf, F::CanIdentifier.desc(), self.identifier.into());
            }
        }

        size
    }
}

/// A LIN message carried in ACF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinMessage {
    /// LIN bus identifier, 5 bits
    pub bus_id: u8,
    /// LIN frame identifier
    pub identifier: u8,
    /// Message timestamp, if valid
    pub message_timestamp: Option<u64>,
    /// Frame payload
    pub payload: Vec<u8>,
}
impl LinMessage {
    /// Constructs a `LinMessage` from an `AcfLinView`
    pub fn from_view(view: &AcfLinView) -> Self {
        LinMessage {
            bus_id: view.lin_bus_id(),
            identifier: view.lin_identifier(),
            message_timestamp: view.mtv().then(|| view.message_timestamp()),
            payload: view.payload().to_vec(),
        }
    }
}
impl WireEncode for LinMessage {
    fn required_size(&self) -> usize {
        padded_len(AcfLinLayout::HEADER_BYTES, self.payload.len())
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        InvalidStructureError::check_fits(AcfLinField::LinBusId, self.bus_id.into())?;
        check_msg_len(self.required_size())
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        let size = self.required_size();
        let header_len = AcfLinLayout::HEADER_BYTES;
        let pad = size - header_len - self.payload.len();

        buf[..size].fill(0);
        buf[header_len..header_len + self.payload.len()].copy_from_slice(&self.payload);

        // SAFETY: caller guarantees buffer size and field ranges
        unsafe {
            use AcfLinField as F;
            unchecked_field_be_write(buf, F::MsgType.desc(), u8::from(AcfMsgType::Lin).into());
            unchecked_field_be_write(buf, F::MsgLength.desc(), (size / QUADLET_BYTES) as u64);
            unchecked_field_be_write(buf, F::Pad.desc(), pad as u64);
            unchecked_field_be_write(buf, F::LinBusId.desc(), self.bus_id.into());
            unchecked_field_be_write(buf, F::LinIdentifier.desc(), self.identifier.into());
            if let Some(ts) = self.message_timestamp {
                unchecked_field_be_write(buf, F::Mtv.desc(), 1);
                unchecked_field_be_write(buf, F::MessageTimestampHi.desc(), ts >> 32);
                unchecked_field_be_write(buf, F::MessageTimestampLo.desc(), ts & 0xFFFF_FFFF);
            }
        }

        size
    }
}

/// Any ACF message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcfMessageModel {
    /// CAN or abbreviated CAN message
    Can(CanMessage),
    /// LIN message
    Lin(LinMessage),
    /// Message type without a dedicated model, kept as raw body
    Other {
        /// Message type
        msg_type: AcfMsgType,
        /// Everything behind the type and length fields
        ///
        /// Together with the two leading bytes the message must be a whole number of quadlets.
        body: Vec<u8>,
    },
}
impl AcfMessageModel {
    /// Constructs the model matching the type of the message
    pub fn from_message(msg: &AcfMessage<'_>) -> Result<Self, ViewConversionError> {
        Ok(match msg.kind()? {
            AcfMessageKind::Can(view) => AcfMessageModel::Can(CanMessage::from_view(view)),
            AcfMessageKind::CanBrief(view) => {
                AcfMessageModel::Can(CanMessage::from_brief_view(view))
            }
            AcfMessageKind::Lin(view) => AcfMessageModel::Lin(LinMessage::from_view(view)),
            AcfMessageKind::Other(view) => {
                AcfMessageModel::Other {
                    msg_type: view.msg_type(),
                    body: view.body().to_vec(),
                }
            }
        })
    }
}
impl WireEncode for AcfMessageModel {
    fn required_size(&self) -> usize {
        match self {
            AcfMessageModel::Can(can) => can.required_size(),
            AcfMessageModel::Lin(lin) => lin.required_size(),
            AcfMessageModel::Other { body, .. } => {
                AcfCommonLayout::TYPE_LENGTH_BYTES + body.len()
            }
        }
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        match self {
            AcfMessageModel::Can(can) => can.wire_valid(),
            AcfMessageModel::Lin(lin) => lin.wire_valid(),
            AcfMessageModel::Other { msg_type, .. } => {
                InvalidStructureError::check_fits(
                    AcfCommonField::MsgType,
                    u8::from(*msg_type).into(),
                )?;
                let size = self.required_size();
                if size < AcfCommonLayout::SIZE_BYTES || !size.is_multiple_of(QUADLET_BYTES) {
                    return Err("ACF message must be a whole number of quadlets".into());
                }
                check_msg_len(self.required_size())
            }
        }
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        match self {
            // SAFETY: forwarded from the caller
            AcfMessageModel::Can(can) => unsafe { can.encode_unchecked(buf) },
            // SAFETY: forwarded from the caller
            AcfMessageModel::Lin(lin) => unsafe { lin.encode_unchecked(buf) },
            AcfMessageModel::Other { msg_type, body } => {
                let size = self.required_size();
                buf[AcfCommonLayout::TYPE_LENGTH_BYTES..size].copy_from_slice(body);

                // SAFETY: caller guarantees buffer size and field ranges
                unsafe {
                    use AcfCommonField as F;
                    unchecked_field_be_write(buf, F::MsgType.desc(), u8::from(*msg_type).into());
                    unchecked_field_be_write(
                        buf,
                        F::MsgLength.desc(),
                        (size / QUADLET_BYTES) as u64,
                    );
                }

                size
            }
        }
    }
}
