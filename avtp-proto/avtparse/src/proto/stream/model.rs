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

//! Owned representations of NTSCF and TSCF PDUs
//!
//! Models carry their ACF messages, the data length fields are derived from them on encode.

use crate::{
    acf::{messages::AcfMessages, model::AcfMessageModel},
    core::{
        encode::{InvalidStructureError, WireEncode},
        view::{View, ViewConversionError},
        write::unchecked_field_be_write,
    },
    stream::{
        layout::{NtscfField, NtscfLayout, TscfField, TscfLayout},
        view::{NtscfView, TscfView},
    },
    types::{AVTP_VERSION, Subtype},
};

/// Decodes all ACF messages of a payload
fn messages_from(messages: AcfMessages<'_>) -> Result<Vec<AcfMessageModel>, ViewConversionError> {
    messages
        .map(|msg| AcfMessageModel::from_message(&msg?))
        .collect()
}

/// Encodes the messages behind each other, returns the number of bytes written
///
/// # Safety
/// The buffer must be large enough and all messages must be valid for encoding.
unsafe fn encode_messages(messages: &[AcfMessageModel], buf: &mut [u8]) -> usize {
    let mut offset = 0;
    for msg in messages {
        // SAFETY: forwarded from the caller
        offset += unsafe { msg.encode_unchecked(&mut buf[offset..]) };
    }
    offset
}

/// An NTSCF PDU with its ACF messages
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NtscfPdu {
    /// Stream ID, if valid
    pub stream_id: Option<u64>,
    /// Sequence number
    pub sequence_num: u8,
    /// ACF messages
    pub messages: Vec<AcfMessageModel>,
}
impl NtscfPdu {
    /// Constructs an `NtscfPdu` from an `NtscfView`
    ///
    /// Fails if any of the ACF messages is malformed.
    pub fn from_view(view: &NtscfView) -> Result<Self, ViewConversionError> {
        Ok(NtscfPdu {
            stream_id: view.sv().then(|| view.stream_id()),
            sequence_num: view.sequence_num(),
            messages: messages_from(view.acf_messages())?,
        })
    }

    /// Attempts to construct an `NtscfPdu` from a byte slice
    ///
    /// Returns the PDU and the remaining slice after it.
    pub fn from_slice(buf: &[u8]) -> Result<(Self, &[u8]), ViewConversionError> {
        let (view, rest) = NtscfView::from_slice(buf)?;
        Ok((Self::from_view(view)?, rest))
    }

    fn data_len(&self) -> usize {
        self.messages.iter().map(WireEncode::required_size).sum()
    }
}
impl WireEncode for NtscfPdu {
    fn required_size(&self) -> usize {
        NtscfLayout::HEADER_BYTES + self.data_len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        InvalidStructureError::check_fits(NtscfField::DataLength, self.data_len() as u64)?;
        self.messages.iter().try_for_each(WireEncode::wire_valid)
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        use NtscfField as F;

        buf[..NtscfLayout::HEADER_BYTES].fill(0);
        // SAFETY: caller guarantees buffer size and field ranges
        unsafe {
            unchecked_field_be_write(buf, F::Subtype.desc(), u8::from(Subtype::Ntscf).into());
            unchecked_field_be_write(buf, F::Version.desc(), AVTP_VERSION.into());
            unchecked_field_be_write(buf, F::DataLength.desc(), self.data_len() as u64);
            unchecked_field_be_write(buf, F::SequenceNum.desc(), self.sequence_num.into());
            if let Some(stream_id) = self.stream_id {
                unchecked_field_be_write(buf, F::Sv.desc(), 1);
                unchecked_field_be_write(buf, F::StreamIdHi.desc(), stream_id >> 32);
                unchecked_field_be_write(buf, F::StreamIdLo.desc(), stream_id & 0xFFFF_FFFF);
            }

            NtscfLayout::HEADER_BYTES
                + encode_messages(&self.messages, &mut buf[NtscfLayout::HEADER_BYTES..])
        }
    }
}

/// A TSCF PDU with its ACF messages
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TscfPdu {
    /// Stream ID, if valid
    pub stream_id: Option<u64>,
    /// Media clock restart
    pub mr: bool,
    /// Sequence number
    pub sequence_num: u8,
    /// Timestamp uncertain
    pub tu: bool,
    /// AVTP presentation timestamp, if valid
    pub avtp_timestamp: Option<u32>,
    /// Gateway specific information
    pub gateway_info: u32,
    /// ACF messages
    pub messages: Vec<AcfMessageModel>,
}
impl TscfPdu {
    /// Constructs a `TscfPdu` from a `TscfView`
    ///
    /// Fails if any of the ACF messages is malformed.
    pub fn from_view(view: &TscfView) -> Result<Self, ViewConversionError> {
        Ok(TscfPdu {
            stream_id: view.sv().then(|| view.stream_id()),
            mr: view.mr(),
            sequence_num: view.sequence_num(),
            tu: view.tu(),
            avtp_timestamp: view.tv().then(|| view.avtp_timestamp()),
            gateway_info: view.gateway_info(),
            messages: messages_from(view.acf_messages())?,
        })
    }

    /// Attempts to construct a `TscfPdu` from a byte slice
    ///
    /// Returns the PDU and the remaining slice after it.
    pub fn from_slice(buf: &[u8]) -> Result<(Self, &[u8]), ViewConversionError> {
        let (view, rest) = TscfView::from_slice(buf)?;
        Ok((Self::from_view(view)?, rest))
    }

    fn data_len(&self) -> usize {
        self.messages.iter().map(WireEncode::required_size).sum()
    }
}
impl WireEncode for TscfPdu {
    fn required_size(&self) -> usize {
        TscfLayout::HEADER_BYTES + self.data_len()
    }

    fn wire_valid(&self) -> Result<(), InvalidStructureError> {
        InvalidStructureError::check_fits(TscfField::StreamDataLength, self.data_len() as u64)?;
        self.messages.iter().try_for_each(WireEncode::wire_valid)
    }

    unsafe fn encode_unchecked(&self, buf: &mut [u8]) -> usize {
        use TscfField as F;

        buf[..TscfLayout::HEADER_BYTES].fill(0);
        // SAFETY: caller guarantees buffer size and field ranges
        unsafe {
            unchecked_field_be_write(buf, F::Subtype.desc(), u8::from(Subtype::Tscf).into());
            unchecked_field_be_write(buf, F::Version.desc(), AVTP_VERSION.into());
            unchecked_field_be_write(buf, F::Mr.desc(), self.mr.into());
            unchecked_field_be_write(buf, F::SequenceNum.desc(), self.sequence_num.into());
            unchecked_field_be_write(buf, F::Tu.desc(), self.tu.into());
            if let Some(stream_id) = self.stream_id {
                unchecked_field_be_write(buf, F::Sv.desc(), 1);
                unchecked_field_be_write(buf, F::StreamIdHi.desc(), stream_id >> 32);
                unchecked_field_be_write(buf, F::StreamIdLo.desc(), stream_id & 0xFFFF_FFFF);
            }
            if let Some(ts) = self.avtp_timestamp {
                unchecked_field_be_write(buf, F::Tv.desc(), 1);
                unchecked_field_be_write(buf, F::AvtpTimestamp.desc(), ts.into());
            }
            unchecked_field_be_write(buf, F::GatewayInfo.desc(), self.gateway_info.into());
            unchecked_field_be_write(buf, F::StreamDataLength.desc(), self.data_len() as u64);

            TscfLayout::HEADER_BYTES
                + encode_messages(&self.messages, &mut buf[TscfLayout::HEADER_BYTES..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        acf::model::{CanMessage, LinMessage},
        core::encode::EncodeError,
        types::CanFlags,
    };

    fn messages() -> Vec<AcfMessageModel> {
        vec![
            AcfMessageModel::Can(CanMessage {
                flags: CanFlags::BRS | CanFlags::FDF,
                bus_id: 1,
                identifier: 0x100,
                message_timestamp: Some(42),
                brief: false,
                payload: (0..12).collect(),
            }),
            AcfMessageModel::Lin(LinMessage {
                bus_id: 2,
                identifier: 0x10,
                message_timestamp: None,
                payload: vec![0xAB; 3],
            }),
        ]
    }

    #[test]
    fn ntscf_should_derive_data_length() {
        let pdu = NtscfPdu {
            stream_id: Some(0x0011_2233_4455_6677),
            sequence_num: 9,
            messages: messages(),
        };
        let buf = pdu.encode_to_vec().unwrap();
        assert_eq!(buf.len(), 12 + 28 + 16);

        let (view, rest) = NtscfView::from_slice(&buf).unwrap();
        assert!(rest.is_empty());
        assert_eq!(view.data_length(), 44);
        assert_eq!(view.stream_id(), 0x0011_2233_4455_6677);

        let (decoded, _) = NtscfPdu::from_slice(&buf).unwrap();
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn tscf_should_roundtrip_optional_fields() {
        let pdu = TscfPdu {
            stream_id: None,
            mr: true,
            sequence_num: 255,
            tu: false,
            avtp_timestamp: Some(0xCAFE_F00D),
            gateway_info: 77,
            messages: messages(),
        };
        let buf = pdu.encode_to_vec().unwrap();

        let (view, _) = TscfView::from_slice(&buf).unwrap();
        assert!(!view.sv());
        assert!(view.tv());
        assert_eq!(view.stream_data_length(), 44);

        let (decoded, _) = TscfPdu::from_slice(&buf).unwrap();
        assert_eq!(decoded, pdu);
    }

    #[test]
    fn ntscf_should_reject_payload_exceeding_data_length() {
        let big = AcfMessageModel::Other {
            msg_type: crate::types::AcfMsgType::Gpc,
            body: vec![0; 510],
        };
        let pdu = NtscfPdu {
            messages: vec![big.clone(), big.clone(), big.clone(), big.clone(), big],
            ..Default::default()
        };

        assert!(matches!(
            pdu.encode_to_vec(),
            Err(EncodeError::InvalidStructure(
                InvalidStructureError::FieldOutOfRange {
                    field: "ntscf_data_length",
                    ..
                }
            ))
        ));
    }

    #[test]
    fn empty_pdu_should_only_contain_header() {
        let buf = NtscfPdu::default().encode_to_vec().unwrap();
        assert_eq!(buf, [0x82, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }
}
