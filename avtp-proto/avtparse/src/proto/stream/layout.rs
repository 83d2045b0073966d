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

//! NTSCF and TSCF control stream layouts
//!
//! Both formats carry a sequence of ACF messages as payload. The payload length is advertised in
//! bytes by the header.

use crate::{
    core::{
        debug::Annotations,
        field::macros::gen_field_table,
        layout::{Layout, LayoutParseError, ensure_len},
        read::unchecked_field_be_read,
    },
    header::layout::CommonHeaderField,
    types::{AVTP_VERSION, Subtype},
};

/// Layout of an NTSCF PDU: fixed header plus payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NtscfLayout {
    /// Payload length in bytes
    pub data_len: usize,
}
impl NtscfLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |    subtype    |S|version|R|  ntscf_data_length  | sequence_num  |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                           stream_id                           |
    // +                                                               +
    // |                                                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                       ACF messages ...                        |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Size of the fixed header in bytes
    pub const HEADER_BYTES: usize = 12;

    /// Reads the layout from the start of the buffer
    ///
    /// Validates:
    /// - Subtype is NTSCF and version is supported
    /// - Buffer is large enough for the header and the advertised payload
    pub fn from_slice(buf: &[u8]) -> Result<Self, LayoutParseError> {
        check_common("Ntscf", buf, Subtype::Ntscf, Self::HEADER_BYTES)?;

        // SAFETY: buffer length checked above
        let data_len = unsafe { unchecked_field_be_read(buf, NtscfField::DataLength.desc()) };
        let layout = Self {
            data_len: data_len as usize,
        };
        ensure_len("NtscfPayload", buf, layout.size_bytes())?;

        Ok(layout)
    }

    /// Returns annotations for the NTSCF header, the payload is left out
    pub fn annotations(&self) -> Annotations {
        Annotations::for_header::<NtscfField>()
    }
}
impl Layout for NtscfLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        Self::HEADER_BYTES + self.data_len
    }
}

gen_field_table! {
    /// Fields of the NTSCF header
    pub enum NtscfField("Ntscf", NtscfLayout::HEADER_BYTES) {
        /// AVTP subtype
        Subtype = (0, 0, 8) => "subtype",
        /// Stream ID valid
        Sv = (0, 8, 1) => "sv",
        /// AVTP version
        Version = (0, 9, 3) => "version",
        /// Reserved
        R = (0, 12, 1) => "r",
        /// Payload length in bytes
        DataLength = (0, 13, 11) => "ntscf_data_length",
        /// Sequence number
        SequenceNum = (0, 24, 8) => "sequence_num",
        /// Upper half of the stream ID
        StreamIdHi = (1, 0, 32) => "stream_id_hi",
        /// Lower half of the stream ID
        StreamIdLo = (2, 0, 32) => "stream_id_lo",
    }
}

/// Layout of a TSCF PDU: fixed header plus payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TscfLayout {
    /// Payload length in bytes
    pub data_len: usize,
}
impl TscfLayout {
    //  0                   1                   2                   3
    //  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |    subtype    |S|version|M|rsv|T| sequence_num  |   rsv2    |U|
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                           stream_id                           |
    // +                                                               +
    // |                                                               |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                        avtp_timestamp                         |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                         gateway_info                          |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |      stream_data_length       |             rsv3              |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
    // |                       ACF messages ...                        |
    // +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+

    /// Size of the fixed header in bytes
    pub const HEADER_BYTES: usize = 24;

    /// Reads the layout from the start of the buffer
    ///
    /// Validates:
    /// - Subtype is TSCF and version is supported
    /// - Buffer is large enough for the header and the advertised payload
    pub fn from_slice(buf: &[u8]) -> Result<Self, LayoutParseError> {
        check_common("Tscf", buf, Subtype::Tscf, Self::HEADER_BYTES)?;

        // SAFETY: buffer length checked above
        let data_len = unsafe { unchecked_field_be_read(buf, TscfField::StreamDataLength.desc()) };
        let layout = Self {
            data_len: data_len as usize,
        };
        ensure_len("TscfPayload", buf, layout.size_bytes())?;

        Ok(layout)
    }

    /// Returns annotations for the TSCF header, the payload is left out
    pub fn annotations(&self) -> Annotations {
        Annotations::for_header::<TscfField>()
    }
}
impl Layout for TscfLayout {
    #[inline]
    fn size_bytes(&self) -> usize {
        Self::HEADER_BYTES + self.data_len
    }
}

gen_field_table! {
    /// Fields of the TSCF header
    pub enum TscfField("Tscf", TscfLayout::HEADER_BYTES) {
        /// AVTP subtype
        Subtype = (0, 0, 8) => "subtype",
        /// Stream ID valid
        Sv = (0, 8, 1) => "sv",
        /// AVTP version
        Version = (0, 9, 3) => "version",
        /// Media clock restart
        Mr = (0, 12, 1) => "mr",
        /// Reserved
        Rsv1 = (0, 13, 2) => "rsv1",
        /// AVTP timestamp valid
        Tv = (0, 15, 1) => "tv",
        /// Sequence number
        SequenceNum = (0, 16, 8) => "sequence_num",
        /// Reserved
        Rsv2 = (0, 24, 7) => "rsv2",
        /// Timestamp uncertain
        Tu = (0, 31, 1) => "tu",
        /// Upper half of the stream ID
        StreamIdHi = (1, 0, 32) => "stream_id_hi",
        /// Lower half of the stream ID
        StreamIdLo = (2, 0, 32) => "stream_id_lo",
        /// Presentation time
        AvtpTimestamp = (3, 0, 32) => "avtp_timestamp",
        /// Gateway specific information
        GatewayInfo = (4, 0, 32) => "gateway_info",
        /// Payload length in bytes
        StreamDataLength = (5, 0, 16) => "stream_data_length",
        /// Reserved
        Rsv3 = (5, 16, 16) => "rsv3",
    }
}

/// Checks buffer size, subtype and version shared by both stream formats
fn check_common(
    at: &'static str,
    buf: &[u8],
    expected: Subtype,
    header_bytes: usize,
) -> Result<(), LayoutParseError> {
    ensure_len(at, buf, header_bytes)?;

    // SAFETY: the header is longer than the common header
    let (subtype, version) = unsafe {
        (
            unchecked_field_be_read(buf, CommonHeaderField::Subtype.desc()) as u8,
            unchecked_field_be_read(buf, CommonHeaderField::Version.desc()) as u8,
        )
    };

    let expected = u8::from(expected);
    if subtype != expected {
        return Err(LayoutParseError::UnexpectedType {
            at,
            expected,
            actual: subtype,
        });
    }
    if version != AVTP_VERSION {
        return Err(LayoutParseError::UnsupportedVersion { at, version });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ntscf(data_len: u16) -> Vec<u8> {
        let mut buf = vec![0u8; NtscfLayout::HEADER_BYTES + data_len as usize];
        buf[0] = 0x82;
        buf[1] = (data_len >> 8) as u8 & 0x07;
        buf[2] = data_len as u8;
        buf
    }

    #[test]
    fn ntscf_should_include_payload() {
        let buf = ntscf(16);
        let layout = NtscfLayout::from_slice(&buf).unwrap();
        assert_eq!(layout.data_len, 16);
        assert_eq!(layout.size_bytes(), 28);
    }

    #[test]
    fn ntscf_should_reject_truncated_payload() {
        let mut buf = ntscf(16);
        buf.truncate(20);
        assert_eq!(
            NtscfLayout::from_slice(&buf),
            Err(LayoutParseError::BufferTooSmall {
                at: "NtscfPayload",
                required: 28,
                actual: 20
            })
        );
    }

    #[test]
    fn should_reject_wrong_subtype_and_version() {
        let mut buf = ntscf(0);
        assert_eq!(
            TscfLayout::from_slice(&[buf.clone(), vec![0; 12]].concat()),
            Err(LayoutParseError::UnexpectedType {
                at: "Tscf",
                expected: 0x05,
                actual: 0x82
            })
        );

        buf[1] |= 0b0001_0000;
        assert_eq!(
            NtscfLayout::from_slice(&buf),
            Err(LayoutParseError::UnsupportedVersion {
                at: "Ntscf",
                version: 1
            })
        );
    }

    #[test]
    fn tscf_should_read_stream_data_length() {
        let mut buf = vec![0u8; 32];
        buf[0] = 0x05;
        buf[20] = 0x00;
        buf[21] = 0x08;
        let layout = TscfLayout::from_slice(&buf).unwrap();
        assert_eq!(layout.data_len, 8);
        assert_eq!(layout.size_quadlets(), 8);
    }
}
