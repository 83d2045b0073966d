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

//! NTSCF and TSCF views
//!
//! A stream view covers the header and the payload advertised by the data length field. Any
//! bytes behind it are returned as rest on construction.
//!
//! See [`View`](crate::core::view) for more information about views in general.

use std::fmt::Debug;

use crate::{
    acf::messages::AcfMessages,
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
    stream::layout::{NtscfField, NtscfLayout, TscfField, TscfLayout},
};

/// A view over an NTSCF PDU
#[repr(transparent)]
pub struct NtscfView([u8]);
impl View for NtscfView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = NtscfLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the NTSCF layout covers at least the fixed header
unsafe impl HeaderView for NtscfView {
    type Field = NtscfField;
}
impl NtscfView {
    gen_flag_read!(sv, NtscfField::Sv);
    gen_field_read!(version, NtscfField::Version, u8);
    gen_flag_read!(r, NtscfField::R);
    gen_field_read!(data_length, NtscfField::DataLength, u16);
    gen_field_read!(sequence_num, NtscfField::SequenceNum, u8);
    gen_split_u64_read!(stream_id, NtscfField::StreamIdHi, NtscfField::StreamIdLo);

    /// Returns the payload
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.0[NtscfLayout::HEADER_BYTES..]
    }

    /// Returns an iterator over the ACF messages in the payload
    #[inline]
    pub fn acf_messages(&self) -> AcfMessages<'_> {
        AcfMessages::new(self.payload())
    }
}
// Mut
impl NtscfView {
    gen_flag_write!(set_sv, NtscfField::Sv);
    gen_field_write!(set_version, NtscfField::Version, u8);
    gen_field_write!(set_data_length, NtscfField::DataLength, u16);
    gen_exact_field_write!(set_sequence_num, NtscfField::SequenceNum, u8);
    gen_split_u64_write!(set_stream_id, NtscfField::StreamIdHi, NtscfField::StreamIdLo);

    /// Returns the payload
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.0[NtscfLayout::HEADER_BYTES..]
    }
}
impl Debug for NtscfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NtscfView")
            .field("sv", &self.sv())
            .field("version", &self.version())
            .field("r", &self.r())
            .field("data_length", &self.data_length())
            .field("sequence_num", &self.sequence_num())
            .field("stream_id", &format_args!("{:#018x}", self.stream_id()))
            .finish()
    }
}

/// A view over a TSCF PDU
#[repr(transparent)]
pub struct TscfView([u8]);
impl View for TscfView {
    #[inline]
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError> {
        let layout = TscfLayout::from_slice(buf)?;
        debug_assert!(buf.len() >= layout.size_bytes());
        Ok(layout.size_bytes())
    }

    gen_view_casts!();
}
// SAFETY: the TSCF layout covers at least the fixed header
unsafe impl HeaderView for TscfView {
    type Field = TscfField;
}
impl TscfView {
    gen_flag_read!(sv, TscfField::Sv);
    gen_field_read!(version, TscfField::Version, u8);
    gen_flag_read!(mr, TscfField::Mr);
    gen_flag_read!(tv, TscfField::Tv);
    gen_field_read!(sequence_num, TscfField::SequenceNum, u8);
    gen_flag_read!(tu, TscfField::Tu);
    gen_split_u64_read!(stream_id, TscfField::StreamIdHi, TscfField::StreamIdLo);
    gen_field_read!(avtp_timestamp, TscfField::AvtpTimestamp, u32);
    gen_field_read!(gateway_info, TscfField::GatewayInfo, u32);
    gen_field_read!(stream_data_length, TscfField::StreamDataLength, u16);

    /// Returns the payload
    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.0[TscfLayout::HEADER_BYTES..]
    }

    /// Returns an iterator over the ACF messages in the payload
    #[inline]
    pub fn acf_messages(&self) -> AcfMessages<'_> {
        AcfMessages::new(self.payload())
    }
}
// Mut
impl TscfView {
    gen_flag_write!(set_sv, TscfField::Sv);
    gen_field_write!(set_version, TscfField::Version, u8);
    gen_flag_write!(set_mr, TscfField::Mr);
    gen_flag_write!(set_tv, TscfField::Tv);
    gen_exact_field_write!(set_sequence_num, TscfField::SequenceNum, u8);
    gen_flag_write!(set_tu, TscfField::Tu);
    gen_split_u64_write!(set_stream_id, TscfField::StreamIdHi, TscfField::StreamIdLo);
    gen_exact_field_write!(set_avtp_timestamp, TscfField::AvtpTimestamp, u32);
    gen_exact_field_write!(set_gateway_info, TscfField::GatewayInfo, u32);
    gen_exact_field_write!(set_stream_data_length, TscfField::StreamDataLength, u16);

    /// Returns the payload
    #[inline]
    pub fn payload_mut(&mut self) -> &mut [u8] {
        &mut self.0[TscfLayout::HEADER_BYTES..]
    }
}
impl Debug for TscfView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TscfView")
            .field("sv", &self.sv())
            .field("version", &self.version())
            .field("mr", &self.mr())
            .field("tv", &self.tv())
            .field("sequence_num", &self.sequence_num())
            .field("tu", &self.tu())
            .field("stream_id", &format_args!("{:#018x}", self.stream_id()))
            .field("avtp_timestamp", &self.avtp_timestamp())
            .field("gateway_info", &self.gateway_info())
            .field("stream_data_length", &self.stream_data_length())
            .finish()
    }
}
