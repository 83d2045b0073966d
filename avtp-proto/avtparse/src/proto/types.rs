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

//! AVTP subtypes, ACF message types and related structures.

/// The only AVTP version defined by IEEE 1722-2016.
pub const AVTP_VERSION: u8 = 0;

/// AVTP subtypes (IEEE 1722-2016, Table 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Subtype {
    /// IEC 61883/IIDC format.
    Iec61883Iidc = 0x00,
    /// MMA streams.
    MmaStream = 0x01,
    /// AVTP audio format.
    Aaf = 0x02,
    /// Compressed video format.
    Cvf = 0x03,
    /// Clock reference format.
    Crf = 0x04,
    /// Time-synchronous control format.
    Tscf = 0x05,
    /// SDI video format.
    Svf = 0x06,
    /// Raw video format.
    Rvf = 0x07,
    /// AES encrypted format, continuous.
    AefContinuous = 0x6E,
    /// Vendor specific format stream.
    VsfStream = 0x6F,
    /// Experimental format stream.
    EfStream = 0x7F,
    /// Non-time-synchronous control format.
    Ntscf = 0x82,
    /// ECC signed control format.
    Escf = 0xEC,
    /// ECC encrypted control format.
    Eecf = 0xED,
    /// AES encrypted format, discrete.
    AefDiscrete = 0xEE,
    /// AVDECC discovery protocol.
    Adp = 0xFA,
    /// AVDECC enumeration and control protocol.
    Aecp = 0xFB,
    /// AVDECC connection management protocol.
    Acmp = 0xFC,
    /// MAAP protocol.
    Maap = 0xFE,
    /// Experimental format control.
    EfControl = 0xFF,
    /// Other, unassigned subtypes.
    ///
    /// The discriminant is unused on the wire, the subtype is the carried value.
    Other(u8) = 0x08,
}
impl From<u8> for Subtype {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Subtype::Iec61883Iidc,
            0x01 => Subtype::MmaStream,
            0x02 => Subtype::Aaf,
            0x03 => Subtype::Cvf,
            0x04 => Subtype::Crf,
            0x05 => Subtype::Tscf,
            0x06 => Subtype::Svf,
            0x07 => Subtype::Rvf,
            0x6E => Subtype::AefContinuous,
            0x6F => Subtype::VsfStream,
            0x7F => Subtype::EfStream,
            0x82 => Subtype::Ntscf,
            0xEC => Subtype::Escf,
            0xED => Subtype::Eecf,
            0xEE => Subtype::AefDiscrete,
            0xFA => Subtype::Adp,
            0xFB => Subtype::Aecp,
            0xFC => Subtype::Acmp,
            0xFE => Subtype::Maap,
            0xFF => Subtype::EfControl,
            other => Subtype::Other(other),
        }
    }
}
impl From<Subtype> for u8 {
    fn from(val: Subtype) -> Self {
        match val {
            Subtype::Iec61883Iidc => 0x00,
            Subtype::MmaStream => 0x01,
            Subtype::Aaf => 0x02,
            Subtype::Cvf => 0x03,
            Subtype::Crf => 0x04,
            Subtype::Tscf => 0x05,
            Subtype::Svf => 0x06,
            Subtype::Rvf => 0x07,
            Subtype::AefContinuous => 0x6E,
            Subtype::VsfStream => 0x6F,
            Subtype::EfStream => 0x7F,
            Subtype::Ntscf => 0x82,
            Subtype::Escf => 0xEC,
            Subtype::Eecf => 0xED,
            Subtype::AefDiscrete => 0xEE,
            Subtype::Adp => 0xFA,
            Subtype::Aecp => 0xFB,
            Subtype::Acmp => 0xFC,
            Subtype::Maap => 0xFE,
            Subtype::EfControl => 0xFF,
            Subtype::Other(other) => other,
        }
    }
}

/// ACF message types (IEEE 1722-2016, Table 22).
///
/// The message type field is 7 bits wide, values above 0x7F never appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AcfMsgType {
    /// FlexRay message.
    FlexRay = 0x00,
    /// CAN message.
    Can = 0x01,
    /// Abbreviated CAN message.
    CanBrief = 0x02,
    /// LIN message.
    Lin = 0x03,
    /// MOST message.
    Most = 0x04,
    /// General purpose control message.
    Gpc = 0x05,
    /// Serial port message.
    Serial = 0x06,
    /// Parallel port message.
    Parallel = 0x07,
    /// Analog sensor message.
    Sensor = 0x08,
    /// Abbreviated analog sensor message.
    SensorBrief = 0x09,
    /// AECP message.
    Aecp = 0x0A,
    /// Video ancillary data message.
    Ancillary = 0x0B,
    /// User defined message types (0x78 to 0x7F).
    User(u8),
    /// Other, reserved message types.
    Other(u8),
}
impl From<u8> for AcfMsgType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => AcfMsgType::FlexRay,
            0x01 => AcfMsgType::Can,
            0x02 => AcfMsgType::CanBrief,
            0x03 => AcfMsgType::Lin,
            0x04 => AcfMsgType::Most,
            0x05 => AcfMsgType::Gpc,
            0x06 => AcfMsgType::Serial,
            0x07 => AcfMsgType::Parallel,
            0x08 => AcfMsgType::Sensor,
            0x09 => AcfMsgType::SensorBrief,
            0x0A => AcfMsgType::Aecp,
            0x0B => AcfMsgType::Ancillary,
            user @ 0x78..=0x7F => AcfMsgType::User(user),
            other => AcfMsgType::Other(other),
        }
    }
}
impl From<AcfMsgType> for u8 {
    fn from(val: AcfMsgType) -> Self {
        match val {
            AcfMsgType::FlexRay => 0x00,
            AcfMsgType::Can => 0x01,
            AcfMsgType::CanBrief => 0x02,
            AcfMsgType::Lin => 0x03,
            AcfMsgType::Most => 0x04,
            AcfMsgType::Gpc => 0x05,
            AcfMsgType::Serial => 0x06,
            AcfMsgType::Parallel => 0x07,
            AcfMsgType::Sensor => 0x08,
            AcfMsgType::SensorBrief => 0x09,
            AcfMsgType::Aecp => 0x0A,
            AcfMsgType::Ancillary => 0x0B,
            AcfMsgType::User(user) => user,
            AcfMsgType::Other(other) => other,
        }
    }
}

// CanFlags
bitflags::bitflags! {
    /// Flags of an ACF CAN message.
    ///
    /// The bit values follow the order of the flags on the wire, MTV being the most significant.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CanFlags: u8 {
        /// Message timestamp valid.
        const MTV = 0b0010_0000;
        /// Remote transmission request.
        const RTR = 0b0001_0000;
        /// Extended frame format (29 bit identifier).
        const EFF = 0b0000_1000;
        /// Bit rate switch (CAN FD).
        const BRS = 0b0000_0100;
        /// FD format indicator.
        const FDF = 0b0000_0010;
        /// Error state indicator (CAN FD).
        const ESI = 0b0000_0001;
    }
}
impl CanFlags {
    /// Returns true if the message is a CAN FD frame.
    pub fn is_fd(&self) -> bool {
        self.contains(CanFlags::FDF)
    }

    /// Returns true if the message uses a 29 bit identifier.
    pub fn is_extended(&self) -> bool {
        self.contains(CanFlags::EFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_should_roundtrip_all_values() {
        for raw in 0..=u8::MAX {
            assert_eq!(u8::from(Subtype::from(raw)), raw);
        }
        assert_eq!(Subtype::from(0x82), Subtype::Ntscf);
        assert_eq!(Subtype::from(0x10), Subtype::Other(0x10));
        assert_eq!(Subtype::from(0x08), Subtype::Other(0x08));
        assert_eq!(u8::from(Subtype::Other(0x00)), 0x00);
    }

    #[test]
    fn acf_msg_type_should_roundtrip_all_values() {
        for raw in 0..=0x7F {
            assert_eq!(u8::from(AcfMsgType::from(raw)), raw);
        }
        assert_eq!(AcfMsgType::from(0x01), AcfMsgType::Can);
        assert_eq!(AcfMsgType::from(0x7A), AcfMsgType::User(0x7A));
        assert_eq!(AcfMsgType::from(0x20), AcfMsgType::Other(0x20));
    }
}
