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

//! Field descriptors and descriptor tables
//!
//! Every AVTP header is described purely as data: a table of [FieldDescriptor]s indexed by a
//! per-header field enumeration. The codec in [read](crate::core::read) and
//! [write](crate::core::write) is the only place where bits are shifted and masked, so a new
//! header format only needs a new table.
//!
//! A descriptor locates one field inside a 32-bit network-order word (a quadlet):
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |    subtype    |H|vers.|                                       |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//!                  ^ offset 9, 3 bits wide
//! ```
//!
//! Bit 0 is the most significant bit of the quadlet. A field never spans two quadlets, values
//! wider than 32 bits (stream IDs, message timestamps) are split into a high and a low field.
//!
//! Tables are generated together with their field enumeration by [gen_field_table], which also
//! validates the table at compile time.

use std::{fmt::Debug, ops::Range};

/// Size of a quadlet in bytes
pub const QUADLET_BYTES: usize = 4;

/// Size of a quadlet in bits
pub const QUADLET_BITS: u32 = 32;

/// Location of a single field within a header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    quadlet: usize,
    offset: u32,
    bits: u32,
}
impl FieldDescriptor {
    /// Creates a new descriptor.
    ///
    /// Panics if the field is empty, wider than 32 bits or crosses a quadlet boundary. Used in a
    /// `const` table this turns into a compile error.
    pub const fn new(quadlet: usize, offset: u32, bits: u32) -> Self {
        assert!(bits >= 1, "field must be at least one bit wide");
        assert!(bits <= QUADLET_BITS, "field must be at most 32 bits wide");
        assert!(
            offset + bits <= QUADLET_BITS,
            "field must not span two quadlets"
        );

        Self {
            quadlet,
            offset,
            bits,
        }
    }

    /// Index of the quadlet containing the field
    #[inline]
    pub const fn quadlet(&self) -> usize {
        self.quadlet
    }

    /// Offset of the most significant bit of the field, counted from the MSB of the quadlet
    #[inline]
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// Width of the field in bits
    #[inline]
    pub const fn bits(&self) -> u32 {
        self.bits
    }

    /// Largest value the field can hold
    #[inline]
    pub const fn max_value(&self) -> u64 {
        (1u64 << self.bits) - 1
    }

    /// Returns true if the value fits into the field
    #[inline]
    pub const fn fits(&self, value: u64) -> bool {
        value <= self.max_value()
    }

    /// Distance between the least significant bit of the field and the LSB of the quadlet
    #[inline]
    pub const fn shift(&self) -> u32 {
        QUADLET_BITS - self.offset - self.bits
    }

    /// Mask selecting the field inside its host-order quadlet
    #[inline]
    pub const fn quadlet_mask(&self) -> u32 {
        (self.max_value() as u32) << self.shift()
    }

    /// Byte range of the quadlet containing the field
    #[inline]
    pub const fn byte_range(&self) -> Range<usize> {
        let start = self.quadlet * QUADLET_BYTES;
        start..start + QUADLET_BYTES
    }

    /// Minimal buffer length required to access the field
    #[inline]
    pub const fn required_bytes(&self) -> usize {
        (self.quadlet + 1) * QUADLET_BYTES
    }

    /// Bit range of the field, counted from the first bit of the header
    #[inline]
    pub const fn header_bit_range(&self) -> Range<usize> {
        let start = self.quadlet * QUADLET_BITS as usize + self.offset as usize;
        start..start + self.bits as usize
    }

    /// Returns the same field moved back by the given number of quadlets
    ///
    /// Used to place a header table behind other headers in the same buffer.
    #[inline]
    pub const fn shift_quadlets(self, quadlets: usize) -> Self {
        Self {
            quadlet: self.quadlet + quadlets,
            ..self
        }
    }

    /// Returns true if both fields share at least one bit
    #[inline]
    pub const fn overlaps(&self, other: &FieldDescriptor) -> bool {
        self.quadlet == other.quadlet && self.quadlet_mask() & other.quadlet_mask() != 0
    }

    /// Extracts the right-justified field value from a host-order quadlet
    #[inline(always)]
    pub const fn extract(&self, quadlet: u32) -> u64 {
        ((quadlet & self.quadlet_mask()) >> self.shift()) as u64
    }

    /// Replaces the field bits inside a host-order quadlet, leaving all other bits untouched
    ///
    /// Bits of `value` above the field width are dropped.
    #[inline(always)]
    pub const fn insert(&self, quadlet: u32, value: u64) -> u32 {
        let field_bits = ((value & self.max_value()) as u32) << self.shift();
        (quadlet & !self.quadlet_mask()) | field_bits
    }
}

/// Strongly typed identifier of a field in one header format
///
/// Implemented by the enumerations generated with [gen_field_table]. Each variant indexes the
/// descriptor table of its header, passing a field of one header to the accessors of another is
/// a type error.
pub trait HeaderField: Copy + Debug + Eq + 'static {
    /// Name of the header this field belongs to
    const HEADER: &'static str;
    /// Size of the fixed part of the header in bytes
    const SIZE_BYTES: usize;
    /// Descriptor table, indexed by [HeaderField::index]
    const TABLE: &'static [FieldDescriptor];
    /// All fields, in table order
    const ALL: &'static [Self];

    /// Index of the field in [HeaderField::TABLE]
    fn index(self) -> usize;

    /// Human readable name of the field
    fn name(self) -> &'static str;

    /// Returns the descriptor of the field
    #[inline]
    fn descriptor(self) -> FieldDescriptor {
        Self::TABLE[self.index()]
    }
}

/// Errors returned by the field codec
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum FieldError {
    /// The field index is not part of the descriptor table
    #[error("Unknown field {field}: table has {table_len} entries")]
    UnknownField {
        /// Requested field index
        field: usize,
        /// Number of entries in the table
        table_len: usize,
    },
    /// The buffer does not contain the quadlet of the field
    #[error("Buffer too small for field {field}: required {required}, actual {actual}")]
    BufferTooSmall {
        /// Requested field index
        field: usize,
        /// Number of bytes required
        required: usize,
        /// Number of bytes actually available
        actual: usize,
    },
    /// The value does not fit into the field
    #[error("Value {value} does not fit into {bits} bits")]
    ValueOutOfRange {
        /// Rejected value
        value: u64,
        /// Width of the field
        bits: u32,
    },
}

/// Looks up a descriptor and checks that the buffer contains its quadlet
#[inline]
pub(crate) fn checked_descriptor(
    table: &[FieldDescriptor],
    field: usize,
    buf_len: usize,
) -> Result<FieldDescriptor, FieldError> {
    let desc = *table.get(field).ok_or(FieldError::UnknownField {
        field,
        table_len: table.len(),
    })?;

    if buf_len < desc.required_bytes() {
        return Err(FieldError::BufferTooSmall {
            field,
            required: desc.required_bytes(),
            actual: buf_len,
        });
    }

    Ok(desc)
}

/// Returns true if no two fields of the table share a bit
pub const fn table_is_disjoint(table: &[FieldDescriptor]) -> bool {
    let mut i = 0;
    while i < table.len() {
        let mut j = i + 1;
        while j < table.len() {
            if table[i].overlaps(&table[j]) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Returns true if every field of the table lies within the first `size_bytes` bytes
pub const fn table_fits(table: &[FieldDescriptor], size_bytes: usize) -> bool {
    let mut i = 0;
    while i < table.len() {
        if table[i].required_bytes() > size_bytes {
            return false;
        }
        i += 1;
    }
    true
}

/// Macros for descriptor table definitions
pub mod macros {
    /// Generates a field enumeration together with its descriptor table
    ///
    /// ```ignore
    /// gen_field_table! {
    ///     /// Fields of the example header
    ///     pub enum ExampleField("Example", 4) {
    ///         /// Subtype
    ///         Subtype = (0, 0, 8) => "subtype",
    ///     }
    /// }
    /// ```
    ///
    /// Each variant maps to `(quadlet, offset, bits)` and a label used in debug output. The
    /// table is built in variant order, so every variant has exactly one entry. Overlapping
    /// fields and fields outside the declared header size fail to compile.
    macro_rules! gen_field_table {
        (
            $(#[$meta:meta])*
            $vis:vis enum $name:ident($header:literal, $size:expr) {
                $(
                    $(#[$vmeta:meta])*
                    $variant:ident = ($quadlet:expr, $offset:expr, $bits:expr) => $label:literal
                ),+ $(,)?
            }
        ) => {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            #[repr(u8)]
            $vis enum $name {
                $(
                    $(#[$vmeta])*
                    $variant,
                )+
            }
            impl $name {
                const DESCRIPTORS: &'static [$crate::core::field::FieldDescriptor] = &[
                    $( $crate::core::field::FieldDescriptor::new($quadlet, $offset, $bits), )+
                ];

                /// Returns the descriptor of the field, usable in const contexts
                #[inline]
                pub const fn desc(self) -> $crate::core::field::FieldDescriptor {
                    Self::DESCRIPTORS[self as usize]
                }
            }
            const _: () = {
                assert!(
                    $crate::core::field::table_is_disjoint($name::DESCRIPTORS),
                    "descriptor table contains overlapping fields"
                );
                assert!(
                    $crate::core::field::table_fits($name::DESCRIPTORS, $size),
                    "descriptor table exceeds the header size"
                );
            };
            impl $crate::core::field::HeaderField for $name {
                const HEADER: &'static str = $header;
                const SIZE_BYTES: usize = $size;
                const TABLE: &'static [$crate::core::field::FieldDescriptor] = $name::DESCRIPTORS;
                const ALL: &'static [Self] = &[ $( $name::$variant, )+ ];

                #[inline]
                fn index(self) -> usize {
                    self as usize
                }

                fn name(self) -> &'static str {
                    match self {
                        $( $name::$variant => $label, )+
                    }
                }
            }
        };
    }

    pub(crate) use gen_field_table;
}

#[cfg(test)]
mod tests {
    use super::*;

    macros::gen_field_table! {
        enum TestField("Test", 8) {
            A = (0, 0, 8) => "a",
            B = (0, 8, 1) => "b",
            C = (0, 9, 23) => "c",
            D = (1, 0, 32) => "d",
        }
    }

    #[test]
    fn should_compute_masks_and_shifts() {
        let desc = FieldDescriptor::new(0, 9, 3);
        assert_eq!(desc.shift(), 20);
        assert_eq!(desc.max_value(), 0b111);
        assert_eq!(desc.quadlet_mask(), 0x0070_0000);

        let full = FieldDescriptor::new(3, 0, 32);
        assert_eq!(full.shift(), 0);
        assert_eq!(full.quadlet_mask(), u32::MAX);
        assert_eq!(full.max_value(), u32::MAX as u64);
        assert_eq!(full.byte_range(), 12..16);
        assert_eq!(full.required_bytes(), 16);
    }

    #[test]
    fn should_extract_and_insert() {
        let desc = FieldDescriptor::new(0, 8, 1);
        assert_eq!(desc.extract(0x0080_0000), 1);
        assert_eq!(desc.extract(0xFF7F_FFFF), 0);
        assert_eq!(desc.insert(0xFF7F_FFFF, 1), u32::MAX);
        assert_eq!(desc.insert(u32::MAX, 0), 0xFF7F_FFFF);
    }

    #[test]
    fn should_detect_overlaps() {
        let a = FieldDescriptor::new(0, 0, 8);
        let b = FieldDescriptor::new(0, 7, 2);
        let c = FieldDescriptor::new(1, 0, 8);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!table_is_disjoint(&[a, b]));
        assert!(table_is_disjoint(&[a, c]));
    }

    #[test]
    fn should_check_table_size() {
        let table = [FieldDescriptor::new(0, 0, 8), FieldDescriptor::new(2, 0, 8)];
        assert!(table_fits(&table, 12));
        assert!(!table_fits(&table, 8));
    }

    #[test]
    #[should_panic(expected = "span two quadlets")]
    fn should_reject_field_crossing_quadlets() {
        let _ = FieldDescriptor::new(0, 30, 4);
    }

    #[test]
    #[should_panic(expected = "at least one bit")]
    fn should_reject_empty_field() {
        let _ = FieldDescriptor::new(0, 0, 0);
    }

    #[test]
    fn generated_table_should_be_in_variant_order() {
        assert_eq!(TestField::TABLE.len(), TestField::ALL.len());
        for (i, field) in TestField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
            assert_eq!(field.descriptor(), TestField::TABLE[i]);
            assert_eq!(field.desc(), TestField::TABLE[i]);
        }
        assert_eq!(TestField::C.descriptor(), FieldDescriptor::new(0, 9, 23));
        assert_eq!(TestField::D.name(), "d");
        assert_eq!(TestField::HEADER, "Test");
        assert_eq!(TestField::SIZE_BYTES, 8);
    }

    #[test]
    fn should_shift_descriptor_by_quadlets() {
        let desc = FieldDescriptor::new(1, 4, 4).shift_quadlets(2);
        assert_eq!(desc.quadlet(), 3);
        assert_eq!(desc.header_bit_range(), 100..104);
    }

    #[test]
    fn checked_descriptor_should_reject_unknown_fields_and_short_buffers() {
        assert_eq!(
            checked_descriptor(TestField::TABLE, 4, 8),
            Err(FieldError::UnknownField {
                field: 4,
                table_len: 4
            })
        );
        assert_eq!(
            checked_descriptor(TestField::TABLE, 3, 7),
            Err(FieldError::BufferTooSmall {
                field: 3,
                required: 8,
                actual: 7
            })
        );
        assert_eq!(
            checked_descriptor(TestField::TABLE, 3, 8),
            Ok(FieldDescriptor::new(1, 0, 32))
        );
    }
}
