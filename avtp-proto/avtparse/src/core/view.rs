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

//! Utilities for interacting with byte buffers via zero-copy views
//!
//! Views are zero-copy representations of headers over byte buffers.
//!
//! All views must be #[repr(transparent)] wrappers around `[u8]`.
//! Essentially, this means that every view is just a wide pointer.
//!
//! This allows interpreting byte slices as views via transmute:
//!
//! * &[u8] == &View
//! * &mut [u8] == &mut View
//! * `Box<[u8]>` == `Box<View>`
//!
//! Thanks to this, mutability and ownership is fully handled by Rust's built-in types, and the
//! borrow checker prevents two writers on the same PDU.
//!
//! ### Safety
//!
//! Core invariant needing to be upheld is that the buffer which the view points to, is large enough
//! to read all fields of the view's descriptor table.
//!
//! Views check this once in [View::has_required_size]. Descriptor tables are checked at compile
//! time to lie within the header size, so every field read afterwards is in bounds.

use crate::core::{
    field::{FieldError, HeaderField},
    layout::LayoutParseError,
    read::unchecked_field_be_read,
    write::set,
};

/// Trait for views over byte buffers
///
/// Views are zero-copy representations of data structures over byte buffers.
/// They provide methods to read fields directly from the buffer without copying data.
///
/// A view must implement methods to check the required size of the buffer
pub trait View {
    /// Asserts that the buffer has the required size for the view.
    /// Returns the number of bytes used by the view in the buffer.
    ///
    /// If the buffer is too small, returns a ViewConversionError.
    ///
    /// # Important
    ///
    /// This function ensures that all view functions are safe to call after it returns Ok.
    /// If this function is incorrectly implemented, it will lead to undefined behavior.
    fn has_required_size(buf: &[u8]) -> Result<usize, ViewConversionError>;

    /// Converts a slice into the view
    ///
    /// This function checks that the buffer is at least as large as required by the view.
    #[inline]
    fn from_slice(buf: &[u8]) -> Result<(&Self, &[u8]), ViewConversionError> {
        let size = Self::has_required_size(buf)?;

        debug_assert!(buf.len() >= size);

        // SAFETY: size is checked to be at least the required size
        let (view_buf, rest) = unsafe { buf.split_at_unchecked(size) };
        let view = unsafe { Self::from_slice_unchecked(view_buf) };

        Ok((view, rest))
    }

    /// Converts a mutable slice into the view
    ///
    /// This function checks that the buffer is at least as large as required by the view.
    #[inline]
    fn from_mut_slice(buf: &mut [u8]) -> Result<(&mut Self, &mut [u8]), ViewConversionError> {
        let size = Self::has_required_size(buf)?;

        debug_assert!(buf.len() >= size);

        // SAFETY: size is checked to be at least the required size
        let (view_buf, rest) = unsafe { buf.split_at_mut_unchecked(size) };
        let view = unsafe { Self::from_mut_slice_unchecked(view_buf) };

        Ok((view, rest))
    }

    /// Converts a boxed slice into the view
    ///
    /// This function checks that the buffer is exactly as large as required by the view.
    #[inline]
    fn from_boxed(buf: Box<[u8]>) -> Result<Box<Self>, ViewConversionError> {
        let size = Self::has_required_size(&buf)?;

        if buf.len() != size {
            return Err(ViewConversionError::Other(
                "Boxed buffer size does not match view size",
            ));
        }

        Ok(unsafe { Self::from_boxed_unchecked(buf) })
    }

    /// Returns the underlying byte representation of the view
    fn as_bytes(&self) -> &[u8];

    /// Returns the underlying mutable byte representation of the view
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Converts the view into an owned boxed slice
    #[inline]
    fn to_owned(&self) -> Box<Self> {
        unsafe { Self::from_boxed_unchecked(self.as_bytes().to_vec().into_boxed_slice()) }
    }

    /// Converts the slice into the view without checking sizes
    ///
    /// # Safety
    /// The caller must ensure that the buffer is at least as large as required by the view
    /// this is usually done by calling [View::has_required_size] before.
    unsafe fn from_slice_unchecked(buf: &[u8]) -> &Self;

    /// Converts the mutable slice into the view without checking sizes
    ///
    /// # Safety
    /// The caller must ensure that the buffer is at least as large as required by the view
    /// this is usually done by calling [View::has_required_size] before.
    unsafe fn from_mut_slice_unchecked(buf: &mut [u8]) -> &mut Self;

    /// Converts the boxed slice into the view without checking sizes
    ///
    /// # Safety
    /// The caller must ensure that the buffer is at least as large as required by the view
    /// this is usually done by calling [View::has_required_size] before.
    unsafe fn from_boxed_unchecked(buf: Box<[u8]>) -> Box<Self>;
}

/// A view whose fields are described by a descriptor table
///
/// Provides the generic field accessors every header exposes next to its named accessors.
///
/// # Safety
///
/// Implementors must guarantee that [View::has_required_size] never accepts a buffer shorter than
/// `Self::Field::SIZE_BYTES`. Field reads are unchecked.
pub unsafe trait HeaderView: View {
    /// Field enumeration of the header
    type Field: HeaderField;

    /// Reads a field
    #[inline]
    fn field(&self, field: Self::Field) -> u64 {
        // SAFETY: the view holds at least SIZE_BYTES bytes (trait contract) and every descriptor
        // of the table lies within SIZE_BYTES (checked at compile time)
        unsafe { unchecked_field_be_read(self.as_bytes(), field.descriptor()) }
    }

    /// Writes a field
    ///
    /// Fails without modifying the buffer if the value does not fit into the field.
    #[inline]
    fn set_field(&mut self, field: Self::Field, value: u64) -> Result<(), FieldError> {
        set(self.as_bytes_mut(), field, value)
    }
}

/// Errors that can occur during view conversion
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq, Hash)]
pub enum ViewConversionError {
    /// Buffer is too small for the view
    #[error("Buffer too small at {at}: required {required}, got {actual}")]
    BufferTooSmall {
        /// Location where the error occurred
        at: &'static str,
        /// Required size in bytes
        required: usize,
        /// Actual size in bytes
        actual: usize,
    },
    /// The buffer does not hold a valid layout
    #[error("Invalid layout: {0}")]
    InvalidLayout(LayoutParseError),
    /// Other errors
    #[error("Could not convert view: {0}")]
    Other(&'static str),
}
impl From<LayoutParseError> for ViewConversionError {
    fn from(value: LayoutParseError) -> Self {
        match value {
            LayoutParseError::BufferTooSmall {
                at,
                required,
                actual,
            } => {
                ViewConversionError::BufferTooSmall {
                    at,
                    required,
                    actual,
                }
            }
            other => ViewConversionError::InvalidLayout(other),
        }
    }
}

pub(crate) mod macros {
    /// Implements the pointer casts of [View](crate::core::view::View) for a
    /// `#[repr(transparent)]` wrapper around `[u8]`
    macro_rules! gen_view_casts {
        () => {
            #[inline]
            unsafe fn from_slice_unchecked(buf: &[u8]) -> &Self {
                // SAFETY: See View trait documentation
                unsafe { std::mem::transmute(buf) }
            }

            #[inline]
            unsafe fn from_mut_slice_unchecked(buf: &mut [u8]) -> &mut Self {
                // SAFETY: See View trait documentation
                unsafe { std::mem::transmute(buf) }
            }

            #[inline]
            unsafe fn from_boxed_unchecked(buf: Box<[u8]>) -> Box<Self> {
                // SAFETY: See View trait documentation
                unsafe { std::mem::transmute(buf) }
            }

            #[inline]
            fn as_bytes(&self) -> &[u8] {
                &self.0
            }

            #[inline]
            fn as_bytes_mut(&mut self) -> &mut [u8] {
                &mut self.0
            }
        };
    }
    pub(crate) use gen_view_casts;

    /// Macro to generate field readers - expects self to implement `HeaderView`
    ///
    /// - $name: name of the generated function
    /// - $field: field enumeration variant
    /// - $repr: representation type of the field
    ///
    /// Fails to compile if the field is wider than the representation.
    macro_rules! gen_field_read {
        ($name:ident, $field:expr, $repr:ty) => {
            #[inline]
            #[allow(unused)]
            /// Reads the field
            pub fn $name(&self) -> $repr {
                use $crate::core::view::HeaderView;
                const {
                    assert!(
                        $field.desc().bits() <= <$repr>::BITS,
                        "field is wider than its representation"
                    )
                };
                self.field($field) as $repr
            }
        };
    }
    pub(crate) use gen_field_read;

    /// Macro to generate single bit flag readers - expects self to implement `HeaderView`
    macro_rules! gen_flag_read {
        ($name:ident, $field:expr) => {
            #[inline]
            #[allow(unused)]
            /// Returns true if the flag is set
            pub fn $name(&self) -> bool {
                use $crate::core::view::HeaderView;
                const { assert!($field.desc().bits() == 1, "flag must be a single bit") };
                self.field($field) != 0
            }
        };
    }
    pub(crate) use gen_flag_read;

    /// Macro to generate writers for fields narrower than their representation
    ///
    /// The generated function rejects values that do not fit into the field.
    macro_rules! gen_field_write {
        ($name:ident, $field:expr, $repr:ty) => {
            #[inline]
            #[allow(unused)]
            /// Writes the field
            ///
            /// Fails if the value does not fit into the field, the buffer is left unchanged.
            pub fn $name(
                &mut self,
                value: $repr,
            ) -> Result<(), $crate::core::field::FieldError> {
                use $crate::core::view::HeaderView;
                self.set_field($field, u64::from(value))
            }
        };
    }
    pub(crate) use gen_field_write;

    /// Macro to generate writers for fields exactly as wide as their representation
    ///
    /// Every value of the representation fits, so the generated function cannot fail.
    macro_rules! gen_exact_field_write {
        ($name:ident, $field:expr, $repr:ty) => {
            #[inline]
            #[allow(unused)]
            /// Writes the field
            pub fn $name(&mut self, value: $repr) {
                use $crate::core::view::View;
                const {
                    assert!(
                        $field.desc().bits() == <$repr>::BITS,
                        "field width must match its representation"
                    )
                };
                // SAFETY: buffer size is checked on construction, the value always fits
                unsafe {
                    $crate::core::write::unchecked_field_be_write(
                        self.as_bytes_mut(),
                        $field.desc(),
                        u64::from(value),
                    )
                }
            }
        };
    }
    pub(crate) use gen_exact_field_write;

    /// Macro to generate single bit flag writers
    macro_rules! gen_flag_write {
        ($name:ident, $field:expr) => {
            #[inline]
            #[allow(unused)]
            /// Sets or clears the flag
            pub fn $name(&mut self, value: bool) {
                use $crate::core::view::View;
                const { assert!($field.desc().bits() == 1, "flag must be a single bit") };
                // SAFETY: buffer size is checked on construction, a single bit always fits
                unsafe {
                    $crate::core::write::unchecked_field_be_write(
                        self.as_bytes_mut(),
                        $field.desc(),
                        u64::from(value),
                    )
                }
            }
        };
    }
    pub(crate) use gen_flag_write;

    /// Macro to generate readers for 64 bit values split into two 32 bit fields
    macro_rules! gen_split_u64_read {
        ($name:ident, $hi:expr, $lo:expr) => {
            #[inline]
            #[allow(unused)]
            /// Reads the value from its upper and lower half
            pub fn $name(&self) -> u64 {
                use $crate::core::view::HeaderView;
                const {
                    assert!(
                        $hi.desc().bits() == 32 && $lo.desc().bits() == 32,
                        "split values need two full quadlets"
                    )
                };
                (self.field($hi) << 32) | self.field($lo)
            }
        };
    }
    pub(crate) use gen_split_u64_read;

    /// Macro to generate writers for 64 bit values split into two 32 bit fields
    macro_rules! gen_split_u64_write {
        ($name:ident, $hi:expr, $lo:expr) => {
            #[inline]
            #[allow(unused)]
            /// Writes the upper and lower half of the value
            pub fn $name(&mut self, value: u64) {
                use $crate::core::view::View;
                const {
                    assert!(
                        $hi.desc().bits() == 32 && $lo.desc().bits() == 32,
                        "split values need two full quadlets"
                    )
                };
                let buf = self.as_bytes_mut();
                // SAFETY: buffer size is checked on construction, both halves are 32 bits wide
                unsafe {
                    $crate::core::write::unchecked_field_be_write(buf, $hi.desc(), value >> 32);
                    $crate::core::write::unchecked_field_be_write(
                        buf,
                        $lo.desc(),
                        value & 0xFFFF_FFFF,
                    );
                }
            }
        };
    }
    pub(crate) use gen_split_u64_write;
}
