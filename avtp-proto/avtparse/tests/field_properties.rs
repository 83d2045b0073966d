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

//! Contains property tests for the field codec over every descriptor table
//!
//! 1. Every in-range value must roundtrip through set/get
//! 2. Setting a field must never change any other field
//! 3. Out-of-range values must be rejected without touching the buffer
//! 4. Setting a field twice must be the same as setting it once

use avtparse::{
    acf::layout::{AcfCanBriefField, AcfCanField, AcfCommonField, AcfLinField},
    core::{
        field::{FieldError, HeaderField},
        read::{get, get_field},
        view::{HeaderView, View},
        write::{set, set_field},
    },
    header::{
        layout::{CommonHeaderField, UdpEncapsulationField},
        view::CommonHeaderView,
    },
    stream::layout::{NtscfField, TscfField},
};
use proptest::{
    collection::vec,
    prelude::{ProptestConfig, Strategy, any},
    prop_assert, prop_assert_eq, proptest,
};

/// Runs the given check for every descriptor table
macro_rules! for_every_table {
    ($check:ident) => {
        $check::<CommonHeaderField>();
        $check::<UdpEncapsulationField>();
        $check::<NtscfField>();
        $check::<TscfField>();
        $check::<AcfCommonField>();
        $check::<AcfCanField>();
        $check::<AcfCanBriefField>();
        $check::<AcfLinField>();
    };
}

/// Random header buffer together with a field and a value that fits into it
fn field_and_value<F: HeaderField>() -> impl Strategy<Value = (Vec<u8>, F, u64)> {
    (
        vec(any::<u8>(), F::SIZE_BYTES),
        0..F::ALL.len(),
        any::<u64>(),
    )
        .prop_map(|(buf, index, raw)| {
            let field = F::ALL[index];
            (buf, field, raw & field.descriptor().max_value())
        })
}

#[test]
fn narrow_fields_should_roundtrip_every_value() {
    fn check<F: HeaderField>() {
        let mut buf = vec![0u8; F::SIZE_BYTES];
        for &field in F::ALL.iter().filter(|f| f.descriptor().bits() <= 12) {
            for value in 0..=field.descriptor().max_value() {
                set(&mut buf, field, value).unwrap();
                assert_eq!(
                    get(&buf, field).unwrap(),
                    value,
                    "{}.{}",
                    F::HEADER,
                    field.name()
                );
            }
        }
    }

    for_every_table!(check);
}

#[test]
fn fields_should_roundtrip_random_values() {
    fn check<F: HeaderField>() {
        proptest!(
            ProptestConfig::with_cases(2_000),
            |((buf, field, value) in field_and_value::<F>())| {
                let mut buf = buf;
                set(&mut buf, field, value).unwrap();
                prop_assert_eq!(get(&buf, field).unwrap(), value);
            }
        );
    }

    for_every_table!(check);
}

#[test]
fn setting_a_field_should_not_change_other_fields() {
    fn check<F: HeaderField>() {
        proptest!(
            ProptestConfig::with_cases(2_000),
            |((buf, field, value) in field_and_value::<F>())| {
                let mut buf = buf;
                let before: Vec<u64> = F::ALL.iter().map(|f| get(&buf, *f).unwrap()).collect();

                set(&mut buf, field, value).unwrap();

                for (other, old) in F::ALL.iter().zip(before) {
                    if *other != field {
                        prop_assert_eq!(
                            get(&buf, *other).unwrap(),
                            old,
                            "{} changed by {}",
                            other.name(),
                            field.name()
                        );
                    }
                }
            }
        );
    }

    for_every_table!(check);
}

#[test]
fn out_of_range_values_should_leave_buffer_unchanged() {
    fn check<F: HeaderField>() {
        proptest!(
            ProptestConfig::with_cases(1_000),
            |((buf, field, _) in field_and_value::<F>(), excess in 0u64..1024)| {
                let mut buf = buf;
                let original = buf.clone();
                let value = field.descriptor().max_value() + 1 + excess;

                let res = set(&mut buf, field, value);
                prop_assert_eq!(
                    res,
                    Err(FieldError::ValueOutOfRange {
                        value,
                        bits: field.descriptor().bits()
                    })
                );
                prop_assert_eq!(buf, original);
            }
        );
    }

    for_every_table!(check);
}

#[test]
fn setting_twice_should_equal_setting_once() {
    fn check<F: HeaderField>() {
        proptest!(
            ProptestConfig::with_cases(1_000),
            |((buf, field, value) in field_and_value::<F>())| {
                let mut once = buf;
                set(&mut once, field, value).unwrap();
                let mut twice = once.clone();
                set(&mut twice, field, value).unwrap();
                prop_assert_eq!(once, twice);
            }
        );
    }

    for_every_table!(check);
}

#[test]
fn short_buffers_should_be_rejected() {
    fn check<F: HeaderField>() {
        proptest!(
            ProptestConfig::with_cases(500),
            |(index in 0..F::ALL.len(), len in 0usize..64)| {
                let field = F::ALL[index];
                let required = field.descriptor().required_bytes();
                let mut buf = vec![0u8; len];

                let res = get(&buf, field);
                if len < required {
                    prop_assert!(
                        matches!(res, Err(FieldError::BufferTooSmall { .. })),
                        "expected BufferTooSmall, got {:?}",
                        res
                    );
                    prop_assert!(set(&mut buf, field, 0).is_err());
                } else {
                    prop_assert_eq!(res, Ok(0));
                }
            }
        );
    }

    for_every_table!(check);
}

#[test]
fn unknown_field_index_should_be_rejected() {
    let buf = [0u8; 4];
    assert_eq!(
        get_field(CommonHeaderField::TABLE, &buf, 3),
        Err(FieldError::UnknownField {
            field: 3,
            table_len: 3
        })
    );

    let mut buf = [0u8; 4];
    assert!(matches!(
        set_field(CommonHeaderField::TABLE, &mut buf, usize::MAX, 1),
        Err(FieldError::UnknownField { .. })
    ));
    assert_eq!(buf, [0; 4]);
}

#[test]
fn common_header_should_read_network_order() {
    let mut buf = [0x80, 0x03, 0x00, 0x00];
    let (view, _) = CommonHeaderView::from_mut_slice(&mut buf).unwrap();

    assert_eq!(view.field(CommonHeaderField::Subtype), 0x80);
    assert_eq!(view.field(CommonHeaderField::Version), 0);
    assert!(!view.h());

    view.set_field(CommonHeaderField::Version, 5).unwrap();
    assert_eq!(view.field(CommonHeaderField::Subtype), 0x80);
    assert_eq!(view.version(), 5);
    assert_eq!(buf, [0x80, 0x53, 0x00, 0x00]);
}

#[test]
fn one_bit_field_should_only_hold_zero_or_one() {
    proptest!(|(bytes in any::<[u8; 4]>())| {
        let h = get(&bytes, CommonHeaderField::H).unwrap();
        prop_assert!(h <= 1);

        let mut buf = bytes;
        prop_assert!(set(&mut buf, CommonHeaderField::H, 2).is_err());
        prop_assert_eq!(buf, bytes);
    });
}
