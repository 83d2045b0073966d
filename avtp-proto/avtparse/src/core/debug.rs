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

//! Utility for formatting bit-level annotations for debugging purposes
//!
//! This module provides functionality to create human-readable, optionally colored
//! representations of the quadlets of a PDU, along with annotations that name the fields each
//! bit belongs to and their current values.
//!
//! Annotations are derived from the descriptor tables, so every header gets them for free.

use std::{collections::HashMap, fmt::Write as FmtWrite};

use crate::core::{
    field::{FieldDescriptor, HeaderField, QUADLET_BITS, QUADLET_BYTES},
    read::get_field,
};

/// Annotations for the fields of consecutive headers in a buffer
#[derive(Debug, Default)]
pub struct Annotations {
    buckets: Vec<AnnotationBucket>,
    next_quadlet: usize,
}
impl Annotations {
    /// Create a new, empty Annotations instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create annotations for a single header starting at the first quadlet
    pub fn for_header<F: HeaderField>() -> Self {
        let mut ann = Self::new();
        ann.push_header::<F>();
        ann
    }

    /// Appends all fields of a header behind the previously added buckets
    pub fn push_header<F: HeaderField>(&mut self) {
        let fields = F::ALL
            .iter()
            .map(|field| (field.descriptor(), field.name()))
            .collect();

        self.push(
            F::HEADER.to_string(),
            F::SIZE_BYTES.div_ceil(QUADLET_BYTES),
            fields,
        );
    }

    /// Appends a bucket of `quadlets` quadlets without any named fields, e.g. a payload
    pub fn push_opaque(&mut self, title: impl Into<String>, quadlets: usize) {
        self.push(title.into(), quadlets, Vec::new());
    }

    /// Appends a bucket, field descriptors are relative to the start of the bucket
    pub fn push(
        &mut self,
        title: String,
        quadlets: usize,
        fields: Vec<(FieldDescriptor, &'static str)>,
    ) {
        let first_quadlet = self.next_quadlet;
        let fields = fields
            .into_iter()
            .map(|(desc, label)| (desc.shift_quadlets(first_quadlet), label))
            .collect();

        self.buckets.push(AnnotationBucket {
            title,
            first_quadlet,
            quadlets,
            fields,
        });
        self.next_quadlet += quadlets;
    }

    /// Extend the annotations with another Annotations instance, placed behind the current ones
    pub fn extend(&mut self, other: Annotations) {
        for bucket in other.buckets {
            let fields = bucket
                .fields
                .into_iter()
                .map(|(desc, label)| (desc.shift_quadlets(self.next_quadlet), label))
                .collect();

            self.buckets.push(AnnotationBucket {
                title: bucket.title,
                first_quadlet: bucket.first_quadlet + self.next_quadlet,
                quadlets: bucket.quadlets,
                fields,
            });
        }
        self.next_quadlet += other.next_quadlet;
    }

    /// Number of quadlets covered by all buckets
    pub fn quadlets(&self) -> usize {
        self.next_quadlet
    }
}
impl Annotations {
    /// Format the given buffer and annotations into a human-readable string, one quadlet per
    /// line.
    ///
    /// Bits that are annotated but not part of the buffer are displayed as 'X'. With `color`
    /// every field gets its own 256-color foreground so neighbouring fields can be told apart.
    ///
    /// # Parameters
    /// - `out`: The output to write the formatted string to.
    /// - `buffer`: The byte buffer containing the bits to be formatted.
    /// - `color`: Whether to emit ANSI color escape sequences.
    pub fn fmt_on_buffer(
        &self,
        out: &mut impl FmtWrite,
        buffer: &[u8],
        color: bool,
    ) -> std::fmt::Result {
        const PALETTE: [u8; 12] = [160, 34, 27, 130, 161, 35, 33, 136, 162, 36, 69, 142];
        // Neutral gray for unannotated bits
        const COLOR_PLAIN: u8 = 244;

        let mut label_colors: HashMap<&str, u8> = HashMap::new();
        for (_, label) in self.buckets.iter().flat_map(|b| &b.fields) {
            let next = PALETTE[label_colors.len() % PALETTE.len()];
            label_colors.entry(*label).or_insert(next);
        }

        let paint = |line: &mut String, text: &str, label: Option<&str>| -> std::fmt::Result {
            if !color {
                return write!(line, "{text}");
            }
            let c = label
                .and_then(|l| label_colors.get(l))
                .copied()
                .unwrap_or(COLOR_PLAIN);
            write!(line, "\x1b[38;5;{c}m{text}\x1b[0m")
        };

        let total_bits = buffer.len() * 8;
        for bucket in &self.buckets {
            writeln!(out, "                | {}", bucket.title)?;

            for quadlet in bucket.first_quadlet..bucket.first_quadlet + bucket.quadlets {
                let fields: Vec<_> = bucket
                    .fields
                    .iter()
                    .filter(|(desc, _)| desc.quadlet() == quadlet)
                    .collect();

                let mut line = String::new();
                for bit in 0..QUADLET_BITS as usize {
                    if bit % 4 == 0 && bit != 0 {
                        line.push(' ');
                    }

                    let bit_idx = quadlet * QUADLET_BITS as usize + bit;
                    let label = fields
                        .iter()
                        .find(|(desc, _)| desc.header_bit_range().contains(&bit_idx))
                        .map(|(_, label)| *label);

                    if bit_idx < total_bits {
                        let value = (buffer[bit_idx / 8] >> (7 - (bit_idx % 8))) & 1;
                        paint(&mut line, if value == 1 { "1" } else { "0" }, label)?;
                    } else if label.is_some() {
                        paint(&mut line, "X", label)?;
                    } else {
                        line.push(' ');
                    }
                }

                let mut labels = String::new();
                for (desc, label) in &fields {
                    let value = match get_field(std::slice::from_ref(desc), buffer, 0) {
                        Ok(v) => v.to_string(),
                        Err(_) => "n/a".to_string(),
                    };
                    if !labels.is_empty() {
                        labels.push(' ');
                    }
                    paint(&mut labels, &format!("{label}={value}"), Some(*label))?;
                }
                if labels.is_empty() {
                    labels.push('-');
                }

                writeln!(
                    out,
                    "0x{:04X}  q{:03}   | {} | {}",
                    quadlet * QUADLET_BYTES,
                    quadlet,
                    line,
                    labels
                )?;
            }
        }

        Ok(())
    }
}

#[derive(Debug)]
struct AnnotationBucket {
    title: String,
    first_quadlet: usize,
    quadlets: usize,
    fields: Vec<(FieldDescriptor, &'static str)>,
}
