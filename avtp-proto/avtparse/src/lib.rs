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

//! AvtParse: table-driven access to IEEE 1722 (AVTP) headers.
//!
//! Every header format is described by a table of field descriptors, each locating one field
//! by quadlet, bit offset and width. A single codec reads and writes fields through these
//! tables, so adding a header means adding a table, not new bit twiddling.
//!
//! AvtParse offers views and owned models of AVTP headers.
//!
//! Views are zero-copy wrappers over a byte slice with named accessors for every field. They
//! check the buffer size once on construction.
//!
//! Owned models are plain structs that can be built from a view and encoded back to the wire.

pub mod core {
    pub mod debug;
    pub mod encode;
    pub mod field;
    pub mod layout;
    pub mod read;
    pub mod view;
    pub mod write;
}

mod proto {
    pub mod acf {
        pub mod layout;
        pub mod messages;
        pub mod model;
        pub mod view;
    }
    pub mod header {
        pub mod layout;
        pub mod model;
        pub mod view;
    }
    pub mod stream {
        pub mod layout;
        pub mod model;
        pub mod view;
    }
    pub mod types;
}
pub use proto::*;

pub mod legacy;
