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
//! A tool to print an annotated, bit-level dump of a hex encoded AVTP PDU.

use std::io::Read;

use anyhow::Context;
use avtparse::{
    acf::messages::AcfMessages,
    core::{debug::Annotations, view::View},
    header::{
        layout::{CommonHeaderLayout, UdpEncapsulationLayout},
        view::{CommonHeaderView, UdpEncapsulationView},
    },
    stream::{
        layout::{NtscfLayout, TscfLayout},
        view::{NtscfView, TscfView},
    },
    types::Subtype,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Hex encoded PDU, read from stdin if omitted. Whitespace and ':' are ignored.
    hex: Option<String>,
    /// The PDU is preceded by the UDP encapsulation header
    #[arg(long)]
    udp: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let input = match cli.hex {
        Some(hex) => hex,
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("reading stdin")?;
            input
        }
    };
    let buf = decode_hex(&input)?;

    let annotations = annotate(&buf, cli.udp)?;

    let mut out = String::new();
    annotations
        .fmt_on_buffer(&mut out, &buf, !cli.no_color)
        .context("formatting dump")?;
    print!("{out}");

    Ok(())
}

/// Decodes hex input, ignoring whitespace and ':' separators
///
/// Every separated token may carry its own `0x` prefix.
fn decode_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = input
        .split(|c: char| c.is_whitespace() || c == ':')
        .map(|token| token.strip_prefix("0x").unwrap_or(token))
        .collect();

    hex::decode(cleaned).context("input is not valid hex")
}

/// Builds the annotations for every header found in the buffer
fn annotate(buf: &[u8], udp: bool) -> anyhow::Result<Annotations> {
    let mut annotations = Annotations::new();

    let pdu = if udp {
        let (view, pdu) =
            UdpEncapsulationView::from_slice(buf).context("parsing UDP encapsulation header")?;
        tracing::info!(seq_no = view.encapsulation_seq_no(), "UDP encapsulation");
        annotations.extend(UdpEncapsulationLayout.annotations());
        pdu
    } else {
        buf
    };

    let (common, _) = CommonHeaderView::from_slice(pdu).context("parsing common header")?;
    tracing::info!(
        subtype = ?common.subtype(),
        version = common.version(),
        len = pdu.len(),
        "AVTP PDU"
    );

    let (payload, rest) = match common.subtype() {
        Subtype::Ntscf => {
            let layout = NtscfLayout::from_slice(pdu).context("parsing NTSCF header")?;
            let (view, rest) = NtscfView::from_slice(pdu).context("parsing NTSCF header")?;
            tracing::debug!(header = ?view, "NTSCF");
            annotations.extend(layout.annotations());
            (view.payload(), rest)
        }
        Subtype::Tscf => {
            let layout = TscfLayout::from_slice(pdu).context("parsing TSCF header")?;
            let (view, rest) = TscfView::from_slice(pdu).context("parsing TSCF header")?;
            tracing::debug!(header = ?view, "TSCF");
            annotations.extend(layout.annotations());
            (view.payload(), rest)
        }
        other => {
            tracing::warn!(
                subtype = ?other,
                "No decoder for subtype, showing common header only"
            );
            annotations.extend(CommonHeaderLayout.annotations());
            let rest = &pdu[CommonHeaderLayout::SIZE_BYTES..];
            push_opaque(&mut annotations, "Payload", rest.len());
            return Ok(annotations);
        }
    };

    let mut messages = AcfMessages::new(payload);
    for msg in messages.by_ref() {
        let msg = match msg {
            Ok(msg) => msg,
            Err(err) => {
                tracing::warn!(error = %err, "Malformed ACF message");
                break;
            }
        };
        tracing::info!(
            msg_type = ?msg.msg_type(),
            len = msg.as_bytes().len(),
            "ACF message"
        );
        let layout = msg.layout().context("parsing ACF message")?;
        annotations.extend(layout.annotations());
    }
    push_opaque(&mut annotations, "Undecoded", messages.remaining().len());

    if !rest.is_empty() {
        tracing::warn!(len = rest.len(), "Trailing bytes behind the PDU");
        push_opaque(&mut annotations, "Trailing", rest.len());
    }

    Ok(annotations)
}

fn push_opaque(annotations: &mut Annotations, title: &str, len: usize) {
    let quadlets = len.div_ceil(4);
    if quadlets > 0 {
        annotations.push_opaque(title, quadlets);
    }
}
