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

//! Walking the ACF messages packed into a control stream payload

use crate::{
    acf::{
        layout::AcfMessageLayout,
        view::{AcfCanBriefView, AcfCanView, AcfCommonView, AcfLinView},
    },
    core::{
        layout::{Layout, LayoutParseError},
        view::{View, ViewConversionError},
    },
    types::AcfMsgType,
};

/// Iterator over the ACF messages of an NTSCF or TSCF payload
///
/// Yields one item per message. A message whose length is invalid or runs past the payload
/// yields an error, after which iteration stops since the following messages cannot be located.
#[derive(Debug, Clone)]
pub struct AcfMessages<'a> {
    rest: &'a [u8],
    done: bool,
}
impl<'a> AcfMessages<'a> {
    /// Creates an iterator over the messages in the given payload
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            rest: payload,
            done: false,
        }
    }

    /// Bytes not yet consumed by the iterator
    pub fn remaining(&self) -> &'a [u8] {
        self.rest
    }
}
impl<'a> Iterator for AcfMessages<'a> {
    type Item = Result<AcfMessage<'a>, LayoutParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.rest.is_empty() {
            return None;
        }

        let layout = match AcfMessageLayout::from_slice(self.rest) {
            Ok(layout) => layout,
            Err(err) => {
                tracing::debug!(
                    error = %err,
                    remaining = self.rest.len(),
                    "Stopping ACF message iteration"
                );
                self.done = true;
                return Some(Err(err));
            }
        };

        let (msg, rest) = self.rest.split_at(layout.size_bytes());
        self.rest = rest;

        // SAFETY: layout validated that the message is fully contained
        let view = unsafe { AcfCommonView::from_slice_unchecked(msg) };
        Some(Ok(AcfMessage { view }))
    }
}

/// A single ACF message found by [AcfMessages]
#[derive(Debug, Clone, Copy)]
pub struct AcfMessage<'a> {
    view: &'a AcfCommonView,
}
impl<'a> AcfMessage<'a> {
    /// Message type
    #[inline]
    pub fn msg_type(&self) -> AcfMsgType {
        self.view.msg_type()
    }

    /// View over the common header of the message
    #[inline]
    pub fn common(&self) -> &'a AcfCommonView {
        self.view
    }

    /// Raw bytes of the whole message
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.view.as_bytes()
    }

    /// Layout of the message, used for annotating dumps
    pub fn layout(&self) -> Result<AcfMessageLayout, LayoutParseError> {
        AcfMessageLayout::from_slice(self.as_bytes())
    }

    /// Returns the message as CAN message
    pub fn as_can(&self) -> Result<&'a AcfCanView, ViewConversionError> {
        Ok(AcfCanView::from_slice(self.as_bytes())?.0)
    }

    /// Returns the message as abbreviated CAN message
    pub fn as_can_brief(&self) -> Result<&'a AcfCanBriefView, ViewConversionError> {
        Ok(AcfCanBriefView::from_slice(self.as_bytes())?.0)
    }

    /// Returns the message as LIN message
    pub fn as_lin(&self) -> Result<&'a AcfLinView, ViewConversionError> {
        Ok(AcfLinView::from_slice(self.as_bytes())?.0)
    }

    /// Returns the typed view matching the message type
    ///
    /// Fails if the message claims a known type but is too short for its header.
    pub fn kind(&self) -> Result<AcfMessageKind<'a>, ViewConversionError> {
        Ok(match self.msg_type() {
            AcfMsgType::Can => AcfMessageKind::Can(self.as_can()?),
            AcfMsgType::CanBrief => AcfMessageKind::CanBrief(self.as_can_brief()?),
            AcfMsgType::Lin => AcfMessageKind::Lin(self.as_lin()?),
            _ => AcfMessageKind::Other(self.view),
        })
    }
}

/// Typed view over an ACF message
#[derive(Debug, Clone, Copy)]
pub enum AcfMessageKind<'a> {
    /// CAN message
    Can(&'a AcfCanView),
    /// Abbreviated CAN message
    CanBrief(&'a AcfCanBriefView),
    /// LIN message
    Lin(&'a AcfLinView),
    /// Any message type without a dedicated view
    Other(&'a AcfCommonView),
}
