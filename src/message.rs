// SPDX-License-Identifier: MIT

//! The wire message: `{"type": <tag>, "data": <payload>}`, and the closed
//! vocabulary of client→server tags (§6).

use serde::{Deserialize, Serialize};

use crate::component::Component;
use crate::error::ActionError;

/// One framed message on the session channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Message {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self { kind: kind.into(), data }
    }

    /// Build the outbound frame for emitting a component.
    pub fn from_component(component: &Component) -> Result<Self, ActionError> {
        Ok(Self::new(component.wire_tag(), component.to_data()?))
    }

    pub fn done(slug: impl Into<String>) -> Self {
        Self::new("done", serde_json::Value::String(slug.into()))
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new("error", serde_json::Value::String(message.into()))
    }
}

/// A parsed client→server control frame.
#[derive(Debug, Clone)]
pub enum ClientMessage {
    /// Requests invocation of the named action.
    Start { slug: String },
    /// A reply to the most recently emitted input.
    Input { data: serde_json::Value },
    /// Requests cooperative cancellation of the running action.
    Cancel,
}

impl ClientMessage {
    /// Parse a raw frame into a closed client-message vocabulary.
    ///
    /// An unrecognized `type` is a protocol violation, not a no-op: the
    /// session must close with `PROTOCOL` rather than silently ignore it.
    pub fn parse(message: Message) -> Result<Self, ActionError> {
        match message.kind.as_str() {
            "start" => {
                let slug = message.data.as_str().ok_or(ActionError::Protocol)?.to_owned();
                Ok(Self::Start { slug })
            }
            "input" => Ok(Self::Input { data: message.data }),
            "cancel" => Ok(Self::Cancel),
            _ => Err(ActionError::Protocol),
        }
    }
}
