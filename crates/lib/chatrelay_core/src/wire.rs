//! JSON payloads exchanged between the client and `POST /api/chat`.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::turn::{Transcript, Turn};

/// Request body: the full transcript, oldest turn first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<Turn>,
}

impl From<&Transcript> for ChatRequest {
    fn from(transcript: &Transcript) -> Self {
        Self {
            messages: transcript.turns().to_vec(),
        }
    }
}

/// Response body: either the assistant reply or an error message, never both.
///
/// A body carrying both keys, or neither, does not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatResponse {
    Reply { reply: Turn },
    Error { error: String },
}

#[derive(Deserialize)]
struct RawChatResponse {
    reply: Option<Turn>,
    error: Option<String>,
}

impl<'de> Deserialize<'de> for ChatResponse {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawChatResponse::deserialize(deserializer)?;
        match (raw.reply, raw.error) {
            (Some(reply), None) => Ok(Self::Reply { reply }),
            (None, Some(error)) => Ok(Self::Error { error }),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "response carries both `reply` and `error`",
            )),
            (None, None) => Err(D::Error::custom(
                "response carries neither `reply` nor `error`",
            )),
        }
    }
}

impl ChatResponse {
    pub fn reply(turn: Turn) -> Self {
        Self::Reply { reply: turn }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}
