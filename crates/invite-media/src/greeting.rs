//! RSVP greeting: a typed message or a hand-drawn signature.

use serde::{Deserialize, Serialize};

use crate::artifact::EncodedImageArtifact;
use crate::{MediaError, Result};

/// The greeting a guest leaves with their RSVP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "GreetingRecord", try_from = "GreetingRecord")]
pub enum Greeting {
    Text(String),
    Signature(EncodedImageArtifact),
    /// Drawing mode was chosen but nothing was drawn.
    Unsigned,
}

/// Attendee document fields as stored by the guest list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GreetingRecord {
    pub message: String,
    #[serde(rename = "isSignature")]
    pub is_signature: bool,
}

impl Greeting {
    /// Greeting from the signature pad's latest output.
    pub fn from_signature(artifact: Option<EncodedImageArtifact>) -> Self {
        artifact.map_or(Self::Unsigned, Self::Signature)
    }

    pub fn is_signature(&self) -> bool {
        !matches!(self, Self::Text(_))
    }

    /// The stored message: the text itself, or the signature's data URI.
    pub fn message(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Signature(artifact) => artifact.to_data_uri(),
            Self::Unsigned => String::new(),
        }
    }
}

impl From<Greeting> for GreetingRecord {
    fn from(greeting: Greeting) -> Self {
        Self {
            message: greeting.message(),
            is_signature: greeting.is_signature(),
        }
    }
}

impl TryFrom<GreetingRecord> for Greeting {
    type Error = MediaError;

    fn try_from(record: GreetingRecord) -> Result<Self> {
        if !record.is_signature {
            return Ok(Self::Text(record.message));
        }
        if record.message.is_empty() {
            return Ok(Self::Unsigned);
        }
        EncodedImageArtifact::from_data_uri(&record.message).map(Self::Signature)
    }
}
