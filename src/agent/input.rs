//! What a caller hands the agent for one turn.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ColloquyError, Result};

/// The spoken or typed part of a turn.
#[derive(Debug, Clone, PartialEq)]
pub enum InputMessage {
    Text(String),
    Audio(AudioClip),
}

/// Recorded speech, transcribed before the turn starts.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// An inline image sent alongside the message.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub filename: Option<String>,
}

impl Attachment {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// `data:{mime};base64,{payload}` form used in image content parts.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }

    pub(crate) fn ensure_image(&self) -> Result<()> {
        if self.mime_type.trim().to_ascii_lowercase().starts_with("image/") {
            return Ok(());
        }
        Err(ColloquyError::InvalidArgument(format!(
            "Attachment {} is '{}', only images are supported",
            self.filename.as_deref().unwrap_or("<unnamed>"),
            self.mime_type
        )))
    }
}

/// One turn of input: text or audio, plus at most one image.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatInput {
    pub message: InputMessage,
    pub attachments: Vec<Attachment>,
}

impl ChatInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            message: InputMessage::Text(text.into()),
            attachments: Vec::new(),
        }
    }

    pub fn audio(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            message: InputMessage::Audio(AudioClip {
                data,
                mime_type: mime_type.into(),
            }),
            attachments: Vec::new(),
        }
    }

    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

impl From<&str> for ChatInput {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for ChatInput {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}
