use std::path::PathBuf;

use crate::error::SendError;

/// Source of the outbound payload body.
#[derive(Debug, Clone)]
pub enum Payload {
    Bytes(Vec<u8>),
    Text(String),
    File(PathBuf),
}

/// Description of one outbound document.
#[derive(Debug, Clone)]
pub struct As2ClientRequest {
    content_type: String,
    subject: String,
    payload: Payload,
}

impl As2ClientRequest {
    pub fn new(
        content_type: impl Into<String>,
        subject: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            subject: subject.into(),
            payload,
        }
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Renders the payload into a wire-ready body.
    pub fn render(&self) -> Result<Vec<u8>, SendError> {
        match &self.payload {
            Payload::Bytes(bytes) => Ok(bytes.clone()),
            Payload::Text(text) => Ok(text.clone().into_bytes()),
            Payload::File(path) => std::fs::read(path).map_err(|e| {
                SendError::serialization(format!(
                    "cannot read payload file {}: {e}",
                    path.display()
                ))
            }),
        }
    }
}
