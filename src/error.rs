use thiserror::Error;

/// Failures of the synchronous send workflow.
///
/// None of these ever cross the client boundary as a raised error; the
/// workflow folds them into the [`As2ClientResponse`] it returns.
///
/// [`As2ClientResponse`]: crate::client::As2ClientResponse
#[derive(Debug, Error)]
pub enum SendError {
    /// The outbound payload could not be rendered into a wire-ready body.
    #[error("payload serialization failed: {0}")]
    Serialization(String),

    /// A required partnership or message attribute is missing or inconsistent.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The certificate provider or the partnership resolver failed to
    /// initialize while bootstrapping the session.
    #[error("component initialization failed: {0}")]
    ComponentInit(String),

    /// The transmission engine failed; network, cryptographic and
    /// remote-rejection causes are not distinguished at this layer.
    #[error("transmission failed: {0}")]
    Transmission(String),
}

impl SendError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    pub fn component_init(message: impl Into<String>) -> Self {
        Self::ComponentInit(message.into())
    }

    pub fn transmission(message: impl Into<String>) -> Self {
        Self::Transmission(message.into())
    }
}
