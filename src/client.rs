//! Synchronous AS2 send workflow: settings and a payload in, a response
//! out, never a raised error.

pub mod request;
pub mod response;
pub mod settings;

pub use request::{As2ClientRequest, Payload};
pub use response::As2ClientResponse;
pub use settings::{As2ClientSettings, EncryptionAlgorithm, SignatureAlgorithm};

use tracing::{error, info};

use crate::error::SendError;
use crate::message::As2Message;
use crate::partnership::Partnership;
use crate::sender::{HttpSenderModule, SenderModule};
use crate::session::Session;

/// Client for sending AS2 messages and collecting synchronous MDNs.
pub struct As2Client {
    sender: Box<dyn SenderModule>,
}

impl As2Client {
    /// Client wired to the HTTP transmission engine.
    pub fn new() -> Self {
        Self::with_sender(HttpSenderModule::new())
    }

    /// Client wired to a custom transmission engine.
    pub fn with_sender(sender: impl SenderModule + 'static) -> Self {
        Self {
            sender: Box::new(sender),
        }
    }

    /// Sends one message and blocks until transmission completes or
    /// fails. Single attempt; retries are the caller's business.
    ///
    /// Every fault along the pipeline is absorbed into the returned
    /// response, and an MDN the partner delivered before the fault is
    /// still part of it.
    pub fn send_synchronous(
        &self,
        settings: &As2ClientSettings,
        request: &As2ClientRequest,
    ) -> As2ClientResponse {
        let mut response = As2ClientResponse::default();
        let mut envelope: Option<As2Message> = None;

        let outcome = self.run_pipeline(settings, request, &mut envelope);

        if let Some(message) = &envelope {
            response.set_original_message_id(message.message_id());
            // The transmission engine may have attached an MDN even if
            // the pipeline failed afterwards.
            if let Some(mdn) = message.mdn() {
                response.set_mdn(mdn.clone());
            }
        }
        if let Err(cause) = outcome {
            error!(%cause, "sending failed");
            response.set_error(cause);
        }

        info!("{}", response.as_string());
        response
    }

    /// Built -> Assembled -> SessionReady -> Sent. Leaves the envelope
    /// behind in `envelope` as soon as assembly succeeds so the caller
    /// can harvest from it on every exit path.
    fn run_pipeline(
        &self,
        settings: &As2ClientSettings,
        request: &As2ClientRequest,
        envelope: &mut Option<As2Message>,
    ) -> Result<(), SendError> {
        let partnership = Partnership::for_settings(settings);
        let message = envelope.insert(As2Message::assemble(&partnership, request)?);
        let session = Session::bootstrap(settings)?;
        self.sender.send(message, &session)
    }
}

impl Default for As2Client {
    fn default() -> Self {
        Self::new()
    }
}
