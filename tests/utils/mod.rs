use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use as2_client::client::settings::{EncryptionAlgorithm, SignatureAlgorithm};
use as2_client::client::{As2ClientRequest, As2ClientSettings, Payload};
use as2_client::message::{As2Message, Mdn};
use as2_client::sender::SenderModule;
use as2_client::session::Session;
use as2_client::session::keystore_utils::write_test_keystore;
use as2_client::{SendError, telemetry};
use secrecy::SecretString;

pub const PASSPHRASE: &str = "test-passphrase";

/// Writes a fresh keystore for the ME/THEM pair and returns settings
/// pointing at it. Callers remove the keystore file themselves.
pub fn test_settings() -> (As2ClientSettings, PathBuf) {
    telemetry::init_tracing();
    let keystore = write_test_keystore("ME", &["THEM"], PASSPHRASE);
    let settings = As2ClientSettings {
        sender_as2_id: "ME".to_owned(),
        receiver_as2_id: "THEM".to_owned(),
        sender_key_alias: "ME".to_owned(),
        receiver_key_alias: "THEM".to_owned(),
        sender_email: "me@example.com".to_owned(),
        destination_url: "https://partner.example/as2".to_owned(),
        signature_algorithm: SignatureAlgorithm::Sha256,
        encryption_algorithm: EncryptionAlgorithm::Aes128,
        mdn_options: as2_client::client::settings::DEFAULT_MDN_OPTIONS.to_owned(),
        message_id_format: as2_client::message::DEFAULT_MESSAGE_ID_FORMAT.to_owned(),
        keystore_path: keystore.clone(),
        keystore_passphrase: SecretString::from(PASSPHRASE),
        partnership_name: String::new(),
    };
    (settings, keystore)
}

pub fn test_request() -> As2ClientRequest {
    As2ClientRequest::new(
        "application/edifact",
        "test order",
        Payload::Bytes(b"0123456789".to_vec()),
    )
}

/// Stub engine that always attaches a processed MDN and succeeds.
pub struct ProcessedStub;

impl SenderModule for ProcessedStub {
    fn send(&self, message: &mut As2Message, _session: &Session) -> Result<(), SendError> {
        message.set_mdn(Mdn::new(
            "processed",
            Some(message.message_id().to_owned()),
            "Disposition: processed",
        ));
        Ok(())
    }
}

/// Stub engine that attaches an MDN and then fails.
pub struct FailAfterMdnStub;

impl SenderModule for FailAfterMdnStub {
    fn send(&self, message: &mut As2Message, _session: &Session) -> Result<(), SendError> {
        message.set_mdn(Mdn::new(
            "processed",
            Some(message.message_id().to_owned()),
            "Disposition: processed",
        ));
        Err(SendError::transmission("MDN post-processing failed"))
    }
}

/// Stub engine that fails without attaching anything, recording whether
/// it was invoked at all.
pub struct FailingStub {
    pub invoked: Arc<AtomicBool>,
}

impl SenderModule for FailingStub {
    fn send(&self, _message: &mut As2Message, _session: &Session) -> Result<(), SendError> {
        self.invoked
            .store(true, std::sync::atomic::Ordering::SeqCst);
        Err(SendError::transmission("connection refused"))
    }
}
