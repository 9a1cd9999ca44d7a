//! HTTP transmission engine with CMS signing/encryption and synchronous
//! MDN collection.

use openssl::cms::{CMSOptions, CmsContentInfo};
use openssl::pkey::{PKeyRef, Private};
use openssl::stack::Stack;
use openssl::x509::X509Ref;
use reqwest::blocking::Client;
use tracing::debug;

use crate::client::settings::EncryptionAlgorithm;
use crate::error::SendError;
use crate::message::{As2Message, Mdn};
use crate::partnership::{
    PA_AS2_URL, PA_ENCRYPT, PA_MDN_OPTIONS, PA_SIGN, PID_AS2, PID_EMAIL, PID_X509_ALIAS,
};
use crate::sender::SenderModule;
use crate::session::Session;
use crate::session::cert::Pkcs12CertificateProvider;

const AS2_VERSION: &str = "1.1";

/// Sends messages over HTTP(S) and reads the synchronous MDN out of the
/// response body.
pub struct HttpSenderModule {
    client: Client,
}

impl HttpSenderModule {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Default for HttpSenderModule {
    fn default() -> Self {
        Self::new()
    }
}

impl SenderModule for HttpSenderModule {
    fn send(&self, message: &mut As2Message, session: &Session) -> Result<(), SendError> {
        let partnership = session.partnerships.resolve(message.partnership());

        let url = partnership
            .attribute(PA_AS2_URL)
            .ok_or_else(|| SendError::protocol("partnership has no destination URL"))?;
        let sender_id = partnership
            .sender_id(PID_AS2)
            .ok_or_else(|| SendError::protocol("partnership has no sender AS2 id"))?;
        let receiver_id = partnership
            .receiver_id(PID_AS2)
            .ok_or_else(|| SendError::protocol("partnership has no receiver AS2 id"))?;

        let mut body = message.body().to_vec();
        let mut content_type = message.content_type().to_owned();

        if partnership.attribute(PA_SIGN).is_some() {
            body = sign_body(&body, &session.certificates)?;
            content_type = "application/pkcs7-mime; smime-type=signed-data".to_owned();
        }
        if let Some(name) = partnership.attribute(PA_ENCRYPT) {
            let algorithm = EncryptionAlgorithm::from_wire_name(name).ok_or_else(|| {
                SendError::protocol(format!("unknown encryption algorithm '{name}'"))
            })?;
            let alias = partnership
                .receiver_id(PID_X509_ALIAS)
                .ok_or_else(|| SendError::protocol("partnership has no receiver key alias"))?;
            body = encrypt_body(&body, algorithm, alias, &session.certificates)?;
            content_type = "application/pkcs7-mime; smime-type=enveloped-data".to_owned();
        }

        debug!(url, message_id = message.message_id(), "posting message");

        let mut request = self
            .client
            .post(url)
            .header("AS2-Version", AS2_VERSION)
            .header("AS2-From", sender_id)
            .header("AS2-To", receiver_id)
            .header("Message-ID", message.message_id())
            .header("Subject", message.subject())
            .header("Content-Type", content_type);
        if let Some(email) = partnership.sender_id(PID_EMAIL) {
            request = request.header("Disposition-Notification-To", email);
        }
        if let Some(options) = partnership.attribute(PA_MDN_OPTIONS) {
            request = request.header("Disposition-Notification-Options", options);
        }

        let response = request
            .body(body)
            .send()
            .map_err(|e| SendError::transmission(format!("delivery to {url} failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| SendError::transmission(format!("cannot read MDN body: {e}")))?;

        if !status.is_success() {
            return Err(SendError::transmission(format!(
                "partner answered {status}"
            )));
        }

        if !text.trim().is_empty() {
            let mdn = parse_mdn(&text);
            let disposition = mdn.disposition().to_owned();
            // Attach the receipt before validating it; a rejecting
            // disposition must still reach the response.
            message.set_mdn(mdn);
            if disposition_signals_failure(&disposition) {
                return Err(SendError::transmission(format!(
                    "partner rejected the message: {disposition}"
                )));
            }
        }

        Ok(())
    }
}

fn sign_body(data: &[u8], certificates: &Pkcs12CertificateProvider) -> Result<Vec<u8>, SendError> {
    let signer_cert: &X509Ref = certificates.certificate();
    let signer_key: &PKeyRef<Private> = certificates.private_key();
    let cms = CmsContentInfo::sign(
        Some(signer_cert),
        Some(signer_key),
        None,
        Some(data),
        CMSOptions::BINARY,
    )
    .map_err(|e| SendError::transmission(format!("signing failed: {e}")))?;
    cms.to_der()
        .map_err(|e| SendError::transmission(format!("cannot encode signed content: {e}")))
}

fn encrypt_body(
    data: &[u8],
    algorithm: EncryptionAlgorithm,
    receiver_alias: &str,
    certificates: &Pkcs12CertificateProvider,
) -> Result<Vec<u8>, SendError> {
    let receiver_cert = certificates.partner_certificate(receiver_alias).ok_or_else(|| {
        SendError::transmission(format!(
            "keystore holds no certificate for alias '{receiver_alias}'"
        ))
    })?;

    let mut recipients = Stack::new()
        .map_err(|e| SendError::transmission(format!("encryption failed: {e}")))?;
    recipients
        .push(receiver_cert.to_owned())
        .map_err(|e| SendError::transmission(format!("encryption failed: {e}")))?;

    let cms = CmsContentInfo::encrypt(&recipients, data, algorithm.cipher(), CMSOptions::BINARY)
        .map_err(|e| SendError::transmission(format!("encryption failed: {e}")))?;
    cms.to_der()
        .map_err(|e| SendError::transmission(format!("cannot encode encrypted content: {e}")))
}

/// Extracts the machine-readable fields of a synchronous MDN body. The
/// full body is kept verbatim as the receipt text.
fn parse_mdn(text: &str) -> Mdn {
    let mut disposition = String::new();
    let mut original_message_id = None;
    for line in text.lines() {
        if let Some(value) = header_value(line, "Disposition") {
            disposition = value.to_owned();
        } else if let Some(value) = header_value(line, "Original-Message-ID") {
            original_message_id = Some(value.to_owned());
        }
    }
    Mdn::new(disposition, original_message_id, text)
}

fn header_value<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let (head, tail) = line.split_once(':')?;
    head.trim().eq_ignore_ascii_case(name).then(|| tail.trim())
}

fn disposition_signals_failure(disposition: &str) -> bool {
    let lowered = disposition.to_ascii_lowercase();
    ["failed", "error", "denied"]
        .iter()
        .any(|word| lowered.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mdn_fields() {
        let body = "Reporting-UA: partner\r\n\
                    Original-Message-ID: <abc@ME_THEM>\r\n\
                    Disposition: automatic-action/MDN-sent-automatically; processed\r\n";
        let mdn = parse_mdn(body);

        assert_eq!(
            mdn.disposition(),
            "automatic-action/MDN-sent-automatically; processed"
        );
        assert_eq!(mdn.original_message_id(), Some("<abc@ME_THEM>"));
        assert_eq!(mdn.text(), body);
    }

    #[test]
    fn tolerates_free_form_bodies() {
        let mdn = parse_mdn("message received, thanks");
        assert_eq!(mdn.disposition(), "");
        assert!(mdn.original_message_id().is_none());
    }

    #[test]
    fn detects_rejecting_dispositions() {
        assert!(disposition_signals_failure(
            "automatic-action/MDN-sent-automatically; failed/Failure: sender-equals-receiver"
        ));
        assert!(disposition_signals_failure(
            "automatic-action/MDN-sent-automatically; processed/Error: decryption-failed"
        ));
        assert!(!disposition_signals_failure(
            "automatic-action/MDN-sent-automatically; processed"
        ));
        assert!(!disposition_signals_failure(""));
    }
}
