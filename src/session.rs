//! Per-send runtime session.
//!
//! Each send bootstraps a fresh [`Session`] so component state never
//! leaks between calls. The component set is fixed and known at compile
//! time, so the session is a plain struct with explicit fields rather
//! than a name-keyed component registry.

pub mod cert;
pub mod keystore_utils;
pub mod partner;

use crate::client::settings::As2ClientSettings;
use crate::error::SendError;
use cert::Pkcs12CertificateProvider;
use partner::SelfFillingPartnershipResolver;

pub struct Session {
    pub certificates: Pkcs12CertificateProvider,
    pub partnerships: SelfFillingPartnershipResolver,
}

impl Session {
    /// Initializes the certificate provider first, then the partnership
    /// resolver. A failure aborts the send before the transmission
    /// engine is ever invoked.
    pub fn bootstrap(settings: &As2ClientSettings) -> Result<Self, SendError> {
        let certificates = Pkcs12CertificateProvider::load(
            &settings.keystore_path,
            &settings.keystore_passphrase,
        )?;
        let partnerships = SelfFillingPartnershipResolver::new();
        Ok(Self {
            certificates,
            partnerships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::settings::test_settings;
    use keystore_utils::write_test_keystore;
    use secrecy::SecretString;

    #[test]
    fn bootstrap_loads_keystore() {
        let keystore = write_test_keystore("ME", &["THEM"], "secret");
        let mut settings = test_settings("ME", "THEM");
        settings.keystore_path = keystore.clone();
        settings.keystore_passphrase = SecretString::from("secret");

        let session = Session::bootstrap(&settings).unwrap();
        assert!(session.certificates.partner_certificate("THEM").is_some());
        assert!(session.partnerships.is_empty());

        let _ = std::fs::remove_file(keystore);
    }

    #[test]
    fn bootstrap_fails_on_wrong_passphrase() {
        let keystore = write_test_keystore("ME", &[], "secret");
        let mut settings = test_settings("ME", "THEM");
        settings.keystore_path = keystore.clone();
        settings.keystore_passphrase = SecretString::from("wrong");

        let result = Session::bootstrap(&settings);
        assert!(matches!(result, Err(SendError::ComponentInit(_))));

        let _ = std::fs::remove_file(keystore);
    }

    #[test]
    fn bootstrap_fails_on_missing_keystore() {
        let settings = test_settings("ME", "THEM");
        let result = Session::bootstrap(&settings);
        assert!(matches!(result, Err(SendError::ComponentInit(_))));
    }
}
