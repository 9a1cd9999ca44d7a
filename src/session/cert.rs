//! PKCS#12-backed certificate provider.

use std::path::Path;

use openssl::nid::Nid;
use openssl::pkcs12::Pkcs12;
use openssl::pkey::{PKey, Private};
use openssl::x509::X509;
use secrecy::{ExposeSecret, SecretString};

use crate::error::SendError;

/// Key material for one send, loaded from a PKCS#12 keystore.
///
/// A PKCS#12 store carries exactly one key entry, and that entry is
/// taken as the sender identity: [`private_key`] and [`certificate`]
/// always return it, regardless of the configured sender key alias.
/// Partner certificates travel in the bundled CA chain and are looked
/// up by their subject common name via [`partner_certificate`].
///
/// [`private_key`]: Self::private_key
/// [`certificate`]: Self::certificate
/// [`partner_certificate`]: Self::partner_certificate
pub struct Pkcs12CertificateProvider {
    key: PKey<Private>,
    certificate: X509,
    chain: Vec<X509>,
}

impl Pkcs12CertificateProvider {
    pub fn load(path: &Path, passphrase: &SecretString) -> Result<Self, SendError> {
        let der = std::fs::read(path).map_err(|e| {
            SendError::component_init(format!("cannot read keystore {}: {e}", path.display()))
        })?;
        let keystore = Pkcs12::from_der(&der).map_err(|e| {
            SendError::component_init(format!(
                "keystore {} is not valid PKCS#12: {e}",
                path.display()
            ))
        })?;
        let parsed = keystore.parse2(passphrase.expose_secret()).map_err(|_| {
            SendError::component_init(format!(
                "cannot open keystore {}: wrong passphrase or corrupted store",
                path.display()
            ))
        })?;

        let key = parsed.pkey.ok_or_else(|| {
            SendError::component_init(format!(
                "keystore {} contains no private key",
                path.display()
            ))
        })?;
        let certificate = parsed.cert.ok_or_else(|| {
            SendError::component_init(format!(
                "keystore {} contains no certificate",
                path.display()
            ))
        })?;
        let chain = parsed
            .ca
            .map(|stack| stack.iter().map(|cert| cert.to_owned()).collect())
            .unwrap_or_default();

        Ok(Self {
            key,
            certificate,
            chain,
        })
    }

    pub fn private_key(&self) -> &PKey<Private> {
        &self.key
    }

    pub fn certificate(&self) -> &X509 {
        &self.certificate
    }

    /// Looks up a certificate by key alias (subject CN), checking the
    /// sender's own certificate as well as the bundled chain.
    pub fn partner_certificate(&self, alias: &str) -> Option<&X509> {
        std::iter::once(&self.certificate)
            .chain(self.chain.iter())
            .find(|cert| common_name(cert).as_deref() == Some(alias))
    }
}

fn common_name(cert: &X509) -> Option<String> {
    cert.subject_name()
        .entries_by_nid(Nid::COMMONNAME)
        .next()
        .and_then(|entry| entry.data().as_utf8().ok())
        .map(|name| name.to_string())
}
