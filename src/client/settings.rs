//! Static connection settings for one trading-partner relationship.

use std::path::PathBuf;

use secrecy::SecretString;
use serde::Deserialize;

use crate::message::DEFAULT_MESSAGE_ID_FORMAT;

/// Default options requested for synchronous signed receipts.
pub const DEFAULT_MDN_OPTIONS: &str =
    "signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha256";

/// Digest used when signing outbound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
    Sha384,
    Sha512,
}

impl SignatureAlgorithm {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

/// Content cipher used when encrypting outbound messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EncryptionAlgorithm {
    TripleDes,
    Aes128,
    Aes256,
}

impl EncryptionAlgorithm {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::TripleDes => "3des",
            Self::Aes128 => "aes128",
            Self::Aes256 => "aes256",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        match name {
            "3des" => Some(Self::TripleDes),
            "aes128" => Some(Self::Aes128),
            "aes256" => Some(Self::Aes256),
            _ => None,
        }
    }

    pub(crate) fn cipher(self) -> openssl::symm::Cipher {
        match self {
            Self::TripleDes => openssl::symm::Cipher::des_ede3_cbc(),
            Self::Aes128 => openssl::symm::Cipher::aes_128_cbc(),
            Self::Aes256 => openssl::symm::Cipher::aes_256_cbc(),
        }
    }
}

/// Immutable, caller-supplied settings for the send workflow.
///
/// Must be fully populated before any workflow step runs; the workflow
/// never mutates it.
#[derive(Debug, Clone, Deserialize)]
pub struct As2ClientSettings {
    pub sender_as2_id: String,
    pub receiver_as2_id: String,
    pub sender_key_alias: String,
    pub receiver_key_alias: String,
    pub sender_email: String,
    pub destination_url: String,
    pub signature_algorithm: SignatureAlgorithm,
    pub encryption_algorithm: EncryptionAlgorithm,
    #[serde(default = "default_mdn_options")]
    pub mdn_options: String,
    #[serde(default = "default_message_id_format")]
    pub message_id_format: String,
    pub keystore_path: PathBuf,
    pub keystore_passphrase: SecretString,
    /// Display name of the partnership; derived from the AS2 ids when empty.
    #[serde(default)]
    pub partnership_name: String,
}

fn default_mdn_options() -> String {
    DEFAULT_MDN_OPTIONS.to_owned()
}

fn default_message_id_format() -> String {
    DEFAULT_MESSAGE_ID_FORMAT.to_owned()
}

impl As2ClientSettings {
    pub fn partnership_name(&self) -> String {
        if self.partnership_name.is_empty() {
            format!("{}-to-{}", self.sender_as2_id, self.receiver_as2_id)
        } else {
            self.partnership_name.clone()
        }
    }
}

#[cfg(test)]
pub(crate) fn test_settings(sender: &str, receiver: &str) -> As2ClientSettings {
    As2ClientSettings {
        sender_as2_id: sender.to_owned(),
        receiver_as2_id: receiver.to_owned(),
        sender_key_alias: sender.to_owned(),
        receiver_key_alias: receiver.to_owned(),
        sender_email: "me@example.com".to_owned(),
        destination_url: "https://partner.example/as2".to_owned(),
        signature_algorithm: SignatureAlgorithm::Sha256,
        encryption_algorithm: EncryptionAlgorithm::Aes128,
        mdn_options: default_mdn_options(),
        message_id_format: default_message_id_format(),
        keystore_path: PathBuf::from("does-not-exist.p12"),
        keystore_passphrase: SecretString::from("test"),
        partnership_name: String::new(),
    }
}
