//! Trading-partner relationship descriptors.
//!
//! A [`Partnership`] captures one sender/receiver pair together with the
//! attributes negotiated for the exchange (destination URL, algorithms,
//! MDN options). One descriptor is derived per send and discarded after
//! the call; nothing here is persisted.

use std::collections::BTreeMap;

use crate::client::settings::As2ClientSettings;

/// Identifier keys for the sender/receiver id maps.
pub const PID_AS2: &str = "as2_id";
pub const PID_X509_ALIAS: &str = "x509_alias";
pub const PID_EMAIL: &str = "email";

/// Attribute keys negotiated per partnership.
pub const PA_AS2_URL: &str = "as2_url";
pub const PA_ENCRYPT: &str = "encrypt";
pub const PA_SIGN: &str = "sign";
pub const PA_PROTOCOL: &str = "protocol";
pub const PA_MDN_OPTIONS: &str = "mdn_options";
pub const PA_RECEIPT_DELIVERY_OPTION: &str = "receipt_delivery_option";
pub const PA_MESSAGE_ID_FORMAT: &str = "message_id_format";

pub const PROTOCOL_AS2: &str = "as2";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partnership {
    name: String,
    sender_ids: BTreeMap<String, String>,
    receiver_ids: BTreeMap<String, String>,
    attributes: BTreeMap<String, String>,
}

impl Partnership {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Derives the transient partnership for one send.
    ///
    /// The receipt delivery option is always cleared: this client only
    /// supports synchronous MDNs.
    pub fn for_settings(settings: &As2ClientSettings) -> Self {
        let mut partnership = Self::new(settings.partnership_name());

        partnership.set_receiver_id(PID_AS2, &settings.receiver_as2_id);
        partnership.set_receiver_id(PID_X509_ALIAS, &settings.receiver_key_alias);

        partnership.set_sender_id(PID_AS2, &settings.sender_as2_id);
        partnership.set_sender_id(PID_X509_ALIAS, &settings.sender_key_alias);
        partnership.set_sender_id(PID_EMAIL, &settings.sender_email);

        partnership.set_attribute(PA_AS2_URL, &settings.destination_url);
        partnership.set_attribute(PA_ENCRYPT, settings.encryption_algorithm.wire_name());
        partnership.set_attribute(PA_SIGN, settings.signature_algorithm.wire_name());
        partnership.set_attribute(PA_PROTOCOL, PROTOCOL_AS2);
        partnership.set_attribute(PA_MDN_OPTIONS, &settings.mdn_options);
        partnership.clear_attribute(PA_RECEIPT_DELIVERY_OPTION);
        partnership.set_attribute(PA_MESSAGE_ID_FORMAT, &settings.message_id_format);

        partnership
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_sender_id(&mut self, key: &str, value: impl Into<String>) {
        self.sender_ids.insert(key.to_owned(), value.into());
    }

    pub fn sender_id(&self, key: &str) -> Option<&str> {
        self.sender_ids.get(key).map(String::as_str)
    }

    pub fn set_receiver_id(&mut self, key: &str, value: impl Into<String>) {
        self.receiver_ids.insert(key.to_owned(), value.into());
    }

    pub fn receiver_id(&self, key: &str) -> Option<&str> {
        self.receiver_ids.get(key).map(String::as_str)
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_owned(), value.into());
    }

    pub fn clear_attribute(&mut self, key: &str) {
        self.attributes.remove(key);
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
