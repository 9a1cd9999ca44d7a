//! Message envelope assembly and message-id generation.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use crate::client::request::As2ClientRequest;
use crate::error::SendError;
use crate::partnership::{
    PA_AS2_URL, PA_ENCRYPT, PA_MESSAGE_ID_FORMAT, PA_PROTOCOL, PA_SIGN, PID_AS2, PID_EMAIL,
    Partnership,
};

/// Default message-id format. The UUID token keeps ids collision-free
/// across concurrent sends.
pub const DEFAULT_MESSAGE_ID_FORMAT: &str =
    "as2-$date.%Y%m%d-%H%M%S$-$uuid$@$msg.sender.as2_id$_$msg.receiver.as2_id$";

/// Synchronous receipt returned by the receiving partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mdn {
    disposition: String,
    original_message_id: Option<String>,
    text: String,
}

impl Mdn {
    pub fn new(
        disposition: impl Into<String>,
        original_message_id: Option<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            disposition: disposition.into(),
            original_message_id,
            text: text.into(),
        }
    }

    pub fn disposition(&self) -> &str {
        &self.disposition
    }

    pub fn original_message_id(&self) -> Option<&str> {
        self.original_message_id.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// The assembled, uniquely identified unit handed to the transmission
/// engine. Single-use: one envelope per send.
#[derive(Debug, Clone)]
pub struct As2Message {
    content_type: String,
    subject: String,
    partnership: Partnership,
    message_id: String,
    attributes: BTreeMap<String, String>,
    body: Vec<u8>,
    mdn: Option<Mdn>,
}

impl As2Message {
    /// Assembles the envelope for one send.
    ///
    /// Generates a fresh message id from the partnership's configured
    /// format and mirrors the attributes the transmission engine needs
    /// (destination URL, receiver AS2 id, sender email) as copies.
    pub fn assemble(
        partnership: &Partnership,
        request: &As2ClientRequest,
    ) -> Result<Self, SendError> {
        for key in [PA_PROTOCOL, PA_AS2_URL, PA_ENCRYPT, PA_SIGN] {
            if partnership.attribute(key).is_none() {
                return Err(SendError::protocol(format!(
                    "partnership '{}' is missing attribute '{key}'",
                    partnership.name()
                )));
            }
        }

        let body = request.render()?;

        let format = partnership
            .attribute(PA_MESSAGE_ID_FORMAT)
            .unwrap_or(DEFAULT_MESSAGE_ID_FORMAT);
        let message_id = generate_message_id(format, partnership);

        let mut attributes = BTreeMap::new();
        for (attribute, value) in [
            (PA_AS2_URL, partnership.attribute(PA_AS2_URL)),
            (PID_AS2, partnership.receiver_id(PID_AS2)),
            (PID_EMAIL, partnership.sender_id(PID_EMAIL)),
        ] {
            if let Some(value) = value {
                attributes.insert(attribute.to_owned(), value.to_owned());
            }
        }

        Ok(Self {
            content_type: request.content_type().to_owned(),
            subject: request.subject().to_owned(),
            partnership: partnership.clone(),
            message_id,
            attributes,
            body,
            mdn: None,
        })
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn partnership(&self) -> &Partnership {
        &self.partnership
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn mdn(&self) -> Option<&Mdn> {
        self.mdn.as_ref()
    }

    pub fn set_mdn(&mut self, mdn: Mdn) {
        self.mdn = Some(mdn);
    }
}

/// Expands a message-id format string and wraps the result in angle
/// brackets.
///
/// Supported tokens: `$date.<chrono format>$`, `$rand.<digits>$` (as
/// many random digits as the token text is long), `$uuid$`,
/// `$msg.sender.as2_id$` and `$msg.receiver.as2_id$`. Unknown tokens
/// and date tokens with an invalid chrono specifier are kept
/// literally; expansion never fails.
pub fn generate_message_id(format: &str, partnership: &Partnership) -> String {
    let mut out = String::with_capacity(format.len() + 34);
    out.push('<');
    let mut rest = format;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('$') {
            Some(end) => {
                expand_token(&after[..end], partnership, &mut out);
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated token, keep the dollar sign literally.
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out.push('>');
    out
}

fn expand_token(token: &str, partnership: &Partnership, out: &mut String) {
    if let Some(format) = token.strip_prefix("date.") {
        // Formatting only fails on an invalid chrono specifier; the
        // token is then kept literally so id generation stays total.
        let mut rendered = String::new();
        match write!(rendered, "{}", Utc::now().format(format)) {
            Ok(()) => out.push_str(&rendered),
            Err(_) => {
                out.push('$');
                out.push_str(token);
                out.push('$');
            }
        }
        return;
    }
    if let Some(width) = token.strip_prefix("rand.") {
        let mut rng = rand::rng();
        for _ in 0..width.len().max(1) {
            out.push(char::from(b'0' + rng.random_range(0..10u8)));
        }
        return;
    }
    match token {
        "uuid" => out.push_str(&Uuid::new_v4().simple().to_string()),
        "msg.sender.as2_id" => out.push_str(partnership.sender_id(PID_AS2).unwrap_or_default()),
        "msg.receiver.as2_id" => {
            out.push_str(partnership.receiver_id(PID_AS2).unwrap_or_default());
        }
        _ => {
            out.push('$');
            out.push_str(token);
            out.push('$');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::Payload;
    use crate::client::settings::test_settings;

    fn request() -> As2ClientRequest {
        As2ClientRequest::new(
            "application/edifact",
            "test order",
            Payload::Bytes(b"0123456789".to_vec()),
        )
    }

    #[test]
    fn expands_id_tokens() {
        let partnership = Partnership::for_settings(&test_settings("ME", "THEM"));

        let id = generate_message_id("$msg.sender.as2_id$_$msg.receiver.as2_id$", &partnership);
        assert_eq!(id, "<ME_THEM>");

        let id = generate_message_id("x-$rand.1234$", &partnership);
        assert_eq!(id.len(), "<x-NNNN>".len());
        assert!(id[3..7].chars().all(|c| c.is_ascii_digit()), "{id}");

        let id = generate_message_id("$date.%Y$", &partnership);
        assert!(id[1..5].chars().all(|c| c.is_ascii_digit()), "{id}");
    }

    #[test]
    fn keeps_unknown_and_unterminated_tokens_literally() {
        let partnership = Partnership::for_settings(&test_settings("ME", "THEM"));

        assert_eq!(generate_message_id("a$bogus$b", &partnership), "<a$bogus$b>");
        assert_eq!(generate_message_id("a$b", &partnership), "<a$b>");
    }

    #[test]
    fn keeps_invalid_date_specifiers_literally() {
        let partnership = Partnership::for_settings(&test_settings("ME", "THEM"));

        assert_eq!(
            generate_message_id("$date.%Q$-$msg.sender.as2_id$", &partnership),
            "<$date.%Q$-ME>"
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        let partnership = Partnership::for_settings(&test_settings("ME", "THEM"));

        let first = generate_message_id(DEFAULT_MESSAGE_ID_FORMAT, &partnership);
        let second = generate_message_id(DEFAULT_MESSAGE_ID_FORMAT, &partnership);
        assert_ne!(first, second);
    }

    #[test]
    fn assemble_mirrors_partnership_attributes() {
        let partnership = Partnership::for_settings(&test_settings("ME", "THEM"));
        let message = As2Message::assemble(&partnership, &request()).unwrap();

        assert_eq!(
            message.attribute(PA_AS2_URL),
            Some("https://partner.example/as2")
        );
        assert_eq!(message.attribute(PID_AS2), Some("THEM"));
        assert_eq!(message.attribute(PID_EMAIL), Some("me@example.com"));
        assert_eq!(message.body(), b"0123456789");
        assert!(message.mdn().is_none());
        assert!(
            message.message_id().starts_with("<as2-"),
            "{}",
            message.message_id()
        );
        assert!(message.message_id().ends_with("ME_THEM>"));
    }

    #[test]
    fn assemble_rejects_missing_attributes() {
        let partnership = Partnership::new("broken");
        let result = As2Message::assemble(&partnership, &request());
        assert!(matches!(result, Err(SendError::Protocol(_))));
    }
}
