use crate::error::SendError;
use crate::message::Mdn;

/// Outcome of one synchronous send.
///
/// The MDN field is populated if and only if the transmission engine
/// attached a receipt to the message envelope, independent of whether a
/// failure was also recorded.
#[derive(Debug, Default)]
pub struct As2ClientResponse {
    original_message_id: String,
    mdn: Option<Mdn>,
    error: Option<SendError>,
}

impl As2ClientResponse {
    /// Identifier generated during message assembly; empty if assembly
    /// never completed.
    pub fn original_message_id(&self) -> &str {
        &self.original_message_id
    }

    pub fn has_mdn(&self) -> bool {
        self.mdn.is_some()
    }

    pub fn mdn(&self) -> Option<&Mdn> {
        self.mdn.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&SendError> {
        self.error.as_ref()
    }

    /// Human-readable summary of whichever parts are present.
    pub fn as_string(&self) -> String {
        let mut parts = Vec::new();
        if !self.original_message_id.is_empty() {
            parts.push(format!("original message id '{}'", self.original_message_id));
        }
        if let Some(mdn) = &self.mdn {
            parts.push(format!("MDN disposition '{}'", mdn.disposition()));
        }
        match &self.error {
            Some(error) => parts.push(format!("error: {error}")),
            None => parts.push("success".to_owned()),
        }
        parts.join(", ")
    }

    pub(crate) fn set_original_message_id(&mut self, message_id: &str) {
        self.original_message_id = message_id.to_owned();
    }

    pub(crate) fn set_mdn(&mut self, mdn: Mdn) {
        self.mdn = Some(mdn);
    }

    pub(crate) fn set_error(&mut self, error: SendError) {
        self.error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reports_success() {
        let mut response = As2ClientResponse::default();
        response.set_original_message_id("<id-1>");
        response.set_mdn(Mdn::new("processed", None, ""));

        let summary = response.as_string();
        assert!(summary.contains("<id-1>"), "{summary}");
        assert!(summary.contains("processed"), "{summary}");
        assert!(summary.contains("success"), "{summary}");
    }

    #[test]
    fn summary_reports_failure_without_message_id() {
        let mut response = As2ClientResponse::default();
        response.set_error(SendError::component_init("keystore missing"));

        let summary = response.as_string();
        assert!(!summary.contains("original message id"), "{summary}");
        assert!(summary.contains("keystore missing"), "{summary}");
    }

    #[test]
    fn summary_reports_mdn_alongside_failure() {
        let mut response = As2ClientResponse::default();
        response.set_original_message_id("<id-2>");
        response.set_mdn(Mdn::new("processed", None, ""));
        response.set_error(SendError::transmission("post-processing failed"));

        let summary = response.as_string();
        assert!(summary.contains("processed"), "{summary}");
        assert!(summary.contains("post-processing failed"), "{summary}");
    }
}
