//! Transmission engine interface and the HTTP implementation.

pub mod http;

pub use http::HttpSenderModule;

use crate::error::SendError;
use crate::message::As2Message;
use crate::session::Session;

/// Protocol-level delivery of one assembled message.
///
/// Implementations may attach a synchronous MDN to the message as a
/// side effect of the call, independent of whether the call itself
/// fails; the workflow harvests it either way.
pub trait SenderModule: Send + Sync {
    fn send(&self, message: &mut As2Message, session: &Session) -> Result<(), SendError>;
}
