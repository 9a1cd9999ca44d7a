pub mod client;
pub mod config;
pub mod error;
pub mod message;
pub mod partnership;
pub mod sender;
pub mod session;
pub mod telemetry;

pub use client::{As2Client, As2ClientRequest, As2ClientResponse, As2ClientSettings};
pub use error::SendError;
