//! Turns validated leads into the receivers' flat key/value format and posts them.

pub mod adapter;
pub mod endpoints;
pub mod payload;
pub mod transport;

pub use adapter::{EndpointUrls, SubmissionAdapter};
pub use endpoints::EndpointKind;
pub use payload::SubmissionPayload;
pub use transport::{DeliveryMode, DispatchOutcome, LeadTransport, ReqwestTransport, TransportError};
#[cfg(test)]
pub use transport::MockLeadTransport;
