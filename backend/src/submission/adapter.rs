use std::sync::Arc;

use crate::forms::ValidatedLead;

use super::endpoints::{EndpointKind, DEFAULT_CONSOLIDATED_URL, DEFAULT_DEMO_DESK_URL};
use super::payload::SubmissionPayload;
use super::transport::{DispatchOutcome, LeadTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointUrls {
    pub consolidated: String,
    pub demo_desk: String,
}

impl Default for EndpointUrls {
    fn default() -> Self {
        Self {
            consolidated: DEFAULT_CONSOLIDATED_URL.to_string(),
            demo_desk: DEFAULT_DEMO_DESK_URL.to_string(),
        }
    }
}

impl EndpointUrls {
    pub fn url_for(&self, endpoint: EndpointKind) -> &str {
        match endpoint {
            EndpointKind::Consolidated => &self.consolidated,
            EndpointKind::DemoDesk => &self.demo_desk,
        }
    }
}

pub struct SubmissionAdapter {
    transport: Arc<dyn LeadTransport>,
    urls: EndpointUrls,
}

impl SubmissionAdapter {
    pub fn new(transport: Arc<dyn LeadTransport>, urls: EndpointUrls) -> Self {
        Self { transport, urls }
    }

    /// Builds the payload for `lead` and posts it to the endpoint its variant routes to.
    pub async fn submit(&self, lead: &ValidatedLead) -> Result<DispatchOutcome, TransportError> {
        let payload = SubmissionPayload::build(lead);
        let url = self.urls.url_for(payload.endpoint());

        tracing::debug!(
            "Submitting {} lead to {:?} endpoint ({} pairs)",
            lead.variant(),
            payload.endpoint(),
            payload.len()
        );

        match self.transport.post_form(url, &payload).await {
            Ok(outcome) => {
                tracing::info!("Lead {} delivered: {:?}", lead.variant(), outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Failed to submit {} lead: {}", lead.variant(), e);
                Err(e)
            }
        }
    }
}
