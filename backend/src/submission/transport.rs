use std::str::FromStr;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::payload::SubmissionPayload;

/// What the sender actually knows after a submit.
///
/// `Dispatched` only means the request left without a network error; the
/// receiver may still have dropped it. `Confirmed` means a 2xx was observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Dispatched,
    Confirmed { status: u16 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Fire and forget, the response is never inspected.
    #[default]
    Opaque,
    /// Inspect the status; non-2xx becomes a rejection.
    Observed,
}

impl FromStr for DeliveryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "opaque" => Ok(DeliveryMode::Opaque),
            "observed" => Ok(DeliveryMode::Observed),
            other => Err(format!("unknown delivery mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Failed to reach form endpoint: {0}")]
    Network(String),
    #[error("Form endpoint rejected the submission with status {0}")]
    Rejected(u16),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LeadTransport: Send + Sync {
    /// Posts `payload` form-urlencoded to `url`. Called once per submit, never retried.
    async fn post_form(
        &self,
        url: &str,
        payload: &SubmissionPayload,
    ) -> Result<DispatchOutcome, TransportError>;
}

pub struct ReqwestTransport {
    client: Client,
    mode: DeliveryMode,
}

impl ReqwestTransport {
    pub fn new(mode: DeliveryMode) -> Self {
        Self { client: Client::new(), mode }
    }
}

#[async_trait]
impl LeadTransport for ReqwestTransport {
    async fn post_form(
        &self,
        url: &str,
        payload: &SubmissionPayload,
    ) -> Result<DispatchOutcome, TransportError> {
        let response = self
            .client
            .post(url)
            .form(payload.pairs())
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        match self.mode {
            DeliveryMode::Opaque => Ok(DispatchOutcome::Dispatched),
            DeliveryMode::Observed => {
                let status = response.status();
                if status.is_success() {
                    Ok(DispatchOutcome::Confirmed { status: status.as_u16() })
                } else {
                    Err(TransportError::Rejected(status.as_u16()))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delivery_mode_parses_case_insensitively() {
        assert_eq!("Observed".parse::<DeliveryMode>(), Ok(DeliveryMode::Observed));
        assert_eq!(" opaque ".parse::<DeliveryMode>(), Ok(DeliveryMode::Opaque));
        assert!("no-cors".parse::<DeliveryMode>().is_err());
    }

    #[test]
    fn outcomes_serialize_distinctly() {
        let dispatched = serde_json::to_value(DispatchOutcome::Dispatched).unwrap();
        let confirmed = serde_json::to_value(DispatchOutcome::Confirmed { status: 200 }).unwrap();
        assert_eq!(dispatched["delivery"], "dispatched");
        assert_eq!(confirmed["delivery"], "confirmed");
        assert_eq!(confirmed["status"], 200);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_network_error() {
        let lead = crate::forms::validate(
            crate::forms::FormVariant::PricingPlan,
            &crate::forms::FormValues::new()
                .with("name", "Jane")
                .with("email", "jane@x.com")
                .with("phone", "1")
                .with("preferredContact", "Phone")
                .with("howHeard", "Other")
                .with("planInterested", "Small")
                .with("consent", true),
        )
        .unwrap();
        let payload = SubmissionPayload::build(&lead);
        let transport = ReqwestTransport::new(DeliveryMode::Opaque);

        // Nothing listens on the discard port here.
        let result = transport.post_form("http://127.0.0.1:9/formResponse", &payload).await;
        assert!(matches!(result, Err(TransportError::Network(_))));
    }
}
