use crate::forms::ValidatedLead;

use super::endpoints::{EndpointKind, KeyTable, ValueSource};

/// Flat key/value body for one submit attempt, in wire order.
///
/// Every key the receiving endpoint expects for the lead's variant is present;
/// absent optional fields are sent as empty strings. Multi-select fields repeat
/// their key once per selected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionPayload {
    endpoint: EndpointKind,
    pairs: Vec<(&'static str, String)>,
}

impl SubmissionPayload {
    pub fn build(lead: &ValidatedLead) -> Self {
        let endpoint = EndpointKind::for_variant(lead.variant());
        let table = KeyTable::for_endpoint(endpoint);
        let mut pairs = Vec::new();

        for entry in table.expected_keys(lead.variant()) {
            match entry.source {
                ValueSource::Field(name) => pairs.push((entry.key, lead.text(name).to_string())),
                ValueSource::EachOf(name) => {
                    let items = lead.list(name);
                    if items.is_empty() {
                        pairs.push((entry.key, String::new()));
                    }
                    for item in items {
                        pairs.push((entry.key, item.clone()));
                    }
                }
                ValueSource::Consent => {
                    let literal = if lead.consent() { table.consent_yes } else { table.consent_no };
                    pairs.push((entry.key, literal.to_string()));
                }
                ValueSource::QuoteBrief => pairs.push((entry.key, quote_brief(lead))),
            }
        }

        Self { endpoint, pairs }
    }

    pub fn endpoint(&self) -> EndpointKind {
        self.endpoint
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// First value sent under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn quote_brief(lead: &ValidatedLead) -> String {
    let budget = lead.text("budget");
    let details = lead.text("projectDetails");
    if budget.is_empty() {
        details.to_string()
    } else {
        format!("Budget: {}\n{}", budget, details)
    }
}
