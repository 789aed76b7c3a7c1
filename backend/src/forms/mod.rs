//! Lead form variants, their field rules and the validator that gates submission.

pub mod choices;
pub mod schema;
pub mod validator;
pub mod values;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use schema::{FieldKind, FieldRule, FormSchema};
pub use validator::{validate, ValidatedLead, ValidationErrors};
pub use values::{FieldValue, FormValues};

/// The named lead forms a popup can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormVariant {
    Basic,
    JoinTeam,
    DemoRequest,
    PricingPlan,
    CustomQuote,
    CareerService,
}

impl FormVariant {
    pub const ALL: [FormVariant; 6] = [
        FormVariant::Basic,
        FormVariant::JoinTeam,
        FormVariant::DemoRequest,
        FormVariant::PricingPlan,
        FormVariant::CustomQuote,
        FormVariant::CareerService,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormVariant::Basic => "basic",
            FormVariant::JoinTeam => "joinTeam",
            FormVariant::DemoRequest => "demoRequest",
            FormVariant::PricingPlan => "pricingPlan",
            FormVariant::CustomQuote => "customQuote",
            FormVariant::CareerService => "careerService",
        }
    }
}

impl fmt::Display for FormVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown form variant: {0}")]
pub struct UnknownVariant(pub String);

impl FromStr for FormVariant {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormVariant::ALL
            .iter()
            .copied()
            .find(|variant| variant.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}
