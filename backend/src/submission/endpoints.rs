//! Fixed key tables of the two form-collection endpoints.
//!
//! The `entry.*` identifiers belong to the receiving forms. A key that does not
//! exist on the receiver is dropped there without any feedback, so these tables
//! are the contract and must not be edited casually. The two generations are
//! not interchangeable.

use serde::Serialize;

use crate::forms::FormVariant;

pub const DEFAULT_CONSOLIDATED_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSevW4FY7YJFpG1k8d2L055m-ArBy6jauNIQW1SImTeEtwdEFA/formResponse";
pub const DEFAULT_DEMO_DESK_URL: &str =
    "https://docs.google.com/forms/d/e/1FAIpQLSdVmeRzLwjcp_NgJc0Pqo1NnRmvaZY1mHoqwmQNQ0PDeKmzdA/formResponse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    /// Shared form collecting every variant except demo requests.
    Consolidated,
    /// Older form dedicated to demo requests.
    DemoDesk,
}

impl EndpointKind {
    pub fn for_variant(variant: FormVariant) -> Self {
        match variant {
            FormVariant::DemoRequest => EndpointKind::DemoDesk,
            _ => EndpointKind::Consolidated,
        }
    }
}

/// Where the value of an external key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// Text of one form field; empty string when absent.
    Field(&'static str),
    /// One key/value pair per selected item of a multi-select field.
    EachOf(&'static str),
    /// Consent flag rendered with the table's yes/no literals.
    Consent,
    /// Custom quote details with the budget range folded in.
    QuoteBrief,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    pub key: &'static str,
    pub source: ValueSource,
}

const fn field(key: &'static str, name: &'static str) -> FieldKey {
    FieldKey { key, source: ValueSource::Field(name) }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyTable {
    pub endpoint: EndpointKind,
    pub common: &'static [FieldKey],
    pub consent_yes: &'static str,
    pub consent_no: &'static str,
}

const CONSOLIDATED_COMMON: &[FieldKey] = &[
    field("entry.1281215578", "name"),
    field("entry.1544666143", "email"),
    field("entry.1323833081", "phone"),
    field("entry.397320121", "howHeard"),
    field("entry.1834734913", "preferredContact"),
    FieldKey { key: "entry.1887385685", source: ValueSource::Consent },
];

const DEMO_DESK_COMMON: &[FieldKey] = &[
    field("entry.29456833", "name"),
    field("entry.972921336", "email"),
    field("entry.1163255132", "phone"),
    field("entry.1033293189", "howHeard"),
    field("entry.398675917", "preferredContact"),
    FieldKey { key: "entry.843035178", source: ValueSource::Consent },
];

const CAREER_SERVICE_KEYS: &[FieldKey] = &[field("entry.64908277", "interest")];

const BASIC_KEYS: &[FieldKey] = &[
    field("entry.1786993325", "serviceInterested"),
    field("entry.1802830662", "projectDetails"),
];

const PRICING_PLAN_KEYS: &[FieldKey] = &[field("entry.803452891", "planInterested")];

const JOIN_TEAM_KEYS: &[FieldKey] = &[
    field("entry.150988986", "experience"),
    FieldKey { key: "entry.1125528412", source: ValueSource::EachOf("skills") },
    field("entry.367005104", "availability"),
    field("entry.1850187293", "github"),
    field("entry.516552343", "linkedin"),
    field("entry.707588687", "motivation"),
];

// Quotes reuse the service and details keys; the budget travels inside the details.
const CUSTOM_QUOTE_KEYS: &[FieldKey] = &[
    field("entry.1786993325", "serviceType"),
    FieldKey { key: "entry.1802830662", source: ValueSource::QuoteBrief },
];

const DEMO_REQUEST_KEYS: &[FieldKey] = &[field("entry.1138033603", "demo")];

pub static CONSOLIDATED: KeyTable = KeyTable {
    endpoint: EndpointKind::Consolidated,
    common: CONSOLIDATED_COMMON,
    consent_yes: "Yes, I consent to being contacted regarding my inquiry",
    consent_no: "No",
};

pub static DEMO_DESK: KeyTable = KeyTable {
    endpoint: EndpointKind::DemoDesk,
    common: DEMO_DESK_COMMON,
    consent_yes: "Yes",
    consent_no: "No",
};

impl KeyTable {
    pub fn for_endpoint(endpoint: EndpointKind) -> &'static KeyTable {
        match endpoint {
            EndpointKind::Consolidated => &CONSOLIDATED,
            EndpointKind::DemoDesk => &DEMO_DESK,
        }
    }

    /// Keys specific to `variant` on this endpoint.
    pub fn variant_keys(&self, variant: FormVariant) -> &'static [FieldKey] {
        match (self.endpoint, variant) {
            (EndpointKind::Consolidated, FormVariant::CareerService) => CAREER_SERVICE_KEYS,
            (EndpointKind::Consolidated, FormVariant::Basic) => BASIC_KEYS,
            (EndpointKind::Consolidated, FormVariant::PricingPlan) => PRICING_PLAN_KEYS,
            (EndpointKind::Consolidated, FormVariant::JoinTeam) => JOIN_TEAM_KEYS,
            (EndpointKind::Consolidated, FormVariant::CustomQuote) => CUSTOM_QUOTE_KEYS,
            (EndpointKind::DemoDesk, FormVariant::DemoRequest) => DEMO_REQUEST_KEYS,
            _ => &[],
        }
    }

    /// Every key the receiver expects for `variant`, in wire order.
    pub fn expected_keys(&self, variant: FormVariant) -> impl Iterator<Item = &'static FieldKey> {
        self.common.iter().chain(self.variant_keys(variant).iter())
    }
}
