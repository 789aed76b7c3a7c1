use serde::Serialize;

use super::choices;
use super::values::{FieldValue, FormValues};
use super::FormVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "choices", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Url,
    FreeText,
    Choice(&'static [&'static str]),
    MultiChoice(&'static [&'static str]),
    Consent,
}

/// Static rule for one field of a form variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldRule {
    pub name: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub required: bool,
    /// Shown when a required field is missing.
    pub missing_message: &'static str,
}

impl FieldRule {
    const fn required(
        name: &'static str,
        label: &'static str,
        kind: FieldKind,
        missing_message: &'static str,
    ) -> Self {
        Self { name, label, kind, required: true, missing_message }
    }

    const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self { name, label, kind, required: false, missing_message: "" }
    }

    /// Value a freshly opened form shows for this field.
    pub fn empty_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::MultiChoice(_) => FieldValue::List(Vec::new()),
            FieldKind::Consent => FieldValue::Flag(false),
            _ => FieldValue::Text(String::new()),
        }
    }
}

const BASE_FIELDS: [FieldRule; 6] = [
    FieldRule::required("name", "Full Name", FieldKind::Text, "Full Name is required."),
    FieldRule::required("email", "Email Address", FieldKind::Email, "Email Address is required."),
    FieldRule::required("phone", "Phone Number", FieldKind::Phone, "Phone Number is required."),
    FieldRule::required(
        "preferredContact",
        "Preferred Contact Method",
        FieldKind::Choice(choices::CONTACT_METHODS),
        "Please select your preferred contact method.",
    ),
    FieldRule::required(
        "howHeard",
        "How did you hear about us?",
        FieldKind::Choice(choices::HOW_HEARD),
        "Please select how you heard about us.",
    ),
    FieldRule::required("consent", "Consent", FieldKind::Consent, "You must consent to proceed."),
];

fn extension(variant: FormVariant) -> Vec<FieldRule> {
    match variant {
        FormVariant::Basic => vec![
            FieldRule::required(
                "serviceInterested",
                "Service Interested In",
                FieldKind::Choice(choices::SERVICES),
                "Please select a service.",
            ),
            FieldRule::optional("projectDetails", "Project Details", FieldKind::FreeText),
        ],
        FormVariant::JoinTeam => vec![
            FieldRule::required(
                "experience",
                "Years of Experience",
                FieldKind::Choice(choices::EXPERIENCE_LEVELS),
                "Please select your years of experience.",
            ),
            FieldRule::required(
                "skills",
                "Primary Skills",
                FieldKind::MultiChoice(choices::SKILLS),
                "Please select at least one skill.",
            ),
            FieldRule::required(
                "availability",
                "Availability",
                FieldKind::Choice(choices::AVAILABILITY),
                "Please select your availability.",
            ),
            FieldRule::optional("github", "GitHub", FieldKind::Url),
            FieldRule::optional("linkedin", "LinkedIn", FieldKind::Url),
            FieldRule::optional("motivation", "Why do you want to join?", FieldKind::FreeText),
        ],
        FormVariant::DemoRequest => vec![FieldRule::required(
            "demo",
            "Service Interested In",
            FieldKind::Choice(choices::SERVICES),
            "Please select a service.",
        )],
        FormVariant::PricingPlan => vec![FieldRule::required(
            "planInterested",
            "Plan Interested In",
            FieldKind::Choice(choices::PRICING_PLANS),
            "Please select a plan.",
        )],
        FormVariant::CustomQuote => vec![
            FieldRule::required(
                "serviceType",
                "Service Type",
                FieldKind::Choice(choices::QUOTE_SERVICE_TYPES),
                "Please select a service type.",
            ),
            FieldRule::required(
                "budget",
                "Budget Range",
                FieldKind::Choice(choices::QUOTE_BUDGETS),
                "Please select a budget range.",
            ),
            FieldRule::required(
                "projectDetails",
                "Project Details",
                FieldKind::FreeText,
                "Project Details are required.",
            ),
        ],
        FormVariant::CareerService => vec![FieldRule::required(
            "interest",
            "Career Service",
            FieldKind::Choice(choices::CAREER_SERVICES),
            "Please select a career service.",
        )],
    }
}

/// Base fields shared by every variant followed by the variant's own fields.
#[derive(Debug, Clone, Serialize)]
pub struct FormSchema {
    pub variant: FormVariant,
    pub fields: Vec<FieldRule>,
}

impl FormSchema {
    pub fn for_variant(variant: FormVariant) -> Self {
        let mut fields = BASE_FIELDS.to_vec();
        fields.extend(extension(variant));
        Self { variant, fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name == name)
    }

    /// Empty values for every field, overlaid with `defaults` for known fields.
    pub fn initial_values(&self, defaults: &FormValues) -> FormValues {
        let mut values = FormValues::new();
        for rule in &self.fields {
            let value = defaults.get(rule.name).cloned().unwrap_or_else(|| rule.empty_value());
            values.insert(rule.name, value);
        }
        values
    }
}
