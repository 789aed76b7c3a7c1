use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use super::schema::{FieldKind, FieldRule, FormSchema};
use super::values::{FieldValue, FormValues};
use super::FormVariant;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is valid")
});

/// Per-field messages for a rejected form, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[serde(transparent)]
#[error("{} invalid field(s)", .0.len())]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0.insert(field.to_string(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A form that passed every rule of its variant. Text values are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead {
    variant: FormVariant,
    values: FormValues,
}

impl ValidatedLead {
    pub fn variant(&self) -> FormVariant {
        self.variant
    }

    /// Text of a field, empty when the field was optional and left out.
    pub fn text(&self, name: &str) -> &str {
        self.values.text(name).unwrap_or("")
    }

    pub fn list(&self, name: &str) -> &[String] {
        self.values.list(name).unwrap_or(&[])
    }

    pub fn consent(&self) -> bool {
        self.values.flag("consent").unwrap_or(false)
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }
}

pub fn validate(variant: FormVariant, input: &FormValues) -> Result<ValidatedLead, ValidationErrors> {
    let schema = FormSchema::for_variant(variant);
    let mut values = FormValues::new();
    let mut errors = ValidationErrors::default();

    for rule in &schema.fields {
        match check_field(rule, input.get(rule.name)) {
            Ok(Some(value)) => values.insert(rule.name, value),
            Ok(None) => {}
            Err(message) => errors.insert(rule.name, message),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedLead { variant, values })
    } else {
        Err(errors)
    }
}

fn check_field(rule: &FieldRule, raw: Option<&FieldValue>) -> Result<Option<FieldValue>, String> {
    match rule.kind {
        FieldKind::Consent => match raw {
            Some(FieldValue::Flag(true)) => Ok(Some(FieldValue::Flag(true))),
            _ => Err(rule.missing_message.to_string()),
        },
        FieldKind::MultiChoice(options) => {
            let items: &[String] = match raw {
                None => &[],
                Some(FieldValue::List(items)) => items,
                Some(_) => return Err(format!("{} must be a list of options.", rule.label)),
            };
            let items: Vec<String> = items
                .iter()
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect();
            if items.is_empty() {
                return if rule.required {
                    Err(rule.missing_message.to_string())
                } else {
                    Ok(None)
                };
            }
            if let Some(unknown) = items.iter().find(|item| !is_option(options, item)) {
                return Err(format!("'{}' is not a valid option for {}.", unknown, rule.label));
            }
            Ok(Some(FieldValue::List(items)))
        }
        _ => {
            let text = match raw {
                None => "",
                Some(FieldValue::Text(text)) => text.as_str(),
                Some(_) => return Err(format!("{} must be text.", rule.label)),
            };
            check_text(rule, text).map(|checked| checked.map(FieldValue::Text))
        }
    }
}

fn check_text(rule: &FieldRule, text: &str) -> Result<Option<String>, String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        if !rule.required {
            return Ok(None);
        }
        return if text.is_empty() {
            Err(rule.missing_message.to_string())
        } else {
            Err(format!("{} cannot be empty or just whitespace.", rule.label))
        };
    }

    match rule.kind {
        FieldKind::Email if !EMAIL_RE.is_match(trimmed) => {
            Err("Please enter a valid email address.".to_string())
        }
        FieldKind::Url if !is_web_url(trimmed) => {
            Err(format!("Please enter a valid {} URL.", rule.label))
        }
        FieldKind::Choice(options) if !is_option(options, trimmed) => {
            Err(format!("'{}' is not a valid option for {}.", trimmed, rule.label))
        }
        _ => Ok(Some(trimmed.to_string())),
    }
}

fn is_option(options: &[&str], value: &str) -> bool {
    options.iter().any(|option| *option == value)
}

fn is_web_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_base() -> FormValues {
        FormValues::new()
            .with("name", "Jane Doe")
            .with("email", "jane@x.com")
            .with("phone", "9999999999")
            .with("preferredContact", "Email")
            .with("howHeard", "Referral")
            .with("consent", true)
    }

    fn valid_input(variant: FormVariant) -> FormValues {
        let base = valid_base();
        match variant {
            FormVariant::Basic => base.with("serviceInterested", "Web Development"),
            FormVariant::JoinTeam => base
                .with("experience", "3-5")
                .with("skills", &["React", "Docker"][..])
                .with("availability", "contract"),
            FormVariant::DemoRequest => base.with("demo", "Mobile Apps"),
            FormVariant::PricingPlan => base.with("planInterested", "Medium"),
            FormVariant::CustomQuote => base
                .with("serviceType", "ai")
                .with("budget", "large")
                .with("projectDetails", "A recommendation engine"),
            FormVariant::CareerService => base.with("interest", "Portfolio Website"),
        }
    }

    #[test]
    fn valid_input_passes_for_every_variant() {
        for variant in FormVariant::ALL {
            let lead = validate(variant, &valid_input(variant))
                .unwrap_or_else(|e| panic!("{} rejected: {:?}", variant, e));
            assert_eq!(lead.variant(), variant);
            assert!(lead.consent());
        }
    }

    #[test]
    fn consent_false_or_missing_is_rejected_for_every_variant() {
        for variant in FormVariant::ALL {
            let declined = valid_input(variant).with("consent", false);
            let errors = validate(variant, &declined).unwrap_err();
            assert_eq!(errors.get("consent"), Some("You must consent to proceed."));
            assert_eq!(errors.len(), 1);

            let mut missing = FormValues::new();
            for (name, value) in valid_input(variant).iter().filter(|(n, _)| *n != "consent") {
                missing.insert(name, value.clone());
            }
            assert!(validate(variant, &missing).unwrap_err().contains("consent"));
        }
    }

    #[test]
    fn consent_given_as_text_is_not_accepted() {
        let input = valid_input(FormVariant::Basic).with("consent", "true");
        assert!(validate(FormVariant::Basic, &input).unwrap_err().contains("consent"));
    }

    #[test]
    fn required_text_fields_reject_empty_and_whitespace() {
        for field in ["name", "email", "phone"] {
            let empty = valid_base().with(field, "");
            let errors = validate(FormVariant::PricingPlan, &empty.with("planInterested", "Small"))
                .unwrap_err();
            assert!(errors.get(field).unwrap().ends_with("is required."));

            let blank = valid_base().with(field, "   ").with("planInterested", "Small");
            let errors = validate(FormVariant::PricingPlan, &blank).unwrap_err();
            assert!(errors.get(field).unwrap().contains("cannot be empty or just whitespace"));
        }
    }

    #[test]
    fn email_grammar_is_enforced() {
        let good = valid_input(FormVariant::DemoRequest).with("email", "user@example.com");
        assert!(validate(FormVariant::DemoRequest, &good).is_ok());

        let bad = valid_input(FormVariant::DemoRequest).with("email", "not-an-email");
        let errors = validate(FormVariant::DemoRequest, &bad).unwrap_err();
        assert_eq!(errors.get("email"), Some("Please enter a valid email address."));
    }

    #[test]
    fn phone_has_no_format_constraint() {
        let input = valid_input(FormVariant::PricingPlan).with("phone", "call me maybe");
        assert!(validate(FormVariant::PricingPlan, &input).is_ok());
    }

    #[test]
    fn skills_need_at_least_one_selection() {
        let none = valid_input(FormVariant::JoinTeam).with("skills", Vec::<String>::new());
        let errors = validate(FormVariant::JoinTeam, &none).unwrap_err();
        assert_eq!(errors.get("skills"), Some("Please select at least one skill."));

        let one = valid_input(FormVariant::JoinTeam).with("skills", vec!["Git".to_string()]);
        let lead = validate(FormVariant::JoinTeam, &one).unwrap();
        assert_eq!(lead.list("skills"), ["Git".to_string()]);
    }

    #[test]
    fn unknown_choice_values_are_rejected() {
        let input = valid_input(FormVariant::PricingPlan).with("planInterested", "Huge");
        let errors = validate(FormVariant::PricingPlan, &input).unwrap_err();
        assert!(errors.get("planInterested").unwrap().contains("'Huge'"));

        let input = valid_input(FormVariant::JoinTeam).with("skills", &["React", "COBOL"][..]);
        assert!(validate(FormVariant::JoinTeam, &input).unwrap_err().contains("skills"));
    }

    #[test]
    fn optional_urls_accept_empty_and_reject_garbage() {
        let empty = valid_input(FormVariant::JoinTeam).with("github", "");
        assert!(validate(FormVariant::JoinTeam, &empty).is_ok());

        let good = valid_input(FormVariant::JoinTeam).with("linkedin", "https://linkedin.com/in/jane");
        assert_eq!(
            validate(FormVariant::JoinTeam, &good).unwrap().text("linkedin"),
            "https://linkedin.com/in/jane"
        );

        let bad = valid_input(FormVariant::JoinTeam).with("github", "github dot com");
        let errors = validate(FormVariant::JoinTeam, &bad).unwrap_err();
        assert_eq!(errors.get("github"), Some("Please enter a valid GitHub URL."));
    }

    #[test]
    fn all_failures_are_reported_together() {
        let errors = validate(FormVariant::CustomQuote, &FormValues::new()).unwrap_err();
        for field in ["name", "email", "phone", "consent", "serviceType", "budget", "projectDetails"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
    }

    #[test]
    fn values_are_trimmed() {
        let input = valid_input(FormVariant::PricingPlan).with("name", "  Jane Doe ");
        let lead = validate(FormVariant::PricingPlan, &input).unwrap();
        assert_eq!(lead.text("name"), "Jane Doe");
        assert_eq!(lead.text("projectDetails"), "");
    }
}
