use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::forms::{validate, FormSchema, FormValues, FormVariant, ValidatedLead, ValidationErrors};
use crate::submission::{DispatchOutcome, TransportError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupState {
    Closed,
    Open,
    Submitting,
    SuccessAck,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PopupError {
    #[error("A {0} popup is already open")]
    AlreadyOpen(FormVariant),
    #[error("Popup is not open")]
    NotOpen,
    #[error("A submission is already in progress")]
    SubmitInFlight,
    #[error("Form has {0}")]
    Invalid(ValidationErrors),
    #[error("There is no successful submission to acknowledge")]
    NothingToAcknowledge,
    #[error("Popup session {0} not found")]
    UnknownSession(Uuid),
}

pub const DISPATCH_FAILED: &str = "We couldn't send your details. Please try again.";

/// How long a variant keeps its success panel before closing on its own.
pub fn auto_close_delay(variant: FormVariant) -> Option<Duration> {
    match variant {
        FormVariant::DemoRequest => Some(Duration::from_secs(2)),
        _ => None,
    }
}

/// Handed out when a submit is accepted; the submit is finished by passing it
/// back to [`PopupController::complete_submit`].
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    generation: u64,
    lead: ValidatedLead,
}

impl SubmitTicket {
    pub fn lead(&self) -> &ValidatedLead {
        &self.lead
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PopupView {
    pub state: PopupState,
    pub variant: Option<FormVariant>,
    pub values: FormValues,
    pub errors: ValidationErrors,
    /// Coarse message left by the last failed dispatch.
    pub failure: Option<String>,
    pub outcome: Option<DispatchOutcome>,
}

/// State of one popup: Closed -> Open -> Submitting -> SuccessAck -> Closed,
/// with Submitting falling back to Open when the dispatch fails.
#[derive(Debug, Clone)]
pub struct PopupController {
    state: PopupState,
    variant: Option<FormVariant>,
    values: FormValues,
    errors: ValidationErrors,
    failure: Option<String>,
    outcome: Option<DispatchOutcome>,
    close_at: Option<Instant>,
    // Bumped on every open and close so late dispatch results can be told apart.
    generation: u64,
}

impl Default for PopupController {
    fn default() -> Self {
        Self::new()
    }
}

impl PopupController {
    pub fn new() -> Self {
        Self {
            state: PopupState::Closed,
            variant: None,
            values: FormValues::new(),
            errors: ValidationErrors::default(),
            failure: None,
            outcome: None,
            close_at: None,
            generation: 0,
        }
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn variant(&self) -> Option<FormVariant> {
        self.variant
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn open(&mut self, variant: FormVariant, defaults: &FormValues) -> Result<(), PopupError> {
        if self.state != PopupState::Closed {
            return Err(PopupError::AlreadyOpen(self.variant.unwrap_or(variant)));
        }
        self.generation += 1;
        self.state = PopupState::Open;
        self.variant = Some(variant);
        self.values = FormSchema::for_variant(variant).initial_values(defaults);
        tracing::debug!("Opened {} popup with {} default(s)", variant, defaults.len());
        Ok(())
    }

    /// Merges edits into the open form. Fields the variant does not have are ignored.
    pub fn set_fields(&mut self, edits: &FormValues) -> Result<(), PopupError> {
        let variant = match (self.state, self.variant) {
            (PopupState::Open, Some(variant)) => variant,
            (PopupState::Submitting, _) => return Err(PopupError::SubmitInFlight),
            _ => return Err(PopupError::NotOpen),
        };
        let schema = FormSchema::for_variant(variant);
        for (name, value) in edits.iter() {
            if let Some(rule) = schema.field(name) {
                self.values.insert(rule.name, value.clone());
                self.errors = without_field(&self.errors, rule.name);
            }
        }
        Ok(())
    }

    /// Validates the form and moves to Submitting. A second call while a
    /// submission is in flight is rejected without side effects.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, PopupError> {
        let variant = match (self.state, self.variant) {
            (PopupState::Open, Some(variant)) => variant,
            (PopupState::Submitting, _) => return Err(PopupError::SubmitInFlight),
            _ => return Err(PopupError::NotOpen),
        };
        match validate(variant, &self.values) {
            Ok(lead) => {
                self.state = PopupState::Submitting;
                self.errors = ValidationErrors::default();
                self.failure = None;
                Ok(SubmitTicket { generation: self.generation, lead })
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(PopupError::Invalid(errors))
            }
        }
    }

    /// Applies a dispatch result. Returns false when the popup was closed or
    /// reopened since the ticket was issued; the result is then dropped.
    pub fn complete_submit(
        &mut self,
        ticket: &SubmitTicket,
        result: Result<DispatchOutcome, TransportError>,
        now: Instant,
    ) -> bool {
        if self.state != PopupState::Submitting || ticket.generation != self.generation {
            tracing::debug!("Discarding dispatch result for a popup that moved on");
            return false;
        }
        match result {
            Ok(outcome) => {
                self.state = PopupState::SuccessAck;
                self.outcome = Some(outcome);
                self.close_at = self.variant.and_then(auto_close_delay).map(|delay| now + delay);
            }
            Err(e) => {
                tracing::debug!("Popup back to open after failed dispatch: {}", e);
                self.state = PopupState::Open;
                self.failure = Some(DISPATCH_FAILED.to_string());
            }
        }
        true
    }

    /// Returns to Open without a dispatch having happened, e.g. when the
    /// submission was refused before it left.
    pub fn abort_submit(&mut self, ticket: &SubmitTicket) -> bool {
        if self.state != PopupState::Submitting || ticket.generation != self.generation {
            return false;
        }
        self.state = PopupState::Open;
        true
    }

    pub fn acknowledge(&mut self) -> Result<(), PopupError> {
        if self.state != PopupState::SuccessAck {
            return Err(PopupError::NothingToAcknowledge);
        }
        self.close();
        Ok(())
    }

    /// Closes the popup from any state and discards everything entered.
    /// An in-flight dispatch keeps running but its result will be ignored.
    pub fn cancel(&mut self) {
        if self.state != PopupState::Closed {
            self.close();
        }
    }

    /// Closes a success panel whose auto-close deadline has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match (self.state, self.close_at) {
            (PopupState::SuccessAck, Some(deadline)) if deadline <= now => {
                self.close();
                true
            }
            _ => false,
        }
    }

    pub fn view(&self) -> PopupView {
        PopupView {
            state: self.state,
            variant: self.variant,
            values: self.values.clone(),
            errors: self.errors.clone(),
            failure: self.failure.clone(),
            outcome: self.outcome,
        }
    }

    fn close(&mut self) {
        self.generation += 1;
        self.state = PopupState::Closed;
        self.variant = None;
        self.values = FormValues::new();
        self.errors = ValidationErrors::default();
        self.failure = None;
        self.outcome = None;
        self.close_at = None;
    }
}

fn without_field(errors: &ValidationErrors, field: &str) -> ValidationErrors {
    let mut remaining = ValidationErrors::default();
    for (name, message) in errors.iter() {
        if name != field {
            remaining.insert(name, message);
        }
    }
    remaining
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pricing_input() -> FormValues {
        FormValues::new()
            .with("name", "Jane Doe")
            .with("email", "jane@x.com")
            .with("phone", "9999999999")
            .with("preferredContact", "Email")
            .with("howHeard", "Referral")
            .with("consent", true)
    }

    fn open_pricing(plan: &str) -> PopupController {
        let mut popup = PopupController::new();
        popup
            .open(FormVariant::PricingPlan, &FormValues::new().with("planInterested", plan))
            .unwrap();
        popup
    }

    #[test]
    fn defaults_prefill_and_do_not_survive_cancel() {
        let mut popup = open_pricing("Large");
        assert_eq!(popup.values().text("planInterested"), Some("Large"));
        popup.set_fields(&FormValues::new().with("name", "Jane")).unwrap();

        popup.cancel();
        assert_eq!(popup.state(), PopupState::Closed);

        popup
            .open(FormVariant::PricingPlan, &FormValues::new().with("planInterested", "Small"))
            .unwrap();
        assert_eq!(popup.values().text("planInterested"), Some("Small"));
        assert_eq!(popup.values().text("name"), Some(""));
    }

    #[test]
    fn edits_after_open_are_not_overwritten_by_defaults() {
        let mut popup = open_pricing("Large");
        popup.set_fields(&FormValues::new().with("planInterested", "Medium")).unwrap();
        popup.set_fields(&FormValues::new().with("name", "Jane")).unwrap();
        assert_eq!(popup.values().text("planInterested"), Some("Medium"));
    }

    #[test]
    fn opening_twice_is_refused() {
        let mut popup = open_pricing("Large");
        let err = popup.open(FormVariant::Basic, &FormValues::new()).unwrap_err();
        assert_eq!(err, PopupError::AlreadyOpen(FormVariant::PricingPlan));
    }

    #[test]
    fn invalid_form_stays_open_with_errors() {
        let mut popup = open_pricing("Medium");
        match popup.begin_submit() {
            Err(PopupError::Invalid(errors)) => assert!(errors.contains("consent")),
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert_eq!(popup.state(), PopupState::Open);
        assert!(popup.view().errors.contains("name"));

        popup.set_fields(&FormValues::new().with("name", "Jane")).unwrap();
        assert!(!popup.view().errors.contains("name"));
    }

    #[test]
    fn second_submit_while_in_flight_is_a_no_op() {
        let mut popup = open_pricing("Medium");
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        let before = popup.view();

        assert_eq!(popup.begin_submit().unwrap_err(), PopupError::SubmitInFlight);
        assert_eq!(popup.state(), PopupState::Submitting);
        assert_eq!(popup.view().values, before.values);

        assert!(popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), Instant::now()));
        assert_eq!(popup.state(), PopupState::SuccessAck);
        assert!(!popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), Instant::now()));
    }

    #[test]
    fn network_failure_returns_to_open_with_values_intact() {
        let mut popup = open_pricing("Medium");
        popup.set_fields(&pricing_input()).unwrap();
        let entered = popup.values().clone();
        let ticket = popup.begin_submit().unwrap();

        let applied = popup.complete_submit(
            &ticket,
            Err(TransportError::Network("dns failure".to_string())),
            Instant::now(),
        );
        assert!(applied);
        assert_eq!(popup.state(), PopupState::Open);
        assert_eq!(popup.values(), &entered);
        assert!(popup.view().failure.is_some());

        // Manual retry goes through.
        let retry = popup.begin_submit().unwrap();
        assert!(popup.complete_submit(&retry, Ok(DispatchOutcome::Dispatched), Instant::now()));
        assert_eq!(popup.view().failure, None);
    }

    #[test]
    fn result_arriving_after_cancel_is_ignored() {
        let mut popup = open_pricing("Medium");
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        popup.cancel();
        popup.open(FormVariant::PricingPlan, &FormValues::new()).unwrap();

        assert!(!popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), Instant::now()));
        assert_eq!(popup.state(), PopupState::Open);
    }

    #[test]
    fn aborted_submit_reopens_without_failure() {
        let mut popup = open_pricing("Medium");
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        assert!(popup.abort_submit(&ticket));
        assert_eq!(popup.state(), PopupState::Open);
        assert_eq!(popup.view().failure, None);
        assert!(!popup.abort_submit(&ticket));
    }

    #[test]
    fn acknowledge_closes_success_panel() {
        let mut popup = open_pricing("Medium");
        assert_eq!(popup.acknowledge().unwrap_err(), PopupError::NothingToAcknowledge);
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), Instant::now());

        popup.acknowledge().unwrap();
        assert_eq!(popup.state(), PopupState::Closed);
        assert!(popup.values().is_empty());
    }

    #[test]
    fn demo_request_success_closes_itself_after_two_seconds() {
        let mut popup = PopupController::new();
        popup
            .open(FormVariant::DemoRequest, &FormValues::new().with("demo", "Mobile Apps"))
            .unwrap();
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        let done = Instant::now();
        popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), done);

        assert!(!popup.tick(done + Duration::from_millis(1999)));
        assert_eq!(popup.state(), PopupState::SuccessAck);
        assert!(popup.tick(done + Duration::from_secs(2)));
        assert_eq!(popup.state(), PopupState::Closed);
    }

    #[test]
    fn pricing_success_waits_for_acknowledgement() {
        let mut popup = open_pricing("Medium");
        popup.set_fields(&pricing_input()).unwrap();
        let ticket = popup.begin_submit().unwrap();
        let done = Instant::now();
        popup.complete_submit(&ticket, Ok(DispatchOutcome::Dispatched), done);
        assert!(!popup.tick(done + Duration::from_secs(60)));
        assert_eq!(popup.state(), PopupState::SuccessAck);
    }
}
