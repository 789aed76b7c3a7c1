use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::{
    contact,
    error::{api_error, ApiError, JsonBody, PathParam},
    forms::{validate, FormSchema, FormValues, FormVariant, ValidatedLead},
    submission::DispatchOutcome,
    AppState,
};

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub variant: FormVariant,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_link: Option<String>,
}

pub async fn get_form_schema(
    PathParam(variant): PathParam<String>,
) -> Result<Json<FormSchema>, ApiError> {
    let variant: FormVariant = variant.parse()?;
    Ok(Json(FormSchema::for_variant(variant)))
}

/// One-shot submission without a popup session.
pub async fn submit_lead(
    State(state): State<Arc<AppState>>,
    PathParam(variant): PathParam<String>,
    JsonBody(values): JsonBody<FormValues>,
) -> Result<Json<LeadResponse>, ApiError> {
    let variant: FormVariant = variant.parse()?;
    let lead = validate(variant, &values).map_err(|errors| {
        tracing::debug!("Rejected {} lead with {} invalid field(s)", variant, errors.len());
        errors
    })?;

    check_submission_quota(&state, lead.text("email"))?;

    let outcome = state.adapter.submit(&lead).await?;
    Ok(Json(LeadResponse {
        variant,
        outcome,
        whatsapp_link: follow_up_link(&state, &lead),
    }))
}

/// Per-email limit on submissions that actually leave the service.
pub fn check_submission_quota(state: &AppState, email: &str) -> Result<(), ApiError> {
    let key = email.trim().to_lowercase();
    if state.lead_limiter.check_key(&key).is_err() {
        tracing::warn!("Lead submission rate limit exceeded for [redacted]");
        return Err(api_error(
            StatusCode::TOO_MANY_REQUESTS,
            "Too many submissions, try again later",
        ));
    }
    Ok(())
}

/// Chat link offered after a general enquiry or when WhatsApp was the preferred channel.
pub fn follow_up_link(state: &AppState, lead: &ValidatedLead) -> Option<String> {
    let wants_chat =
        lead.variant() == FormVariant::Basic || lead.text("preferredContact") == "WhatsApp";
    if !wants_chat {
        return None;
    }
    let service = match lead.variant() {
        FormVariant::Basic => lead.text("serviceInterested"),
        FormVariant::DemoRequest => lead.text("demo"),
        FormVariant::PricingPlan => lead.text("planInterested"),
        FormVariant::CareerService => lead.text("interest"),
        FormVariant::CustomQuote | FormVariant::JoinTeam => "",
    };
    let message = contact::lead_message(Some(lead.text("name")), Some(service));
    Some(contact::whatsapp_link(&state.config.whatsapp_number, &message))
}
