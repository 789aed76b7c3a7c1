use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{ApiError, JsonBody, PathParam},
    forms::{FormValues, FormVariant},
    handlers::lead_handlers::check_submission_quota,
    popup::{PopupState, PopupView},
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct OpenPopupRequest {
    pub variant: FormVariant,
    #[serde(default)]
    pub defaults: FormValues,
}

#[derive(Debug, Serialize)]
pub struct PopupResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub popup: PopupView,
}

fn respond(id: Uuid, popup: PopupView) -> Json<PopupResponse> {
    Json(PopupResponse { id, popup })
}

pub async fn create_popup(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<OpenPopupRequest>,
) -> Result<(StatusCode, Json<PopupResponse>), ApiError> {
    let (id, popup) = state.popups.create(request.variant, &request.defaults)?;
    Ok((StatusCode::CREATED, respond(id, popup)))
}

pub async fn get_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<PopupResponse>, ApiError> {
    Ok(respond(id, state.popups.view(id)?))
}

pub async fn reopen_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(request): JsonBody<OpenPopupRequest>,
) -> Result<Json<PopupResponse>, ApiError> {
    let popup = state.popups.with(id, |popup| {
        popup.open(request.variant, &request.defaults).map(|_| popup.view())
    })??;
    Ok(respond(id, popup))
}

pub async fn update_fields(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
    JsonBody(edits): JsonBody<FormValues>,
) -> Result<Json<PopupResponse>, ApiError> {
    let popup = state
        .popups
        .with(id, |popup| popup.set_fields(&edits).map(|_| popup.view()))??;
    Ok(respond(id, popup))
}

/// Validates, then dispatches with no session lock held. Pressing submit again
/// while this runs gets a 409 from the controller.
pub async fn submit_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
) -> Result<(StatusCode, Json<PopupResponse>), ApiError> {
    let ticket = state.popups.with(id, |popup| popup.begin_submit())??;

    if let Err(refused) = check_submission_quota(&state, ticket.lead().text("email")) {
        state.popups.with(id, |popup| popup.abort_submit(&ticket))?;
        return Err(refused);
    }

    let result = state.adapter.submit(ticket.lead()).await;
    let failed = result.is_err();

    let (applied, popup) = state.popups.with(id, |popup| {
        let applied = popup.complete_submit(&ticket, result, Instant::now());
        (applied, popup.view())
    })?;

    if !applied {
        tracing::debug!("Popup {} closed before its submission finished", id);
        return Ok((StatusCode::OK, respond(id, popup)));
    }
    let status = if failed && popup.state == PopupState::Open {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::OK
    };
    Ok((status, respond(id, popup)))
}

pub async fn acknowledge_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<PopupResponse>, ApiError> {
    let popup = state
        .popups
        .with(id, |popup| popup.acknowledge().map(|_| popup.view()))??;
    Ok(respond(id, popup))
}

pub async fn cancel_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
) -> Result<Json<PopupResponse>, ApiError> {
    let popup = state.popups.with(id, |popup| {
        popup.cancel();
        popup.view()
    })?;
    Ok(respond(id, popup))
}

pub async fn delete_popup(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<Uuid>,
) -> StatusCode {
    if state.popups.remove(id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}
