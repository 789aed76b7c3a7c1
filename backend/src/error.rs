//! Mapping of domain errors onto the `(status, {"error": ...})` responses handlers return.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::{request::Parts, StatusCode},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::forms::{UnknownVariant, ValidationErrors};
use crate::offer::OfferError;
use crate::popup::controller::DISPATCH_FAILED;
use crate::popup::PopupError;
use crate::submission::TransportError;

pub type ApiError = (StatusCode, Json<Value>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "error": message.into() })))
}

/// `Json` whose rejections use the `{"error": ...}` body like every other failure.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

/// `Path` with the same error body.
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(PathParam(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    tracing::debug!("Rejected request body: {}", rejection.body_text());
    api_error(rejection.status(), rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    api_error(rejection.status(), rejection.body_text())
}

fn invalid_form(errors: &ValidationErrors) -> ApiError {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
            "error": "Please correct the highlighted fields",
            "fields": errors,
        })),
    )
}

impl From<ValidationErrors> for (StatusCode, Json<Value>) {
    fn from(errors: ValidationErrors) -> Self {
        invalid_form(&errors)
    }
}

impl From<TransportError> for (StatusCode, Json<Value>) {
    fn from(e: TransportError) -> Self {
        // Receiver detail stays in the logs; the visitor only gets a coarse message.
        tracing::warn!("Lead dispatch failed: {}", e);
        api_error(StatusCode::BAD_GATEWAY, DISPATCH_FAILED)
    }
}

impl From<PopupError> for (StatusCode, Json<Value>) {
    fn from(e: PopupError) -> Self {
        match e {
            PopupError::Invalid(errors) => invalid_form(&errors),
            PopupError::UnknownSession(_) => api_error(StatusCode::NOT_FOUND, e.to_string()),
            PopupError::AlreadyOpen(_)
            | PopupError::NotOpen
            | PopupError::SubmitInFlight
            | PopupError::NothingToAcknowledge => api_error(StatusCode::CONFLICT, e.to_string()),
        }
    }
}

impl From<UnknownVariant> for (StatusCode, Json<Value>) {
    fn from(e: UnknownVariant) -> Self {
        api_error(StatusCode::NOT_FOUND, e.to_string())
    }
}

impl From<OfferError> for (StatusCode, Json<Value>) {
    fn from(e: OfferError) -> Self {
        tracing::error!("Offer countdown unavailable: {}", e);
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "Offer is unavailable")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn popup_errors_map_to_statuses() {
        let (status, _): ApiError = PopupError::SubmitInFlight.into();
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body): ApiError = PopupError::UnknownSession(Uuid::nil()).into();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("not found"));
    }

    #[test]
    fn validation_errors_carry_field_messages() {
        let mut errors = ValidationErrors::default();
        errors.insert("consent", "You must consent to proceed.");
        let (status, body): ApiError = PopupError::Invalid(errors).into();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["fields"]["consent"], "You must consent to proceed.");
    }

    #[test]
    fn transport_errors_hide_receiver_detail() {
        let (status, body): ApiError = TransportError::Rejected(400).into();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body["error"].as_str().unwrap().contains("400"));
    }
}
