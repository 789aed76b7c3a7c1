use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    catalog::{catalog, Catalog},
    contact,
    error::ApiError,
    offer::OfferStatus,
    AppState,
};

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn get_catalog() -> Json<Catalog> {
    Json(catalog())
}

pub async fn get_offer(
    State(state): State<Arc<AppState>>,
) -> Result<Json<OfferStatus>, ApiError> {
    Ok(Json(state.offer.status()?))
}

#[derive(Debug, Deserialize)]
pub struct WhatsAppQuery {
    pub name: Option<String>,
    pub service: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WhatsAppLink {
    pub url: String,
}

pub async fn get_whatsapp_link(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WhatsAppQuery>,
) -> Json<WhatsAppLink> {
    let message = contact::lead_message(query.name.as_deref(), query.service.as_deref());
    Json(WhatsAppLink {
        url: contact::whatsapp_link(&state.config.whatsapp_number, &message),
    })
}
