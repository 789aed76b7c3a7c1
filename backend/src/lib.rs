use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod catalog;
pub mod config;
pub mod contact;
pub mod error;
pub mod forms;
pub mod offer;
pub mod popup;
pub mod submission;
pub mod handlers {
    pub mod lead_handlers;
    pub mod popup_handlers;
    pub mod site_handlers;
}

use config::AppConfig;
use handlers::{lead_handlers, popup_handlers, site_handlers};
use offer::{FileOfferStore, MemoryOfferStore, OfferStore, PromoCountdown, SystemClock};
use popup::PopupSessions;
use submission::{LeadTransport, SubmissionAdapter};

/// How often success panels past their auto-close deadline are swept.
pub const POPUP_SWEEP_INTERVAL: Duration = Duration::from_millis(500);

pub struct AppState {
    pub config: AppConfig,
    pub adapter: SubmissionAdapter,
    pub popups: PopupSessions,
    pub offer: PromoCountdown,
    pub lead_limiter: RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>,
}

impl AppState {
    pub fn new(config: AppConfig, transport: Arc<dyn LeadTransport>) -> Self {
        let store: Arc<dyn OfferStore> = match &config.offer_store_path {
            Some(path) => Arc::new(FileOfferStore::new(path)),
            None => Arc::new(MemoryOfferStore::default()),
        };
        Self {
            adapter: SubmissionAdapter::new(transport, config.form_urls.clone()),
            popups: PopupSessions::new(),
            offer: PromoCountdown::new(Arc::new(SystemClock), store, config.offer_days),
            lead_limiter: RateLimiter::keyed(Quota::per_hour(config.leads_per_hour)),
            config,
        }
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let popup_routes = Router::new()
        .route("/api/popups", post(popup_handlers::create_popup))
        .route(
            "/api/popups/{id}",
            get(popup_handlers::get_popup).delete(popup_handlers::delete_popup),
        )
        .route("/api/popups/{id}/fields", put(popup_handlers::update_fields))
        .route("/api/popups/{id}/open", post(popup_handlers::reopen_popup))
        .route("/api/popups/{id}/submit", post(popup_handlers::submit_popup))
        .route("/api/popups/{id}/acknowledge", post(popup_handlers::acknowledge_popup))
        .route("/api/popups/{id}/cancel", post(popup_handlers::cancel_popup));

    Router::new()
        .route("/api/health", get(site_handlers::health_check))
        .route("/api/catalog", get(site_handlers::get_catalog))
        .route("/api/offer", get(site_handlers::get_offer))
        .route("/api/contact/whatsapp", get(site_handlers::get_whatsapp_link))
        .route("/api/forms/{variant}", get(lead_handlers::get_form_schema))
        .route("/api/leads/{variant}", post(lead_handlers::submit_lead))
        .merge(popup_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origin = match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => AllowOrigin::exact(origin),
        Err(_) if config.is_production() => {
            tracing::error!("FRONTEND_URL is not a valid origin, refusing cross-origin requests");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
        Err(_) => {
            tracing::warn!("FRONTEND_URL is not a valid origin, allowing any");
            AllowOrigin::any()
        }
    };
    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(origin)
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN])
        .expose_headers([header::CONTENT_TYPE, header::CONTENT_LENGTH])
}

/// One pass of housekeeping: auto-close due success panels, drop idle
/// sessions and forget limiter keys that are back at full quota.
pub fn sweep(state: &AppState, now: Instant) {
    let closed = state.popups.expire_due(now);
    let evicted = state.popups.evict_idle(now);
    state.lead_limiter.retain_recent();
    if closed > 0 || evicted > 0 {
        tracing::debug!("Auto-closed {} popup(s), evicted {} idle session(s)", closed, evicted);
    }
}

pub fn spawn_popup_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(POPUP_SWEEP_INTERVAL);
        loop {
            interval.tick().await;
            sweep(&state, Instant::now());
        }
    })
}
