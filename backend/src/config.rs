use std::fmt::Display;
use std::num::NonZeroU32;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;

use nonzero_ext::nonzero;
use thiserror::Error;

use crate::offer::DEFAULT_OFFER_DAYS;
use crate::submission::{DeliveryMode, EndpointUrls};

pub const DEFAULT_WHATSAPP_NUMBER: &str = "918660144040";

/// Accepted `OFFER_DURATION_DAYS`, up to ten years.
pub const OFFER_DAYS_RANGE: RangeInclusive<i64> = 1..=3650;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{name} has an invalid value '{value}': {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub environment: String,
    pub frontend_url: String,
    pub form_urls: EndpointUrls,
    pub delivery_mode: DeliveryMode,
    pub whatsapp_number: String,
    /// Where the offer deadline is persisted; kept in memory when unset.
    pub offer_store_path: Option<PathBuf>,
    pub offer_days: i64,
    pub leads_per_hour: NonZeroU32,
    pub sentry_dsn: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = EndpointUrls::default();
        let text = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let form_urls = EndpointUrls {
            consolidated: text("CONSOLIDATED_FORM_URL", &defaults.consolidated),
            demo_desk: text("DEMO_FORM_URL", &defaults.demo_desk),
        };
        for (name, value) in [
            ("CONSOLIDATED_FORM_URL", &form_urls.consolidated),
            ("DEMO_FORM_URL", &form_urls.demo_desk),
        ] {
            url::Url::parse(value).map_err(|e| ConfigError {
                name,
                value: value.clone(),
                reason: e.to_string(),
            })?;
        }

        let offer_days: i64 = parsed(&lookup, "OFFER_DURATION_DAYS", DEFAULT_OFFER_DAYS)?;
        if !OFFER_DAYS_RANGE.contains(&offer_days) {
            return Err(ConfigError {
                name: "OFFER_DURATION_DAYS",
                value: offer_days.to_string(),
                reason: format!(
                    "must be between {} and {}",
                    OFFER_DAYS_RANGE.start(),
                    OFFER_DAYS_RANGE.end()
                ),
            });
        }

        let environment = text("ENVIRONMENT", "development");
        let frontend_url = text("FRONTEND_URL", "http://localhost:8080");
        if is_production_env(&environment) {
            url::Url::parse(&frontend_url).map_err(|e| ConfigError {
                name: "FRONTEND_URL",
                value: frontend_url.clone(),
                reason: e.to_string(),
            })?;
        }

        let leads_per_hour: u32 = parsed(&lookup, "LEADS_PER_HOUR", 5)?;
        let leads_per_hour = NonZeroU32::new(leads_per_hour).unwrap_or(nonzero!(5u32));

        Ok(Self {
            port: parsed(&lookup, "PORT", 3000)?,
            environment,
            frontend_url,
            form_urls,
            delivery_mode: parsed(&lookup, "LEAD_DELIVERY_MODE", DeliveryMode::Opaque)?,
            whatsapp_number: text("WHATSAPP_NUMBER", DEFAULT_WHATSAPP_NUMBER),
            offer_store_path: lookup("OFFER_STORE_PATH")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            offer_days,
            leads_per_hour,
            sentry_dsn: lookup("SENTRY_DSN").filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        is_production_env(&self.environment)
    }
}

fn is_production_env(environment: &str) -> bool {
    environment != "development"
}

fn parsed<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(name).filter(|v| !v.trim().is_empty()) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError {
            name,
            value: value.clone(),
            reason: e.to_string(),
        }),
    }
}
