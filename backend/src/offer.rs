//! Promotional countdown shown by the offer banner.
//!
//! The end time is fixed the first time anyone asks for it and persisted, so
//! every later read (and every restart) sees the same deadline.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_OFFER_DAYS: i64 = 27;

#[derive(Debug, Error)]
pub enum OfferError {
    #[error("Failed to access offer store: {0}")]
    Io(#[from] std::io::Error),
    #[error("Offer store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Offer store lock poisoned")]
    Poisoned,
    #[error("Offer of {0} day(s) ends outside the representable date range")]
    OutOfRange(i64),
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub trait OfferStore: Send + Sync {
    fn load(&self) -> Result<Option<DateTime<Utc>>, OfferError>;
    fn save(&self, ends_at: DateTime<Utc>) -> Result<(), OfferError>;
}

#[derive(Default)]
pub struct MemoryOfferStore {
    ends_at: Mutex<Option<DateTime<Utc>>>,
}

impl OfferStore for MemoryOfferStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>, OfferError> {
        self.ends_at.lock().map(|guard| *guard).map_err(|_| OfferError::Poisoned)
    }

    fn save(&self, ends_at: DateTime<Utc>) -> Result<(), OfferError> {
        let mut guard = self.ends_at.lock().map_err(|_| OfferError::Poisoned)?;
        *guard = Some(ends_at);
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct StoredOffer {
    ends_at: DateTime<Utc>,
}

/// Keeps the deadline in a small JSON file.
pub struct FileOfferStore {
    path: PathBuf,
}

impl FileOfferStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OfferStore for FileOfferStore {
    fn load(&self) -> Result<Option<DateTime<Utc>>, OfferError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let stored: StoredOffer = serde_json::from_str(&contents)?;
                Ok(Some(stored.ends_at))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, ends_at: DateTime<Utc>) -> Result<(), OfferError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string(&StoredOffer { ends_at })?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OfferStatus {
    pub ends_at: DateTime<Utc>,
    pub remaining_secs: i64,
    /// `DD:HH:MM:SS`
    pub remaining: String,
    pub active: bool,
}

pub struct PromoCountdown {
    clock: Arc<dyn Clock>,
    store: Arc<dyn OfferStore>,
    days: i64,
    // Serializes first-use initialization.
    init: Mutex<()>,
}

impl PromoCountdown {
    pub fn new(clock: Arc<dyn Clock>, store: Arc<dyn OfferStore>, days: i64) -> Self {
        Self {
            clock,
            store,
            days,
            init: Mutex::new(()),
        }
    }

    /// The offer deadline, created and persisted on first use.
    pub fn ends_at(&self) -> Result<DateTime<Utc>, OfferError> {
        let _guard = self.init.lock().map_err(|_| OfferError::Poisoned)?;
        if let Some(ends_at) = self.store.load()? {
            return Ok(ends_at);
        }
        let ends_at = Duration::try_days(self.days)
            .and_then(|duration| self.clock.now().checked_add_signed(duration))
            .ok_or(OfferError::OutOfRange(self.days))?;
        self.store.save(ends_at)?;
        tracing::info!("Promotional offer started, ends at {}", ends_at);
        Ok(ends_at)
    }

    pub fn status(&self) -> Result<OfferStatus, OfferError> {
        let ends_at = self.ends_at()?;
        let remaining_secs = (ends_at - self.clock.now()).num_seconds().max(0);
        Ok(OfferStatus {
            ends_at,
            remaining_secs,
            remaining: format_remaining(remaining_secs),
            active: remaining_secs > 0,
        })
    }
}

pub fn format_remaining(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let days = seconds / (24 * 3600);
    let hours = (seconds % (24 * 3600)) / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}:{:02}", days, hours, minutes, secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct FixedClock(Mutex<DateTime<Utc>>);

    impl FixedClock {
        fn at(time: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self(Mutex::new(time)))
        }

        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().unwrap();
            *now = *now + by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn first_read_initializes_and_later_reads_are_stable() {
        let clock = FixedClock::at(start());
        let store = Arc::new(MemoryOfferStore::default());
        let countdown = PromoCountdown::new(clock.clone(), store.clone(), DEFAULT_OFFER_DAYS);

        let first = countdown.ends_at().unwrap();
        assert_eq!(first, start() + Duration::days(27));
        clock.advance(Duration::hours(5));
        assert_eq!(countdown.ends_at().unwrap(), first);
        assert_eq!(store.load().unwrap(), Some(first));
    }

    #[test]
    fn status_counts_down_and_clamps_at_zero() {
        let clock = FixedClock::at(start());
        let countdown =
            PromoCountdown::new(clock.clone(), Arc::new(MemoryOfferStore::default()), 1);

        let status = countdown.status().unwrap();
        assert_eq!(status.remaining, "01:00:00:00");
        assert!(status.active);

        clock.advance(Duration::seconds(86400 - 3661));
        assert_eq!(countdown.status().unwrap().remaining, "00:01:01:01");

        clock.advance(Duration::days(3));
        let expired = countdown.status().unwrap();
        assert_eq!(expired.remaining_secs, 0);
        assert!(!expired.active);
    }

    #[test]
    fn file_store_survives_a_new_countdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("offer.json");
        let clock = FixedClock::at(start());

        let first = PromoCountdown::new(clock.clone(), Arc::new(FileOfferStore::new(&path)), 27)
            .ends_at()
            .unwrap();
        clock.advance(Duration::days(2));
        let second = PromoCountdown::new(clock.clone(), Arc::new(FileOfferStore::new(&path)), 27)
            .ends_at()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("offer.json");
        std::fs::write(&path, "not json").unwrap();
        let store = FileOfferStore::new(&path);
        assert!(matches!(store.load(), Err(OfferError::Corrupt(_))));
    }

    #[test]
    fn overflowing_duration_is_an_error_not_a_panic() {
        let clock = FixedClock::at(start());
        let store = Arc::new(MemoryOfferStore::default());
        let countdown = PromoCountdown::new(clock.clone(), store.clone(), 1_000_000_000);

        assert!(matches!(countdown.status(), Err(OfferError::OutOfRange(1_000_000_000))));
        // Nothing was persisted and the init lock is still usable.
        assert!(matches!(countdown.ends_at(), Err(OfferError::OutOfRange(_))));
        assert_eq!(store.load().unwrap(), None);

        let huge = PromoCountdown::new(clock, store, i64::MAX);
        assert!(matches!(huge.ends_at(), Err(OfferError::OutOfRange(i64::MAX))));
    }

    #[test]
    fn formats_days_hours_minutes_seconds() {
        assert_eq!(format_remaining(0), "00:00:00:00");
        assert_eq!(format_remaining(27 * 86400), "27:00:00:00");
        assert_eq!(format_remaining(90061), "01:01:01:01");
        assert_eq!(format_remaining(-5), "00:00:00:00");
    }
}
