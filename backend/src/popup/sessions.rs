use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use crate::forms::{FormValues, FormVariant};

use super::controller::{PopupController, PopupError, PopupState, PopupView};

/// Closed popups are kept this long for a possible reopen.
pub const CLOSED_SESSION_TTL: Duration = Duration::from_secs(5 * 60);
/// Any session untouched for this long is dropped.
pub const IDLE_SESSION_TTL: Duration = Duration::from_secs(60 * 60);

struct PopupSession {
    controller: PopupController,
    touched: Instant,
}

/// One popup controller per visitor, addressed by an opaque id.
///
/// Guards are never held across an await: callers run short closures through
/// [`PopupSessions::with`] and do the network work outside.
pub struct PopupSessions {
    sessions: DashMap<Uuid, PopupSession>,
    closed_ttl: Duration,
    idle_ttl: Duration,
}

impl Default for PopupSessions {
    fn default() -> Self {
        Self::with_ttls(CLOSED_SESSION_TTL, IDLE_SESSION_TTL)
    }
}

impl PopupSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttls(closed_ttl: Duration, idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            closed_ttl,
            idle_ttl,
        }
    }

    /// Starts a session with a popup already open for `variant`.
    pub fn create(
        &self,
        variant: FormVariant,
        defaults: &FormValues,
    ) -> Result<(Uuid, PopupView), PopupError> {
        let mut controller = PopupController::new();
        controller.open(variant, defaults)?;
        let id = Uuid::new_v4();
        let view = controller.view();
        self.sessions.insert(id, PopupSession { controller, touched: Instant::now() });
        tracing::debug!("Created popup session {} for {}", id, variant);
        Ok((id, view))
    }

    pub fn with<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut PopupController) -> R,
    ) -> Result<R, PopupError> {
        let mut entry = self.sessions.get_mut(&id).ok_or(PopupError::UnknownSession(id))?;
        let session = entry.value_mut();
        session.touched = Instant::now();
        Ok(f(&mut session.controller))
    }

    pub fn view(&self, id: Uuid) -> Result<PopupView, PopupError> {
        self.with(id, |controller| controller.view())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        self.sessions.remove(&id).is_some()
    }

    /// Closes every success panel whose auto-close deadline has passed.
    pub fn expire_due(&self, now: Instant) -> usize {
        self.sessions
            .iter_mut()
            .filter_map(|mut entry| entry.value_mut().controller.tick(now).then_some(()))
            .count()
    }

    /// Drops closed sessions past the closed TTL and any session past the idle
    /// TTL. A dispatch still running for a dropped session finds it gone.
    pub fn evict_idle(&self, now: Instant) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            let idle = now.saturating_duration_since(session.touched);
            let ttl = if session.controller.state() == PopupState::Closed {
                self.closed_ttl
            } else {
                self.idle_ttl
            };
            idle < ttl
        });
        before.saturating_sub(self.sessions.len())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
