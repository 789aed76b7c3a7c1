//! Popup lifecycle: which lead form is showing, what it holds, and where its submit stands.

pub mod controller;
pub mod sessions;

pub use controller::{auto_close_delay, PopupController, PopupError, PopupState, PopupView, SubmitTicket};
pub use sessions::PopupSessions;
