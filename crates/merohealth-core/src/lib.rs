//! # MeroHealth Core Library
//!
//! Client-side core for the MeroHealth medication-reminder service. All
//! operations are available through this library; the CLI binary is a
//! thin layer over it.
//!
//! ## Architecture
//!
//! - **API Client**: authenticated HTTP wrapper with a single transparent
//!   token refresh-and-retry on 401
//! - **Reminder Engine**: polling due-detection loop; the caller-driven
//!   tick compares fetched reminders against wall-clock time and a
//!   session-scoped shown-set
//! - **Storage**: SQLite kv state and TOML configuration; tokens live in
//!   the OS keyring
//! - **Notify**: desktop notification with a guaranteed console fallback
//!
//! ## Key Components
//!
//! - [`ApiClient`]: backend endpoints (auth, reminders, medications,
//!   caregivers, devices)
//! - [`ReminderEngine`]: poll loop with optimistic take/skip responses
//! - [`reminder::detector::check_due`]: the pure due-detection scan
//! - [`Config`] / [`Database`]: local configuration and state

pub mod api;
pub mod error;
pub mod notify;
pub mod reminder;
pub mod storage;

pub use api::{ApiClient, KeyringTokenStore, MemoryTokenStore, TokenStore, Tokens};
pub use error::{ApiError, AuthError, ConfigError, CoreError, DatabaseError, NotifyError};
pub use notify::{ConsolePresenter, DesktopNotifier, Presenter, ReminderAction};
pub use reminder::engine::{EngineOptions, ReminderEngine};
pub use reminder::{DueTracker, Reminder, ReminderStatus, ScheduleDetails};
pub use storage::{Config, Database};
