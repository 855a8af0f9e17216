//! Authenticated HTTP client for the MeroHealth backend.
//!
//! [`client::ApiClient`] owns the request plumbing: bearer-token
//! attachment and the single transparent refresh-and-retry on a 401.
//! Resource modules (`reminders`, `medications`, `caregivers`, `devices`)
//! add typed endpoint wrappers on top of it.

pub mod caregivers;
pub mod client;
pub mod devices;
pub mod medications;
pub mod reminders;
pub mod token;

pub use client::ApiClient;
pub use token::{KeyringTokenStore, MemoryTokenStore, TokenStore, Tokens};
