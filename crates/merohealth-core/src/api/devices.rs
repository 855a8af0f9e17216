//! Device push-token registration.
//!
//! Lets the backend target this device for server-side push. The payload
//! keys are camelCase, matching what the backend expects.

use serde::Serialize;

use crate::error::Result;

use super::ApiClient;

/// Payload for `POST /users/devices/`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRegistration {
    pub device_token: String,
    pub device_platform: String,
    pub device_name: String,
    pub device_type: String,
}

impl ApiClient {
    /// Register this device's push token with the backend.
    pub async fn register_device(&self, device: &DeviceRegistration) -> Result<()> {
        self.post_unit("users/devices/", Some(serde_json::to_value(device)?))
            .await
    }
}
