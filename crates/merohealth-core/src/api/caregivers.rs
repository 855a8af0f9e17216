//! Caregiver linkage endpoints.

use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::ApiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relationship {
    Family,
    Doctor,
    Nurse,
    Caretaker,
    Other,
}

impl std::str::FromStr for Relationship {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "FAMILY" => Ok(Relationship::Family),
            "DOCTOR" => Ok(Relationship::Doctor),
            "NURSE" => Ok(Relationship::Nurse),
            "CARETAKER" => Ok(Relationship::Caretaker),
            "OTHER" => Ok(Relationship::Other),
            other => Err(format!("unknown relationship: {other}")),
        }
    }
}

/// What a linked caregiver is allowed to do with the patient's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PermissionLevel {
    View,
    Manage,
    Full,
}

impl std::str::FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "VIEW" => Ok(PermissionLevel::View),
            "MANAGE" => Ok(PermissionLevel::Manage),
            "FULL" => Ok(PermissionLevel::Full),
            other => Err(format!("unknown permission level: {other}")),
        }
    }
}

/// An established caregiver link, as returned by the backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CaregiverLink {
    pub id: i64,
    #[serde(default)]
    pub caregiver_email: Option<String>,
    #[serde(default)]
    pub caregiver_name: Option<String>,
    #[serde(default)]
    pub relationship: Option<Relationship>,
    #[serde(default)]
    pub permission_level: Option<PermissionLevel>,
    #[serde(default)]
    pub emergency_contact: Option<bool>,
}

/// Payload for `POST /users/caregivers/add/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCaregiverLink {
    pub caregiver_email: String,
    pub relationship: Relationship,
    pub permission_level: PermissionLevel,
    pub emergency_contact: bool,
}

impl ApiClient {
    /// `GET /users/caregivers/`.
    pub async fn list_caregivers(&self) -> Result<Vec<CaregiverLink>> {
        self.get_json("users/caregivers/").await
    }

    /// `POST /users/caregivers/add/`. Links a caregiver by email.
    pub async fn link_caregiver(&self, link: &NewCaregiverLink) -> Result<CaregiverLink> {
        self.post_json("users/caregivers/add/", serde_json::to_value(link)?)
            .await
    }
}
