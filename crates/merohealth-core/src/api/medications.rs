//! Medication and schedule endpoints.
//!
//! A medication is created in two steps, mirroring the backend's flow:
//! the record itself first (name + instructions), then its schedule
//! (dosage, frequency, timing, time of day) as a separate update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

use super::ApiClient;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Medication {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for creating or renaming a medication.
#[derive(Debug, Clone, Serialize)]
pub struct NewMedication {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Dosing frequency, as the backend spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    AsNeeded,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "AS_NEEDED" => Ok(Frequency::AsNeeded),
            other => Err(format!("unknown frequency: {other}")),
        }
    }
}

/// Meal-relative timing of a dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Timing {
    BeforeMeal,
    AfterMeal,
    WithMeal,
    AnyTime,
}

impl std::str::FromStr for Timing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BEFORE_MEAL" => Ok(Timing::BeforeMeal),
            "AFTER_MEAL" => Ok(Timing::AfterMeal),
            "WITH_MEAL" => Ok(Timing::WithMeal),
            "ANY_TIME" => Ok(Timing::AnyTime),
            other => Err(format!("unknown timing: {other}")),
        }
    }
}

/// The recurring dosage/timing configuration for a medication.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MedicationSchedule {
    pub id: i64,
    #[serde(default)]
    pub medication: Option<i64>,
    /// Present when the backend embeds the owning medication (e.g. the
    /// caregiver patient-schedules listing).
    #[serde(default)]
    pub medication_details: Option<Medication>,
    #[serde(default)]
    pub dosage: Option<String>,
    #[serde(default)]
    pub frequency: Option<Frequency>,
    #[serde(default)]
    pub timing: Option<Timing>,
    /// Time of day, `HH:MM:SS`.
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Partial schedule update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<Frequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<Timing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

impl ApiClient {
    /// `GET /medications/`.
    pub async fn list_medications(&self) -> Result<Vec<Medication>> {
        self.get_json("medications/").await
    }

    /// `GET /medications/{id}/`.
    pub async fn get_medication(&self, id: i64) -> Result<Medication> {
        self.get_json(&format!("medications/{id}/")).await
    }

    /// `POST /medications/`.
    pub async fn create_medication(&self, medication: &NewMedication) -> Result<Medication> {
        self.post_json("medications/", serde_json::to_value(medication)?)
            .await
    }

    /// `PUT /medications/{id}/`.
    pub async fn update_medication(
        &self,
        id: i64,
        medication: &NewMedication,
    ) -> Result<Medication> {
        self.put_json(
            &format!("medications/{id}/"),
            serde_json::to_value(medication)?,
        )
        .await
    }

    /// `DELETE /medications/{id}/`.
    pub async fn delete_medication(&self, id: i64) -> Result<()> {
        self.delete_unit(&format!("medications/{id}/")).await
    }

    /// `GET /medications/schedules/{medication_id}/`.
    pub async fn get_schedule(&self, medication_id: i64) -> Result<MedicationSchedule> {
        self.get_json(&format!("medications/schedules/{medication_id}/"))
            .await
    }

    /// `PUT /medications/schedules/{medication_id}/`.
    pub async fn update_schedule(
        &self,
        medication_id: i64,
        update: &ScheduleUpdate,
    ) -> Result<MedicationSchedule> {
        self.put_json(
            &format!("medications/schedules/{medication_id}/"),
            serde_json::to_value(update)?,
        )
        .await
    }

    /// `GET /medications/schedules/patient/?user={id}` -- a caregiver's
    /// view of a linked patient's schedules.
    pub async fn patient_schedules(&self, patient_id: i64) -> Result<Vec<MedicationSchedule>> {
        self.get_json(&format!("medications/schedules/patient/?user={patient_id}"))
            .await
    }
}
