//! Reminder endpoints: fetch, mark-taken, mark-skipped.

use crate::error::Result;
use crate::reminder::Reminder;

use super::ApiClient;

impl ApiClient {
    /// `GET /schedules/reminders/`. Returns the full list; callers replace
    /// their in-memory list wholesale, no incremental diffing.
    pub async fn fetch_reminders(&self) -> Result<Vec<Reminder>> {
        self.get_json("schedules/reminders/").await
    }

    /// `POST /schedules/reminders/{id}/mark-taken/`.
    pub async fn mark_taken(&self, id: i64) -> Result<()> {
        self.post_unit(&format!("schedules/reminders/{id}/mark-taken/"), None)
            .await
    }

    /// `POST /schedules/reminders/{id}/mark-skipped/`.
    pub async fn mark_skipped(&self, id: i64) -> Result<()> {
        self.post_unit(&format!("schedules/reminders/{id}/mark-skipped/"), None)
            .await
    }
}
