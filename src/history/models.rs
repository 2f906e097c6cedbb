use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::exercises::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryStatus {
    Completed,
    Skipped,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Completed => "Completed",
            EntryStatus::Skipped => "Skipped",
        }
    }
}

/// One finished (or skipped) guided exercise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub category: Category,
    pub status: EntryStatus,
    pub duration_secs: u32,
    pub completed_at: DateTime<Utc>,
}

/// Filter for the history list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub today_completed: u32,
    pub today_skipped: u32,
    pub total_minutes: u32,
    pub streak: u32,
    pub weekly_completed: u32,
}
