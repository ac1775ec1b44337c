use callme_reminder_domain::{Reminder, ReminderStats, ReminderStatus, ID};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

fn to_datetime(timestamp_millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_default()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub title: String,
    pub message: String,
    pub phone_number: String,
    /// When the call is placed, always UTC
    pub scheduled_at: DateTime<Utc>,
    pub timezone: String,
    pub status: ReminderStatus,
    pub call_id: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            title: reminder.title,
            message: reminder.message,
            phone_number: reminder.phone_number,
            scheduled_at: to_datetime(reminder.due_at),
            timezone: reminder.timezone.to_string(),
            status: reminder.status,
            call_id: reminder.call_id,
            failure_reason: reminder.failure_reason,
            created_at: to_datetime(reminder.created),
            updated_at: to_datetime(reminder.updated),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderStatsDTO {
    pub total: i64,
    pub scheduled: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub failed: i64,
}

impl ReminderStatsDTO {
    pub fn new(stats: ReminderStats) -> Self {
        Self {
            total: stats.total(),
            scheduled: stats.scheduled,
            in_progress: stats.in_progress,
            completed: stats.completed,
            failed: stats.failed,
        }
    }
}
