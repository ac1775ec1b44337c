use crate::dtos::{ReminderDTO, ReminderStatsDTO};
use callme_reminder_domain::{Reminder, ReminderStats, ReminderStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

pub mod create_reminder {
    use super::*;
    use crate::shared::deserialize_local_datetime;
    use chrono::NaiveDateTime;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub message: String,
        pub phone_number: String,
        /// Wall clock time in `timezone`
        #[serde(deserialize_with = "deserialize_local_datetime")]
        pub scheduled_at: NaiveDateTime,
        pub timezone: String,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminders {
    use super::*;

    pub const DEFAULT_PAGE_SIZE: usize = 20;
    pub const MAX_PAGE_SIZE: usize = 100;

    #[derive(Deserialize, Serialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default)]
        pub status: Option<ReminderStatus>,
        #[serde(default)]
        pub search: Option<String>,
        #[serde(default)]
        pub page: Option<usize>,
        #[serde(default)]
        pub page_size: Option<usize>,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub items: Vec<ReminderDTO>,
        pub total: i64,
        pub page: usize,
        pub page_size: usize,
        pub total_pages: i64,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>, total: i64, page: usize, page_size: usize) -> Self {
            let page_size_i = page_size as i64;
            Self {
                items: reminders.into_iter().map(ReminderDTO::new).collect(),
                total,
                page,
                page_size,
                total_pages: (total + page_size_i - 1) / page_size_i,
            }
        }
    }
}

pub mod update_reminder {
    use super::*;
    use crate::shared::deserialize_optional_local_datetime;
    use chrono::NaiveDateTime;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default)]
        pub title: Option<String>,
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub phone_number: Option<String>,
        #[serde(default, deserialize_with = "deserialize_optional_local_datetime")]
        pub scheduled_at: Option<NaiveDateTime>,
        #[serde(default)]
        pub timezone: Option<String>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod delete_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder_stats {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub stats: ReminderStatsDTO,
    }

    impl APIResponse {
        pub fn new(stats: ReminderStats) -> Self {
            Self {
                stats: ReminderStatsDTO::new(stats),
            }
        }
    }
}
