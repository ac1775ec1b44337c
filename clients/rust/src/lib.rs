mod base;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
pub use callme_reminder_api_structs::dtos::*;
pub use callme_reminder_domain::{ReminderStatus, Tz, ID};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, GetRemindersInput, UpdateReminderInput};
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use callme_reminder_api_structs::dtos::ReminderDTO as Reminder;
pub use callme_reminder_api_structs::dtos::ReminderStatsDTO as ReminderStats;

/// CallMe Reminder Server SDK
///
/// The SDK contains methods for interacting with the CallMe Reminder server
/// API.
#[derive(Clone)]
pub struct CallmeSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl CallmeSDK {
    /// `address` is the base url of the api, e.g. `http://localhost:8000/api/v1`
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { reminder, status }
    }
}
