mod date;
mod reminder;
mod shared;

pub use chrono_tz::Tz;
pub use date::{local_to_utc_millis, LocalTimeError};
pub use reminder::{
    parse_timezone, validate_due_at, validate_message, validate_phone_number, validate_title,
    InvalidReminderInput, InvalidTransition, Reminder, ReminderStats, ReminderStatus,
    FAILURE_REASON_MAX_LEN,
};
pub use shared::entity::{Entity, InvalidIDError, ID};
