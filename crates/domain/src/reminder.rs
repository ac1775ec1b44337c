use crate::shared::entity::{Entity, ID};
use chrono_tz::Tz;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub const TITLE_MAX_LEN: usize = 255;
pub const MESSAGE_MAX_LEN: usize = 1000;
pub const PHONE_NUMBER_MIN_LEN: usize = 10;
pub const PHONE_NUMBER_MAX_LEN: usize = 20;
pub const TIMEZONE_MAX_LEN: usize = 50;
pub const FAILURE_REASON_MAX_LEN: usize = 1000;

lazy_static::lazy_static! {
    static ref E164_PATTERN: Regex = Regex::new(r"^\+[1-9]\d{1,14}$").unwrap();
}

/// Lifecycle of a `Reminder`.
///
/// The only legal moves are `Scheduled` -> `InProgress` -> `Completed` | `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Scheduled,
    InProgress,
    Completed,
    Failed,
}

#[derive(Error, Debug, PartialEq)]
#[error("Illegal reminder status transition from {from} to {to}")]
pub struct InvalidTransition {
    pub from: ReminderStatus,
    pub to: ReminderStatus,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(&self, next: ReminderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Scheduled, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::InProgress, Self::Failed)
        )
    }

    pub fn transition_to(self, next: ReminderStatus) -> Result<ReminderStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReminderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            _ => Err(format!("Unknown reminder status: {}", s)),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderInput {
    #[error("Title must be between 1 and {} characters", TITLE_MAX_LEN)]
    Title,
    #[error("Message must be between 1 and {} characters", MESSAGE_MAX_LEN)]
    Message,
    #[error("Phone number must be in E.164 format (e.g., +14155552671), got: {0}")]
    PhoneNumber(String),
    #[error("Invalid timezone provided: {0}")]
    Timezone(String),
    #[error("{0}")]
    LocalTime(String),
    #[error("Scheduled time must be in the future")]
    NotInFuture,
}

pub fn validate_phone_number(phone_number: &str) -> Result<(), InvalidReminderInput> {
    let len = phone_number.chars().count();
    if len < PHONE_NUMBER_MIN_LEN
        || len > PHONE_NUMBER_MAX_LEN
        || !E164_PATTERN.is_match(phone_number)
    {
        return Err(InvalidReminderInput::PhoneNumber(phone_number.to_string()));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), InvalidReminderInput> {
    let len = title.chars().count();
    if len == 0 || len > TITLE_MAX_LEN {
        return Err(InvalidReminderInput::Title);
    }
    Ok(())
}

pub fn validate_message(message: &str) -> Result<(), InvalidReminderInput> {
    let len = message.chars().count();
    if len == 0 || len > MESSAGE_MAX_LEN {
        return Err(InvalidReminderInput::Message);
    }
    Ok(())
}

pub fn parse_timezone(timezone: &str) -> Result<Tz, InvalidReminderInput> {
    if timezone.is_empty() || timezone.chars().count() > TIMEZONE_MAX_LEN {
        return Err(InvalidReminderInput::Timezone(timezone.to_string()));
    }
    timezone
        .parse::<Tz>()
        .map_err(|_| InvalidReminderInput::Timezone(timezone.to_string()))
}

pub fn validate_due_at(due_at: i64, now: i64) -> Result<(), InvalidReminderInput> {
    if due_at <= now {
        return Err(InvalidReminderInput::NotInFuture);
    }
    Ok(())
}

fn truncate_chars(mut value: String, max_chars: usize) -> String {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
    value
}

/// A `Reminder` is a message that should be delivered to `phone_number`
/// by an outbound phone call at `due_at`.
#[derive(Debug, Clone)]
pub struct Reminder {
    pub id: ID,
    pub title: String,
    /// Spoken verbatim to the callee
    pub message: String,
    /// E.164 formatted phone number
    pub phone_number: String,
    /// UTC timestamp in millis at which the call should be placed
    pub due_at: i64,
    /// The timezone the user scheduled the `Reminder` in. Only kept for display,
    /// `due_at` is always UTC.
    pub timezone: Tz,
    pub status: ReminderStatus,
    /// Identifier of the call at the voice provider, only set when `Completed`
    pub call_id: Option<String>,
    /// Why the call could not be placed, only set when `Failed`
    pub failure_reason: Option<String>,
    pub created: i64,
    pub updated: i64,
}

impl Reminder {
    pub fn new(
        title: String,
        message: String,
        phone_number: String,
        due_at: i64,
        timezone: Tz,
        now: i64,
    ) -> Result<Self, InvalidReminderInput> {
        validate_title(&title)?;
        validate_message(&message)?;
        validate_phone_number(&phone_number)?;
        validate_due_at(due_at, now)?;

        Ok(Self {
            id: Default::default(),
            title,
            message,
            phone_number,
            due_at,
            timezone,
            status: ReminderStatus::Scheduled,
            call_id: None,
            failure_reason: None,
            created: now,
            updated: now,
        })
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.status == ReminderStatus::Scheduled && self.due_at <= now
    }

    /// Only `Scheduled` reminders can be edited by clients
    pub fn is_editable(&self) -> bool {
        self.status == ReminderStatus::Scheduled
    }

    pub fn claim(&mut self, now: i64) -> Result<(), InvalidTransition> {
        self.status = self.status.transition_to(ReminderStatus::InProgress)?;
        self.updated = now;
        Ok(())
    }

    pub fn complete(&mut self, call_id: String, now: i64) -> Result<(), InvalidTransition> {
        self.status = self.status.transition_to(ReminderStatus::Completed)?;
        self.call_id = Some(call_id);
        self.failure_reason = None;
        self.updated = now;
        Ok(())
    }

    /// Reasons longer than `FAILURE_REASON_MAX_LEN` characters are truncated
    pub fn fail(&mut self, reason: String, now: i64) -> Result<(), InvalidTransition> {
        self.status = self.status.transition_to(ReminderStatus::Failed)?;
        self.failure_reason = Some(truncate_chars(reason, FAILURE_REASON_MAX_LEN));
        self.call_id = None;
        self.updated = now;
        Ok(())
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// Number of `Reminder`s in each status
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderStats {
    pub scheduled: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub failed: i64,
}

impl ReminderStats {
    pub fn total(&self) -> i64 {
        self.scheduled + self.in_progress + self.completed + self.failed
    }

    pub fn add(&mut self, status: ReminderStatus, count: i64) {
        match status {
            ReminderStatus::Scheduled => self.scheduled += count,
            ReminderStatus::InProgress => self.in_progress += count,
            ReminderStatus::Completed => self.completed += count,
            ReminderStatus::Failed => self.failed += count,
        }
    }
}
