use crate::{APIResponse, BaseClient};
use callme_reminder_api_structs::*;
use callme_reminder_domain::{ReminderStatus, Tz, ID};
use chrono::NaiveDateTime;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub title: String,
    pub message: String,
    /// E.164 formatted, e.g. +14155552671
    pub phone_number: String,
    /// Wall clock time in `timezone`
    pub scheduled_at: NaiveDateTime,
    pub timezone: Tz,
}

#[derive(Default)]
pub struct UpdateReminderInput {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub phone_number: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub timezone: Option<Tz>,
}

#[derive(Default)]
pub struct GetRemindersInput {
    pub status: Option<ReminderStatus>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            title: input.title,
            message: input.message,
            phone_number: input.phone_number,
            scheduled_at: input.scheduled_at,
            timezone: input.timezone.to_string(),
        };
        self.base
            .post(body, "reminders".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, reminder_id: ID) -> APIResponse<get_reminder::APIResponse> {
        self.base
            .get(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn get_many(
        &self,
        input: GetRemindersInput,
    ) -> APIResponse<get_reminders::APIResponse> {
        let query = get_reminders::QueryParams {
            status: input.status,
            search: input.search,
            page: input.page,
            page_size: input.page_size,
        };
        self.base
            .get_with_query("reminders".into(), &query, StatusCode::OK)
            .await
    }

    pub async fn update(
        &self,
        input: UpdateReminderInput,
    ) -> APIResponse<update_reminder::APIResponse> {
        let body = update_reminder::RequestBody {
            title: input.title,
            message: input.message,
            phone_number: input.phone_number,
            scheduled_at: input.scheduled_at,
            timezone: input.timezone.map(|tz| tz.to_string()),
        };
        self.base
            .put(
                body,
                format!("reminders/{}", input.reminder_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, reminder_id: ID) -> APIResponse<delete_reminder::APIResponse> {
        self.base
            .delete(format!("reminders/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn stats(&self) -> APIResponse<get_reminder_stats::APIResponse> {
        self.base.get("stats".into(), StatusCode::OK).await
    }
}
