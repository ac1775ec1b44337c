use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::update_reminder::{APIResponse, PathParams, RequestBody};
use callme_reminder_domain::{
    local_to_utc_millis, parse_timezone, validate_due_at, validate_message,
    validate_phone_number, validate_title, InvalidReminderInput, Reminder, ReminderStatus, ID,
};
use callme_reminder_infra::CallmeContext;
use chrono::NaiveDateTime;

pub async fn update_reminder_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let body = body.0;
    let usecase = UpdateReminderUseCase {
        reminder_id: path.reminder_id.clone(),
        title: body.title,
        message: body.message,
        phone_number: body.phone_number,
        scheduled_at: body.scheduled_at,
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

/// Edits a `Reminder` that has not been picked up for dispatch yet.
///
/// `scheduled_at` is interpreted in the new `timezone` when both are given and in
/// the stored timezone otherwise. Changing only the `timezone` keeps the due time.
#[derive(Debug, Default)]
pub struct UpdateReminderUseCase {
    pub reminder_id: ID,
    pub title: Option<String>,
    pub message: Option<String>,
    pub phone_number: Option<String>,
    pub scheduled_at: Option<NaiveDateTime>,
    pub timezone: Option<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    NotEditable(ReminderStatus),
    InvalidInput(InvalidReminderInput),
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::NotEditable(status) => Self::BadClientData(format!(
                "Can only update scheduled reminders, this reminder is {}",
                status
            )),
            UseCaseError::InvalidInput(e) => Self::BadClientData(e.to_string()),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

impl From<InvalidReminderInput> for UseCaseError {
    fn from(e: InvalidReminderInput) -> Self {
        Self::InvalidInput(e)
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    const NAME: &'static str = "UpdateReminder";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let mut reminder = match ctx.repos.reminders.find(&self.reminder_id).await {
            Some(reminder) => reminder,
            None => return Err(UseCaseError::NotFound(self.reminder_id.clone())),
        };
        if !reminder.is_editable() {
            return Err(UseCaseError::NotEditable(reminder.status));
        }

        let now = ctx.sys.get_timestamp_millis();

        if let Some(title) = &self.title {
            validate_title(title)?;
            reminder.title = title.clone();
        }
        if let Some(message) = &self.message {
            validate_message(message)?;
            reminder.message = message.clone();
        }
        if let Some(phone_number) = &self.phone_number {
            validate_phone_number(phone_number)?;
            reminder.phone_number = phone_number.clone();
        }

        let timezone = match &self.timezone {
            Some(timezone) => parse_timezone(timezone)?,
            None => reminder.timezone,
        };
        if let Some(scheduled_at) = &self.scheduled_at {
            let due_at = local_to_utc_millis(scheduled_at, &timezone)
                .map_err(|e| InvalidReminderInput::LocalTime(e.to_string()))?;
            validate_due_at(due_at, now)?;
            reminder.due_at = due_at;
        }
        reminder.timezone = timezone;
        reminder.updated = now;

        match ctx.repos.reminders.save_scheduled(&reminder).await {
            Ok(true) => Ok(reminder),
            // Claimed by the dispatcher or deleted after it was read
            Ok(false) => match ctx.repos.reminders.find(&self.reminder_id).await {
                Some(current) => Err(UseCaseError::NotEditable(current.status)),
                None => Err(UseCaseError::NotFound(self.reminder_id.clone())),
            },
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}
