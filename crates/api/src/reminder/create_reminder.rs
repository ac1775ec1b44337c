use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::create_reminder::{APIResponse, RequestBody};
use callme_reminder_domain::{local_to_utc_millis, parse_timezone, InvalidReminderInput, Reminder};
use callme_reminder_infra::CallmeContext;
use chrono::NaiveDateTime;

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        title: body.title,
        message: body.message,
        phone_number: body.phone_number,
        scheduled_at: body.scheduled_at,
        timezone: body.timezone,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

/// Schedules a new `Reminder` for the wall clock time `scheduled_at` in `timezone`
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub title: String,
    pub message: String,
    pub phone_number: String,
    pub scheduled_at: NaiveDateTime,
    pub timezone: String,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidInput(InvalidReminderInput),
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
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
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let timezone = parse_timezone(&self.timezone)?;
        let due_at = local_to_utc_millis(&self.scheduled_at, &timezone)
            .map_err(|e| InvalidReminderInput::LocalTime(e.to_string()))?;

        let reminder = Reminder::new(
            self.title.clone(),
            self.message.clone(),
            self.phone_number.clone(),
            due_at,
            timezone,
            ctx.sys.get_timestamp_millis(),
        )?;

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map(|_| reminder)
            .map_err(|_| UseCaseError::StorageError)
    }
}
