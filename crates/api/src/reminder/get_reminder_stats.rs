use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::get_reminder_stats::APIResponse;
use callme_reminder_domain::ReminderStats;
use callme_reminder_infra::CallmeContext;

pub async fn get_reminder_stats_controller(
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    execute(GetReminderStatsUseCase {}, &ctx)
        .await
        .map(|stats| HttpResponse::Ok().json(APIResponse::new(stats)))
        .map_err(CallmeError::from)
}

#[derive(Debug)]
pub struct GetReminderStatsUseCase {}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetReminderStatsUseCase {
    type Response = ReminderStats;

    type Errors = UseCaseError;

    const NAME: &'static str = "GetReminderStats";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .reminders
            .count_by_status()
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
