use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::delete_reminder::{APIResponse, PathParams};
use callme_reminder_domain::{Reminder, ID};
use callme_reminder_infra::CallmeContext;

pub async fn delete_reminder_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let usecase = DeleteReminderUseCase {
        reminder_id: path.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(CallmeError::from)
}

/// Removes a `Reminder` regardless of its status. A reminder deleted while it is
/// being dispatched is not written back when its call resolves.
#[derive(Debug)]
pub struct DeleteReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteReminderUseCase {
    type Response = Reminder;

    type Errors = UseCaseError;

    const NAME: &'static str = "DeleteReminder";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        ctx.repos
            .reminders
            .delete(&self.reminder_id)
            .await
            .ok_or_else(|| UseCaseError::NotFound(self.reminder_id.clone()))
    }
}
