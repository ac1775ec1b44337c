use crate::error::CallmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use callme_reminder_api_structs::get_reminders::{
    APIResponse, QueryParams, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use callme_reminder_domain::ReminderStatus;
use callme_reminder_infra::{CallmeContext, ReminderPage, ReminderQuery};

pub async fn get_reminders_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<CallmeContext>,
) -> Result<HttpResponse, CallmeError> {
    let query = query.0;
    let usecase = GetRemindersUseCase {
        status: query.status,
        search: query.search,
        page: query.page.unwrap_or(1),
        page_size: query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    };

    let page = usecase.page;
    let page_size = usecase.page_size;
    execute(usecase, &ctx)
        .await
        .map(|res| {
            HttpResponse::Ok().json(APIResponse::new(res.reminders, res.total, page, page_size))
        })
        .map_err(CallmeError::from)
}

/// Lists `Reminder`s ordered by due time, one page at a time
#[derive(Debug)]
pub struct GetRemindersUseCase {
    pub status: Option<ReminderStatus>,
    pub search: Option<String>,
    /// Starts at 1
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidPage,
    InvalidPageSize,
    StorageError,
}

impl From<UseCaseError> for CallmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidPage => Self::BadClientData("Page must be at least 1".into()),
            UseCaseError::InvalidPageSize => Self::BadClientData(format!(
                "Page size must be between 1 and {}",
                MAX_PAGE_SIZE
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetRemindersUseCase {
    type Response = ReminderPage;

    type Errors = UseCaseError;

    const NAME: &'static str = "GetReminders";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        if self.page == 0 {
            return Err(UseCaseError::InvalidPage);
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(UseCaseError::InvalidPageSize);
        }

        let query = ReminderQuery {
            status: self.status,
            search: self
                .search
                .as_ref()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            skip: (self.page - 1).saturating_mul(self.page_size),
            limit: self.page_size,
        };

        ctx.repos
            .reminders
            .find_by_query(&query)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
