use crate::shared::usecase::UseCase;
use callme_reminder_domain::{Reminder, ReminderStatus, ID};
use callme_reminder_infra::{CallRequest, CallmeContext};
use tracing::{error, info};

/// Places a call for every `Reminder` that is due.
///
/// Each due reminder is claimed before its call is placed and the outcome is
/// written back afterwards. A reminder that someone else claimed, edited or
/// deleted in between is skipped, so every reminder is dispatched at most once
/// even when executions overlap.
#[derive(Debug)]
pub struct SendDueRemindersUseCase;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DueRemindersSummary {
    /// Reminders that were due when the store was scanned
    pub due: usize,
    pub completed: usize,
    pub failed: usize,
    /// Claimed, edited or deleted by someone else after the scan
    pub skipped: usize,
    /// Could not be processed because of a storage error
    pub errors: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendDueRemindersUseCase {
    type Response = DueRemindersSummary;

    type Errors = UseCaseError;

    const NAME: &'static str = "SendDueReminders";

    async fn execute(&mut self, ctx: &CallmeContext) -> Result<Self::Response, Self::Errors> {
        let now = ctx.sys.get_timestamp_millis();
        let due_ids = ctx
            .repos
            .reminders
            .find_due_ids(now)
            .await
            .map_err(|e| {
                error!("Unable to look up due reminders: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut summary = DueRemindersSummary {
            due: due_ids.len(),
            ..Default::default()
        };
        if due_ids.is_empty() {
            return Ok(summary);
        }
        info!("Found {} due reminders to process", due_ids.len());

        for reminder_id in &due_ids {
            match send_reminder(reminder_id, ctx).await {
                Ok(Some(reminder)) if reminder.status == ReminderStatus::Completed => {
                    summary.completed += 1
                }
                Ok(Some(_)) => summary.failed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    error!("Unable to process reminder {}: {:?}", reminder_id, e);
                    summary.errors += 1;
                }
            }
        }

        info!(
            "Processed due reminders. Completed: {}, failed: {}, skipped: {}, errors: {}",
            summary.completed, summary.failed, summary.skipped, summary.errors
        );
        Ok(summary)
    }
}

/// Claims, dispatches and resolves a single reminder. Returns `None` if the
/// reminder could not be claimed.
async fn send_reminder(reminder_id: &ID, ctx: &CallmeContext) -> anyhow::Result<Option<Reminder>> {
    let claimed = ctx
        .repos
        .reminders
        .claim(reminder_id, ctx.sys.get_timestamp_millis())
        .await?;
    let mut reminder = match claimed {
        Some(reminder) => reminder,
        None => {
            info!(
                "Reminder {} is no longer scheduled, skipping it",
                reminder_id
            );
            return Ok(None);
        }
    };

    info!("Processing reminder {}: {}", reminder.id, reminder.title);
    let request = CallRequest {
        phone_number: reminder.phone_number.clone(),
        message: reminder.message.clone(),
        title: reminder.title.clone(),
    };

    let res = ctx.dispatcher.place_call(&request).await;
    let now = ctx.sys.get_timestamp_millis();
    match res {
        Ok(call_id) => {
            info!(
                "Reminder {} completed successfully. Call ID: {}",
                reminder.id, call_id
            );
            reminder.complete(call_id, now)?;
        }
        Err(e) => {
            error!("Reminder {} failed: {}", reminder.id, e);
            reminder.fail(e.to_string(), now)?;
        }
    }

    ctx.repos.reminders.resolve(&reminder).await?;
    Ok(Some(reminder))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::shared::test_utils::{
        insert_reminder, setup_context, CountingReminderRepo, MockDispatcher, NOW,
    };
    use crate::shared::usecase::execute;
    use callme_reminder_domain::FAILURE_REASON_MAX_LEN;
    use std::time::Duration;

    const MINUTE: i64 = 1000 * 60;

    #[actix_web::test]
    async fn it_does_nothing_without_due_reminders() {
        let dispatcher = MockDispatcher::succeeding();
        let mut ctx = setup_context(dispatcher.clone());
        insert_reminder(&ctx, "Future", NOW + MINUTE).await;
        let repo = CountingReminderRepo::wrap(&mut ctx);

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary, DueRemindersSummary::default());
        assert_eq!(dispatcher.call_count(), 0);
        assert_eq!(repo.write_count(), 0);

        let stored = ctx.repos.reminders.find_by_query(&Default::default()).await;
        assert_eq!(stored.unwrap().total, 1);
    }

    #[actix_web::test]
    async fn it_leaves_future_reminders_untouched() {
        let dispatcher = MockDispatcher::succeeding();
        let ctx = setup_context(dispatcher.clone());
        let due = insert_reminder(&ctx, "Due", NOW - MINUTE).await;
        let future = insert_reminder(&ctx, "Future", NOW + MINUTE).await;

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.due, 1);
        assert_eq!(summary.completed, 1);

        let due = ctx.repos.reminders.find(&due.id).await.unwrap();
        assert_eq!(due.status, ReminderStatus::Completed);
        let stored_future = ctx.repos.reminders.find(&future.id).await.unwrap();
        assert_eq!(stored_future.status, ReminderStatus::Scheduled);
        assert_eq!(stored_future.updated, future.updated);
        assert_eq!(dispatcher.calls()[0].title, "Due");
    }

    #[actix_web::test]
    async fn it_completes_reminder_with_call_id() {
        let dispatcher = MockDispatcher::succeeding();
        let ctx = setup_context(dispatcher.clone());
        let reminder = insert_reminder(&ctx, "Dentist", NOW).await;

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Completed);
        assert_eq!(stored.call_id, Some("call_123".into()));
        assert!(stored.failure_reason.is_none());

        let calls = dispatcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].phone_number, reminder.phone_number);
        assert_eq!(calls[0].message, reminder.message);
    }

    #[actix_web::test]
    async fn it_claims_reminder_before_placing_call() {
        let dispatcher = MockDispatcher::succeeding();
        let ctx = setup_context(dispatcher.clone());
        let reminder = insert_reminder(&ctx, "Dentist", NOW).await;
        dispatcher.observe_status_during_call(ctx.repos.reminders.clone(), reminder.id.clone());

        execute(SendDueRemindersUseCase, &ctx).await.unwrap();

        assert_eq!(
            dispatcher.observed_statuses(),
            vec![Some(ReminderStatus::InProgress)]
        );
    }

    #[actix_web::test]
    async fn it_fails_reminder_when_call_times_out() {
        let dispatcher = MockDispatcher::timing_out();
        let ctx = setup_context(dispatcher.clone());
        let reminder = insert_reminder(&ctx, "Dentist", NOW).await;

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Failed);
        assert_eq!(stored.failure_reason, Some("Vapi API timeout".into()));
        assert!(stored.call_id.is_none());

        // Failed reminders are not retried
        execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(dispatcher.call_count(), 1);
    }

    #[actix_web::test]
    async fn it_fails_reminder_when_provider_rejects_with_large_body() {
        let body = format!("{{\"error\":\"{}\"}}", "x".repeat(2048));
        let dispatcher = MockDispatcher::rejecting(body);
        let ctx = setup_context(dispatcher.clone());
        let reminder = insert_reminder(&ctx, "Dentist", NOW).await;

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 0);

        let stored = ctx.repos.reminders.find(&reminder.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Failed);
        let reason = stored.failure_reason.unwrap();
        assert!(reason.starts_with("Vapi API error: 502 - {\"error\""));
        assert_eq!(reason.chars().count(), FAILURE_REASON_MAX_LEN);
    }

    #[actix_web::test]
    async fn it_dispatches_each_reminder_once() {
        let dispatcher = MockDispatcher::succeeding();
        let ctx = setup_context(dispatcher.clone());
        for i in 0..3 {
            insert_reminder(&ctx, &format!("Reminder {}", i), NOW - i * MINUTE).await;
        }

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.completed, 3);
        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary, DueRemindersSummary::default());

        let mut titles = dispatcher
            .calls()
            .into_iter()
            .map(|c| c.title)
            .collect::<Vec<_>>();
        // Most overdue first
        assert_eq!(titles, vec!["Reminder 2", "Reminder 1", "Reminder 0"]);
        titles.dedup();
        assert_eq!(titles.len(), 3);
    }

    #[actix_web::test]
    async fn it_dispatches_once_when_executions_overlap() {
        let dispatcher = MockDispatcher::succeeding().with_delay(Duration::from_millis(50));
        let ctx = setup_context(dispatcher.clone());
        for i in 0..4 {
            insert_reminder(&ctx, &format!("Reminder {}", i), NOW - i * MINUTE).await;
        }

        let (first, second) = futures::join!(
            execute(SendDueRemindersUseCase, &ctx),
            execute(SendDueRemindersUseCase, &ctx)
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        assert_eq!(first.completed + second.completed, 4);
        assert_eq!(first.skipped + second.skipped, first.due + second.due - 4);
        assert_eq!(dispatcher.call_count(), 4);
        let stats = ctx.repos.reminders.count_by_status().await.unwrap();
        assert_eq!(stats.completed, 4);
    }

    #[actix_web::test]
    async fn it_never_dispatches_reminders_already_in_progress() {
        let dispatcher = MockDispatcher::succeeding();
        let ctx = setup_context(dispatcher.clone());
        let stuck = insert_reminder(&ctx, "Stuck", NOW - MINUTE).await;
        ctx.repos.reminders.claim(&stuck.id, NOW - MINUTE).await.unwrap();

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.due, 0);
        assert_eq!(dispatcher.call_count(), 0);
        let stored = ctx.repos.reminders.find(&stuck.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::InProgress);
    }

    #[actix_web::test]
    async fn it_skips_reminder_deleted_while_call_is_placed() {
        let dispatcher = MockDispatcher::succeeding().with_delay(Duration::from_millis(50));
        let ctx = setup_context(dispatcher.clone());
        let reminder = insert_reminder(&ctx, "Dentist", NOW).await;

        let repos = ctx.repos.clone();
        let delete = async {
            actix_web::rt::time::sleep(Duration::from_millis(10)).await;
            repos.reminders.delete(&reminder.id).await
        };
        let (summary, deleted) = futures::join!(execute(SendDueRemindersUseCase, &ctx), delete);

        // The call was already placed, but the outcome is not written back
        assert!(deleted.is_some());
        assert_eq!(summary.unwrap().errors, 1);
        assert_eq!(dispatcher.call_count(), 1);
        assert!(ctx.repos.reminders.find(&reminder.id).await.is_none());
    }

    #[actix_web::test]
    async fn it_keeps_processing_after_a_storage_error() {
        let dispatcher = MockDispatcher::succeeding();
        let mut ctx = setup_context(dispatcher.clone());
        let first = insert_reminder(&ctx, "First", NOW - MINUTE).await;
        let second = insert_reminder(&ctx, "Second", NOW).await;
        let repo = CountingReminderRepo::wrap(&mut ctx);
        repo.fail_claim_of(first.id.clone());

        let summary = execute(SendDueRemindersUseCase, &ctx).await.unwrap();
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.completed, 1);

        let stored = ctx.repos.reminders.find(&second.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Completed);
        let stored = ctx.repos.reminders.find(&first.id).await.unwrap();
        assert_eq!(stored.status, ReminderStatus::Scheduled);
        assert_eq!(dispatcher.call_count(), 1);
    }
}
