use crate::reminder::SendDueRemindersUseCase;
use crate::shared::usecase::execute;
use callme_reminder_infra::CallmeContext;
use std::sync::Mutex;
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval, MissedTickBehavior},
};
use tracing::{error, info, warn};

struct RunningJob {
    stop_sender: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Periodically dispatches the `Reminder`s that are due.
///
/// A tick runs to completion before the next one starts, ticks that were
/// missed while a slow tick was running are dropped.
pub struct DueRemindersJob {
    ctx: CallmeContext,
    running: Mutex<Option<RunningJob>>,
}

impl DueRemindersJob {
    pub fn new(ctx: CallmeContext) -> Self {
        Self {
            ctx,
            running: Mutex::new(None),
        }
    }

    /// Starts polling on the current actix runtime. Does nothing if the job
    /// is already running.
    pub fn start(&self) {
        let mut running = match self.running.lock() {
            Ok(running) => running,
            Err(e) => e.into_inner(),
        };
        if running.is_some() {
            warn!("Due reminders job is already running");
            return;
        }

        let (stop_sender, stop_receiver) = watch::channel(false);
        let handle = actix_web::rt::spawn(poll_due_reminders(self.ctx.clone(), stop_receiver));
        *running = Some(RunningJob {
            stop_sender,
            handle,
        });
    }

    pub fn is_running(&self) -> bool {
        match self.running.lock() {
            Ok(running) => running.is_some(),
            Err(e) => e.into_inner().is_some(),
        }
    }

    /// Stops polling. A tick that is in progress is allowed to finish and
    /// this returns once it has.
    pub async fn stop(&self) {
        let running = match self.running.lock() {
            Ok(mut running) => running.take(),
            Err(e) => e.into_inner().take(),
        };
        if let Some(job) = running {
            let _ = job.stop_sender.send(true);
            if let Err(e) = job.handle.await {
                error!("Due reminders job did not shut down cleanly: {:?}", e);
            }
        }
    }
}

async fn poll_due_reminders(ctx: CallmeContext, mut stop: watch::Receiver<bool>) {
    warn_about_stuck_reminders(&ctx).await;
    info!(
        "Polling for due reminders every {} ms",
        ctx.config.poll_interval.as_millis()
    );

    let mut interval = interval(ctx.config.poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = interval.tick() => {
                let _ = execute(SendDueRemindersUseCase, &ctx).await;
            }
        }
    }
    info!("Stopped polling for due reminders");
}

/// Reminders left `InProgress` by a previous run were claimed but never resolved.
/// They are not dispatched again since the call might already have been placed.
async fn warn_about_stuck_reminders(ctx: &CallmeContext) {
    match ctx.repos.reminders.count_by_status().await {
        Ok(stats) if stats.in_progress > 0 => warn!(
            "{} reminders are stuck in progress and will not be dispatched again",
            stats.in_progress
        ),
        Ok(_) => {}
        Err(e) => error!("Unable to count reminders by status: {:?}", e),
    }
}
