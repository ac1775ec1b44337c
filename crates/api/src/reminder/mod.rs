mod create_reminder;
mod delete_reminder;
mod get_reminder;
mod get_reminder_stats;
mod get_reminders;
mod send_due_reminders;
mod update_reminder;

use actix_web::web;
use create_reminder::create_reminder_controller;
use delete_reminder::delete_reminder_controller;
use get_reminder::get_reminder_controller;
use get_reminder_stats::get_reminder_stats_controller;
use get_reminders::get_reminders_controller;
pub use send_due_reminders::{DueRemindersSummary, SendDueRemindersUseCase};
use update_reminder::update_reminder_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/reminders", web::post().to(create_reminder_controller));
    cfg.route("/reminders", web::get().to(get_reminders_controller));
    cfg.route("/stats", web::get().to(get_reminder_stats_controller));

    cfg.route(
        "/reminders/{reminder_id}",
        web::get().to(get_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::put().to(update_reminder_controller),
    );
    cfg.route(
        "/reminders/{reminder_id}",
        web::delete().to(delete_reminder_controller),
    );
}
