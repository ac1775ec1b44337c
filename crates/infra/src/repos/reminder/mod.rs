mod inmemory;
mod postgres;

use crate::repos::shared::query_structs::{ReminderPage, ReminderQuery};
use callme_reminder_domain::{Reminder, ReminderStats, ID};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    /// Ids of all `Scheduled` reminders with `due_at <= now`, soonest first.
    /// This does not modify any reminder.
    async fn find_due_ids(&self, now: i64) -> anyhow::Result<Vec<ID>>;
    /// Moves the reminder from `Scheduled` to `InProgress` in a single atomic write.
    /// Returns `None` if the reminder no longer exists or is not `Scheduled` anymore,
    /// in which case nothing is written.
    async fn claim(&self, reminder_id: &ID, now: i64) -> anyhow::Result<Option<Reminder>>;
    /// Persists the terminal status of a claimed reminder together with
    /// its `call_id` or `failure_reason`
    async fn resolve(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Saves client edits. Returns `false` without writing anything if the stored
    /// reminder is not `Scheduled` anymore.
    async fn save_scheduled(&self, reminder: &Reminder) -> anyhow::Result<bool>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<ReminderPage>;
    async fn count_by_status(&self) -> anyhow::Result<ReminderStats>;
}
