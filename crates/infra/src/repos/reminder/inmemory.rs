use super::IReminderRepo;
use crate::repos::shared::{
    inmemory_repo::*,
    query_structs::{ReminderPage, ReminderQuery},
};
use callme_reminder_domain::{Reminder, ReminderStats, ReminderStatus, ID};
use std::sync::Mutex;

pub struct InMemoryReminderRepo {
    reminders: Mutex<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn sorted_by_due_at(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    reminders.sort_by_key(|r| r.due_at);
    reminders
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders);
        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_due_ids(&self, now: i64) -> anyhow::Result<Vec<ID>> {
        let due = find_by(&self.reminders, |r| r.is_due(now));
        Ok(sorted_by_due_at(due).into_iter().map(|r| r.id).collect())
    }

    async fn claim(&self, reminder_id: &ID, now: i64) -> anyhow::Result<Option<Reminder>> {
        let claimed = update(reminder_id, &self.reminders, |r| {
            r.claim(now).ok().map(|_| r.clone())
        });
        Ok(claimed.flatten())
    }

    async fn resolve(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let res = update(&reminder.id, &self.reminders, |stored| {
            if stored.status != ReminderStatus::InProgress || !reminder.status.is_terminal() {
                return Err(anyhow::anyhow!(
                    "Reminder: {} can not be resolved from status {} to {}",
                    reminder.id,
                    stored.status,
                    reminder.status
                ));
            }
            *stored = reminder.clone();
            Ok(())
        });
        res.unwrap_or_else(|| Err(anyhow::anyhow!("Reminder: {} not found", reminder.id)))
    }

    async fn save_scheduled(&self, reminder: &Reminder) -> anyhow::Result<bool> {
        let saved = update(&reminder.id, &self.reminders, |stored| {
            if !stored.is_editable() {
                return false;
            }
            *stored = reminder.clone();
            true
        });
        Ok(saved.unwrap_or(false))
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }

    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<ReminderPage> {
        let matching = sorted_by_due_at(find_by(&self.reminders, |r| query.matches(r)));
        let total = matching.len() as i64;
        let reminders = matching
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect();
        Ok(ReminderPage { reminders, total })
    }

    async fn count_by_status(&self) -> anyhow::Result<ReminderStats> {
        let reminders = self.reminders.lock().unwrap();
        let mut stats = ReminderStats::default();
        for reminder in reminders.iter() {
            stats.add(reminder.status, 1);
        }
        Ok(stats)
    }
}
