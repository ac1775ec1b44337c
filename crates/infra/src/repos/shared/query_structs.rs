use callme_reminder_domain::{Reminder, ReminderStatus};

#[derive(Debug, Clone, Default)]
pub struct ReminderQuery {
    /// Only `Reminder`s with this status
    pub status: Option<ReminderStatus>,
    /// Case insensitive substring that must be in either the title or the message
    pub search: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

impl ReminderQuery {
    pub fn matches(&self, reminder: &Reminder) -> bool {
        if let Some(status) = self.status {
            if reminder.status != status {
                return false;
            }
        }
        match self.search.as_deref() {
            Some(search) if !search.is_empty() => {
                let search = search.to_lowercase();
                reminder.title.to_lowercase().contains(&search)
                    || reminder.message.to_lowercase().contains(&search)
            }
            _ => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReminderPage {
    /// Ordered by due time, soonest first
    pub reminders: Vec<Reminder>,
    /// Number of `Reminder`s matching the query, ignoring skip and limit
    pub total: i64,
}

/// Escapes the LIKE wildcards so that the search term is matched literally
pub fn to_like_pattern(search: &str) -> String {
    let escaped = search
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
