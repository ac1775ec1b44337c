use super::IReminderRepo;
use crate::repos::shared::query_structs::{to_like_pattern, ReminderPage, ReminderQuery};
use callme_reminder_domain::{Reminder, ReminderStats, ReminderStatus, ID};
use sqlx::{types::Uuid, FromRow, PgPool};
use std::convert::TryFrom;
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    reminder_uid: Uuid,
    title: String,
    message: String,
    phone_number: String,
    due_at: i64,
    timezone: String,
    status: String,
    call_id: Option<String>,
    failure_reason: Option<String>,
    created: i64,
    updated: i64,
}

impl TryFrom<ReminderRaw> for Reminder {
    type Error = anyhow::Error;

    fn try_from(raw: ReminderRaw) -> Result<Self, Self::Error> {
        let status = raw
            .status
            .parse::<ReminderStatus>()
            .map_err(anyhow::Error::msg)?;
        Ok(Reminder {
            id: raw.reminder_uid.into(),
            title: raw.title,
            message: raw.message,
            phone_number: raw.phone_number,
            due_at: raw.due_at,
            timezone: raw.timezone.parse().unwrap_or(chrono_tz::UTC),
            status,
            call_id: raw.call_id,
            failure_reason: raw.failure_reason,
            created: raw.created,
            updated: raw.updated,
        })
    }
}

fn into_reminders(rows: Vec<ReminderRaw>) -> anyhow::Result<Vec<Reminder>> {
    rows.into_iter().map(Reminder::try_from).collect()
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reminders
            (reminder_uid, title, message, phone_number, due_at, timezone, status, call_id, failure_reason, created, updated)
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(&reminder.phone_number)
        .bind(reminder.due_at)
        .bind(reminder.timezone.to_string())
        .bind(reminder.status.as_str())
        .bind(&reminder.call_id)
        .bind(&reminder.failure_reason)
        .bind(reminder.created)
        .bind(reminder.updated)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE r.reminder_uid = $1
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to find reminder: {}. Error: {:?}", reminder_id, e);
        })
        .ok()??;

        Reminder::try_from(raw)
            .map_err(|e| {
                error!("Malformed reminder: {}. Error: {:?}", reminder_id, e);
            })
            .ok()
    }

    async fn find_due_ids(&self, now: i64) -> anyhow::Result<Vec<ID>> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT r.reminder_uid FROM reminders AS r
            WHERE r.status = $1 AND r.due_at <= $2
            ORDER BY r.due_at ASC
            "#,
        )
        .bind(ReminderStatus::Scheduled.as_str())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id.into()).collect())
    }

    async fn claim(&self, reminder_id: &ID, now: i64) -> anyhow::Result<Option<Reminder>> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET status = $2,
            updated = $3
            WHERE reminder_uid = $1 AND status = $4
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .bind(ReminderStatus::InProgress.as_str())
        .bind(now)
        .bind(ReminderStatus::Scheduled.as_str())
        .fetch_optional(&self.pool)
        .await?;

        raw.map(Reminder::try_from).transpose()
    }

    async fn resolve(&self, reminder: &Reminder) -> anyhow::Result<()> {
        if !reminder.status.is_terminal() {
            return Err(anyhow::anyhow!(
                "Reminder: {} can not be resolved to status {}",
                reminder.id,
                reminder.status
            ));
        }
        let rows_affected = sqlx::query(
            r#"
            UPDATE reminders
            SET status = $2,
            call_id = $3,
            failure_reason = $4,
            updated = $5
            WHERE reminder_uid = $1 AND status = $6
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(reminder.status.as_str())
        .bind(&reminder.call_id)
        .bind(&reminder.failure_reason)
        .bind(reminder.updated)
        .bind(ReminderStatus::InProgress.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(anyhow::anyhow!(
                "Reminder: {} is not in progress anymore",
                reminder.id
            ));
        }
        Ok(())
    }

    async fn save_scheduled(&self, reminder: &Reminder) -> anyhow::Result<bool> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE reminders
            SET title = $2,
            message = $3,
            phone_number = $4,
            due_at = $5,
            timezone = $6,
            updated = $7
            WHERE reminder_uid = $1 AND status = $8
            "#,
        )
        .bind(reminder.id.inner_ref())
        .bind(&reminder.title)
        .bind(&reminder.message)
        .bind(&reminder.phone_number)
        .bind(reminder.due_at)
        .bind(reminder.timezone.to_string())
        .bind(reminder.updated)
        .bind(ReminderStatus::Scheduled.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(rows_affected == 1)
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        let raw = sqlx::query_as::<_, ReminderRaw>(
            r#"
            DELETE FROM reminders AS r
            WHERE r.reminder_uid = $1
            RETURNING *
            "#,
        )
        .bind(reminder_id.inner_ref())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to delete reminder: {}. Error: {:?}", reminder_id, e);
        })
        .ok()??;

        Reminder::try_from(raw).ok()
    }

    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<ReminderPage> {
        let status = query.status.map(|s| s.as_str());
        let search = query
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(to_like_pattern);

        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM reminders AS r
            WHERE ($1::text IS NULL OR r.status = $1)
            AND ($2::text IS NULL OR r.title ILIKE $2 OR r.message ILIKE $2)
            "#,
        )
        .bind(status)
        .bind(&search)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders AS r
            WHERE ($1::text IS NULL OR r.status = $1)
            AND ($2::text IS NULL OR r.title ILIKE $2 OR r.message ILIKE $2)
            ORDER BY r.due_at ASC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(status)
        .bind(&search)
        .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(query.skip).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(ReminderPage {
            reminders: into_reminders(rows)?,
            total,
        })
    }

    async fn count_by_status(&self) -> anyhow::Result<ReminderStats> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT r.status, COUNT(*) FROM reminders AS r
            GROUP BY r.status
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut stats = ReminderStats::default();
        for (status, count) in rows {
            let status = status.parse::<ReminderStatus>().map_err(anyhow::Error::msg)?;
            stats.add(status, count);
        }
        Ok(stats)
    }
}
