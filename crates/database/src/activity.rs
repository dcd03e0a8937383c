//! Plan-it activities and their completion history.
//!
//! Completing an activity writes an [`ActivityInstance`] that copies the
//! activity's current names, then stamps the activity's `last_completed`
//! date. Both writes share one transaction.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::{Activity, ActivityInstance};
use crate::validation::{validate_name, MAX_NAME_LENGTH};
use crate::{activity_location, activity_type, item};

/// Editable fields of an activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActivity {
    pub name: String,
    pub type_id: i64,
    pub target_item_id: Option<i64>,
    pub activity_location_id: Option<i64>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub is_recurring: bool,
}

/// Where an activity's due date falls relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueStatus {
    /// No due date.
    None,
    Overdue,
    Today,
    Upcoming,
}

impl DueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DueStatus::None => "none",
            DueStatus::Overdue => "overdue",
            DueStatus::Today => "today",
            DueStatus::Upcoming => "upcoming",
        }
    }
}

impl Activity {
    /// Classify the due date against `today`.
    pub fn due_status(&self, today: NaiveDate) -> DueStatus {
        match self.due_date {
            None => DueStatus::None,
            Some(due) if due < today => DueStatus::Overdue,
            Some(due) if due == today => DueStatus::Today,
            Some(_) => DueStatus::Upcoming,
        }
    }
}

const ACTIVITY_COLUMNS: &str = "id, user_id, name, type_id, target_item_id, \
    activity_location_id, description, due_date, is_recurring, last_completed";

const INSTANCE_COLUMNS: &str = "id, user_id, activity_id, name_snapshot, type_name_snapshot, \
    target_item_name_snapshot, activity_location_name_snapshot, completed_at";

/// Reject references to rows the user does not own.
async fn check_references(pool: &SqlitePool, user_id: &str, fields: &NewActivity) -> Result<()> {
    validate_name("activity name", &fields.name, MAX_NAME_LENGTH)?;

    activity_type::get_activity_type(pool, user_id, fields.type_id).await?;
    if let Some(item_id) = fields.target_item_id {
        item::get_item(pool, user_id, item_id).await?;
    }
    if let Some(location_id) = fields.activity_location_id {
        activity_location::get_location(pool, user_id, location_id).await?;
    }

    Ok(())
}

/// Create an activity.
pub async fn create_activity(
    pool: &SqlitePool,
    user_id: &str,
    fields: &NewActivity,
) -> Result<Activity> {
    check_references(pool, user_id, fields).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO activities
            (user_id, name, type_id, target_item_id, activity_location_id,
             description, due_date, is_recurring)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(fields.name.trim())
    .bind(fields.type_id)
    .bind(fields.target_item_id)
    .bind(fields.activity_location_id)
    .bind(&fields.description)
    .bind(fields.due_date)
    .bind(fields.is_recurring)
    .execute(pool)
    .await?;

    get_activity(pool, user_id, result.last_insert_rowid()).await
}

/// Get one of a user's activities.
pub async fn get_activity(pool: &SqlitePool, user_id: &str, id: i64) -> Result<Activity> {
    let query = format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE id = ? AND user_id = ?");
    sqlx::query_as::<_, Activity>(&query)
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Activity", id))
}

/// Replace an activity's editable fields. `last_completed` is left alone.
pub async fn update_activity(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    fields: &NewActivity,
) -> Result<Activity> {
    check_references(pool, user_id, fields).await?;

    let result = sqlx::query(
        r#"
        UPDATE activities
        SET name = ?, type_id = ?, target_item_id = ?, activity_location_id = ?,
            description = ?, due_date = ?, is_recurring = ?
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(fields.name.trim())
    .bind(fields.type_id)
    .bind(fields.target_item_id)
    .bind(fields.activity_location_id)
    .bind(&fields.description)
    .bind(fields.due_date)
    .bind(fields.is_recurring)
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Activity", id));
    }

    get_activity(pool, user_id, id).await
}

/// List a user's activities by due date; undated activities come last.
pub async fn list_activities(pool: &SqlitePool, user_id: &str) -> Result<Vec<Activity>> {
    let query = format!(
        "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE user_id = ? \
         ORDER BY due_date IS NULL, due_date, id"
    );
    let activities = sqlx::query_as::<_, Activity>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(activities)
}

/// Delete an activity. Its completion history is kept, detached.
pub async fn delete_activity(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM activities
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Activity", id));
    }

    Ok(())
}

/// The names copied into a completion snapshot.
#[derive(sqlx::FromRow)]
struct Snapshot {
    name: String,
    type_name: String,
    target_item_name: String,
    activity_location_name: String,
}

async fn load_snapshot(
    conn: &mut SqliteConnection,
    user_id: &str,
    activity_id: i64,
) -> Result<Snapshot> {
    sqlx::query_as::<_, Snapshot>(
        r#"
        SELECT a.name AS name,
               t.name AS type_name,
               COALESCE(i.name, '') AS target_item_name,
               COALESCE(l.name, '') AS activity_location_name
        FROM activities a
        JOIN activity_types t ON t.id = a.type_id
        LEFT JOIN items i ON i.id = a.target_item_id
        LEFT JOIN activity_locations l ON l.id = a.activity_location_id
        WHERE a.id = ? AND a.user_id = ?
        "#,
    )
    .bind(activity_id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Activity", activity_id))
}

/// Mark an activity completed now.
///
/// See [`record_completion_at`].
pub async fn record_completion(
    pool: &SqlitePool,
    activity_id: i64,
    user_id: &str,
) -> Result<ActivityInstance> {
    record_completion_at(pool, activity_id, user_id, Utc::now()).await
}

/// Mark an activity completed at `completed_at`.
///
/// Creates an [`ActivityInstance`] holding the activity's name, type name,
/// target item name (or `""`) and location name (or `""`), owned by
/// `user_id`, and sets the activity's `last_completed` to the date part of
/// `completed_at`. Either both writes happen or neither does.
pub async fn record_completion_at(
    pool: &SqlitePool,
    activity_id: i64,
    user_id: &str,
    completed_at: DateTime<Utc>,
) -> Result<ActivityInstance> {
    let mut tx = pool.begin().await?;

    let snapshot = load_snapshot(&mut tx, user_id, activity_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO activity_instances
            (user_id, activity_id, name_snapshot, type_name_snapshot,
             target_item_name_snapshot, activity_location_name_snapshot, completed_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(activity_id)
    .bind(&snapshot.name)
    .bind(&snapshot.type_name)
    .bind(&snapshot.target_item_name)
    .bind(&snapshot.activity_location_name)
    .bind(completed_at)
    .execute(&mut *tx)
    .await?;
    let instance_id = result.last_insert_rowid();

    let last_completed = completed_at.date_naive();
    sqlx::query(
        r#"
        UPDATE activities
        SET last_completed = ?
        WHERE id = ?
        "#,
    )
    .bind(last_completed)
    .bind(activity_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        user_id = %user_id,
        activity_id,
        instance_id,
        %last_completed,
        "Recorded activity completion"
    );

    Ok(ActivityInstance {
        id: instance_id,
        user_id: user_id.to_string(),
        activity_id: Some(activity_id),
        name_snapshot: snapshot.name,
        type_name_snapshot: snapshot.type_name,
        target_item_name_snapshot: snapshot.target_item_name,
        activity_location_name_snapshot: snapshot.activity_location_name,
        completed_at,
    })
}

/// List a user's completions, newest first.
pub async fn list_instances(pool: &SqlitePool, user_id: &str) -> Result<Vec<ActivityInstance>> {
    let query = format!(
        "SELECT {INSTANCE_COLUMNS} FROM activity_instances WHERE user_id = ? \
         ORDER BY completed_at DESC, id DESC"
    );
    let instances = sqlx::query_as::<_, ActivityInstance>(&query)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(instances)
}

/// The user's `limit` most recent completions.
pub async fn recent_completions(
    pool: &SqlitePool,
    user_id: &str,
    limit: u32,
) -> Result<Vec<ActivityInstance>> {
    let query = format!(
        "SELECT {INSTANCE_COLUMNS} FROM activity_instances WHERE user_id = ? \
         ORDER BY completed_at DESC, id DESC LIMIT ?"
    );
    let instances = sqlx::query_as::<_, ActivityInstance>(&query)
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(instances)
}
