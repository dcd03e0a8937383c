//! Database models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A site user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Stable identifier (e.g., a UUID string).
    pub id: String,
    /// Login name, unique across the site.
    pub username: String,
    /// Whether an admin has let this user in.
    pub registration_accepted: bool,
}

/// A blood pressure measurement owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BloodPressure {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Systolic pressure in mmHg.
    pub systolic: u16,
    /// Diastolic pressure in mmHg.
    pub diastolic: u16,
    /// Pulse in beats per minute.
    pub pulse: u16,
    /// Creation timestamp.
    pub created_at: String,
}

impl BloodPressure {
    /// The pressure pair fed to the aggregates.
    pub fn reading(&self) -> vitals::Reading {
        vitals::Reading::new(self.systolic, self.diastolic)
    }
}

/// A career organizer skill, kept in a per-user order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Skill {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Skill name.
    pub name: String,
    /// Position among the owner's skills; lower sorts first.
    #[sqlx(rename = "sort_order")]
    pub order: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A user-defined category of activity (e.g., "Cleaning").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityType {
    pub id: i64,
    pub user_id: String,
    pub name: String,
}

/// A place where activities happen. Locations nest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityLocation {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    /// Enclosing location, if any.
    pub parent_location_id: Option<i64>,
}

/// A thing an activity can target (e.g., "Water filter").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Item {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
}

/// Something to do, optionally due on a date and optionally recurring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Activity {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Activity name.
    pub name: String,
    /// Required [`ActivityType`].
    pub type_id: i64,
    /// Optional [`Item`] the activity acts on.
    pub target_item_id: Option<i64>,
    /// Optional [`ActivityLocation`].
    pub activity_location_id: Option<i64>,
    /// Free-form notes.
    pub description: Option<String>,
    /// When it is due, if ever.
    pub due_date: Option<NaiveDate>,
    /// Whether the activity comes back after completion.
    pub is_recurring: bool,
    /// Date of the most recent completion.
    pub last_completed: Option<NaiveDate>,
}

/// An immutable record of one completion of an [`Activity`].
///
/// The snapshot fields hold the activity's values at completion time and do
/// not follow later edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ActivityInstance {
    /// Auto-incrementing ID.
    pub id: i64,
    /// Owner.
    pub user_id: String,
    /// Originating activity; `None` once that activity is deleted.
    pub activity_id: Option<i64>,
    pub name_snapshot: String,
    pub type_name_snapshot: String,
    /// Target item name, or empty when the activity had none.
    pub target_item_name_snapshot: String,
    /// Location name, or empty when the activity had none.
    pub activity_location_name_snapshot: String,
    /// When the completion happened.
    pub completed_at: DateTime<Utc>,
}
