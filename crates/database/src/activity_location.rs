//! Nested activity locations (e.g., "House > Kitchen").

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::ActivityLocation;
use crate::validation::{validate_name, MAX_NAME_LENGTH};

/// Create a location, optionally inside another of the user's locations.
pub async fn create_location(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    parent_location_id: Option<i64>,
) -> Result<ActivityLocation> {
    validate_name("location name", name, MAX_NAME_LENGTH)?;

    if let Some(parent_id) = parent_location_id {
        // Parents must belong to the same user.
        get_location(pool, user_id, parent_id).await?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO activity_locations (user_id, name, parent_location_id)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .bind(parent_location_id)
    .execute(pool)
    .await?;

    Ok(ActivityLocation {
        id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        name: name.trim().to_string(),
        parent_location_id,
    })
}

/// Get one of a user's locations.
pub async fn get_location(pool: &SqlitePool, user_id: &str, id: i64) -> Result<ActivityLocation> {
    sqlx::query_as::<_, ActivityLocation>(
        r#"
        SELECT id, user_id, name, parent_location_id
        FROM activity_locations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("ActivityLocation", id))
}

/// List a user's locations by name.
pub async fn list_locations(pool: &SqlitePool, user_id: &str) -> Result<Vec<ActivityLocation>> {
    let locations = sqlx::query_as::<_, ActivityLocation>(
        r#"
        SELECT id, user_id, name, parent_location_id
        FROM activity_locations
        WHERE user_id = ?
        ORDER BY name, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

/// List a user's top-level locations (those without a parent).
pub async fn list_top_locations(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ActivityLocation>> {
    let locations = sqlx::query_as::<_, ActivityLocation>(
        r#"
        SELECT id, user_id, name, parent_location_id
        FROM activity_locations
        WHERE user_id = ? AND parent_location_id IS NULL
        ORDER BY name, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(locations)
}

/// Names from the outermost ancestor down to the location itself.
async fn lineage(pool: &SqlitePool, user_id: &str, id: i64) -> Result<Vec<String>> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        WITH RECURSIVE lineage(id, name, parent_location_id, depth) AS (
            SELECT id, name, parent_location_id, 0
            FROM activity_locations
            WHERE id = ? AND user_id = ?
            UNION ALL
            SELECT l.id, l.name, l.parent_location_id, lineage.depth + 1
            FROM activity_locations l
            JOIN lineage ON l.id = lineage.parent_location_id
        )
        SELECT name FROM lineage ORDER BY depth DESC
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    if names.is_empty() {
        return Err(DatabaseError::not_found("ActivityLocation", id));
    }

    Ok(names)
}

/// Number of ancestors above a location; top-level locations have depth 0.
pub async fn location_depth(pool: &SqlitePool, user_id: &str, id: i64) -> Result<usize> {
    Ok(lineage(pool, user_id, id).await?.len() - 1)
}

/// Display path such as `"House > Kitchen > Pantry"`.
pub async fn location_path(pool: &SqlitePool, user_id: &str, id: i64) -> Result<String> {
    Ok(lineage(pool, user_id, id).await?.join(" > "))
}

/// Delete a location and every location nested inside it.
pub async fn delete_location(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM activity_locations
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("ActivityLocation", id));
    }

    Ok(())
}
