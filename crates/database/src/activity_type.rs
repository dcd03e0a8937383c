//! Activity types (user-defined categories for activities).

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::ActivityType;
use crate::validation::{validate_name, MAX_ACTIVITY_TYPE_NAME_LENGTH};

/// Create an activity type.
pub async fn create_activity_type(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
) -> Result<ActivityType> {
    validate_name("activity type", name, MAX_ACTIVITY_TYPE_NAME_LENGTH)?;

    let result = sqlx::query(
        r#"
        INSERT INTO activity_types (user_id, name)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .execute(pool)
    .await?;

    Ok(ActivityType {
        id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        name: name.trim().to_string(),
    })
}

/// Get one of a user's activity types.
pub async fn get_activity_type(pool: &SqlitePool, user_id: &str, id: i64) -> Result<ActivityType> {
    sqlx::query_as::<_, ActivityType>(
        r#"
        SELECT id, user_id, name
        FROM activity_types
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("ActivityType", id))
}

/// List a user's activity types by name.
pub async fn list_activity_types(pool: &SqlitePool, user_id: &str) -> Result<Vec<ActivityType>> {
    let types = sqlx::query_as::<_, ActivityType>(
        r#"
        SELECT id, user_id, name
        FROM activity_types
        WHERE user_id = ?
        ORDER BY name, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(types)
}

/// Delete an activity type. Activities of this type are deleted with it.
pub async fn delete_activity_type(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM activity_types
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("ActivityType", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_user};

    #[tokio::test]
    async fn test_activity_type_crud() {
        let db = test_db().await;
        let user = test_user(&db, "u1").await;

        let cleaning = create_activity_type(db.pool(), &user.id, "Cleaning").await.unwrap();
        create_activity_type(db.pool(), &user.id, "Biking").await.unwrap();

        let fetched = get_activity_type(db.pool(), &user.id, cleaning.id).await.unwrap();
        assert_eq!(fetched, cleaning);

        let names: Vec<String> = list_activity_types(db.pool(), &user.id)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Biking", "Cleaning"]);

        delete_activity_type(db.pool(), &user.id, cleaning.id).await.unwrap();
        assert!(matches!(
            get_activity_type(db.pool(), &user.id, cleaning.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_name_length_limit() {
        let db = test_db().await;
        let user = test_user(&db, "u1").await;

        let result = create_activity_type(db.pool(), &user.id, &"x".repeat(51)).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
