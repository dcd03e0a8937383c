//! Items that activities can target.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Item;
use crate::validation::{validate_name, MAX_NAME_LENGTH};

/// Create an item.
pub async fn create_item(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<Item> {
    validate_name("item name", name, MAX_NAME_LENGTH)?;

    let result = sqlx::query(
        r#"
        INSERT INTO items (user_id, name, description)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .bind(description)
    .execute(pool)
    .await?;

    Ok(Item {
        id: result.last_insert_rowid(),
        user_id: user_id.to_string(),
        name: name.trim().to_string(),
        description: description.map(str::to_string),
    })
}

/// Get one of a user's items.
pub async fn get_item(pool: &SqlitePool, user_id: &str, id: i64) -> Result<Item> {
    sqlx::query_as::<_, Item>(
        r#"
        SELECT id, user_id, name, description
        FROM items
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Item", id))
}

/// List a user's items by name.
pub async fn list_items(pool: &SqlitePool, user_id: &str) -> Result<Vec<Item>> {
    let items = sqlx::query_as::<_, Item>(
        r#"
        SELECT id, user_id, name, description
        FROM items
        WHERE user_id = ?
        ORDER BY name, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(items)
}

/// Delete an item. Activities targeting it are deleted with it.
pub async fn delete_item(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM items
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Item", id));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_user};

    #[tokio::test]
    async fn test_item_crud() {
        let db = test_db().await;
        let user = test_user(&db, "u1").await;

        let filter = create_item(db.pool(), &user.id, "Water filter", Some("Under the sink"))
            .await
            .unwrap();
        let fetched = get_item(db.pool(), &user.id, filter.id).await.unwrap();
        assert_eq!(fetched.description.as_deref(), Some("Under the sink"));

        assert_eq!(list_items(db.pool(), &user.id).await.unwrap().len(), 1);
        assert!(list_items(db.pool(), "someone-else").await.unwrap().is_empty());

        delete_item(db.pool(), &user.id, filter.id).await.unwrap();
        assert!(matches!(
            delete_item(db.pool(), &user.id, filter.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }
}
