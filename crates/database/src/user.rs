//! User CRUD operations and the registration gate.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::User;
use crate::validation::{validate_name, MAX_USERNAME_LENGTH};

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, user: &User) -> Result<()> {
    validate_name("username", &user.username, MAX_USERNAME_LENGTH)?;

    sqlx::query(
        r#"
        INSERT INTO users (id, username, registration_accepted)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&user.id)
    .bind(user.username.trim())
    .bind(user.registration_accepted)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: user.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, registration_accepted
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", id))
}

/// Get a user by username.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, registration_accepted
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", username))
}

/// Update an existing user.
pub async fn update_user(pool: &SqlitePool, user: &User) -> Result<()> {
    validate_name("username", &user.username, MAX_USERNAME_LENGTH)?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET username = ?, registration_accepted = ?
        WHERE id = ?
        "#,
    )
    .bind(user.username.trim())
    .bind(user.registration_accepted)
    .bind(&user.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("User", &user.id));
    }

    Ok(())
}

/// Mark a user's registration as accepted.
pub async fn accept_registration(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET registration_accepted = 1
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("User", id));
    }

    tracing::info!(user_id = %id, "Registration accepted");
    Ok(())
}

/// Load a user and refuse them unless their registration was accepted.
///
/// This is the check every screen runs before doing anything else.
pub async fn require_registration_accepted(pool: &SqlitePool, id: &str) -> Result<User> {
    let user = get_user(pool, id).await?;

    if !user.registration_accepted {
        tracing::warn!(user_id = %id, "Refusing user with pending registration");
        return Err(DatabaseError::RegistrationNotAccepted { id: id.to_string() });
    }

    Ok(user)
}

/// Delete a user by ID. Everything the user owns goes with them.
pub async fn delete_user(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("User", id));
    }

    Ok(())
}

/// List all users.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, registration_accepted
        FROM users
        ORDER BY username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
