//! Career organizer skills, kept in a per-user order.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::models::Skill;
use crate::ordering::{self, Orderable};
use crate::validation::{validate_name, validate_order, MAX_SKILL_NAME_LENGTH};

impl Orderable for Skill {
    const TABLE: &'static str = "skills";
    const ENTITY: &'static str = "Skill";
}

async fn fetch_skill(conn: &mut SqliteConnection, user_id: &str, id: i64) -> Result<Skill> {
    sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, user_id, name, sort_order, created_at, updated_at
        FROM skills
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Skill", id))
}

/// Create a skill.
///
/// Without an explicit `order` the skill goes to the end of the user's list.
pub async fn create_skill(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    order: Option<i64>,
) -> Result<Skill> {
    validate_name("skill name", name, MAX_SKILL_NAME_LENGTH)?;
    if let Some(order) = order {
        validate_order(order)?;
    }

    let mut tx = pool.begin().await?;

    let order = match order {
        Some(order) => order,
        None => ordering::next_order::<Skill>(&mut tx, user_id).await?,
    };

    let result = sqlx::query(
        r#"
        INSERT INTO skills (user_id, name, sort_order)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(name.trim())
    .bind(order)
    .execute(&mut *tx)
    .await?;

    let skill = fetch_skill(&mut tx, user_id, result.last_insert_rowid()).await?;
    tx.commit().await?;

    tracing::debug!(user_id = %user_id, skill_id = skill.id, order, "Created skill");
    Ok(skill)
}

/// Get one of a user's skills.
pub async fn get_skill(pool: &SqlitePool, user_id: &str, id: i64) -> Result<Skill> {
    let mut conn = pool.acquire().await?;
    fetch_skill(&mut conn, user_id, id).await
}

/// List a user's skills in display order.
pub async fn list_skills(pool: &SqlitePool, user_id: &str) -> Result<Vec<Skill>> {
    let skills = sqlx::query_as::<_, Skill>(
        r#"
        SELECT id, user_id, name, sort_order, created_at, updated_at
        FROM skills
        WHERE user_id = ?
        ORDER BY sort_order, id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(skills)
}

/// Rename a skill. Its position is unchanged.
pub async fn rename_skill(pool: &SqlitePool, user_id: &str, id: i64, name: &str) -> Result<()> {
    validate_name("skill name", name, MAX_SKILL_NAME_LENGTH)?;

    let result = sqlx::query(
        r#"
        UPDATE skills
        SET name = ?, updated_at = datetime('now')
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(name.trim())
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Skill", id));
    }

    Ok(())
}

/// Move a skill one place towards the top. `Ok(false)` if already first.
pub async fn move_skill_up(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    ordering::move_up::<Skill>(pool, user_id, id).await
}

/// Move a skill one place towards the bottom. `Ok(false)` if already last.
pub async fn move_skill_down(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    ordering::move_down::<Skill>(pool, user_id, id).await
}

/// Delete a skill and close the gap it leaves.
pub async fn delete_skill(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    ordering::delete_and_reorder::<Skill>(pool, user_id, id).await
}
