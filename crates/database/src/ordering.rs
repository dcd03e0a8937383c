//! Per-user ordering for tables with a `sort_order` column.
//!
//! A table opts in by implementing [`Orderable`]. Rows are ordered by
//! `sort_order` and then by `id`; the values only need to compare, they do
//! not have to be dense or unique. Moves swap `sort_order` with the nearest
//! neighbour of the same owner, and deletes renumber the owner's remaining
//! rows to `0..N-1`. Every multi-row write runs in one transaction.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{DatabaseError, Result};
use crate::validation::{ValidationError, MAX_ORDER};

/// A table of user-owned rows kept in an explicit order.
///
/// The table must have `id INTEGER`, `user_id TEXT` and
/// `sort_order INTEGER` columns.
pub trait Orderable {
    /// Table name. Interpolated into SQL, so it must be a trusted constant.
    const TABLE: &'static str;
    /// Entity name used in [`DatabaseError::NotFound`].
    const ENTITY: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn neighbour_query(self, table: &str) -> String {
        let (cmp, sort) = match self {
            Direction::Up => ("<", "DESC"),
            Direction::Down => (">", "ASC"),
        };
        format!(
            r#"
            SELECT id, sort_order
            FROM {table}
            WHERE user_id = ? AND sort_order {cmp} ?
            ORDER BY sort_order {sort}, id {sort}
            LIMIT 1
            "#
        )
    }
}

/// The order a new row should get so that it sorts last: one past the
/// owner's current maximum, or `0` when the owner has no rows.
pub async fn next_order<T: Orderable>(conn: &mut SqliteConnection, user_id: &str) -> Result<i64> {
    let query = format!(
        "SELECT MAX(sort_order) FROM {table} WHERE user_id = ?",
        table = T::TABLE
    );
    let max = sqlx::query_scalar::<_, Option<i64>>(&query)
        .bind(user_id)
        .fetch_one(conn)
        .await?;

    let max = max.unwrap_or(-1);
    max.checked_add(1)
        .filter(|next| *next <= MAX_ORDER)
        .ok_or_else(|| {
            DatabaseError::Validation(ValidationError::OutOfRange {
                field: "order".to_string(),
                min: 0,
                max: MAX_ORDER,
                actual: max,
            })
        })
}

async fn current_order<T: Orderable>(
    conn: &mut SqliteConnection,
    user_id: &str,
    id: i64,
) -> Result<i64> {
    let query = format!(
        "SELECT sort_order FROM {table} WHERE id = ? AND user_id = ?",
        table = T::TABLE
    );
    sqlx::query_scalar::<_, i64>(&query)
        .bind(id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found(T::ENTITY, id))
}

async fn has_tie<T: Orderable>(
    conn: &mut SqliteConnection,
    user_id: &str,
    id: i64,
    order: i64,
) -> Result<bool> {
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {table} WHERE user_id = ? AND sort_order = ? AND id != ?)",
        table = T::TABLE
    );
    let tied = sqlx::query_scalar::<_, bool>(&query)
        .bind(user_id)
        .bind(order)
        .bind(id)
        .fetch_one(conn)
        .await?;

    Ok(tied)
}

async fn set_order<T: Orderable>(conn: &mut SqliteConnection, id: i64, order: i64) -> Result<()> {
    let query = format!(
        "UPDATE {table} SET sort_order = ? WHERE id = ?",
        table = T::TABLE
    );
    sqlx::query(&query).bind(order).bind(id).execute(conn).await?;
    Ok(())
}

async fn shift<T: Orderable>(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
    direction: Direction,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let mut order = current_order::<T>(&mut tx, user_id, id).await?;

    // Rows sharing an order cannot be told apart by a swap; spread them out
    // first so the display order (sort_order, id) becomes strict.
    if has_tie::<T>(&mut tx, user_id, id, order).await? {
        reorder_all::<T>(&mut tx, user_id).await?;
        order = current_order::<T>(&mut tx, user_id, id).await?;
    }

    let neighbour = sqlx::query_as::<_, (i64, i64)>(&direction.neighbour_query(T::TABLE))
        .bind(user_id)
        .bind(order)
        .fetch_optional(&mut *tx)
        .await?;

    let Some((neighbour_id, neighbour_order)) = neighbour else {
        // Already at the head (or tail). Nothing to write.
        return Ok(false);
    };

    set_order::<T>(&mut tx, id, neighbour_order).await?;
    set_order::<T>(&mut tx, neighbour_id, order).await?;
    tx.commit().await?;

    tracing::debug!(
        entity = T::ENTITY,
        user_id = %user_id,
        id,
        neighbour_id,
        ?direction,
        "Swapped sort order"
    );
    Ok(true)
}

/// Swap a row with the owner's previous row.
///
/// Returns `Ok(false)` when the row is already first. A row that does not
/// exist, or belongs to another user, is [`DatabaseError::NotFound`].
pub async fn move_up<T: Orderable>(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    shift::<T>(pool, user_id, id, Direction::Up).await
}

/// Swap a row with the owner's next row.
///
/// Returns `Ok(false)` when the row is already last.
pub async fn move_down<T: Orderable>(pool: &SqlitePool, user_id: &str, id: i64) -> Result<bool> {
    shift::<T>(pool, user_id, id, Direction::Down).await
}

/// Renumber the owner's rows to `0..N-1`, keeping their relative order.
///
/// Returns the number of rows whose order changed.
pub async fn reorder_all<T: Orderable>(conn: &mut SqliteConnection, user_id: &str) -> Result<u64> {
    let query = format!(
        "SELECT id, sort_order FROM {table} WHERE user_id = ? ORDER BY sort_order, id",
        table = T::TABLE
    );
    let rows = sqlx::query_as::<_, (i64, i64)>(&query)
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;

    let mut changed = 0;
    for (index, (id, order)) in (0_i64..).zip(rows) {
        if order != index {
            set_order::<T>(&mut *conn, id, index).await?;
            changed += 1;
        }
    }

    Ok(changed)
}

/// Delete a row and renumber the owner's remaining rows, atomically.
pub async fn delete_and_reorder<T: Orderable>(
    pool: &SqlitePool,
    user_id: &str,
    id: i64,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    let query = format!(
        "DELETE FROM {table} WHERE id = ? AND user_id = ?",
        table = T::TABLE
    );
    let result = sqlx::query(&query)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found(T::ENTITY, id));
    }

    let changed = reorder_all::<T>(&mut tx, user_id).await?;
    tx.commit().await?;

    tracing::debug!(
        entity = T::ENTITY,
        user_id = %user_id,
        id,
        renumbered = changed,
        "Deleted and renumbered"
    );
    Ok(())
}
