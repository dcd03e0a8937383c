//! Blood pressure readings and their per-user summaries.
//!
//! Readings are append-only: there is no update operation. The summary
//! functions load one user's readings and hand them to [`vitals`].

use sqlx::SqlitePool;
use vitals::{BloodPressureAverages, BloodPressureRange, BloodPressureSummary, Reading};

use crate::error::{DatabaseError, Result};
use crate::models::BloodPressure;
use crate::validation::validate_measurement;

/// Record a new reading for a user.
pub async fn create_reading(
    pool: &SqlitePool,
    user_id: &str,
    systolic: u16,
    diastolic: u16,
    pulse: u16,
) -> Result<BloodPressure> {
    validate_measurement("systolic", systolic)?;
    validate_measurement("diastolic", diastolic)?;
    validate_measurement("pulse", pulse)?;

    let result = sqlx::query(
        r#"
        INSERT INTO blood_pressures (user_id, systolic, diastolic, pulse)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(systolic)
    .bind(diastolic)
    .bind(pulse)
    .execute(pool)
    .await?;

    get_reading(pool, user_id, result.last_insert_rowid()).await
}

/// Get one of a user's readings.
pub async fn get_reading(pool: &SqlitePool, user_id: &str, id: i64) -> Result<BloodPressure> {
    sqlx::query_as::<_, BloodPressure>(
        r#"
        SELECT id, user_id, systolic, diastolic, pulse, created_at
        FROM blood_pressures
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("BloodPressure", id))
}

/// List a user's readings, newest first.
pub async fn list_readings(pool: &SqlitePool, user_id: &str) -> Result<Vec<BloodPressure>> {
    let rows = sqlx::query_as::<_, BloodPressure>(
        r#"
        SELECT id, user_id, systolic, diastolic, pulse, created_at
        FROM blood_pressures
        WHERE user_id = ?
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete one of a user's readings.
pub async fn delete_reading(pool: &SqlitePool, user_id: &str, id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM blood_pressures
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("BloodPressure", id));
    }

    Ok(())
}

async fn readings_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Reading>> {
    let rows = sqlx::query_as::<_, (u16, u16)>(
        r#"
        SELECT systolic, diastolic
        FROM blood_pressures
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(systolic, diastolic)| Reading::new(systolic, diastolic))
        .collect())
}

/// Min/max of a user's readings, `None` when the user has none.
pub async fn range_for_user(pool: &SqlitePool, user_id: &str) -> Result<Option<BloodPressureRange>> {
    let readings = readings_for_user(pool, user_id).await?;
    Ok(vitals::range(&readings))
}

/// Average and median of a user's readings, `None` when the user has none.
pub async fn average_and_median_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<BloodPressureAverages>> {
    let readings = readings_for_user(pool, user_id).await?;
    Ok(vitals::average_and_median(&readings))
}

/// Range and averages together, from a single load.
pub async fn summary_for_user(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Option<BloodPressureSummary>> {
    let readings = readings_for_user(pool, user_id).await?;
    Ok(vitals::summarize(&readings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_user};

    #[tokio::test]
    async fn test_create_and_list() {
        let db = test_db().await;
        let user = test_user(&db, "bp").await;

        let first = create_reading(db.pool(), &user.id, 120, 80, 62).await.unwrap();
        let second = create_reading(db.pool(), &user.id, 118, 79, 60).await.unwrap();
        assert_eq!(first.systolic, 120);
        assert_eq!(first.pulse, 62);
        assert_eq!(first.reading(), Reading::new(120, 80));

        let listed = list_readings(db.pool(), &user.id).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_rejects_zero_measurement() {
        let db = test_db().await;
        let user = test_user(&db, "bp").await;

        let result = create_reading(db.pool(), &user.id, 0, 80, 60).await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(list_readings(db.pool(), &user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readings_are_owner_scoped() {
        let db = test_db().await;
        let alice = test_user(&db, "alice").await;
        let bob = test_user(&db, "bob").await;

        let reading = create_reading(db.pool(), &alice.id, 120, 80, 60).await.unwrap();

        assert!(matches!(
            get_reading(db.pool(), &bob.id, reading.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            delete_reading(db.pool(), &bob.id, reading.id).await,
            Err(DatabaseError::NotFound { .. })
        ));

        delete_reading(db.pool(), &alice.id, reading.id).await.unwrap();
        assert!(list_readings(db.pool(), &alice.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summaries() {
        let db = test_db().await;
        let user = test_user(&db, "stats").await;
        let other = test_user(&db, "other").await;

        for (s, d) in [(120, 80), (110, 70), (115, 75)] {
            create_reading(db.pool(), &user.id, s, d, 60).await.unwrap();
        }
        // Must not leak into the first user's figures.
        create_reading(db.pool(), &other.id, 200, 120, 90).await.unwrap();

        let range = range_for_user(db.pool(), &user.id).await.unwrap().unwrap();
        assert_eq!(
            range,
            BloodPressureRange {
                systolic_min: 110,
                diastolic_min: 70,
                systolic_max: 120,
                diastolic_max: 80,
            }
        );

        let averages = average_and_median_for_user(db.pool(), &user.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(averages.systolic_average, 115.0);
        assert_eq!(averages.diastolic_average, 75.0);
        assert_eq!(averages.systolic_median, 115.0);
        assert_eq!(averages.diastolic_median, 75.0);

        let summary = summary_for_user(db.pool(), &user.id).await.unwrap().unwrap();
        assert_eq!(summary.count, 3);
    }

    #[tokio::test]
    async fn test_summaries_without_readings() {
        let db = test_db().await;
        let user = test_user(&db, "empty").await;

        assert!(range_for_user(db.pool(), &user.id).await.unwrap().is_none());
        assert!(average_and_median_for_user(db.pool(), &user.id)
            .await
            .unwrap()
            .is_none());
        assert!(summary_for_user(db.pool(), &user.id).await.unwrap().is_none());
    }
}
