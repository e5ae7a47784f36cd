use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::medications::repo_types::{Medication, MedicationChanges, MedicationRow, NewMedication};

const MEDICATION_COLUMNS: &str =
    "id, user_id, drug_name, dosage, frequency, started_date, notes, is_active, created_at, updated_at";

/// Active first, then by drug name. `active` narrows to one status when set.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    active: Option<bool>,
) -> anyhow::Result<Vec<Medication>> {
    let rows = sqlx::query_as::<_, MedicationRow>(&format!(
        r#"
        SELECT {MEDICATION_COLUMNS}
          FROM medications
         WHERE user_id = $1
           AND ($2::boolean IS NULL OR is_active = $2)
         ORDER BY is_active DESC, drug_name ASC
        "#
    ))
    .bind(user_id)
    .bind(active)
    .fetch_all(db)
    .await
    .context("list medications")?;

    rows.into_iter().map(Medication::try_from).collect()
}

pub async fn get(db: &PgPool, user_id: Uuid, med_id: Uuid) -> anyhow::Result<Option<Medication>> {
    let row = sqlx::query_as::<_, MedicationRow>(&format!(
        "SELECT {MEDICATION_COLUMNS} FROM medications WHERE id = $1 AND user_id = $2"
    ))
    .bind(med_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get medication")?;

    row.map(Medication::try_from).transpose()
}

pub async fn insert(db: &PgPool, user_id: Uuid, new: &NewMedication) -> anyhow::Result<Medication> {
    let now = OffsetDateTime::now_utc();
    let row = sqlx::query_as::<_, MedicationRow>(&format!(
        r#"
        INSERT INTO medications (id, user_id, drug_name, dosage, frequency, started_date, notes, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {MEDICATION_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new.drug_name)
    .bind(&new.dosage)
    .bind(new.frequency.as_str())
    .bind(new.started_date)
    .bind(&new.notes)
    .bind(new.is_active)
    .bind(now)
    .fetch_one(db)
    .await
    .context("insert medication")?;

    row.try_into()
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    med_id: Uuid,
    changes: &MedicationChanges,
) -> anyhow::Result<Option<Medication>> {
    let row = sqlx::query_as::<_, MedicationRow>(&format!(
        r#"
        UPDATE medications
           SET drug_name    = COALESCE($3, drug_name),
               dosage       = COALESCE($4, dosage),
               frequency    = COALESCE($5, frequency),
               started_date = COALESCE($6, started_date),
               notes        = COALESCE($7, notes),
               is_active    = COALESCE($8, is_active),
               updated_at   = $9
         WHERE id = $1 AND user_id = $2
        RETURNING {MEDICATION_COLUMNS}
        "#
    ))
    .bind(med_id)
    .bind(user_id)
    .bind(changes.drug_name.as_deref())
    .bind(changes.dosage.as_deref())
    .bind(changes.frequency.map(|f| f.as_str()))
    .bind(changes.started_date)
    .bind(changes.notes.as_deref())
    .bind(changes.is_active)
    .bind(OffsetDateTime::now_utc())
    .fetch_optional(db)
    .await
    .context("update medication")?;

    row.map(Medication::try_from).transpose()
}

pub async fn delete(db: &PgPool, user_id: Uuid, med_id: Uuid) -> anyhow::Result<Option<Medication>> {
    let row = sqlx::query_as::<_, MedicationRow>(&format!(
        "DELETE FROM medications WHERE id = $1 AND user_id = $2 RETURNING {MEDICATION_COLUMNS}"
    ))
    .bind(med_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("delete medication")?;

    row.map(Medication::try_from).transpose()
}

pub async fn delete_all_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM medications WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("delete medications for user")?;
    Ok(done.rows_affected())
}
