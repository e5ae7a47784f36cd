use anyhow::Context;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    meals::repo_types::{Meal, MealChanges, MealRow, NewMeal},
    store::{DateRange, MealAggregate},
    summary::aggregate::NutrientTotals,
};

const MEAL_COLUMNS: &str =
    "id, user_id, meal_name, meal_time, calories, protein, carbs, fat, fiber, date, notes, created_at";

#[derive(Debug, FromRow)]
struct AggregateRow {
    meal_count: i64,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    fiber: f64,
}

fn into_meals(rows: Vec<MealRow>) -> anyhow::Result<Vec<Meal>> {
    rows.into_iter().map(Meal::try_from).collect()
}

/// Meals inside `range`, newest date first. A `None` limit returns everything.
pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
    limit: Option<i64>,
) -> anyhow::Result<Vec<Meal>> {
    let rows = sqlx::query_as::<_, MealRow>(&format!(
        r#"
        SELECT {MEAL_COLUMNS}
          FROM meals
         WHERE user_id = $1
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
         ORDER BY date DESC, created_at DESC
         LIMIT $4
        "#
    ))
    .bind(user_id)
    .bind(range.from)
    .bind(range.to)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("list meals")?;

    into_meals(rows)
}

pub async fn aggregate(
    db: &PgPool,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<MealAggregate> {
    let row = sqlx::query_as::<_, AggregateRow>(
        r#"
        SELECT COUNT(*)                     AS meal_count,
               COALESCE(SUM(calories), 0)   AS calories,
               COALESCE(SUM(protein), 0)    AS protein,
               COALESCE(SUM(carbs), 0)      AS carbs,
               COALESCE(SUM(fat), 0)        AS fat,
               COALESCE(SUM(fiber), 0)      AS fiber
          FROM meals
         WHERE user_id = $1
           AND ($2::date IS NULL OR date >= $2)
           AND ($3::date IS NULL OR date <= $3)
        "#,
    )
    .bind(user_id)
    .bind(range.from)
    .bind(range.to)
    .fetch_one(db)
    .await
    .context("aggregate meals")?;

    Ok(MealAggregate {
        meals_logged: row.meal_count,
        totals: NutrientTotals {
            calories: row.calories,
            protein: row.protein,
            carbs: row.carbs,
            fat: row.fat,
            fiber: row.fiber,
        },
    })
}

pub async fn get(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let row = sqlx::query_as::<_, MealRow>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1 AND user_id = $2"
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get meal")?;

    row.map(Meal::try_from).transpose()
}

pub async fn insert(db: &PgPool, user_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal> {
    let row = sqlx::query_as::<_, MealRow>(&format!(
        r#"
        INSERT INTO meals (id, user_id, meal_name, meal_time, calories, protein, carbs, fat, fiber, date, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&new.meal_name)
    .bind(new.meal_time.as_str())
    .bind(new.calories)
    .bind(new.protein)
    .bind(new.carbs)
    .bind(new.fat)
    .bind(new.fiber)
    .bind(new.date)
    .bind(&new.notes)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
    .context("insert meal")?;

    row.try_into()
}

pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    meal_id: Uuid,
    changes: &MealChanges,
) -> anyhow::Result<Option<Meal>> {
    let row = sqlx::query_as::<_, MealRow>(&format!(
        r#"
        UPDATE meals
           SET meal_name = COALESCE($3, meal_name),
               meal_time = COALESCE($4, meal_time),
               calories  = COALESCE($5, calories),
               protein   = COALESCE($6, protein),
               carbs     = COALESCE($7, carbs),
               fat       = COALESCE($8, fat),
               fiber     = COALESCE($9, fiber),
               date      = COALESCE($10, date),
               notes     = COALESCE($11, notes)
         WHERE id = $1 AND user_id = $2
        RETURNING {MEAL_COLUMNS}
        "#
    ))
    .bind(meal_id)
    .bind(user_id)
    .bind(changes.meal_name.as_deref())
    .bind(changes.meal_time.map(|t| t.as_str()))
    .bind(changes.calories)
    .bind(changes.protein)
    .bind(changes.carbs)
    .bind(changes.fat)
    .bind(changes.fiber)
    .bind(changes.date)
    .bind(changes.notes.as_deref())
    .fetch_optional(db)
    .await
    .context("update meal")?;

    row.map(Meal::try_from).transpose()
}

pub async fn delete(db: &PgPool, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
    let row = sqlx::query_as::<_, MealRow>(&format!(
        "DELETE FROM meals WHERE id = $1 AND user_id = $2 RETURNING {MEAL_COLUMNS}"
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("delete meal")?;

    row.map(Meal::try_from).transpose()
}

pub async fn delete_all_for_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<u64> {
    let done = sqlx::query("DELETE FROM meals WHERE user_id = $1")
        .bind(user_id)
        .execute(db)
        .await
        .context("delete meals for user")?;
    Ok(done.rows_affected())
}
