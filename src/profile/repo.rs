use anyhow::Context;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::profile::repo_types::{NewProfile, UserProfile, UserProfileRow};

/// Insert the profile unless its email is already taken; either way return the stored row.
pub async fn get_or_create(db: &PgPool, new: &NewProfile) -> anyhow::Result<UserProfile> {
    let row = sqlx::query_as::<_, UserProfileRow>(
        r#"
        INSERT INTO user_profiles (
            id, email, name, age,
            daily_calorie_goal, daily_protein_goal, daily_carbs_goal,
            daily_fat_goal, daily_fiber_goal, health_conditions
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
        RETURNING id, email, name, age,
                  daily_calorie_goal, daily_protein_goal, daily_carbs_goal,
                  daily_fat_goal, daily_fiber_goal, health_conditions, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&new.email)
    .bind(&new.name)
    .bind(new.age)
    .bind(new.goals.calories)
    .bind(new.goals.protein)
    .bind(new.goals.carbs)
    .bind(new.goals.fat)
    .bind(new.goals.fiber)
    .bind(Json(&new.health_conditions))
    .fetch_one(db)
    .await
    .context("get or create profile")?;

    Ok(row.into())
}
