use serde::Serialize;
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::summary::aggregate::NutrientTotals;

/// Profile row as stored in `user_profiles`.
#[derive(Debug, FromRow)]
pub struct UserProfileRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub daily_calorie_goal: f64,
    pub daily_protein_goal: f64,
    pub daily_carbs_goal: f64,
    pub daily_fat_goal: f64,
    pub daily_fiber_goal: f64,
    pub health_conditions: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub daily_calorie_goal: f64,
    pub daily_protein_goal: f64,
    pub daily_carbs_goal: f64,
    pub daily_fat_goal: f64,
    pub daily_fiber_goal: f64,
    pub health_conditions: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl UserProfile {
    /// Daily goals laid out like meal totals so they can be compared field by field.
    pub fn goals(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.daily_calorie_goal,
            protein: self.daily_protein_goal,
            carbs: self.daily_carbs_goal,
            fat: self.daily_fat_goal,
            fiber: self.daily_fiber_goal,
        }
    }
}

impl From<UserProfileRow> for UserProfile {
    fn from(r: UserProfileRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            name: r.name,
            age: r.age,
            daily_calorie_goal: r.daily_calorie_goal,
            daily_protein_goal: r.daily_protein_goal,
            daily_carbs_goal: r.daily_carbs_goal,
            daily_fat_goal: r.daily_fat_goal,
            daily_fiber_goal: r.daily_fiber_goal,
            health_conditions: r.health_conditions.0,
            created_at: r.created_at,
        }
    }
}

/// Values used when the profile does not exist yet.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub name: String,
    pub age: Option<i32>,
    pub goals: NutrientTotals,
    pub health_conditions: Vec<String>,
}

impl NewProfile {
    pub fn demo(email: &str, name: &str, age: Option<i32>) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            age,
            goals: NutrientTotals {
                calories: 2000.0,
                protein: 150.0,
                carbs: 250.0,
                fat: 65.0,
                fiber: 30.0,
            },
            health_conditions: Vec::new(),
        }
    }
}
