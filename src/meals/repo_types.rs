use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    #[default]
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealTime {
    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::Lunch => "lunch",
            MealTime::Dinner => "dinner",
            MealTime::Snack => "snack",
        }
    }

    /// Label used in chat replies.
    pub fn label(self) -> &'static str {
        match self {
            MealTime::Breakfast => "Breakfast",
            MealTime::Lunch => "Lunch",
            MealTime::Dinner => "Dinner",
            MealTime::Snack => "Snack",
        }
    }
}

impl FromStr for MealTime {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealTime::Breakfast),
            "lunch" => Ok(MealTime::Lunch),
            "dinner" => Ok(MealTime::Dinner),
            "snack" => Ok(MealTime::Snack),
            other => anyhow::bail!("unknown meal time {other:?}"),
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meal row as stored in `meals`; `meal_time` is plain text there.
#[derive(Debug, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub meal_name: String,
    pub meal_time: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub date: Date,
    pub notes: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub meal_name: String,
    pub meal_time: MealTime,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    #[serde(with = "crate::dates::iso_date")]
    pub date: Date,
    pub notes: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<MealRow> for Meal {
    type Error = anyhow::Error;

    fn try_from(r: MealRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            meal_name: r.meal_name,
            meal_time: r.meal_time.parse()?,
            calories: r.calories,
            protein: r.protein,
            carbs: r.carbs,
            fat: r.fat,
            fiber: r.fiber,
            date: r.date,
            notes: r.notes,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub meal_name: String,
    pub meal_time: MealTime,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
    pub date: Date,
    pub notes: String,
}

/// Partial update; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealChanges {
    pub meal_name: Option<String>,
    pub meal_time: Option<MealTime>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub date: Option<Date>,
    pub notes: Option<String>,
}

impl MealChanges {
    pub fn apply(&self, meal: &mut Meal) {
        if let Some(v) = &self.meal_name {
            meal.meal_name = v.clone();
        }
        if let Some(v) = self.meal_time {
            meal.meal_time = v;
        }
        if let Some(v) = self.calories {
            meal.calories = v;
        }
        if let Some(v) = self.protein {
            meal.protein = v;
        }
        if let Some(v) = self.carbs {
            meal.carbs = v;
        }
        if let Some(v) = self.fat {
            meal.fat = v;
        }
        if let Some(v) = self.fiber {
            meal.fiber = v;
        }
        if let Some(v) = self.date {
            meal.date = v;
        }
        if let Some(v) = &self.notes {
            meal.notes = v.clone();
        }
    }
}
