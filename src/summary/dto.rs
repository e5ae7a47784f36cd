use serde::{Deserialize, Serialize};
use time::Date;

use crate::summary::aggregate::{NutrientTotals, Period};

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub period: Option<String>,
}

/// Sums in the `total_*` shape returned by `/meals` and `/summary`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MealTotals {
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub total_fiber: f64,
}

impl From<NutrientTotals> for MealTotals {
    fn from(t: NutrientTotals) -> Self {
        Self {
            total_calories: t.calories,
            total_protein: t.protein,
            total_carbs: t.carbs,
            total_fat: t.fat,
            total_fiber: t.fiber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyAverages {
    pub avg_calories: f64,
    pub avg_protein: f64,
    pub avg_carbs: f64,
    pub avg_fat: f64,
    pub avg_fiber: f64,
}

impl From<NutrientTotals> for DailyAverages {
    fn from(t: NutrientTotals) -> Self {
        Self {
            avg_calories: t.calories,
            avg_protein: t.protein,
            avg_carbs: t.carbs,
            avg_fat: t.fat,
            avg_fiber: t.fiber,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryDateRange {
    #[serde(with = "crate::dates::iso_date")]
    pub from: Date,
    #[serde(with = "crate::dates::iso_date")]
    pub to: Date,
    pub days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResponse {
    pub period: Period,
    pub date_range: SummaryDateRange,
    pub meals_logged: i64,
    pub totals: MealTotals,
    pub daily_averages: DailyAverages,
    pub goals: NutrientTotals,
    pub progress_percentage: NutrientTotals,
}
