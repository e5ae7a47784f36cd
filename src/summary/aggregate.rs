//! Nutrient totals, per-day averages and goal progress over a window of meals.
//!
//! Shared by the chat responder and `/summary`. Everything here except
//! [`aggregate`] is pure arithmetic.

use serde::Serialize;
use time::{Date, Duration};
use uuid::Uuid;

use crate::{
    meals::repo_types::Meal,
    store::{DateRange, HealthStore},
};

/// One value per tracked nutrient. Used for sums, averages, goals and percentages alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub fiber: f64,
}

impl NutrientTotals {
    pub fn add_meal(&mut self, meal: &Meal) {
        self.calories += meal.calories;
        self.protein += meal.protein;
        self.carbs += meal.carbs;
        self.fat += meal.fat;
        self.fiber += meal.fiber;
    }

    pub fn from_meals<'a>(meals: impl IntoIterator<Item = &'a Meal>) -> Self {
        let mut totals = Self::default();
        for meal in meals {
            totals.add_meal(meal);
        }
        totals
    }

    fn zip_with(self, other: Self, f: impl Fn(f64, f64) -> f64) -> Self {
        Self {
            calories: f(self.calories, other.calories),
            protein: f(self.protein, other.protein),
            carbs: f(self.carbs, other.carbs),
            fat: f(self.fat, other.fat),
            fiber: f(self.fiber, other.fiber),
        }
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        self.zip_with(self, |v, _| f(v))
    }
}

/// Sums over the user's meals inside `range`. Zero when nothing matches.
pub async fn aggregate(
    store: &dyn HealthStore,
    user_id: Uuid,
    range: DateRange,
) -> anyhow::Result<NutrientTotals> {
    Ok(store.aggregate_meals(user_id, range).await?.totals)
}

pub fn averages(totals: NutrientTotals, num_days: i64) -> NutrientTotals {
    let days = num_days.max(1) as f64;
    totals.map(|v| v / days)
}

/// `actual / goal * 100`, or 0 for a non-positive goal.
pub fn percentage(actual: f64, goal: f64) -> f64 {
    if goal > 0.0 {
        actual / goal * 100.0
    } else {
        0.0
    }
}

pub fn progress(values: NutrientTotals, goals: NutrientTotals) -> NutrientTotals {
    values.zip_with(goals, percentage)
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalStatus {
    OnTrack,
    Warning,
    Behind,
}

impl GoalStatus {
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= 90.0 {
            GoalStatus::OnTrack
        } else if pct >= 70.0 {
            GoalStatus::Warning
        } else {
            GoalStatus::Behind
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "✅",
            GoalStatus::Warning => "⚠️",
            GoalStatus::Behind => "❌",
        }
    }
}

/// Named window ending today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Today,
    Week,
    Month,
}

impl Period {
    /// Unknown or missing names fall back to `Today`.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("week") => Period::Week,
            Some("month") => Period::Month,
            _ => Period::Today,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Today => "today",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    fn days_back(self) -> i64 {
        match self {
            Period::Today => 0,
            Period::Week => 7,
            Period::Month => 30,
        }
    }

    pub fn start(self, today: Date) -> Date {
        today - Duration::days(self.days_back())
    }

    /// Days covered by the window, both ends counted.
    pub fn num_days(self) -> i64 {
        self.days_back() + 1
    }

    pub fn range(self, today: Date) -> DateRange {
        DateRange::between(self.start(today), today)
    }
}
