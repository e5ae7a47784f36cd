use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{
    dates::parse_iso_date,
    error::FieldErrors,
    meals::repo_types::{Meal, MealChanges, MealTime, NewMeal},
    store::DateRange,
    summary::dto::MealTotals,
};

const MAX_DAYS: i64 = 1_000_000;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BAD_DATE: &str =
    "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

pub(crate) fn too_long(max: usize) -> String {
    format!("Ensure this field has no more than {max} characters.")
}

pub(crate) fn bad_choice(value: &str) -> String {
    format!("\"{value}\" is not a valid choice.")
}

/// Body of `POST /meals` and `PUT|PATCH /meals/:id`. Everything is optional at
/// the wire level; [`MealPayload::into_new`] enforces what a create needs.
#[derive(Debug, Default, Deserialize)]
pub struct MealPayload {
    pub meal_name: Option<String>,
    pub meal_time: Option<String>,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

impl MealPayload {
    fn check_name(&self, errors: &mut FieldErrors, required: bool) -> Option<String> {
        match self.meal_name.as_deref().map(str::trim) {
            None if !required => None,
            None | Some("") => {
                errors.add("meal_name", REQUIRED);
                None
            }
            Some(name) if name.chars().count() > 200 => {
                errors.add("meal_name", too_long(200));
                None
            }
            Some(name) => Some(name.to_string()),
        }
    }

    fn check_meal_time(&self, errors: &mut FieldErrors) -> Option<MealTime> {
        let raw = self.meal_time.as_deref()?;
        match raw.parse::<MealTime>() {
            Ok(t) => Some(t),
            Err(_) => {
                errors.add("meal_time", bad_choice(raw));
                None
            }
        }
    }

    fn check_date(&self, errors: &mut FieldErrors) -> Option<Date> {
        let raw = self.date.as_deref()?;
        let parsed = parse_iso_date(raw);
        if parsed.is_none() {
            errors.add("date", BAD_DATE);
        }
        parsed
    }

    pub fn into_new(self, today: Date) -> Result<NewMeal, FieldErrors> {
        let mut errors = FieldErrors::new();
        let meal_name = self.check_name(&mut errors, true);
        let meal_time = self.check_meal_time(&mut errors);
        let date = self.check_date(&mut errors);
        errors.into_result()?;

        Ok(NewMeal {
            meal_name: meal_name.unwrap_or_default(),
            meal_time: meal_time.unwrap_or_default(),
            calories: self.calories.unwrap_or(0.0),
            protein: self.protein.unwrap_or(0.0),
            carbs: self.carbs.unwrap_or(0.0),
            fat: self.fat.unwrap_or(0.0),
            fiber: self.fiber.unwrap_or(0.0),
            date: date.unwrap_or(today),
            notes: self.notes.unwrap_or_default(),
        })
    }

    pub fn into_changes(self) -> Result<MealChanges, FieldErrors> {
        let mut errors = FieldErrors::new();
        let meal_name = self.check_name(&mut errors, false);
        let meal_time = self.check_meal_time(&mut errors);
        let date = self.check_date(&mut errors);
        errors.into_result()?;

        Ok(MealChanges {
            meal_name,
            meal_time,
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
            date,
            notes: self.notes,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct MealListQuery {
    pub days: Option<String>,
}

impl MealListQuery {
    /// Unparsable or missing values fall back to a week.
    pub fn days(&self) -> i64 {
        self.days
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(7)
    }

    /// `[today - days, today]`. A start before the earliest representable
    /// date leaves the window open at the start.
    pub fn range(&self, today: Date) -> DateRange {
        let days = self.days().clamp(-MAX_DAYS, MAX_DAYS);
        DateRange {
            from: today.checked_sub(Duration::days(days)),
            to: Some(today),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub count: usize,
    pub meals: Vec<Meal>,
    pub totals: MealTotals,
}

#[derive(Debug, Serialize)]
pub struct MealSavedResponse {
    pub success: bool,
    pub message: &'static str,
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
}
