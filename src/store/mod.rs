//! Data access behind a trait so handlers and the responder never see SQL.
//!
//! Every method takes the owning user's id explicitly; lookups by record id
//! return `None` when the record belongs to someone else.

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use crate::{
    chat::repo_types::{ChatMessage, NewChatMessage},
    meals::repo_types::{Meal, MealChanges, NewMeal},
    medications::repo_types::{Medication, MedicationChanges, NewMedication},
    profile::repo_types::{NewProfile, UserProfile},
    summary::aggregate::NutrientTotals,
};

pub mod memory;
pub mod postgres;

/// Inclusive on both ends; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn on(day: Date) -> Self {
        Self::between(day, day)
    }

    pub fn between(from: Date, to: Date) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn contains(&self, day: Date) -> bool {
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MealAggregate {
    pub meals_logged: i64,
    pub totals: NutrientTotals,
}

impl MealAggregate {
    pub fn is_empty(&self) -> bool {
        self.meals_logged == 0
    }
}

#[async_trait]
pub trait HealthStore: Send + Sync {
    async fn get_or_create_profile(&self, new: &NewProfile) -> anyhow::Result<UserProfile>;

    /// Newest date first, ties broken by newest `created_at`.
    async fn list_meals(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Meal>>;
    async fn aggregate_meals(&self, user_id: Uuid, range: DateRange)
        -> anyhow::Result<MealAggregate>;
    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn create_meal(&self, user_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal>;
    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: &MealChanges,
    ) -> anyhow::Result<Option<Meal>>;
    /// Returns the removed meal.
    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>>;
    async fn clear_meals(&self, user_id: Uuid) -> anyhow::Result<u64>;

    /// Active first, then by drug name.
    async fn list_medications(
        &self,
        user_id: Uuid,
        active: Option<bool>,
    ) -> anyhow::Result<Vec<Medication>>;
    async fn get_medication(&self, user_id: Uuid, med_id: Uuid)
        -> anyhow::Result<Option<Medication>>;
    async fn create_medication(
        &self,
        user_id: Uuid,
        new: &NewMedication,
    ) -> anyhow::Result<Medication>;
    async fn update_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
        changes: &MedicationChanges,
    ) -> anyhow::Result<Option<Medication>>;
    async fn delete_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
    ) -> anyhow::Result<Option<Medication>>;
    async fn clear_medications(&self, user_id: Uuid) -> anyhow::Result<u64>;

    async fn append_chat_message(
        &self,
        user_id: Uuid,
        new: &NewChatMessage,
    ) -> anyhow::Result<ChatMessage>;
    /// Newest first.
    async fn chat_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<ChatMessage>>;
    async fn clear_chat_history(&self, user_id: Uuid) -> anyhow::Result<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn ranges_include_both_ends() {
        let r = DateRange::between(date!(2024 - 01 - 10), date!(2024 - 01 - 12));
        assert!(r.contains(date!(2024 - 01 - 10)));
        assert!(r.contains(date!(2024 - 01 - 12)));
        assert!(!r.contains(date!(2024 - 01 - 09)));
        assert!(!r.contains(date!(2024 - 01 - 13)));
        assert!(DateRange::all().contains(date!(1999 - 12 - 31)));
        assert!(DateRange::on(date!(2024 - 01 - 10)).contains(date!(2024 - 01 - 10)));
    }
}
