//! Process-local store. Used when `STORE_BACKEND=memory` and by tests.
//!
//! Records live in insertion order; listings are sorted on the way out with
//! the same keys the SQL queries use.

use std::cmp::Reverse;

use anyhow::anyhow;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    chat::repo_types::{ChatMessage, NewChatMessage},
    meals::repo_types::{Meal, MealChanges, NewMeal},
    medications::repo_types::{Medication, MedicationChanges, NewMedication},
    profile::repo_types::{NewProfile, UserProfile},
    store::{DateRange, HealthStore, MealAggregate},
    summary::aggregate::NutrientTotals,
};

#[derive(Default)]
struct Inner {
    profiles: Vec<UserProfile>,
    meals: Vec<Meal>,
    medications: Vec<Medication>,
    chat: Vec<ChatMessage>,
}

impl Inner {
    fn ensure_user(&self, user_id: Uuid) -> anyhow::Result<()> {
        if self.profiles.iter().any(|p| p.id == user_id) {
            Ok(())
        } else {
            Err(anyhow!("unknown user {user_id}"))
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn seed_profile(&self) -> UserProfile {
        self.get_or_create_profile(&NewProfile::demo("demo@test.local", "Test User", Some(30)))
            .await
            .expect("seed profile")
    }
}

fn remove_where<T>(items: &mut Vec<T>, keep: impl Fn(&T) -> bool) -> u64 {
    let before = items.len();
    items.retain(keep);
    (before - items.len()) as u64
}

#[async_trait]
impl HealthStore for MemoryStore {
    async fn get_or_create_profile(&self, new: &NewProfile) -> anyhow::Result<UserProfile> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.profiles.iter().find(|p| p.email == new.email) {
            return Ok(existing.clone());
        }
        let profile = UserProfile {
            id: Uuid::new_v4(),
            email: new.email.clone(),
            name: new.name.clone(),
            age: new.age,
            daily_calorie_goal: new.goals.calories,
            daily_protein_goal: new.goals.protein,
            daily_carbs_goal: new.goals.carbs,
            daily_fat_goal: new.goals.fat,
            daily_fiber_goal: new.goals.fiber,
            health_conditions: new.health_conditions.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.profiles.push(profile.clone());
        Ok(profile)
    }

    async fn list_meals(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Meal>> {
        let inner = self.inner.read().await;
        let mut meals: Vec<Meal> = inner
            .meals
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id && range.contains(m.date))
            .cloned()
            .collect();
        meals.sort_by_key(|m| Reverse((m.date, m.created_at)));
        if let Some(limit) = limit {
            meals.truncate(limit.max(0) as usize);
        }
        Ok(meals)
    }

    async fn aggregate_meals(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> anyhow::Result<MealAggregate> {
        let inner = self.inner.read().await;
        let matching: Vec<&Meal> = inner
            .meals
            .iter()
            .filter(|m| m.user_id == user_id && range.contains(m.date))
            .collect();
        Ok(MealAggregate {
            meals_logged: matching.len() as i64,
            totals: NutrientTotals::from_meals(matching),
        })
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let inner = self.inner.read().await;
        Ok(inner
            .meals
            .iter()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .cloned())
    }

    async fn create_meal(&self, user_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(user_id)?;
        let meal = Meal {
            id: Uuid::new_v4(),
            user_id,
            meal_name: new.meal_name.clone(),
            meal_time: new.meal_time,
            calories: new.calories,
            protein: new.protein,
            carbs: new.carbs,
            fat: new.fat,
            fiber: new.fiber,
            date: new.date,
            notes: new.notes.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.meals.push(meal.clone());
        Ok(meal)
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: &MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .meals
            .iter_mut()
            .find(|m| m.id == meal_id && m.user_id == user_id)
            .map(|m| {
                changes.apply(m);
                m.clone()
            }))
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        let mut inner = self.inner.write().await;
        let pos = inner
            .meals
            .iter()
            .position(|m| m.id == meal_id && m.user_id == user_id);
        Ok(pos.map(|i| inner.meals.remove(i)))
    }

    async fn clear_meals(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(remove_where(&mut inner.meals, |m| m.user_id != user_id))
    }

    async fn list_medications(
        &self,
        user_id: Uuid,
        active: Option<bool>,
    ) -> anyhow::Result<Vec<Medication>> {
        let inner = self.inner.read().await;
        let mut meds: Vec<Medication> = inner
            .medications
            .iter()
            .filter(|m| m.user_id == user_id && active.map_or(true, |a| m.is_active == a))
            .cloned()
            .collect();
        meds.sort_by(|a, b| {
            b.is_active
                .cmp(&a.is_active)
                .then_with(|| a.drug_name.cmp(&b.drug_name))
        });
        Ok(meds)
    }

    async fn get_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
    ) -> anyhow::Result<Option<Medication>> {
        let inner = self.inner.read().await;
        Ok(inner
            .medications
            .iter()
            .find(|m| m.id == med_id && m.user_id == user_id)
            .cloned())
    }

    async fn create_medication(
        &self,
        user_id: Uuid,
        new: &NewMedication,
    ) -> anyhow::Result<Medication> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(user_id)?;
        let now = OffsetDateTime::now_utc();
        let med = Medication {
            id: Uuid::new_v4(),
            user_id,
            drug_name: new.drug_name.clone(),
            dosage: new.dosage.clone(),
            frequency: new.frequency,
            started_date: new.started_date,
            notes: new.notes.clone(),
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        inner.medications.push(med.clone());
        Ok(med)
    }

    async fn update_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
        changes: &MedicationChanges,
    ) -> anyhow::Result<Option<Medication>> {
        let mut inner = self.inner.write().await;
        let now = OffsetDateTime::now_utc();
        Ok(inner
            .medications
            .iter_mut()
            .find(|m| m.id == med_id && m.user_id == user_id)
            .map(|m| {
                changes.apply(m, now);
                m.clone()
            }))
    }

    async fn delete_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
    ) -> anyhow::Result<Option<Medication>> {
        let mut inner = self.inner.write().await;
        let pos = inner
            .medications
            .iter()
            .position(|m| m.id == med_id && m.user_id == user_id);
        Ok(pos.map(|i| inner.medications.remove(i)))
    }

    async fn clear_medications(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(remove_where(&mut inner.medications, |m| m.user_id != user_id))
    }

    async fn append_chat_message(
        &self,
        user_id: Uuid,
        new: &NewChatMessage,
    ) -> anyhow::Result<ChatMessage> {
        let mut inner = self.inner.write().await;
        inner.ensure_user(user_id)?;
        let msg = ChatMessage {
            id: Uuid::new_v4(),
            user_id,
            user_message: new.user_message.clone(),
            bot_response: new.bot_response.clone(),
            query_type: new.query_type.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        inner.chat.push(msg.clone());
        Ok(msg)
    }

    async fn chat_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<ChatMessage>> {
        let inner = self.inner.read().await;
        let mut history: Vec<ChatMessage> = inner
            .chat
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by_key(|m| Reverse(m.created_at));
        history.truncate(limit.max(0) as usize);
        Ok(history)
    }

    async fn clear_chat_history(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let mut inner = self.inner.write().await;
        Ok(remove_where(&mut inner.chat, |m| m.user_id != user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{meals::repo_types::MealTime, medications::repo_types::Frequency};
    use time::macros::date;

    fn meal(name: &str, date: time::Date, calories: f64) -> NewMeal {
        NewMeal {
            meal_name: name.into(),
            meal_time: MealTime::Lunch,
            calories,
            protein: 10.0,
            carbs: 0.0,
            fat: 0.0,
            fiber: 0.0,
            date,
            notes: String::new(),
        }
    }

    fn med(name: &str, active: bool) -> NewMedication {
        NewMedication {
            drug_name: name.into(),
            dosage: "10mg".into(),
            frequency: Frequency::OnceDaily,
            started_date: date!(2024 - 01 - 01),
            notes: String::new(),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn profile_is_created_once_per_email() {
        let store = MemoryStore::new();
        let a = store.seed_profile().await;
        let b = store.seed_profile().await;
        assert_eq!(a.id, b.id);
        assert_eq!(a.daily_calorie_goal, 2000.0);
    }

    #[tokio::test]
    async fn writes_for_unknown_users_fail() {
        let store = MemoryStore::new();
        let err = store
            .create_meal(Uuid::new_v4(), &meal("Toast", date!(2024 - 01 - 01), 100.0))
            .await;
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn meals_list_newest_first_within_range() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_meal(user.id, &meal("Old", date!(2024 - 01 - 01), 100.0)).await.unwrap();
        store.create_meal(user.id, &meal("First", date!(2024 - 01 - 05), 100.0)).await.unwrap();
        store.create_meal(user.id, &meal("Second", date!(2024 - 01 - 05), 100.0)).await.unwrap();

        let all = store.list_meals(user.id, DateRange::all(), None).await.unwrap();
        let names: Vec<_> = all.iter().map(|m| m.meal_name.as_str()).collect();
        assert_eq!(names, ["Second", "First", "Old"]);

        let recent = store
            .list_meals(user.id, DateRange::on(date!(2024 - 01 - 05)), Some(1))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].meal_name, "Second");
    }

    #[tokio::test]
    async fn aggregate_counts_and_sums() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_meal(user.id, &meal("A", date!(2024 - 01 - 05), 200.0)).await.unwrap();
        store.create_meal(user.id, &meal("B", date!(2024 - 01 - 06), 150.0)).await.unwrap();

        let agg = store
            .aggregate_meals(user.id, DateRange::on(date!(2024 - 01 - 05)))
            .await
            .unwrap();
        assert_eq!(agg.meals_logged, 1);
        assert_eq!(agg.totals.calories, 200.0);

        let none = store
            .aggregate_meals(user.id, DateRange::on(date!(2023 - 01 - 01)))
            .await
            .unwrap();
        assert!(none.is_empty());
        assert_eq!(none.totals, NutrientTotals::default());
    }

    #[tokio::test]
    async fn records_are_scoped_to_their_owner() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let other = store
            .get_or_create_profile(&NewProfile::demo("other@test.local", "Other", None))
            .await
            .unwrap();
        let m = store.create_meal(user.id, &meal("Mine", date!(2024 - 01 - 05), 1.0)).await.unwrap();

        assert!(store.get_meal(other.id, m.id).await.unwrap().is_none());
        assert!(store.delete_meal(other.id, m.id).await.unwrap().is_none());
        assert_eq!(store.clear_meals(other.id).await.unwrap(), 0);
        assert!(store.get_meal(user.id, m.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn medications_sort_active_first_then_by_name() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        store.create_medication(user.id, &med("Zinc", true)).await.unwrap();
        store.create_medication(user.id, &med("Aspirin", false)).await.unwrap();
        store.create_medication(user.id, &med("Metformin", true)).await.unwrap();

        let all = store.list_medications(user.id, None).await.unwrap();
        let names: Vec<_> = all.iter().map(|m| m.drug_name.as_str()).collect();
        assert_eq!(names, ["Metformin", "Zinc", "Aspirin"]);

        let inactive = store.list_medications(user.id, Some(false)).await.unwrap();
        assert_eq!(inactive.len(), 1);
        assert_eq!(inactive[0].drug_name, "Aspirin");
    }

    #[tokio::test]
    async fn medication_update_touches_updated_at() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        let created = store.create_medication(user.id, &med("Zinc", true)).await.unwrap();
        let changes = MedicationChanges {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = store
            .update_medication(user.id, created.id, &changes)
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.dosage, "10mg");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn chat_history_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        let user = store.seed_profile().await;
        for i in 0..3 {
            let new = NewChatMessage {
                user_message: format!("q{i}"),
                bot_response: format!("a{i}"),
                query_type: Some("general".into()),
            };
            store.append_chat_message(user.id, &new).await.unwrap();
        }
        let history = store.chat_history(user.id, 2).await.unwrap();
        let asked: Vec<_> = history.iter().map(|m| m.user_message.as_str()).collect();
        assert_eq!(asked, ["q2", "q1"]);
        assert_eq!(store.clear_chat_history(user.id).await.unwrap(), 3);
        assert!(store.chat_history(user.id, 10).await.unwrap().is_empty());
    }
}
