use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::{
    chat::{
        self,
        repo_types::{ChatMessage, NewChatMessage},
    },
    meals::{
        self,
        repo_types::{Meal, MealChanges, NewMeal},
    },
    medications::{
        self,
        repo_types::{Medication, MedicationChanges, NewMedication},
    },
    profile::{
        self,
        repo_types::{NewProfile, UserProfile},
    },
    store::{DateRange, HealthStore, MealAggregate},
};

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let db = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { db })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db)
            .await
            .context("run migrations")?;
        Ok(())
    }
}

#[async_trait]
impl HealthStore for PgStore {
    async fn get_or_create_profile(&self, new: &NewProfile) -> anyhow::Result<UserProfile> {
        profile::repo::get_or_create(&self.db, new).await
    }

    async fn list_meals(
        &self,
        user_id: Uuid,
        range: DateRange,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Meal>> {
        meals::repo::list_by_user(&self.db, user_id, range, limit).await
    }

    async fn aggregate_meals(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> anyhow::Result<MealAggregate> {
        meals::repo::aggregate(&self.db, user_id, range).await
    }

    async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        meals::repo::get(&self.db, user_id, meal_id).await
    }

    async fn create_meal(&self, user_id: Uuid, new: &NewMeal) -> anyhow::Result<Meal> {
        meals::repo::insert(&self.db, user_id, new).await
    }

    async fn update_meal(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        changes: &MealChanges,
    ) -> anyhow::Result<Option<Meal>> {
        meals::repo::update(&self.db, user_id, meal_id, changes).await
    }

    async fn delete_meal(&self, user_id: Uuid, meal_id: Uuid) -> anyhow::Result<Option<Meal>> {
        meals::repo::delete(&self.db, user_id, meal_id).await
    }

    async fn clear_meals(&self, user_id: Uuid) -> anyhow::Result<u64> {
        meals::repo::delete_all_for_user(&self.db, user_id).await
    }

    async fn list_medications(
        &self,
        user_id: Uuid,
        active: Option<bool>,
    ) -> anyhow::Result<Vec<Medication>> {
        medications::repo::list_by_user(&self.db, user_id, active).await
    }

    async fn get_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
    ) -> anyhow::Result<Option<Medication>> {
        medications::repo::get(&self.db, user_id, med_id).await
    }

    async fn create_medication(
        &self,
        user_id: Uuid,
        new: &NewMedication,
    ) -> anyhow::Result<Medication> {
        medications::repo::insert(&self.db, user_id, new).await
    }

    async fn update_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
        changes: &MedicationChanges,
    ) -> anyhow::Result<Option<Medication>> {
        medications::repo::update(&self.db, user_id, med_id, changes).await
    }

    async fn delete_medication(
        &self,
        user_id: Uuid,
        med_id: Uuid,
    ) -> anyhow::Result<Option<Medication>> {
        medications::repo::delete(&self.db, user_id, med_id).await
    }

    async fn clear_medications(&self, user_id: Uuid) -> anyhow::Result<u64> {
        medications::repo::delete_all_for_user(&self.db, user_id).await
    }

    async fn append_chat_message(
        &self,
        user_id: Uuid,
        new: &NewChatMessage,
    ) -> anyhow::Result<ChatMessage> {
        chat::repo::insert(&self.db, user_id, new).await
    }

    async fn chat_history(&self, user_id: Uuid, limit: i64) -> anyhow::Result<Vec<ChatMessage>> {
        chat::repo::history(&self.db, user_id, limit).await
    }

    async fn clear_chat_history(&self, user_id: Uuid) -> anyhow::Result<u64> {
        chat::repo::delete_all_for_user(&self.db, user_id).await
    }
}
